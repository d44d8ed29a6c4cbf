//! Translation of failed responses into RFC 9457 problems
//!
//! [`ErrorTranslator::translate`] is the single place where a recognized error
//! body becomes the [`Problem`] sent to the client. It never fails: missing
//! inputs and missing bodies are themselves reported as 500 problems.

use std::borrow::Cow;

use apifirst_problem::{
    CandidateBody, Fault, FaultKind, Problem, ProblemTypes, UNKNOWN_INSTANCE,
};
use axum::http::{HeaderMap, StatusCode};

use crate::config::ProblemConfig;
use crate::context::RequestContext;
use crate::response::{CandidateResponse, ProblemResponse, Translated};

/// Logger name used when a failure carries no origin.
pub const DEFAULT_LOGGER: &str = module_path!();

/// Title reported when the translator is called without a response or request.
pub const MISSING_INPUT_TITLE: &str = "either entity or request is null!";

/// Title reported when an error response arrives without a body.
pub const MISSING_BODY_TITLE: &str = "entity body is null!";

/// Stateless translator shared by every request.
#[derive(Debug, Clone)]
pub struct ErrorTranslator {
    types: ProblemTypes,
    default_logger: Cow<'static, str>,
}

impl ErrorTranslator {
    #[must_use]
    pub fn new(types: ProblemTypes) -> Self {
        Self {
            types,
            default_logger: Cow::Borrowed(DEFAULT_LOGGER),
        }
    }

    #[must_use]
    pub fn from_config(config: &ProblemConfig) -> Self {
        let translator = Self::new(ProblemTypes::new(config.base_url.as_str()));
        match &config.default_logger {
            Some(name) => translator.with_default_logger(name.clone()),
            None => translator,
        }
    }

    #[must_use]
    pub fn with_default_logger(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.default_logger = name.into();
        self
    }

    #[must_use]
    pub fn types(&self) -> &ProblemTypes {
        &self.types
    }

    #[must_use]
    pub fn default_logger(&self) -> &str {
        &self.default_logger
    }

    /// Turn a candidate response into the response sent to the client.
    ///
    /// Success payloads pass through untouched; every other outcome is a
    /// [`ProblemResponse`] whose instance is always resolved.
    pub fn translate<P>(
        &self,
        candidate: Option<CandidateResponse<P>>,
        request: Option<&RequestContext>,
    ) -> Translated<P> {
        let (Some(candidate), Some(request)) = (candidate, request) else {
            return Translated::Problem(self.internal(MISSING_INPUT_TITLE, request));
        };

        let CandidateResponse {
            status,
            headers,
            body,
        } = candidate;

        let (kind, fault) = match body {
            CandidateBody::Success(payload) => {
                return Translated::PassThrough {
                    status,
                    headers,
                    payload,
                };
            }
            CandidateBody::Validation(fault) => (FaultKind::Validation, fault),
            CandidateBody::Generic(fault) => (FaultKind::Generic, fault),
        };

        let Some(fault) = fault else {
            return Translated::Problem(self.internal(MISSING_BODY_TITLE, Some(request)));
        };

        let problem = self.build_problem(kind, fault, request);
        Translated::Problem(ProblemResponse {
            status,
            headers,
            problem,
        })
    }

    fn build_problem(&self, kind: FaultKind, fault: Fault, request: &RequestContext) -> Problem {
        let logger = fault.origin.as_deref().unwrap_or(&*self.default_logger);
        let message = fault.log_message();

        let type_url = fault
            .type_url
            .as_deref()
            .unwrap_or_else(|| self.types.default_type(kind));
        let instance = resolve_instance(fault.instance.as_deref(), Some(request));

        let mut problem = Problem::new(type_url, fault.status, fault.title.as_str())
            .with_instance(instance);
        if let Some(detail) = &fault.detail {
            problem = problem.with_detail(detail.as_str());
        }
        if let Some(tid) = request.trace_id() {
            problem = problem.with_trace_id(tid);
        }

        log_failure(logger, message, &problem);
        problem
    }

    fn internal(&self, title: &str, request: Option<&RequestContext>) -> ProblemResponse {
        let mut problem = Problem::new(
            self.types.generic(),
            StatusCode::INTERNAL_SERVER_ERROR,
            title,
        )
        .with_instance(resolve_instance(None, request));
        if let Some(tid) = request.and_then(RequestContext::trace_id) {
            problem = problem.with_trace_id(tid);
        }

        log_failure(&self.default_logger, title, &problem);
        ProblemResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: HeaderMap::new(),
            problem,
        }
    }
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self::new(ProblemTypes::default())
    }
}

/// Existing instance, else request path, else [`UNKNOWN_INSTANCE`].
fn resolve_instance(existing: Option<&str>, request: Option<&RequestContext>) -> String {
    existing
        .filter(|s| !s.is_empty())
        .or_else(|| request.and_then(RequestContext::path))
        .unwrap_or(UNKNOWN_INSTANCE)
        .to_owned()
}

fn log_failure(logger: &str, message: &str, problem: &Problem) {
    tracing::error!(
        logger = %logger,
        status = problem.status.as_u16(),
        type_url = %problem.type_url,
        instance = %problem.instance,
        "{message}"
    );
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn generic(fault: Fault) -> Option<CandidateResponse<String>> {
        Some(CandidateResponse::new(
            fault.status,
            CandidateBody::Generic(Some(fault)),
        ))
    }

    #[test]
    fn resolve_instance_prefers_existing_then_path() {
        let ctx = RequestContext::new("/projects/42");
        assert_eq!(resolve_instance(Some("/orig"), Some(&ctx)), "/orig");
        assert_eq!(resolve_instance(None, Some(&ctx)), "/projects/42");
        assert_eq!(resolve_instance(Some(""), Some(&ctx)), "/projects/42");
        assert_eq!(resolve_instance(None, Some(&RequestContext::detached())), "unknown");
        assert_eq!(resolve_instance(None, None), "unknown");
    }

    #[test]
    fn missing_request_yields_internal_problem() {
        let translator = ErrorTranslator::default();
        let fault = Fault::new(StatusCode::NOT_FOUND, "Not Found");

        let out = translator.translate(generic(fault), None);

        assert_eq!(out.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(out.headers().is_empty());
        let problem = out.problem().unwrap();
        assert_eq!(problem.title, MISSING_INPUT_TITLE);
        assert_eq!(problem.instance, "unknown");
        assert_eq!(problem.type_url, translator.types().generic());
    }

    #[test]
    fn missing_candidate_uses_request_path() {
        let translator = ErrorTranslator::default();
        let ctx = RequestContext::new("/projects/1").with_trace_id("t-1");

        let out = translator.translate::<String>(None, Some(&ctx));

        let problem = out.problem().unwrap();
        assert_eq!(problem.title, MISSING_INPUT_TITLE);
        assert_eq!(problem.instance, "/projects/1");
        assert_eq!(problem.trace_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn explicit_type_is_kept() {
        let translator = ErrorTranslator::default();
        let ctx = RequestContext::new("/projects/5");
        let fault = Fault::new(StatusCode::CONFLICT, "Conflict")
            .with_type("https://errors.example.com/duplicate");

        let out = translator.translate(generic(fault), Some(&ctx));

        assert_eq!(
            out.problem().unwrap().type_url,
            "https://errors.example.com/duplicate"
        );
    }

    #[test]
    fn from_config_applies_base_url_and_logger() {
        let config = ProblemConfig {
            base_url: "https://errors.example.com".to_owned(),
            default_logger: Some("projects".to_owned()),
        };
        let translator = ErrorTranslator::from_config(&config);

        assert_eq!(
            translator.types().constraint_violation(),
            "https://errors.example.com/constraint-violation"
        );
        assert_eq!(translator.default_logger(), "projects");
    }
}
