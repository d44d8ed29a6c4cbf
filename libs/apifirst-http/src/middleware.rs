//! Centralized error mapping for Axum
//!
//! Every response leaving a router that installs this middleware is either
//! passed through untouched or replaced by a single RFC 9457 problem.

use std::sync::Arc;

use apifirst_problem::{APPLICATION_PROBLEM_JSON, CandidateBody, Fault, FaultKind, ProblemTypes};
use axum::{
    Router,
    body::to_bytes,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::context::RequestContext;
use crate::failure::Failure;
use crate::response::{CandidateResponse, Translated};
use crate::translator::ErrorTranslator;

/// Upper bound on how much of a framework error body is kept as detail.
const MAX_DETAIL_BYTES: usize = 64 * 1024;

/// Middleware translating failed responses into problems.
///
/// Install with [`ProblemRouterExt::with_problem_translation`].
pub async fn problem_translation_middleware(
    State(translator): State<Arc<ErrorTranslator>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let ctx = RequestContext::from_parts(&parts);

    let response = next.run(Request::from_parts(parts, body)).await;
    let candidate = classify(response, translator.types()).await;

    match translator.translate(Some(candidate), Some(&ctx)) {
        Translated::PassThrough { payload, .. } => payload,
        Translated::Problem(problem) => problem.into_response(),
    }
}

/// Tag a response with what it carries.
async fn classify(mut response: Response, types: &ProblemTypes) -> CandidateResponse<Response> {
    let status = response.status();

    if let Some(failure) = response.extensions_mut().remove::<Failure>() {
        let (kind, fault) = failure.into_parts();
        let headers = std::mem::take(response.headers_mut());
        return CandidateResponse::new(status, CandidateBody::failure(kind, Some(fault)))
            .with_headers(headers);
    }

    if !is_error_status(status) {
        return CandidateResponse::new(status, CandidateBody::Success(response));
    }

    let problem_body = is_problem_response(&response);
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_DETAIL_BYTES).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read error body");
            None
        }
    };

    // An upstream or nested layer already answered with a problem: keep its
    // fields and let the translator complete it.
    if problem_body
        && let Some(fault) = bytes.as_deref().and_then(|b| parse_problem(b, status))
    {
        let kind = fault
            .type_url
            .as_deref()
            .map_or(FaultKind::Generic, |t| types.kind_of(t));
        return CandidateResponse::new(status, CandidateBody::failure(kind, Some(fault)))
            .with_headers(parts.headers);
    }

    // Produced by the framework itself: routing, method or extractor rejection.
    let detail = bytes
        .and_then(|b| String::from_utf8(b.to_vec()).ok())
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    let mut fault = Fault::anonymous(status, canonical_title(status));
    if let Some(detail) = detail {
        fault = fault.with_detail(detail);
    }

    CandidateResponse::new(status, CandidateBody::failure(rejection_kind(status), Some(fault)))
        .with_headers(parts.headers)
}

/// Problem body as written by someone else; every member is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProblemBody {
    #[serde(rename = "type")]
    type_url: Option<String>,
    status: Option<u16>,
    title: Option<String>,
    detail: Option<String>,
    instance: Option<String>,
}

/// Leniently read a problem body; `None` if it is not a JSON object.
fn parse_problem(bytes: &[u8], fallback: StatusCode) -> Option<Fault> {
    let body: ProblemBody = match serde_json::from_slice(bytes) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, "problem body is not valid JSON");
            return None;
        }
    };

    let status = body
        .status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(fallback);
    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| canonical_title(status).to_owned());

    let mut fault = Fault::anonymous(status, title);
    fault.type_url = body.type_url.filter(|t| !t.is_empty());
    fault.detail = body.detail;
    fault.instance = body.instance;
    Some(fault)
}

fn canonical_title(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

fn is_error_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// Malformed or semantically invalid input is a validation failure.
fn rejection_kind(status: StatusCode) -> FaultKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => FaultKind::Validation,
        _ => FaultKind::Generic,
    }
}

/// Check if a response is already a Problem+JSON response
fn is_problem_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains(APPLICATION_PROBLEM_JSON))
}

/// Router sugar for installing the translation middleware.
pub trait ProblemRouterExt {
    /// Apply the middleware to every route added so far.
    #[must_use]
    fn with_problem_translation(self, translator: Arc<ErrorTranslator>) -> Self;
}

impl<S> ProblemRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_problem_translation(self, translator: Arc<ErrorTranslator>) -> Self {
        self.layer(from_fn_with_state(
            translator,
            problem_translation_middleware,
        ))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn rejection_kinds() {
        assert_eq!(rejection_kind(StatusCode::BAD_REQUEST), FaultKind::Validation);
        assert_eq!(
            rejection_kind(StatusCode::UNPROCESSABLE_ENTITY),
            FaultKind::Validation
        );
        assert_eq!(rejection_kind(StatusCode::NOT_FOUND), FaultKind::Generic);
        assert_eq!(
            rejection_kind(StatusCode::METHOD_NOT_ALLOWED),
            FaultKind::Generic
        );
    }

    #[test]
    fn problem_content_type_is_detected() {
        let mut resp = StatusCode::NOT_FOUND.into_response();
        assert!(!is_problem_response(&resp));

        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        assert!(is_problem_response(&resp));
    }

    fn types() -> ProblemTypes {
        ProblemTypes::new("https://errors.example.com")
    }

    fn problem_json(status: StatusCode, body: &'static str) -> Response {
        (
            status,
            [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            body,
        )
            .into_response()
    }

    #[tokio::test]
    async fn classify_reads_framework_body_as_detail() {
        let resp = (StatusCode::NOT_FOUND, "no route for /nope\n").into_response();
        let candidate = classify(resp, &types()).await;

        let CandidateBody::Generic(Some(fault)) = candidate.body else {
            panic!("expected generic fault");
        };
        assert_eq!(fault.title, "Not Found");
        assert_eq!(fault.detail.as_deref(), Some("no route for /nope"));
        assert!(fault.origin.is_none());
    }

    #[tokio::test]
    async fn classify_passes_success_through() {
        let resp = (StatusCode::CREATED, "made").into_response();
        let candidate = classify(resp, &types()).await;
        assert!(matches!(candidate.body, CandidateBody::Success(_)));
    }

    #[tokio::test]
    async fn classify_reads_problem_body_as_fault() {
        let resp = problem_json(
            StatusCode::GONE,
            r#"{"type":"about:blank","status":410,"title":"Gone"}"#,
        );
        let candidate = classify(resp, &types()).await;

        let CandidateBody::Generic(Some(fault)) = candidate.body else {
            panic!("expected generic fault");
        };
        assert_eq!(fault.type_url.as_deref(), Some("about:blank"));
        assert_eq!(fault.status, StatusCode::GONE);
        assert_eq!(fault.title, "Gone");
        assert_eq!(fault.instance, None);
        assert!(fault.origin.is_none());
    }

    #[tokio::test]
    async fn classify_maps_constraint_type_back_to_validation() {
        let resp = problem_json(
            StatusCode::BAD_REQUEST,
            r#"{"type":"https://errors.example.com/constraint-violation","title":"must not be blank","instance":"/p"}"#,
        );
        let candidate = classify(resp, &types()).await;

        let CandidateBody::Validation(Some(fault)) = candidate.body else {
            panic!("expected validation fault");
        };
        assert_eq!(fault.status, StatusCode::BAD_REQUEST);
        assert_eq!(fault.instance.as_deref(), Some("/p"));
    }

    #[tokio::test]
    async fn classify_falls_back_on_garbled_problem_body() {
        let resp = problem_json(StatusCode::BAD_GATEWAY, "upstream said <html>");
        let candidate = classify(resp, &types()).await;

        let CandidateBody::Generic(Some(fault)) = candidate.body else {
            panic!("expected generic fault");
        };
        assert_eq!(fault.title, "Bad Gateway");
        assert_eq!(fault.detail.as_deref(), Some("upstream said <html>"));
    }

    #[test]
    fn problem_body_fills_missing_members() {
        let fault = parse_problem(br#"{"status":42,"title":"  "}"#, StatusCode::CONFLICT).unwrap();
        assert_eq!(fault.status, StatusCode::CONFLICT);
        assert_eq!(fault.title, "Conflict");
        assert_eq!(fault.type_url, None);
    }
}
