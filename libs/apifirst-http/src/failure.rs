//! Handler error type carrying a [`Fault`] to the translation middleware

use std::borrow::Cow;

use apifirst_problem::{Fault, FaultKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error returned by handlers: `Result<T, Failure>`.
///
/// Rendering a `Failure` produces an empty response that carries the fault in
/// its extensions; [`problem_translation_middleware`] turns it into the final
/// problem. Routers must install the middleware.
///
/// [`problem_translation_middleware`]: crate::middleware::problem_translation_middleware
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {}", .fault.status, .fault.message)]
#[must_use]
pub struct Failure {
    kind: FaultKind,
    fault: Fault,
}

impl Failure {
    /// An unclassified failure.
    #[track_caller]
    pub fn generic(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Generic,
            fault: Fault::new(status, title),
        }
    }

    /// An input validation failure answered with 400 Bad Request.
    #[track_caller]
    pub fn validation(title: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Validation,
            fault: Fault::new(StatusCode::BAD_REQUEST, title),
        }
    }

    /// A 500 failure whose message is only logged, never shown to the client.
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::generic(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .with_message(message)
    }

    /// Wrap an already built fault.
    pub fn from_fault(kind: FaultKind, fault: Fault) -> Self {
        Self { kind, fault }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.fault.status = status;
        self
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.fault = self.fault.with_type(type_url);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.fault = self.fault.with_detail(detail);
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.fault = self.fault.with_instance(uri);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.fault = self.fault.with_message(message);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<Cow<'static, str>>) -> Self {
        self.fault = self.fault.with_origin(origin);
        self
    }

    #[must_use]
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    #[must_use]
    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    #[must_use]
    pub fn into_parts(self) -> (FaultKind, Fault) {
        (self.kind, self.fault)
    }
}

impl From<anyhow::Error> for Failure {
    #[track_caller]
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{err:#}"))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut resp = self.fault.status.into_response();
        resp.extensions_mut().insert(self);
        resp
    }
}
