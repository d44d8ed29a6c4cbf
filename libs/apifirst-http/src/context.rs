//! Per-request metadata the translator needs to resolve instances

use axum::{
    extract::OriginalUri,
    http::{HeaderMap, request::Parts},
};

/// What the translator knows about the in-flight request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    path: Option<String>,
    trace_id: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            trace_id: None,
        }
    }

    /// A context whose request path is not available.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Capture path and correlation id from incoming request parts.
    ///
    /// Inside a nested router `uri` has the mount prefix stripped, so the
    /// full path comes from [`OriginalUri`] when axum recorded one.
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.0.path());
        Self {
            path: Some(path.to_owned()),
            trace_id: extract_trace_id(&parts.headers),
        }
    }

    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

/// Extract trace ID from headers, falling back to the current span
pub fn extract_trace_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-trace-id")
        .or_else(|| headers.get("x-request-id"))
        .or_else(|| headers.get("traceparent"))
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
        .or_else(|| {
            tracing::Span::current()
                .id()
                .map(|id| id.into_u64().to_string())
        })
}
