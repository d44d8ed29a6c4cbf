//! Recognized error bodies awaiting translation

use std::borrow::Cow;
use std::panic::Location;

use http::StatusCode;

use crate::catalog::FaultKind;
use crate::problem::Problem;

/// An error body as produced by business logic, before translation.
///
/// Every field except `status`, `title` and `message` may be missing; the
/// translator fills the gaps when it builds the final [`Problem`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Fault {
    pub type_url: Option<String>,
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
    pub instance: Option<String>,
    /// Message of the underlying failure, logged when `detail` is absent.
    pub message: String,
    /// Code location or component that raised the failure.
    pub origin: Option<Cow<'static, str>>,
}

impl Fault {
    /// Create a fault originating at the caller's source location.
    #[track_caller]
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            type_url: None,
            status,
            message: title.clone(),
            title,
            detail: None,
            instance: None,
            origin: Some(caller_origin(Location::caller())),
        }
    }

    /// Create a fault with no known origin, logged under the default logger.
    pub fn anonymous(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            origin: None,
            ..Self::new(status, title)
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = Some(type_url.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<Cow<'static, str>>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Text logged for this fault: the detail if present, else the underlying message.
    #[must_use]
    pub fn log_message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.message)
    }
}

impl From<Problem> for Fault {
    fn from(p: Problem) -> Self {
        Self {
            message: p.detail.clone().unwrap_or_else(|| p.title.clone()),
            type_url: Some(p.type_url),
            status: p.status,
            title: p.title,
            detail: p.detail,
            instance: Some(p.instance),
            origin: None,
        }
    }
}

fn caller_origin(location: &'static Location<'static>) -> Cow<'static, str> {
    Cow::Owned(format!("{}:{}", location.file(), location.line()))
}

/// Body of a candidate response, tagged by what the handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateBody<P> {
    /// Ordinary payload; never translated.
    Success(P),
    /// Input validation failure. `None` when the body went missing.
    Validation(Option<Fault>),
    /// Any other failure. `None` when the body went missing.
    Generic(Option<Fault>),
}

impl<P> CandidateBody<P> {
    /// Tag a recognized error body with its kind.
    pub fn failure(kind: FaultKind, fault: Option<Fault>) -> Self {
        match kind {
            FaultKind::Generic => Self::Generic(fault),
            FaultKind::Validation => Self::Validation(fault),
        }
    }

    /// Kind of the failure, or `None` for a success payload.
    #[must_use]
    pub fn kind(&self) -> Option<FaultKind> {
        match self {
            Self::Success(_) => None,
            Self::Validation(_) => Some(FaultKind::Validation),
            Self::Generic(_) => Some(FaultKind::Generic),
        }
    }
}
