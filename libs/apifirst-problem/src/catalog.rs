//! Problem type catalog: the classification URIs stamped onto translated errors

/// Base URL used when no other is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.virtualan.io";

const PROBLEM_WITH_MESSAGE_PATH: &str = "/problem-with-message";
const CONSTRAINT_VIOLATION_PATH: &str = "/constraint-violation";

/// Class of a recognized failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Unclassified application failure.
    Generic,
    /// Input validation failure.
    Validation,
}

/// Classification URIs derived from a single base URL.
///
/// Built once from configuration and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemTypes {
    base_url: String,
    generic: String,
    constraint_violation: String,
}

impl ProblemTypes {
    /// Build the catalog for `base_url`. A trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            generic: format!("{base_url}{PROBLEM_WITH_MESSAGE_PATH}"),
            constraint_violation: format!("{base_url}{CONSTRAINT_VIOLATION_PATH}"),
            base_url,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URI for unclassified failures.
    #[must_use]
    pub fn generic(&self) -> &str {
        &self.generic
    }

    /// URI for input validation failures.
    #[must_use]
    pub fn constraint_violation(&self) -> &str {
        &self.constraint_violation
    }

    /// Default type URI for a failure of the given kind.
    #[must_use]
    pub fn default_type(&self, kind: FaultKind) -> &str {
        match kind {
            FaultKind::Generic => self.generic(),
            FaultKind::Validation => self.constraint_violation(),
        }
    }

    /// Reverse lookup used when a translated problem is fed back as a candidate.
    #[must_use]
    pub fn kind_of(&self, type_url: &str) -> FaultKind {
        if type_url == self.constraint_violation {
            FaultKind::Validation
        } else {
            FaultKind::Generic
        }
    }
}

impl Default for ProblemTypes {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
