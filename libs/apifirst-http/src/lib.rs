//! Problem detail error translation for axum services
//!
//! Handlers return [`Failure`]; [`problem_translation_middleware`] collects the
//! request context and hands every response to the [`ErrorTranslator`], which
//! emits exactly one RFC 9457 problem per failed request.
//!
//! ```ignore
//! let translator = Arc::new(ErrorTranslator::from_config(&config.problem));
//! let app = Router::new()
//!     .route("/projects/{id}", get(get_project))
//!     .with_problem_translation(translator);
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod context;
pub mod failure;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod translator;

pub use apifirst_problem::{
    APPLICATION_PROBLEM_JSON, CandidateBody, Fault, FaultKind, Problem, ProblemTypes,
    UNKNOWN_INSTANCE,
};
pub use config::{AppConfig, ConfigError, LogFormat, LoggingConfig, ProblemConfig};
pub use context::{RequestContext, extract_trace_id};
pub use failure::Failure;
pub use logging::init_logging;
pub use middleware::{ProblemRouterExt, problem_translation_middleware};
pub use response::{CandidateResponse, ProblemResponse, Translated};
pub use translator::{
    DEFAULT_LOGGER, ErrorTranslator, MISSING_BODY_TITLE, MISSING_INPUT_TITLE,
};
