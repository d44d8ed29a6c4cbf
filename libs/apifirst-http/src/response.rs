//! Responses flowing into and out of the translator

use apifirst_problem::{APPLICATION_PROBLEM_JSON, CandidateBody, Fault, Problem, ProblemTypes};
use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Response produced by a handler, before error translation.
#[derive(Debug, Clone)]
pub struct CandidateResponse<P> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: CandidateBody<P>,
}

impl<P> CandidateResponse<P> {
    #[must_use]
    pub fn new(status: StatusCode, body: CandidateBody<P>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// A fully translated error response.
#[derive(Debug, Clone)]
pub struct ProblemResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub problem: Problem,
}

impl ProblemResponse {
    /// Feed a translated problem back in as a recognized error.
    ///
    /// The kind is recovered from the problem's type URI.
    #[must_use]
    pub fn into_candidate<P>(self, types: &ProblemTypes) -> CandidateResponse<P> {
        let kind = types.kind_of(&self.problem.type_url);
        CandidateResponse {
            status: self.status,
            headers: self.headers,
            body: CandidateBody::failure(kind, Some(Fault::from(self.problem))),
        }
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let mut resp = Json(self.problem).into_response();
        *resp.status_mut() = self.status;

        let headers = resp.headers_mut();
        headers.extend(self.headers);
        // The body was replaced, any length from the original response is stale.
        headers.remove(header::CONTENT_LENGTH);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

/// Outcome of a translation.
#[derive(Debug, Clone)]
pub enum Translated<P> {
    /// The candidate was not an error and is returned untouched.
    PassThrough {
        status: StatusCode,
        headers: HeaderMap,
        payload: P,
    },
    /// The candidate was an error (or unusable) and became a problem.
    Problem(ProblemResponse),
}

impl<P> Translated<P> {
    #[must_use]
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::PassThrough { .. } => None,
            Self::Problem(resp) => Some(&resp.problem),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PassThrough { status, .. } => *status,
            Self::Problem(resp) => resp.status,
        }
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        match self {
            Self::PassThrough { headers, .. } => headers,
            Self::Problem(resp) => &resp.headers,
        }
    }
}
