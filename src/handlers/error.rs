// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;
use warp::Rejection;

/// Client-input error surfaced through warp's rejection machinery. Upstream
/// analytics failures never take this path; they degrade to empty sections
/// instead.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
        }
    }

    pub fn rejection(message: impl Into<String>) -> Rejection {
        warp::reject::custom(Self::new(message))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
