use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::ErrorBody;

/// Client-side validation failures. The Display text is the 400 message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("empty body")]
    EmptyBody,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("missing version")]
    MissingVersion,

    #[error("unknown version string")]
    UnknownVersion,

    #[error("missing seed_start")]
    MissingSeedStart,

    #[error("missing seed_end")]
    MissingSeedEnd,

    #[error("seed_end must be >= seed_start")]
    InvertedRange,

    #[error("seed range must not exceed {max}")]
    RangeTooWide { max: i64 },

    #[error("missing or invalid max_results")]
    InvalidMaxResults,

    #[error("missing structures")]
    MissingStructures,

    #[error("structures array is empty")]
    EmptyStructures,

    #[error("too many structures (max {max})")]
    TooManyStructures { max: usize },

    #[error("unknown structure type")]
    UnknownStructure,

    #[error("max_distance must be positive")]
    InvalidMaxDistance,

    #[error("max_distance must not exceed {max}")]
    MaxDistanceTooLarge { max: i64 },

    #[error("structure type not available in requested version")]
    StructureUnavailable,

    #[error("unknown biome name")]
    UnknownBiome,
}

/// Failures of the stream codec.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("peer sent a close frame")]
    CloseReceived,

    #[error("unsupported opcode {0:#x}")]
    UnsupportedOpcode(u8),

    #[error("64-bit payload lengths are not supported")]
    UnsupportedLength,

    #[error("inbound payload of {len} bytes exceeds {max}")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("outbound message of {0} bytes does not fit a 16-bit length")]
    MessageTooLarge(usize),

    #[error("text payload is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cannot {action} while {state}")]
    InvalidState { action: &'static str, state: &'static str },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response: `{"error": message}` with a status code.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }

    pub fn method_not_allowed(hint: &str) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, hint)
    }

    pub fn rate_limited() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded, try again later")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}
