use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, ResponseError};

use thiserror::Error;

use crate::error::Error;

pub type RestResult<T> = Result<T, RestError>;

/// Errors returned to HTTP clients as `text/plain` bodies
#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl From<Error> for RestError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(e) => Self::BadRequest(e.to_string()),
            Error::NotFound { id } => {
                tracing::warn!(id, "Subscription not found");
                Self::NotFound("subscription not found".into())
            }
            Error::Storage(e) => {
                tracing::error!(error = %e, "Subscription store failure");
                Self::InternalError
            }
            Error::CostOverflow => {
                tracing::error!("Total cost does not fit in an i64");
                Self::InternalError
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extractor error handlers, registered as app data
pub fn invalid_body(e: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %e, "Rejected request body");
    RestError::BadRequest("invalid request body".into()).into()
}

pub fn invalid_id(e: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %e, "Rejected path parameter");
    RestError::BadRequest("invalid id".into()).into()
}

pub fn invalid_query(e: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %e, "Rejected query string");
    RestError::BadRequest("invalid query parameters".into()).into()
}
