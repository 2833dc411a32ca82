use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, msg.to_string()).into_response()
            }
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Error::Json(e) => {
                (StatusCode::BAD_REQUEST, format!("invalid payload: {}", e)).into_response()
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            other => {
                error!("internal error: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
