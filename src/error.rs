use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the request path.
///
/// The endpoint layer picks status codes from the variant, never from the
/// message text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client input broke a field rule.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The operation targeted a row that does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A statement was rejected by a database constraint. In practice this is
    /// the foreign key on child inserts whose opportunity does not exist.
    #[error("referenced opportunity does not exist")]
    Constraint,

    /// Connection or query failure inside the store.
    #[error(transparent)]
    Store(rusqlite::Error),
}

impl Error {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation { .. } | Error::Constraint => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Constraint
            }
            _ => Error::Store(e),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::Store(e) => {
                tracing::error!("store error: {}", e);
                "internal server error".to_string()
            }
            other => {
                tracing::warn!("request rejected: {}", other);
                other.to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = Error::invalid("name", "is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "name: is required");
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(Error::NotFound("opportunity").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn constraint_violation_is_detected_from_sqlite_code() {
        let sqlite = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            None,
        );
        let err = Error::from(sqlite);
        assert!(matches!(err, Error::Constraint));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_sqlite_errors_stay_store_errors() {
        let err = Error::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, Error::Store(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
