use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::services::AgendaError;
use shared::time::TimeParseError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();

        let message = if messages.len() == 1 {
            messages.remove(0)
        } else {
            format!("{} validation errors: {}", messages.len(), messages.join("; "))
        };

        ApiError::Validation(message)
    }
}

impl From<TimeParseError> for ApiError {
    fn from(err: TimeParseError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<AgendaError> for ApiError {
    fn from(err: AgendaError) -> Self {
        match err {
            AgendaError::DateOutOfRange(_) => ApiError::Validation(err.to_string()),
            AgendaError::InvalidStartHour(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use validator::Validate;

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::NotFound("test".to_string())),
            "Not found: test"
        );
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string())),
            "Validation error: test"
        );
        assert_eq!(
            format!("{}", ApiError::Internal("test".to_string())),
            "Internal error: test"
        );
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_sqlx_other_is_internal() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, ApiError::Internal(_)));
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(range(min = 1, max = 1440, message = "Interval must be between 1 and 1440 minutes"))]
        interval: i32,
        #[validate(length(max = 3, message = "Too long"))]
        name: String,
    }

    #[test]
    fn test_from_validation_errors_single() {
        let payload = Payload {
            interval: 0,
            name: "ok".into(),
        };
        let error: ApiError = payload.validate().unwrap_err().into();
        match error {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "Interval must be between 1 and 1440 minutes")
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_from_validation_errors_multiple() {
        let payload = Payload {
            interval: 5000,
            name: "too long".into(),
        };
        let error: ApiError = payload.validate().unwrap_err().into();
        match error {
            ApiError::Validation(msg) => {
                assert!(msg.starts_with("2 validation errors"));
                assert!(msg.contains("Too long"));
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_from_time_parse_error() {
        let error: ApiError = TimeParseError::InvalidTimeOfDay("25:00".into()).into();
        assert!(matches!(error, ApiError::Validation(msg) if msg.contains("25:00")));
    }

    #[test]
    fn test_from_agenda_error() {
        let date = NaiveDate::MAX;
        let error: ApiError = AgendaError::DateOutOfRange(date).into();
        assert!(matches!(error, ApiError::Validation(_)));

        let error: ApiError = AgendaError::InvalidStartHour(25).into();
        assert!(matches!(error, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Validation("Unknown call state: late".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Unknown call state: late");
    }
}
