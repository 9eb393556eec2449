use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::metadata::error::MetadataError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
                AppError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                AppError::Metadata(MetadataError::InvalidInput(msg)) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                AppError::Metadata(
                    e @ MetadataError::GenerationFailed {
                        attempts,
                        last_failure,
                        report,
                    },
                ) => {
                    tracing::error!("Metadata generation failed: {e}\n{report}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_FAILED",
                        e.to_string(),
                        Some(json!({
                            "attempts": attempts,
                            "last_failure": last_failure,
                            "violations": report,
                        })),
                    )
                }
                AppError::Metadata(e @ MetadataError::Cancelled { attempts, .. }) => {
                    tracing::warn!("Metadata generation cancelled: {e}");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "GENERATION_CANCELLED",
                        e.to_string(),
                        Some(json!({ "attempts": attempts })),
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::error::FailureKind;
    use crate::metadata::validator::{ValidationReport, ViolationKind};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generation_failed_maps_to_bad_gateway_with_violations() {
        let mut report = ValidationReport::default();
        report.push("category", ViolationKind::Missing);
        let error = AppError::from(MetadataError::GenerationFailed {
            attempts: 2,
            last_failure: FailureKind::SchemaViolation,
            report,
        });

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_FAILED");
        assert_eq!(body["error"]["details"]["attempts"], 2);
        assert_eq!(body["error"]["details"]["last_failure"], "schema_violation");
        assert_eq!(body["error"]["details"]["violations"][0]["field"], "category");
        assert_eq!(body["error"]["details"]["violations"][0]["kind"], "missing");
    }

    #[tokio::test]
    async fn test_invalid_input_maps_to_bad_request() {
        let error = AppError::from(MetadataError::InvalidInput("too long".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_cancelled_maps_to_service_unavailable() {
        let error = AppError::from(MetadataError::Cancelled {
            attempts: 1,
            report: ValidationReport::default(),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
