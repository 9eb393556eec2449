//! Axum route handlers for the Metadata API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::metadata::bundle::MetadataBundle;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateMetadataRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateMetadataResponse {
    pub request_id: Uuid,
    pub attempts: u32,
    pub metadata: MetadataBundle,
}

/// POST /api/v1/metadata
///
/// Generates a validated metadata bundle for a free-form video description in any language.
/// Empty descriptions are accepted; a body whose `description` is not a string is rejected.
pub async fn handle_generate_metadata(
    State(state): State<AppState>,
    payload: Result<Json<GenerateMetadataRequest>, JsonRejection>,
) -> Result<Json<GenerateMetadataResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let request_id = Uuid::new_v4();
    info!("Metadata request {request_id} received");

    let generated = state
        .pipeline
        .produce_metadata_with_cancel(&request.description, state.shutdown.clone())
        .instrument(info_span!("metadata", %request_id))
        .await?;

    info!(
        "Metadata request {request_id} completed in {} attempt(s)",
        generated.attempts
    );

    Ok(Json(GenerateMetadataResponse {
        request_id,
        attempts: generated.attempts,
        metadata: generated.bundle,
    }))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::metadata::pipeline::MetadataPipeline;
    use crate::metadata::retry::{CancelSignal, RetryController};
    use crate::metadata::schema::SchemaDefinition;
    use crate::metadata::test_support::{english_response, ScriptedGenerator};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_pipeline_logs_carry_request_id() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let pipeline = MetadataPipeline::new(
            Arc::new(ScriptedGenerator::always(&english_response(), 1)),
            SchemaDefinition::default(),
            RetryController::new(1),
        );
        let state = AppState {
            pipeline: Arc::new(pipeline),
            shutdown: CancelSignal::never(),
        };
        let request = GenerateMetadataRequest {
            description: "faucet repair".to_string(),
        };

        let Json(response) = handle_generate_metadata(State(state), Ok(Json(request)))
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let span = format!("metadata{{request_id={}}}", response.request_id);
        let pipeline_line = output
            .lines()
            .find(|line| line.contains("Generating metadata"))
            .unwrap();
        assert!(pipeline_line.contains(&span), "{output}");
    }
}
