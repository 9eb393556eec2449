//! Metadata pipeline — render → generate → parse → validate → enforce, with bounded retry.
//!
//! Holds only immutable configuration, so one instance is shared (via `Arc`) by every
//! concurrent request.

use std::sync::Arc;

use tracing::info;

use crate::llm_client::TextGenerator;
use crate::metadata::error::MetadataError;
use crate::metadata::renderer::TemplateRenderer;
use crate::metadata::retry::{CancelSignal, Generated, RetryController};
use crate::metadata::schema::SchemaDefinition;

pub struct MetadataPipeline {
    generator: Arc<dyn TextGenerator>,
    schema: SchemaDefinition,
    renderer: TemplateRenderer,
    retry: RetryController,
    max_input_chars: Option<usize>,
}

impl MetadataPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        schema: SchemaDefinition,
        retry: RetryController,
    ) -> Self {
        Self {
            renderer: TemplateRenderer::new(&schema),
            generator,
            schema,
            retry,
            max_input_chars: None,
        }
    }

    /// Rejects descriptions longer than `max` characters before anything is rendered.
    pub fn with_max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = Some(max);
        self
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    pub async fn produce_metadata(&self, description: &str) -> Result<Generated, MetadataError> {
        self.produce_metadata_with_cancel(description, CancelSignal::never())
            .await
    }

    /// Same as `produce_metadata`, abandoning the run at the next attempt boundary (or
    /// mid-call) once `cancel` fires. A bundle that already passed validation is still returned.
    pub async fn produce_metadata_with_cancel(
        &self,
        description: &str,
        cancel: CancelSignal,
    ) -> Result<Generated, MetadataError> {
        let chars = description.chars().count();
        if let Some(max) = self.max_input_chars {
            if chars > max {
                return Err(MetadataError::InvalidInput(format!(
                    "description is {chars} characters, maximum is {max}"
                )));
            }
        }

        info!(
            "Generating metadata for a {chars}-character description (budget: {} attempts)",
            self.retry.max_attempts()
        );

        let prompt = self.renderer.render(description);
        self.retry
            .run(&prompt, self.generator.as_ref(), &self.schema, cancel)
            .await
    }
}
