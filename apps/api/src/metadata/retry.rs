//! Retry controller — bounded generate → parse → validate loop with corrective feedback.
//!
//! Per run: START → GENERATING → PARSING → VALIDATING → SUCCESS | RETRY → GENERATING | FAILED.
//!
//! The only state carried between attempts is the follow-up built from the previous
//! attempt's report. Malformed output, backend errors and timeouts each spend one attempt,
//! exactly like a schema violation.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::llm_client::TextGenerator;
use crate::metadata::bundle::{accept, MetadataBundle};
use crate::metadata::error::{FailureKind, MetadataError};
use crate::metadata::parser::parse;
use crate::metadata::prompts::CORRECTION_TEMPLATE;
use crate::metadata::schema::SchemaDefinition;
use crate::metadata::validator::ValidationReport;

// ────────────────────────────────────────────────────────────────────────────
// Cancellation
// ────────────────────────────────────────────────────────────────────────────

/// Caller side of a cancellation pair.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Pipeline side of a cancellation pair. Checked at every attempt boundary and raced
/// against the in-flight generation call.
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self(rx)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped without cancelling.
    async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

/// Successful run: the bundle and how many attempts it took.
#[derive(Debug, Clone)]
pub struct Generated {
    pub bundle: MetadataBundle,
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct RetryController {
    max_attempts: u32,
    attempt_timeout: Option<Duration>,
}

impl RetryController {
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs the attempt loop for one rendered prompt.
    pub async fn run(
        &self,
        base_prompt: &str,
        generator: &dyn TextGenerator,
        schema: &SchemaDefinition,
        mut cancel: CancelSignal,
    ) -> Result<Generated, MetadataError> {
        let mut prompt = base_prompt.to_string();
        let mut last_failure = FailureKind::MalformedOutput;
        let mut last_report = ValidationReport::default();

        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                info!("Metadata generation cancelled before attempt {attempt}");
                return Err(MetadataError::Cancelled {
                    attempts: attempt - 1,
                    report: last_report,
                });
            }

            debug!("Attempt {attempt}/{}: generating", self.max_attempts);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Metadata generation cancelled during attempt {attempt}");
                    return Err(MetadataError::Cancelled {
                        attempts: attempt,
                        report: last_report,
                    });
                }
                outcome = self.generate_once(generator, &prompt) => outcome,
            };

            let (failure, report) = match outcome.and_then(|raw| evaluate(&raw, schema)) {
                Ok(bundle) => {
                    info!(
                        "Metadata accepted on attempt {attempt}/{} (language: {})",
                        self.max_attempts, bundle.language_detected
                    );
                    return Ok(Generated {
                        bundle,
                        attempts: attempt,
                    });
                }
                Err(rejected) => rejected,
            };

            warn!(
                "Attempt {attempt}/{} rejected: {failure} ({} violation(s))",
                self.max_attempts,
                report.len()
            );

            if attempt < self.max_attempts {
                prompt = if failure.is_correctable() {
                    corrective_prompt(base_prompt, &report)
                } else {
                    base_prompt.to_string()
                };
            }
            last_failure = failure;
            last_report = report;
        }

        Err(MetadataError::GenerationFailed {
            attempts: self.max_attempts,
            last_failure,
            report: last_report,
        })
    }

    /// GENERATING: one backend call, bounded by the attempt timeout.
    async fn generate_once(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<String, (FailureKind, ValidationReport)> {
        let call = generator.generate(prompt);
        let result = match self.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    return Err((
                        FailureKind::Timeout,
                        ValidationReport::no_response(format!(
                            "timed out after {}ms",
                            limit.as_millis()
                        )),
                    ))
                }
            },
            None => call.await,
        };

        result.map_err(|e| {
            (
                FailureKind::BackendUnavailable,
                ValidationReport::no_response(e.to_string()),
            )
        })
    }
}

/// PARSING + VALIDATING for one raw response.
fn evaluate(
    raw: &str,
    schema: &SchemaDefinition,
) -> Result<MetadataBundle, (FailureKind, ValidationReport)> {
    let obj = parse(raw).map_err(|e| {
        (
            FailureKind::MalformedOutput,
            ValidationReport::malformed(e.to_string()),
        )
    })?;

    accept(&obj, schema).map_err(|report| {
        let failure = if report.is_policy_only() {
            FailureKind::BilingualPolicyViolation
        } else {
            FailureKind::SchemaViolation
        };
        (failure, report)
    })
}

/// Base prompt plus a follow-up listing every violation of the previous attempt.
pub fn corrective_prompt(base_prompt: &str, report: &ValidationReport) -> String {
    let mut prompt = base_prompt.to_string();
    prompt.push_str(&CORRECTION_TEMPLATE.replace("{violations}", &report.to_string()));
    prompt
}
