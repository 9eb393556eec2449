use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::metadata::validator::ValidationReport;

/// Why a single generation attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Backend text held no parseable JSON object.
    MalformedOutput,
    /// Parsed, but broke the schema.
    SchemaViolation,
    /// Parsed and schema-valid, but broke only the bilingual / content policy.
    BilingualPolicyViolation,
    /// Transport or backend error from the generation client.
    BackendUnavailable,
    /// The attempt exceeded its deadline.
    Timeout,
}

impl FailureKind {
    /// Whether the backend produced output the model can be told to correct.
    pub fn is_correctable(self) -> bool {
        matches!(
            self,
            FailureKind::MalformedOutput
                | FailureKind::SchemaViolation
                | FailureKind::BilingualPolicyViolation
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::MalformedOutput => "malformed_output",
            FailureKind::SchemaViolation => "schema_violation",
            FailureKind::BilingualPolicyViolation => "bilingual_policy_violation",
            FailureKind::BackendUnavailable => "backend_unavailable",
            FailureKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal errors of a metadata run. Attempt-level failures never escape on their own;
/// they surface inside `GenerationFailed` once the budget is spent.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("generation failed after {attempts} attempt(s); last failure: {last_failure}")]
    GenerationFailed {
        attempts: u32,
        last_failure: FailureKind,
        report: ValidationReport,
    },

    #[error("generation cancelled after {attempts} attempt(s)")]
    Cancelled {
        attempts: u32,
        report: ValidationReport,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl MetadataError {
    /// The last validation report, if the run got far enough to produce one.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            MetadataError::GenerationFailed { report, .. }
            | MetadataError::Cancelled { report, .. } => Some(report),
            MetadataError::InvalidInput(_) => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            MetadataError::GenerationFailed { attempts, .. }
            | MetadataError::Cancelled { attempts, .. } => *attempts,
            MetadataError::InvalidInput(_) => 0,
        }
    }
}
