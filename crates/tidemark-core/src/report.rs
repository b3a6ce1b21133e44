//! Uniform report envelope for command output.
//!
//! Every command response carries the same shape: request metadata, an
//! optional data payload, and a list of structured errors. Warnings are
//! non-fatal and live in the metadata block.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Metadata attached to every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub request_id: String,
    pub generated_at: String,
    /// Where the data came from, e.g. `store` or `yahoo`.
    pub source: String,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ReportMeta {
    pub fn new(request_id: impl Into<String>, source: impl Into<String>) -> Self {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"));

        Self {
            request_id: request_id.into(),
            generated_at,
            source: source.into(),
            latency_ms: 0,
            warnings: Vec::new(),
        }
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Structured error entry with a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,
}

impl ReportError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Top-level report wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: ReportMeta,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReportError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: ReportMeta, data: T) -> Self {
        Self {
            meta,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(meta: ReportMeta, errors: Vec<ReportError>) -> Self {
        Self {
            meta,
            data: None,
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
