use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tidemark_core::ValidationError),

    #[error(transparent)]
    Analytics(#[from] tidemark_core::AnalyticsError),

    #[error(transparent)]
    Source(#[from] tidemark_core::SourceError),

    #[error(transparent)]
    Store(#[from] tidemark_store::StoreError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Analytics(_) | Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Source(_) => 6,
            Self::Store(_) => 7,
            Self::Io(_) => 10,
        }
    }
}
