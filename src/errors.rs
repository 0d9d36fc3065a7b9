use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Vector index is empty")]
    EmptyIndex,

    #[error("Index corruption: {0}")]
    IndexCorruption(String),

    #[error("k exceeds store size: requested {requested} examples but only {available} are stored")]
    KExceedsStoreSize { requested: usize, available: usize },

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Completion error: {0}")]
    CompletionError(String),

    #[error("{operation} call timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    #[error("No JSON object found in the model response")]
    NoJsonFound { raw: String },

    #[error("Malformed JSON in the model response: {reason}")]
    MalformedJson { reason: String, raw: String },

    #[error("Model response failed schema validation: {reason}")]
    SchemaValidation { reason: String, raw: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

/// Coarse failure category surfaced to presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyIndex,
    IndexCorruption,
    KExceedsStoreSize,
    Embedding,
    InvalidProfile,
    InvalidArgument,
    Completion,
    Timeout,
    NoJsonFound,
    MalformedJson,
    SchemaValidation,
    Config,
    Io,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyIndex => "EmptyIndexError",
            Self::IndexCorruption => "IndexCorruptionError",
            Self::KExceedsStoreSize => "KExceedsStoreSizeError",
            Self::Embedding => "EmbeddingError",
            Self::InvalidProfile => "InvalidProfileError",
            Self::InvalidArgument => "InvalidArgumentError",
            Self::Completion => "CompletionError",
            Self::Timeout => "TimeoutError",
            Self::NoJsonFound => "NoJsonFoundError",
            Self::MalformedJson => "MalformedJsonError",
            Self::SchemaValidation => "SchemaValidationError",
            Self::Config => "ConfigError",
            Self::Io => "IoError",
        }
    }

    /// Whether the failure came from validating model output.
    #[must_use]
    pub const fn is_response_validation(self) -> bool {
        matches!(
            self,
            Self::NoJsonFound | Self::MalformedJson | Self::SchemaValidation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FeedbackError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyIndex => ErrorKind::EmptyIndex,
            Self::IndexCorruption(_) => ErrorKind::IndexCorruption,
            Self::KExceedsStoreSize { .. } => ErrorKind::KExceedsStoreSize,
            Self::EmbeddingError(_) | Self::DimensionMismatch { .. } => ErrorKind::Embedding,
            Self::InvalidProfile(_) => ErrorKind::InvalidProfile,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::CompletionError(_) => ErrorKind::Completion,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::NoJsonFound { .. } => ErrorKind::NoJsonFound,
            Self::MalformedJson { .. } => ErrorKind::MalformedJson,
            Self::SchemaValidation { .. } => ErrorKind::SchemaValidation,
            Self::ConfigError(_) | Self::TomlParsing(_) => ErrorKind::Config,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Raw model text attached to response-validation failures
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::NoJsonFound { raw }
            | Self::MalformedJson { raw, .. }
            | Self::SchemaValidation { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
