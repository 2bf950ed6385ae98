use thiserror::Error;

use crate::media::types::MediaKind;

/// Main error type for the clipmerge library
#[derive(Error, Debug)]
pub enum MergerError {
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Timeline construction errors
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("No {kind} track in source: {path}")]
    MissingTrack { kind: MediaKind, path: String },

    #[error("Invalid composition parameters: {details}")]
    InvalidParameters { details: String },
}

/// Metadata probing errors
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to probe media file: {path}")]
    ProbeFailed { path: String },

    #[error("ffprobe not found on PATH")]
    ProberUnavailable,

    #[error("Malformed probe output for {path}: {reason}")]
    MalformedOutput { path: String, reason: String },

    #[error("Source has no usable duration: {path}")]
    MissingDuration { path: String },
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("ffmpeg not found on PATH")]
    EngineUnavailable,

    #[error("Export failed: {reason}")]
    ExportFailed { reason: String },

    #[error("Invalid export settings: {details}")]
    InvalidSettings { details: String },
}

/// Media library errors
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Library access not authorized")]
    NotAuthorized,

    #[error("Failed to import into library: {path} - {reason}")]
    ImportFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using MergerError
pub type Result<T> = std::result::Result<T, MergerError>;

impl MergerError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // Probing might work on retry once the file is fully written
            Self::Probe(ProbeError::ProbeFailed { .. }) => true,
            // Authorization can be granted later
            Self::Library(LibraryError::NotAuthorized) => true,
            // Most other errors are permanent
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeline(TimelineError::MissingTrack { kind, path }) => {
                format!("'{}' has no {} track and cannot be merged.", path, kind)
            }
            Self::Probe(ProbeError::ProberUnavailable) => {
                "ffprobe was not found. Please install FFmpeg.".to_string()
            }
            Self::Export(ExportError::EngineUnavailable) => {
                "ffmpeg was not found. Please install FFmpeg.".to_string()
            }
            Self::Library(LibraryError::NotAuthorized) => {
                "Saving to the media library was not authorized.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_track_message() {
        let err = MergerError::from(TimelineError::MissingTrack {
            kind: MediaKind::Video,
            path: "clip.mov".to_string(),
        });
        assert!(err.user_message().contains("no video track"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(MergerError::Library(LibraryError::NotAuthorized).is_recoverable());
        assert!(!MergerError::Export(ExportError::EngineUnavailable).is_recoverable());
    }
}
