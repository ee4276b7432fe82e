//! Error types shared across Clipper crates.

/// Top-level error type for Clipper operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipperError {
    /// The requested device is missing or cannot be opened. Callers may
    /// retry with the platform default.
    #[error("Device unavailable: {message}")]
    DeviceUnavailable { message: String },

    /// The user declined capture access.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// The platform recorder reported a fault mid-session.
    #[error("Recording error: {message}")]
    Recording { message: String },

    #[error("Recording stopped before any data was captured")]
    EmptySession,

    #[error("A recording session is already active")]
    AlreadyRecording,

    #[error("No recording session is active")]
    NotRecording,

    #[error("No live capture stream")]
    NoLiveStream,

    #[error("Cannot switch {device} while recording")]
    SwitchWhileRecording { device: String },

    #[error("Control not available: {control}")]
    ControlUnavailable { control: String },

    #[error("Transport payload error: {message}")]
    Transport { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ClipperError.
pub type ClipperResult<T> = Result<T, ClipperError>;

impl ClipperError {
    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn recording(msg: impl Into<String>) -> Self {
        Self::Recording {
            message: msg.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the orchestration layer can degrade instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnavailable { .. } | Self::EmptySession | Self::Recording { .. }
        )
    }
}
