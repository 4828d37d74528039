use std::path::PathBuf;

/// Errors that can occur while opening or configuring a serial line.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The device file could not be opened read-write.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A termios attribute call failed after the device was opened.
    #[error("failed to configure line ({step}): {source}")]
    Configuration {
        step: &'static str,
        source: std::io::Error,
    },

    /// An argument was rejected before touching the operating system.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O error occurred on an open line.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LineError {
    pub(crate) fn configuration(step: &'static str) -> Self {
        Self::Configuration {
            step,
            source: std::io::Error::last_os_error(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LineError>;
