use std::path::PathBuf;

/// Errors that can occur in the frame transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the co-processor bridge.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// A frame exceeds the configured maximum size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// A zero-length frame has no header byte.
    #[error("empty frame")]
    EmptyFrame,

    /// No frame arrived within the read timeout.
    #[error("timed out waiting for frame")]
    Timeout,

    /// The stream was closed by the peer.
    #[error("transport closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
