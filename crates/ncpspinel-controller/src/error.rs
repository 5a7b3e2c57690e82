use ncpspinel_transport::TransportError;
use ncpspinel_wire::{Status, WireError};

use crate::registry::Operation;

/// Errors reported by the controller, either synchronously or through a
/// completed [`AsyncTask`](crate::AsyncTask).
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// An operation of the same kind is already pending.
    #[error("{operation} already in progress")]
    Busy { operation: Operation },

    /// Every assignable transaction id is in use.
    #[error("no free transaction id")]
    ResourceExhausted,

    /// The command could not be encoded within the frame limit.
    #[error("failed to encode frame: {0}")]
    Encode(#[source] WireError),

    /// The transport refused the frame.
    #[error("transport rejected frame: {0}")]
    Transport(#[from] TransportError),

    /// The co-processor reported a command failure.
    #[error("co-processor reported {status}")]
    Remote { status: Status },

    /// A response for a pending transaction carried a command with no
    /// property key.
    #[error("unexpected {command} response")]
    UnexpectedResponse { command: &'static str },

    /// A response for a pending transaction could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(#[source] WireError),

    /// The controller has not been initialised, or was deinitialised.
    #[error("controller not initialized")]
    NotInitialized,

    /// The controller was torn down while the operation was pending.
    #[error("operation aborted")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, ControllerError>;
