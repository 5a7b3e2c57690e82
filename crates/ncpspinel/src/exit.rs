use std::fmt;
use std::io;

use ncpspinel_controller::ControllerError;
use ncpspinel_transport::TransportError;
use ncpspinel_wire::WireError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const REMOTE_STATUS: i32 = 70;
pub const BUSY: i32 = 75;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        TransportError::Timeout => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
        TransportError::PathTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn controller_error(context: &str, err: ControllerError) -> CliError {
    match err {
        ControllerError::Transport(err) => transport_error(context, err),
        ControllerError::Busy { .. } | ControllerError::ResourceExhausted => {
            CliError::new(BUSY, format!("{context}: {err}"))
        }
        ControllerError::Remote { .. } => CliError::new(REMOTE_STATUS, format!("{context}: {err}")),
        ControllerError::Encode(_)
        | ControllerError::MalformedResponse(_)
        | ControllerError::UnexpectedResponse { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use ncpspinel_controller::registry::Operation;
    use ncpspinel_wire::Status;

    use super::*;

    #[test]
    fn controller_outcomes_map_to_distinct_codes() {
        let busy = ControllerError::Busy {
            operation: Operation::ThreadSetEnabled,
        };
        assert_eq!(controller_error("thread", busy).code, BUSY);

        let remote = ControllerError::Remote {
            status: Status::InvalidState,
        };
        let err = controller_error("thread", remote);
        assert_eq!(err.code, REMOTE_STATUS);
        assert!(err.message.contains("INVALID_STATE"));

        let timeout = ControllerError::Transport(TransportError::Timeout);
        assert_eq!(controller_error("thread", timeout).code, TIMEOUT);
        assert_eq!(controller_error("thread", ControllerError::Aborted).code, INTERNAL);
    }

    #[test]
    fn missing_socket_is_a_plain_failure() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(io_error("connect failed", err).code, FAILURE);
    }
}
