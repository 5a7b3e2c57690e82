//! Spinel status codes reported through `PROP_LAST_STATUS`.

use std::fmt;

const STATUS_RESET_BEGIN: u32 = 112;
const STATUS_RESET_END: u32 = 127;

/// A status code decoded from a `LAST_STATUS` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failure,
    Unimplemented,
    InvalidArgument,
    InvalidState,
    InvalidCommand,
    InvalidInterface,
    InternalError,
    SecurityError,
    ParseError,
    InProgress,
    NoMem,
    Busy,
    PropNotFound,
    Dropped,
    Empty,
    CmdTooBig,
    NoAck,
    CcaFailure,
    Already,
    ItemNotFound,
    InvalidCommandForProp,
    /// The co-processor reset; the value is the reset reason offset.
    Reset(u8),
    Unknown(u32),
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    pub fn is_reset(self) -> bool {
        matches!(self, Status::Reset(_))
    }
}

impl From<u32> for Status {
    fn from(code: u32) -> Self {
        match code {
            0 => Status::Ok,
            1 => Status::Failure,
            2 => Status::Unimplemented,
            3 => Status::InvalidArgument,
            4 => Status::InvalidState,
            5 => Status::InvalidCommand,
            6 => Status::InvalidInterface,
            7 => Status::InternalError,
            8 => Status::SecurityError,
            9 => Status::ParseError,
            10 => Status::InProgress,
            11 => Status::NoMem,
            12 => Status::Busy,
            13 => Status::PropNotFound,
            14 => Status::Dropped,
            15 => Status::Empty,
            16 => Status::CmdTooBig,
            17 => Status::NoAck,
            18 => Status::CcaFailure,
            19 => Status::Already,
            20 => Status::ItemNotFound,
            21 => Status::InvalidCommandForProp,
            STATUS_RESET_BEGIN..=STATUS_RESET_END => {
                Status::Reset((code - STATUS_RESET_BEGIN) as u8)
            }
            other => Status::Unknown(other),
        }
    }
}

impl From<Status> for u32 {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => 0,
            Status::Failure => 1,
            Status::Unimplemented => 2,
            Status::InvalidArgument => 3,
            Status::InvalidState => 4,
            Status::InvalidCommand => 5,
            Status::InvalidInterface => 6,
            Status::InternalError => 7,
            Status::SecurityError => 8,
            Status::ParseError => 9,
            Status::InProgress => 10,
            Status::NoMem => 11,
            Status::Busy => 12,
            Status::PropNotFound => 13,
            Status::Dropped => 14,
            Status::Empty => 15,
            Status::CmdTooBig => 16,
            Status::NoAck => 17,
            Status::CcaFailure => 18,
            Status::Already => 19,
            Status::ItemNotFound => 20,
            Status::InvalidCommandForProp => 21,
            Status::Reset(offset) => STATUS_RESET_BEGIN + u32::from(offset),
            Status::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Failure => write!(f, "FAILURE"),
            Status::Unimplemented => write!(f, "UNIMPLEMENTED"),
            Status::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Status::InvalidState => write!(f, "INVALID_STATE"),
            Status::InvalidCommand => write!(f, "INVALID_COMMAND"),
            Status::InvalidInterface => write!(f, "INVALID_INTERFACE"),
            Status::InternalError => write!(f, "INTERNAL_ERROR"),
            Status::SecurityError => write!(f, "SECURITY_ERROR"),
            Status::ParseError => write!(f, "PARSE_ERROR"),
            Status::InProgress => write!(f, "IN_PROGRESS"),
            Status::NoMem => write!(f, "NOMEM"),
            Status::Busy => write!(f, "BUSY"),
            Status::PropNotFound => write!(f, "PROP_NOT_FOUND"),
            Status::Dropped => write!(f, "DROPPED"),
            Status::Empty => write!(f, "EMPTY"),
            Status::CmdTooBig => write!(f, "CMD_TOO_BIG"),
            Status::NoAck => write!(f, "NO_ACK"),
            Status::CcaFailure => write!(f, "CCA_FAILURE"),
            Status::Already => write!(f, "ALREADY"),
            Status::ItemNotFound => write!(f, "ITEM_NOT_FOUND"),
            Status::InvalidCommandForProp => write!(f, "INVALID_COMMAND_FOR_PROP"),
            Status::Reset(offset) => write!(f, "RESET({offset})"),
            Status::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_range_is_recognised() {
        assert_eq!(Status::from(112), Status::Reset(0));
        assert_eq!(Status::from(127), Status::Reset(15));
        assert!(Status::from(114).is_reset());
        assert_eq!(u32::from(Status::Reset(2)), 114);
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let status = Status::from(99);
        assert_eq!(status, Status::Unknown(99));
        assert_eq!(u32::from(status), 99);
        assert_eq!(status.to_string(), "UNKNOWN(99)");
    }

    #[test]
    fn known_codes_map_both_ways() {
        for code in 0..=21u32 {
            assert_eq!(u32::from(Status::from(code)), code);
        }
        assert!(Status::from(0).is_ok());
        assert_eq!(Status::from(4).to_string(), "INVALID_STATE");
    }
}
