/// Errors that can occur while packing or unpacking Spinel frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// A write would grow the frame past its fixed capacity.
    #[error("frame buffer full ({needed} bytes needed, capacity {capacity})")]
    BufferFull { needed: usize, capacity: usize },

    /// The input ended before a complete value could be read.
    #[error("truncated input ({needed} bytes needed, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },

    /// The header byte does not carry the Spinel flag pattern.
    #[error("invalid spinel header 0x{0:02X}")]
    InvalidHeader(u8),

    /// Interface ids are two bits wide.
    #[error("invalid interface id {0} (max 3)")]
    InvalidInterfaceId(u8),

    /// A packed unsigned integer does not fit the four-byte encoding.
    #[error("packed uint overflow")]
    PackedUintOverflow,

    /// A length-prefixed data field exceeds the 16-bit length prefix.
    #[error("data field too long ({0} bytes, max 65535)")]
    DataTooLong(usize),

    /// A string field is not valid UTF-8.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// A string field has no NUL terminator.
    #[error("string field missing NUL terminator")]
    MissingTerminator,
}

pub type Result<T> = std::result::Result<T, WireError>;
