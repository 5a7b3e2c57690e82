//! The Spinel header byte.
//!
//! ```text
//! ┌───────┬───────┬───────────────┐
//! │ 7   6 │ 5   4 │ 3   2   1   0 │
//! │ 1   0 │  IID  │      TID      │
//! └───────┴───────┴───────────────┘
//! ```

use std::fmt;

use crate::error::{Result, WireError};

/// Fixed flag pattern carried in the two high bits of every header.
pub const HEADER_FLAG: u8 = 0x80;

const FLAG_MASK: u8 = 0xC0;
const IID_SHIFT: u8 = 4;
const IID_MASK: u8 = 0x30;
const TID_MASK: u8 = 0x0F;

/// Size of the transaction id space, including the reserved id 0.
pub const TID_COUNT: usize = 16;

/// Transaction id correlating a command with its response.
///
/// Id 0 is reserved for unsolicited notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(u8);

impl Tid {
    /// The id carried by unsolicited frames.
    pub const NOTIFICATION: Tid = Tid(0);

    /// Create a transaction id, rejecting values outside the 4-bit field.
    pub fn new(value: u8) -> Option<Self> {
        (usize::from(value) < TID_COUNT).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Index into tables sized by [`TID_COUNT`].
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_notification(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spinel interface id (0..=3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Iid(u8);

impl Iid {
    pub const MAX: u8 = 3;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Iid {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value).ok_or(WireError::InvalidInterfaceId(value))
    }
}

impl From<Iid> for u8 {
    fn from(iid: Iid) -> Self {
        iid.0
    }
}

impl fmt::Display for Iid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header(u8);

impl Header {
    pub fn new(iid: Iid, tid: Tid) -> Self {
        Self(HEADER_FLAG | (iid.0 << IID_SHIFT) | tid.0)
    }

    /// Parse a raw header byte, checking the flag pattern.
    pub fn parse(byte: u8) -> Result<Self> {
        if byte & FLAG_MASK != HEADER_FLAG {
            return Err(WireError::InvalidHeader(byte));
        }
        Ok(Self(byte))
    }

    pub fn tid(self) -> Tid {
        Tid(self.0 & TID_MASK)
    }

    pub fn iid(self) -> Iid {
        Iid((self.0 & IID_MASK) >> IID_SHIFT)
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_packs_iid_and_tid() {
        let header = Header::new(Iid::new(2).unwrap(), Tid::new(9).unwrap());
        assert_eq!(header.as_u8(), 0x80 | 0x20 | 0x09);
        assert_eq!(header.iid().get(), 2);
        assert_eq!(header.tid().get(), 9);
    }

    #[test]
    fn parse_rejects_missing_flag() {
        assert_eq!(Header::parse(0x01), Err(WireError::InvalidHeader(0x01)));
        assert_eq!(Header::parse(0xC1), Err(WireError::InvalidHeader(0xC1)));
        assert!(Header::parse(0x81).is_ok());
    }

    #[test]
    fn tid_range_is_four_bits() {
        assert!(Tid::new(15).is_some());
        assert!(Tid::new(16).is_none());
        assert!(Tid::NOTIFICATION.is_notification());
    }

    #[test]
    fn iid_range_is_two_bits() {
        assert!(Iid::new(3).is_some());
        assert_eq!(Iid::try_from(4), Err(WireError::InvalidInterfaceId(4)));
    }
}
