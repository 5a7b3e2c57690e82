//! Byte-packing primitives used inside Spinel frames.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, WireError};

/// Largest value a four-byte packed uint can carry.
pub const MAX_PACKED_UINT: u32 = (1 << 28) - 1;

/// Writes packed values into a buffer without letting it grow past `limit`.
pub struct Encoder<'a> {
    buf: &'a mut BytesMut,
    limit: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut BytesMut, limit: usize) -> Self {
        Self { buf, limit }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self.buf.len() + additional;
        if needed > self.limit {
            return Err(WireError::BufferFull {
                needed,
                capacity: self.limit,
            });
        }
        self.buf.reserve(additional);
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?;
        self.buf.put_u8(value);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.reserve(2)?;
        self.buf.put_u16_le(value);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(4)?;
        self.buf.put_u32_le(value);
        Ok(())
    }

    /// Write a little-endian base-128 integer.
    pub fn write_uint_packed(&mut self, value: u32) -> Result<()> {
        if value > MAX_PACKED_UINT {
            return Err(WireError::PackedUintOverflow);
        }
        let mut scratch = [0u8; 4];
        let mut len = 0;
        let mut rest = value;
        loop {
            let byte = (rest & 0x7F) as u8;
            rest >>= 7;
            if rest == 0 {
                scratch[len] = byte;
                len += 1;
                break;
            }
            scratch[len] = byte | 0x80;
            len += 1;
        }
        self.reserve(len)?;
        self.buf.put_slice(&scratch[..len]);
        Ok(())
    }

    /// Write a data field prefixed by its 16-bit length.
    pub fn write_data_with_len(&mut self, data: &[u8]) -> Result<()> {
        let len = u16::try_from(data.len()).map_err(|_| WireError::DataTooLong(data.len()))?;
        self.reserve(2 + data.len())?;
        self.buf.put_u16_le(len);
        self.buf.put_slice(data);
        Ok(())
    }

    /// Write a trailing data field that runs to the end of the frame.
    pub fn write_data(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Write a NUL-terminated UTF-8 string.
    pub fn write_utf8(&mut self, value: &str) -> Result<()> {
        self.reserve(value.len() + 1)?;
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        Ok(())
    }
}

/// Reads packed values from a borrowed frame.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn require(&self, needed: usize) -> Result<()> {
        if self.data.len() < needed {
            return Err(WireError::Truncated {
                needed,
                remaining: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        Ok(self.data.get_u8())
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        Ok(self.data.get_u16_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        Ok(self.data.get_u32_le())
    }

    /// Read a little-endian base-128 integer of at most four bytes.
    pub fn read_uint_packed(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for (index, byte) in self.data.iter().copied().enumerate().take(4) {
            value |= u32::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                self.data.advance(index + 1);
                return Ok(value);
            }
        }
        if self.data.len() < 4 {
            return Err(WireError::Truncated {
                needed: self.data.len() + 1,
                remaining: self.data.len(),
            });
        }
        Err(WireError::PackedUintOverflow)
    }

    /// Read a data field prefixed by its 16-bit length.
    pub fn read_data_with_len(&mut self) -> Result<&'a [u8]> {
        let len = usize::from(self.read_u16()?);
        self.require(len)?;
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        Ok(head)
    }

    /// Read everything that is left.
    pub fn read_data(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.data)
    }

    /// Read a NUL-terminated UTF-8 string.
    pub fn read_utf8(&mut self) -> Result<&'a str> {
        let end = self
            .data
            .iter()
            .position(|&b| b == 0)
            .ok_or(WireError::MissingTerminator)?;
        let (text, tail) = self.data.split_at(end);
        let text = std::str::from_utf8(text).map_err(|_| WireError::InvalidUtf8)?;
        self.data = &tail[1..];
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(value: u32) -> Vec<u8> {
        let mut buf = BytesMut::new();
        Encoder::new(&mut buf, 16).write_uint_packed(value).unwrap();
        buf.to_vec()
    }

    #[test]
    fn packed_uint_encoding() {
        assert_eq!(packed(0), vec![0x00]);
        assert_eq!(packed(0x7F), vec![0x7F]);
        assert_eq!(packed(0x80), vec![0x80, 0x01]);
        assert_eq!(packed(0x1537), vec![0xB7, 0x2A]);
        assert_eq!(packed(MAX_PACKED_UINT), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn packed_uint_rejects_overflow() {
        let mut buf = BytesMut::new();
        let err = Encoder::new(&mut buf, 16)
            .write_uint_packed(MAX_PACKED_UINT + 1)
            .unwrap_err();
        assert_eq!(err, WireError::PackedUintOverflow);

        let mut decoder = Decoder::new(&[0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(decoder.read_uint_packed(), Err(WireError::PackedUintOverflow));
    }

    #[test]
    fn packed_uint_truncated() {
        let mut decoder = Decoder::new(&[0x80, 0x80]);
        assert!(matches!(
            decoder.read_uint_packed(),
            Err(WireError::Truncated { .. })
        ));
        assert!(matches!(
            Decoder::new(&[]).read_uint_packed(),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn encoder_respects_limit() {
        let mut buf = BytesMut::new();
        let mut encoder = Encoder::new(&mut buf, 3);
        encoder.write_u16(7).unwrap();
        let err = encoder.write_u16(8).unwrap_err();
        assert_eq!(
            err,
            WireError::BufferFull {
                needed: 4,
                capacity: 3
            }
        );
        assert_eq!(encoder.len(), 2);
    }

    #[test]
    fn mixed_fields_decode_in_order() {
        let mut buf = BytesMut::new();
        let mut encoder = Encoder::new(&mut buf, 64);
        encoder.write_bool(true).unwrap();
        encoder.write_u32(0xDEAD_BEEF).unwrap();
        encoder.write_data_with_len(b"abc").unwrap();
        encoder.write_utf8("ncp").unwrap();
        encoder.write_data(b"tail").unwrap();

        let mut decoder = Decoder::new(&buf);
        assert!(decoder.read_bool().unwrap());
        assert_eq!(decoder.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(decoder.read_data_with_len().unwrap(), b"abc");
        assert_eq!(decoder.read_utf8().unwrap(), "ncp");
        assert_eq!(decoder.read_data(), b"tail");
        assert!(decoder.is_empty());
    }

    #[test]
    fn string_without_terminator_is_rejected() {
        let mut decoder = Decoder::new(b"abc");
        assert_eq!(decoder.read_utf8(), Err(WireError::MissingTerminator));
    }

    #[test]
    fn data_with_len_truncated() {
        let mut decoder = Decoder::new(&[0x05, 0x00, 0x01]);
        assert_eq!(
            decoder.read_data_with_len(),
            Err(WireError::Truncated {
                needed: 5,
                remaining: 1
            })
        );
    }
}
