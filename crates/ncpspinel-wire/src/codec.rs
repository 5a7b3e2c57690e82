use bytes::{Bytes, BytesMut};

use crate::command::{has_property_key, CommandId};
use crate::error::Result;
use crate::header::Header;
use crate::pack::{Decoder, Encoder};
use crate::property::PropertyKey;

/// Default maximum size of an encoded frame: 2 KiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 2048;

/// A decoded Spinel frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Header byte (flag, interface id, transaction id).
    pub header: Header,
    /// Command id.
    pub command: CommandId,
    /// Property key, present for property commands only.
    pub key: Option<PropertyKey>,
    /// Everything after the key.
    pub payload: Bytes,
}

impl Frame {
    /// Decoder over the payload.
    pub fn payload_decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.payload)
    }
}

/// Encode a frame into `dst`, never letting it exceed `max_frame_size`.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────────┬──────────────────┬─────────────────┐
/// │ Header   │ Command      │ Property key     │ Payload          │
/// │ (1B)     │ (packed uint)│ (packed uint,    │ (written by      │
/// │          │              │  optional)       │  `write_payload`)│
/// └──────────┴──────────────┴──────────────────┴─────────────────┘
/// ```
///
/// `dst` is cleared first. If any write fails, `dst` is left empty so a
/// partial frame can never be sent.
pub fn encode_frame<F>(
    dst: &mut BytesMut,
    max_frame_size: usize,
    header: Header,
    command: CommandId,
    key: Option<PropertyKey>,
    write_payload: F,
) -> Result<()>
where
    F: FnOnce(&mut Encoder<'_>) -> Result<()>,
{
    dst.clear();
    let result = {
        let mut encoder = Encoder::new(dst, max_frame_size);
        encode_parts(&mut encoder, header, command, key, write_payload)
    };
    if result.is_err() {
        dst.clear();
    }
    result
}

fn encode_parts<F>(
    encoder: &mut Encoder<'_>,
    header: Header,
    command: CommandId,
    key: Option<PropertyKey>,
    write_payload: F,
) -> Result<()>
where
    F: FnOnce(&mut Encoder<'_>) -> Result<()>,
{
    encoder.write_u8(header.as_u8())?;
    encoder.write_uint_packed(command)?;
    if let Some(key) = key {
        encoder.write_uint_packed(key)?;
    }
    write_payload(encoder)
}

/// Decode a complete frame as delivered by the transport.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    let mut decoder = Decoder::new(src);
    let header = Header::parse(decoder.read_u8()?)?;
    let command = decoder.read_uint_packed()?;
    let key = if has_property_key(command) {
        Some(decoder.read_uint_packed()?)
    } else {
        None
    };
    let payload = Bytes::copy_from_slice(decoder.read_data());
    Ok(Frame {
        header,
        command,
        key,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CMD_NET_CLEAR, CMD_PROP_VALUE_IS, CMD_PROP_VALUE_SET};
    use crate::error::WireError;
    use crate::header::{Iid, Tid};
    use crate::property::{PROP_NET_STACK_UP, PROP_THREAD_ACTIVE_DATASET_TLVS};

    fn header(tid: u8) -> Header {
        Header::new(Iid::default(), Tid::new(tid).unwrap())
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame(
            &mut buf,
            DEFAULT_MAX_FRAME_SIZE,
            header(3),
            CMD_PROP_VALUE_SET,
            Some(PROP_THREAD_ACTIVE_DATASET_TLVS),
            |enc| enc.write_data(b"\x0e\x08dataset"),
        )
        .unwrap();

        assert_eq!(&buf[..4], &[0x83, 0x03, 0xB7, 0x2A]);

        let frame = decode_frame(&buf).unwrap();
        assert_eq!(frame.header.tid().get(), 3);
        assert_eq!(frame.command, CMD_PROP_VALUE_SET);
        assert_eq!(frame.key, Some(PROP_THREAD_ACTIVE_DATASET_TLVS));
        assert_eq!(frame.payload.as_ref(), b"\x0e\x08dataset");
    }

    #[test]
    fn test_command_without_key() {
        let mut buf = BytesMut::new();
        encode_frame(
            &mut buf,
            DEFAULT_MAX_FRAME_SIZE,
            header(1),
            CMD_NET_CLEAR,
            None,
            |_| Ok(()),
        )
        .unwrap();
        assert_eq!(buf.as_ref(), &[0x81, 0x0A]);

        let frame = decode_frame(&buf).unwrap();
        assert_eq!(frame.command, CMD_NET_CLEAR);
        assert_eq!(frame.key, None);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_oversized_payload_leaves_buffer_empty() {
        let mut buf = BytesMut::new();
        let payload = vec![0xAA; DEFAULT_MAX_FRAME_SIZE];
        let err = encode_frame(
            &mut buf,
            DEFAULT_MAX_FRAME_SIZE,
            header(2),
            CMD_PROP_VALUE_SET,
            Some(PROP_THREAD_ACTIVE_DATASET_TLVS),
            |enc| enc.write_data(&payload),
        )
        .unwrap_err();

        assert!(matches!(err, WireError::BufferFull { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_exact_fit_is_accepted() {
        let mut buf = BytesMut::new();
        // header + command + key
        let overhead = 1 + 1 + 1;
        let payload = vec![0x01; 16 - overhead];
        encode_frame(
            &mut buf,
            16,
            header(2),
            CMD_PROP_VALUE_SET,
            Some(PROP_NET_STACK_UP),
            |enc| enc.write_data(&payload),
        )
        .unwrap();
        assert_eq!(buf.len(), 16);
    }

    #[test]
    fn test_decode_invalid_header() {
        let err = decode_frame(&[0x03, 0x06, 0x42, 0x01]).unwrap_err();
        assert_eq!(err, WireError::InvalidHeader(0x03));
    }

    #[test]
    fn test_decode_missing_key() {
        let err = decode_frame(&[0x80, CMD_PROP_VALUE_IS as u8]).unwrap_err();
        assert!(matches!(err, WireError::Truncated { .. }));
    }

    #[test]
    fn test_decode_empty_frame() {
        assert!(matches!(
            decode_frame(&[]),
            Err(WireError::Truncated { .. })
        ));
    }
}
