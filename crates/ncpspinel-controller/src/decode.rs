//! Per-property decoding of `VALUE_IS` payloads.

use ncpspinel_wire::property::{PROP_LAST_STATUS, PROP_NET_ROLE};
use ncpspinel_wire::{Decoder, PropertyKey, Status, WireError};

use crate::observer::DeviceRole;

/// A property value the controller knows how to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Role(DeviceRole),
    LastStatus(Status),
}

/// Decode the payload of `key`.
///
/// Returns `Ok(None)` for keys this controller does not interpret.
pub fn decode_value_is(key: PropertyKey, payload: &[u8]) -> Result<Option<PropertyValue>, WireError> {
    let mut decoder = Decoder::new(payload);
    let value = match key {
        PROP_LAST_STATUS => PropertyValue::LastStatus(decode_status(&mut decoder)?),
        PROP_NET_ROLE => PropertyValue::Role(DeviceRole::from_spinel(decoder.read_u8()?)),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Decode a `LAST_STATUS` payload.
pub fn decode_status(decoder: &mut Decoder<'_>) -> Result<Status, WireError> {
    decoder.read_uint_packed().map(Status::from)
}

#[cfg(test)]
mod tests {
    use ncpspinel_wire::property::PROP_NET_STACK_UP;

    use super::*;

    #[test]
    fn role_payload() {
        assert_eq!(
            decode_value_is(PROP_NET_ROLE, &[3]),
            Ok(Some(PropertyValue::Role(DeviceRole::Leader)))
        );
    }

    #[test]
    fn status_payload_is_packed() {
        assert_eq!(
            decode_value_is(PROP_LAST_STATUS, &[0x72]),
            Ok(Some(PropertyValue::LastStatus(Status::Reset(2))))
        );
        assert_eq!(
            decode_value_is(PROP_LAST_STATUS, &[0x81, 0x01]),
            Ok(Some(PropertyValue::LastStatus(Status::Unknown(129))))
        );
    }

    #[test]
    fn empty_payload_is_malformed() {
        assert!(matches!(
            decode_value_is(PROP_NET_ROLE, &[]),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn uninterpreted_keys_are_skipped() {
        assert_eq!(decode_value_is(PROP_NET_STACK_UP, &[1]), Ok(None));
        assert_eq!(decode_value_is(0x7777, &[]), Ok(None));
    }
}
