use ncpspinel_wire::{Iid, DEFAULT_MAX_FRAME_SIZE};
use serde::{Deserialize, Serialize};

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NcpConfig {
    /// Spinel interface id placed in every outgoing header. Incoming frames
    /// for other interfaces are ignored.
    #[serde(with = "iid_serde")]
    pub iid: Iid,
    /// Maximum encoded frame size in bytes, between [`MIN_FRAME_SIZE`] and
    /// [`MAX_FRAME_SIZE`].
    #[serde(deserialize_with = "deserialize_frame_size")]
    pub max_frame_size: usize,
}

/// Smallest frame limit that fits a header, a command, a property key and
/// a one-byte value.
pub const MIN_FRAME_SIZE: usize = 8;

/// Largest frame the 2-byte length prefix can carry.
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize;

fn deserialize_frame_size<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<usize, D::Error> {
    use serde::de::Error as _;

    let size = usize::deserialize(deserializer)?;
    if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&size) {
        return Err(D::Error::custom(format!(
            "max_frame_size must be between {MIN_FRAME_SIZE} and {MAX_FRAME_SIZE}, got {size}"
        )));
    }
    Ok(size)
}

impl Default for NcpConfig {
    fn default() -> Self {
        Self {
            iid: Iid::default(),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

mod iid_serde {
    use ncpspinel_wire::Iid;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(iid: &Iid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(iid.get())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Iid, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Iid::try_from(raw).map_err(D::Error::custom)
    }
}
