//! Spinel property keys and the enumerations carried in their payloads.

/// A packed Spinel property key.
pub type PropertyKey = u32;

pub const PROP_LAST_STATUS: PropertyKey = 0;
pub const PROP_PROTOCOL_VERSION: PropertyKey = 1;
pub const PROP_NCP_VERSION: PropertyKey = 2;
pub const PROP_NET_IF_UP: PropertyKey = 0x41;
pub const PROP_NET_STACK_UP: PropertyKey = 0x42;
pub const PROP_NET_ROLE: PropertyKey = 0x43;
pub const PROP_NET_LEAVE_GRACEFULLY: PropertyKey = 0x4C;
pub const PROP_THREAD_ACTIVE_DATASET_TLVS: PropertyKey = 0x1537;

// Values of PROP_NET_ROLE.
pub const NET_ROLE_DETACHED: u8 = 0;
pub const NET_ROLE_CHILD: u8 = 1;
pub const NET_ROLE_ROUTER: u8 = 2;
pub const NET_ROLE_LEADER: u8 = 3;
pub const NET_ROLE_DISABLED: u8 = 4;

/// Returns a human-readable name for a property key.
pub fn property_name(key: PropertyKey) -> &'static str {
    match key {
        PROP_LAST_STATUS => "LAST_STATUS",
        PROP_PROTOCOL_VERSION => "PROTOCOL_VERSION",
        PROP_NCP_VERSION => "NCP_VERSION",
        PROP_NET_IF_UP => "NET_IF_UP",
        PROP_NET_STACK_UP => "NET_STACK_UP",
        PROP_NET_ROLE => "NET_ROLE",
        PROP_NET_LEAVE_GRACEFULLY => "NET_LEAVE_GRACEFULLY",
        PROP_THREAD_ACTIVE_DATASET_TLVS => "THREAD_ACTIVE_DATASET_TLVS",
        _ => "UNKNOWN",
    }
}
