//! Spinel command ids.

/// A packed Spinel command id.
pub type CommandId = u32;

pub const CMD_NOOP: CommandId = 0;
pub const CMD_RESET: CommandId = 1;
pub const CMD_PROP_VALUE_GET: CommandId = 2;
pub const CMD_PROP_VALUE_SET: CommandId = 3;
pub const CMD_PROP_VALUE_INSERT: CommandId = 4;
pub const CMD_PROP_VALUE_REMOVE: CommandId = 5;
pub const CMD_PROP_VALUE_IS: CommandId = 6;
pub const CMD_PROP_VALUE_INSERTED: CommandId = 7;
pub const CMD_PROP_VALUE_REMOVED: CommandId = 8;
pub const CMD_NET_SAVE: CommandId = 9;
pub const CMD_NET_CLEAR: CommandId = 10;
pub const CMD_NET_RECALL: CommandId = 11;

/// Returns a human-readable name for a command id.
pub fn command_name(id: CommandId) -> &'static str {
    match id {
        CMD_NOOP => "NOOP",
        CMD_RESET => "RESET",
        CMD_PROP_VALUE_GET => "PROP_VALUE_GET",
        CMD_PROP_VALUE_SET => "PROP_VALUE_SET",
        CMD_PROP_VALUE_INSERT => "PROP_VALUE_INSERT",
        CMD_PROP_VALUE_REMOVE => "PROP_VALUE_REMOVE",
        CMD_PROP_VALUE_IS => "PROP_VALUE_IS",
        CMD_PROP_VALUE_INSERTED => "PROP_VALUE_INSERTED",
        CMD_PROP_VALUE_REMOVED => "PROP_VALUE_REMOVED",
        CMD_NET_SAVE => "NET_SAVE",
        CMD_NET_CLEAR => "NET_CLEAR",
        CMD_NET_RECALL => "NET_RECALL",
        _ => "UNKNOWN",
    }
}

/// Returns true if frames with this command carry a property key.
pub fn has_property_key(id: CommandId) -> bool {
    (CMD_PROP_VALUE_GET..=CMD_PROP_VALUE_REMOVED).contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_commands_carry_a_key() {
        assert!(has_property_key(CMD_PROP_VALUE_SET));
        assert!(has_property_key(CMD_PROP_VALUE_IS));
        assert!(!has_property_key(CMD_NET_CLEAR));
        assert!(!has_property_key(CMD_RESET));
    }

    #[test]
    fn unknown_command_name() {
        assert_eq!(command_name(CMD_NET_CLEAR), "NET_CLEAR");
        assert_eq!(command_name(200), "UNKNOWN");
    }
}
