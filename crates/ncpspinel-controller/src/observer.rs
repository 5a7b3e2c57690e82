use std::fmt;

use ncpspinel_wire::property::{
    NET_ROLE_CHILD, NET_ROLE_DETACHED, NET_ROLE_DISABLED, NET_ROLE_LEADER, NET_ROLE_ROUTER,
};
use tracing::warn;

/// Role of the device in the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceRole {
    #[default]
    Disabled,
    Detached,
    Child,
    Router,
    Leader,
}

impl DeviceRole {
    /// Translate a wire role. Unknown values map to `Disabled`.
    pub fn from_spinel(role: u8) -> Self {
        match role {
            NET_ROLE_DETACHED => DeviceRole::Detached,
            NET_ROLE_CHILD => DeviceRole::Child,
            NET_ROLE_ROUTER => DeviceRole::Router,
            NET_ROLE_LEADER => DeviceRole::Leader,
            NET_ROLE_DISABLED => DeviceRole::Disabled,
            other => {
                warn!(role = other, "unsupported spinel net role");
                DeviceRole::Disabled
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceRole::Disabled => "disabled",
            DeviceRole::Detached => "detached",
            DeviceRole::Child => "child",
            DeviceRole::Router => "router",
            DeviceRole::Leader => "leader",
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives network properties reported by the co-processor.
pub trait PropsObserver {
    /// Called for every decoded role report, including repeats of the
    /// current role.
    fn set_device_role(&mut self, role: DeviceRole);
}

impl<F: FnMut(DeviceRole)> PropsObserver for F {
    fn set_device_role(&mut self, role: DeviceRole) {
        self(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_roles_translate() {
        assert_eq!(DeviceRole::from_spinel(0), DeviceRole::Detached);
        assert_eq!(DeviceRole::from_spinel(1), DeviceRole::Child);
        assert_eq!(DeviceRole::from_spinel(2), DeviceRole::Router);
        assert_eq!(DeviceRole::from_spinel(3), DeviceRole::Leader);
        assert_eq!(DeviceRole::from_spinel(4), DeviceRole::Disabled);
        assert_eq!(DeviceRole::from_spinel(77), DeviceRole::Disabled);
    }

    #[test]
    fn closures_observe_roles() {
        let mut seen = Vec::new();
        {
            let mut observer = |role: DeviceRole| seen.push(role);
            observer.set_device_role(DeviceRole::Leader);
        }
        assert_eq!(seen, vec![DeviceRole::Leader]);
    }
}
