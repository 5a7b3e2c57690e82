//! Host-side controller for Spinel network co-processors.
//!
//! # Crate Structure
//!
//! - [`wire`]: header byte, byte packing and the bounded frame codec
//! - [`transport`]: the frame-level interface to the co-processor, plus a
//!   length-prefixed stream adapter
//! - [`controller`]: transaction correlation, lifecycle operations and
//!   property decoding

/// Re-export wire types.
pub mod wire {
    pub use ncpspinel_wire::*;
}

/// Re-export transport types.
pub mod transport {
    pub use ncpspinel_transport::*;
}

/// Re-export controller types.
pub mod controller {
    pub use ncpspinel_controller::*;
}

pub use ncpspinel_controller::{AsyncTask, ControllerError, DeviceRole, NcpConfig, NcpSpinel};
