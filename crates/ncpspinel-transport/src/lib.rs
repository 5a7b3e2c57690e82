//! Frame-level transport interface to a Spinel co-processor.
//!
//! The controller never sees raw bytes on a wire. It hands whole frames to
//! a [`SpinelInterface`] and receives whole frames through a
//! [`FrameHandler`]. Escaping, checksums and link-level retransmission are
//! the business of whatever sits underneath.
//!
//! For hosts that reach the co-processor through a byte stream (a Unix
//! socket bridge, a pipe), [`stream`] provides a length-prefixed adapter.

pub mod error;
pub mod stream;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use stream::{FrameReceiver, StreamInterface, TransportConfig, LENGTH_PREFIX_SIZE};
pub use traits::{FrameDisposition, FrameHandler, SpinelInterface};
