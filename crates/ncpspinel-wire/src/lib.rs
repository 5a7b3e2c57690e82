//! Spinel wire primitives for talking to a network co-processor.
//!
//! Every frame exchanged with the co-processor has the shape:
//! - A 1-byte header carrying the flag bits, the interface id and the
//!   transaction id
//! - A packed command id
//! - A packed property key (property commands only)
//! - A payload whose meaning depends on the command and key
//!
//! Frames are encoded into a bounded buffer: an encode either produces a
//! complete frame or leaves the buffer empty.

pub mod codec;
pub mod command;
pub mod error;
pub mod header;
pub mod pack;
pub mod property;
pub mod status;

pub use codec::{decode_frame, encode_frame, Frame, DEFAULT_MAX_FRAME_SIZE};
pub use command::CommandId;
pub use error::{Result, WireError};
pub use header::{Header, Iid, Tid, TID_COUNT};
pub use pack::{Decoder, Encoder};
pub use property::PropertyKey;
pub use status::Status;
