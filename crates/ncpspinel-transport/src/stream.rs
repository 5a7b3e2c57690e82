//! Length-prefixed frame transport over a byte stream.
//!
//! ```text
//! ┌──────────────┬──────────────────────────┐
//! │ Length (2B)  │ Spinel frame             │
//! │ little-endian│ (header, command, ...)   │
//! └──────────────┴──────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::error::{Result, TransportError};
use crate::traits::{FrameDisposition, FrameHandler, SpinelInterface};

/// Size of the length prefix in front of every frame.
pub const LENGTH_PREFIX_SIZE: usize = 2;

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Configuration for the stream transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Maximum frame size in bytes (excluding the length prefix). Default: 2048.
    pub max_frame_size: usize,
    /// Read timeout for blocking reads.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking writes.
    pub write_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_frame_size: 2048,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Sends length-prefixed frames to any `Write` stream.
pub struct StreamInterface<W> {
    inner: W,
    buf: BytesMut,
    max_frame_size: usize,
    version: String,
}

impl<W: Write> StreamInterface<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, &TransportConfig::default())
    }

    pub fn with_config(inner: W, config: &TransportConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(LENGTH_PREFIX_SIZE + config.max_frame_size),
            max_frame_size: config.max_frame_size,
            version: String::new(),
        }
    }

    /// Record the version string reported by the co-processor.
    pub fn set_coprocessor_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<W: Write> SpinelInterface for StreamInterface<W> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        if frame.is_empty() {
            return Err(TransportError::EmptyFrame);
        }
        let len = u16::try_from(frame.len())
            .ok()
            .filter(|_| frame.len() <= self.max_frame_size)
            .ok_or(TransportError::FrameTooLarge {
                size: frame.len(),
                max: self.max_frame_size,
            })?;

        self.buf.clear();
        self.buf.put_u16_le(len);
        self.buf.put_slice(frame);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        trace!(len = frame.len(), "frame sent");

        self.flush()
    }

    fn coprocessor_version(&self) -> &str {
        &self.version
    }
}

/// Reads length-prefixed frames from any `Read` stream and delivers them
/// to a [`FrameHandler`].
///
/// Frames the handler asks to keep are queued until [`replay_saved`] is
/// called.
///
/// [`replay_saved`]: FrameReceiver::replay_saved
pub struct FrameReceiver<R> {
    inner: R,
    buf: BytesMut,
    max_frame_size: usize,
    saved: VecDeque<Bytes>,
}

impl<R: Read> FrameReceiver<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, &TransportConfig::default())
    }

    pub fn with_config(inner: R, config: &TransportConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_frame_size: config.max_frame_size,
            saved: VecDeque::new(),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(TransportError::Closed)` on EOF and
    /// `Err(TransportError::Timeout)` when the stream's read timeout fires.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = self.try_split_frame()? {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    return Err(TransportError::Timeout)
                }
                Err(err) => return Err(TransportError::Io(err)),
            };

            if read == 0 {
                return Err(TransportError::Closed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    fn try_split_frame(&mut self) -> Result<Option<Bytes>> {
        if self.buf.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }
        let len = usize::from(u16::from_le_bytes([self.buf[0], self.buf[1]]));
        if len > self.max_frame_size {
            return Err(TransportError::FrameTooLarge {
                size: len,
                max: self.max_frame_size,
            });
        }
        if self.buf.len() < LENGTH_PREFIX_SIZE + len {
            return Ok(None);
        }
        self.buf.advance(LENGTH_PREFIX_SIZE);
        Ok(Some(self.buf.split_to(len).freeze()))
    }

    /// Read one frame and hand it to `handler`.
    ///
    /// Empty frames are dropped with a warning.
    pub fn receive<H: FrameHandler + ?Sized>(&mut self, handler: &mut H) -> Result<()> {
        let frame = self.read_frame()?;
        let Some(&header) = frame.first() else {
            warn!("dropping empty frame");
            return Ok(());
        };
        if handler.handle_received_frame(&frame, header) == FrameDisposition::Save {
            debug!(len = frame.len(), "frame saved for replay");
            self.saved.push_back(frame);
        }
        Ok(())
    }

    /// Replay every saved frame through `handler`, oldest first.
    pub fn replay_saved<H: FrameHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let mut replayed = 0;
        while let Some(frame) = self.saved.pop_front() {
            handler.handle_saved_frame(&frame);
            replayed += 1;
        }
        replayed
    }

    /// Number of frames waiting for replay.
    pub fn saved_len(&self) -> usize {
        self.saved.len()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prefixed(frames: &[&[u8]]) -> Vec<u8> {
        let mut wire = Vec::new();
        for frame in frames {
            wire.extend_from_slice(&(frame.len() as u16).to_le_bytes());
            wire.extend_from_slice(frame);
        }
        wire
    }

    #[derive(Default)]
    struct Recorder {
        save: bool,
        received: Vec<Vec<u8>>,
        headers: Vec<u8>,
        replayed: Vec<Vec<u8>>,
    }

    impl FrameHandler for Recorder {
        fn handle_received_frame(&mut self, frame: &[u8], header: u8) -> FrameDisposition {
            self.received.push(frame.to_vec());
            self.headers.push(header);
            if self.save {
                FrameDisposition::Save
            } else {
                FrameDisposition::Handled
            }
        }

        fn handle_saved_frame(&mut self, frame: &[u8]) {
            self.replayed.push(frame.to_vec());
        }
    }

    #[test]
    fn send_frame_prefixes_length() {
        let mut interface = StreamInterface::new(Vec::new());
        interface.send_frame(&[0x81, 0x03, 0x42, 0x01]).unwrap();
        assert_eq!(
            interface.into_inner(),
            vec![0x04, 0x00, 0x81, 0x03, 0x42, 0x01]
        );
    }

    #[test]
    fn send_frame_rejects_oversized_and_empty() {
        let config = TransportConfig {
            max_frame_size: 4,
            ..TransportConfig::default()
        };
        let mut interface = StreamInterface::with_config(Vec::new(), &config);
        assert!(matches!(
            interface.send_frame(&[0x80; 5]),
            Err(TransportError::FrameTooLarge { size: 5, max: 4 })
        ));
        assert!(matches!(
            interface.send_frame(&[]),
            Err(TransportError::EmptyFrame)
        ));
        assert!(interface.get_ref().is_empty());
    }

    #[test]
    fn read_multiple_frames() {
        let wire = prefixed(&[b"\x80\x06\x43\x02", b"\x81\x06\x42\x01"]);
        let mut receiver = FrameReceiver::new(Cursor::new(wire));

        assert_eq!(receiver.read_frame().unwrap().as_ref(), b"\x80\x06\x43\x02");
        assert_eq!(receiver.read_frame().unwrap().as_ref(), b"\x81\x06\x42\x01");
        assert!(matches!(receiver.read_frame(), Err(TransportError::Closed)));
    }

    #[test]
    fn read_partial_frame_then_eof() {
        let mut wire = prefixed(&[b"\x80\x06\x43\x02"]);
        wire.truncate(4);
        let mut receiver = FrameReceiver::new(Cursor::new(wire));
        assert!(matches!(receiver.read_frame(), Err(TransportError::Closed)));
    }

    #[test]
    fn oversized_length_prefix_rejected() {
        let config = TransportConfig {
            max_frame_size: 8,
            ..TransportConfig::default()
        };
        let wire = vec![0xFF, 0x00];
        let mut receiver = FrameReceiver::with_config(Cursor::new(wire), &config);
        assert!(matches!(
            receiver.read_frame(),
            Err(TransportError::FrameTooLarge { size: 255, max: 8 })
        ));
    }

    #[test]
    fn receive_passes_header_byte() {
        let wire = prefixed(&[b"\x82\x06\x42\x01"]);
        let mut receiver = FrameReceiver::new(Cursor::new(wire));
        let mut handler = Recorder::default();

        receiver.receive(&mut handler).unwrap();
        assert_eq!(handler.headers, vec![0x82]);
        assert_eq!(receiver.saved_len(), 0);
    }

    #[test]
    fn saved_frames_are_replayed_in_order() {
        let wire = prefixed(&[b"\x80\x06\x43\x01", b"\x80\x06\x43\x02"]);
        let mut receiver = FrameReceiver::new(Cursor::new(wire));
        let mut handler = Recorder {
            save: true,
            ..Recorder::default()
        };

        receiver.receive(&mut handler).unwrap();
        receiver.receive(&mut handler).unwrap();
        assert_eq!(receiver.saved_len(), 2);

        assert_eq!(receiver.replay_saved(&mut handler), 2);
        assert_eq!(
            handler.replayed,
            vec![b"\x80\x06\x43\x01".to_vec(), b"\x80\x06\x43\x02".to_vec()]
        );
        assert_eq!(receiver.saved_len(), 0);
    }

    #[test]
    fn empty_frame_is_dropped() {
        let wire = prefixed(&[b""]);
        let mut receiver = FrameReceiver::new(Cursor::new(wire));
        let mut handler = Recorder::default();
        receiver.receive(&mut handler).unwrap();
        assert!(handler.received.is_empty());
    }
}
