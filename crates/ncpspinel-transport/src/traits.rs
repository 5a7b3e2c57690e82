use crate::error::Result;

/// Outbound half of the transport: accepts whole frames.
pub trait SpinelInterface {
    /// Hand one complete frame to the transport.
    ///
    /// The slice is only borrowed for the duration of the call.
    fn send_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Version string reported by the co-processor, if known.
    fn coprocessor_version(&self) -> &str {
        ""
    }
}

impl<T: SpinelInterface + ?Sized> SpinelInterface for Box<T> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send_frame(frame)
    }

    fn coprocessor_version(&self) -> &str {
        (**self).coprocessor_version()
    }
}

/// What the transport should do with a frame after delivering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    /// The frame was consumed.
    Handled,
    /// Keep the frame and replay it later through
    /// [`FrameHandler::handle_saved_frame`].
    Save,
}

/// Inbound half of the transport: receives whole frames.
pub trait FrameHandler {
    /// Called once per decoded frame. `header` is the frame's first byte.
    fn handle_received_frame(&mut self, frame: &[u8], header: u8) -> FrameDisposition;

    /// Called for frames previously answered with [`FrameDisposition::Save`].
    fn handle_saved_frame(&mut self, frame: &[u8]);
}
