use crate::error::PipelineError;

/// Callback invoked once per presented frame with the frame timestamp in ms.
pub type FrameTick = Box<dyn FnMut(f64)>;

/// Cancellation token for one scheduled loop. Never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn new(raw: u64) -> Self {
        FrameToken(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Drives a tick on every display frame until cancelled.
///
/// The scheduler re-arms the tick itself after each invocation; `cancel`
/// must guarantee the tick never runs again once it returns.
pub trait FrameScheduler {
    fn start(&self, tick: FrameTick) -> Result<FrameToken, PipelineError>;
    fn cancel(&self, token: FrameToken);
    /// False once the loop was cancelled or stopped on its own.
    fn is_active(&self, token: FrameToken) -> bool;
}
