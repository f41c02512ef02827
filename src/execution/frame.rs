//! Call-stack frames for nested invocations.

use super::callback::ReturnCallback;
use super::context::ExecutionContext;

/// Nesting level of an invocation. Root frames sit at depth 0.
pub type Depth = usize;

/// Discard capability carried by a frame.
///
/// Resolved against the owning context when invoked, so frames stay plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Top-level frame: clear everything outstanding.
    DiscardAll,
    /// Nested frame: drop queued entries at this depth or deeper.
    DiscardAtDepthOrHigher(Depth),
}

impl FrameControl {
    pub fn discard(self, context: &mut ExecutionContext) {
        match self {
            FrameControl::DiscardAll => context.clear_queue(),
            FrameControl::DiscardAtDepthOrHigher(depth) => {
                context.discard_at_depth_or_higher(depth)
            }
        }
    }
}

/// One level of nested invocation
#[derive(Debug, Clone)]
pub struct Frame {
    depth: Depth,
    return_callback: ReturnCallback,
    control: FrameControl,
}

impl Frame {
    pub fn new(depth: Depth, return_callback: ReturnCallback, control: FrameControl) -> Self {
        Self {
            depth,
            return_callback,
            control,
        }
    }

    /// Frame for a new invocation requested from `context`'s current position.
    ///
    /// An idle context yields a depth-0 frame whose discard clears the whole
    /// queue. A draining context yields a frame one level below the executing
    /// entry whose discard only cancels that invocation's own descendants.
    pub fn create_child(context: &ExecutionContext, return_callback: ReturnCallback) -> Self {
        let current = context.current_frame_depth();
        if current == 0 {
            return Self::new(0, return_callback, FrameControl::DiscardAll);
        }
        let depth = current + 1;
        Self::new(depth, return_callback, context.frame_control_for_depth(depth))
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn control(&self) -> FrameControl {
        self.control
    }

    pub fn return_callback(&self) -> &ReturnCallback {
        &self.return_callback
    }

    pub fn return_success(&self, value: i32) {
        self.return_callback.on_success(value);
    }

    pub fn return_failure(&self) {
        self.return_callback.on_failure();
    }

    /// Cancel every not-yet-run entry belonging to this frame.
    pub fn discard(&self, context: &mut ExecutionContext) {
        self.control.discard(context);
    }
}
