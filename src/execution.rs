//! Execution domain: frames, queue entries, tasks and the scheduler that drains them.

pub mod callback;
pub mod context;
pub mod frame;
pub mod profiler;
pub mod task;

pub use callback::{CommandOutcome, ReturnCallback};
pub use context::{run_in_new_context, ExecutionContext, RunOutcome, MAX_QUEUE_ENTRIES};
pub use frame::{Depth, Frame, FrameControl};
pub use profiler::{InactiveProfiler, Profiler, SectionProfiler, SectionTiming};
pub use task::{QueueEntry, Task};
