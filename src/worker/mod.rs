// Worker module: per-message processing and the queue poll loop.

pub mod clock;
pub mod poll_loop;
pub mod processor;

pub use clock::{Clock, SystemClock};
pub use poll_loop::{CycleOutcome, LoopSettings, PollLoop};
pub use processor::{AckReason, Disposition, JobProcessor, RetainReason};
