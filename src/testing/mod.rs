//! Testing utilities
//!
//! [`RecordingMessenger`] stands in for the Bot API: it accepts every
//! outbound operation, assigns message ids, and keeps an ordered log that
//! tests assert against.

pub mod recorder;

pub use recorder::{Outbound, RecordingMessenger};
