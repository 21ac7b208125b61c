//! Platform abstraction layer
//!
//! Hosts plug in here for:
//! - Keyboard polling ([`InputSource`])
//! - Time ([`Clock`])

pub mod input;
pub mod time;

pub use input::{InputSource, Key, KeyEdgeTracker, ScriptedInput};
pub use time::{Clock, ManualClock, SystemClock};
