//! Serial link engine
//!
//! Drives a sequence over the link in one of two mutually exclusive modes
//! and reports what the device sends back.

pub mod events;
pub mod machine;
pub mod session;


pub use events::{EngineEvent, StreamError};
pub use machine::{Engine, EngineResult};
pub use session::Mode;
