//! Collaborator traits
//!
//! These traits define the interface between the engine and the parts of
//! the host it does not own: the serial port, the sequence being played, and
//! whoever listens to engine events.

pub mod observer;
pub mod sequence;
pub mod transport;

pub use observer::EngineObserver;
pub use sequence::{PointList, Sequence};
pub use transport::{DataBits, Parity, SerialConfig, SerialTransport, StopBits};
