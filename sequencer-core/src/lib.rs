//! Host-side engine for the sequencer serial link
//!
//! This crate plays motion sequences on an Arduino-class controller:
//!
//! - Collaborator traits (serial transport, sequence, event observer)
//! - Boot gate that holds transmission while the board resets
//! - Streaming state machine (stream / immediate sessions, flow control)
//! - Link configuration
//!
//! Wire encoding and decoding live in `sequencer-protocol`.
//!
//! # Features
//!
//! - `defmt` / `log`: logging backend (`defmt` wins if both are on)
//! - `serde`: derives on the configuration types
//! - `toml`: `LinkConfig::from_toml`; always enabled for this crate's tests
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = Engine::new(port, |event| handle(event));
//! engine.open_transport("/dev/ttyACM0", &SerialConfig::default(), now_ms())?;
//! engine.start_stream(&mut sequence, false)?;
//!
//! loop {
//!     engine.poll(now_ms());
//!     let n = read_port(&mut buf);
//!     engine.on_bytes_received(&buf[..n]);
//! }
//! ```

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod traits;

#[cfg(test)]
mod mock;

pub use config::{ConfigError, LinkConfig};
pub use engine::{Engine, EngineEvent, EngineResult, Mode, StreamError};
pub use error::{EngineError, InvalidOperation};
pub use gate::{BootGate, DEFAULT_BOOT_DELAY_MS};
pub use traits::{EngineObserver, PointList, Sequence, SerialConfig, SerialTransport};

pub use sequencer_protocol as protocol;
pub use sequencer_protocol::{DebugMessage, SequencePoint};
