//! Serial transport abstraction
//!
//! The engine never reads from the port itself. The host forwards received
//! bytes to [`Engine::on_bytes_received`](crate::engine::Engine::on_bytes_received)
//! and device errors to
//! [`Engine::on_transport_error`](crate::engine::Engine::on_transport_error).

use core::fmt::{Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serial port the engine writes packets to
pub trait SerialTransport {
    /// Error reported by the port; its `Display` text is shown to the user
    type Error: Debug + Display;

    /// Open `port` with the given line settings
    fn open(&mut self, port: &str, config: &SerialConfig) -> Result<(), Self::Error>;

    /// Close the port. Closing a closed port is a no-op.
    fn close(&mut self);

    /// Whether the port is currently open
    fn is_open(&self) -> bool;

    /// Reset any sticky error state after closing
    fn clear_error(&mut self) {}

    /// Queue `data` for transmission
    ///
    /// Returns the number of bytes accepted, which may be less than
    /// `data.len()`.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;
}

/// Serial line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl SerialConfig {
    /// Default 8N1 settings at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopBits {
    One,
    Two,
}
