//! Link configuration
//!
//! Everything the host needs to bring the link up: which port, the line
//! settings, and how long the board takes to boot after the port opens.
//!
//! With the `toml` feature the configuration can be read from a document
//! such as:
//! ```toml
//! port = "/dev/ttyACM0"
//! boot_delay_ms = 1000
//!
//! [serial]
//! baudrate = 115200
//! parity = "none"
//! ```
//! Missing keys keep their defaults.

use heapless::String;

use crate::gate::DEFAULT_BOOT_DELAY_MS;
use crate::traits::SerialConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum port name length
pub const MAX_PORT_NAME_LEN: usize = 64;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML document could not be parsed
    TomlParse,
    /// Port name longer than [`MAX_PORT_NAME_LEN`]
    PortNameTooLong,
    /// No port name given
    EmptyPortName,
    /// Baud rate of zero
    InvalidBaudRate,
}

/// Serial link configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Port name (e.g. `/dev/ttyACM0`, `COM3`)
    pub port: String<MAX_PORT_NAME_LEN>,
    /// Line settings
    pub serial: SerialConfig,
    /// Delay between opening the port and the first packet (ms)
    pub boot_delay_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            serial: SerialConfig::default(),
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
        }
    }
}

impl LinkConfig {
    /// Default configuration for `port` at `baudrate`
    pub fn new(port: &str, baudrate: u32) -> Result<Self, ConfigError> {
        let mut name = String::new();
        name.push_str(port).map_err(|_| ConfigError::PortNameTooLong)?;

        Ok(Self {
            port: name,
            serial: SerialConfig::with_baudrate(baudrate),
            ..Self::default()
        })
    }

    /// Check that the configuration can open a link
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.is_empty() {
            return Err(ConfigError::EmptyPortName);
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::InvalidBaudRate);
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: LinkConfig = toml::from_str(input).map_err(|_| ConfigError::TomlParse)?;
        config.validate()?;
        Ok(config)
    }
}
