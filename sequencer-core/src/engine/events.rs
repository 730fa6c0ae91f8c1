//! Events reported to the host

use core::fmt;

use sequencer_protocol::DebugMessage;

/// Observable engine events
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineEvent<E> {
    /// A stream session sent its start packet and first point
    StreamStarted,
    /// A stream session ended, by request or at the end of the sequence
    StreamStopped,
    /// The device sent debug text
    DebugMessage(DebugMessage),
    /// Something went wrong on the link; the session keeps running
    StreamError(StreamError<E>),
}

impl<E> EngineEvent<E> {
    /// Check if this event reports an error
    pub fn is_error(&self) -> bool {
        matches!(self, EngineEvent::StreamError(_))
    }
}

/// Non-fatal link problems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamError<E> {
    /// The device sent a byte that does not start a known frame
    UnknownPacket(u8),
    /// The transport reported an error
    Device(E),
    /// Writing a packet failed
    Write(E),
    /// Only part of a packet was written
    ShortWrite { written: usize, expected: usize },
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::UnknownPacket(byte) => write!(
                f,
                "Received unknown or invalid packet type {} (ascii {:?})",
                byte,
                char::from(*byte)
            ),
            StreamError::Device(e) => write!(f, "Error streaming: {}", e),
            StreamError::Write(e) => write!(f, "Error writing data: {}", e),
            StreamError::ShortWrite { written, expected } => {
                write!(f, "Cannot write all data ({} of {} bytes)", written, expected)
            }
        }
    }
}
