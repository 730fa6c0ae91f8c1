//! Engine errors
//!
//! Only precondition violations and open failures are returned to the caller.
//! Problems that happen while a session runs (bad bytes, write failures,
//! device errors) are reported as [`StreamError`](crate::engine::StreamError)
//! events and never stop the session.

use core::fmt;

/// An operation was called in a state that does not allow it
///
/// The engine state is left untouched when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidOperation {
    /// A stream or immediate session is running
    SessionActive,
    /// No session is running
    NoSession,
    /// The running session is not a stream
    NotStreaming,
    /// The running session is not an immediate session
    NotImmediate,
    /// The transport is not open
    TransportClosed,
    /// The sequence has no points
    EmptySequence,
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidOperation::SessionActive => "a sequence is already being streamed",
            InvalidOperation::NoSession => "no sequence is being streamed",
            InvalidOperation::NotStreaming => "no sequence is being streamed in stream mode",
            InvalidOperation::NotImmediate => "no sequence is being played in immediate mode",
            InvalidOperation::TransportClosed => "the serial port is closed",
            InvalidOperation::EmptySequence => "the sequence has no points",
        };
        f.write_str(msg)
    }
}

/// Error returned by engine operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError<E> {
    /// Precondition violated, nothing changed
    InvalidOperation(InvalidOperation),
    /// The transport refused to open
    Open(E),
}

impl<E> EngineError<E> {
    /// Whether this is a precondition violation
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, EngineError::InvalidOperation(_))
    }
}

impl<E> From<InvalidOperation> for EngineError<E> {
    fn from(e: InvalidOperation) -> Self {
        EngineError::InvalidOperation(e)
    }
}

impl<E: fmt::Display> fmt::Display for EngineError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidOperation(op) => write!(f, "invalid operation: {}", op),
            EngineError::Open(e) => write!(f, "cannot open serial port: {}", e),
        }
    }
}
