//! Device → host frame decoding
//!
//! The board answers with single-byte tokens and length-prefixed debug text:
//! - `N`: command queue has room, send the next point
//! - `F`: command queue is full, hold
//! - `D` + length (1 byte) + text: debug message
//!
//! Any other leading byte is reported and dropped, one byte at a time, until
//! the stream lines up with a known tag again. `N` and `F` are only tokens
//! while a stream session is running; otherwise they are unknown bytes.

use core::fmt;

use heapless::Vec;

/// Command queue has room
pub const TAG_QUEUE_READY: u8 = b'N';
/// Command queue is full
pub const TAG_QUEUE_FULL: u8 = b'F';
/// Debug message
pub const TAG_DEBUG: u8 = b'D';

/// Debug frame header (tag + length)
pub const DEBUG_HEADER_SIZE: usize = 2;

/// Maximum debug text length
pub const MAX_DEBUG_LEN: usize = 255;

/// Largest frame the device can send
pub const MAX_DEVICE_FRAME_SIZE: usize = DEBUG_HEADER_SIZE + MAX_DEBUG_LEN;

/// Incoming buffer capacity
pub const RX_BUFFER_SIZE: usize = 512;

// A decode pass must always be able to free room, so the buffer has to hold
// any complete frame with space to spare.
const _: () = assert!(RX_BUFFER_SIZE > MAX_DEVICE_FRAME_SIZE);

/// Debug text sent by the device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebugMessage {
    payload: Vec<u8, MAX_DEBUG_LEN>,
}

impl DebugMessage {
    /// Create a message from raw payload bytes
    ///
    /// Returns `None` if the payload is longer than [`MAX_DEBUG_LEN`].
    pub fn new(payload: &[u8]) -> Option<Self> {
        Some(Self {
            payload: Vec::from_slice(payload).ok()?,
        })
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the message carries no text
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Writes the text, replacing invalid UTF-8 with U+FFFD
impl fmt::Display for DebugMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.payload.utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

/// A classified frame from the device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceFrame {
    /// `N`: the device can take another point
    QueueReady,
    /// `F`: the device queue is saturated
    QueueFull,
    /// `D`: debug text
    DebugMessage(DebugMessage),
    /// Any byte that does not start a known frame
    UnknownByte(u8),
}

impl DeviceFrame {
    /// Encode this frame as the device would send it
    pub fn encode(&self) -> Vec<u8, MAX_DEVICE_FRAME_SIZE> {
        let mut out = Vec::new();
        // Every frame is at most MAX_DEVICE_FRAME_SIZE bytes
        match self {
            DeviceFrame::QueueReady => {
                let _ = out.push(TAG_QUEUE_READY);
            }
            DeviceFrame::QueueFull => {
                let _ = out.push(TAG_QUEUE_FULL);
            }
            DeviceFrame::DebugMessage(msg) => {
                let _ = out.extend_from_slice(&[TAG_DEBUG, msg.len() as u8]);
                let _ = out.extend_from_slice(msg.as_bytes());
            }
            DeviceFrame::UnknownByte(byte) => {
                let _ = out.push(*byte);
            }
        }
        out
    }
}

/// Incremental decoder over an append-only receive buffer
///
/// Bytes are appended with [`push`](Self::push) as they arrive and complete
/// frames are taken from the head with [`next_frame`](Self::next_frame).
/// A frame split across reads stays buffered until its last byte arrives.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8, RX_BUFFER_SIZE>,
}

impl FrameDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Drop all buffered bytes
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Free space in the buffer
    pub fn available(&self) -> usize {
        RX_BUFFER_SIZE - self.buffer.len()
    }

    /// Append received bytes
    ///
    /// Returns how many bytes were taken. Bytes that do not fit must be
    /// pushed again after frames have been drained.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.available());
        // n never exceeds the free space
        let _ = self.buffer.extend_from_slice(&bytes[..n]);
        n
    }

    /// Take the next complete frame from the head of the buffer
    ///
    /// `flow_control` selects whether `N` and `F` are tokens (stream session
    /// running) or unknown bytes. Returns `None` when the buffer is empty or
    /// its head is a frame that still needs more bytes.
    pub fn next_frame(&mut self, flow_control: bool) -> Option<DeviceFrame> {
        let &tag = self.buffer.first()?;

        let (frame, consumed) = match tag {
            TAG_QUEUE_READY if flow_control => (DeviceFrame::QueueReady, 1),
            TAG_QUEUE_FULL if flow_control => (DeviceFrame::QueueFull, 1),
            TAG_DEBUG => {
                let &len = self.buffer.get(1)?;
                let total = DEBUG_HEADER_SIZE + len as usize;
                if self.buffer.len() < total {
                    return None;
                }
                // len is a u8, so the payload always fits
                let msg = DebugMessage::new(&self.buffer[DEBUG_HEADER_SIZE..total])?;
                (DeviceFrame::DebugMessage(msg), total)
            }
            other => (DeviceFrame::UnknownByte(other), 1),
        };

        self.consume(consumed);
        Some(frame)
    }

    /// Whether the buffered bytes start a frame that is still incomplete
    pub fn is_incomplete(&self) -> bool {
        match self.buffer.first() {
            Some(&TAG_DEBUG) => match self.buffer.get(1) {
                Some(&len) => self.buffer.len() < DEBUG_HEADER_SIZE + len as usize,
                None => true,
            },
            _ => false,
        }
    }

    fn consume(&mut self, n: usize) {
        let len = self.buffer.len();
        self.buffer.copy_within(n..len, 0);
        self.buffer.truncate(len - n);
    }
}
