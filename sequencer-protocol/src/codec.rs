//! Host → device packet encoding
//!
//! Packets are a one-byte tag followed by a fixed payload:
//! - `S`/`I` + dimensionality (1 byte): begin a stream or immediate session
//! - `H`: halt the session
//! - `P` + duration (u16 BE) + time to target (u16 BE) + one byte per value
//!
//! Host packets carry no length field. The device learns the point size
//! from the dimensionality announced in the start packet.

use heapless::Vec;

use crate::point::{SequencePoint, MAX_POINT_DIM};

/// Start a flow-controlled stream session
pub const TAG_STREAM: u8 = b'S';
/// Start an immediate (cursor-mirroring) session
pub const TAG_IMMEDIATE: u8 = b'I';
/// Halt the current session
pub const TAG_STOP: u8 = b'H';
/// One sequence point
pub const TAG_POINT: u8 = b'P';

/// Size of a start packet (tag + dimensionality)
pub const START_PACKET_SIZE: usize = 2;

/// Point packet header (tag + duration + time to target)
pub const POINT_HEADER_SIZE: usize = 5;

/// Largest packet the host ever sends
pub const MAX_PACKET_SIZE: usize = POINT_HEADER_SIZE + MAX_POINT_DIM;

/// An encoded host packet
pub type Packet = Vec<u8, MAX_PACKET_SIZE>;

/// Session kind announced by a start packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartMode {
    /// Device paces the host with `N`/`F` tokens
    Stream,
    /// Device follows every cursor change, no flow control
    Immediate,
}

impl StartMode {
    /// Wire tag for this mode
    pub fn tag(self) -> u8 {
        match self {
            StartMode::Stream => TAG_STREAM,
            StartMode::Immediate => TAG_IMMEDIATE,
        }
    }

    /// Parse a mode from its wire tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            TAG_STREAM => Some(StartMode::Stream),
            TAG_IMMEDIATE => Some(StartMode::Immediate),
            _ => None,
        }
    }
}

/// Errors while parsing host packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// More bytes are needed
    Incomplete,
    /// Leading byte is not a host command tag
    UnknownCommand(u8),
    /// Announced dimensionality exceeds [`MAX_POINT_DIM`]
    TooManyValues,
}

/// Encode a start packet
///
/// The dimensionality is truncated to its low byte; the wire format has
/// no room for more.
pub fn encode_start(mode: StartMode, point_dim: usize) -> Packet {
    let mut pkt = Packet::new();
    // Two bytes always fit
    let _ = pkt.extend_from_slice(&[mode.tag(), (point_dim & 0xFF) as u8]);
    pkt
}

/// Encode the halt packet
pub fn encode_stop() -> Packet {
    let mut pkt = Packet::new();
    let _ = pkt.push(TAG_STOP);
    pkt
}

/// Encode a point packet
pub fn encode_point(point: &SequencePoint) -> Packet {
    let [duration_hi, duration_lo] = point.duration.to_be_bytes();
    let [ttt_hi, ttt_lo] = point.time_to_target.to_be_bytes();

    let mut pkt = Packet::new();
    // values hold at most MAX_POINT_DIM bytes, so the packet always fits
    let _ = pkt.extend_from_slice(&[TAG_POINT, duration_hi, duration_lo, ttt_hi, ttt_lo]);
    let _ = pkt.extend_from_slice(&point.values);
    pkt
}

/// A decoded host packet, as seen from the device side of the link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Begin a session
    Start { mode: StartMode, point_dim: u8 },
    /// Halt the session
    Stop,
    /// One sequence point
    Point(SequencePoint),
}

impl HostCommand {
    /// Encode this command
    pub fn encode(&self) -> Packet {
        match self {
            HostCommand::Start { mode, point_dim } => encode_start(*mode, *point_dim as usize),
            HostCommand::Stop => encode_stop(),
            HostCommand::Point(point) => encode_point(point),
        }
    }

    /// Parse one command from the head of `bytes`
    ///
    /// `point_dim` is the dimensionality announced by the last start packet;
    /// it sizes point packets. Returns the command and the number of bytes
    /// it occupied.
    pub fn parse(bytes: &[u8], point_dim: usize) -> Result<(Self, usize), CodecError> {
        let (&tag, rest) = bytes.split_first().ok_or(CodecError::Incomplete)?;

        match tag {
            TAG_STOP => Ok((HostCommand::Stop, 1)),
            TAG_STREAM | TAG_IMMEDIATE => {
                let &dim = rest.first().ok_or(CodecError::Incomplete)?;
                let mode = StartMode::from_tag(tag).ok_or(CodecError::UnknownCommand(tag))?;
                Ok((
                    HostCommand::Start {
                        mode,
                        point_dim: dim,
                    },
                    START_PACKET_SIZE,
                ))
            }
            TAG_POINT => {
                if point_dim > MAX_POINT_DIM {
                    return Err(CodecError::TooManyValues);
                }
                let total = POINT_HEADER_SIZE + point_dim;
                if bytes.len() < total {
                    return Err(CodecError::Incomplete);
                }

                let values = Vec::from_slice(&bytes[POINT_HEADER_SIZE..total])
                    .map_err(|_| CodecError::TooManyValues)?;
                let point = SequencePoint {
                    duration: u16::from_be_bytes([bytes[1], bytes[2]]),
                    time_to_target: u16::from_be_bytes([bytes[3], bytes[4]]),
                    values,
                };
                Ok((HostCommand::Point(point), total))
            }
            other => Err(CodecError::UnknownCommand(other)),
        }
    }
}
