//! Sequencer serial link protocol
//!
//! This crate defines the byte protocol between the host (which owns a motion
//! sequence) and the microcontroller that plays it. The link is half-duplex
//! and flow controlled by single-byte tokens from the device.
//!
//! # Protocol Overview
//!
//! Every frame starts with a one-byte tag. Multi-byte fields are big-endian.
//! ```text
//! host → device
//!   ┌─────┬─────┐
//!   │ S/I │ DIM │                               start stream / immediate
//!   └─────┴─────┘
//!   ┌─────┐
//!   │  H  │                                     halt
//!   └─────┘
//!   ┌─────┬──────────┬────────────────┬───────────────┐
//!   │  P  │ DURATION │ TIME TO TARGET │ VALUES        │
//!   │ 1B  │ 2B       │ 2B             │ DIM bytes     │
//!   └─────┴──────────┴────────────────┴───────────────┘
//!
//! device → host
//!   ┌─────┐  ┌─────┐
//!   │  N  │  │  F  │                            queue ready / queue full
//!   └─────┘  └─────┘
//!   ┌─────┬─────┬───────────────┐
//!   │  D  │ LEN │ TEXT          │               debug message
//!   └─────┴─────┴───────────────┘
//! ```
//!
//! The codec is stateless. The decoder keeps a small receive buffer so frames
//! may arrive split across any number of reads.

#![no_std]
#![deny(unsafe_code)]

pub mod codec;
pub mod decoder;
pub mod point;

pub use codec::{
    encode_point, encode_start, encode_stop, CodecError, HostCommand, Packet, StartMode,
    MAX_PACKET_SIZE,
};
pub use decoder::{DebugMessage, DeviceFrame, FrameDecoder, MAX_DEBUG_LEN, RX_BUFFER_SIZE};
pub use point::{PointValues, SequencePoint, MAX_POINT_DIM};
