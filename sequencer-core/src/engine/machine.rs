//! Streaming state machine
//!
//! The engine reacts to four stimuli, all delivered by the host on one
//! execution context:
//! - host calls (open/close, start/pause/resume/stop)
//! - bytes received from the transport
//! - the boot gate expiring ([`Engine::poll`])
//! - the bound sequence's cursor moving ([`Engine::on_cursor_changed`])
//!
//! Nothing blocks. Packets are written fire-and-forget; the device answers
//! later with `N`/`F` tokens that arrive as received bytes.

use sequencer_protocol::{
    encode_point, encode_start, encode_stop, DeviceFrame, FrameDecoder, StartMode,
};

use super::events::{EngineEvent, StreamError};
use super::session::{Mode, Session};
use crate::config::LinkConfig;
use crate::error::{EngineError, InvalidOperation};
use crate::gate::{BootGate, DEFAULT_BOOT_DELAY_MS};
use crate::traits::{EngineObserver, Sequence, SerialConfig, SerialTransport};

/// Result of engine operations
pub type EngineResult<E> = Result<(), EngineError<E>>;

/// Serial link engine
///
/// Owns the transport and the event observer. Holds the sequence handle `S`
/// only while a session runs; it is dropped when the session stops.
///
/// In stream mode the device paces playback: every `N` token sends the point
/// under the cursor and moves the cursor on, `F` holds proactive sends until
/// the next `N`. The session stops by itself after the last point is sent.
/// In immediate mode the device mirrors the cursor: every cursor change sends
/// the point under it, with no flow control.
pub struct Engine<T, S, O>
where
    T: SerialTransport,
    S: Sequence,
    O: EngineObserver<T::Error>,
{
    transport: T,
    observer: O,
    gate: BootGate,
    boot_delay_ms: u32,
    decoder: FrameDecoder,
    session: Session<S>,
    /// Bumped every time a session ends
    epoch: u32,
}

impl<T, S, O> Engine<T, S, O>
where
    T: SerialTransport,
    S: Sequence,
    O: EngineObserver<T::Error>,
{
    /// Create an idle engine
    pub fn new(transport: T, observer: O) -> Self {
        Self {
            transport,
            observer,
            gate: BootGate::new(),
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
            decoder: FrameDecoder::new(),
            session: Session::Idle,
            epoch: 0,
        }
    }

    /// Use a different boot delay for subsequent opens
    pub fn with_boot_delay(mut self, delay_ms: u32) -> Self {
        self.boot_delay_ms = delay_ms;
        self
    }

    /// Boot delay applied when the transport opens
    pub fn boot_delay_ms(&self) -> u32 {
        self.boot_delay_ms
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// Whether a stream or immediate session is running
    pub fn is_active(&self) -> bool {
        self.session.mode().is_active()
    }

    /// Whether the transport is open
    pub fn is_transport_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Whether transmission is still waiting for the device to boot
    pub fn is_boot_pending(&self) -> bool {
        self.gate.is_armed()
    }

    /// The bound sequence, while a session runs
    pub fn sequence(&self) -> Option<&S> {
        self.session.sequence()
    }

    /// The bound sequence, while a session runs
    ///
    /// In immediate mode, call [`on_cursor_changed`](Self::on_cursor_changed)
    /// after moving the cursor through this handle.
    pub fn sequence_mut(&mut self) -> Option<&mut S> {
        self.session.sequence_mut()
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, e.g. to read received bytes from it
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The observer
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Open the transport and arm the boot gate
    ///
    /// A port that is already open is closed first. Fails without side
    /// effects while a session runs.
    pub fn open_transport(
        &mut self,
        port: &str,
        config: &SerialConfig,
        now_ms: u64,
    ) -> EngineResult<T::Error> {
        self.open_with_delay(port, config, now_ms, self.boot_delay_ms)
    }

    /// Open the transport described by `link`
    ///
    /// Once the port is open, the link's boot delay replaces the engine's.
    pub fn open_link(&mut self, link: &LinkConfig, now_ms: u64) -> EngineResult<T::Error> {
        self.open_with_delay(&link.port, &link.serial, now_ms, link.boot_delay_ms)?;
        self.boot_delay_ms = link.boot_delay_ms;
        Ok(())
    }

    /// Close the transport
    ///
    /// Fails while a session runs: stop it first so the device gets `H`.
    pub fn close_transport(&mut self) -> EngineResult<T::Error> {
        if self.is_active() {
            warn!("Cannot close port while a sequence is being streamed");
            return Err(InvalidOperation::SessionActive.into());
        }

        if self.transport.is_open() {
            self.transport.close();
            self.transport.clear_error();
            info!("Serial port closed");
        }
        Ok(())
    }

    /// Start a stream session
    ///
    /// The cursor is reset to the first point unless `start_from_current`.
    /// If the device is still booting, the start packet and first point go
    /// out when the boot gate fires.
    pub fn start_stream(
        &mut self,
        mut sequence: S,
        start_from_current: bool,
    ) -> EngineResult<T::Error> {
        self.check_can_start(&sequence)?;

        self.decoder.clear();
        if !start_from_current {
            sequence.set_cur_point(0);
        }
        info!(
            "Streaming {} points from point {}",
            sequence.num_points(),
            sequence.cur_point()
        );

        self.session = Session::Streaming {
            sequence,
            paused: false,
            queue_full: false,
        };
        self.begin();
        Ok(())
    }

    /// Pause a stream session
    ///
    /// Only the proactive send on [`resume_stream`](Self::resume_stream) is
    /// held back; the device still gets a point for every `N` it sends.
    pub fn pause_stream(&mut self) -> EngineResult<T::Error> {
        let Session::Streaming { paused, .. } = &mut self.session else {
            return Err(InvalidOperation::NotStreaming.into());
        };
        *paused = true;
        debug!("Stream paused");
        Ok(())
    }

    /// Resume a paused stream session
    ///
    /// Sends the current point right away unless the device queue is full.
    /// Does nothing if the stream is not paused.
    pub fn resume_stream(&mut self) -> EngineResult<T::Error> {
        let Session::Streaming {
            paused, queue_full, ..
        } = &mut self.session
        else {
            return Err(InvalidOperation::NotStreaming.into());
        };
        if !*paused {
            return Ok(());
        }

        *paused = false;
        let queue_full = *queue_full;
        debug!("Stream resumed");

        if !queue_full {
            self.send_next_point();
        }
        Ok(())
    }

    /// Start an immediate session
    ///
    /// The device follows the cursor from here on; report cursor moves with
    /// [`on_cursor_changed`](Self::on_cursor_changed) or use
    /// [`set_cursor`](Self::set_cursor).
    pub fn start_immediate(&mut self, sequence: S) -> EngineResult<T::Error> {
        self.check_can_start(&sequence)?;

        self.decoder.clear();
        info!("Immediate mode at point {}", sequence.cur_point());

        self.session = Session::Immediate { sequence };
        self.begin();
        Ok(())
    }

    /// Stop the running session
    ///
    /// Sends `H` and releases the sequence.
    pub fn stop(&mut self) -> EngineResult<T::Error> {
        if !self.is_active() {
            return Err(InvalidOperation::NoSession.into());
        }
        self.end_session();
        Ok(())
    }

    /// Move the cursor of the bound sequence and send the new point
    ///
    /// Only valid in immediate mode.
    pub fn set_cursor(&mut self, index: usize) -> EngineResult<T::Error> {
        let Session::Immediate { sequence } = &mut self.session else {
            return Err(InvalidOperation::NotImmediate.into());
        };
        sequence.set_cur_point(index);
        self.on_cursor_changed();
        Ok(())
    }

    /// The bound sequence's cursor moved
    ///
    /// In immediate mode the point under the cursor is sent. Ignored in any
    /// other mode.
    pub fn on_cursor_changed(&mut self) {
        let Session::Immediate { sequence } = &self.session else {
            debug!("Cursor change ignored, not in immediate mode");
            return;
        };
        if self.gate.is_armed() {
            // The boot sequence sends whatever point is current by then
            trace!("Cursor change deferred until device boot");
            return;
        }

        let point = sequence.point();
        self.send(&encode_point(&point));
    }

    /// Advance time; fires the boot gate once its delay has elapsed
    pub fn poll(&mut self, now_ms: u64) {
        if self.gate.poll(now_ms) {
            debug!("Device boot delay elapsed");
            self.boot_finished();
        }
    }

    /// Feed bytes received from the transport
    pub fn on_bytes_received(&mut self, data: &[u8]) {
        let epoch = self.epoch;
        let mut rest = data;

        while !rest.is_empty() {
            let taken = self.decoder.push(rest);
            rest = &rest[taken..];
            self.process_frames();

            if self.epoch != epoch {
                // stop() discards the receive buffer; the rest of this read goes with it
                if !rest.is_empty() {
                    debug!("Session ended, discarding {} received bytes", rest.len());
                }
                return;
            }
        }
    }

    /// Report an error raised by the transport
    ///
    /// The session keeps running.
    pub fn on_transport_error(&mut self, error: T::Error) {
        warn!("Serial port error");
        self.report(StreamError::Device(error));
    }

    fn open_with_delay(
        &mut self,
        port: &str,
        config: &SerialConfig,
        now_ms: u64,
        delay_ms: u32,
    ) -> EngineResult<T::Error> {
        if self.is_active() {
            warn!("Cannot open port while a sequence is being streamed");
            return Err(InvalidOperation::SessionActive.into());
        }

        if self.transport.is_open() {
            self.transport.close();
            self.transport.clear_error();
        }

        if let Err(e) = self.transport.open(port, config) {
            warn!("Failed to open serial port {}", port);
            return Err(EngineError::Open(e));
        }

        self.decoder.clear();
        // The board resets on open; give the bootloader time to hand over
        self.gate.arm(now_ms, delay_ms);
        info!(
            "Serial port {} open at {} baud, boot delay {} ms",
            port,
            config.baudrate,
            delay_ms
        );
        Ok(())
    }

    fn check_can_start(&self, sequence: &S) -> Result<(), InvalidOperation> {
        if !self.transport.is_open() {
            warn!("Cannot start streaming with a closed serial port");
            return Err(InvalidOperation::TransportClosed);
        }
        if self.is_active() {
            warn!("Cannot start a new stream while a sequence is already being streamed");
            return Err(InvalidOperation::SessionActive);
        }
        if sequence.num_points() == 0 {
            warn!("Cannot stream an empty sequence");
            return Err(InvalidOperation::EmptySequence);
        }
        Ok(())
    }

    /// Run the boot sequence now, or leave it to the gate
    fn begin(&mut self) {
        if self.gate.is_armed() {
            debug!("Waiting for device boot before sending");
        } else {
            self.boot_finished();
        }
    }

    /// Send the start packet and the first point
    fn boot_finished(&mut self) {
        let (Some(mode), Some(sequence)) = (self.session.start_mode(), self.session.sequence())
        else {
            return;
        };
        let start = encode_start(mode, sequence.point_dim());
        let point = sequence.point();

        self.send(&start);
        self.send(&encode_point(&point));

        if mode == StartMode::Stream {
            self.observer.notify(EngineEvent::StreamStarted);
            self.advance_cursor();
        }
    }

    fn process_frames(&mut self) {
        loop {
            // Re-read per frame: a frame can end the session
            let flow_control = self.mode().is_streaming();
            let Some(frame) = self.decoder.next_frame(flow_control) else {
                break;
            };

            match frame {
                DeviceFrame::QueueReady => self.on_queue_ready(),
                DeviceFrame::QueueFull => self.on_queue_full(),
                DeviceFrame::DebugMessage(msg) => {
                    debug!("Debug packet, content: {}", msg);
                    self.observer.notify(EngineEvent::DebugMessage(msg));
                }
                DeviceFrame::UnknownByte(byte) => {
                    warn!("Received unknown or invalid packet type {}", byte);
                    self.report(StreamError::UnknownPacket(byte));
                }
            }
        }
    }

    /// The device asked for the next point; answered even while paused
    fn on_queue_ready(&mut self) {
        let Session::Streaming { queue_full, .. } = &mut self.session else {
            return;
        };
        *queue_full = false;
        self.send_next_point();
    }

    fn on_queue_full(&mut self) {
        if let Session::Streaming { queue_full, .. } = &mut self.session {
            trace!("Device queue full");
            *queue_full = true;
        }
    }

    /// Send the point under the cursor and move on
    fn send_next_point(&mut self) {
        if self.gate.is_armed() {
            trace!("Point deferred until device boot");
            return;
        }
        let Some(sequence) = self.session.sequence() else {
            return;
        };
        let point = sequence.point();
        self.send(&encode_point(&point));
        self.advance_cursor();
    }

    /// Step the cursor, stopping after the last point
    fn advance_cursor(&mut self) {
        let Some(sequence) = self.session.sequence_mut() else {
            return;
        };

        if sequence.at_last_point() {
            debug!("Last point sent, stopping");
            self.end_session();
        } else {
            let next = sequence.cur_point() + 1;
            sequence.set_cur_point(next);
        }
    }

    fn end_session(&mut self) {
        self.send(&encode_stop());

        let was_streaming = self.session.take().mode().is_streaming();
        self.decoder.clear();
        self.epoch = self.epoch.wrapping_add(1);
        info!("Session stopped");

        if was_streaming {
            self.observer.notify(EngineEvent::StreamStopped);
        }
    }

    fn send(&mut self, packet: &[u8]) {
        match self.transport.write(packet) {
            Ok(n) if n == packet.len() => trace!("TX: {} bytes", n),
            Ok(n) => {
                warn!("Cannot write all data ({} of {} bytes)", n, packet.len());
                self.report(StreamError::ShortWrite {
                    written: n,
                    expected: packet.len(),
                });
            }
            Err(e) => {
                warn!("Error writing data");
                self.report(StreamError::Write(e));
            }
        }
    }

    fn report(&mut self, error: StreamError<T::Error>) {
        self.observer.notify(EngineEvent::StreamError(error));
    }
}

impl<T, S, O> Drop for Engine<T, S, O>
where
    T: SerialTransport,
    S: Sequence,
    O: EngineObserver<T::Error>,
{
    fn drop(&mut self) {
        // Teardown must complete; both calls fail harmlessly when idle/closed
        let _ = self.stop();
        let _ = self.close_transport();
    }
}
