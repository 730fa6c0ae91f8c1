//! Test doubles for engine unit tests

use core::cell::Cell;
use core::fmt;

use heapless::Vec;
use sequencer_protocol::{HostCommand, SequencePoint};

use crate::engine::EngineEvent;
use crate::traits::{EngineObserver, Sequence, SerialConfig, SerialTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mock failure")
    }
}

/// Transport that records everything written to it
#[derive(Debug, Default)]
pub struct MockTransport {
    pub open: bool,
    pub fail_open: bool,
    pub fail_write: bool,
    /// Accept at most this many bytes per write
    pub write_limit: Option<usize>,
    pub opened: u8,
    pub closed: u8,
    pub last_config: Option<SerialConfig>,
    pub written: Vec<u8, 2048>,
}

impl MockTransport {
    pub fn opened() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    /// Take the bytes written so far
    pub fn take(&mut self) -> Vec<u8, 2048> {
        core::mem::take(&mut self.written)
    }
}

impl SerialTransport for MockTransport {
    type Error = MockError;

    fn open(&mut self, _port: &str, config: &SerialConfig) -> Result<(), MockError> {
        if self.fail_open {
            return Err(MockError);
        }
        self.open = true;
        self.opened += 1;
        self.last_config = Some(*config);
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
        self.closed += 1;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, MockError> {
        if self.fail_write {
            return Err(MockError);
        }
        let n = self.write_limit.map_or(data.len(), |limit| limit.min(data.len()));
        self.written.extend_from_slice(&data[..n]).map_err(|_| MockError)?;
        Ok(n)
    }
}

/// Observer that keeps every event
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<EngineEvent<MockError>, 32>,
}

impl Recorder {
    pub fn count(&self, event: &EngineEvent<MockError>) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn errors(&self) -> usize {
        self.events.iter().filter(|e| e.is_error()).count()
    }
}

impl EngineObserver<MockError> for Recorder {
    fn notify(&mut self, event: EngineEvent<MockError>) {
        self.events.push(event).unwrap();
    }
}

/// Sequence whose cursor stays readable while the engine holds the handle
#[derive(Debug)]
pub struct SharedSequence<'a> {
    pub points: &'a [SequencePoint],
    pub cursor: &'a Cell<usize>,
}

impl Sequence for SharedSequence<'_> {
    fn point(&self) -> SequencePoint {
        self.points[self.cursor.get()].clone()
    }

    fn cur_point(&self) -> usize {
        self.cursor.get()
    }

    fn set_cur_point(&mut self, index: usize) {
        assert!(index < self.points.len(), "cursor out of range");
        self.cursor.set(index);
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn point_dim(&self) -> usize {
        self.points.first().map_or(0, SequencePoint::dim)
    }
}

pub fn three_points() -> [SequencePoint; 3] {
    [
        SequencePoint::new(1000, 100, &[10, 20]).unwrap(),
        SequencePoint::new(2000, 200, &[30, 40]).unwrap(),
        SequencePoint::new(3000, 300, &[50, 60]).unwrap(),
    ]
}

/// Split written bytes back into host commands
pub fn parse_all(mut bytes: &[u8], point_dim: usize) -> Vec<HostCommand, 16> {
    let mut commands = Vec::new();
    while !bytes.is_empty() {
        let (cmd, used) = HostCommand::parse(bytes, point_dim).unwrap();
        commands.push(cmd).unwrap();
        bytes = &bytes[used..];
    }
    commands
}
