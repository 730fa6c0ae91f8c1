//! Session mode
//!
//! A session binds a sequence to the engine. Stream and immediate sessions
//! are mutually exclusive; the flags that only make sense while streaming
//! live inside the streaming variant.

use sequencer_protocol::StartMode;

/// Engine mode as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No session
    Idle,
    /// Flow-controlled playback paced by the device
    Streaming {
        /// Host asked to hold playback
        paused: bool,
        /// Device reported its command queue full
        queue_full: bool,
    },
    /// Device mirrors the sequence cursor
    Immediate,
}

impl Mode {
    /// Check if a session is running
    pub fn is_active(&self) -> bool {
        !matches!(self, Mode::Idle)
    }

    /// Check if a stream session is running
    pub fn is_streaming(&self) -> bool {
        matches!(self, Mode::Streaming { .. })
    }

    /// Check if an immediate session is running
    pub fn is_immediate(&self) -> bool {
        matches!(self, Mode::Immediate)
    }
}

/// Active session, holding the sequence handle
#[derive(Debug)]
pub(crate) enum Session<S> {
    Idle,
    Streaming {
        sequence: S,
        paused: bool,
        queue_full: bool,
    },
    Immediate {
        sequence: S,
    },
}

impl<S> Session<S> {
    pub(crate) fn mode(&self) -> Mode {
        match self {
            Session::Idle => Mode::Idle,
            Session::Streaming {
                paused, queue_full, ..
            } => Mode::Streaming {
                paused: *paused,
                queue_full: *queue_full,
            },
            Session::Immediate { .. } => Mode::Immediate,
        }
    }

    pub(crate) fn start_mode(&self) -> Option<StartMode> {
        match self {
            Session::Idle => None,
            Session::Streaming { .. } => Some(StartMode::Stream),
            Session::Immediate { .. } => Some(StartMode::Immediate),
        }
    }

    pub(crate) fn sequence(&self) -> Option<&S> {
        match self {
            Session::Idle => None,
            Session::Streaming { sequence, .. } | Session::Immediate { sequence } => Some(sequence),
        }
    }

    pub(crate) fn sequence_mut(&mut self) -> Option<&mut S> {
        match self {
            Session::Idle => None,
            Session::Streaming { sequence, .. } | Session::Immediate { sequence } => Some(sequence),
        }
    }

    /// End the session, giving the handle back
    pub(crate) fn take(&mut self) -> Session<S> {
        core::mem::replace(self, Session::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_of_session() {
        let streaming: Session<u8> = Session::Streaming {
            sequence: 0,
            paused: true,
            queue_full: false,
        };
        assert_eq!(
            streaming.mode(),
            Mode::Streaming {
                paused: true,
                queue_full: false
            }
        );
        assert_eq!(streaming.start_mode(), Some(StartMode::Stream));

        let immediate: Session<u8> = Session::Immediate { sequence: 0 };
        assert!(immediate.mode().is_immediate());
        assert!(!immediate.mode().is_streaming());

        assert!(!Session::<u8>::Idle.mode().is_active());
    }

    #[test]
    fn test_take_leaves_idle() {
        let mut session: Session<u8> = Session::Immediate { sequence: 7 };
        let old = session.take();

        assert_eq!(old.sequence(), Some(&7));
        assert!(session.sequence().is_none());
        assert_eq!(session.mode(), Mode::Idle);
    }
}
