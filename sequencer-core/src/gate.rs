//! Boot gate
//!
//! Arduino-class boards reset whenever the serial port is opened and spend
//! a while in the bootloader. Anything sent during that window is lost, so
//! after opening the port all transmission waits for a one-shot delay.
//!
//! Time is a monotonic millisecond tick supplied by the caller.

/// Default delay after opening the port (bootloader takes about 0.5 s)
pub const DEFAULT_BOOT_DELAY_MS: u32 = 1000;

/// One-shot delay armed when the transport opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootGate {
    /// Tick at which the gate fires, while armed
    deadline_ms: Option<u64>,
}

impl BootGate {
    /// Create an idle gate
    pub const fn new() -> Self {
        Self { deadline_ms: None }
    }

    /// Arm the gate to fire `delay_ms` after `now_ms`
    ///
    /// Re-arming replaces any pending deadline.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u32) {
        self.deadline_ms = Some(now_ms.saturating_add(u64::from(delay_ms)));
    }

    /// Whether the gate is still holding transmission back
    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Milliseconds left until the gate fires, or `None` when idle
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms))
    }

    /// Advance the gate
    ///
    /// Returns `true` exactly once: on the first call at or after the
    /// deadline. The gate is idle afterwards.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_gate_never_fires() {
        let mut gate = BootGate::new();
        assert!(!gate.is_armed());
        assert!(!gate.poll(u64::MAX));
        assert_eq!(gate.remaining_ms(0), None);
    }

    #[test]
    fn test_fires_once_at_deadline() {
        let mut gate = BootGate::new();
        gate.arm(5_000, DEFAULT_BOOT_DELAY_MS);

        assert!(gate.is_armed());
        assert!(!gate.poll(5_999));
        assert_eq!(gate.remaining_ms(5_999), Some(1));

        assert!(gate.poll(6_000));
        assert!(!gate.is_armed());
        assert!(!gate.poll(6_001));
        assert!(!gate.poll(10_000));
    }

    #[test]
    fn test_late_poll_still_fires() {
        let mut gate = BootGate::new();
        gate.arm(0, 100);
        assert!(gate.poll(50_000));
    }

    #[test]
    fn test_rearm_moves_deadline() {
        let mut gate = BootGate::new();
        gate.arm(0, 1000);
        gate.arm(800, 1000);

        assert!(!gate.poll(1000));
        assert!(gate.poll(1800));
    }

    #[test]
    fn test_zero_delay() {
        let mut gate = BootGate::new();
        gate.arm(42, 0);
        assert!(gate.is_armed());
        assert!(gate.poll(42));
    }
}
