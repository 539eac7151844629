//! The Somfy RTS waveform as data.
//!
//! One frame on air is a fixed sequence of phases:
//!
//! ```text
//! WakeUp (optional) -> HardwareSync x n -> SoftwareSync -> DataBits x 56 -> Silence
//! ```
//!
//! [`Pulses`] walks that sequence and yields one [`Pulse`] (line level and
//! duration) per step. The emitter replays the pulses on a pin with a delay
//! source; tests record them instead.
//!
//! ## Timing
//!
//! | Phase         | High                    | Low                        |
//! |---------------|-------------------------|----------------------------|
//! | Wake-up       | 9415 µs                 | 89565 µs                   |
//! | Hardware sync | 4 symbols               | 4 symbols                  |
//! | Software sync | 4550 µs                 | 1 symbol                   |
//! | Data bit `1`  | second half (1 symbol)  | first half (1 symbol)      |
//! | Data bit `0`  | first half (1 symbol)   | second half (1 symbol)     |
//! | Silence       |                         | 30415 µs                   |
//!
//! A symbol is [`RTS_SYMBOL_US`] (604 µs).

use crate::consts::{
    RTS_FIRST_FRAME_SYNC, RTS_FRAME_BITS, RTS_HARDWARE_SYNC_US, RTS_INTER_FRAME_SILENCE_US,
    RTS_REPEAT_FRAME_SYNC, RTS_SOFTWARE_SYNC_HIGH_US, RTS_SOFTWARE_SYNC_LOW_US, RTS_SYMBOL_US,
    RTS_WAKEUP_HIGH_US, RTS_WAKEUP_LOW_US,
};
use crate::frame::Frame;

/// Hold the line at `level` for `duration_us` microseconds.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Pulse {
    /// `true` = carrier on
    pub level: bool,
    /// How long the level is held
    pub duration_us: u32,
}

impl Pulse {
    /// Carrier on for `duration_us`.
    pub const fn high(duration_us: u32) -> Self {
        Self {
            level: true,
            duration_us,
        }
    }

    /// Carrier off for `duration_us`.
    pub const fn low(duration_us: u32) -> Self {
        Self {
            level: false,
            duration_us,
        }
    }
}

/// Number of hardware sync pulses preceding a frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SyncPulses {
    /// Two pulses, used for the first frame of a command.
    First,
    /// Seven pulses, used for every repeated frame.
    Repeat,
}

impl SyncPulses {
    /// The number of hardware sync pulses.
    pub const fn count(self) -> u8 {
        match self {
            SyncPulses::First => RTS_FIRST_FRAME_SYNC,
            SyncPulses::Repeat => RTS_REPEAT_FRAME_SYNC,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Phase {
    WakeUpHigh,
    WakeUpLow,
    HardwareSync { remaining: u8, high: bool },
    SoftwareSyncHigh,
    SoftwareSyncLow,
    DataBit { index: u8, second_half: bool },
    Silence,
    Done,
}

/// Iterator over the pulses of one frame transmission.
#[derive(Clone, Debug)]
pub struct Pulses {
    frame: Frame,
    sync: SyncPulses,
    phase: Phase,
}

impl Pulses {
    /// Starts the pulse sequence for `frame`.
    pub const fn new(frame: Frame, sync: SyncPulses, wakeup: bool) -> Self {
        let phase = if wakeup {
            Phase::WakeUpHigh
        } else {
            Self::hardware_sync(sync)
        };
        Self { frame, sync, phase }
    }

    const fn hardware_sync(sync: SyncPulses) -> Phase {
        Phase::HardwareSync {
            remaining: sync.count(),
            high: true,
        }
    }
}

impl Iterator for Pulses {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        let (pulse, next) = match self.phase {
            Phase::WakeUpHigh => (Pulse::high(RTS_WAKEUP_HIGH_US), Phase::WakeUpLow),
            Phase::WakeUpLow => (
                Pulse::low(RTS_WAKEUP_LOW_US),
                Self::hardware_sync(self.sync),
            ),
            Phase::HardwareSync { remaining: 0, .. } => {
                self.phase = Phase::SoftwareSyncHigh;
                return self.next();
            }
            Phase::HardwareSync {
                remaining,
                high: true,
            } => (
                Pulse::high(RTS_HARDWARE_SYNC_US),
                Phase::HardwareSync {
                    remaining,
                    high: false,
                },
            ),
            Phase::HardwareSync {
                remaining,
                high: false,
            } => (
                Pulse::low(RTS_HARDWARE_SYNC_US),
                Phase::HardwareSync {
                    remaining: remaining - 1,
                    high: true,
                },
            ),
            Phase::SoftwareSyncHigh => (
                Pulse::high(RTS_SOFTWARE_SYNC_HIGH_US),
                Phase::SoftwareSyncLow,
            ),
            Phase::SoftwareSyncLow => (
                Pulse::low(RTS_SOFTWARE_SYNC_LOW_US),
                Phase::DataBit {
                    index: 0,
                    second_half: false,
                },
            ),
            Phase::DataBit { index, second_half } => {
                // Manchester: 1 = low->high, 0 = high->low
                let bit = self.frame.bit(index);
                let level = if second_half { bit } else { !bit };
                let next = if !second_half {
                    Phase::DataBit {
                        index,
                        second_half: true,
                    }
                } else if index + 1 < RTS_FRAME_BITS {
                    Phase::DataBit {
                        index: index + 1,
                        second_half: false,
                    }
                } else {
                    Phase::Silence
                };
                (
                    Pulse {
                        level,
                        duration_us: RTS_SYMBOL_US,
                    },
                    next,
                )
            }
            Phase::Silence => (Pulse::low(RTS_INTER_FRAME_SILENCE_US), Phase::Done),
            Phase::Done => return None,
        };
        self.phase = next;
        Some(pulse)
    }
}

/// Total on-air time of one frame transmission, in microseconds.
pub fn frame_duration_us(sync: SyncPulses, wakeup: bool) -> u32 {
    let wakeup_us = if wakeup {
        RTS_WAKEUP_HIGH_US + RTS_WAKEUP_LOW_US
    } else {
        0
    };
    wakeup_us
        + u32::from(sync.count()) * 2 * RTS_HARDWARE_SYNC_US
        + RTS_SOFTWARE_SYNC_HIGH_US
        + RTS_SOFTWARE_SYNC_LOW_US
        + u32::from(RTS_FRAME_BITS) * 2 * RTS_SYMBOL_US
        + RTS_INTER_FRAME_SILENCE_US
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_zero() -> Frame {
        Frame::from_bytes([0; 7])
    }

    #[test]
    fn test_first_frame_preamble() {
        let pulses: Vec<Pulse> = Pulses::new(all_zero(), SyncPulses::First, true)
            .take(8)
            .collect();
        assert_eq!(
            pulses,
            vec![
                Pulse::high(9_415),
                Pulse::low(89_565),
                Pulse::high(2_416),
                Pulse::low(2_416),
                Pulse::high(2_416),
                Pulse::low(2_416),
                Pulse::high(4_550),
                Pulse::low(604),
            ]
        );
    }

    #[test]
    fn test_repeat_frame_has_seven_syncs_and_no_wakeup() {
        let pulses: Vec<Pulse> = Pulses::new(all_zero(), SyncPulses::Repeat, false).collect();
        let sync: Vec<Pulse> = pulses.iter().copied().take(14).collect();
        for pair in sync.chunks(2) {
            assert_eq!(pair, &[Pulse::high(2_416), Pulse::low(2_416)]);
        }
        assert_eq!(pulses[14], Pulse::high(4_550));
        assert_eq!(pulses[15], Pulse::low(604));
        // 7 sync pairs + software sync + 56 bit halves * 2 + silence
        assert_eq!(pulses.len(), 14 + 2 + 112 + 1);
    }

    #[test]
    fn test_manchester_bits_and_silence() {
        // 0xA7 = 1010_0111, remaining bytes zero
        let frame = Frame::from_bytes([0xA7, 0, 0, 0, 0, 0, 0]);
        let pulses: Vec<Pulse> = Pulses::new(frame, SyncPulses::First, false).collect();
        let data = &pulses[6..6 + 112];
        let levels: Vec<(bool, bool)> = data
            .chunks(2)
            .map(|half| (half[0].level, half[1].level))
            .collect();
        let one = (false, true);
        let zero = (true, false);
        assert_eq!(
            &levels[..8],
            &[one, zero, one, zero, zero, one, one, one]
        );
        assert!(levels[8..].iter().all(|&l| l == zero));
        assert!(data.iter().all(|p| p.duration_us == 604));
        assert_eq!(pulses.last(), Some(&Pulse::low(30_415)));
    }

    #[test]
    fn test_iterator_is_fused_after_silence() {
        let mut pulses = Pulses::new(all_zero(), SyncPulses::First, false);
        for _ in pulses.by_ref() {}
        assert_eq!(pulses.next(), None);
    }

    #[test]
    fn test_frame_duration_matches_pulses() {
        for (sync, wakeup) in [
            (SyncPulses::First, true),
            (SyncPulses::Repeat, false),
            (SyncPulses::First, false),
        ] {
            let total: u32 = Pulses::new(Frame::from_bytes([0x5A; 7]), sync, wakeup)
                .map(|p| p.duration_us)
                .sum();
            assert_eq!(total, frame_duration_us(sync, wakeup));
        }
        assert_eq!(
            frame_duration_us(SyncPulses::First, true),
            9_415 + 89_565 + 2 * 4_832 + 4_550 + 604 + 56 * 1_208 + 30_415
        );
    }
}
