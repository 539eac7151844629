//! Bit-exact OOK emitter for Somfy RTS frames.
//!
//! This module provides [`RtsEmitter`], which turns a [`Frame`] into a timed
//! on/off signal on a single digital output pin. The pin usually drives the
//! data input of a 433.42 MHz OOK transmitter (an FS1000A-class module or a
//! CC1101 in asynchronous serial mode):
//! - `HIGH` = carrier on
//! - `LOW`  = carrier off
//!
//! The waveform itself comes from [`Pulses`]; the emitter only sets levels and
//! blocks for the requested durations using an [`embedded_hal::delay::DelayNs`]
//! implementation. Use the most precise busy-wait delay the platform offers:
//! receivers silently drop frames whose timing drifts.
//!
//! With the `irq-free` feature each frame runs inside a critical section, so
//! interrupts cannot stretch a pulse.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use rts433::emitter::RtsEmitter;
//!
//! # let pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! let emitter = RtsEmitter::new(pin, NoopDelay::new());
//! let (mut pin, _delay) = emitter.release();
//! # pin.done();
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::pulse::{Pulses, SyncPulses};

/// Anything that can put one RTS frame on air.
///
/// [`RtsEmitter`] is the hardware implementation; the seam exists so the
/// command sequencing in [`crate::remote`] can be driven by other emitters.
pub trait FrameTransmitter {
    /// Sends `frame` once, preceded by `sync` hardware sync pulses and, if
    /// `wakeup` is set, by the wake-up pulse.
    ///
    /// Blocks until the inter-frame silence has elapsed.
    fn transmit_frame(&mut self, frame: &Frame, sync: SyncPulses, wakeup: bool) -> Result<()>;
}

/// Drives a digital output pin through the RTS waveform.
///
/// ## Type Parameters
///
/// - `TX`: A type implementing [`embedded_hal::digital::OutputPin`] wired to the
///   transmitter's data input
/// - `D`: A type implementing [`embedded_hal::delay::DelayNs`] with microsecond resolution
#[derive(Debug)]
pub struct RtsEmitter<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    /// TX pin
    pub tx: TX,
    delay: D,
    /// Counter of frames put on air in full.
    pub frames_sent: u16,
}

impl<TX, D> RtsEmitter<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    /// Creates a new emitter from the data pin and a delay source.
    ///
    /// # Notes
    /// TX is driven `LOW` initially (carrier off).
    pub fn new(tx: TX, delay: D) -> Self {
        let mut tx = tx;
        let _ = tx.set_low(); // Ensure idle
        Self {
            tx,
            delay,
            frames_sent: 0,
        }
    }

    /// Gives back the pin and the delay source.
    pub fn release(self) -> (TX, D) {
        (self.tx, self.delay)
    }

    fn write_tx(&mut self, level: bool) -> Result<()> {
        let result = if level {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
        result.map_err(|e| Error::Line(e.kind()))
    }

    fn emit(&mut self, pulses: Pulses) -> Result<()> {
        for pulse in pulses {
            if let Err(e) = self.write_tx(pulse.level) {
                // Leave the carrier off; the receiver drops the truncated frame
                let _ = self.tx.set_low();
                return Err(e);
            }
            self.delay.delay_us(pulse.duration_us);
        }
        Ok(())
    }
}

impl<TX, D> FrameTransmitter for RtsEmitter<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    fn transmit_frame(&mut self, frame: &Frame, sync: SyncPulses, wakeup: bool) -> Result<()> {
        let pulses = Pulses::new(*frame, sync, wakeup);

        #[cfg(feature = "irq-free")]
        critical_section::with(|_| self.emit(pulses))?;
        #[cfg(not(feature = "irq-free"))]
        self.emit(pulses)?;

        self.frames_sent = self.frames_sent.wrapping_add(1);
        debug!(
            "frame sent ({} sync pulses, wake-up: {})",
            sync.count(),
            wakeup
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::frame::build;
    use crate::pulse::Pulse;
    use crate::storage::RollingCode;
    use core::cell::RefCell;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use std::rc::Rc;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Event {
        Level(bool),
        Delay(u32),
    }

    struct RecordingPin(Rc<RefCell<Vec<Event>>>);
    struct RecordingDelay(Rc<RefCell<Vec<Event>>>);

    impl ErrorType for RecordingPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Level(false));
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Level(true));
            Ok(())
        }
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Delay(ns / 1_000));
        }

        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Event::Delay(us));
        }
    }

    fn recording_emitter() -> (
        RtsEmitter<RecordingPin, RecordingDelay>,
        Rc<RefCell<Vec<Event>>>,
    ) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = RtsEmitter::new(RecordingPin(log.clone()), RecordingDelay(log.clone()));
        log.borrow_mut().clear();
        (emitter, log)
    }

    #[test]
    fn test_emitter_initialization() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let emitter = RtsEmitter::new(tx, NoopDelay::new());
        assert_eq!(emitter.frames_sent, 0);
        let (mut tx, _) = emitter.release();
        tx.done();
    }

    #[test]
    fn test_transmit_frame_replays_pulses_on_pin() {
        let (frame, _) = build(Command::Up, RollingCode::new(1), 0x123456);
        let expected: Vec<PinTransaction> = core::iter::once(PinTransaction::set(PinState::Low))
            .chain(
                Pulses::new(frame, SyncPulses::First, true).map(|p| {
                    PinTransaction::set(if p.level {
                        PinState::High
                    } else {
                        PinState::Low
                    })
                }),
            )
            .collect();
        let tx = PinMock::new(&expected);

        let mut emitter = RtsEmitter::new(tx, NoopDelay::new());
        emitter
            .transmit_frame(&frame, SyncPulses::First, true)
            .unwrap();
        assert_eq!(emitter.frames_sent, 1);
        emitter.tx.done();
    }

    #[test]
    fn test_every_level_is_held_for_its_duration() {
        let (frame, _) = build(Command::Down, RollingCode::new(0x0102), 0xABCDEF);
        let (mut emitter, log) = recording_emitter();
        emitter
            .transmit_frame(&frame, SyncPulses::Repeat, false)
            .unwrap();

        let expected: Vec<Event> = Pulses::new(frame, SyncPulses::Repeat, false)
            .flat_map(|Pulse { level, duration_us }| {
                [Event::Level(level), Event::Delay(duration_us)]
            })
            .collect();
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn test_line_fault_stops_the_frame() {
        struct FaultyPin {
            sets: usize,
        }

        #[derive(Debug)]
        struct PinFault;

        impl embedded_hal::digital::Error for PinFault {
            fn kind(&self) -> ErrorKind {
                ErrorKind::Other
            }
        }

        impl ErrorType for FaultyPin {
            type Error = PinFault;
        }

        impl OutputPin for FaultyPin {
            fn set_low(&mut self) -> core::result::Result<(), PinFault> {
                self.sets += 1;
                Ok(())
            }

            fn set_high(&mut self) -> core::result::Result<(), PinFault> {
                Err(PinFault)
            }
        }

        let (frame, _) = build(Command::My, RollingCode::new(3), 0x000001);
        let mut emitter = RtsEmitter::new(FaultyPin { sets: 0 }, NoopDelay::new());
        assert_eq!(
            emitter.transmit_frame(&frame, SyncPulses::First, true),
            Err(Error::Line(ErrorKind::Other))
        );
        assert_eq!(emitter.frames_sent, 0);
        // Initial idle plus the carrier-off after the fault
        assert_eq!(emitter.tx.sets, 2);
    }
}
