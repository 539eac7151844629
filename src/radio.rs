//! Radio mode control around a transmission.
//!
//! The data pin only modulates the carrier; the radio chip itself has to be
//! put in transmit mode before the first frame and back to idle after the
//! last one. How that happens depends on the hardware, so it sits behind the
//! [`Radio`] trait:
//!
//! - [`NoRadio`] for modules that transmit whenever the data pin is high
//!   (FS1000A and friends).
//! - [`PttRadio`] for modules with a push-to-talk / transmitter-enable pin.
//! - Your own implementation for configurable transceivers such as the CC1101,
//!   tuned to [`RTS_FREQUENCY_HZ`](crate::consts::RTS_FREQUENCY_HZ) in
//!   [`Radio::configure`].

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

/// Operational mode of the radio as tracked by the driver.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RadioMode {
    /// Powered and configured, not transmitting.
    #[default]
    Idle,
    /// Carrier can be keyed by the data pin.
    Tx,
}

/// The radio collaborator.
pub trait Radio {
    /// Error reported by the radio.
    type Error;

    /// One-time setup: tune to `frequency_hz` and leave the radio idle.
    fn configure(&mut self, _frequency_hz: u32) -> Result<(), Self::Error> {
        self.enter_idle_mode()
    }

    /// Switches the radio to transmit mode.
    fn enter_transmit_mode(&mut self) -> Result<(), Self::Error>;

    /// Switches the radio back to idle.
    fn enter_idle_mode(&mut self) -> Result<(), Self::Error>;
}

/// A radio with nothing to switch: the data pin alone keys the carrier.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct NoRadio;

impl Radio for NoRadio {
    type Error = Infallible;

    fn enter_transmit_mode(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn enter_idle_mode(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// A radio keyed by a push-to-talk (transmitter enable) pin.
#[derive(Debug)]
pub struct PttRadio<PTT: OutputPin> {
    /// Push To Talk (PTT) pin
    pub ptt: PTT,
    /// The current mode of the RF module
    pub mode: RadioMode,
    ptt_inverted: bool,
}

impl<PTT: OutputPin> PttRadio<PTT> {
    /// Wraps the PTT pin.
    ///
    /// # Arguments
    /// - `ptt`: The push to talk output pin.
    /// - `ptt_inverted`: Whether the ptt signal is active low (On = LOW, Off = HIGH).
    ///
    /// # Notes
    /// The radio starts in [`RadioMode::Idle`]; the pin is driven by [`Radio::configure`].
    pub fn new(ptt: PTT, ptt_inverted: bool) -> Self {
        Self {
            ptt,
            mode: RadioMode::Idle,
            ptt_inverted,
        }
    }

    fn write_ptt(&mut self, on: bool) -> Result<(), PTT::Error> {
        if on != self.ptt_inverted {
            self.ptt.set_high()
        } else {
            self.ptt.set_low()
        }
    }
}

impl<PTT: OutputPin> Radio for PttRadio<PTT> {
    type Error = PTT::Error;

    fn enter_transmit_mode(&mut self) -> Result<(), PTT::Error> {
        self.write_ptt(true)?;
        self.mode = RadioMode::Tx;
        Ok(())
    }

    fn enter_idle_mode(&mut self) -> Result<(), PTT::Error> {
        self.write_ptt(false)?;
        self.mode = RadioMode::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::RTS_FREQUENCY_HZ;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn test_ptt_radio_keys_pin() {
        let ptt = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut radio = PttRadio::new(ptt, false);
        radio.configure(RTS_FREQUENCY_HZ).unwrap();
        assert_eq!(radio.mode, RadioMode::Idle);
        radio.enter_transmit_mode().unwrap();
        assert_eq!(radio.mode, RadioMode::Tx);
        radio.enter_idle_mode().unwrap();
        assert_eq!(radio.mode, RadioMode::Idle);
        radio.ptt.done();
    }

    #[test]
    fn test_inverted_ptt_radio() {
        let ptt = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut radio = PttRadio::new(ptt, true);
        radio.enter_transmit_mode().unwrap();
        radio.enter_idle_mode().unwrap();
        radio.ptt.done();
    }
}
