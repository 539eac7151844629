//! Virtual Somfy remotes.
//!
//! A [`RemoteIdentity`] is what a receiver gets paired with: a 24-bit address
//! plus the storage slot holding that address's rolling code. A
//! [`RemoteController`] presses buttons on behalf of one identity, through an
//! [`RtsTransmitter`] that owns the hardware shared by every remote: the data
//! pin emitter, the radio, and the rolling code store.
//!
//! Sending a command:
//!
//! 1. load the rolling code from the remote's slot
//! 2. build the frame
//! 3. radio to transmit mode
//! 4. one frame with the wake-up pulse and 2 sync pulses
//! 5. two repeats of the same frame with 7 sync pulses
//! 6. radio back to idle
//! 7. persist the next rolling code
//!
//! If any step fails the remaining ones are skipped and the rolling code is not
//! advanced. Taking the transmitter by `&mut` serializes sends from every remote
//! sharing it.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use rts433::command::Command;
//! use rts433::emitter::RtsEmitter;
//! use rts433::radio::NoRadio;
//! use rts433::remote::{RemoteController, RemoteIdentity, RtsTransmitter};
//! use rts433::storage::{MemoryStore, SlotAllocator};
//!
//! # let mut expected = vec![PinTransaction::set(PinState::Low)];
//! # let (frame, _) = rts433::frame::build(Command::Up, rts433::storage::RollingCode::new(1), 0x123456);
//! # for (sync, wakeup) in [(rts433::pulse::SyncPulses::First, true), (rts433::pulse::SyncPulses::Repeat, false), (rts433::pulse::SyncPulses::Repeat, false)] {
//! #     expected.extend(rts433::pulse::Pulses::new(frame, sync, wakeup)
//! #         .map(|p| PinTransaction::set(if p.level { PinState::High } else { PinState::Low })));
//! # }
//! # let pin = Pin::new(&expected);
//! let store = MemoryStore::<64>::erased();
//! let mut slots = SlotAllocator::for_store(&store);
//! let mut transmitter = RtsTransmitter::new(RtsEmitter::new(pin, NoopDelay::new()), NoRadio, store);
//! transmitter.init().unwrap();
//!
//! let living_room = RemoteController::new(RemoteIdentity::new("Living room", 0x123456, &mut slots).unwrap());
//! let sent = living_room.send(&mut transmitter, Command::Up).unwrap();
//! assert_eq!(sent.value(), 1);
//! # transmitter.emitter.tx.done();
//! ```

use crate::command::Command;
use crate::consts::{RTS_ADDRESS_MASK, RTS_FRAME_REPEATS, RTS_FREQUENCY_HZ};
#[cfg(not(feature = "std"))]
use crate::consts::RTS_MAX_NAME_LEN;
use crate::emitter::FrameTransmitter;
use crate::error::{Error, Result};
use crate::frame::{self, Frame};
use crate::pulse::SyncPulses;
use crate::radio::Radio;
use crate::storage::{ByteStore, RollingCode, RollingCodeStore, SlotAllocator, StorageSlot};

/// Display name of a remote. Carries no protocol meaning.
#[cfg(feature = "std")]
pub type RemoteName = String;

/// Display name of a remote. Carries no protocol meaning.
#[cfg(not(feature = "std"))]
pub type RemoteName = heapless::String<RTS_MAX_NAME_LEN>;

/// The identity a receiver is paired with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    name: RemoteName,
    address: u32,
    slot: StorageSlot,
}

impl RemoteIdentity {
    /// Creates an identity and reserves its storage slot.
    ///
    /// Only the low 24 bits of `address` are kept.
    ///
    /// # Errors
    /// - [`Error::SlotsExhausted`] if the allocator's store is full
    /// - [`Error::NameTooLong`] if `name` does not fit [`RemoteName`]
    pub fn new(name: &str, address: u32, slots: &mut SlotAllocator) -> Result<Self> {
        let name = to_name(name)?;
        if address & !RTS_ADDRESS_MASK != 0 {
            warn!("remote address {} truncated to 24 bits", address);
        }
        let slot = slots.allocate()?;
        info!("remote at slot {} created", slot.index());
        Ok(Self {
            name,
            address: address & RTS_ADDRESS_MASK,
            slot,
        })
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 24-bit remote address.
    pub const fn address(&self) -> u32 {
        self.address
    }

    /// The storage slot holding this remote's rolling code.
    pub const fn slot(&self) -> StorageSlot {
        self.slot
    }
}

#[cfg(feature = "std")]
fn to_name(name: &str) -> Result<RemoteName> {
    Ok(RemoteName::from(name))
}

#[cfg(not(feature = "std"))]
fn to_name(name: &str) -> Result<RemoteName> {
    RemoteName::try_from(name).map_err(|_| Error::NameTooLong(RTS_MAX_NAME_LEN))
}

/// The hardware shared by every remote: frame emitter, radio and rolling code store.
#[derive(Debug)]
pub struct RtsTransmitter<T, R, S>
where
    T: FrameTransmitter,
    R: Radio,
    S: ByteStore,
{
    /// Puts frames on air
    pub emitter: T,
    /// Switched to transmit mode around every command
    pub radio: R,
    /// Rolling codes of every remote
    pub codes: RollingCodeStore<S>,
}

impl<T, R, S> RtsTransmitter<T, R, S>
where
    T: FrameTransmitter,
    R: Radio,
    S: ByteStore,
{
    /// Bundles the emitter, the radio, and the persistent store.
    pub fn new(emitter: T, radio: R, store: S) -> Self {
        Self {
            emitter,
            radio,
            codes: RollingCodeStore::new(store),
        }
    }

    /// Tunes the radio to the Somfy carrier and leaves it idle.
    pub fn init(&mut self) -> Result<()> {
        self.radio
            .configure(RTS_FREQUENCY_HZ)
            .map_err(|_| Error::Radio)?;
        info!("radio configured for {} Hz", RTS_FREQUENCY_HZ);
        Ok(())
    }

    /// Puts `frame` on air the way a physical remote does: once with the wake-up
    /// pulse and 2 sync pulses, then repeated with 7 sync pulses.
    ///
    /// The radio is switched to transmit mode for the duration. If the emitter
    /// fails the radio is still returned to idle before the error is reported.
    pub fn transmit_command(&mut self, frame: &Frame) -> Result<()> {
        self.put_on_air(frame)?;
        self.release_radio()
    }

    /// Keys the radio and sends all frames. On an emitter failure the radio is
    /// returned to idle on a best-effort basis.
    fn put_on_air(&mut self, frame: &Frame) -> Result<()> {
        self.radio.enter_transmit_mode().map_err(|_| Error::Radio)?;
        debug!("radio in transmit mode");

        if let Err(e) = self.transmit_frames(frame) {
            let _ = self.radio.enter_idle_mode();
            return Err(e);
        }
        Ok(())
    }

    fn release_radio(&mut self) -> Result<()> {
        self.radio.enter_idle_mode().map_err(|_| Error::Radio)?;
        debug!("radio idle");
        Ok(())
    }

    fn transmit_frames(&mut self, frame: &Frame) -> Result<()> {
        self.emitter
            .transmit_frame(frame, SyncPulses::First, true)?;
        for _ in 0..RTS_FRAME_REPEATS {
            self.emitter
                .transmit_frame(frame, SyncPulses::Repeat, false)?;
        }
        Ok(())
    }
}

/// Presses buttons for one remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteController {
    identity: RemoteIdentity,
}

impl RemoteController {
    /// Binds a controller to `identity`.
    pub const fn new(identity: RemoteIdentity) -> Self {
        Self { identity }
    }

    /// The remote this controller speaks for.
    pub const fn identity(&self) -> &RemoteIdentity {
        &self.identity
    }

    /// Sends `command` and persists the advanced rolling code.
    ///
    /// # Returns
    /// The rolling code carried by the transmitted frames.
    ///
    /// # Errors
    /// - [`Error::Radio`] or [`Error::Line`] if the transmission could not be
    ///   completed; the rolling code is left unchanged
    /// - [`Error::StoreWrite`] if the frames went out but the next rolling code
    ///   could not be persisted
    /// - [`Error::Radio`] if the frames went out but the radio could not be
    ///   returned to idle; the rolling code has already been advanced
    pub fn send<T, R, S>(
        &self,
        transmitter: &mut RtsTransmitter<T, R, S>,
        command: Command,
    ) -> Result<RollingCode>
    where
        T: FrameTransmitter,
        R: Radio,
        S: ByteStore,
    {
        let slot = self.identity.slot;
        let rolling_code = transmitter.codes.load(slot);
        let (frame, next_code) = frame::build(command, rolling_code, self.identity.address);
        debug!(
            "sending {:?} from slot {} with rolling code {}",
            command,
            slot.index(),
            rolling_code.value()
        );

        transmitter.put_on_air(&frame)?;
        // Every frame carrying `rolling_code` is on air: it is spent even if idling fails
        let idle = transmitter.release_radio();
        transmitter.codes.save(slot, next_code)?;
        idle?;
        Ok(rolling_code)
    }

    /// Sends the command chosen by a textual selector.
    ///
    /// Unknown selectors send [`Command::FALLBACK`]; see [`Command::from_selector`].
    pub fn send_selector<T, R, S>(
        &self,
        transmitter: &mut RtsTransmitter<T, R, S>,
        selector: &str,
    ) -> Result<RollingCode>
    where
        T: FrameTransmitter,
        R: Radio,
        S: ByteStore,
    {
        self.send(transmitter, Command::from_selector(selector))
    }
}
