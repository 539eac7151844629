//! A global transmitter shared through `critical_section`.
//!
//! Every remote on a board shares one data pin, one radio and one store, and
//! their sends must never interleave. When commands originate from several
//! contexts (main loop, button interrupts, a USB handler...) the transmitter can
//! live in a `static` guarded by a `critical_section::Mutex`; each send then
//! runs start to finish inside a critical section.
//!
//! A full command keeps interrupts masked for roughly half a second (wake-up,
//! three frames and their silences). That is the price of undistorted timing.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rts433::command::Command;
//! use rts433::shared::{global_rts_send, global_rts_transmitter_setup};
//!
//! rts433::init_rts_transmitter!(RtsEmitter<TxPin, Delay>, NoRadio, Eeprom);
//!
//! fn main() {
//!     global_rts_transmitter_setup(&RTS_TRANSMITTER, transmitter);
//!     global_rts_send(&RTS_TRANSMITTER, &living_room, Command::Up).unwrap();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::command::Command;
use crate::emitter::FrameTransmitter;
use crate::error::{Error, Result};
use crate::radio::Radio;
use crate::remote::{RemoteController, RtsTransmitter};
use crate::storage::{ByteStore, RollingCode};

/// A global slot for the shared [`RtsTransmitter`].
pub type SharedTransmitter<T, R, S> = Mutex<RefCell<Option<RtsTransmitter<T, R, S>>>>;

/// Used to initialize the global static [`RtsTransmitter`] for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// static RTS_TRANSMITTER: SharedTransmitter<RtsEmitter<PD2, Delay>, NoRadio, Eeprom> =
///     global_rts_transmitter_init();
/// ```
pub const fn global_rts_transmitter_init<T, R, S>() -> SharedTransmitter<T, R, S>
where
    T: FrameTransmitter,
    R: Radio,
    S: ByteStore,
{
    Mutex::new(RefCell::new(None))
}

/// Stores `transmitter` in the global slot, replacing any previous one.
pub fn global_rts_transmitter_setup<T, R, S>(
    global: &'static SharedTransmitter<T, R, S>,
    transmitter: RtsTransmitter<T, R, S>,
) where
    T: FrameTransmitter,
    R: Radio,
    S: ByteStore,
{
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(transmitter));
    });
}

/// Removes the transmitter from the global slot.
pub fn global_rts_transmitter_take<T, R, S>(
    global: &'static SharedTransmitter<T, R, S>,
) -> Option<RtsTransmitter<T, R, S>>
where
    T: FrameTransmitter,
    R: Radio,
    S: ByteStore,
{
    critical_section::with(|cs| global.borrow(cs).take())
}

/// Sends `command` for `remote` through the global transmitter.
///
/// # Errors
/// [`Error::NotInitialized`] if [`global_rts_transmitter_setup`] has not been called,
/// otherwise whatever [`RemoteController::send`] reports.
pub fn global_rts_send<T, R, S>(
    global: &'static SharedTransmitter<T, R, S>,
    remote: &RemoteController,
    command: Command,
) -> Result<RollingCode>
where
    T: FrameTransmitter,
    R: Radio,
    S: ByteStore,
{
    critical_section::with(|cs| match global.borrow(cs).borrow_mut().as_mut() {
        Some(transmitter) => remote.send(transmitter, command),
        None => Err(Error::NotInitialized),
    })
}

/// Declares a static global `RTS_TRANSMITTER` protected by a `critical_section` mutex.
///
/// # Arguments
/// - `$emitter`: The concrete frame emitter type (must implement `FrameTransmitter`)
/// - `$radio`: The concrete radio type (must implement `Radio`)
/// - `$store`: The concrete persistent store type (must implement `ByteStore`)
///
/// # Example
/// ```rust,ignore
/// init_rts_transmitter!(RtsEmitter<MyTxPin, MyDelay>, NoRadio, MyEeprom);
/// ```
#[macro_export]
macro_rules! init_rts_transmitter {
    ( $emitter:ty, $radio:ty, $store:ty ) => {
        /// The board's shared Somfy RTS transmitter.
        pub static RTS_TRANSMITTER: $crate::shared::SharedTransmitter<$emitter, $radio, $store> =
            $crate::shared::global_rts_transmitter_init();
    };
}
