//! Error type shared by every fallible operation in the crate.

use embedded_hal::digital::ErrorKind;
use thiserror::Error;

/// Result type for RTS operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the transmitter, the radio glue and the rolling code store.
///
/// Collaborator failures (pins, radios, stores) are mapped to these variants at the
/// boundary, so the protocol layer never has to be generic over HAL error types.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The digital output line refused a level change.
    #[error("data line fault: {0:?}")]
    Line(ErrorKind),
    /// The radio collaborator failed to switch modes or to initialize.
    #[error("radio mode change failed")]
    Radio,
    /// The persistent store failed to write or commit a rolling code.
    #[error("rolling code for slot at offset {0} could not be persisted")]
    StoreWrite(usize),
    /// A read or write fell outside the persistent store.
    #[error("store access at offset {offset} (+{len}) exceeds capacity")]
    OutOfBounds {
        /// Offset of the rejected access
        offset: usize,
        /// Length of the rejected access
        len: usize,
    },
    /// Every storage slot of the persistent store has been handed out.
    #[error("no storage slot left in a store of {0} bytes")]
    SlotsExhausted(usize),
    /// A remote's display name does not fit the name buffer.
    #[error("remote name exceeds {0} bytes")]
    NameTooLong(usize),
    /// A command token did not match any known command.
    #[error("unknown command token")]
    UnknownCommand,
    /// The shared transmitter was used before being set up.
    #[error("shared transmitter is not initialized")]
    NotInitialized,
}
