//! Constants used across the Somfy RTS protocol implementation.
//!
//! This module defines the frame layout, the waveform timings, and the
//! persistence layout shared by the frame builder, the pulse sequencer and
//! the rolling code store.
//!
//! ## Key Concepts
//!
//! - **Key byte**: The fixed first byte of every frame. It is never touched by obfuscation.
//! - **Symbol**: The base time unit of the waveform. One Manchester half-bit lasts one symbol.
//! - **Sync**: Hardware sync pulses (2 on the first frame, 7 on repeats) followed by one
//!   software sync pulse that marks the start of the data bits.
//! - **Slots**: Every remote owns a fixed-size region of the persistent store holding its
//!   rolling code.
//!
//! All durations are in microseconds.

/// Length (in bytes) of a Somfy RTS frame.
pub const RTS_FRAME_LEN: usize = 7;

/// Number of data bits carried by one frame.
pub const RTS_FRAME_BITS: u8 = (RTS_FRAME_LEN * 8) as u8;

/// The fixed protocol key byte placed in `frame[0]`.
pub const RTS_KEY_BYTE: u8 = 0xA7;

/// Mask selecting the 24 address bits of a remote.
pub const RTS_ADDRESS_MASK: u32 = 0x00FF_FFFF;

/// Base time unit of the waveform.
pub const RTS_SYMBOL_US: u32 = 604;

/// Duration of the wake-up pulse sent before the first frame.
pub const RTS_WAKEUP_HIGH_US: u32 = 9_415;

/// Silence following the wake-up pulse, giving the receiver time to power its radio.
pub const RTS_WAKEUP_LOW_US: u32 = 89_565;

/// Duration of each half of a hardware sync pulse (4 symbols).
pub const RTS_HARDWARE_SYNC_US: u32 = 4 * RTS_SYMBOL_US;

/// High half of the software sync pulse.
pub const RTS_SOFTWARE_SYNC_HIGH_US: u32 = 4_550;

/// Low half of the software sync pulse (1 symbol).
pub const RTS_SOFTWARE_SYNC_LOW_US: u32 = RTS_SYMBOL_US;

/// Silence after the last data bit of a frame.
pub const RTS_INTER_FRAME_SILENCE_US: u32 = 30_415;

/// Hardware sync pulses preceding the first frame of a command.
pub const RTS_FIRST_FRAME_SYNC: u8 = 2;

/// Hardware sync pulses preceding every repeated frame.
pub const RTS_REPEAT_FRAME_SYNC: u8 = 7;

/// Number of repeated frames sent after the first one.
pub const RTS_FRAME_REPEATS: u8 = 2;

/// Somfy RTS carrier frequency: 433.42 MHz
pub const RTS_FREQUENCY_HZ: u32 = 433_420_000;

/// Bytes of persistent storage reserved for each remote.
pub const RTS_SLOT_LEN: usize = 4;

/// Rolling code used when no previous value can be recovered from storage.
pub const RTS_DEFAULT_ROLLING_CODE: u16 = 1;

/// Maximum length (in bytes) of a remote's display name in `no_std` builds.
pub const RTS_MAX_NAME_LEN: usize = 32;
