//! # rts433
//!
//! A portable, no_std Rust transmitter for the Somfy RTS (Radio Technology Somfy)
//! protocol, for 433.42 MHz OOK modules driving motorized blinds and shutters.
//!
//! This crate implements the sender side of the protocol using:
//! - `embedded-hal` traits for the data pin and microsecond delays
//! - a pure frame builder (checksum, rolling code, obfuscation)
//! - a waveform expressed as data ([`pulse::Pulses`]) replayed by a blocking emitter
//! - rolling code persistence over any byte-addressable store (EEPROM, flash...)
//!
//! ## Crate features
//! | Feature              | Description |
//! |----------------------|-------------|
//! | `std`                | Disables `#![no_std]` support and replaces `heapless::String`s with `std::string::String`s |
//! | `irq-free` (default) | Emits each frame inside `critical_section::with` and enables the [`shared`] global transmitter |
//! | `defmt-0-3`          | Uses `defmt` logging |
//! | `log`                | Uses `log` logging |
//!
//! ## Protocol Features
//!
//! - **Commands**: UP, DOWN, MY (stop/favourite) and PROG
//! - **Frames**: 7 bytes, XOR-of-nibbles checksum, chained-XOR obfuscation
//! - **Rolling codes**: one 16-bit counter per remote, persisted after every command
//! - **Timing**: wake-up pulse, hardware and software sync, Manchester data bits,
//!   inter-frame silence; every command is sent as three frames
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rts433::command::Command;
//! use rts433::emitter::RtsEmitter;
//! use rts433::radio::NoRadio;
//! use rts433::remote::{RemoteController, RemoteIdentity, RtsTransmitter};
//! use rts433::storage::SlotAllocator;
//!
//! let mut slots = SlotAllocator::for_store(&eeprom);
//! let mut transmitter = RtsTransmitter::new(RtsEmitter::new(tx_pin, delay), NoRadio, eeprom);
//! transmitter.init()?;
//!
//! let blinds = RemoteController::new(RemoteIdentity::new("Blinds", 0x123456, &mut slots)?);
//! blinds.send(&mut transmitter, Command::Up)?;
//! ```
//!
//! ## Integration Notes
//!
//! - Timing precision is critical; give the emitter the most precise busy-wait delay available
//! - Remotes must be created in the same order on every boot so they keep their storage slots
//! - Only one transmission may be in progress at a time; all remotes share one radio
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "irq-free")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod command;
pub mod consts;
pub mod emitter;
pub mod error;
pub mod frame;
pub mod pulse;
pub mod radio;
pub mod remote;
#[cfg(feature = "irq-free")]
pub mod shared;
pub mod storage;

pub use error::{Error, Result};
