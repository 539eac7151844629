//! Rolling code persistence.
//!
//! Every remote owns a 4-byte [`StorageSlot`] in a byte-addressable persistent
//! store (EEPROM, a flash page, a file...). The store itself is an external
//! collaborator described by the [`ByteStore`] trait; this module layers the
//! rolling code contract on top of it:
//!
//! - [`SlotAllocator`] hands out disjoint slots in construction order and refuses
//!   to hand out slots past the end of the store.
//! - [`RollingCodeStore::load`] never fails. A blank, erased or unreadable slot
//!   yields [`RollingCode::DEFAULT`] so that a brand new remote can send at once.
//! - [`RollingCodeStore::save`] writes and then flushes the store, and reports any
//!   failure, since a lost write desynchronizes the remote from its receivers.
//!
//! ## Slot layout
//!
//! | Byte  | Content                              |
//! |-------|--------------------------------------|
//! | 0..=1 | Rolling code, little-endian `u16`    |
//! | 2..=3 | Reserved, written as `0x00`          |
//!
//! A slot reading `0x0000` in its first two bytes, or `0xFF` in all four
//! (erased EEPROM/flash), holds no rolling code.

use crate::consts::{RTS_DEFAULT_ROLLING_CODE, RTS_SLOT_LEN};
use crate::error::{Error, Result};

/// The 16-bit anti-replay counter of a remote.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RollingCode(u16);

impl RollingCode {
    /// The code used by a remote that has never transmitted.
    pub const DEFAULT: RollingCode = RollingCode(RTS_DEFAULT_ROLLING_CODE);

    /// Wraps a raw counter value.
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// The raw counter value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The code following this one, wrapping from `0xFFFF` to `0x0000`.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Encodes the code in the slot layout.
    pub const fn to_slot_bytes(self) -> [u8; RTS_SLOT_LEN] {
        let [lo, hi] = self.0.to_le_bytes();
        [lo, hi, 0x00, 0x00]
    }

    /// Decodes a slot, returning `None` if it holds no rolling code.
    pub const fn from_slot_bytes(bytes: [u8; RTS_SLOT_LEN]) -> Option<Self> {
        if matches!(bytes, [0xFF, 0xFF, 0xFF, 0xFF]) {
            return None;
        }
        match u16::from_le_bytes([bytes[0], bytes[1]]) {
            0 => None,
            value => Some(Self(value)),
        }
    }
}

impl Default for RollingCode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A fixed-size, byte-addressable persistent store.
///
/// Implementations must not expose torn writes: once [`flush`](ByteStore::flush)
/// returns `Ok`, everything written before it survives a power cycle.
pub trait ByteStore {
    /// Error reported by the underlying storage.
    type Error;

    /// Total size of the store in bytes.
    fn capacity(&self) -> usize;

    /// Fills `buf` with the bytes stored at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Stores `bytes` at `offset`.
    fn write(&mut self, offset: usize, bytes: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Commits pending writes to durable storage.
    ///
    /// Stores that write through (most EEPROMs) keep the default no-op.
    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// A RAM-backed [`ByteStore`].
///
/// Useful on hosts, in tests, and in front of storage that is loaded and saved as a
/// whole block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> MemoryStore<N> {
    /// A store in the erased state (all `0xFF`), like fresh EEPROM or flash.
    pub const fn erased() -> Self {
        Self { bytes: [0xFF; N] }
    }

    /// A store filled with zeroes.
    pub const fn zeroed() -> Self {
        Self { bytes: [0x00; N] }
    }

    /// A store holding a previously saved image.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// The raw contents of the store.
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    fn range(&self, offset: usize, len: usize) -> Result<core::ops::Range<usize>> {
        match offset.checked_add(len) {
            Some(end) if end <= N => Ok(offset..end),
            _ => Err(Error::OutOfBounds { offset, len }),
        }
    }
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::erased()
    }
}

impl<const N: usize> ByteStore for MemoryStore<N> {
    type Error = Error;

    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let range = self.range(offset, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }
}

/// The region of the persistent store owned by one remote.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct StorageSlot(usize);

impl StorageSlot {
    /// Byte offset of the slot in the store.
    pub const fn offset(self) -> usize {
        self.0
    }

    /// Position of the slot in allocation order.
    pub const fn index(self) -> usize {
        self.0 / RTS_SLOT_LEN
    }
}

/// Hands out storage slots in allocation order, `RTS_SLOT_LEN` bytes apart.
///
/// Created with [`SlotAllocator::for_store`], so slots never extend past the
/// store that will hold them.
///
/// One allocator should exist per persistent store, owned by whatever creates the
/// remotes. Creating remotes in the same order across restarts gives each one the
/// same slot, and therefore its own rolling code, again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAllocator {
    next: usize,
    capacity: usize,
}

impl SlotAllocator {
    /// An allocator for a store of `capacity` bytes, starting at offset 0.
    pub(crate) const fn new(capacity: usize) -> Self {
        Self { next: 0, capacity }
    }

    /// An allocator sized after `store`.
    pub fn for_store<S: ByteStore>(store: &S) -> Self {
        Self::new(store.capacity())
    }

    /// Number of slots still available.
    pub const fn remaining(&self) -> usize {
        (self.capacity - self.next) / RTS_SLOT_LEN
    }

    /// Reserves the next slot.
    ///
    /// # Errors
    /// [`Error::SlotsExhausted`] once the next slot would not fit in the store.
    pub fn allocate(&mut self) -> Result<StorageSlot> {
        if self.remaining() == 0 {
            return Err(Error::SlotsExhausted(self.capacity));
        }
        let slot = StorageSlot(self.next);
        self.next += RTS_SLOT_LEN;
        Ok(slot)
    }
}

/// Loads and saves rolling codes in a shared [`ByteStore`].
#[derive(Debug)]
pub struct RollingCodeStore<S: ByteStore> {
    store: S,
}

impl<S: ByteStore> RollingCodeStore<S> {
    /// Wraps a persistent store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the wrapped store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Reads the rolling code held in `slot`.
    ///
    /// Falls back to [`RollingCode::DEFAULT`] when the slot is blank, erased, or
    /// cannot be read.
    pub fn load(&mut self, slot: StorageSlot) -> RollingCode {
        let mut bytes = [0u8; RTS_SLOT_LEN];
        if self.store.read(slot.offset(), &mut bytes).is_err() {
            warn!(
                "slot {} unreadable, using default rolling code",
                slot.index()
            );
            return RollingCode::DEFAULT;
        }
        match RollingCode::from_slot_bytes(bytes) {
            Some(code) => code,
            None => {
                debug!("slot {} is blank, using default rolling code", slot.index());
                RollingCode::DEFAULT
            }
        }
    }

    /// Writes `code` to `slot` and commits it.
    ///
    /// # Errors
    /// [`Error::StoreWrite`] if either the write or the commit fails.
    pub fn save(&mut self, slot: StorageSlot, code: RollingCode) -> Result<()> {
        self.store
            .write(slot.offset(), &code.to_slot_bytes())
            .and_then(|()| self.store.flush())
            .map_err(|_| Error::StoreWrite(slot.offset()))?;
        debug!("slot {} now holds rolling code {}", slot.index(), code.value());
        Ok(())
    }
}
