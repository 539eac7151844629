//! Somfy RTS frame construction.
//!
//! A frame is 7 bytes:
//!
//! | Byte  | Content                                           |
//! |-------|---------------------------------------------------|
//! | 0     | Key byte [`RTS_KEY_BYTE`] (`0xA7`)                |
//! | 1     | Command code (high nibble) and checksum (low nibble) |
//! | 2..=3 | Rolling code, big-endian                          |
//! | 4..=6 | 24-bit remote address, big-endian                 |
//!
//! The checksum is chosen so that the XOR of all 14 nibbles is zero. Once it is
//! inserted the frame is obfuscated in place: every byte from index 1 on is
//! XORed with the already obfuscated byte before it. Receivers expect this
//! whitened form; it is not encryption.
//!
//! [`build`] performs no I/O. Persisting the advanced rolling code is up to the
//! caller (see [`crate::remote::RemoteController`]).

use crate::command::Command;
use crate::consts::{RTS_ADDRESS_MASK, RTS_FRAME_LEN, RTS_KEY_BYTE};
use crate::storage::RollingCode;

/// An obfuscated frame, ready to be put on air.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame([u8; RTS_FRAME_LEN]);

impl Frame {
    /// Wraps already obfuscated bytes.
    pub const fn from_bytes(bytes: [u8; RTS_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// The bytes as they are transmitted.
    pub const fn as_bytes(&self) -> &[u8; RTS_FRAME_LEN] {
        &self.0
    }

    /// Returns bit `index` of the frame (0..56), most significant bit of byte 0 first.
    pub(crate) const fn bit(&self, index: u8) -> bool {
        let byte = self.0[(index / 8) as usize];
        (byte >> (7 - (index % 8))) & 1 == 1
    }

    /// Reverses the obfuscation, returning the plain frame with its checksum in place.
    pub fn deobfuscated(&self) -> [u8; RTS_FRAME_LEN] {
        let mut plain = self.0;
        deobfuscate(&mut plain);
        plain
    }
}

/// Builds the obfuscated frame for `command` and returns it together with the
/// rolling code to use next.
///
/// Only the low 24 bits of `address` are transmitted. The rolling code wraps from
/// `0xFFFF` to `0x0000`.
///
/// # Example
///
/// ```rust
/// use rts433::command::Command;
/// use rts433::frame::build;
/// use rts433::storage::RollingCode;
///
/// let (frame, next) = build(Command::Up, RollingCode::new(1), 0x123456);
/// assert_eq!(frame.as_bytes(), &[0xA7, 0x8E, 0x8E, 0x8F, 0x9D, 0xA9, 0xFF]);
/// assert_eq!(next, RollingCode::new(2));
/// ```
pub fn build(command: Command, rolling_code: RollingCode, address: u32) -> (Frame, RollingCode) {
    let mut frame = plain_frame(command, rolling_code, address);
    obfuscate(&mut frame);
    (Frame(frame), rolling_code.next())
}

/// Lays out the frame fields and inserts the checksum, without obfuscation.
pub(crate) fn plain_frame(
    command: Command,
    rolling_code: RollingCode,
    address: u32,
) -> [u8; RTS_FRAME_LEN] {
    let [code_hi, code_lo] = rolling_code.value().to_be_bytes();
    let [_, addr_hi, addr_mid, addr_lo] = (address & RTS_ADDRESS_MASK).to_be_bytes();
    let mut frame = [
        RTS_KEY_BYTE,
        command.code() << 4,
        code_hi,
        code_lo,
        addr_hi,
        addr_mid,
        addr_lo,
    ];
    frame[1] |= checksum(&frame);
    frame
}

/// XOR of every nibble of `frame`.
///
/// Computed over a frame whose checksum nibble is still zero, this is the value
/// to insert. Computed over a complete plain frame, it is zero.
pub fn checksum(frame: &[u8; RTS_FRAME_LEN]) -> u8 {
    frame.iter().fold(0, |acc, b| acc ^ b ^ (b >> 4)) & 0x0F
}

/// Chains each byte with its already obfuscated predecessor, in increasing index order.
pub fn obfuscate(frame: &mut [u8; RTS_FRAME_LEN]) {
    for i in 1..RTS_FRAME_LEN {
        frame[i] ^= frame[i - 1];
    }
}

/// Undoes [`obfuscate`] by applying the same chain in decreasing index order.
pub fn deobfuscate(frame: &mut [u8; RTS_FRAME_LEN]) {
    for i in (1..RTS_FRAME_LEN).rev() {
        frame[i] ^= frame[i - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: [Command; 4] = [Command::Up, Command::Down, Command::My, Command::Prog];

    #[test]
    fn test_golden_frame() {
        let plain = plain_frame(Command::Up, RollingCode::new(1), 0x123456);
        assert_eq!(plain, [0xA7, 0x29, 0x00, 0x01, 0x12, 0x34, 0x56]);
        assert_eq!(&plain[4..], &[0x12, 0x34, 0x56]);

        let (frame, next) = build(Command::Up, RollingCode::new(1), 0x123456);
        assert_eq!(
            frame.as_bytes(),
            &[0xA7, 0x8E, 0x8E, 0x8F, 0x9D, 0xA9, 0xFF]
        );
        assert_eq!(next.value(), 2);
    }

    #[test]
    fn test_plain_frame_checksum_reduces_to_zero() {
        for command in COMMANDS {
            for code in [0u16, 1, 2, 0x00FF, 0x1234, 0x8000, 0xFFFE, 0xFFFF] {
                for address in [0u32, 1, 0x123456, 0xABCDEF, 0xFFFFFF] {
                    let plain = plain_frame(command, RollingCode::new(code), address);
                    assert_eq!(checksum(&plain), 0);
                }
            }
        }
    }

    #[test]
    fn test_deobfuscation_restores_plain_frame() {
        for command in COMMANDS {
            for code in [1u16, 0x0102, 0xFFFF] {
                let plain = plain_frame(command, RollingCode::new(code), 0x5A5A5A);
                let (frame, _) = build(command, RollingCode::new(code), 0x5A5A5A);
                assert_eq!(frame.deobfuscated(), plain);
            }
        }
    }

    #[test]
    fn test_key_byte_is_never_obfuscated() {
        for command in COMMANDS {
            for code in [0u16, 7, 0xFFFF] {
                let (frame, _) = build(command, RollingCode::new(code), 0xFEDCBA);
                assert_eq!(frame.as_bytes()[0], RTS_KEY_BYTE);
            }
        }
    }

    #[test]
    fn test_rolling_code_advances_and_wraps() {
        let (_, next) = build(Command::My, RollingCode::new(41), 1);
        assert_eq!(next.value(), 42);
        let (_, next) = build(Command::My, RollingCode::new(0xFFFF), 1);
        assert_eq!(next.value(), 0x0000);
    }

    #[test]
    fn test_address_high_byte_is_ignored() {
        let (masked, _) = build(Command::Down, RollingCode::new(9), 0x00123456);
        let (unmasked, _) = build(Command::Down, RollingCode::new(9), 0xFF123456);
        assert_eq!(masked, unmasked);
    }

    #[test]
    fn test_bits_msb_first() {
        let frame = Frame::from_bytes([0xA7, 0, 0, 0, 0, 0, 0x01]);
        // 0xA7 = 1010_0111
        let first: [bool; 8] = core::array::from_fn(|i| frame.bit(i as u8));
        assert_eq!(first, [true, false, true, false, false, true, true, true]);
        assert!(frame.bit(55));
        assert!(!frame.bit(54));
    }
}
