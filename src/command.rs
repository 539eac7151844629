//! Button commands understood by Somfy RTS receivers.
//!
//! Each command travels as the high nibble of `frame[1]`. Commands can also be
//! selected from text, where only the first character matters and case is
//! ignored: `"u"`, `"Up"` and `"UP"` all select [`Command::Up`].
//!
//! ## Unknown selectors
//!
//! [`Command::from_selector`] never fails: any selector that does not start with
//! `U`, `D`, `M` or `P` resolves to [`Command::FALLBACK`] (`MY`, the stop/favourite
//! button) and the substitution is logged. A typo therefore never moves a blind
//! up or down. Callers that would rather reject such input use
//! [`Command::try_from_selector`] or [`str::parse`].

use core::str::FromStr;

use crate::error::Error;

/// A Somfy RTS button.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// Stop, or go to the favourite position when idle.
    My,
    /// Raise the blind.
    Up,
    /// Lower the blind.
    Down,
    /// Enter programming mode on the receiver.
    Prog,
}

impl Command {
    /// The command used when a selector cannot be resolved.
    pub const FALLBACK: Command = Command::My;

    /// Returns the 4-bit code transmitted for this command.
    pub const fn code(self) -> u8 {
        match self {
            Command::My => 0x1,
            Command::Up => 0x2,
            Command::Down => 0x4,
            Command::Prog => 0x8,
        }
    }

    /// Resolves a textual selector, returning `None` when its first character is not
    /// one of `U`, `D`, `M` or `P` (in either case).
    pub fn try_from_selector(selector: &str) -> Option<Command> {
        match selector.chars().next()?.to_ascii_uppercase() {
            'U' => Some(Command::Up),
            'D' => Some(Command::Down),
            'M' => Some(Command::My),
            'P' => Some(Command::Prog),
            _ => None,
        }
    }

    /// Resolves a textual selector, substituting [`Command::FALLBACK`] for anything
    /// unrecognized (including the empty string).
    pub fn from_selector(selector: &str) -> Command {
        match Command::try_from_selector(selector) {
            Some(command) => command,
            None => {
                warn!(
                    "unrecognized command selector, falling back to {:?}",
                    Command::FALLBACK
                );
                Command::FALLBACK
            }
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    /// Strict parsing: unknown selectors are an error instead of a fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::try_from_selector(s).ok_or(Error::UnknownCommand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::Up.code(), 0x2);
        assert_eq!(Command::Down.code(), 0x4);
        assert_eq!(Command::My.code(), 0x1);
        assert_eq!(Command::Prog.code(), 0x8);
    }

    #[test]
    fn test_selector_first_character_case_insensitive() {
        assert_eq!(Command::from_selector("u"), Command::Up);
        assert_eq!(Command::from_selector("Up"), Command::Up);
        assert_eq!(Command::from_selector("DOWN"), Command::Down);
        assert_eq!(Command::from_selector("d"), Command::Down);
        assert_eq!(Command::from_selector("my"), Command::My);
        assert_eq!(Command::from_selector("Prog"), Command::Prog);
        // Only the first character is significant
        assert_eq!(Command::from_selector("Upwards!"), Command::Up);
        assert_eq!(Command::from_selector("pause"), Command::Prog);
    }

    #[test]
    fn test_unknown_selector_falls_back_to_my() {
        assert_eq!(Command::from_selector("X"), Command::My);
        assert_eq!(Command::from_selector(""), Command::My);
        assert_eq!(Command::from_selector(" up"), Command::My);
        assert_eq!(Command::try_from_selector("X"), None);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert_eq!("down".parse::<Command>(), Ok(Command::Down));
        assert_eq!("stop".parse::<Command>(), Err(Error::UnknownCommand));
        assert_eq!("".parse::<Command>(), Err(Error::UnknownCommand));
    }
}
