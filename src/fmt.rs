//! Logging shims.
//!
//! Forwards to `defmt` when `defmt-0-3` is enabled, otherwise to `log` when
//! `log` is enabled, and compiles the arguments away when neither is.

#[cfg(feature = "defmt-0-3")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(feature = "defmt-0-3")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(feature = "defmt-0-3")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}

#[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}

#[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
macro_rules! warn {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

// Stub macros when no logging backend is available
#[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
macro_rules! info {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
macro_rules! warn {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}
