//! Diagnostic sink for the crate.
//!
//! Routes to `log` and/or `defmt` depending on enabled features. With neither
//! feature enabled the macros expand to nothing; the diagnostic output is a
//! one-way notification and its absence never changes behavior.

#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
    }};
}

// Named `warn_` internally because a plain `warn` re-export is ambiguous
// with the built-in `warn` attribute (E0659).
macro_rules! warn_ {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
    }};
}

pub(crate) use warn_ as warn;
pub(crate) use {debug, trace};
