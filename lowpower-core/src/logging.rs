//! Crate-internal logging macros
//!
//! Routes to `log` on hosted builds and `defmt` on the target. With neither
//! feature enabled the macros expand to nothing, so the cycle code can log
//! freely without paying for it on the smallest builds.
//!
//! Only pass primitives and `&str` as arguments: both backends must be able
//! to format them with a plain `{}`.

macro_rules! node_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        { log::debug!($($arg)*); }
        #[cfg(feature = "defmt")]
        { defmt::debug!($($arg)*); }
    }};
}

macro_rules! node_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        { log::info!($($arg)*); }
        #[cfg(feature = "defmt")]
        { defmt::info!($($arg)*); }
    }};
}

macro_rules! node_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        { log::warn!($($arg)*); }
        #[cfg(feature = "defmt")]
        { defmt::warn!($($arg)*); }
    }};
}
