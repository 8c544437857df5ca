//! Thin wrappers around [`tracing`] so every crate logs under the same target.
//!
//! The CLI formatter keys its symbols off the level, `success!` is an
//! `INFO` event tagged with `success = true`.

pub use tracing;

pub const TARGET: &str = "pductl";

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log::tracing::info!(target: $crate::log::TARGET, $($arg)+)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::log::tracing::info!(target: $crate::log::TARGET, success = true, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log::tracing::warn!(target: $crate::log::TARGET, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log::tracing::error!(target: $crate::log::TARGET, $($arg)+)
    };
}
