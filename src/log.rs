//! Logging macros
//!
//! On the firmware these forward to `defmt`; on the host they compile to nothing.

#![allow(unused_macros)]

#[cfg(target_arch = "arm")]
macro_rules! log_info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(target_arch = "arm")]
macro_rules! log_debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(target_arch = "arm")]
macro_rules! log_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(target_arch = "arm"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(target_arch = "arm"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(target_arch = "arm"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}
