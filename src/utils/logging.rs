//! Logger setup plus module-gated logging macros.
//!
//! A module opts in to the macros by defining its own flag:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_error};
//!
//! log_info!("workouts listed: owner={} count={}", owner, count);
//! ```
//! Records still pass through the usual `RUST_LOG` level filter, so the flag
//! only ever silences a module, it never forces output.

use log::LevelFilter;

/// Install `env_logger`. `RUST_LOG` overrides `default_level`. Safe to call
/// more than once; later calls are ignored.
pub fn init_logging(default_level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}

#[doc(hidden)]
#[macro_export]
macro_rules! gated_log {
    ($level:expr, $($arg:tt)*) => {
        if ENABLE_LOGS && log::log_enabled!($level) {
            log::log!($level, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::gated_log!(log::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::gated_log!(log::Level::Error, $($arg)*)
    };
}
