#![deny(missing_docs)]
//! Shared logging utilities for the PhotoPro workspace.
//!
//! Every crate logs through the `pp_*` macros so that all client output
//! carries the same [`TARGET`] and can be filtered as one unit.

use log::LevelFilter;

/// Log target used by every `pp_*` macro.
pub const TARGET: &str = "photopro";

/// Logs a trace-level message under the PhotoPro target.
#[macro_export]
macro_rules! pp_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the PhotoPro target.
#[macro_export]
macro_rules! pp_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the PhotoPro target.
#[macro_export]
macro_rules! pp_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the PhotoPro target.
#[macro_export]
macro_rules! pp_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the PhotoPro target.
#[macro_export]
macro_rules! pp_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Maps a `-v` repetition count to a level filter.
///
/// Zero keeps the client quiet apart from warnings; each extra flag opens one
/// more level, saturating at trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Another test may have won the race to install the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
