// src/utils/log.rs

//! Logging setup for the colour flood library and its binary.
//!
//! The library itself only emits records through the `log` facade
//! (`info!` for seeding and progress milestones, `warn!` for skipped seeds
//! and failed snapshots, `debug!` for worker pool details). A binary picks
//! the backend; [`init_logger`] wires up `env_logger`.
//!
//! ```no_run
//! colour_flood::utils::log::init_logger(log::Level::Info);
//! log::info!("ready");
//! ```

pub use log::{Level, debug, error, info, trace, warn};

/// Initializes a global logger writing to standard error.
///
/// `max_level` is the default filter; a `RUST_LOG` environment variable, when
/// set, takes precedence. Calling this more than once is harmless: later calls
/// leave the first logger in place.
pub fn init_logger(max_level: Level) {
    let _ = env_logger::Builder::new()
        .filter_level(max_level.to_level_filter())
        .format_target(false)
        .parse_default_env()
        .try_init();
}
