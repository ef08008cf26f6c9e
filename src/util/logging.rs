//! Installs the `env_logger` backend behind the `log` facade.
//!
//! The filter is taken from `RUST_LOG`, for example:
//! ```bash
//! RUST_LOG=tollgate=debug tollgate evaluate ...
//! ```

use env_logger::Env;

/// Initialises the logger, defaulting to `info` when `RUST_LOG` is unset.
/// Calling this more than once is harmless; later calls are ignored.
pub fn initialize_logger() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
