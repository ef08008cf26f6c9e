//! Paths to the sample road model, rate tables and traces
//! shared by tests and benchmarks.

use std::path::PathBuf;

/// Directory of `*.wkt` road sections (`I35`, `D10`).
pub const ROAD_MODEL: &str = "model";

/// Directory holding `d-day.json`, `d-night.json`, `i-day.json` and `i-night.json`.
pub const RATE_TABLES: &str = "sazba";

/// A drive along the whole of `I35`, a transit off the network, then the whole of `D10`.
pub const TRACE_I35_D10: &str = "trace-i35-d10.wkt";

/// An `N` category unit, emission class `6`, 8500kg on 4 axles.
pub const UNIT_N_EURO6: &str = "obu1.json";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}
