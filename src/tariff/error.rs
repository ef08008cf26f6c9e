use std::path::PathBuf;

use thiserror::Error;

/// A unit or segment that cannot be classified into the rate table.
///
/// The segment cannot be priced; it is reported to the caller rather
/// than billed at a zero rate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("road {0} is neither a motorway (D) nor a first-class road (I)")]
    UnknownRoadClass(String),

    #[error("vehicle category {0} is not tolled")]
    UnknownCategory(String),

    #[error("emission class {0} is not known")]
    UnknownEmission(String),

    #[error("weight of {0}kg falls outside every bracket")]
    WeightOutOfRange(u32),

    #[error("{axles} axles are not priced for category {category}")]
    UnsupportedAxles { axles: u32, category: String },
}

/// Failures to build a rate table.
#[derive(Error, Debug)]
pub enum TariffError {
    #[error("failed to read rate table {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rate table {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("unknown {kind} key {key:?} in rate table")]
    UnknownKey { kind: &'static str, key: String },

    #[error("rate table has no rate for {0}")]
    Incomplete(String),

    #[error("rate for {key} must be a finite, non-negative number, got {rate}")]
    InvalidRate { key: String, rate: f64 },

    #[error("distance unit must be positive, got {0}")]
    InvalidDistanceUnit(f64),
}
