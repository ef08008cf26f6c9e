#![doc = include_str!("../README.md")]

pub mod config;
pub mod geo;
pub mod ledger;
pub mod matcher;
pub mod model;
pub mod segment;
pub mod sync;
pub mod tariff;
pub mod trip;
pub mod util;

#[doc(inline)]
pub use config::TollConfig;
#[doc(inline)]
pub use crate::geo::RoadPoint;
#[doc(inline)]
pub use matcher::{Checkpoint, MapMatcher};
#[doc(inline)]
pub use model::{RoadModel, RoadSection};
#[doc(inline)]
pub use segment::{Segment, TimeBucket};
#[doc(inline)]
pub use sync::ModelSynchronizer;
#[doc(inline)]
pub use tariff::{RateTable, TariffEngine};
#[doc(inline)]
pub use trip::{ContextRegistry, TollContext, TripCharge};

use crate::config::ConfigError;
use crate::geo::GeoError;
use crate::ledger::LedgerError;
use crate::model::ModelError;
use crate::sync::SyncError;
use crate::tariff::TariffError;

/// The crate-wide error, wrapping the error of each submodule.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Geo(GeoError),

    #[error(transparent)]
    Model(ModelError),

    #[error(transparent)]
    Sync(SyncError),

    #[error(transparent)]
    Tariff(TariffError),

    #[error(transparent)]
    Ledger(LedgerError),

    #[error(transparent)]
    Config(ConfigError),

    #[error("ticket rejected: {0}")]
    Ticket(String),

    #[error("invalid input: {0}")]
    Input(String),
}

impl_err!(GeoError, Geo);
impl_err!(ModelError, Model);
impl_err!(SyncError, Sync);
impl_err!(TariffError, Tariff);
impl_err!(LedgerError, Ledger);
impl_err!(ConfigError, Config);

pub type Result<T> = std::result::Result<T, Error>;
