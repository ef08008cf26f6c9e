//! Day/night rate tables per road class, and the classification
//! of a unit's attributes into a single rate.

pub mod engine;
#[doc(hidden)]
pub mod error;
pub mod key;
pub mod table;

#[doc(inline)]
pub use engine::{TariffEngine, UnitProfile, DISTANCE_UNIT};
#[doc(inline)]
pub use error::{LookupError, TariffError};
#[doc(inline)]
pub use key::{Axles, EmissionClass, RoadClass, TariffKey, VehicleCategory, WeightBracket};
#[doc(inline)]
pub use table::{all_keys, RateTable};
