use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::segment::TimeBucket;
use crate::tariff::error::LookupError;

/// Road class, chosen by the first letter of the road name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, AsRefStr,
)]
pub enum RoadClass {
    /// `D..` roads.
    #[strum(serialize = "d")]
    Motorway,

    /// `I..` roads.
    #[strum(serialize = "i")]
    FirstClass,
}

impl RoadClass {
    pub fn of_road(name: &str) -> Result<Self, LookupError> {
        if name.starts_with('D') {
            Ok(RoadClass::Motorway)
        } else if name.starts_with('I') {
            Ok(RoadClass::FirstClass)
        } else {
            Err(LookupError::UnknownRoadClass(name.to_string()))
        }
    }

    /// Stem of the rate-table file for this class and bucket, e.g. `d-night`.
    pub fn table_name(&self, bucket: TimeBucket) -> String {
        format!("{}-{}", self.as_ref(), bucket)
    }
}

/// Vehicle sub-table. `M3` vehicles share the `M2` rates.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum VehicleCategory {
    N,
    M2,
}

impl VehicleCategory {
    pub fn classify(category: &str) -> Result<Self, LookupError> {
        match category {
            "N" => Ok(VehicleCategory::N),
            "M2" | "M3" => Ok(VehicleCategory::M2),
            other => Err(LookupError::UnknownCategory(other.to_string())),
        }
    }

    /// Highest axle count priced separately; more axles are billed as this many.
    pub fn max_axles(&self) -> u32 {
        match self {
            VehicleCategory::N => 5,
            VehicleCategory::M2 => 3,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum EmissionClass {
    #[strum(serialize = "0-4")]
    Euro0To4,
    #[strum(serialize = "5-EEV")]
    Euro5Eev,
    #[strum(serialize = "6")]
    Euro6,
    #[strum(serialize = "CNG")]
    Cng,
}

impl EmissionClass {
    pub fn classify(code: &str) -> Result<Self, LookupError> {
        match code {
            "0" | "1" | "2" | "3" | "4" | "euro0" => Ok(EmissionClass::Euro0To4),
            "5" | "EEV" => Ok(EmissionClass::Euro5Eev),
            "6" => Ok(EmissionClass::Euro6),
            "CNG" => Ok(EmissionClass::Cng),
            other => Err(LookupError::UnknownEmission(other.to_string())),
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum WeightBracket {
    /// Above 3.5t, below 7.5t.
    #[strum(serialize = "35-75")]
    Light,
    /// From 7.5t, below 12t.
    #[strum(serialize = "75-12")]
    Medium,
    /// 12t and above.
    #[strum(serialize = "12")]
    Heavy,
}

impl WeightBracket {
    pub fn classify(kilograms: u32) -> Result<Self, LookupError> {
        match kilograms {
            3501..=7499 => Ok(WeightBracket::Light),
            7500..=11999 => Ok(WeightBracket::Medium),
            12000.. => Ok(WeightBracket::Heavy),
            _ => Err(LookupError::WeightOutOfRange(kilograms)),
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum Axles {
    #[strum(serialize = "2")]
    Two,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
}

impl Axles {
    /// Clamps the count to the category's maximum, then selects the exact bracket.
    pub fn classify(axles: u32, category: VehicleCategory) -> Result<Self, LookupError> {
        match axles.min(category.max_axles()) {
            2 => Ok(Axles::Two),
            3 => Ok(Axles::Three),
            4 => Ok(Axles::Four),
            5 => Ok(Axles::Five),
            _ => Err(LookupError::UnsupportedAxles {
                axles,
                category: category.as_ref().to_string(),
            }),
        }
    }
}

/// The composite key of a single rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TariffKey {
    pub road: RoadClass,
    pub bucket: TimeBucket,
    pub category: VehicleCategory,
    pub emission: EmissionClass,
    pub weight: WeightBracket,
    pub axles: Axles,
}

impl Display for TariffKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.road.table_name(self.bucket),
            self.category.as_ref(),
            self.emission.as_ref(),
            self.weight.as_ref(),
            self.axles.as_ref()
        )
    }
}
