use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::segment::{Segment, TimeBucket};
use crate::tariff::error::{LookupError, TariffError};
use crate::tariff::key::*;
use crate::tariff::table::RateTable;

/// Billing granularity, in meters.
pub const DISTANCE_UNIT: f64 = 100.0;

/// The attributes of an on-board unit that determine its tariff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitProfile {
    /// Gross weight, in kilograms.
    pub weight: u32,
    pub axles: u32,
    pub category: String,
    pub emission: String,
    pub currency: String,
}

/// Prices distances travelled on a road at a point in time.
#[derive(Clone, Debug)]
pub struct TariffEngine {
    rates: RateTable,
    distance_unit: f64,
}

impl TariffEngine {
    pub fn new(rates: RateTable) -> Self {
        TariffEngine {
            rates,
            distance_unit: DISTANCE_UNIT,
        }
    }

    pub fn with_distance_unit(self, distance_unit: f64) -> Result<Self, TariffError> {
        if !(distance_unit.is_finite() && distance_unit > 0.0) {
            return Err(TariffError::InvalidDistanceUnit(distance_unit));
        }

        Ok(TariffEngine {
            distance_unit,
            ..self
        })
    }

    pub fn distance_unit(&self) -> f64 {
        self.distance_unit
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Resolves the composite key for a unit on a road at a time.
    pub fn classify(
        &self,
        unit: &UnitProfile,
        road_name: &str,
        timestamp: &DateTime<FixedOffset>,
    ) -> Result<TariffKey, LookupError> {
        let road = RoadClass::of_road(road_name)?;
        let bucket = TimeBucket::of(timestamp);
        let category = VehicleCategory::classify(&unit.category)?;
        let emission = EmissionClass::classify(&unit.emission)?;
        let weight = WeightBracket::classify(unit.weight)?;
        let axles = Axles::classify(unit.axles, category)?;

        Ok(TariffKey {
            road,
            bucket,
            category,
            emission,
            weight,
            axles,
        })
    }

    /// The rate per distance unit for a unit on a road at a time.
    pub fn rate(
        &self,
        unit: &UnitProfile,
        road_name: &str,
        timestamp: &DateTime<FixedOffset>,
    ) -> Result<f64, LookupError> {
        let key = self.classify(unit, road_name, timestamp)?;

        // Tables are validated complete on construction
        Ok(self.rates.rate(&key).unwrap_or_default())
    }

    /// The charge for travelling `distance` meters.
    ///
    /// Distances shorter than one distance unit are free and are not
    /// classified at all. Longer distances are billed pro rata:
    /// `rate * distance / unit`.
    pub fn charge(
        &self,
        distance: f64,
        unit: &UnitProfile,
        road_name: &str,
        timestamp: &DateTime<FixedOffset>,
    ) -> Result<f64, LookupError> {
        if distance < self.distance_unit {
            return Ok(0.0);
        }

        let rate = self.rate(unit, road_name, timestamp)?;
        Ok(rate * (distance / self.distance_unit))
    }

    pub fn price(&self, segment: &Segment, unit: &UnitProfile) -> Result<f64, LookupError> {
        self.charge(
            segment.distance,
            unit,
            &segment.road_name,
            &segment.timestamp,
        )
    }
}
