use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use itertools::iproduct;
use log::{debug, info};
use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;

use crate::segment::TimeBucket;
use crate::tariff::error::TariffError;
use crate::tariff::key::*;

/// `category -> emission -> weight -> axles -> rate`, the layout of one rate-table file.
type NestedTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>>;

/// Every enumerated key combination mapped to a rate per distance unit.
///
/// A table is complete by construction: every [`TariffKey`] has a rate,
/// so a lookup on a classified key cannot miss.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    rates: FxHashMap<TariffKey, f64>,
}

/// Iterates every enumerated [`TariffKey`].
pub fn all_keys() -> impl Iterator<Item = TariffKey> {
    iproduct!(
        RoadClass::iter(),
        TimeBucket::iter(),
        VehicleCategory::iter(),
        EmissionClass::iter(),
        WeightBracket::iter(),
        Axles::iter()
    )
    .map(|(road, bucket, category, emission, weight, axles)| TariffKey {
        road,
        bucket,
        category,
        emission,
        weight,
        axles,
    })
}

impl RateTable {
    /// Builds a table from explicit entries, failing on the first
    /// missing combination or on an unusable rate.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (TariffKey, f64)>,
    ) -> Result<Self, TariffError> {
        let rates = entries.into_iter().collect::<FxHashMap<_, _>>();

        for (key, rate) in &rates {
            if !rate.is_finite() || *rate < 0.0 {
                return Err(TariffError::InvalidRate {
                    key: key.to_string(),
                    rate: *rate,
                });
            }
        }

        if let Some(missing) = all_keys().find(|key| !rates.contains_key(key)) {
            return Err(TariffError::Incomplete(missing.to_string()));
        }

        Ok(RateTable { rates })
    }

    /// Builds a table by computing the rate of every key.
    ///
    /// ```rust
    /// use tollgate::tariff::{RateTable, RoadClass};
    ///
    /// let rates = RateTable::from_fn(|key| match key.road {
    ///     RoadClass::Motorway => 2.5,
    ///     RoadClass::FirstClass => 1.5,
    /// }).unwrap();
    /// ```
    pub fn from_fn(mut rate: impl FnMut(&TariffKey) -> f64) -> Result<Self, TariffError> {
        RateTable::from_entries(all_keys().map(|key| {
            let value = rate(&key);
            (key, value)
        }))
    }

    /// Loads the four tables `d-day.json`, `d-night.json`, `i-day.json`
    /// and `i-night.json` from `directory`.
    pub fn from_directory(directory: impl AsRef<Path>) -> Result<Self, TariffError> {
        let directory = directory.as_ref();
        let mut entries = Vec::new();

        for (road, bucket) in iproduct!(RoadClass::iter(), TimeBucket::iter()) {
            let path = directory.join(format!("{}.json", road.table_name(bucket)));
            let text = fs::read_to_string(&path).map_err(|source| TariffError::Unreadable {
                path: path.clone(),
                source,
            })?;

            let nested: NestedTable =
                serde_json::from_str(&text).map_err(|err| TariffError::Malformed {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;

            let before = entries.len();
            flatten(road, bucket, nested, &mut entries)?;
            debug!("Read {} rates from {}", entries.len() - before, path.display());
        }

        let table = RateTable::from_entries(entries)?;
        info!("Loaded {} rates from {}", table.len(), directory.display());
        Ok(table)
    }

    #[inline]
    pub fn rate(&self, key: &TariffKey) -> Option<f64> {
        self.rates.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

fn parse_key<T: FromStr>(kind: &'static str, key: &str) -> Result<T, TariffError> {
    T::from_str(key).map_err(|_| TariffError::UnknownKey {
        kind,
        key: key.to_string(),
    })
}

fn flatten(
    road: RoadClass,
    bucket: TimeBucket,
    nested: NestedTable,
    entries: &mut Vec<(TariffKey, f64)>,
) -> Result<(), TariffError> {
    for (category, emissions) in nested {
        let category = parse_key::<VehicleCategory>("category", &category)?;

        for (emission, weights) in emissions {
            let emission = parse_key::<EmissionClass>("emission", &emission)?;

            for (weight, axle_rates) in weights {
                let weight = parse_key::<WeightBracket>("weight", &weight)?;

                for (axles, rate) in axle_rates {
                    let axles = parse_key::<Axles>("axles", &axles)?;

                    entries.push((
                        TariffKey {
                            road,
                            bucket,
                            category,
                            emission,
                            weight,
                            axles,
                        },
                        rate,
                    ));
                }
            }
        }
    }

    Ok(())
}
