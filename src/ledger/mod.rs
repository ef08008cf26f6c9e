//! Accounts of on-board units, credited with the toll of each ticket.

#[doc(hidden)]
pub mod error;
pub mod ticket;
#[cfg(test)]
mod test;

#[doc(inline)]
pub use error::LedgerError;
#[doc(inline)]
pub use ticket::{process_ticket, sync_unit, Polygon, Ticket};

use std::fmt;
use std::sync::{PoisonError, RwLock};

use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::tariff::UnitProfile;

/// Identifies a unit: its own id, the plate of the vehicle it is
/// fitted to, and the country of registration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitKey {
    pub id: String,
    pub plate: String,
    pub country: String,
}

impl UnitKey {
    pub fn new(id: impl Into<String>, plate: impl Into<String>, country: impl Into<String>) -> Self {
        UnitKey {
            id: id.into(),
            plate: plate.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.id, self.plate, self.country)
    }
}

/// An on-board unit, as stored in the ledger and reported by the device.
///
/// Written with the ledger's PascalCase keys; the lowercase keys sent
/// by units are accepted on input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OnBoardUnit {
    #[serde(rename = "ID", alias = "id", alias = "Id")]
    pub id: String,
    #[serde(rename = "SPZ", alias = "spz", alias = "Spz")]
    pub plate: String,
    #[serde(alias = "country")]
    pub country: String,

    /// Accumulated toll, in `currency`.
    #[serde(alias = "credit")]
    pub credit: f64,
    #[serde(alias = "currency")]
    pub currency: String,

    /// Gross weight, in kilograms.
    #[serde(alias = "weight")]
    pub weight: u32,
    #[serde(alias = "emission")]
    pub emission: String,
    #[serde(alias = "category")]
    pub category: String,
    #[serde(alias = "axles")]
    pub axles: u32,
}

impl OnBoardUnit {
    pub fn key(&self) -> UnitKey {
        UnitKey::new(&self.id, &self.plate, &self.country)
    }

    /// The attributes the tariff is classified on.
    pub fn profile(&self) -> UnitProfile {
        UnitProfile {
            weight: self.weight,
            axles: self.axles,
            category: self.category.clone(),
            emission: self.emission.clone(),
            currency: self.currency.clone(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Persistent storage of on-board units.
pub trait Ledger {
    fn read_unit(&self, key: &UnitKey) -> Result<OnBoardUnit, LedgerError>;

    /// Registers a new unit. Fails if a unit with the same key exists.
    fn create_unit(&self, unit: OnBoardUnit) -> Result<(), LedgerError>;

    /// Adds `amount` to the unit's credit, returning the updated unit.
    fn credit_toll(&self, key: &UnitKey, amount: f64) -> Result<OnBoardUnit, LedgerError>;

    /// Replaces the emission class, weight and axle count of a unit.
    fn update_unit(
        &self,
        key: &UnitKey,
        emission: &str,
        weight: u32,
        axles: u32,
    ) -> Result<(), LedgerError>;

    fn reset_credit(&self, key: &UnitKey) -> Result<(), LedgerError>;

    fn delete_unit(&self, key: &UnitKey) -> Result<(), LedgerError>;

    /// Every registered unit, in no particular order.
    fn all_units(&self) -> Vec<OnBoardUnit>;
}

/// A ledger held in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    units: RwLock<FxHashMap<UnitKey, OnBoardUnit>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger seeded with `units`. Duplicate keys are rejected.
    pub fn with_units(units: impl IntoIterator<Item = OnBoardUnit>) -> Result<Self, LedgerError> {
        let ledger = MemoryLedger::new();
        for unit in units {
            ledger.create_unit(unit)?;
        }

        Ok(ledger)
    }

    /// Seeds a ledger from a JSON array of unit records.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let units: Vec<OnBoardUnit> = serde_json::from_str(text)
            .map_err(|err| crate::Error::Input(format!("malformed unit list: {err}")))?;

        let ledger = MemoryLedger::with_units(units)?;
        info!("Seeded ledger with {} units", ledger.len());
        Ok(ledger)
    }

    pub fn len(&self) -> usize {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn modify<T>(
        &self,
        key: &UnitKey,
        f: impl FnOnce(&mut OnBoardUnit) -> T,
    ) -> Result<T, LedgerError> {
        let mut units = self.units.write().unwrap_or_else(PoisonError::into_inner);
        let unit = units
            .get_mut(key)
            .ok_or_else(|| LedgerError::NotFound(key.clone()))?;

        Ok(f(unit))
    }
}

impl Ledger for MemoryLedger {
    fn read_unit(&self, key: &UnitKey) -> Result<OnBoardUnit, LedgerError> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(key.clone()))
    }

    fn create_unit(&self, unit: OnBoardUnit) -> Result<(), LedgerError> {
        let key = unit.key();
        let mut units = self.units.write().unwrap_or_else(PoisonError::into_inner);
        if units.contains_key(&key) {
            return Err(LedgerError::AlreadyExists(key));
        }

        debug!("Created unit {key}");
        units.insert(key, unit);
        Ok(())
    }

    fn credit_toll(&self, key: &UnitKey, amount: f64) -> Result<OnBoardUnit, LedgerError> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(LedgerError::InvalidAmount {
                key: key.clone(),
                amount,
            });
        }

        self.modify(key, |unit| {
            unit.credit += amount;
            unit.clone()
        })
    }

    fn update_unit(
        &self,
        key: &UnitKey,
        emission: &str,
        weight: u32,
        axles: u32,
    ) -> Result<(), LedgerError> {
        self.modify(key, |unit| {
            unit.emission = emission.to_string();
            unit.weight = weight;
            unit.axles = axles;
        })
    }

    fn reset_credit(&self, key: &UnitKey) -> Result<(), LedgerError> {
        self.modify(key, |unit| unit.credit = 0.0)
    }

    fn delete_unit(&self, key: &UnitKey) -> Result<(), LedgerError> {
        self.units
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| LedgerError::NotFound(key.clone()))
    }

    fn all_units(&self) -> Vec<OnBoardUnit> {
        self.units
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}
