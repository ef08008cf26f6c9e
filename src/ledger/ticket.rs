use chrono::{DateTime, SecondsFormat};
use log::info;
use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, LedgerError, OnBoardUnit};
use crate::matcher::Checkpoint;
use crate::trip::{price_checkpoints, TollContext, TripCharge};
use crate::Error;

/// The checkpoints of a trip as parallel arrays: section index,
/// point index and RFC3339 timestamp.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub i: Vec<usize>,
    pub j: Vec<usize>,
    pub time: Vec<String>,
}

impl Polygon {
    pub fn from_checkpoints(checkpoints: &[Checkpoint]) -> Self {
        let mut polygon = Polygon::default();
        for checkpoint in checkpoints {
            polygon.i.push(checkpoint.section);
            polygon.j.push(checkpoint.point);
            polygon
                .time
                .push(checkpoint.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        polygon
    }

    pub fn checkpoints(&self) -> crate::Result<Vec<Checkpoint>> {
        if self.i.len() != self.j.len() || self.i.len() != self.time.len() {
            return Err(Error::Ticket(format!(
                "uneven polygon: {} sections, {} points, {} times",
                self.i.len(),
                self.j.len(),
                self.time.len()
            )));
        }

        self.i
            .iter()
            .zip(&self.j)
            .zip(&self.time)
            .map(|((&section, &point), time)| {
                let timestamp = DateTime::parse_from_rfc3339(time)
                    .map_err(|err| Error::Ticket(format!("bad time {time:?}: {err}")))?;

                Ok(Checkpoint::new(section, point, timestamp))
            })
            .collect()
    }
}

/// A trip reported by an on-board unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub obu: OnBoardUnit,
    pub polygon: Polygon,
}

impl Ticket {
    pub fn new(obu: OnBoardUnit, checkpoints: &[Checkpoint]) -> Self {
        Ticket {
            obu,
            polygon: Polygon::from_checkpoints(checkpoints),
        }
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(|err| Error::Ticket(err.to_string()))
    }
}

/// Prices a ticket and credits the toll to the unit that reported it.
///
/// The unit must already be registered; its stored attributes, not the
/// ones carried by the ticket, determine the tariff. The credited amount
/// is the total rounded to two decimals.
pub fn process_ticket<L: Ledger>(
    ledger: &L,
    context: &TollContext,
    ticket: &Ticket,
) -> crate::Result<(OnBoardUnit, TripCharge)> {
    let key = ticket.obu.key();
    let stored = ledger.read_unit(&key)?;

    let checkpoints = ticket.polygon.checkpoints()?;
    let charge = price_checkpoints(context, checkpoints, &stored.profile())?;

    let amount = (charge.total * 100.0).round() / 100.0;
    let updated = ledger.credit_toll(&key, amount)?;

    info!(
        "Credited {amount:.2} {} to {key} ({} segments, {} unpriced)",
        updated.currency,
        charge.segments.len(),
        charge.failures.len()
    );

    Ok((updated, charge))
}

/// Brings the stored attributes of a unit in line with what it reports.
///
/// Returns the stored unit and whether anything was changed.
pub fn sync_unit<L: Ledger>(
    ledger: &L,
    reported: &OnBoardUnit,
) -> Result<(OnBoardUnit, bool), LedgerError> {
    let key = reported.key();
    let stored = ledger.read_unit(&key)?;

    if stored.emission == reported.emission
        && stored.weight == reported.weight
        && stored.axles == reported.axles
    {
        return Ok((stored, false));
    }

    ledger.update_unit(&key, &reported.emission, reported.weight, reported.axles)?;
    info!("Modified parameters of unit {key}");

    Ok((ledger.read_unit(&key)?, true))
}
