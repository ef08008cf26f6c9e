//! End-to-end evaluation of a trip: matching, aggregation and pricing.

pub mod context;

#[doc(inline)]
pub use context::{ContextRegistry, TollContext};

use log::{debug, warn};
use measure_time::debug_time;
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::geo::Waypoint;
use crate::matcher::{Checkpoint, Clock, MapMatcher};
use crate::model::ModelError;
use crate::segment::{Segment, SegmentAggregator};
use crate::tariff::{LookupError, UnitProfile};

/// A segment together with what it cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricedSegment {
    #[serde(flatten)]
    pub segment: Segment,
    pub charge: f64,
}

/// A segment that could not be priced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TariffFailure {
    /// Index into [`TripCharge::segments`].
    pub segment: usize,

    #[serde(serialize_with = "display")]
    pub error: LookupError,
}

/// The result of evaluating a trip.
///
/// Segments that could not be priced carry a zero charge and are listed
/// in `failures`; the `total` covers the priced segments only.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TripCharge {
    pub checkpoints: Vec<Checkpoint>,
    pub segments: Vec<PricedSegment>,
    pub total: f64,
    pub failures: Vec<TariffFailure>,
}

impl TripCharge {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Matches `trace` against the context's model and prices the result
/// for `unit`.
///
/// The clock supplies the timestamp of each matched waypoint.
pub fn evaluate_trip<C: Clock>(
    context: &TollContext,
    trace: &[Waypoint],
    unit: &UnitProfile,
    clock: &C,
) -> Result<TripCharge, ModelError> {
    debug_time!("Evaluated trip of {} waypoints", trace.len());

    let matcher = MapMatcher::new(&context.model, context.config.threshold);
    let checkpoints = matcher.match_trace(trace, clock);

    price_checkpoints(context, checkpoints, unit)
}

/// Prices checkpoints that were already matched on the context's model.
pub fn price_checkpoints(
    context: &TollContext,
    checkpoints: Vec<Checkpoint>,
    unit: &UnitProfile,
) -> Result<TripCharge, ModelError> {
    let segments = SegmentAggregator::new(&context.model).aggregate(&checkpoints)?;

    let mut failures = Vec::new();
    let segments = segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            let charge = match context.engine.price(&segment, unit) {
                Ok(charge) => charge,
                Err(error) => {
                    warn!("Cannot price segment {index} on {}: {error}", segment.road_name);
                    failures.push(TariffFailure {
                        segment: index,
                        error,
                    });
                    0.0
                }
            };

            PricedSegment { segment, charge }
        })
        .collect::<Vec<_>>();

    let total = segments.iter().map(|priced| priced.charge).sum::<f64>();
    debug!(
        "Priced {} segments from {} checkpoints: total={total:.4}, failures={}",
        segments.len(),
        checkpoints.len(),
        failures.len()
    );

    Ok(TripCharge {
        checkpoints,
        segments,
        total,
        failures,
    })
}

/// Evaluates independent trips in parallel against one context snapshot.
pub fn evaluate_batch<C: Clock + Sync>(
    context: &TollContext,
    trips: &[(Vec<Waypoint>, UnitProfile)],
    clock: &C,
) -> Vec<Result<TripCharge, ModelError>> {
    trips
        .par_iter()
        .map(|(trace, unit)| evaluate_trip(context, trace, unit, clock))
        .collect()
}

fn display<S: Serializer>(error: &LookupError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
