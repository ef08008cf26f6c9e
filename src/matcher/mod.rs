//! Matches the waypoints of a driven trace onto the road model.
//!
//! Every waypoint is compared against every point of every section,
//! and the globally nearest road point is recorded as a [`Checkpoint`]
//! when it lies within the threshold and has not been recorded
//! earlier in the same trip.

pub mod clock;

#[doc(inline)]
pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{DateTime, FixedOffset};
use log::debug;
use measure_time::debug_time;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::geo::Waypoint;
use crate::model::RoadModel;

/// Distance (in meters) within which a waypoint is considered to be on the road.
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// A record that the trip passed a specific road point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub section: usize,
    pub point: usize,

    /// The wall-clock time the waypoint was matched.
    pub timestamp: DateTime<FixedOffset>,
}

impl Checkpoint {
    pub fn new(section: usize, point: usize, timestamp: DateTime<FixedOffset>) -> Self {
        Checkpoint {
            section,
            point,
            timestamp,
        }
    }

    #[inline]
    pub fn address(&self) -> (usize, usize) {
        (self.section, self.point)
    }
}

/// The road point nearest to a waypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub section: usize,
    pub point: usize,

    /// Haversine distance from the waypoint, in meters.
    pub distance: f64,
}

/// Nearest-neighbour matcher over a borrowed [`RoadModel`].
///
/// ### Example
/// ```rust
/// use tollgate::matcher::{MapMatcher, SystemClock, DEFAULT_THRESHOLD};
/// use tollgate::model::{RoadModel, SectionSource};
/// use tollgate::RoadPoint;
///
/// let model = RoadModel::load([
///     SectionSource::new("I35", "1", "LINESTRING (15.112 50.615, 15.1122 50.6155)"),
/// ]).unwrap();
///
/// let trace = vec![
///     RoadPoint::from_degree(50.61500, 15.11201).unwrap(),
///     RoadPoint::from_degree(50.61550, 15.11219).unwrap(),
/// ];
///
/// let matcher = MapMatcher::new(&model, DEFAULT_THRESHOLD);
/// let checkpoints = matcher.match_trace(&trace, &SystemClock);
///
/// assert_eq!(checkpoints.len(), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MapMatcher<'a> {
    model: &'a RoadModel,
    threshold: f64,
}

impl<'a> MapMatcher<'a> {
    pub fn new(model: &'a RoadModel, threshold: f64) -> Self {
        MapMatcher { model, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Finds the globally nearest road point to `waypoint`.
    ///
    /// Sections and their points are scanned in ascending index order
    /// and the best is replaced only on strict improvement, so ties go
    /// to the first pair encountered. Points at a NaN distance are skipped.
    /// Returns `None` for an empty model.
    pub fn nearest(&self, waypoint: &Waypoint) -> Option<Nearest> {
        let mut best: Option<Nearest> = None;

        for (section_index, section) in self.model.sections().iter().enumerate() {
            for (point_index, point) in section.points().iter().enumerate() {
                let distance = waypoint.distance(point);
                if distance.is_nan() {
                    continue;
                }

                let improves = match best {
                    None => true,
                    Some(current) => distance < current.distance,
                };

                if improves {
                    best = Some(Nearest {
                        section: section_index,
                        point: point_index,
                        distance,
                    });
                }
            }
        }

        best
    }

    /// Matches a whole trace, returning the checkpoints in trace order.
    ///
    /// A `(section, point)` pair is recorded at most once per trip, the
    /// first matching waypoint wins. Waypoints with no road point within
    /// the threshold contribute nothing.
    pub fn match_trace<C: Clock>(&self, trace: &[Waypoint], clock: &C) -> Vec<Checkpoint> {
        debug_time!("match {} waypoints", trace.len());

        let mut recorded: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut checkpoints = Vec::new();

        for waypoint in trace {
            let timestamp = clock.now();

            let Some(nearest) = self.nearest(waypoint) else {
                continue;
            };

            let within = nearest.distance <= self.threshold;
            if within && recorded.insert((nearest.section, nearest.point)) {
                debug!(
                    "Checkpoint ({}, {}) at {:.2}m",
                    nearest.section, nearest.point, nearest.distance
                );
                checkpoints.push(Checkpoint::new(nearest.section, nearest.point, timestamp));
            }
        }

        checkpoints
    }
}
