//! Folds a trip's checkpoints into chargeable segments: maximal runs
//! sharing one road section and one day/night bucket.

pub mod bucket;

#[doc(inline)]
pub use bucket::TimeBucket;

use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo::RoadPoint;
use crate::matcher::Checkpoint;
use crate::model::{ModelError, RoadModel};

/// A contiguous run of checkpoints, billed as one unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub section: usize,
    pub bucket: TimeBucket,

    /// Distance travelled along the road model, in meters. Never negative.
    pub distance: f64,

    /// Timestamp of the checkpoint that closed the segment.
    pub timestamp: DateTime<FixedOffset>,
    pub road_name: String,
}

/// Aggregates checkpoints against the model they were matched on.
///
/// Distances come from the model coordinates of each checkpoint,
/// never from the original trace.
#[derive(Clone, Copy, Debug)]
pub struct SegmentAggregator<'a> {
    model: &'a RoadModel,
}

impl<'a> SegmentAggregator<'a> {
    pub fn new(model: &'a RoadModel) -> Self {
        SegmentAggregator { model }
    }

    /// Produces the segments of a trip, in order.
    ///
    /// Adjacent checkpoints on the same section and in the same bucket
    /// extend the running distance; any change closes the segment with
    /// the road name and timestamp of the earlier checkpoint. A trailing
    /// segment is always closed at the last checkpoint, so a single
    /// checkpoint yields one segment of zero distance.
    ///
    /// An empty checkpoint list yields no segments. A checkpoint that does
    /// not address a point of the model is an error.
    pub fn aggregate(&self, checkpoints: &[Checkpoint]) -> Result<Vec<Segment>, ModelError> {
        let Some(last) = checkpoints.last() else {
            return Ok(Vec::new());
        };

        let (mut segments, trailing) = checkpoints.iter().tuple_windows().try_fold(
            (Vec::new(), 0.0),
            |(mut segments, distance): (Vec<Segment>, f64),
             (current, next)|
             -> Result<(Vec<Segment>, f64), ModelError> {
                if current.section == next.section
                    && TimeBucket::of(&current.timestamp) == TimeBucket::of(&next.timestamp)
                {
                    let span = self.position(current)?.distance(self.position(next)?);
                    Ok((segments, distance + span))
                } else {
                    segments.push(self.close(current, distance)?);
                    Ok((segments, 0.0))
                }
            },
        )?;

        segments.push(self.close(last, trailing)?);
        Ok(segments)
    }

    fn position(&self, checkpoint: &Checkpoint) -> Result<&'a RoadPoint, ModelError> {
        self.model
            .point(checkpoint.section, checkpoint.point)
            .ok_or(ModelError::UnknownPoint {
                section: checkpoint.section,
                point: checkpoint.point,
            })
    }

    fn close(&self, checkpoint: &Checkpoint, distance: f64) -> Result<Segment, ModelError> {
        // Resolving the point validates the whole address
        self.position(checkpoint)?;

        let road_name = self
            .model
            .section(checkpoint.section)
            .map(|section| section.name().to_string())
            .unwrap_or_default();

        let segment = Segment {
            section: checkpoint.section,
            bucket: TimeBucket::of(&checkpoint.timestamp),
            distance,
            timestamp: checkpoint.timestamp,
            road_name,
        };

        debug!(
            "Segment on {} ({}) of {:.1}m",
            segment.road_name, segment.bucket, segment.distance
        );
        Ok(segment)
    }
}
