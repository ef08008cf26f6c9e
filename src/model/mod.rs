//! The road model: an ordered collection of toll-road sections,
//! loaded once and shared read-only between trip evaluations.

#[doc(hidden)]
pub mod error;
pub mod load;
pub mod section;
#[cfg(test)]
mod test;

#[doc(inline)]
pub use error::ModelError;
#[doc(inline)]
pub use load::SectionSource;
#[doc(inline)]
pub use section::{RoadSection, SectionVersion};

use serde::{Deserialize, Serialize};

use crate::geo::RoadPoint;

/// Ordered collection of [`RoadSection`]s.
///
/// The order is canonical: cached and authoritative copies are
/// compared index-for-index, and checkpoints address sections by index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadModel {
    sections: Vec<RoadSection>,
}

impl RoadModel {
    pub fn new(sections: Vec<RoadSection>) -> Self {
        RoadModel { sections }
    }

    pub fn sections(&self) -> &[RoadSection] {
        &self.sections
    }

    #[inline]
    pub fn section(&self, index: usize) -> Option<&RoadSection> {
        self.sections.get(index)
    }

    /// Resolves a `(section, point)` address into its position.
    #[inline]
    pub fn point(&self, section: usize, point: usize) -> Option<&RoadPoint> {
        self.section(section).and_then(|s| s.point(point))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of points across every section.
    pub fn size(&self) -> usize {
        self.sections.iter().map(RoadSection::len).sum()
    }

    /// The version list served to units checking their cached copy.
    pub fn versions(&self) -> Vec<SectionVersion> {
        self.sections
            .iter()
            .map(RoadSection::version_record)
            .collect()
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }
}
