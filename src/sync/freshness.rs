use crate::model::{RoadModel, SectionVersion};

/// The first reason a cached model was found stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Staleness {
    /// The cached and authoritative models have a different number of sections.
    LengthMismatch { cached: usize, authoritative: usize },

    /// The version string of a section differs.
    Version {
        section: usize,
        cached: String,
        authoritative: String,
    },

    /// The recomputed checksum of a section differs from the authoritative one.
    Checksum { section: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(Staleness),
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }
}

/// Compares a cached model against the authoritative version list,
/// index-for-index.
///
/// A section is stale if its version differs, or if the checksum
/// recomputed from its content differs from the authoritative checksum.
/// Lists of different lengths are always stale.
///
/// ### Example
/// ```rust
/// use tollgate::model::{RoadModel, RoadSection};
/// use tollgate::sync::check_freshness;
/// use tollgate::RoadPoint;
///
/// let section = RoadSection::new("I35", "1", vec![RoadPoint::new(0.88, 0.26)]).unwrap();
/// let model = RoadModel::new(vec![section]);
///
/// assert!(check_freshness(&model, &model.versions()).is_fresh());
/// assert!(!check_freshness(&model, &[]).is_fresh());
/// ```
pub fn check_freshness(cached: &RoadModel, authoritative: &[SectionVersion]) -> Freshness {
    if cached.len() != authoritative.len() {
        return Freshness::Stale(Staleness::LengthMismatch {
            cached: cached.len(),
            authoritative: authoritative.len(),
        });
    }

    for (index, (section, expected)) in cached.sections().iter().zip(authoritative).enumerate() {
        if section.version() != expected.version {
            return Freshness::Stale(Staleness::Version {
                section: index,
                cached: section.version().to_string(),
                authoritative: expected.version.clone(),
            });
        }

        if section.compute_checksum() != expected.checksum {
            return Freshness::Stale(Staleness::Checksum { section: index });
        }
    }

    Freshness::Fresh
}
