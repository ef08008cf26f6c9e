use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::geo::{parse_linestring, RoadPoint};
use crate::model::error::ModelError;

/// A named, versioned toll-road section: an ordered polyline of
/// [`RoadPoint`]s. The index of a point is its identity within the
/// section, so the order never changes once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionRecord", into = "SectionRecord")]
pub struct RoadSection {
    name: String,
    version: String,
    checksum: String,
    points: Vec<RoadPoint>,
}

/// The `{version, checksum, name}` triple of a section, as served
/// by the authoritative source for freshness checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionVersion {
    pub name: String,
    pub version: String,
    pub checksum: String,
}

impl RoadSection {
    /// Creates a section, stamping it with the checksum of its content.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        points: Vec<RoadPoint>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if points.is_empty() {
            return Err(ModelError::EmptySection(name));
        }

        let mut section = RoadSection {
            name,
            version: version.into(),
            checksum: String::new(),
            points,
        };

        section.checksum = section.compute_checksum();
        Ok(section)
    }

    /// Parses a `LINESTRING` in degrees into a section.
    pub fn from_wkt(
        name: impl Into<String>,
        version: impl Into<String>,
        geometry: &str,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let points = parse_linestring(geometry).map_err(|source| ModelError::Geometry {
            section: name.clone(),
            source,
        })?;

        RoadSection::new(name, version, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The checksum this section carried when it was loaded.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn points(&self) -> &[RoadPoint] {
        &self.points
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<&RoadPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The canonical textual form the checksum is taken over.
    ///
    /// Covers the name, version and every point in order; the stored
    /// checksum is not part of it.
    pub fn canonical(&self) -> String {
        let mut text = format!("name={};version={};", self.name, self.version);
        for point in &self.points {
            // Writing into a String cannot fail.
            let _ = write!(text, "{:?},{:?};", point.lat, point.lon);
        }

        text
    }

    /// Lowercase hex MD5 of [`RoadSection::canonical`], recomputed from content.
    pub fn compute_checksum(&self) -> String {
        format!("{:x}", md5::compute(self.canonical().as_bytes()))
    }

    pub fn version_record(&self) -> SectionVersion {
        SectionVersion {
            name: self.name.clone(),
            version: self.version.clone(),
            checksum: self.compute_checksum(),
        }
    }
}

/// Wire form of a section: parallel radian arrays.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionRecord {
    name: String,
    version: String,
    #[serde(default)]
    checksum: String,
    lat_rad: Vec<f64>,
    lon_rad: Vec<f64>,
}

impl TryFrom<SectionRecord> for RoadSection {
    type Error = ModelError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        if record.lat_rad.len() != record.lon_rad.len() {
            return Err(ModelError::LengthMismatch {
                section: record.name,
                lat: record.lat_rad.len(),
                lon: record.lon_rad.len(),
            });
        }

        if record.lat_rad.is_empty() {
            return Err(ModelError::EmptySection(record.name));
        }

        let points = record
            .lat_rad
            .into_iter()
            .zip(record.lon_rad)
            .map(|(lat, lon)| RoadPoint::new(lat, lon))
            .collect();

        Ok(RoadSection {
            name: record.name,
            version: record.version,
            checksum: record.checksum,
            points,
        })
    }
}

impl From<RoadSection> for SectionRecord {
    fn from(section: RoadSection) -> Self {
        let (lat_rad, lon_rad) = section
            .points
            .iter()
            .map(|point| (point.lat, point.lon))
            .unzip();

        SectionRecord {
            name: section.name,
            version: section.version,
            checksum: section.checksum,
            lat_rad,
            lon_rad,
        }
    }
}
