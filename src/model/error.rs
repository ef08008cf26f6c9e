use std::path::PathBuf;

use thiserror::Error;

use crate::geo::GeoError;

/// Failures to load or address a [`RoadModel`](crate::model::RoadModel).
///
/// Every variant aborts the evaluation of a trip.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed road model: {0}")]
    Malformed(String),

    #[error("section {section} has invalid geometry: {source}")]
    Geometry {
        section: String,
        #[source]
        source: GeoError,
    },

    #[error("section {section} has {lat} latitudes but {lon} longitudes")]
    LengthMismatch {
        section: String,
        lat: usize,
        lon: usize,
    },

    #[error("section {0} contains no points")]
    EmptySection(String),

    #[error("road model contains no sections")]
    EmptyModel,

    #[error("{} has no `# name=<name> version=<version>` header", .0.display())]
    MissingHeader(PathBuf),

    #[error("no road point ({section}, {point}) in the model")]
    UnknownPoint { section: usize, point: usize },
}

impl From<serde_json::Error> for ModelError {
    fn from(value: serde_json::Error) -> Self {
        ModelError::Malformed(value.to_string())
    }
}
