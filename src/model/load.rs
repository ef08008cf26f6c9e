use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};

use crate::model::{ModelError, RoadModel, RoadSection};

/// A named geometry source: a `LINESTRING` in degrees
/// together with the section's name and version.
#[derive(Clone, Debug)]
pub struct SectionSource {
    pub name: String,
    pub version: String,
    pub geometry: String,
}

impl SectionSource {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        geometry: impl Into<String>,
    ) -> Self {
        SectionSource {
            name: name.into(),
            version: version.into(),
            geometry: geometry.into(),
        }
    }

    /// Reads a `.wkt` file whose first line is the header
    /// `# name=<name> version=<version>`, followed by the geometry.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let (header, geometry) = text
            .split_once('\n')
            .ok_or_else(|| ModelError::MissingHeader(path.to_path_buf()))?;

        let (name, version) =
            parse_header(header).ok_or_else(|| ModelError::MissingHeader(path.to_path_buf()))?;

        Ok(SectionSource::new(name, version, geometry))
    }
}

fn parse_header(line: &str) -> Option<(String, String)> {
    let body = line.trim().strip_prefix('#')?;

    let mut name = None;
    let mut version = None;
    for (key, value) in body.split_whitespace().filter_map(|kv| kv.split_once('=')) {
        match key {
            "name" => name = Some(value.to_string()),
            "version" => version = Some(value.to_string()),
            _ => {}
        }
    }

    Some((name?, version?))
}

impl RoadModel {
    /// Loads a model from named geometry sources, keeping their order.
    pub fn load(sources: impl IntoIterator<Item = SectionSource>) -> Result<Self, ModelError> {
        let start_time = Instant::now();

        let sections = sources
            .into_iter()
            .map(|source| RoadSection::from_wkt(source.name, source.version, &source.geometry))
            .collect::<Result<Vec<_>, _>>()?;

        if sections.is_empty() {
            return Err(ModelError::EmptyModel);
        }

        let model = RoadModel::new(sections);
        info!(
            "Loaded road model of {} sections, {} points in {:?}",
            model.len(),
            model.size(),
            start_time.elapsed()
        );

        Ok(model)
    }

    /// Loads every `*.wkt` file in `directory`, ordered by file name.
    pub fn from_directory(directory: impl AsRef<Path>) -> Result<Self, ModelError> {
        let directory = directory.as_ref();
        let entries = fs::read_dir(directory).map_err(|source| ModelError::Unreadable {
            path: directory.to_path_buf(),
            source,
        })?;

        let paths = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "wkt"))
            .sorted()
            .collect::<Vec<PathBuf>>();

        debug!("Found {} section files in {}", paths.len(), directory.display());

        let sources = paths
            .iter()
            .map(|path| SectionSource::from_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        RoadModel::load(sources)
    }

    /// Reads a model previously written with [`RoadModel::to_json`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ModelError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        RoadModel::from_json(&text)
    }
}
