use std::fs;
use std::path::PathBuf;

use log::warn;

use crate::model::{RoadModel, SectionVersion};
use crate::sync::SyncError;

/// The authoritative provider of road geometry.
///
/// Implementations that reach over a network own their
/// timeout and retry policy; the synchronizer never retries.
pub trait ModelSource {
    /// Fetches the full model.
    fn fetch_model(&self) -> Result<RoadModel, SyncError>;

    /// Fetches only the `{name, version, checksum}` of each section.
    fn fetch_versions(&self) -> Result<Vec<SectionVersion>, SyncError>;
}

/// Local persistence of the last fetched model.
pub trait ModelCache {
    /// Returns the cached model, or `None` if absent or unreadable.
    fn load(&self) -> Option<RoadModel>;

    fn store(&self, model: &RoadModel) -> Result<(), SyncError>;
}

/// Serves the geometry held in a directory of `*.wkt` sections.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    directory: PathBuf,
}

impl DirectorySource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        DirectorySource {
            directory: directory.into(),
        }
    }
}

impl ModelSource for DirectorySource {
    fn fetch_model(&self) -> Result<RoadModel, SyncError> {
        Ok(RoadModel::from_directory(&self.directory)?)
    }

    fn fetch_versions(&self) -> Result<Vec<SectionVersion>, SyncError> {
        Ok(self.fetch_model()?.versions())
    }
}

/// Keeps the model as `model.json` inside a cache directory.
#[derive(Clone, Debug)]
pub struct FileModelCache {
    directory: PathBuf,
}

impl FileModelCache {
    pub const FILE_NAME: &'static str = "model.json";

    pub fn new(directory: impl Into<PathBuf>) -> Self {
        FileModelCache {
            directory: directory.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(Self::FILE_NAME)
    }
}

impl ModelCache for FileModelCache {
    fn load(&self) -> Option<RoadModel> {
        let path = self.path();
        if !path.exists() {
            return None;
        }

        match RoadModel::from_json_file(&path) {
            Ok(model) => Some(model),
            Err(err) => {
                warn!("Ignoring unusable model cache {}: {}", path.display(), err);
                None
            }
        }
    }

    fn store(&self, model: &RoadModel) -> Result<(), SyncError> {
        let path = self.path();
        let write_err = |source| SyncError::CacheWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.directory).map_err(write_err)?;
        fs::write(&path, model.to_json()?).map_err(write_err)?;
        Ok(())
    }
}
