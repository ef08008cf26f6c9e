use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("model source unavailable: {0}")]
    Unavailable(String),

    #[error("could not load road model: {0}")]
    Model(#[from] ModelError),

    #[error("failed to write model cache {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
