//! Keeps a locally cached road model in step with the authoritative
//! source, re-fetching geometry only when a section changed.

#[doc(hidden)]
pub mod error;
pub mod freshness;
pub mod source;
#[cfg(test)]
mod test;

#[doc(inline)]
pub use error::SyncError;
#[doc(inline)]
pub use freshness::{check_freshness, Freshness, Staleness};
#[doc(inline)]
pub use source::{DirectorySource, FileModelCache, ModelCache, ModelSource};

pub use crate::model::SectionVersion;

use log::{debug, info, warn};

use crate::model::RoadModel;

/// The outcome of a synchronization.
#[derive(Debug)]
pub struct Synchronized {
    pub model: RoadModel,

    /// Whether the cached copy was reused without re-fetching geometry.
    pub from_cache: bool,
}

/// Orchestrates the caching protocol between a [`ModelSource`] and a [`ModelCache`].
///
/// ```rust
/// use tollgate::sync::{DirectorySource, FileModelCache, ModelSynchronizer};
///
/// fn refresh(model_dir: &str, cache_dir: &str) -> tollgate::Result<()> {
///     let synchronizer = ModelSynchronizer::new(
///         DirectorySource::new(model_dir),
///         FileModelCache::new(cache_dir),
///     );
///
///     let synced = synchronizer.synchronize()?;
///     println!("{} sections, cached: {}", synced.model.len(), synced.from_cache);
///     Ok(())
/// }
/// ```
pub struct ModelSynchronizer<S, C>
where
    S: ModelSource,
    C: ModelCache,
{
    source: S,
    cache: C,
}

impl<S, C> ModelSynchronizer<S, C>
where
    S: ModelSource,
    C: ModelCache,
{
    pub fn new(source: S, cache: C) -> Self {
        ModelSynchronizer { source, cache }
    }

    /// Returns a fresh model, reusing the cache when every section
    /// still matches the authoritative version list.
    ///
    /// An unreachable version list counts as stale. Failing to fetch the
    /// full model is an error; failing to persist it is only logged.
    pub fn synchronize(&self) -> Result<Synchronized, SyncError> {
        if let Some(cached) = self.cache.load() {
            match self.source.fetch_versions() {
                Ok(versions) => match check_freshness(&cached, &versions) {
                    Freshness::Fresh => {
                        info!("Road model is up to date ({} sections)", cached.len());
                        return Ok(Synchronized {
                            model: cached,
                            from_cache: true,
                        });
                    }
                    Freshness::Stale(reason) => {
                        info!("Cached road model is stale: {:?}", reason);
                    }
                },
                Err(err) => warn!("Could not fetch model versions, re-fetching: {}", err),
            }
        } else {
            debug!("No cached road model present");
        }

        let model = self.source.fetch_model()?;
        if let Err(err) = self.cache.store(&model) {
            warn!("Could not persist road model: {}", err);
        }

        Ok(Synchronized {
            model,
            from_cache: false,
        })
    }
}
