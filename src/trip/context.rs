use std::sync::{Arc, PoisonError, RwLock};

use log::info;
use measure_time::info_time;

use crate::config::TollConfig;
use crate::model::RoadModel;
use crate::sync::{DirectorySource, FileModelCache, ModelSynchronizer};
use crate::tariff::{RateTable, TariffEngine};

/// Everything needed to evaluate a trip: the road model, the tariff
/// and the configuration they were loaded with.
///
/// A context is immutable once built. Reloading produces a new context
/// which is published through a [`ContextRegistry`].
#[derive(Clone, Debug)]
pub struct TollContext {
    pub model: Arc<RoadModel>,
    pub engine: Arc<TariffEngine>,
    pub config: TollConfig,
}

impl TollContext {
    pub fn new(model: RoadModel, engine: TariffEngine, config: TollConfig) -> Self {
        TollContext {
            model: Arc::new(model),
            engine: Arc::new(engine),
            config,
        }
    }

    /// Loads the model (through the local cache) and the rate tables
    /// from the directories named in `config`.
    pub fn load(config: TollConfig) -> crate::Result<Self> {
        info_time!("Loaded toll context");
        config.validate()?;

        let synchronizer = ModelSynchronizer::new(
            DirectorySource::new(&config.model_dir),
            FileModelCache::new(&config.cache_dir),
        );

        let synchronized = synchronizer.synchronize()?;
        let rates = RateTable::from_directory(&config.rate_dir)?;
        let engine = TariffEngine::new(rates).with_distance_unit(config.distance_unit)?;

        info!(
            "Context ready: {} sections ({} points), {} rates, cached={}",
            synchronized.model.len(),
            synchronized.model.size(),
            engine.rates().len(),
            synchronized.from_cache
        );

        Ok(TollContext::new(synchronized.model, engine, config))
    }
}

/// Holds the currently published [`TollContext`].
///
/// Readers take a snapshot and keep using it for the whole trip, so a
/// concurrent [`publish`](ContextRegistry::publish) never changes the
/// model or tariff underneath an evaluation in progress.
#[derive(Debug)]
pub struct ContextRegistry {
    current: RwLock<Arc<TollContext>>,
}

impl ContextRegistry {
    pub fn new(context: TollContext) -> Self {
        ContextRegistry {
            current: RwLock::new(Arc::new(context)),
        }
    }

    pub fn snapshot(&self) -> Arc<TollContext> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the published context, returning the previous one.
    pub fn publish(&self, context: TollContext) -> Arc<TollContext> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(context))
    }
}
