use std::cell::Cell;

use tollgate_fixtures::{fixture_path, ROAD_MODEL};

use crate::geo::RoadPoint;
use crate::model::{RoadModel, RoadSection, SectionVersion};
use crate::sync::*;

fn section(name: &str, version: &str, lat: f64) -> RoadSection {
    RoadSection::new(
        name,
        version,
        vec![RoadPoint::new(lat, 0.26), RoadPoint::new(lat + 0.0001, 0.26)],
    )
    .expect("section")
}

fn model() -> RoadModel {
    RoadModel::new(vec![section("I35", "1", 0.88), section("D10", "4", 0.87)])
}

#[test]
fn identical_model_is_fresh() {
    let model = model();
    assert_eq!(check_freshness(&model, &model.versions()), Freshness::Fresh);
}

#[test]
fn version_change_is_stale() {
    let cached = model();
    let mut versions = cached.versions();
    versions[1].version = "5".to_string();

    assert_eq!(
        check_freshness(&cached, &versions),
        Freshness::Stale(Staleness::Version {
            section: 1,
            cached: "4".to_string(),
            authoritative: "5".to_string(),
        })
    );
}

#[test]
fn geometry_change_is_stale() {
    let cached = model();
    let authoritative = RoadModel::new(vec![section("I35", "1", 0.8801), section("D10", "4", 0.87)]);

    assert_eq!(
        check_freshness(&cached, &authoritative.versions()),
        Freshness::Stale(Staleness::Checksum { section: 0 })
    );
}

#[test]
fn length_mismatch_is_stale_not_a_panic() {
    let cached = model();
    let mut versions = cached.versions();
    versions.push(SectionVersion {
        name: "D11".to_string(),
        version: "1".to_string(),
        checksum: String::new(),
    });

    assert_eq!(
        check_freshness(&cached, &versions),
        Freshness::Stale(Staleness::LengthMismatch {
            cached: 2,
            authoritative: 3
        })
    );
    assert!(!check_freshness(&cached, &versions[..1]).is_fresh());
}

/// Serves a fixed model and counts how often the geometry is fetched.
struct CountingSource {
    model: RoadModel,
    versions_available: bool,
    fetches: Cell<usize>,
}

impl CountingSource {
    fn new(model: RoadModel) -> Self {
        CountingSource {
            model,
            versions_available: true,
            fetches: Cell::new(0),
        }
    }
}

impl ModelSource for CountingSource {
    fn fetch_model(&self) -> Result<RoadModel, SyncError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.model.clone())
    }

    fn fetch_versions(&self) -> Result<Vec<SectionVersion>, SyncError> {
        if self.versions_available {
            Ok(self.model.versions())
        } else {
            Err(SyncError::Unavailable("connection refused".to_string()))
        }
    }
}

#[test_log::test]
fn fetches_then_reuses_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let synchronizer = ModelSynchronizer::new(
        CountingSource::new(model()),
        FileModelCache::new(dir.path().join("cache")),
    );

    let first = synchronizer.synchronize().expect("first sync");
    assert!(!first.from_cache);
    assert_eq!(first.model, model());

    let second = synchronizer.synchronize().expect("second sync");
    assert!(second.from_cache);
    assert_eq!(second.model, model());

    assert_eq!(synchronizer.source.fetches.get(), 1);
}

#[test_log::test]
fn stale_cache_is_replaced() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = FileModelCache::new(dir.path());
    cache.store(&model()).expect("seed cache");

    let updated = RoadModel::new(vec![section("I35", "2", 0.88), section("D10", "4", 0.87)]);
    let synchronizer = ModelSynchronizer::new(CountingSource::new(updated.clone()), cache);

    let synced = synchronizer.synchronize().expect("sync");
    assert!(!synced.from_cache);
    assert_eq!(synced.model, updated);
    assert_eq!(synchronizer.cache.load(), Some(updated));
}

#[test]
fn unavailable_versions_force_refetch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = FileModelCache::new(dir.path());
    cache.store(&model()).expect("seed cache");

    let mut source = CountingSource::new(model());
    source.versions_available = false;
    let synchronizer = ModelSynchronizer::new(source, cache);

    let synced = synchronizer.synchronize().expect("sync");
    assert!(!synced.from_cache);
    assert_eq!(synchronizer.source.fetches.get(), 1);
}

#[test]
fn corrupt_cache_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = FileModelCache::new(dir.path());
    std::fs::write(cache.path(), "{ not json").expect("write");

    assert!(cache.load().is_none());
}

#[test]
fn directory_source_serves_fixture() {
    let source = DirectorySource::new(fixture_path(ROAD_MODEL));
    let model = source.fetch_model().expect("model");
    let versions = source.fetch_versions().expect("versions");

    assert_eq!(versions.len(), 2);
    assert!(check_freshness(&model, &versions).is_fresh());
}
