use approx::assert_relative_eq;
use tollgate_fixtures::{fixture_path, ROAD_MODEL};

use crate::geo::RoadPoint;
use crate::model::{ModelError, RoadModel, RoadSection, SectionSource};

const SHORT_ROAD: &str = "LINESTRING (15.112 50.615, 15.1122 50.6155, 15.1124 50.616)";

#[test]
fn loads_sources_in_order() {
    let model = RoadModel::load([
        SectionSource::new("I35", "1", SHORT_ROAD),
        SectionSource::new("D10", "7", "LINESTRING (14.9 50.4, 14.9005 50.4)"),
    ])
    .expect("model must load");

    assert_eq!(model.len(), 2);
    assert_eq!(model.size(), 5);
    assert_eq!(model.sections()[0].name(), "I35");
    assert_eq!(model.sections()[1].version(), "7");

    let point = model.point(0, 1).expect("point exists");
    assert_relative_eq!(point.lat, 50.6155f64.to_radians());
    assert_relative_eq!(point.lon, 15.1122f64.to_radians());

    assert!(model.point(1, 2).is_none());
    assert!(model.point(2, 0).is_none());
}

#[test]
fn empty_inputs_fail_to_load() {
    assert!(matches!(
        RoadModel::load(Vec::<SectionSource>::new()),
        Err(ModelError::EmptyModel)
    ));
    assert!(matches!(
        RoadSection::new("I35", "1", vec![]),
        Err(ModelError::EmptySection(_))
    ));
    assert!(matches!(
        RoadModel::load([SectionSource::new("I35", "1", "LINESTRING (15.1 95.0, 15.2 50.0)")]),
        Err(ModelError::Geometry { .. })
    ));
}

#[test]
fn checksum_tracks_content() {
    let section = RoadSection::from_wkt("I35", "1", SHORT_ROAD).expect("section");
    assert_eq!(section.checksum(), section.compute_checksum());
    assert_eq!(section.checksum().len(), 32);

    let renamed = RoadSection::from_wkt("I36", "1", SHORT_ROAD).expect("section");
    let reversioned = RoadSection::from_wkt("I35", "2", SHORT_ROAD).expect("section");
    let moved = RoadSection::from_wkt(
        "I35",
        "1",
        "LINESTRING (15.112 50.615, 15.1122 50.6155, 15.1124 50.6161)",
    )
    .expect("section");

    assert_ne!(section.checksum(), renamed.checksum());
    assert_ne!(section.checksum(), reversioned.checksum());
    assert_ne!(section.checksum(), moved.checksum());

    let again = RoadSection::from_wkt("I35", "1", SHORT_ROAD).expect("section");
    assert_eq!(section.checksum(), again.checksum());
}

#[test]
fn json_wire_format_round_trips() {
    let model = RoadModel::load([SectionSource::new("I35", "1", SHORT_ROAD)]).expect("model");
    let json = model.to_json().expect("serializes");

    assert!(json.contains("\"latRad\""));
    assert!(json.contains("\"lonRad\""));

    let restored = RoadModel::from_json(&json).expect("deserializes");
    assert_eq!(restored, model);
    assert_eq!(
        restored.sections()[0].compute_checksum(),
        model.sections()[0].checksum()
    );
}

#[test]
fn wire_format_rejects_uneven_arrays() {
    let json = r#"[{"name":"I35","version":"1","checksum":"","latRad":[0.1,0.2],"lonRad":[0.3]}]"#;
    let err = RoadModel::from_json(json).expect_err("must reject");

    assert!(matches!(err, ModelError::Malformed(_)));
}

#[test]
fn versions_describe_each_section() {
    let model = RoadModel::new(vec![
        RoadSection::new("I35", "3", vec![RoadPoint::new(0.88, 0.26)]).expect("section"),
        RoadSection::new("D10", "9", vec![RoadPoint::new(0.87, 0.25)]).expect("section"),
    ]);

    let versions = model.versions();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].name, "I35");
    assert_eq!(versions[1].version, "9");
    assert_eq!(versions[1].checksum, model.sections()[1].compute_checksum());
}

#[test_log::test]
fn loads_fixture_directory() {
    let model = RoadModel::from_directory(fixture_path(ROAD_MODEL)).expect("fixture loads");

    assert_eq!(model.len(), 2);
    assert_eq!(model.sections()[0].name(), "I35");
    assert_eq!(model.sections()[0].version(), "2023.1");
    assert_eq!(model.sections()[1].name(), "D10");
    assert_eq!(model.size(), 22);
}

#[test]
fn missing_directory_is_unreadable() {
    let err = RoadModel::from_directory(fixture_path("no-such-model")).expect_err("must fail");
    assert!(matches!(err, ModelError::Unreadable { .. }));
}
