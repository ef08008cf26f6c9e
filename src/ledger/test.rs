use approx::assert_relative_eq;
use chrono::{DateTime, FixedOffset};
use tollgate_fixtures::{fixture_path, RATE_TABLES, ROAD_MODEL, TRACE_I35_D10, UNIT_N_EURO6};

use crate::config::TollConfig;
use crate::geo::parse_linestring;
use crate::ledger::*;
use crate::matcher::{Checkpoint, FixedClock, MapMatcher};
use crate::trip::TollContext;
use crate::Error;

fn noon() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2023-05-10T12:00:00+02:00").expect("valid timestamp")
}

fn unit() -> OnBoardUnit {
    let text = std::fs::read_to_string(fixture_path(UNIT_N_EURO6)).expect("unit fixture");
    OnBoardUnit::from_json(&text).expect("unit")
}

fn context() -> (TollContext, tempfile::TempDir) {
    let cache = tempfile::tempdir().expect("tempdir");
    let config = TollConfig {
        model_dir: fixture_path(ROAD_MODEL),
        rate_dir: fixture_path(RATE_TABLES),
        cache_dir: cache.path().to_path_buf(),
        ..TollConfig::default()
    };

    (TollContext::load(config).expect("fixture context"), cache)
}

fn fixture_checkpoints(context: &TollContext) -> Vec<Checkpoint> {
    let text = std::fs::read_to_string(fixture_path(TRACE_I35_D10)).expect("trace fixture");
    let trace = parse_linestring(&text).expect("trace");

    MapMatcher::new(&context.model, context.config.threshold)
        .match_trace(&trace, &FixedClock(noon()))
}

#[test]
fn reads_unit_wire_format() {
    let unit = unit();

    assert_eq!(unit.id, "2c9fa1aa-4403-4cc9-96f4-09a05638bcad");
    assert_eq!(unit.plate, "1SA1234");
    assert_eq!(unit.country, "CZ");
    assert_eq!(unit.weight, 8500);
    assert_eq!(unit.axles, 4);

    let json = serde_json::to_value(&unit).expect("serializes");
    assert_eq!(json["SPZ"], "1SA1234");
    assert_eq!(json["ID"], unit.id.as_str());
    assert_eq!(json["Emission"], "6");
}

#[test]
fn memory_ledger_lifecycle() {
    let ledger = MemoryLedger::new();
    let unit = unit();
    let key = unit.key();

    assert_eq!(ledger.read_unit(&key), Err(LedgerError::NotFound(key.clone())));

    ledger.create_unit(unit.clone()).expect("created");
    assert_eq!(
        ledger.create_unit(unit.clone()),
        Err(LedgerError::AlreadyExists(key.clone()))
    );

    ledger.credit_toll(&key, 10.5).expect("credited");
    let credited = ledger.credit_toll(&key, 2.25).expect("credited");
    assert_eq!(credited.credit, 12.75);

    assert!(matches!(
        ledger.credit_toll(&key, -1.0),
        Err(LedgerError::InvalidAmount { .. })
    ));

    ledger.reset_credit(&key).expect("reset");
    assert_eq!(ledger.read_unit(&key).expect("unit").credit, 0.0);

    ledger.delete_unit(&key).expect("deleted");
    assert!(ledger.is_empty());
    assert_eq!(ledger.delete_unit(&key), Err(LedgerError::NotFound(key)));
}

#[test]
fn units_are_keyed_by_plate_and_country() {
    let ledger = MemoryLedger::new();
    let unit = unit();
    ledger.create_unit(unit.clone()).expect("created");

    let moved = OnBoardUnit {
        plate: "2AB5678".to_string(),
        ..unit
    };
    ledger.create_unit(moved).expect("different key");
    assert_eq!(ledger.len(), 2);
}

#[test]
fn polygon_rejects_uneven_arrays() {
    let polygon = Polygon {
        i: vec![0, 0],
        j: vec![0],
        time: vec!["2023-05-10T12:00:00+02:00".to_string(); 2],
    };

    assert!(matches!(polygon.checkpoints(), Err(Error::Ticket(_))));
}

#[test]
fn polygon_rejects_bad_times() {
    let polygon = Polygon {
        i: vec![0],
        j: vec![0],
        time: vec!["yesterday".to_string()],
    };

    assert!(matches!(polygon.checkpoints(), Err(Error::Ticket(_))));
}

#[test]
fn polygon_carries_checkpoints() {
    let checkpoints = vec![Checkpoint::new(0, 3, noon()), Checkpoint::new(1, 7, noon())];
    let polygon = Polygon::from_checkpoints(&checkpoints);

    assert_eq!(polygon.i, vec![0, 1]);
    assert_eq!(polygon.j, vec![3, 7]);
    assert_eq!(polygon.checkpoints().expect("parsed"), checkpoints);
}

#[test]
fn parses_ticket_json() {
    let text = r#"{
        "obu": {"ID":"a","SPZ":"1SA1234","Country":"CZ","Credit":0.0,"Currency":"CZK",
                "Weight":8500,"Emission":"6","Category":"N","Axles":4},
        "polygon": {"i":[0,0],"j":[0,1],"time":["2023-05-10T12:00:00+02:00","2023-05-10T12:00:05+02:00"]}
    }"#;

    let ticket = Ticket::from_json(text).expect("ticket");
    assert_eq!(ticket.obu.id, "a");
    assert_eq!(ticket.polygon.checkpoints().expect("checkpoints").len(), 2);

    assert!(matches!(Ticket::from_json("{\"obu\":{}}"), Err(Error::Ticket(_))));
}

#[test_log::test]
fn ticket_credits_rounded_total() {
    let (context, _cache) = context();
    let ledger = MemoryLedger::new();
    ledger.create_unit(unit()).expect("created");

    let ticket = Ticket::new(unit(), &fixture_checkpoints(&context));
    let (updated, charge) = process_ticket(&ledger, &context, &ticket).expect("processed");

    assert_eq!(charge.segments.len(), 2);
    assert_relative_eq!(charge.total, 28.8189, max_relative = 1e-3);
    assert_relative_eq!(updated.credit, 28.82, max_relative = 1e-9);

    let (again, _) = process_ticket(&ledger, &context, &ticket).expect("processed");
    assert_relative_eq!(again.credit, 57.64, max_relative = 1e-9);
}

#[test_log::test]
fn ticket_for_unknown_unit_is_rejected() {
    let (context, _cache) = context();
    let ledger = MemoryLedger::new();

    let ticket = Ticket::new(unit(), &fixture_checkpoints(&context));
    let result = process_ticket(&ledger, &context, &ticket);

    assert!(matches!(result, Err(Error::Ledger(LedgerError::NotFound(_)))));
}

#[test_log::test]
fn ticket_with_unknown_point_credits_nothing() {
    let (context, _cache) = context();
    let ledger = MemoryLedger::new();
    ledger.create_unit(unit()).expect("created");

    let ticket = Ticket::new(unit(), &[Checkpoint::new(5, 0, noon())]);
    assert!(matches!(
        process_ticket(&ledger, &context, &ticket),
        Err(Error::Model(_))
    ));
    assert_eq!(ledger.read_unit(&unit().key()).expect("unit").credit, 0.0);
}

#[test]
fn sync_updates_changed_attributes() {
    let ledger = MemoryLedger::new();
    ledger.create_unit(unit()).expect("created");

    let (same, changed) = sync_unit(&ledger, &unit()).expect("synced");
    assert!(!changed);
    assert_eq!(same, unit());

    let reported = OnBoardUnit {
        weight: 13000,
        axles: 5,
        credit: 99.0,
        ..unit()
    };
    let (stored, changed) = sync_unit(&ledger, &reported).expect("synced");
    assert!(changed);
    assert_eq!(stored.weight, 13000);
    assert_eq!(stored.axles, 5);
    assert_eq!(stored.credit, 0.0);
}

const LOWERCASE_UNIT: &str = r#"{"id":"2c9f","spz":"1SA1234","country":"CZ","credit":0.0,"currency":"CZK","weight":8500,"emission":"6","category":"N","axles":4}"#;

#[test]
fn reads_lowercase_unit_records() {
    let unit = OnBoardUnit::from_json(LOWERCASE_UNIT).expect("lowercase unit");

    assert_eq!(unit.key(), UnitKey::new("2c9f", "1SA1234", "CZ"));
    assert_eq!(unit.currency, "CZK");
    assert_eq!(unit.weight, 8500);
    assert_eq!(unit.emission, "6");
    assert_eq!(unit.category, "N");
    assert_eq!(unit.axles, 4);

    // Written back with the ledger's own keys
    let json = serde_json::to_value(&unit).expect("serializes");
    assert_eq!(json["ID"], "2c9f");
    assert_eq!(json["SPZ"], "1SA1234");
    assert!(json.get("id").is_none());
}

#[test]
fn reads_ticket_with_lowercase_unit() {
    let text = format!(
        r#"{{"obu":{LOWERCASE_UNIT},"polygon":{{"i":[0],"j":[4],"time":["2023-05-10T12:00:00+02:00"]}}}}"#
    );

    let ticket = Ticket::from_json(&text).expect("ticket");
    assert_eq!(ticket.obu.plate, "1SA1234");
    assert_eq!(
        ticket.polygon.checkpoints().expect("checkpoints"),
        vec![Checkpoint::new(0, 4, noon())]
    );
}

#[test]
fn seeds_ledger_from_unit_list() {
    let text = format!("[{LOWERCASE_UNIT}, {}]", serde_json::to_string(&unit()).expect("serializes"));
    let ledger = MemoryLedger::from_json(&text).expect("seeded");

    let mut ids = ledger
        .all_units()
        .into_iter()
        .map(|unit| unit.id)
        .collect::<Vec<_>>();
    ids.sort();

    assert_eq!(ids, vec!["2c9f", "2c9fa1aa-4403-4cc9-96f4-09a05638bcad"]);
    assert_eq!(ledger.read_unit(&unit().key()).expect("unit"), unit());
}

#[test]
fn seeding_rejects_duplicates() {
    let result = MemoryLedger::with_units([unit(), unit()]);
    assert!(matches!(result, Err(LedgerError::AlreadyExists(_))));

    assert!(matches!(MemoryLedger::from_json("{}"), Err(Error::Input(_))));
    assert!(matches!(
        MemoryLedger::from_json(&format!("[{LOWERCASE_UNIT}, {LOWERCASE_UNIT}]")),
        Err(Error::Ledger(LedgerError::AlreadyExists(_)))
    ));
}
