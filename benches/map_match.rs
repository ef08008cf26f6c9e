use chrono::DateTime;
use criterion::criterion_main;
use tollgate::geo::{parse_linestring, RoadPoint};
use tollgate::matcher::{FixedClock, MapMatcher, DEFAULT_THRESHOLD};
use tollgate::segment::SegmentAggregator;
use tollgate::RoadModel;
use tollgate_fixtures::{fixture_path, ROAD_MODEL, TRACE_I35_D10};

struct MapMatchScenario {
    name: &'static str,
    trace_file: &'static str,

    expected_checkpoints: usize,
    expected_segments: usize,
}

const MATCH_CASES: [MapMatchScenario; 1] = [MapMatchScenario {
    name: "I35_D10",
    trace_file: TRACE_I35_D10,

    expected_checkpoints: 22,
    expected_segments: 2,
}];

fn target_benchmark(c: &mut criterion::Criterion) {
    let mut group = c.benchmark_group("match");
    group.significance_level(0.1).sample_size(30);

    let model = RoadModel::from_directory(fixture_path(ROAD_MODEL)).expect("Model must load");
    let clock = FixedClock(
        DateTime::parse_from_rfc3339("2023-05-10T12:00:00+02:00").expect("Timestamp must parse"),
    );

    MATCH_CASES.into_iter().for_each(|sc| {
        let text = std::fs::read_to_string(fixture_path(sc.trace_file))
            .expect("Trace fixture must exist");
        let trace: Vec<RoadPoint> =
            parse_linestring(&text).expect("Linestring must parse successfully.");

        let matcher = MapMatcher::new(&model, DEFAULT_THRESHOLD);
        let aggregator = SegmentAggregator::new(&model);

        group.bench_function(format!("match: {}", sc.name), |b| {
            b.iter(|| {
                let checkpoints = matcher.match_trace(&trace, &clock);
                assert_eq!(checkpoints.len(), sc.expected_checkpoints);

                let segments = aggregator
                    .aggregate(&checkpoints)
                    .expect("Aggregation must complete successfully");
                assert_eq!(segments.len(), sc.expected_segments);
            })
        });
    });

    group.finish();
}

criterion::criterion_group!(targeted_benches, target_benchmark);
criterion_main!(targeted_benches);
