use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pitch_metrics::dataset::parse_dataset_json;
use pitch_metrics::mock_feed::mock_dataset;
use pitch_metrics::player_impact::rank_players;
use pitch_metrics::report::{build_match_report, build_reports};
use pitch_metrics::team_shape::{chemistry_pairs, coordination_index};
use pitch_metrics::xg::{team_expected_goals, xg_timeline};

fn bench_dataset_parse(c: &mut Criterion) {
    c.bench_function("dataset_parse", |b| {
        b.iter(|| {
            let dataset = parse_dataset_json(black_box(SAMPLE_JSON)).unwrap();
            black_box(dataset.matches.len());
        })
    });
}

fn bench_mock_dataset(c: &mut Criterion) {
    c.bench_function("mock_dataset_8", |b| {
        b.iter(|| {
            let dataset = mock_dataset(black_box(7), 8);
            black_box(dataset.matches.len());
        })
    });
}

fn bench_xg(c: &mut Criterion) {
    let dataset = mock_dataset(7, 1);
    let m = &dataset.matches[0];
    c.bench_function("team_expected_goals", |b| {
        b.iter(|| black_box(team_expected_goals(black_box(&m.events), &m.home.name)))
    });
    c.bench_function("xg_timeline", |b| {
        b.iter(|| {
            let timeline = xg_timeline(black_box(&m.events), &m.home.name, &m.away.name, 95);
            black_box(timeline.len());
        })
    });
}

fn bench_shape(c: &mut Criterion) {
    let dataset = mock_dataset(7, 1);
    let combos = &dataset.matches[0].pass_combinations.home;
    c.bench_function("coordination_index", |b| {
        b.iter(|| black_box(coordination_index(black_box(combos))))
    });
    c.bench_function("chemistry_pairs", |b| {
        b.iter(|| black_box(chemistry_pairs(black_box(combos), 82.0).len()))
    });
}

fn bench_player_ranking(c: &mut Criterion) {
    let dataset = mock_dataset(7, 1);
    let players = &dataset.matches[0].players;
    c.bench_function("rank_players", |b| {
        b.iter(|| black_box(rank_players(black_box(players)).len()))
    });
}

fn bench_reports(c: &mut Criterion) {
    let dataset = mock_dataset(7, 16);
    c.bench_function("match_report", |b| {
        b.iter(|| black_box(build_match_report(black_box(&dataset.matches[0])).players.len()))
    });
    c.bench_function("build_reports_16", |b| {
        b.iter(|| black_box(build_reports(black_box(&dataset)).len()))
    });
}

criterion_group!(
    perf,
    bench_dataset_parse,
    bench_mock_dataset,
    bench_xg,
    bench_shape,
    bench_player_ranking,
    bench_reports
);
criterion_main!(perf);

static SAMPLE_JSON: &str = include_str!("../tests/fixtures/sample_match.json");
