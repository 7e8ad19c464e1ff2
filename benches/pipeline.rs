use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mindtree_renderer::config::Config;
use mindtree_renderer::ir::Record;
use mindtree_renderer::normalize::{TierRule, normalize_rows};
use mindtree_renderer::sample::sample_rows;
use mindtree_renderer::session::render_records;
use mindtree_renderer::svg::render_svg;
use std::hint::black_box;

/// Complete tree with `fanout` children per node, `depth` levels below the root.
fn balanced_records(fanout: usize, depth: usize) -> Vec<Record> {
    let mut records = vec![Record::new("n", "Root", None)];
    let mut frontier = vec!["n".to_string()];
    for level in 1..=depth {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for parent in &frontier {
            for child in 0..fanout {
                let id = format!("{parent}.{child}");
                records.push(Record::new(
                    id.clone(),
                    format!("Level {level} item {child}"),
                    Some(parent.as_str()),
                ));
                next.push(id);
            }
        }
        frontier = next;
    }
    records
}

fn bench_pipeline(c: &mut Criterion) {
    let config = Config::default();
    let sample = normalize_rows(&sample_rows(), &TierRule::default());

    c.bench_function("pipeline_sample", |b| {
        b.iter(|| render_records(black_box(&sample), &config))
    });

    c.bench_function("normalize_sample", |b| {
        let rows = sample_rows();
        let rule = TierRule::default();
        b.iter(|| normalize_rows(black_box(&rows), &rule))
    });

    let mut group = c.benchmark_group("pipeline_balanced");
    for (fanout, depth) in [(3, 4), (4, 5), (8, 4)] {
        let records = balanced_records(fanout, depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{fanout}x{depth}")),
            &records,
            |b, records| b.iter(|| render_records(black_box(records), &config)),
        );
    }
    group.finish();

    if let Ok(output) = render_records(&sample, &config) {
        c.bench_function("svg_sample", |b| {
            b.iter(|| render_svg(black_box(&output.scene)))
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
