use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docintel::{Classifier, ClassifierConfig, DocIntelConfig, Engine, StubEmbedder};

const MEMO: &str = "The safety officer inspected the boiler room and found corroded pressure \
    valves. Maintenance crews must replace them before the next shift, and the incident report \
    is due to the regulatory office by Friday.";

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

/// Scoring only: one embedding against both catalogs.
fn bench_scoring(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("scoring");

    for dim in [128usize, 384, 768] {
        let stub = StubEmbedder::new(dim, true, "bench");
        let classifier = rt
            .block_on(Classifier::build(&ClassifierConfig::default(), &stub))
            .expect("catalog encodes");
        let doc = stub.embed_now(MEMO);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("score", dim), &doc, |b, doc| {
            b.iter(|| black_box(classifier.score(black_box(doc))))
        });
    }
    group.finish();
}

/// Full pipeline with offline providers.
fn bench_process_text(c: &mut Criterion) {
    let rt = runtime();
    let engine = rt
        .block_on(Engine::from_config(DocIntelConfig::default()))
        .expect("engine builds");

    let mut group = c.benchmark_group("process_text");
    for repeat in [1usize, 10, 40] {
        let text = MEMO.repeat(repeat);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(text.len()), &text, |b, text| {
            b.iter(|| rt.block_on(engine.process_text("Engineering", black_box(text))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scoring, bench_process_text);
criterion_main!(benches);
