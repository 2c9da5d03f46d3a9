use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use textmark_engine::{ContentTree, InMemoryRegionStore, RegionStore, materialize_all};

fn bench_materialize_all(c: &mut Criterion) {
    let text = "the quick brown fox jumps over the lazy dog\n".repeat(64);

    c.bench_function("materialize_all/64_regions_fragmented", |b| {
        b.iter_batched(
            || {
                let tree = ContentTree::render_fragmented(&text, 7);
                let mut store = InMemoryRegionStore::new();
                for i in 0..64 {
                    let start = i * 44 + 4;
                    let end = start + 5;
                    store.create_region(start, end, text[start..end].to_string(), Vec::new());
                }
                (tree, store)
            },
            |(mut tree, mut store)| {
                materialize_all(&mut tree, &mut store);
                (tree, store)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_materialize_all);
criterion_main!(benches);
