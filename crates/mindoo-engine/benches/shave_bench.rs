use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mindoo_engine::event::{Configuration, EventId};
use mindoo_engine::poset::EventPoset;
use mindoo_engine::shave::reduce;

fn ev(i: usize) -> EventId {
    EventId::parse(&format!("(h{i},t{})", i % 7)).unwrap()
}

/// `width` parallel chains of length `depth`, all hanging off one root.
/// The upper half of every chain is unchallenged.
fn comb(width: usize, depth: usize) -> (EventPoset, Configuration) {
    let mut poset = EventPoset::new();
    let root = ev(0);
    poset.add_event(root.clone(), "t0");
    let mut config = Configuration::new();
    config.insert(root.clone());
    for w in 0..width {
        let mut prev = root.clone();
        for d in 0..depth {
            let id = 1 + w * depth + d;
            let e = ev(id);
            poset.add_event(e.clone(), format!("t{}", id % 7));
            poset.add_order(&prev, &e);
            if d >= depth / 2 {
                poset.mark_unchallenged(e.clone());
            }
            config.insert(e.clone());
            prev = e;
        }
    }
    (poset, config)
}

fn bench_shave_comb_small(c: &mut Criterion) {
    let (poset, config) = comb(8, 8);
    c.bench_function("shave_comb_8x8", |b| {
        b.iter(|| reduce(black_box(&poset), black_box(&config)))
    });
}

fn bench_shave_comb_wide(c: &mut Criterion) {
    let (poset, config) = comb(64, 32);
    c.bench_function("shave_comb_64x32", |b| {
        b.iter(|| reduce(black_box(&poset), black_box(&config)))
    });
}

criterion_group!(benches, bench_shave_comb_small, bench_shave_comb_wide);
criterion_main!(benches);
