use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use pex::prelude::*;

fn bench_schedule_then(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_then");
    group.measurement_time(Duration::from_secs(5));

    // 1. Inline chain: no loop hop, measures combinator overhead.
    group.bench_function("just_then_inline", |b| {
        b.iter(|| sync_wait(just(black_box(1u64)).then(|n| n + 1).then(|n| n * 2)));
    });

    // 2. Round trip through a context thread.
    group.bench_function("context_round_trip", |b| {
        let context = Context::new().unwrap();
        let sch = context.scheduler();
        b.iter(|| sync_wait(sch.schedule_value(black_box(1u64)).then(|n| n + 1)));
    });

    // 3. let_value adds a second hop onto the same context.
    group.bench_function("context_let_value", |b| {
        let context = Context::new().unwrap();
        let sch = context.scheduler();
        b.iter(|| {
            let inner = sch.clone();
            sync_wait(
                sch.schedule_value(black_box(1u64))
                    .let_value(move |n| inner.schedule_value(n + 1)),
            )
        });
    });

    // 4. Hop between two contexts.
    group.bench_function("transfer_between_contexts", |b| {
        let a = Context::new().unwrap();
        let bctx = Context::new().unwrap();
        let (sa, sb) = (a.scheduler(), bctx.scheduler());
        b.iter(|| sync_wait(sa.schedule_value(black_box(1u64)).transfer(&sb).then(|n| n + 1)));
    });

    group.finish();
}

criterion_group!(benches, bench_schedule_then);
criterion_main!(benches);
