use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use pex::prelude::*;

fn spawn_schedule_hammer(
    sch: Scheduler,
    run: Arc<AtomicBool>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..workers)
        .map(|_| {
            let sch = sch.clone();
            let run = Arc::clone(&run);
            thread::spawn(move || {
                while run.load(Ordering::Relaxed) {
                    let _ = sync_wait(sch.schedule());
                }
            })
        })
        .collect()
}

fn bench_contention(c: &mut Criterion) {
    let worker_counts: &[usize] = &[0, 1, 3];

    let mut group = c.benchmark_group("high_contention");
    group.measurement_time(Duration::from_secs(10));
    group.warm_up_time(Duration::from_millis(1200));
    group.throughput(Throughput::Elements(1));

    for &workers in worker_counts {
        #[cfg(target_os = "linux")]
        let pin = PinConfig::core(0);
        #[cfg(target_os = "macos")]
        let pin = PinConfig {
            core_id: None,
            mac_affinity_tag: Some(1),
        };
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        let pin = PinConfig::default();

        let context = Context::with_config(ContextConfig::default().with_pin(pin)).unwrap();
        let sch = context.scheduler();
        let run = Arc::new(AtomicBool::new(true));
        let threads = spawn_schedule_hammer(sch.clone(), Arc::clone(&run), workers);

        group.bench_function(BenchmarkId::new("schedule_then", workers), |b| {
            b.iter(|| sync_wait(sch.schedule_value(1u64).then(|n| n + 1)));
        });

        run.store(false, Ordering::Relaxed);
        for t in threads {
            let _ = t.join();
        }
    }

    group.finish();
}

criterion_group!(benches, bench_contention);
criterion_main!(benches);
