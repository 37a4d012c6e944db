use std::env;
use std::time::Instant;

use pex::prelude::*;

#[inline(never)]
fn touch(v: u64) {
    std::hint::black_box(v);
}

fn main() -> pex::Result<()> {
    let iterations: usize = env::var("ITER")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(50_000);

    let context = make_context()?;
    let sch = context.scheduler();

    // Warmup to stabilize cache state
    for _ in 0..(iterations / 10).max(1) {
        sync_wait(sch.schedule())?;
    }

    let start = Instant::now();
    let mut sum = 0u64;
    for i in 0..iterations {
        sum += sync_wait(sch.schedule_value(i as u64).then(|n| n + 1))?.unwrap_or(0);
    }
    let elapsed = start.elapsed();

    touch(sum);
    println!(
        "schedule_sum={sum} iters={iterations} ns_per_round_trip={}",
        elapsed.as_nanos() / iterations.max(1) as u128
    );
    Ok(())
}
