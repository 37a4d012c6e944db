mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use common::Recorder;
use pex::RunLoop;
use pex::prelude::*;

#[test]
fn nested_then_counts_up() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();

    let chain = then(
        then(then(schedule(&sch), |()| 0), |n: i32| n + 1),
        |n: i32| n + 2,
    );
    assert_eq!(sync_wait(chain).unwrap(), Some(3));
}

#[test]
fn method_and_pipe_forms_agree() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();

    let method = sch.schedule().then(|()| 0).then(|n: i32| n + 1).then(|n: i32| n + 2);
    let piped = sch.schedule()
        | pipe::then(|()| 0)
        | pipe::then(|n: i32| n + 1)
        | pipe::then(|n: i32| n + 2);
    let applied = sch
        .schedule()
        .pipe(pipe::then(|()| 0))
        .pipe(pipe::then(|n: i32| n + 1))
        .pipe(pipe::then(|n: i32| n + 2));

    assert_eq!(method.sync_wait().unwrap(), Some(3));
    assert_eq!(sync_wait(piped).unwrap(), Some(3));
    assert_eq!(sync_wait(applied).unwrap(), Some(3));
}

#[test]
fn then_runs_on_the_context_thread() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let caller = thread::current().id();

    let (ran_on, inside) = sync_wait(
        context
            .scheduler()
            .schedule()
            .then(|()| (thread::current().id(), pex::in_run_loop())),
    )
    .unwrap()
    .unwrap();

    assert_eq!(ran_on, context.thread_id());
    assert_ne!(ran_on, caller);
    assert!(inside);
    assert!(!pex::in_run_loop());
}

#[test]
fn just_completes_inline_without_running_other_work() {
    common::init_test_logging();
    let caller = thread::current().id();

    let other = RunLoop::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut unrelated = Box::pin(
        other
            .scheduler()
            .schedule_value("unrelated")
            .connect(Recorder::new(&log)),
    );
    // SAFETY: `unrelated` is kept until `other` has run it below.
    unsafe { unrelated.as_mut().start() };

    let (ran_on, inside) = sync_wait(
        just(()).then(|()| (thread::current().id(), pex::in_run_loop())),
    )
    .unwrap()
    .unwrap();

    // Completed during `start`, before the private loop was driven.
    assert_eq!(ran_on, caller);
    assert!(!inside);
    assert_eq!(other.pending(), 1);
    assert!(log.lock().unwrap().is_empty());

    other.stop();
    assert_eq!(other.run(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["unrelated"]);
    drop(unrelated);
}

#[test]
fn schedule_value_carries_tuples() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();

    let sum = sch
        .schedule_value((2u64, String::from("ab")))
        .then(|(n, s): (u64, String)| n + s.len() as u64);
    assert_eq!(sync_wait(sum).unwrap(), Some(4));
}

#[test]
fn bulk_visits_every_index_in_order() {
    common::init_test_logging();
    let context = Context::new().unwrap();

    let squares = context
        .scheduler()
        .schedule_value(vec![0usize; 5])
        .bulk(5, |i, v: &mut Vec<usize>| v[i] = i * i);
    assert_eq!(sync_wait(squares).unwrap(), Some(vec![0, 1, 4, 9, 16]));

    let order = just(Vec::new()) | pipe::bulk(3, |i: usize, v: &mut Vec<usize>| v.push(i));
    assert_eq!(sync_wait(order).unwrap(), Some(vec![0, 1, 2]));
}

#[test]
fn transfer_hops_to_the_target_context() {
    common::init_test_logging();
    let a = Context::new().unwrap();
    let b = Context::new().unwrap();

    let chain = a
        .scheduler()
        .schedule()
        .then(|()| thread::current().id())
        .transfer(&b.scheduler())
        .then(|first| (first, thread::current().id()));
    let (first, second) = sync_wait(chain).unwrap().unwrap();

    assert_eq!(first, a.thread_id());
    assert_eq!(second, b.thread_id());
}

#[test]
fn boxed_chain_behaves_like_its_source() {
    common::init_test_logging();
    let context = Context::new().unwrap();

    let boxed: pex::BoxSender<i32> =
        context.scheduler().schedule_value(20).then(|n: i32| n + 1).boxed();
    assert_eq!(sync_wait(boxed | pipe::then(|n: i32| n * 2)).unwrap(), Some(42));
}
