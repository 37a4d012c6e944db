mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use common::ChannelReceiver;
use pex::BoxSender;
use pex::prelude::*;

fn assert_send<T: Send>(_: &T) {}

#[test]
fn successor_value_completes_the_chain() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();

    let inner = sch.clone();
    let chain = sch
        .schedule_value(10)
        .let_value(move |n: i32| inner.schedule_value(n * 2).then(|m: i32| m + 1));
    assert_eq!(sync_wait(chain).unwrap(), Some(21));
}

#[test]
fn factory_picks_a_branch_at_runtime() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();

    let branch = |start: i32| {
        let sch = sch.clone();
        sch.schedule_value(start).let_value(move |n: i32| -> BoxSender<String> {
            if n % 2 == 0 {
                just(format!("even {n}")).boxed()
            } else {
                sch.schedule_value(n).then(|n: i32| format!("odd {n}")).boxed()
            }
        })
    };

    assert_eq!(sync_wait(branch(4)).unwrap().as_deref(), Some("even 4"));
    assert_eq!(sync_wait(branch(7)).unwrap().as_deref(), Some("odd 7"));
}

#[test]
fn nested_let_value_runs_each_factory_once() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();
    let calls = Arc::new(AtomicUsize::new(0));

    let (c1, c2) = (calls.clone(), calls.clone());
    let (s1, s2) = (sch.clone(), sch.clone());
    let chain = sch.schedule()
        | pipe::let_value(move |()| {
            c1.fetch_add(1, Ordering::SeqCst);
            s1.schedule_value(1)
        })
        | pipe::let_value(move |n: i32| {
            c2.fetch_add(1, Ordering::SeqCst);
            s2.schedule_value(n + 1)
        });

    assert_eq!(sync_wait(chain).unwrap(), Some(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn successor_on_another_context() {
    common::init_test_logging();
    let a = Context::new().unwrap();
    let b = Context::new().unwrap();
    let b_sch = b.scheduler();
    let b_id = b.thread_id();

    let chain = a
        .scheduler()
        .schedule()
        .let_value(move |()| b_sch.schedule().then(|()| std::thread::current().id()));
    assert_eq!(sync_wait(chain).unwrap(), Some(b_id));
}

#[test]
fn upstream_error_skips_the_factory() {
    common::init_test_logging();
    let called = Arc::new(AtomicUsize::new(0));
    let seen = called.clone();

    let chain = just_error::<i32>(Error::msg("upstream")).let_value(move |n: i32| {
        seen.fetch_add(1, Ordering::SeqCst);
        just(n)
    });

    let err = sync_wait(chain).unwrap_err();
    assert_eq!(err.to_string(), "upstream");
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[test]
fn stopped_predecessor_stops_the_chain() {
    common::init_test_logging();
    let chain = just_stopped::<i32>().let_value(|n: i32| just(n + 1));
    assert_eq!(sync_wait(chain).unwrap(), None);
}

#[test]
fn operation_started_on_one_thread_is_dropped_on_another() {
    common::init_test_logging();
    let context = Context::new().unwrap();
    let sch = context.scheduler();
    let (tx, rx) = mpsc::channel();

    let inner = sch.clone();
    let chain = sch
        .schedule_value(1)
        .let_value(move |n: i32| inner.schedule_value(n + 1).then(|m: i32| m * 10));
    let op = chain.connect(ChannelReceiver { tx });
    assert_send(&op);

    let starter = thread::spawn(move || {
        let mut op = Box::pin(op);
        // SAFETY: the operation is handed back and kept until it completed.
        unsafe { op.as_mut().start() };
        op
    });
    let op = starter.join().unwrap();

    // The successor was built on the context thread; it is freed here.
    assert!(matches!(rx.recv().unwrap(), Completion::Value(20)));
    drop(op);
}
