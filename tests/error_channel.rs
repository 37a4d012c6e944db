mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pex::Just;
use pex::prelude::*;

#[test]
fn panic_in_then_becomes_an_error() {
    common::init_test_logging();
    let context = Context::new().unwrap();

    let chain = context
        .scheduler()
        .schedule()
        .then(|()| -> i32 { panic!("boom") })
        .then(|n: i32| n + 1);
    match sync_wait(chain) {
        Err(Error::Panicked { message }) => assert_eq!(message, "boom"),
        other => panic!("expected a panic error, got {other:?}"),
    }

    // The loop survives the panic.
    let after = context.scheduler().schedule().then(|()| 5);
    assert_eq!(sync_wait(after).unwrap(), Some(5));
}

#[test]
fn panic_in_factory_becomes_an_error() {
    common::init_test_logging();
    let context = Context::new().unwrap();

    let chain = context
        .scheduler()
        .schedule()
        .let_value(|()| -> Just<i32> { panic!("factory {}", 7) });
    let err = sync_wait(chain).unwrap_err();
    assert!(err.is_panic());
    assert_eq!(err.to_string(), "continuation panicked: factory 7");
}

#[test]
fn try_then_error_is_propagated() {
    common::init_test_logging();
    let even_only = |n: i32| if n % 2 == 0 { Ok(n) } else { Err("odd input") };

    assert_eq!(sync_wait(just(4).try_then(even_only)).unwrap(), Some(4));
    match sync_wait(just(3) | pipe::try_then(even_only)) {
        Err(Error::Failed(inner)) => assert_eq!(inner.to_string(), "odd input"),
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[test]
fn errors_skip_value_continuations() {
    common::init_test_logging();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();

    let chain = just_error::<i32>(Error::msg("early")).then(move |n: i32| {
        flag.store(true, Ordering::SeqCst);
        n
    });
    assert!(matches!(sync_wait(chain), Err(Error::Failed(_))));
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn upon_error_recovers() {
    common::init_test_logging();
    let context = Context::new().unwrap();

    let chain = context
        .scheduler()
        .schedule()
        .then(|()| -> i32 { panic!("lost") })
        .upon_error(|e| if e.is_panic() { -1 } else { 0 })
        .then(|n: i32| n * 10);
    assert_eq!(sync_wait(chain).unwrap(), Some(-10));

    let untouched = just(3) | pipe::upon_error(|_: Error| 0);
    assert_eq!(sync_wait(untouched).unwrap(), Some(3));
}

#[test]
fn panic_in_bulk_becomes_an_error() {
    common::init_test_logging();
    let chain = just(0u32).bulk(4, |i, _: &mut u32| {
        if i == 2 {
            panic!("index {i}");
        }
    });
    assert!(sync_wait(chain).unwrap_err().is_panic());
}

#[test]
fn stopped_maps_to_none() {
    common::init_test_logging();
    let chain = just_stopped::<i32>().then(|n: i32| n + 1).upon_error(|_| 0);
    assert_eq!(sync_wait(chain).unwrap(), None);
}

#[test]
fn completion_into_result() {
    assert_eq!(Completion::Value(1).into_result().unwrap(), Some(1));
    assert_eq!(Completion::<i32>::Stopped.into_result().unwrap(), None);
    assert!(Completion::<i32>::Error(Error::Abandoned).into_result().is_err());
    assert!(matches!(
        Completion::Value(2).map(|n| n * 2),
        Completion::Value(4)
    ));
}
