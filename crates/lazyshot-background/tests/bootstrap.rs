//! Ordering, idempotence and failure sharing of the deferred bootstrap.

use std::sync::Arc;

use futures::future::join_all;
use lazyshot_background::{BackgroundExports, BootstrapSequencer, ReadinessState};
use lazyshot_core::UnitName;
use lazyshot_test::RecordingUnitLoader;

fn sequencer(units: &[&'static str], loader: &RecordingUnitLoader) -> BootstrapSequencer {
    BootstrapSequencer::new(
        units.iter().map(|u| UnitName::from_static(u)).collect(),
        loader.shared(),
        Arc::new(BackgroundExports::new()),
    )
}

#[tokio::test]
async fn concurrent_callers_share_one_load() {
    let loader = RecordingUnitLoader::new();
    let seq = sequencer(&["A", "B", "C"], &loader);

    let results = join_all((0..10).map(|_| seq.ensure_ready())).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(loader.load_count(), 3);
    assert_eq!(loader.finished(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn next_unit_waits_for_the_previous_one() {
    let loader = RecordingUnitLoader::new();
    let gate = loader.hold("B");
    let seq = sequencer(&["A", "B", "C"], &loader);

    let first = seq.ensure_ready();
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert_eq!(loader.started(), vec!["A", "B"]);
    assert_eq!(seq.state(), ReadinessState::InProgress);

    let second = seq.ensure_ready();
    assert!(first.ptr_eq(&second));

    gate.notify_one();
    assert!(second.await.is_ok());
    assert_eq!(loader.started(), vec!["A", "B", "C"]);
    assert_eq!(seq.state(), ReadinessState::Complete);
}

#[tokio::test]
async fn failing_unit_is_reported_to_every_caller() {
    let loader = RecordingUnitLoader::new().fail_on("C", "X");
    let seq = sequencer(&["A", "B", "C"], &loader);

    let (first, second) = tokio::join!(seq.ensure_ready(), seq.ensure_ready());
    let first = first.unwrap_err();
    let second = second.unwrap_err();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.unit.as_str(), "C");
    assert_eq!(first.source.to_string(), "X");
    assert_eq!(loader.started(), vec!["A", "B", "C"]);
    assert_eq!(loader.finished(), vec!["A", "B"]);
}

#[tokio::test]
async fn failure_is_terminal() {
    let loader = RecordingUnitLoader::new().fail_on("A", "X");
    let seq = sequencer(&["A", "B"], &loader);

    let first = seq.ensure_ready().await.unwrap_err();
    let again = seq.ensure_ready().await.unwrap_err();

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(loader.load_count(), 1);
    assert!(matches!(seq.outcome(), Some(Err(_))));
    assert_eq!(seq.attached_units(), vec![UnitName::from_static("A")]);
}
