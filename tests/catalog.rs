mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::{file, transport, FakeService};
use printdeck::controller::{FileCatalog, ListDisplay, SessionRegistry};
use printdeck::SessionId;

fn open() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

#[tokio::test]
async fn test_load_replaces_cache_wholesale() {
    let service = Arc::new(FakeService::new());
    let registry = SessionRegistry::sessions(service.clone(), open());
    assert_eq!(registry.view().await.items, None);

    registry.load().await.unwrap();
    assert_eq!(
        registry.view().await.items,
        Some(vec![SessionId::new("s1"), SessionId::new("s2")])
    );

    service.set_sessions(Ok(Some(vec![SessionId::new("s3")])));
    registry.refresh().await.unwrap();
    assert_eq!(registry.view().await.items, Some(vec![SessionId::new("s3")]));
}

#[tokio::test]
async fn test_failure_keeps_previous_list_and_sets_error() {
    let service = Arc::new(FakeService::new());
    let catalog = FileCatalog::files(service.clone(), open());
    catalog.load().await.unwrap();

    service.set_files(Err(transport("connection refused")));
    let err = catalog.refresh().await.unwrap_err();
    assert_eq!(err, transport("connection refused"));

    let view = catalog.view().await;
    assert_eq!(view.items, Some(vec![file("1", "benchy.gcode")]));
    assert_eq!(view.last_error.as_deref(), Some("Transport error: connection refused"));
    assert!(!view.loading);

    service.set_files(Ok(Some(vec![])));
    catalog.refresh().await.unwrap();
    assert!(catalog.view().await.last_error.is_none());
}

#[tokio::test]
async fn test_empty_list_is_no_data_not_error() {
    let service = Arc::new(FakeService::new());
    service.set_files(Ok(Some(vec![])));
    let catalog = FileCatalog::files(service.clone(), open());
    catalog.load().await.unwrap();
    let view = catalog.view().await;
    assert_eq!(view.display(), ListDisplay::NoData);

    let failing = Arc::new(FakeService::new());
    failing.set_files(Err(transport("refused")));
    let catalog = FileCatalog::files(failing, open());
    let _ = catalog.load().await;
    let view = catalog.view().await;
    assert_eq!(view.display(), ListDisplay::Error("Transport error: refused"));
}

#[tokio::test]
async fn test_missing_payload_is_empty_list() {
    let service = Arc::new(FakeService::new());
    service.set_sessions(Ok(None));
    let registry = SessionRegistry::sessions(service, open());
    assert_eq!(registry.load().await.unwrap(), Vec::<SessionId>::new());
    assert_eq!(registry.view().await.display(), ListDisplay::NoData);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_refreshes_share_one_fetch() {
    let service = Arc::new(FakeService::new());
    service.set_list_delay(Duration::from_millis(500));
    let registry = SessionRegistry::sessions(service.clone(), open());

    let (a, b, c) = tokio::join!(registry.load(), registry.refresh(), registry.refresh());
    assert_eq!(service.session_calls(), 1);
    assert_eq!(a.unwrap(), b.clone().unwrap());
    assert_eq!(b, c);
    assert!(!registry.is_in_flight());

    // Once settled, a new refresh fetches again.
    registry.refresh().await.unwrap();
    assert_eq!(service.session_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_loading_flag_while_in_flight() {
    let service = Arc::new(FakeService::new());
    service.set_list_delay(Duration::from_millis(500));
    let catalog = FileCatalog::files(service.clone(), open());

    let background = catalog.clone();
    let task = tokio::spawn(async move { background.load().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let view = catalog.view().await;
    assert!(view.loading);
    assert_eq!(view.display(), ListDisplay::Loading);

    task.await.unwrap().unwrap();
    assert!(!catalog.view().await.loading);
}

#[tokio::test(start_paused = true)]
async fn test_result_after_close_is_discarded() {
    let service = Arc::new(FakeService::new());
    service.set_list_delay(Duration::from_millis(500));
    let closed = open();
    let registry = SessionRegistry::sessions(service.clone(), closed.clone());

    let background = registry.clone();
    let task = tokio::spawn(async move { background.load().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    closed.store(true, Ordering::Release);
    let _ = task.await.unwrap();

    assert_eq!(registry.view().await.items, None);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_load_still_settles() {
    let service = Arc::new(FakeService::new());
    service.set_list_delay(Duration::from_millis(200));
    let registry = SessionRegistry::sessions(service.clone(), open());

    let timed_out = tokio::time::timeout(Duration::from_millis(50), registry.load()).await;
    assert!(timed_out.is_err());
    assert!(registry.view().await.loading);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let view = registry.view().await;
    assert!(!view.loading);
    assert_eq!(view.items, Some(vec![SessionId::new("s1"), SessionId::new("s2")]));
    assert!(!registry.is_in_flight());
    assert_eq!(service.session_calls(), 1);
}
