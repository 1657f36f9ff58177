// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{ExecutorRegistry, OfflineQueue};
use oq_adapters::{FakeExecutor, ManualConnectivity};
use oq_core::{EnqueueOptions, QueueConfig, SequentialIdGen, SyncNotifier, SystemClock};
use oq_storage::{MemoryStore, QueueStore};
use serde_json::json;

type TestDispatcher = Dispatcher<MemoryStore, SystemClock, SequentialIdGen>;

fn setup() -> (Arc<TestDispatcher>, FakeExecutor) {
    let queue = OfflineQueue::open(
        QueueStore::new(MemoryStore::new()),
        &QueueConfig::default(),
        SystemClock,
        SequentialIdGen::default(),
    )
    .unwrap();
    let registry = ExecutorRegistry::new();
    let fake = FakeExecutor::new();
    registry.register("CONTACT_FORM_SUBMIT", fake.clone());
    let dispatcher = Dispatcher::new(Arc::new(queue), registry, SyncNotifier::new());
    (Arc::new(dispatcher), fake)
}

fn enqueue(dispatcher: &TestDispatcher) {
    dispatcher
        .queue()
        .enqueue(
            "CONTACT_FORM_SUBMIT",
            json!({"name": "Test"}),
            EnqueueOptions::default(),
        )
        .unwrap();
}

/// Poll `cond` until it holds, failing the test after a few seconds
async fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not met in time");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn reconnect_triggers_sweep() {
    let (dispatcher, fake) = setup();
    let source = ManualConnectivity::new(false);
    enqueue(&dispatcher);

    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(source.clone()),
        MonitorConfig::default(),
    );

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(fake.call_count(), 0, "no sweep while offline");

    source.set_online(true);
    wait_until(|| handle.sweeps() == 1).await;
    assert_eq!(fake.call_count(), 1);
    assert!(dispatcher.queue().is_empty());

    handle.shutdown().await;
}

#[tokio::test]
async fn every_reconnect_triggers_a_sweep() {
    let (dispatcher, fake) = setup();
    let source = ManualConnectivity::new(false);
    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(source.clone()),
        MonitorConfig::default(),
    );

    enqueue(&dispatcher);
    source.set_online(true);
    wait_until(|| fake.call_count() == 1).await;

    source.set_online(false);
    enqueue(&dispatcher);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(fake.call_count(), 1, "going offline does not sweep");

    source.set_online(true);
    wait_until(|| handle.sweeps() == 2).await;
    assert_eq!(fake.call_count(), 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn periodic_sweeps_run_only_while_online() {
    let (dispatcher, fake) = setup();
    let source = ManualConnectivity::new(false);
    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(source.clone()),
        MonitorConfig {
            sweep_interval: Some(Duration::from_millis(10)),
            sweep_on_start: false,
        },
    );

    enqueue(&dispatcher);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(fake.call_count(), 0);
    assert_eq!(handle.sweeps(), 0);

    source.set_online(true);
    wait_until(|| dispatcher.queue().is_empty()).await;

    // Already online: the timer alone picks up new work
    enqueue(&dispatcher);
    wait_until(|| fake.call_count() == 2).await;

    handle.shutdown().await;
}

#[tokio::test]
async fn sweep_on_start_when_online() {
    let (dispatcher, fake) = setup();
    enqueue(&dispatcher);

    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(ManualConnectivity::new(true)),
        MonitorConfig {
            sweep_interval: None,
            sweep_on_start: true,
        },
    );

    wait_until(|| fake.call_count() == 1).await;
    handle.shutdown().await;
}

#[tokio::test]
async fn no_start_sweep_when_offline() {
    let (dispatcher, fake) = setup();
    enqueue(&dispatcher);

    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(ManualConnectivity::new(false)),
        MonitorConfig {
            sweep_interval: None,
            sweep_on_start: true,
        },
    );

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(fake.call_count(), 0);
    handle.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_reacting_to_transitions() {
    let (dispatcher, fake) = setup();
    let source = ManualConnectivity::new(false);
    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(source.clone()),
        MonitorConfig::default(),
    );

    handle.shutdown().await;
    enqueue(&dispatcher);
    source.set_online(true);
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(fake.call_count(), 0);
    assert_eq!(dispatcher.queue().len(), 1);
}

#[tokio::test]
async fn manual_sweep_runs_while_offline() {
    let (dispatcher, fake) = setup();
    let handle = ConnectivityMonitor::spawn(
        Arc::clone(&dispatcher),
        Arc::new(ManualConnectivity::new(false)),
        MonitorConfig::default(),
    );
    enqueue(&dispatcher);

    let report = dispatcher.process_queue().await.unwrap();
    assert_eq!(report.succeeded, 1);
    assert_eq!(fake.call_count(), 1);

    handle.shutdown().await;
}
