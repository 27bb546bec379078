use meshdash::connections::{ConnectTarget, ConnectionKind};
use meshdash::core::ConnectionEvent;
use meshdash::ConnectionStatus;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mod common;
use common::fake_device::{fake_manager, FakeConfig};
use common::init_test_logging;

#[test]
fn observers_run_one_after_another_in_registration_order() {
    init_test_logging();
    let (manager, _log) = fake_manager(FakeConfig::default(), &[]);
    let trace = Arc::new(Mutex::new(Vec::<String>::new()));

    for name in ["A", "B"] {
        let trace = Arc::clone(&trace);
        manager.register_observer(move |_: &ConnectionEvent| {
            trace.lock().unwrap().push(format!("{name} start"));
            trace.lock().unwrap().push(format!("{name} end"));
            Ok(())
        });
    }

    manager
        .connect(ConnectTarget::network("10.0.0.5"))
        .expect("connect should succeed");
    manager.disconnect();

    let expected: Vec<String> = ["A start", "A end", "B start", "B end"]
        .iter()
        .cycle()
        .take(8)
        .map(|s| s.to_string())
        .collect();
    assert_eq!(*trace.lock().unwrap(), expected);
}

#[test]
fn observers_see_the_state_already_updated() {
    init_test_logging();
    let (manager, _log) = fake_manager(FakeConfig::default(), &[]);
    let seen = Arc::new(Mutex::new(Vec::<ConnectionStatus>::new()));

    {
        let seen = Arc::clone(&seen);
        let observed = manager.clone();
        manager.register_observer(move |_: &ConnectionEvent| {
            seen.lock().unwrap().push(observed.status());
            Ok(())
        });
    }

    manager
        .connect(ConnectTarget::network("10.0.0.5"))
        .expect("connect should succeed");
    manager.disconnect();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0],
        ConnectionStatus {
            kind: ConnectionKind::Network,
            address: Some("10.0.0.5:4403".into()),
        }
    );
    assert_eq!(seen[1], ConnectionStatus::default());
}

#[test]
fn faulty_observers_do_not_stop_the_fan_out_or_fail_the_operation() {
    init_test_logging();
    let (manager, _log) = fake_manager(FakeConfig::default(), &[]);
    let healthy_calls = Arc::new(AtomicUsize::new(0));

    manager.register_observer(|_: &ConnectionEvent| -> anyhow::Result<()> {
        anyhow::bail!("nodes tab failed to refresh")
    });
    manager.register_observer(|_: &ConnectionEvent| -> anyhow::Result<()> {
        panic!("observer bug")
    });
    {
        let healthy_calls = Arc::clone(&healthy_calls);
        manager.register_observer(move |_: &ConnectionEvent| {
            healthy_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
    }

    manager
        .connect(ConnectTarget::serial("/dev/ttyUSB0"))
        .expect("observer failures must not fail connect");
    assert!(manager.disconnect());

    assert_eq!(healthy_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn registering_the_same_observer_twice_delivers_once() {
    init_test_logging();
    let (manager, _log) = fake_manager(FakeConfig::default(), &[]);
    let calls = Arc::new(AtomicUsize::new(0));

    let handle = {
        let calls = Arc::clone(&calls);
        manager.register_observer(move |_: &ConnectionEvent| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    };
    manager.on_connection_changed(Arc::clone(&handle));
    manager.on_connection_changed(handle);

    assert_eq!(manager.observer_count(), 1);
    manager.disconnect();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn observer_can_read_the_device_while_being_notified() {
    init_test_logging();
    let config = FakeConfig {
        nodes: BTreeMap::from([
            (1, json!({ "user": { "longName": "Base Camp" } })),
            (2, json!({ "user": { "longName": "Ridge Relay" } })),
        ]),
        ..FakeConfig::default()
    };
    let (manager, _log) = fake_manager(config, &[]);
    let refreshed = Arc::new(Mutex::new(None));

    {
        let refreshed = Arc::clone(&refreshed);
        let observed = manager.clone();
        manager.register_observer(move |event: &ConnectionEvent| {
            if let ConnectionEvent::Connected(_) = event {
                // Same refresh a nodes tab performs on connect.
                let count = observed.with_device(|device| Ok(device.node_table()?.len()))?;
                *refreshed.lock().unwrap() = Some(count);
            }
            Ok(())
        });
    }

    manager
        .connect(ConnectTarget::network("10.0.0.5"))
        .expect("connect should succeed");

    assert_eq!(*refreshed.lock().unwrap(), Some(2));
}
