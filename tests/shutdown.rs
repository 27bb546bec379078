use meshdash::connections::ConnectTarget;
use meshdash::core::{shutdown, ConnectionEvent, ShutdownGuard};
use std::sync::atomic::Ordering;

mod common;
use common::fake_device::{fake_manager, FakeConfig};
use common::init_test_logging;

#[test]
fn dropping_the_guard_closes_the_connection() {
    init_test_logging();
    let (manager, log) = fake_manager(FakeConfig::default(), &[]);
    manager
        .connect(ConnectTarget::network("10.0.0.5"))
        .expect("connect should succeed");

    {
        let _guard = ShutdownGuard::new(manager.clone());
    }

    assert!(!manager.is_connected());
    assert_eq!(log.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn disarmed_guard_leaves_the_connection_open() {
    init_test_logging();
    let (manager, log) = fake_manager(FakeConfig::default(), &[]);
    manager
        .connect(ConnectTarget::network("10.0.0.5"))
        .expect("connect should succeed");

    ShutdownGuard::new(manager.clone()).disarm();

    assert!(manager.is_connected());
    assert_eq!(log.closes.load(Ordering::SeqCst), 0);
}

#[test]
fn shutdown_swallows_close_errors_and_observer_panics() {
    init_test_logging();
    let config = FakeConfig {
        fail_close: true,
        ..FakeConfig::default()
    };
    let (manager, log) = fake_manager(config, &["/dev/ttyUSB0"]);
    manager
        .connect(ConnectTarget::first_serial())
        .expect("connect should succeed");
    manager.register_observer(|_: &ConnectionEvent| -> anyhow::Result<()> {
        panic!("window already destroyed")
    });

    shutdown(&manager);

    assert!(!manager.is_connected());
    assert_eq!(log.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn shutdown_without_a_connection_is_harmless() {
    init_test_logging();
    let (manager, log) = fake_manager(FakeConfig::default(), &[]);

    shutdown(&manager);
    shutdown(&manager);

    assert_eq!(log.closes.load(Ordering::SeqCst), 0);
}
