#![allow(dead_code)]

pub mod fake_device;

use log::LevelFilter;

/// Logs will appear only when you run with `-- --nocapture` or when the test fails.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
