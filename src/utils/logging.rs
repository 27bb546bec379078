use log::LevelFilter;

/// Initialize logging using env_logger.
/// `RUST_LOG` takes precedence when set; otherwise `default_level` applies,
/// e.g. `RUST_LOG=meshdash=debug meshdash nodes --port /dev/ttyUSB0`
pub fn init_logging(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level).parse_default_env();
    // A second initialisation (tests, embedding apps) keeps the first logger.
    let _ = builder.try_init();
}
