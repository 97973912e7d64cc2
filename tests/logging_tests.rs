use elprice::config::LoggingConfig;
use elprice::logging::{LogContext, get_logger, get_logger_with_context, init_logging};

#[test]
fn init_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let config = LoggingConfig {
        file: tmp.path().join("elprice.log").to_string_lossy().to_string(),
        console_output: false,
        ..LoggingConfig::default()
    };
    init_logging(&config).unwrap();
    // A second call is a no-op and reports the same outcome
    init_logging(&config).unwrap();
    assert!(elprice::logging::is_initialized());

    get_logger("test").info("logging after init");
}

#[test]
fn context_logger_does_not_panic() {
    let logger = get_logger_with_context(
        LogContext::new("sensor")
            .with_sensor_id("sensor.nordpool")
            .with_field("tick", "1".to_string()),
    );
    logger.for_day("today").warn("padded variable fees");
    logger.debug("debug line");
}
