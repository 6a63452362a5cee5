//! Integration tests for logging initialization

use bridge_traits::logging::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use core_runtime::Error;
use std::sync::Arc;

// `init_logging` installs a process-global subscriber, so everything that
// depends on that ordering lives in this single test.
#[test]
fn test_init_logging_once_per_process() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(Arc::new(ConsoleLogger::default()));

    init_logging(config).expect("first initialization succeeds");
    tracing::info!(target: "core_catalog::ingestion", accepted = 3u64, "catalog ready");

    let second = init_logging(LoggingConfig::default().with_format(LogFormat::Json));
    assert!(matches!(second, Err(Error::Config(msg)) if msg.contains("Failed to initialize logging")));
}

#[test]
fn test_invalid_filter_is_rejected_before_install() {
    let result = init_logging(LoggingConfig::default().with_filter("core_catalog=loud"));
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Invalid log filter")));
}

#[test]
fn test_path_stripping() {
    assert_eq!(
        strip_path("/srv/catalogs/Spotify Most Streamed Songs.csv"),
        "Spotify Most Streamed Songs.csv"
    );
    assert_eq!(strip_path("D:\\exports\\top.csv"), "top.csv");
}
