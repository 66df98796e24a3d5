//! Exercises the shared tracing bootstrap end to end: resolve the log
//! location, install the global subscriber, emit through it.

use chrono::Local;
use sightline_common::observability::{init_logging, LogConfig};
use tempfile::TempDir;
use tracing::info;

#[test]
fn init_resolves_dated_path_and_repeats_as_noop() {
    let tmp = TempDir::new().expect("temp log dir");

    let first = init_logging(LogConfig {
        log_dir: Some(tmp.path().to_path_buf()),
        ..LogConfig::default()
    })
    .expect("logging init");

    assert!(first.starts_with(tmp.path()));
    assert_eq!(
        first.file_name().and_then(|n| n.to_str()),
        Some("sightline.log")
    );
    let dated = first
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(str::to_owned);
    assert_eq!(dated, Some(Local::now().format("%Y-%m-%d").to_string()));

    // The subscriber is installed; emitting through it must not panic.
    info!("logging pipeline is up");

    // A later caller, even one asking for a different directory, gets the
    // location the first call settled on.
    let other = TempDir::new().expect("second temp dir");
    let second = init_logging(LogConfig {
        log_dir: Some(other.path().to_path_buf()),
        ..LogConfig::default()
    })
    .expect("repeat init");
    assert_eq!(second, first);
}
