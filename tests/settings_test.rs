//! Tests for loading the settings file.

use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use strictly_mastermind_cli::Settings;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let settings = Settings::load(&dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_file_overrides_timing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("master-mind.toml");
    fs::write(
        &path,
        "entry_timeout_ms = 1500\nfeedback_gap_ms = 250\nbutton_key = \"b\"\n",
    )
    .expect("Write failed");

    let settings = Settings::load(&path).expect("Load failed");
    assert_eq!(*settings.button_key(), 'b');

    let timing = settings.timing();
    assert_eq!(*timing.entry_timeout(), Duration::from_millis(1500));
    assert_eq!(*timing.feedback_gap(), Duration::from_millis(250));
    assert_eq!(*timing.blink_hold(), Duration::from_millis(200));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "entry_timeout_ms = \"soon\"").expect("Write failed");

    let err = Settings::load(&path).unwrap_err();
    assert!(err.message.starts_with("Failed to parse settings"));
}

#[test]
fn test_directory_is_unreadable() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = Settings::from_file(dir.path()).unwrap_err();
    assert!(err.message.starts_with("Failed to read settings file"));
}
