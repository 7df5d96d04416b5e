//! Tests for batch generation and issuing
//!
//! Critical invariants tested:
//! - Consecutive batches never repeat a serial within one cycle
//! - The next config resumes after the batch's last serial
//! - Issuing saves the advanced config before any code is emitted
//! - Failed writes leave no partial file behind and never touch existing files

use randsn_core::batch::format_code;
use randsn_core::config::ConfigLocation;
use randsn_core::{
    generate_batch, issue_to_file, issue_to_writer, write_batch, BatchError, ConfigError,
    SerialConfig,
};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// Output that rejects every write, like a closed pipe
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn saved_config(dir: &TempDir, config: &SerialConfig) -> ConfigLocation {
    let location = ConfigLocation::new(Some(dir.path()), None).unwrap();
    config.save(&location).unwrap();
    location
}

fn serials_in(path: &std::path::Path) -> Vec<u64> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.parse().unwrap())
        .collect()
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_consecutive_batches_cover_range_once() {
    let mut config = SerialConfig::new(100, 150, 199, None).unwrap();
    let mut seen = HashSet::new();

    for _ in 0..4 {
        let batch = generate_batch(&config, 25).unwrap();
        for code in batch.codes() {
            assert!(seen.insert(code.serial), "serial {} repeated", code.serial);
        }
        config = batch.next_config().clone();
    }

    assert_eq!(seen.len(), 100);
    assert_eq!(seen, (100..=199).collect::<HashSet<u64>>());
}

#[test]
fn test_codes_are_prefixed_and_padded() {
    let config = SerialConfig::new(1, 1, 99_999, Some("https://example.com/c/".to_string())).unwrap();
    let batch = generate_batch(&config, 20).unwrap();

    for code in batch.codes() {
        assert_eq!(code.text, format!("https://example.com/c/{:05}", code.serial));
    }
}

#[test]
fn test_format_code_wider_than_width() {
    assert_eq!(format_code(Some("X"), 12345, 3), "X12345");
}

#[test]
fn test_full_range_batch_then_wraps() {
    let config = SerialConfig::new(10, 12, 20, None).unwrap();
    let first = generate_batch(&config, 11).unwrap();
    let second = generate_batch(first.next_config(), 11).unwrap();

    let a: Vec<u64> = first.codes().map(|c| c.serial).collect();
    let b: Vec<u64> = second.codes().map(|c| c.serial).collect();
    assert_eq!(a, b, "a full-range batch should land back on the same cycle position");
}

#[test]
fn test_full_range_batch_plans_lazily() {
    let config = SerialConfig::new(1, 1, (1 << 20) - 1, None).unwrap();
    let batch = generate_batch(&config, (1 << 20) - 1).unwrap();

    assert_eq!(batch.len(), (1 << 20) - 1);
    assert_eq!(batch.next_config().seed(), 1, "a full cycle ends on its seed");
    assert_eq!(batch.codes().take(3).count(), 3);
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn test_write_batch_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codes.txt");
    let config = SerialConfig::new(1, 1, 7, None).unwrap();
    let batch = generate_batch(&config, 7).unwrap();

    write_batch(&batch, &path).unwrap();

    assert_eq!(serials_in(&path), vec![4, 2, 5, 6, 7, 3, 1]);
}

#[test]
fn test_write_failure_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("codes.txt");
    let config = SerialConfig::new(1, 1, 7, None).unwrap();
    let batch = generate_batch(&config, 3).unwrap();

    let err = write_batch(&batch, &path).unwrap_err();
    assert!(matches!(err, BatchError::Write { path: ref p, .. } if *p == path));
    assert!(!path.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_failed_write_to_device_keeps_device() {
    let path = std::path::Path::new("/dev/full");
    if !path.exists() {
        return;
    }
    let config = SerialConfig::new(1, 1, 7, None).unwrap();
    let batch = generate_batch(&config, 3).unwrap();

    assert!(write_batch(&batch, path).is_err());
    assert!(path.exists(), "write_batch removed a file it did not create");
}

// ============================================================================
// Issuing
// ============================================================================

#[test]
fn test_issue_to_file_advances_saved_seed() {
    let dir = TempDir::new().unwrap();
    let config = SerialConfig::new(1, 1, 50, None).unwrap();
    let location = saved_config(&dir, &config);
    let out = dir.path().join("a.txt");

    let batch = issue_to_file(&config, 5, &location, &out).unwrap();

    let serials = serials_in(&out);
    assert_eq!(serials.len(), 5);
    let saved = SerialConfig::load(&location).unwrap();
    assert_eq!(saved.seed(), serials[4]);
    assert_eq!(&saved, batch.next_config());
}

#[test]
fn test_issue_without_saved_config_emits_nothing() {
    let dir = TempDir::new().unwrap();
    let config = SerialConfig::new(1, 1, 50, None).unwrap();
    let location = ConfigLocation::new(Some(dir.path()), Some("locked")).unwrap();
    // A directory squatting on the config path makes every save fail
    fs::create_dir(location.path()).unwrap();
    let out = dir.path().join("b.txt");

    let err = issue_to_file(&config, 5, &location, &out).unwrap_err();

    assert!(matches!(err, BatchError::Config(ConfigError::Io { .. })));
    assert!(!out.exists(), "codes were emitted without reserving them");
}

#[test]
fn test_issue_refuses_existing_output_without_advancing() {
    let dir = TempDir::new().unwrap();
    let config = SerialConfig::new(1, 1, 50, None).unwrap();
    let location = saved_config(&dir, &config);
    let out = dir.path().join("a.txt");
    fs::write(&out, "31\n").unwrap();

    assert!(issue_to_file(&config, 5, &location, &out).is_err());

    assert_eq!(fs::read_to_string(&out).unwrap(), "31\n");
    assert_eq!(SerialConfig::load(&location).unwrap(), config);
}

#[test]
fn test_failed_output_skips_rather_than_reissues() {
    let dir = TempDir::new().unwrap();
    let config = SerialConfig::new(1, 1, 50, None).unwrap();
    let location = saved_config(&dir, &config);
    let lost: HashSet<u64> = generate_batch(&config, 5)
        .unwrap()
        .codes()
        .map(|c| c.serial)
        .collect();

    let err = issue_to_writer(&config, 5, &location, ClosedPipe).unwrap_err();
    assert!(matches!(err, BatchError::Stream(_)));

    let reloaded = SerialConfig::load(&location).unwrap();
    assert_ne!(reloaded.seed(), config.seed());
    let out = dir.path().join("retry.txt");
    issue_to_file(&reloaded, 5, &location, &out).unwrap();
    for serial in serials_in(&out) {
        assert!(!lost.contains(&serial), "serial {} issued twice", serial);
    }
}

#[test]
fn test_issue_to_writer_matches_planned_codes() {
    let dir = TempDir::new().unwrap();
    let config = SerialConfig::new(1, 500, 999, Some("SN-".to_string())).unwrap();
    let location = saved_config(&dir, &config);
    let mut out = Vec::new();

    let batch = issue_to_writer(&config, 10, &location, &mut out).unwrap();

    let expected: String = batch.codes().map(|c| format!("{}\n", c.text)).collect();
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}
