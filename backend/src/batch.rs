//! Batch serial generation
//!
//! A batch draws serials from the configured cycle and formats each as the
//! text a printed code carries: the prefix followed by the zero-padded serial.
//!
//! Codes are produced lazily. [`generate_batch`] walks the batch once to find
//! its resume point without holding any codes, and [`Batch::codes`] replays
//! the same draws on demand, so a batch covering the whole range costs time
//! but no memory.
//!
//! # Issuing
//!
//! [`issue_to_file`] and [`issue_to_writer`] save the advanced configuration
//! before emitting a single code. Once a serial can reach the output it is
//! already reserved on disk. If emitting fails afterwards, the reserved
//! serials are skipped by the next run, never handed out a second time.
//!
//! # Critical Invariants
//!
//! - **No repeats within a batch**: `count` never exceeds the range size
//! - **Resume point**: the next config's seed is the batch's last serial
//! - **Reserve before emit**: the config is advanced before any code is written
//! - **Own files only**: a failed write removes the output file only when this
//!   call created it

use crate::config::{ConfigError, ConfigLocation, SerialConfig};
use crate::sampler::RangeSampler;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from generating, issuing or writing a batch
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Batch size {count} outside 1..={available}")]
    InvalidCount { count: u64, available: u64 },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to write batch to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write batch: {0}")]
    Stream(#[source] io::Error),
}

/// One generated serial and its printable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialCode {
    pub serial: u64,
    pub text: String,
}

/// A batch of serials continuing from a config's seed
///
/// Holds the sampler positioned at the batch start and the configuration to
/// persist once the batch is issued. Codes are drawn by [`Batch::codes`].
#[derive(Debug, Clone)]
pub struct Batch {
    start: RangeSampler,
    prefix: Option<String>,
    width: usize,
    count: u64,
    next_config: SerialConfig,
}

impl Batch {
    /// Number of codes in the batch
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Configuration resuming after the batch's last serial
    pub fn next_config(&self) -> &SerialConfig {
        &self.next_config
    }

    /// Iterate the batch's codes in draw order
    ///
    /// Each call starts again from the first code.
    pub fn codes(&self) -> Codes<'_> {
        Codes {
            sampler: self.start.clone(),
            prefix: self.prefix.as_deref(),
            width: self.width,
            remaining: self.count,
        }
    }

    /// Write one code per line
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for code in self.codes() {
            writeln!(writer, "{}", code.text)?;
        }
        writer.flush()
    }
}

/// Lazy iterator over a batch's codes
#[derive(Debug, Clone)]
pub struct Codes<'a> {
    sampler: RangeSampler,
    prefix: Option<&'a str>,
    width: usize,
    remaining: u64,
}

impl Iterator for Codes<'_> {
    type Item = SerialCode;

    fn next(&mut self) -> Option<SerialCode> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let serial = self.sampler.next_value();
        Some(SerialCode {
            serial,
            text: format_code(self.prefix, serial, self.width),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Format a serial as code text
///
/// # Example
/// ```
/// use randsn_core::batch::format_code;
///
/// assert_eq!(format_code(Some("https://example.com/c/"), 42, 6), "https://example.com/c/000042");
/// assert_eq!(format_code(None, 42, 2), "42");
/// ```
pub fn format_code(prefix: Option<&str>, serial: u64, width: usize) -> String {
    format!("{}{:0width$}", prefix.unwrap_or(""), serial, width = width)
}

/// Plan `count` serials continuing from `config`'s seed
///
/// The caller's configuration is left untouched. The advanced one is
/// available from [`Batch::next_config`].
///
/// # Errors
/// [`BatchError::InvalidCount`] when `count` is 0 or larger than the range,
/// since a batch that long would repeat serials.
pub fn generate_batch(config: &SerialConfig, count: u64) -> Result<Batch, BatchError> {
    let available = config.biggest() - config.smallest() + 1;
    if count == 0 || count > available {
        return Err(BatchError::InvalidCount { count, available });
    }

    let start = config.sampler()?;
    let mut walker = start.clone();
    let mut last = config.seed();
    for _ in 0..count {
        last = walker.next_value();
    }

    let mut next_config = config.clone();
    next_config.record(last)?;

    tracing::info!(count, next_seed = last, "planned serial batch");
    Ok(Batch {
        start,
        prefix: config.prefix().map(str::to_string),
        width: config.serial_width(),
        count,
        next_config,
    })
}

/// Write a batch to a new file at `path`
///
/// An existing file is never overwritten, since it may hold codes already
/// issued. If writing fails part way the new file is removed.
pub fn write_batch(batch: &Batch, path: &Path) -> Result<(), BatchError> {
    let file = create_output(path)?;
    write_created(path, file, |file| batch.write_to(BufWriter::new(file)))
}

/// Reserve a batch in `location` and write its codes to a new file
///
/// The output file is claimed first, so an unusable path costs no serials.
/// If the config cannot be saved the still-empty file is removed and nothing
/// is issued.
pub fn issue_to_file(
    config: &SerialConfig,
    count: u64,
    location: &ConfigLocation,
    path: &Path,
) -> Result<Batch, BatchError> {
    let batch = generate_batch(config, count)?;
    let file = create_output(path)?;

    if let Err(err) = batch.next_config.save(location) {
        discard_output(path);
        return Err(err.into());
    }
    write_created(path, file, |file| batch.write_to(BufWriter::new(file)))
        .map_err(|err| skipped(&batch, err))?;

    tracing::info!(path = %path.display(), count, "issued serial batch");
    Ok(batch)
}

/// Reserve a batch in `location` and stream its codes to `writer`
pub fn issue_to_writer<W: Write>(
    config: &SerialConfig,
    count: u64,
    location: &ConfigLocation,
    writer: W,
) -> Result<Batch, BatchError> {
    let batch = generate_batch(config, count)?;
    batch.next_config.save(location)?;
    batch
        .write_to(writer)
        .map_err(|source| skipped(&batch, BatchError::Stream(source)))?;

    tracing::info!(count, "issued serial batch");
    Ok(batch)
}

fn skipped(batch: &Batch, err: BatchError) -> BatchError {
    tracing::warn!(
        count = batch.count,
        next_seed = batch.next_config.seed(),
        "batch reserved but not fully written; its serials will be skipped"
    );
    err
}

fn create_output(path: &Path) -> Result<File, BatchError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| BatchError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Run `write` on a file this module just created, removing it on failure
fn write_created<F>(path: &Path, file: File, write: F) -> Result<(), BatchError>
where
    F: FnOnce(File) -> io::Result<()>,
{
    write(file).map_err(|source| {
        discard_output(path);
        BatchError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn discard_output(path: &Path) {
    tracing::warn!(path = %path.display(), "discarding partial batch");
    if let Err(err) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), "could not remove partial batch: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Accepts `budget` bytes, then fails like a full disk
    struct ShortWriter<W> {
        inner: W,
        budget: usize,
    }

    impl<W: Write> Write for ShortWriter<W> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            self.inner.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let config = SerialConfig::new(1, 1, 10, None).unwrap();
        let err = generate_batch(&config, 0).unwrap_err();
        assert!(matches!(
            err,
            BatchError::InvalidCount {
                count: 0,
                available: 10
            }
        ));
    }

    #[test]
    fn test_count_beyond_range_rejected() {
        let config = SerialConfig::new(5, 5, 9, None).unwrap();
        assert!(generate_batch(&config, 6).is_err());
        assert_eq!(generate_batch(&config, 5).unwrap().len(), 5);
    }

    #[test]
    fn test_caller_config_untouched() {
        let config = SerialConfig::new(1, 3, 100, None).unwrap();
        let batch = generate_batch(&config, 10).unwrap();
        assert_eq!(config.seed(), 3);
        let last = batch.codes().last().unwrap();
        assert_eq!(batch.next_config().seed(), last.serial);
    }

    #[test]
    fn test_codes_replay_identically() {
        let config = SerialConfig::new(1, 9, 50, None).unwrap();
        let batch = generate_batch(&config, 12).unwrap();
        let first: Vec<SerialCode> = batch.codes().collect();
        let second: Vec<SerialCode> = batch.codes().collect();
        assert_eq!(first.len(), 12);
        assert_eq!(first, second);
        assert_eq!(batch.codes().size_hint(), (12, Some(12)));
    }

    #[test]
    fn test_write_to_one_code_per_line() {
        let config = SerialConfig::new(1, 1, 7, Some("SN-".to_string())).unwrap();
        let batch = generate_batch(&config, 3).unwrap();
        let mut out = Vec::new();
        batch.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "SN-4\nSN-2\nSN-5\n");
    }

    #[test]
    fn test_write_failure_after_create_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.txt");
        let config = SerialConfig::new(1, 1, 7, Some("SN-".to_string())).unwrap();
        let batch = generate_batch(&config, 7).unwrap();

        let file = create_output(&path).unwrap();
        assert!(path.exists());
        let err = write_created(&path, file, |file| {
            batch.write_to(ShortWriter {
                inner: file,
                budget: 6,
            })
        })
        .unwrap_err();

        assert!(matches!(err, BatchError::Write { path: ref p, .. } if *p == path));
        assert!(!path.exists(), "partial batch left behind");
    }

    #[test]
    fn test_existing_output_never_touched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.txt");
        fs::write(&path, "earlier batch\n").unwrap();
        let config = SerialConfig::new(1, 1, 7, None).unwrap();
        let batch = generate_batch(&config, 3).unwrap();

        let err = write_batch(&batch, &path).unwrap_err();
        assert!(matches!(
            err,
            BatchError::Write { ref source, .. } if source.kind() == io::ErrorKind::AlreadyExists
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier batch\n");
    }
}
