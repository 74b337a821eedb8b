// src/utils/log.rs

//! Logging setup: `env_logger` writing to stderr and to a size-rotated file.
//!
//! Record format: `dd.mm.YYYY HH:MM:SS - [LEVEL] - message`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::models::LoggingConfig;

const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Append-only log file that rotates once it exceeds `max_bytes`.
///
/// Rotation shifts `name.N-1` to `name.N` (dropping the oldest), moves the
/// active file to `name.1` and reopens a fresh one.
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    backup_count: usize,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            written,
            max_bytes,
            backup_count,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backup_count == 0 {
            self.file = File::create(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        for index in (1..self.backup_count).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Duplicates every record to stderr and the log file.
struct Tee {
    file: RotatingFile,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Console output is best effort; the file is the record of truth.
        let _ = io::stderr().write_all(buf);
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}

/// Flushes the logger when the run ends.
#[must_use = "dropping the guard flushes the log immediately"]
pub struct LogGuard(());

impl Drop for LogGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

fn parse_level(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

/// Initialize the process-wide logger.
///
/// `RUST_LOG` still overrides the configured level.
pub fn init(config: &LoggingConfig, logs_dir: &Path, verbose: bool) -> Result<LogGuard> {
    let path = logs_dir.join(&config.file_name);
    let file = RotatingFile::open(&path, config.max_bytes, config.backup_count)?;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        parse_level(&config.level)
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(env_logger::Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - [{}] - {}",
                Local::now().format(DATETIME_FORMAT),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(Tee { file })))
        .try_init()
        .map_err(|e| crate::error::AppError::config(format!("logger already set: {e}")))?;

    Ok(LogGuard(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), log::LevelFilter::Warn);
        assert_eq!(parse_level("unknown"), log::LevelFilter::Info);
    }

    #[test]
    fn test_rotating_file_rotates_and_caps_backups() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("parser.log");
        let mut file = RotatingFile::open(&path, 10, 2).unwrap();

        for line in ["aaaaaaaa\n", "bbbbbbbb\n", "cccccccc\n", "dddddddd\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "dddddddd\n");
        assert_eq!(
            fs::read_to_string(tmp.path().join("logs/parser.log.1")).unwrap(),
            "cccccccc\n"
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join("logs/parser.log.2")).unwrap(),
            "bbbbbbbb\n"
        );
        assert!(!tmp.path().join("logs/parser.log.3").exists());
    }

    #[test]
    fn test_rotating_file_appends_to_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("parser.log");
        fs::write(&path, "old\n").unwrap();

        let mut file = RotatingFile::open(&path, 1_000, 1).unwrap();
        file.write_all(b"new\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }
}
