//! Rolling File Logger
//!
//! Installs a global `tracing` subscriber that writes to `<dir>/<app>.log`.
//! Once the active file grows past its size limit it is shifted to
//! `<app>.log.1`, older files move up by one, and the oldest falls off.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;

/// Size at which the active file is rotated
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
/// Number of rotated files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static ACTIVE: OnceLock<RollingFile> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),

    #[error("a global logger is already installed")]
    AlreadyInstalled,

    #[error("logger has not been initialized")]
    NotInitialized,
}

struct Inner {
    dir: PathBuf,
    base_name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl Inner {
    fn active_path(&self) -> PathBuf {
        self.dir.join(&self.base_name)
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        for index in (1..self.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                let to = self.rotated_path(index + 1);
                if to.exists() {
                    fs::remove_file(&to)?;
                }
                fs::rename(&from, &to)?;
            }
        }

        let first = self.rotated_path(1);
        if first.exists() {
            fs::remove_file(&first)?;
        }
        fs::rename(self.active_path(), &first)?;

        self.file = open_append(&self.active_path())?;
        self.written = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Size-bounded log file shared between all writer handles
#[derive(Clone)]
pub struct RollingFile {
    inner: Arc<Mutex<Inner>>,
}

impl RollingFile {
    /// Open (or continue) `<dir>/<app_name>.log`
    pub fn open(
        dir: impl AsRef<Path>,
        app_name: &str,
        max_bytes: u64,
        max_files: usize,
    ) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let base_name = format!("{}.log", app_name);
        let path = dir.join(&base_name);
        let file = open_append(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir,
                base_name,
                max_bytes: max_bytes.max(1),
                max_files: max_files.max(1),
                file,
                written,
            })),
        })
    }

    /// Path of the file currently being written
    pub fn active_path(&self) -> io::Result<PathBuf> {
        let inner = self.lock()?;
        Ok(inner.active_path())
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock()?;
        if inner.written > 0 && inner.written + buf.len() as u64 > inner.max_bytes {
            inner.rotate()?;
        }
        inner.file.write_all(buf)?;
        inner.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)
}

/// Same as [`init_logger`] with explicit rotation limits
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    max_bytes: u64,
    max_files: usize,
) -> Result<(), LoggerError> {
    if ACTIVE.get().is_some() {
        return Err(LoggerError::AlreadyInstalled);
    }

    let mut file = RollingFile::open(log_dir, app_name, max_bytes, max_files)?;
    writeln!(
        file,
        "=== {} started at {} ===",
        app_name,
        chrono::Local::now().format(TIMESTAMP_FORMAT)
    )?;

    tracing_subscriber::fmt()
        .with_writer(file.clone())
        .with_ansi(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInstalled)?;

    ACTIVE.set(file).map_err(|_| LoggerError::AlreadyInstalled)
}

/// Log an info line through the installed logger
pub fn info(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!(target: "rolling_logger", "{}", message);
    Ok(())
}

/// Log an error line through the installed logger
pub fn error(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!(target: "rolling_logger", "{}", message);
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    ACTIVE.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}
