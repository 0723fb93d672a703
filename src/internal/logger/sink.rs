// src/internal/logger/sink.rs

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing_subscriber::fmt::MakeWriter;

use super::error::LoggingError;

const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// `<base>_<YYYYMMDD>.log`
pub fn log_file_name(base: &str, date: NaiveDate) -> String {
    format!("{}_{}.log", base, date.format(FILE_DATE_FORMAT))
}

/// Keep only the plain components of `base` so the file always lands under
/// the log directory: "/srv/x" becomes "srv/x", "../x" becomes "x".
fn relative_base(base: &str) -> String {
    let kept: PathBuf = Path::new(base)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    kept.to_string_lossy().into_owned()
}

/// Ensure the log directory exists, then open the day's file for appending.
pub fn open_log_file(dir: &Path, base: &str, date: NaiveDate) -> Result<LogFile, LoggingError> {
    let path = dir.join(log_file_name(&relative_base(base), date));

    // base may carry its own sub directories ("api/access")
    let parent = path.parent().unwrap_or(dir);
    if !parent.is_dir() {
        create_dir(parent).map_err(|source| LoggingError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = open_append(&path).map_err(|source| LoggingError::OpenFile {
        path: path.clone(),
        source,
    })?;

    Ok(LogFile::new(file, path))
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}

/// Shared append-only log file.
///
/// The formatter hands over one complete record per `write`, and the mutex is
/// held for the whole record, so records from different threads never mix.
#[derive(Clone, Debug)]
pub struct LogFile {
    file: Arc<Mutex<File>>,
    path: Arc<PathBuf>,
}

impl LogFile {
    fn new(file: File, path: PathBuf) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
            path: Arc::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Push everything written so far down to the disk
    pub fn sync(&self) -> io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_data()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
