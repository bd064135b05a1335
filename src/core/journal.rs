// webpify/src/core/journal.rs
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_JOURNAL_NAME: &str = "awc_debug.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Human-readable, append-only record of what happened to each upload.
pub trait Journal {
    fn record(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }
}

pub fn format_line(timestamp: &str, message: &str) -> String {
    format!("[{}] {}\n", timestamp, message)
}

fn mirror(level: Level, message: &str) {
    match level {
        Level::Info => log::info!("{}", message),
        Level::Warn => log::warn!("{}", message),
    }
}

/// Appends `[timestamp] message` lines to a file. Write failures are ignored.
pub struct FileJournal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_JOURNAL_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl Journal for FileJournal {
    fn record(&self, level: Level, message: &str) {
        mirror(level, message);

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        if let Err(e) = self.append(&format_line(&timestamp, message)) {
            log::debug!("Could not append to {}: {}", self.path.display(), e);
        }
    }
}

/// Journal that only forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullJournal;

impl Journal for NullJournal {
    fn record(&self, level: Level, message: &str) {
        mirror(level, message);
    }
}
