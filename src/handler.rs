use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{LogError, Result};

/// Append-only log file that rolls over once it would reach `max_bytes`.
///
/// Backups are named `<file>.1` (newest) up to `<file>.<backup_count>`
/// (oldest). With `max_bytes == 0` or `backup_count == 0` the file grows
/// without rolling.
#[derive(Debug)]
pub struct RotatingFileHandler {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    file: File,
    size: u64,
}

impl RotatingFileHandler {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path).map_err(|err| LogError::io(&path, err))?;
        let size = file
            .metadata()
            .map_err(|err| LogError::io(&path, err))?
            .len();
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            state: Mutex::new(FileState { file, size }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `line` followed by a newline, rolling the file first if needed.
    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.should_roll_over(&state, record.len() as u64) {
            self.roll_over(&mut state)
                .map_err(|err| LogError::io(&self.path, err))?;
        }
        write_record(&mut state.file, record.as_bytes())
            .map_err(|err| LogError::io(&self.path, err))?;
        state.size += record.len() as u64;
        Ok(())
    }

    fn should_roll_over(&self, state: &FileState, incoming: u64) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && state.size > 0
            && state.size + incoming >= self.max_bytes
    }

    fn roll_over(&self, state: &mut FileState) -> io::Result<()> {
        state.file.flush()?;

        let oldest = self.backup_path(self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backup_count).rev() {
            let source = self.backup_path(index);
            if source.exists() {
                fs::rename(&source, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        state.file = open_append(&self.path)?;
        state.size = 0;
        Ok(())
    }

    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn write_record(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    file.flush()
}
