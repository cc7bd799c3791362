//! Size-rotated append-only writer for the trace file.
//!
//! The active file is `<name>`; on rotation it becomes `<name>.1`, an
//! existing `<name>.1` becomes `<name>.2`, and so on. The oldest backup
//! beyond the retention limit is deleted, so disk usage stays bounded at
//! roughly `(backups + 1) * max_bytes`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Rotation threshold of the trace file (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Backups kept after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating line writer.
///
/// The file is opened lazily on the first write, so construction never
/// fails. The exporter may be called from any thread the SDK picks; the
/// handle sits behind a `Mutex`.
pub struct FileWriter {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    /// Writer with the default limits.
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub const fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline, rotating first if the file has grown
    /// past the limit.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, renamed or written, or if the
    /// lock was poisoned by a panicking writer.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("trace writer lock poisoned: {e}")))?;

        if self.needs_rotation() {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        if let Some(handle) = file.as_mut() {
            writeln!(handle, "{line}")?;
            handle.flush()?;
        }
        Ok(())
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|meta| meta.len() > self.max_bytes)
    }

    /// Shifts every backup up by one and moves the active file to `.1`.
    fn rotate(&self) -> io::Result<()> {
        if self.max_backups == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        name.push(format!(".{n}"));
        self.path.with_file_name(name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}
