use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gallery_core::RunReport;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("another run holds the lock at {0:?}")]
    Locked(PathBuf),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(
        &self,
        filename: &str,
        content: impl AsRef<[u8]>,
    ) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_ref())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Scratch directory owned by one run. Removed on drop unless already
/// removed through [`ScratchDir::remove`].
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    pub fn create(path: &Path) -> Result<Self, PersistError> {
        ensure_output_dir(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remove(mut self) -> Result<(), PersistError> {
        self.removed = true;
        match fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.removed {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Exclusive marker that at most one run is active.
///
/// The lock file holds the owner's PID and is published atomically, so it is
/// never observed empty. A file whose owner is no longer alive is taken over.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(path: &Path) -> Result<Self, PersistError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        // Second pass only after clearing a stale lock.
        for _ in 0..2 {
            let mut marker = NamedTempFile::new_in(dir)?;
            writeln!(marker, "{}", std::process::id())?;
            marker.flush()?;
            match marker.persist_noclobber(path) {
                Ok(_) => {
                    return Ok(Self {
                        path: path.to_path_buf(),
                    })
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    if !holder_is_gone(path) {
                        return Err(PersistError::Locked(path.to_path_buf()));
                    }
                    match fs::remove_file(path) {
                        Ok(()) => {}
                        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                        Err(err) => return Err(err.into()),
                    }
                }
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::Locked(path.to_path_buf()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID recorded in the lock file at `path`, if any.
    pub fn holder(path: &Path) -> Option<u32> {
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn holder_is_gone(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => match content.trim().parse::<u32>() {
            Ok(pid) if pid != 0 => !process_alive(pid),
            _ => true,
        },
        Err(err) => err.kind() == io::ErrorKind::NotFound,
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    // SAFETY: signal 0 performs only the existence and permission check.
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

pub fn report_filename(report: &RunReport) -> String {
    format!("daily-report-{}.json", report.date_key())
}

/// Writes `daily-report-<date>.json` into `dir`, replacing a report from an
/// earlier run on the same day.
pub fn write_report(dir: &Path, report: &RunReport) -> Result<PathBuf, PersistError> {
    let content = serde_json::to_string_pretty(report)?;
    AtomicFileWriter::new(dir.to_path_buf()).write(&report_filename(report), content)
}
