//! Exclusive lock over a build root.
//!
//! Held for the duration of one build or load so that two processes never
//! write the same cached artifacts at the same time. The lock file records who
//! holds it, which is reported to the process that loses the race.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::LOCK_FILENAME;

#[derive(Debug, Serialize, Deserialize)]
pub struct LockMetadata {
  pub version: u32,
  pub pid: u32,
  pub started_at_unix: u64,
  pub command: String,
  pub build_root: PathBuf,
}

#[derive(Debug, Error)]
pub enum BuildLockError {
  #[error(
    "build root is locked by another process: {command} (PID {pid}, started at unix time {started_at_unix})\n\
     If no sysdef process is running, remove the lock file:\n  {}",
    lock_path.display()
  )]
  Contention {
    command: String,
    pid: u32,
    started_at_unix: u64,
    lock_path: PathBuf,
  },

  #[error(
    "build root is locked (could not read lock metadata)\n\
     If no sysdef process is running, remove the lock file:\n  {}",
    lock_path.display()
  )]
  ContentionUnknown { lock_path: PathBuf },

  #[error("failed to create build root: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to open lock file: {0}")]
  OpenFile(#[source] io::Error),

  #[error("failed to write lock metadata: {0}")]
  WriteMetadata(#[source] io::Error),

  #[error("failed to acquire lock: {0}")]
  LockFailed(#[source] io::Error),
}

/// Released when dropped.
#[derive(Debug)]
pub struct BuildLock {
  file: File,
  lock_path: PathBuf,
}

impl BuildLock {
  /// Takes the lock on `build_root`, creating the directory if needed.
  ///
  /// Fails immediately when another holder exists.
  pub fn acquire(build_root: &Path, command: &str) -> Result<Self, BuildLockError> {
    let lock_path = build_root.join(LOCK_FILENAME);

    fs::create_dir_all(build_root).map_err(BuildLockError::CreateDir)?;

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(BuildLockError::OpenFile)?;

    if let Err(err) = try_lock_exclusive(&file) {
      if err.kind() == io::ErrorKind::WouldBlock {
        return Err(read_contention_error(&lock_path));
      }
      return Err(BuildLockError::LockFailed(err));
    }

    write_metadata(&file, command, build_root)?;
    debug!(lock = %lock_path.display(), command, "acquired build lock");

    Ok(Self { file, lock_path })
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  /// Reads the metadata back through the held handle.
  pub fn read_metadata(&self) -> io::Result<LockMetadata> {
    let mut file = &self.file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }
}

fn write_metadata(file: &File, command: &str, build_root: &Path) -> Result<(), BuildLockError> {
  let metadata = LockMetadata {
    version: 1,
    pid: std::process::id(),
    started_at_unix: SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .unwrap_or_default()
      .as_secs(),
    command: command.to_string(),
    build_root: build_root.to_path_buf(),
  };

  file.set_len(0).map_err(BuildLockError::WriteMetadata)?;
  let mut writer = io::BufWriter::new(file);
  writer.seek(SeekFrom::Start(0)).map_err(BuildLockError::WriteMetadata)?;
  serde_json::to_writer_pretty(&mut writer, &metadata).map_err(|e| BuildLockError::WriteMetadata(io::Error::other(e)))?;
  writer.flush().map_err(BuildLockError::WriteMetadata)
}

fn read_contention_error(lock_path: &Path) -> BuildLockError {
  if let Ok(contents) = fs::read_to_string(lock_path)
    && let Ok(metadata) = serde_json::from_str::<LockMetadata>(&contents)
  {
    return BuildLockError::Contention {
      command: metadata.command,
      pid: metadata.pid,
      started_at_unix: metadata.started_at_unix,
      lock_path: lock_path.to_path_buf(),
    };
  }

  BuildLockError::ContentionUnknown {
    lock_path: lock_path.to_path_buf(),
  }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
    .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;

  // SAFETY: a zeroed OVERLAPPED is valid, and the handle is owned by `file`.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(
      handle,
      LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK,
      0,
      1,
      0,
      &mut overlapped,
    )
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
