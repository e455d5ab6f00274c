use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock serializing writes to a store file.
///
/// Uses flock (Unix) on a `<store>.lock` sibling so the TUI and any number
/// of CLI invocations never interleave a read-modify-write of the same file.
/// The lock is released when the value is dropped. The lock file itself is
/// left in place: unlinking it would let a waiter lock a stale inode.
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another tl process may be writing")]
    Timeout { path: PathBuf },
}

/// Path of the lock file guarding `store_path`
pub fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".lock");
    store_path.with_file_name(name)
}

impl StoreLock {
    /// Acquire the lock for `store_path`, waiting up to `timeout`.
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path(store_path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => return Ok(StoreLock { _file: file }),
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => return Err(LockError::Timeout { path }),
            }
        }
    }

    /// Acquire with the default 5 second timeout
    pub fn acquire_default(store_path: &Path) -> Result<Self, LockError> {
        Self::acquire(store_path, Duration::from_secs(5))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
