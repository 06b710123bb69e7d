// ABOUTME: Deploy lock to prevent concurrent runs for the same service.
// ABOUTME: Uses atomic file creation with lock info stored in ~/.local/state/caravel/.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ServiceName;

/// Base directory for caravel state files (XDG Base Directory compliant).
const STATE_DIR: &str = ".local/state/caravel";

/// Environment variable overriding the state directory.
const STATE_DIR_VAR: &str = "CARAVEL_STATE_DIR";

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("deployment already in progress: held by {holder} (pid {pid}) since {started_at}")]
    Held {
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },
    #[error("lock acquired by another process during break")]
    Contended,
    #[error("lock error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize lock info: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Information about who holds a deploy lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Service being deployed.
    pub service: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(service: &ServiceName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            service: service.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }
}

/// Default lock state directory.
///
/// Honors `CARAVEL_STATE_DIR`, then falls back to `$HOME/.local/state/caravel`.
pub fn default_state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(STATE_DIR_VAR) {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(STATE_DIR)
}

/// A held deploy lock. Released explicitly via `release()`.
#[derive(Debug)]
pub struct DeployLock {
    path: PathBuf,
}

impl DeployLock {
    /// Acquire a deploy lock for the given service in the default state dir.
    ///
    /// Uses `create_new` for atomic lock acquisition (no TOCTOU race).
    /// Returns error if the lock is already held by another process.
    /// Auto-breaks stale locks (>1 hour) with a warning; `force` breaks any.
    pub fn acquire(service: &ServiceName, force: bool) -> Result<Self, LockError> {
        Self::acquire_at(&default_state_dir(), service, force)
    }

    /// Acquire a deploy lock in a specific state directory.
    pub fn acquire_at(
        state_dir: &Path,
        service: &ServiceName,
        force: bool,
    ) -> Result<Self, LockError> {
        fs::create_dir_all(state_dir)?;
        let path = state_dir.join(format!("{}.lock", service));

        let lock_json = serde_json::to_string(&LockInfo::new(service))?;

        if Self::try_create(&path, &lock_json)? {
            return Ok(Self { path });
        }

        // Lock file exists - decide whether to break it.
        if !Self::should_break(&path, force)? {
            return match Self::read_info(&path) {
                Some(existing) => Err(LockError::Held {
                    holder: existing.holder,
                    pid: existing.pid,
                    started_at: existing.started_at,
                }),
                None => Err(LockError::Contended),
            };
        }

        tracing::debug!(path = %path.display(), "removing stale/forced lock");
        let _ = fs::remove_file(&path);

        if Self::try_create(&path, &lock_json)? {
            Ok(Self { path })
        } else {
            Err(LockError::Contended)
        }
    }

    /// Atomically create the lock file. Returns false if it already exists.
    fn try_create(path: &Path, contents: &str) -> Result<bool, LockError> {
        match fs::File::create_new(path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_info(path: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Check if an existing lock should be broken (stale, forced, or corrupted).
    fn should_break(path: &Path, force: bool) -> Result<bool, LockError> {
        match Self::read_info(path) {
            Some(existing) => {
                if force {
                    tracing::warn!(
                        "breaking lock held by {} (pid {}) since {}",
                        existing.holder,
                        existing.pid,
                        existing.started_at
                    );
                    Ok(true)
                } else if existing.is_stale() {
                    tracing::warn!(
                        "auto-breaking stale lock held by {} (pid {}) since {}",
                        existing.holder,
                        existing.pid,
                        existing.started_at
                    );
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            None => {
                // Unreadable or corrupted lock info.
                tracing::warn!("lock info unreadable, breaking lock");
                Ok(true)
            }
        }
    }

    /// Release the lock.
    pub fn release(self) -> Result<(), LockError> {
        fs::remove_file(&self.path)?;
        Ok(())
    }
}
