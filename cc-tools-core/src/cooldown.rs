//! Filesystem-backed per-directory lock + recent-run timestamp that lets two
//! independent process invocations coordinate without shared memory.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::CcToolsError;

/// The result of attempting to acquire the cooldown lock for a directory.
pub enum AcquireOutcome {
    /// The caller holds the lock and must call [`CooldownGuard::release`]
    /// (or simply drop it) when done.
    Acquired(CooldownGuard),
    /// Another invocation currently holds the lock for this directory.
    InProgress,
    /// The last completed run for this directory is younger than the
    /// configured cooldown window.
    CooledDown,
}

/// Coordinates validation runs for project directories via lock files under
/// a shared cache directory.
pub struct CooldownLock {
    base_dir: PathBuf,
}

impl CooldownLock {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn paths_for(&self, project_root: &Path) -> (PathBuf, PathBuf) {
        let digest = Sha256::digest(project_root.to_string_lossy().as_bytes());
        let key = digest.iter().take(16).map(|b| format!("{b:02x}")).collect::<String>();
        (
            self.base_dir.join(format!("{key}.lock")),
            self.base_dir.join(format!("{key}.timestamp")),
        )
    }

    /// Attempt to acquire the lock for `project_root`. `max_hold` bounds how
    /// long a held lock is trusted before it's treated as abandoned by a
    /// killed process and reclaimed.
    pub fn acquire(
        &self,
        project_root: &Path,
        cooldown: Duration,
        max_hold: Duration,
    ) -> Result<AcquireOutcome, CcToolsError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|source| CcToolsError::LockFailed {
            dir: project_root.to_path_buf(),
            source,
        })?;
        let (lock_path, ts_path) = self.paths_for(project_root);

        match self.try_create_exclusive(&lock_path) {
            Ok(true) => self.finish_acquire(project_root, lock_path, ts_path, cooldown),
            Ok(false) => {
                if self.lock_is_stale(&lock_path, max_hold, project_root)? {
                    debug!(target: "cc_tools::cooldown", dir = %project_root.display(), "reclaiming stale lock");
                    let _ = std::fs::remove_file(&lock_path);
                    if self.try_create_exclusive(&lock_path).map_err(|source| {
                        CcToolsError::LockFailed { dir: project_root.to_path_buf(), source }
                    })? {
                        return self.finish_acquire(project_root, lock_path, ts_path, cooldown);
                    }
                }
                Ok(AcquireOutcome::InProgress)
            }
            Err(source) => Err(CcToolsError::LockFailed {
                dir: project_root.to_path_buf(),
                source,
            }),
        }
    }

    fn try_create_exclusive(&self, lock_path: &Path) -> std::io::Result<bool> {
        match OpenOptions::new().write(true).create_new(true).open(lock_path) {
            Ok(_file) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn lock_is_stale(
        &self,
        lock_path: &Path,
        max_hold: Duration,
        project_root: &Path,
    ) -> Result<bool, CcToolsError> {
        let metadata = match std::fs::metadata(lock_path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(CcToolsError::LockFailed {
                    dir: project_root.to_path_buf(),
                    source,
                });
            }
        };
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::now());
        Ok(created.elapsed().unwrap_or(Duration::ZERO) > max_hold)
    }

    fn finish_acquire(
        &self,
        project_root: &Path,
        lock_path: PathBuf,
        ts_path: PathBuf,
        cooldown: Duration,
    ) -> Result<AcquireOutcome, CcToolsError> {
        if let Some(age) = read_timestamp_age(&ts_path) {
            if age < cooldown {
                // A cooled-down exit never extends the window.
                let _ = std::fs::remove_file(&lock_path);
                return Ok(AcquireOutcome::CooledDown);
            }
        }
        let _ = project_root;
        Ok(AcquireOutcome::Acquired(CooldownGuard {
            lock_path,
            ts_path,
            released: false,
        }))
    }
}

fn read_timestamp_age(ts_path: &Path) -> Option<Duration> {
    let raw = std::fs::read_to_string(ts_path).ok()?;
    let secs: u64 = raw.trim().parse().ok()?;
    let written = UNIX_EPOCH + Duration::from_secs(secs);
    SystemTime::now().duration_since(written).ok()
}

fn write_timestamp_now(ts_path: &Path) -> std::io::Result<()> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let parent = ts_path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    write!(temp, "{secs}")?;
    temp.as_file().sync_all()?;
    temp.persist(ts_path).map_err(|err| err.error)?;
    Ok(())
}

/// An acquired lock. Releasing it (explicitly, or implicitly via `Drop` on a
/// panic/timeout exit path) writes the completion timestamp and removes the
/// lock file, both atomically.
pub struct CooldownGuard {
    lock_path: PathBuf,
    ts_path: PathBuf,
    released: bool,
}

impl CooldownGuard {
    pub fn release(mut self) -> Result<(), CcToolsError> {
        self.do_release()
    }

    fn do_release(&mut self) -> Result<(), CcToolsError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        write_timestamp_now(&self.ts_path).map_err(|source| CcToolsError::LockFailed {
            dir: self.lock_path.clone(),
            source,
        })?;
        let _ = std::fs::remove_file(&self.lock_path);
        Ok(())
    }
}

impl Drop for CooldownGuard {
    fn drop(&mut self) {
        let _ = self.do_release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn first_acquisition_succeeds() {
        let base = tempdir().unwrap();
        let lock = CooldownLock::new(base.path().to_path_buf());
        let project = tempdir().unwrap();
        match lock.acquire(project.path(), Duration::from_secs(5), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::Acquired(_) => {}
            _ => panic!("expected Acquired"),
        }
    }

    #[test]
    fn concurrent_acquisition_reports_in_progress() {
        let base = tempdir().unwrap();
        let lock = CooldownLock::new(base.path().to_path_buf());
        let project = tempdir().unwrap();
        let first = lock.acquire(project.path(), Duration::from_secs(5), Duration::from_secs(120)).unwrap();
        let guard = match first {
            AcquireOutcome::Acquired(g) => g,
            _ => panic!("expected Acquired"),
        };

        match lock.acquire(project.path(), Duration::from_secs(5), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::InProgress => {}
            _ => panic!("expected InProgress while the first guard is held"),
        }

        drop(guard);
    }

    #[test]
    fn cooldown_window_is_honored_after_release() {
        let base = tempdir().unwrap();
        let lock = CooldownLock::new(base.path().to_path_buf());
        let project = tempdir().unwrap();

        let guard = match lock.acquire(project.path(), Duration::from_secs(60), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::Acquired(g) => g,
            _ => panic!("expected Acquired"),
        };
        guard.release().unwrap();

        match lock.acquire(project.path(), Duration::from_secs(60), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::CooledDown => {}
            _ => panic!("expected CooledDown immediately after a completed run"),
        }
    }

    #[test]
    fn cooled_down_exit_does_not_extend_the_window() {
        let base = tempdir().unwrap();
        let lock = CooldownLock::new(base.path().to_path_buf());
        let project = tempdir().unwrap();

        let guard = match lock.acquire(project.path(), Duration::from_millis(50), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::Acquired(g) => g,
            _ => panic!("expected Acquired"),
        };
        guard.release().unwrap();

        // Immediately re-check: cooled down, and must not touch the timestamp.
        match lock.acquire(project.path(), Duration::from_millis(50), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::CooledDown => {}
            _ => panic!("expected CooledDown"),
        }

        std::thread::sleep(Duration::from_millis(80));
        match lock.acquire(project.path(), Duration::from_millis(50), Duration::from_secs(120)).unwrap() {
            AcquireOutcome::Acquired(_) => {}
            _ => panic!("window should have expired from the original completion, not the cooled-down check"),
        }
    }

    #[test]
    fn a_stale_lock_is_reclaimed() {
        let base = tempdir().unwrap();
        let lock = CooldownLock::new(base.path().to_path_buf());
        let project = tempdir().unwrap();

        let (lock_path, _ts_path) = lock.paths_for(project.path());
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(&lock_path, b"").unwrap();
        // Force it to look ancient by making max_hold effectively zero.
        match lock.acquire(project.path(), Duration::from_secs(5), Duration::ZERO).unwrap() {
            AcquireOutcome::Acquired(_) => {}
            _ => panic!("stale lock should have been reclaimed"),
        }
    }
}
