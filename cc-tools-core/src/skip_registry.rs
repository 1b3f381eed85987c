//! Atomic JSON-persisted mapping from absolute project directory to the
//! validation categories it has opted out of.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::CcToolsError;

/// A validation category. `All` is a convenience alias, never stored as such
/// on disk — it always expands to both concrete categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipCategory {
    Lint,
    Test,
    All,
}

impl SkipCategory {
    fn expand(self) -> &'static [&'static str] {
        match self {
            SkipCategory::Lint => &["lint"],
            SkipCategory::Test => &["test"],
            SkipCategory::All => &["lint", "test"],
        }
    }
}

type StoredMap = BTreeMap<String, BTreeSet<String>>;

/// The skip registry: an in-memory cache backed by a JSON file, guarded so
/// reads proceed concurrently and mutations are serialized.
pub struct SkipRegistry {
    path: PathBuf,
    cache: RwLock<StoredMap>,
}

impl SkipRegistry {
    /// Load the registry from `path`, migrating from `legacy_path` if `path`
    /// does not exist yet and `legacy_path` does.
    pub fn load(path: PathBuf, legacy_path: Option<&Path>) -> Result<Self, CcToolsError> {
        let source = if path.try_exists().unwrap_or(false) {
            Some(path.as_path())
        } else {
            legacy_path.filter(|candidate| candidate.try_exists().unwrap_or(false))
        };

        let cache = match source {
            Some(source) => read_map(source)?,
            None => StoredMap::new(),
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn require_absolute(dir: &Path) -> Result<(), CcToolsError> {
        if dir.is_absolute() {
            Ok(())
        } else {
            Err(CcToolsError::InvalidPath(dir.to_path_buf()))
        }
    }

    pub fn is_skipped(&self, dir: &Path, cat: SkipCategory) -> Result<bool, CcToolsError> {
        Self::require_absolute(dir)?;
        let cache = self.cache.read().expect("skip registry lock poisoned");
        let key = dir.to_string_lossy();
        let stored = cache.get(key.as_ref());
        let wanted = cat.expand();
        Ok(match stored {
            Some(set) => wanted.iter().all(|c| set.contains(*c)),
            None => false,
        })
    }

    pub fn get_skip_types(&self, dir: &Path) -> Result<BTreeSet<String>, CcToolsError> {
        Self::require_absolute(dir)?;
        let cache = self.cache.read().expect("skip registry lock poisoned");
        let key = dir.to_string_lossy();
        Ok(cache.get(key.as_ref()).cloned().unwrap_or_default())
    }

    pub fn add_skip(&self, dir: &Path, cat: SkipCategory) -> Result<(), CcToolsError> {
        Self::require_absolute(dir)?;
        let key = dir.to_string_lossy().to_string();
        let mut cache = self.cache.write().expect("skip registry lock poisoned");
        let before = cache.clone();
        let entry = cache.entry(key).or_default();
        for c in cat.expand() {
            entry.insert(c.to_string());
        }
        if let Err(err) = self.flush(&cache) {
            *cache = before;
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_skip(&self, dir: &Path, cat: SkipCategory) -> Result<(), CcToolsError> {
        Self::require_absolute(dir)?;
        let key = dir.to_string_lossy().to_string();
        let mut cache = self.cache.write().expect("skip registry lock poisoned");
        let before = cache.clone();
        if let Some(set) = cache.get_mut(&key) {
            for c in cat.expand() {
                set.remove(*c);
            }
            if set.is_empty() {
                cache.remove(&key);
            }
        }
        if let Err(err) = self.flush(&cache) {
            *cache = before;
            return Err(err);
        }
        Ok(())
    }

    pub fn clear(&self, dir: &Path) -> Result<(), CcToolsError> {
        Self::require_absolute(dir)?;
        let key = dir.to_string_lossy().to_string();
        let mut cache = self.cache.write().expect("skip registry lock poisoned");
        let before = cache.clone();
        cache.remove(&key);
        if let Err(err) = self.flush(&cache) {
            *cache = before;
            return Err(err);
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(String, BTreeSet<String>)> {
        let cache = self.cache.read().expect("skip registry lock poisoned");
        cache.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn flush(&self, cache: &StoredMap) -> Result<(), CcToolsError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|source| CcToolsError::SaveFailed {
            path: self.path.clone(),
            source,
        })?;
        let mut body = serde_json::to_string_pretty(cache).map_err(CcToolsError::ParseError)?;
        body.push('\n');

        let write = || -> std::io::Result<()> {
            let mut temp = tempfile::NamedTempFile::new_in(parent)?;
            temp.write_all(body.as_bytes())?;
            temp.as_file().sync_all()?;
            temp.persist(&self.path).map_err(|err| err.error)?;
            Ok(())
        };
        write().map_err(|source| CcToolsError::SaveFailed {
            path: self.path.clone(),
            source,
        })
    }
}

fn read_map(path: &Path) -> Result<StoredMap, CcToolsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CcToolsError::SaveFailed {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(StoredMap::new());
    }
    let map: StoredMap = serde_json::from_str(&raw).map_err(|_| CcToolsError::Corrupted {
        path: path.to_path_buf(),
        reason: "skip registry file does not contain a JSON object of directory to categories"
            .to_string(),
    })?;

    for set in map.values() {
        for category in set {
            if category != "lint" && category != "test" {
                return Err(CcToolsError::Corrupted {
                    path: path.to_path_buf(),
                    reason: format!(
                        "skip registry contains unknown category {category:?}, expected \"lint\" or \"test\""
                    ),
                });
            }
        }
    }

    Ok(map)
}
