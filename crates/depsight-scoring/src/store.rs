//! Rule persistence with snapshot reads
//!
//! The live [`RuleSet`] sits behind an `RwLock<Arc<RuleSet>>`. Readers clone the
//! `Arc` and score against that snapshot without holding the lock. Writers
//! validate the new set, write it to a temp file in the target directory, rename
//! it over the old file, and only then swap the in-memory pointer.

use crate::{RuleSet, ScoringError};
use parking_lot::{Mutex, RwLock};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Holder of the current rule set, optionally backed by a TOML file
pub struct RuleStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<RuleSet>>,
    write_guard: Mutex<()>,
}

impl RuleStore {
    /// Store without a backing file
    pub fn in_memory(rules: RuleSet) -> Result<Self, ScoringError> {
        rules.validate()?;
        Ok(Self {
            path: None,
            current: RwLock::new(Arc::new(rules)),
            write_guard: Mutex::new(()),
        })
    }

    /// Open a file-backed store
    ///
    /// A missing file yields the default rule set; the file is only created on
    /// the first [`RuleStore::replace`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let path = path.as_ref().to_path_buf();
        let rules = if path.exists() {
            load_rule_set(&path)?
        } else {
            debug!("Rule file {:?} not found, using default rule set", path);
            RuleSet::default()
        };

        Ok(Self {
            path: Some(path),
            current: RwLock::new(Arc::new(rules)),
            write_guard: Mutex::new(()),
        })
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current rule set
    pub fn snapshot(&self) -> Arc<RuleSet> {
        self.current.read().clone()
    }

    /// Validate, persist and publish a new rule set
    pub fn replace(&self, rules: RuleSet) -> Result<(), ScoringError> {
        rules.validate()?;
        let _writer = self.write_guard.lock();

        if let Some(path) = &self.path {
            write_atomically(path, &rules)?;
        }

        let rule_count = rules.rules.len();
        *self.current.write() = Arc::new(rules);
        info!("Published scoring rule set ({} rules)", rule_count);
        Ok(())
    }

    /// Re-read the backing file and publish its contents
    ///
    /// A no-op for in-memory stores.
    pub fn reload(&self) -> Result<(), ScoringError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let _writer = self.write_guard.lock();
        let rules = load_rule_set(path)?;
        *self.current.write() = Arc::new(rules);
        Ok(())
    }
}

/// Read and validate a rule set file
pub fn load_rule_set(path: &Path) -> Result<RuleSet, ScoringError> {
    let contents = fs::read_to_string(path)?;
    RuleSet::from_toml(&contents)
}

/// Write `rules` to `path` via temp file + rename
fn write_atomically(path: &Path, rules: &RuleSet) -> Result<(), ScoringError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let contents = rules.to_toml()?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| ScoringError::Persist(e.error.to_string()))?;

    debug!("Wrote rule set to {:?}", path);
    Ok(())
}
