//! Test utilities for building scenario trees on disk.
//!
//! [`FeatureTree`] owns a temporary directory laid out the way the converter
//! expects: a `features/` scenarios root beside a `UITests/Generated` output
//! root that satisfies the purge guard.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Header line that changes on every generation.
pub const TIMESTAMP_PREFIX: &str = "//  Generated on ";

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Switches the process working directory and restores it on drop.
///
/// The working directory is process-global, so the guard also holds a lock
/// serialising every test that changes it.
pub struct CurrentDirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl std::fmt::Debug for CurrentDirGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentDirGuard")
            .field("original", &self.original)
            .finish_non_exhaustive()
    }
}

impl CurrentDirGuard {
    /// Change into `path` until the guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or changed.
    pub fn change_to(path: impl AsRef<Path>) -> Result<Self> {
        let lock = CWD_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = path.as_ref();
        let original = std::env::current_dir().context("capture current working directory")?;
        std::env::set_current_dir(path)
            .with_context(|| format!("switch to working directory {}", path.display()))?;
        Ok(Self {
            original,
            _lock: lock,
        })
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.original) {
            eprintln!(
                "failed to restore working directory to {}: {err}",
                self.original.display()
            );
        }
    }
}

/// Temporary scenarios root plus sibling output folders.
#[derive(Debug)]
pub struct FeatureTree {
    _temp: TempDir,
    base: Utf8PathBuf,
}

impl FeatureTree {
    /// Create an empty tree with a `features/` root.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created or its
    /// path is not UTF-8.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let base = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|p| anyhow!("non-UTF-8 temp path {}", p.display()))?;
        fs::create_dir_all(base.join("features")).context("create features root")?;
        Ok(Self { _temp: temp, base })
    }

    /// Temporary directory holding everything.
    #[must_use]
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// Scenarios root passed to the converter.
    #[must_use]
    pub fn root(&self) -> Utf8PathBuf {
        self.base.join("features")
    }

    /// Output root whose parent is named `UITests`.
    #[must_use]
    pub fn output(&self) -> Utf8PathBuf {
        self.base.join("UITests").join("Generated")
    }

    /// Output root the purge guard rejects.
    #[must_use]
    pub fn unguarded_output(&self) -> Utf8PathBuf {
        self.base.join("Other").join("Generated")
    }

    /// Write `contents` to `relative` under the scenarios root, creating
    /// folders as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        write_file(&self.root().join(relative), contents)
    }

    /// Builder form of [`FeatureTree::write`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn with(self, relative: &str, contents: &str) -> Result<Self> {
        self.write(relative, contents)?;
        Ok(self)
    }
}

/// Write `contents` to `path`, creating parent folders.
///
/// # Errors
///
/// Returns an error if the folder or file cannot be written.
pub fn write_file(path: &Utf8Path, contents: &str) -> Result<Utf8PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    fs::write(path, contents).with_context(|| format!("write {path}"))?;
    Ok(path.to_owned())
}

/// Snapshot every file under `dir` as relative path to contents.
///
/// A missing directory yields an empty map.
///
/// # Errors
///
/// Returns an error if a file cannot be read.
pub fn snapshot(dir: &Utf8Path) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    if !dir.exists() {
        return Ok(files);
    }
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.context("walk tree")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir.as_std_path())
            .context("strip prefix")?
            .to_string_lossy()
            .replace('\\', "/");
        let text = fs::read_to_string(entry.path())
            .with_context(|| format!("read {}", entry.path().display()))?;
        files.insert(relative, text);
    }
    Ok(files)
}

/// Drop the timestamp line from generated text.
#[must_use]
pub fn without_timestamp(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(TIMESTAMP_PREFIX))
        .map(|line| format!("{line}\n"))
        .collect()
}
