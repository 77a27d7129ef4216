//! Discovery of feature files beneath a scenarios root.
//!
//! A root is *valid* when a `.feature` file exists anywhere below it, however
//! deeply nested. Collection is deliberately shallower: only the files sitting
//! directly inside each immediate subfolder are picked up for generation.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension that marks a Gherkin file.
pub const FEATURE_EXTENSION: &str = ".feature";

/// Subfolder name to the feature files directly inside it.
pub type FeatureFolders = IndexMap<String, Vec<Utf8PathBuf>>;

fn is_feature_name(name: &str) -> bool {
    name.ends_with(FEATURE_EXTENSION)
}

/// Return `true` when any file under `root` ends in `.feature`.
///
/// The walk is depth-first, follows symbolic links and stops at the first
/// match. Missing or non-directory paths are never valid.
#[must_use]
pub fn is_valid_root(root: impl AsRef<Path>) -> bool {
    let root = root.as_ref();
    if !root.is_dir() {
        return false;
    }
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .any(|entry| {
            entry.file_type().is_file()
                && entry.file_name().to_str().is_some_and(is_feature_name)
        })
}

/// List the entries of `dir` as UTF-8 paths, sorted by name.
///
/// File types are read through symbolic links; dangling links are skipped.
fn sorted_entries(dir: &Path) -> Vec<(Utf8PathBuf, fs::FileType)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(path = %dir.display(), error = %err, "cannot list directory");
            return Vec::new();
        }
    };
    let mut out: Vec<_> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let file_type = match fs::metadata(entry.path()) {
                Ok(meta) => meta.file_type(),
                Err(err) => {
                    debug!(path = %entry.path().display(), error = %err, "skipping dangling entry");
                    return None;
                }
            };
            match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(path) => Some((path, file_type)),
                Err(path) => {
                    warn!(path = %path.display(), "skipping non-UTF-8 path");
                    None
                }
            }
        })
        .collect();
    out.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));
    out
}

fn direct_feature_files(folder: &Utf8Path) -> Vec<Utf8PathBuf> {
    sorted_entries(folder.as_std_path())
        .into_iter()
        .filter(|(path, file_type)| file_type.is_file() && path.file_name().is_some_and(is_feature_name))
        .map(|(path, _)| path)
        .collect()
}

/// Map each immediate subfolder of `root` to the `.feature` files directly
/// inside it.
///
/// Files in nested folders are not included, and subfolders without any
/// direct match are omitted. Both folders and files are ordered by name.
#[must_use]
pub fn collect(root: impl AsRef<Path>) -> FeatureFolders {
    sorted_entries(root.as_ref())
        .into_iter()
        .filter(|(_, file_type)| file_type.is_dir())
        .filter_map(|(folder, _)| {
            let name = folder.file_name()?.to_owned();
            let files = direct_feature_files(&folder);
            if files.is_empty() {
                debug!(folder = %folder, "no feature files");
                None
            } else {
                Some((name, files))
            }
        })
        .collect()
}
