//! Capability-scoped file helpers for the generator.
//!
//! Writes resolve the nearest existing ancestor of the target path, open it as
//! a `cap_std` directory and create everything below it relative to that
//! handle. Purging works the same way on the output root itself.

use super::GenerateError;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs as cap_fs};
use std::io::{self, Write};

fn open_dir(path: &Utf8Path) -> io::Result<cap_fs::Dir> {
    cap_fs::Dir::open_ambient_dir(path.as_std_path(), ambient_authority())
}

/// Anchor `path` to the working directory when it is relative.
///
/// `..` components are kept as written; the operating system resolves them
/// when the nearest existing ancestor is opened.
pub(super) fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf, GenerateError> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let resolve_error = |source| GenerateError::Resolve {
        path: path.to_owned(),
        source,
    };
    let anchored = std::path::absolute(path.as_std_path()).map_err(resolve_error)?;
    Utf8PathBuf::from_path_buf(anchored).map_err(|_| {
        resolve_error(io::Error::new(
            io::ErrorKind::InvalidData,
            "working directory is not valid UTF-8",
        ))
    })
}

/// Open the closest existing ancestor of `path` and return it alongside the
/// remainder of `path` relative to that ancestor.
fn derive_dir_and_relative(path: &Utf8Path) -> Result<(cap_fs::Dir, Utf8PathBuf), GenerateError> {
    let path = absolute(path)?;
    let no_ancestor = || GenerateError::NoAncestor {
        path: path.clone(),
    };
    let mut ancestors = path.ancestors();
    ancestors.next();
    let (base, dir) = ancestors
        .find_map(|candidate| open_dir(candidate).ok().map(|dir| (candidate, dir)))
        .ok_or_else(no_ancestor)?;
    let relative = path.strip_prefix(base).map_err(|_| no_ancestor())?.to_owned();
    Ok((dir, relative))
}

/// Write `content` to `path`, creating missing parent directories and
/// replacing any existing file.
pub(super) fn write_generated_file(path: &Utf8Path, content: &str) -> Result<(), GenerateError> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    if let Some(parent) = relative.parent().filter(|p| !p.as_str().is_empty()) {
        dir.create_dir_all(parent.as_std_path())
            .map_err(|source| GenerateError::CreateDir {
                path: path.parent().map_or_else(|| path.to_owned(), Utf8Path::to_owned),
                source,
            })?;
    }
    let write_error = |source| GenerateError::Write {
        path: path.to_owned(),
        source,
    };
    let mut file = dir.create(relative.as_std_path()).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    Ok(())
}

/// Remove every entry inside `root`, leaving `root` itself in place.
///
/// Returns the number of top-level entries removed. A missing `root` has
/// nothing to remove.
pub(super) fn clear_directory(root: &Utf8Path) -> Result<usize, GenerateError> {
    let purge_error =
        |path: Utf8PathBuf| move |source: io::Error| GenerateError::Purge { path, source };
    let dir = match open_dir(root) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(purge_error(root.to_owned())(err)),
    };
    let mut removed = 0;
    for entry in dir.entries().map_err(purge_error(root.to_owned()))? {
        let entry = entry.map_err(purge_error(root.to_owned()))?;
        let name = entry.file_name();
        let path = root.join(name.to_string_lossy().as_ref());
        let file_type = entry.file_type().map_err(purge_error(path.clone()))?;
        if file_type.is_dir() {
            dir.remove_dir_all(&name).map_err(purge_error(path))?;
        } else {
            dir.remove_file(&name).map_err(purge_error(path))?;
        }
        removed += 1;
    }
    Ok(removed)
}
