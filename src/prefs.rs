//! Remembered scenarios and output paths.
//!
//! The CLI can store the last paths it was given so later runs need no
//! arguments. The store is a small TOML file; the generator itself never
//! consults it.
//!
//! The file lives at `$CUCUMBER_CONVERTER_CONFIG_PATH` when set, otherwise
//! under `$XDG_CONFIG_HOME/cucumber-converter/` or
//! `$HOME/.config/cucumber-converter/`.

// See `generator/error.rs`: the derives trip a compiler-version dependent lint.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::{env, fs};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the preferences file location.
pub const CONFIG_ENV_VAR: &str = "CUCUMBER_CONVERTER_CONFIG_PATH";

const APP_DIR: &str = "cucumber-converter";
const FILE_NAME: &str = "paths.toml";

/// Errors raised while loading or storing preferences.
#[derive(Debug, Error, Diagnostic)]
pub enum PrefsError {
    /// The file exists but could not be read.
    #[error("failed to read preferences from {path}")]
    #[diagnostic(code(cucumber_converter::prefs::read))]
    Read {
        /// Preferences file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for [`PathPreferences`].
    #[error("preferences file {path} is malformed")]
    #[diagnostic(
        code(cucumber_converter::prefs::parse),
        help("delete the file or run with `--forget` to reset it")
    )]
    Parse {
        /// Preferences file.
        path: Utf8PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// Preferences could not be serialised.
    #[error("failed to encode preferences")]
    #[diagnostic(code(cucumber_converter::prefs::encode))]
    Encode(#[from] toml::ser::Error),

    /// The file could not be written or removed.
    #[error("failed to update preferences at {path}")]
    #[diagnostic(code(cucumber_converter::prefs::write))]
    Write {
        /// Preferences file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// No location could be derived from the environment.
    #[error("cannot locate a preferences directory; set {CONFIG_ENV_VAR}")]
    #[diagnostic(code(cucumber_converter::prefs::no_location))]
    NoLocation,
}

/// Last-used paths. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathPreferences {
    /// Root folder holding scenario subfolders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Utf8PathBuf>,
    /// Folder generated files are written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Utf8PathBuf>,
}

/// Resolve the preferences file from environment lookups.
///
/// `lookup` stands in for [`std::env::var`] so tests need not touch the
/// process environment.
#[must_use]
pub fn default_location_with(lookup: impl Fn(&str) -> Option<String>) -> Option<Utf8PathBuf> {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
    if let Some(explicit) = non_empty(CONFIG_ENV_VAR) {
        return Some(Utf8PathBuf::from(explicit));
    }
    let base = non_empty("XDG_CONFIG_HOME")
        .map(Utf8PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| Utf8PathBuf::from(home).join(".config")))?;
    Some(base.join(APP_DIR).join(FILE_NAME))
}

/// Preferences file location derived from the process environment.
#[must_use]
pub fn default_location() -> Option<Utf8PathBuf> {
    default_location_with(|key| env::var(key).ok())
}

/// File-backed preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefsStore {
    path: Utf8PathBuf,
}

impl PrefsStore {
    /// Use the preferences file at `path`.
    #[must_use]
    pub fn at(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the default location.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::NoLocation`] when neither the override variable
    /// nor a home or XDG directory is set.
    pub fn from_env() -> Result<Self, PrefsError> {
        default_location().map(Self::at).ok_or(PrefsError::NoLocation)
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Load stored preferences; a missing file yields empty preferences.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError`] if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<PathPreferences, PrefsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path, "no remembered paths");
                return Ok(PathPreferences::default());
            }
            Err(source) => {
                return Err(PrefsError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| PrefsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace stored preferences atomically.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError`] if encoding fails or the file cannot be written.
    pub fn save(&self, prefs: &PathPreferences) -> Result<(), PrefsError> {
        let text = toml::to_string(prefs)?;
        let write_error = |source| PrefsError::Write {
            path: self.path.clone(),
            source,
        };
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        fs::create_dir_all(parent).map_err(write_error)?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(write_error)?;
        tmp.write_all(text.as_bytes()).map_err(write_error)?;
        tmp.persist(&self.path)
            .map_err(|err| write_error(err.error))?;
        debug!(path = %self.path, "remembered paths");
        Ok(())
    }

    /// Forget stored preferences. Removing a missing file succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::Write`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), PrefsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PrefsError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
