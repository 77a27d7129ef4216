//! Errors raised while reading feature files or writing generated output.
//
// The miette/thiserror derives trip `unused_assignments` on some compiler
// versions only, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Failures for a single feature file or for the output tree.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    /// The feature file could not be read as UTF-8 text.
    #[error("failed to read scenario file {path}")]
    #[diagnostic(code(cucumber_converter::generator::read))]
    Read {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A relative output path could not be anchored to the working directory.
    #[error("cannot resolve output path {path} against the working directory")]
    #[diagnostic(code(cucumber_converter::generator::resolve))]
    Resolve {
        /// Output path as given.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// No existing ancestor directory could be opened for the output path.
    #[error("no existing ancestor directory for {path}")]
    #[diagnostic(
        code(cucumber_converter::generator::no_ancestor),
        help("check that the output root points at a reachable location")
    )]
    NoAncestor {
        /// Output path being written.
        path: Utf8PathBuf,
    },

    /// The output folder could not be created.
    #[error("failed to create output directory {path}")]
    #[diagnostic(code(cucumber_converter::generator::create_dir))]
    CreateDir {
        /// Directory that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The generated file could not be written.
    #[error("failed to write generated file {path}")]
    #[diagnostic(code(cucumber_converter::generator::write))]
    Write {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Removing stale output failed part-way.
    #[error("failed to clear generated output under {path}")]
    #[diagnostic(code(cucumber_converter::generator::purge))]
    Purge {
        /// Entry that could not be removed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// Path the failure refers to.
    #[must_use]
    pub const fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. }
            | Self::Resolve { path, .. }
            | Self::NoAncestor { path }
            | Self::CreateDir { path, .. }
            | Self::Write { path, .. }
            | Self::Purge { path, .. } => path,
        }
    }
}
