//! Batch generation of Swift test skeletons.
//!
//! [`Generator::run`] is the single entry point used by the CLI: it discovers
//! feature files, clears stale output, writes one Swift file per feature file
//! and reports every outcome through a [`BatchReporter`]. A file that fails
//! to read or write is reported and skipped; the rest of the batch carries on.

mod error;
mod file_io;

pub use error::GenerateError;

use crate::ast::ScenarioFile;
use crate::locator::{self, FEATURE_EXTENSION, FeatureFolders};
use crate::metadata::{BuildMetadata, MetadataProvider};
use crate::parser::parse_feature;
use crate::status::BatchReporter;
use crate::swift_gen::{self, SWIFT_EXTENSION};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::{debug, info, warn};

/// Required name of the output root's parent before anything is purged.
pub const PURGE_GUARD_PARENT: &str = "UITests";

/// A file that could not be processed.
#[derive(Debug)]
pub struct FailedFile {
    file: Utf8PathBuf,
    error: GenerateError,
}

impl FailedFile {
    /// Pair the feature file's relative path with its error.
    #[must_use]
    pub const fn new(file: Utf8PathBuf, error: GenerateError) -> Self {
        Self { file, error }
    }

    /// Relative path of the feature file, e.g. `Login/sign_in.feature`.
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// File name without folders, as shown to users.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file.file_name().unwrap_or(self.file.as_str())
    }

    /// What went wrong.
    #[must_use]
    pub const fn error(&self) -> &GenerateError {
        &self.error
    }
}

/// Result of [`purge_output_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// The guard matched; `removed` top-level entries were deleted.
    Purged {
        /// Number of files and folders removed directly under the root.
        removed: usize,
    },
    /// The guard did not match; nothing was touched.
    Skipped,
    /// The guard matched but removal stopped on an I/O error.
    Incomplete,
}

/// Totals for a completed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Feature files found under the root.
    pub found: usize,
    /// Generated files written, in processing order.
    pub written: Vec<Utf8PathBuf>,
    /// Feature files that failed to read or write.
    pub failed: Vec<Utf8PathBuf>,
    /// What happened to the previous output.
    pub purge: PurgeOutcome,
}

impl BatchSummary {
    /// Return `true` when every discovered file produced output.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// How a call to [`Generator::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No feature files were found; nothing was purged or written.
    NoScenarios,
    /// Every discovered file was processed.
    Completed(BatchSummary),
}

fn strip_feature_extension(name: &str) -> &str {
    name.strip_suffix(FEATURE_EXTENSION).unwrap_or(name)
}

/// Read one discovered feature file found in `folder`.
fn read_scenario_file(folder: &str, path: &Utf8Path) -> Result<ScenarioFile, FailedFile> {
    let name = path.file_name().unwrap_or(path.as_str());
    let relative = Utf8PathBuf::from(folder).join(name);
    match fs::read_to_string(path) {
        Ok(contents) => Ok(ScenarioFile::new(
            folder,
            strip_feature_extension(name),
            contents,
        )),
        Err(source) => {
            let failure = FailedFile::new(
                relative,
                GenerateError::Read {
                    path: path.to_owned(),
                    source,
                },
            );
            warn!(file = %failure.file(), error = %failure.error(), "skipping unreadable feature file");
            Err(failure)
        }
    }
}

/// Read every collected file in discovery order without reporting.
fn read_each(
    folders: &FeatureFolders,
) -> impl Iterator<Item = Result<ScenarioFile, FailedFile>> + '_ {
    folders.iter().flat_map(|(folder, paths)| {
        paths.iter().map(move |path| read_scenario_file(folder, path))
    })
}

/// Discover and read every collectable feature file under `root`.
///
/// Read failures go to `reporter` and are otherwise skipped, so one bad file
/// never hides its siblings. Returns the successfully read files in
/// discovery order; an empty result means nothing readable was found.
pub fn locate_and_read(root: &Utf8Path, reporter: &dyn BatchReporter) -> Vec<ScenarioFile> {
    read_each(&locator::collect(root))
        .filter_map(|result| match result {
            Ok(file) => Some(file),
            Err(failure) => {
                reporter.file_failed(&failure);
                None
            }
        })
        .collect()
}

/// Return `true` when `output`'s parent directory is literally named
/// [`PURGE_GUARD_PARENT`].
#[must_use]
pub fn purge_guard_allows(output: &Utf8Path) -> bool {
    output
        .parent()
        .and_then(Utf8Path::file_name)
        .is_some_and(|name| name == PURGE_GUARD_PARENT)
}

/// Delete everything under `output` when the purge guard allows it.
///
/// When the parent directory is not named [`PURGE_GUARD_PARENT`] this is a
/// silent no-op returning [`PurgeOutcome::Skipped`].
///
/// # Errors
///
/// Returns [`GenerateError::Purge`] if an entry inside a guarded tree cannot
/// be removed.
pub fn purge_output_tree(output: &Utf8Path) -> Result<PurgeOutcome, GenerateError> {
    if !purge_guard_allows(output) {
        debug!(output = %output, guard = PURGE_GUARD_PARENT, "purge guard rejected output root");
        return Ok(PurgeOutcome::Skipped);
    }
    let removed = file_io::clear_directory(output)?;
    debug!(output = %output, removed, "purged previous output");
    Ok(PurgeOutcome::Purged { removed })
}

/// Location of the Swift file generated for `file` under `output_root`.
#[must_use]
pub fn output_path(file: &ScenarioFile, output_root: &Utf8Path) -> Utf8PathBuf {
    output_root
        .join(file.sub_folder())
        .join(format!("{}.{SWIFT_EXTENSION}", file.file_name()))
}

/// Converts feature files into Swift sources stamped by a metadata provider.
#[derive(Debug, Clone)]
pub struct Generator<M = BuildMetadata> {
    meta: M,
}

impl Default for Generator<BuildMetadata> {
    fn default() -> Self {
        Self::new(BuildMetadata::current())
    }
}

impl<M: MetadataProvider> Generator<M> {
    /// Create a generator that stamps headers using `meta`.
    #[must_use]
    pub const fn new(meta: M) -> Self {
        Self { meta }
    }

    /// Parse `file` and write its Swift counterpart under `output_root`,
    /// replacing any previous version. Returns the written path, anchored to
    /// the working directory when `output_root` is relative.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] if the output folder or file cannot be
    /// written.
    pub fn emit(
        &self,
        file: &ScenarioFile,
        output_root: &Utf8Path,
    ) -> Result<Utf8PathBuf, GenerateError> {
        let model = parse_feature(file.contents());
        let source = swift_gen::generate(file.file_name(), &model, &self.meta);
        let target = output_path(file, &file_io::absolute(output_root)?);
        file_io::write_generated_file(&target, &source)?;
        info!(source = %file.display_path(), output = %target, scenarios = model.scenarios().len(), "generated Swift file");
        Ok(target)
    }

    /// Regenerate the whole output tree from the feature files under `root`.
    ///
    /// Reporter events fire in this order: `no_scenarios` alone when nothing
    /// was found; otherwise `scenarios_found`, then one `file_processed` or
    /// `file_failed` per file in discovery order, then `batch_complete`
    /// exactly once. Previous output is purged only when at least one
    /// discovered file could be read.
    pub fn run(
        &self,
        root: &Utf8Path,
        output_root: &Utf8Path,
        reporter: &dyn BatchReporter,
    ) -> BatchOutcome {
        let folders = locator::collect(root);
        let found: usize = folders.values().map(Vec::len).sum();
        if found == 0 {
            debug!(root = %root, "no feature files found");
            reporter.no_scenarios(root);
            return BatchOutcome::NoScenarios;
        }
        reporter.scenarios_found(found);

        let output_root = file_io::absolute(output_root).unwrap_or_else(|err| {
            warn!(error = %err, "using output root as given");
            output_root.to_owned()
        });
        let reads: Vec<_> = read_each(&folders).collect();
        let purge = if reads.iter().any(Result::is_ok) {
            purge_output_tree(&output_root).unwrap_or_else(|err| {
                warn!(error = %err, "could not clear previous output");
                PurgeOutcome::Incomplete
            })
        } else {
            debug!(output = %output_root, "nothing readable; previous output kept");
            PurgeOutcome::Skipped
        };

        let mut written = Vec::with_capacity(found);
        let mut failed = Vec::new();
        for read in reads {
            let result = read.and_then(|file| match self.emit(&file, &output_root) {
                Ok(target) => Ok((file, target)),
                Err(error) => {
                    warn!(file = %file.display_path(), error = %error, "failed to write generated file");
                    Err(FailedFile::new(file.display_path(), error))
                }
            });
            match result {
                Ok((file, target)) => {
                    reporter.file_processed(&file, &target);
                    written.push(target);
                }
                Err(failure) => {
                    reporter.file_failed(&failure);
                    failed.push(failure.file().to_owned());
                }
            }
        }

        let summary = BatchSummary {
            found,
            written,
            failed,
            purge,
        };
        reporter.batch_complete(&summary);
        BatchOutcome::Completed(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/work/UITests/Generated", true)]
    #[case("/work/uitests/Generated", false)]
    #[case("/work/Other/Generated", false)]
    #[case("UITests/Generated", true)]
    #[case("Generated", false)]
    #[case("/", false)]
    fn guard_checks_parent_name(#[case] output: &str, #[case] expected: bool) {
        assert_eq!(purge_guard_allows(Utf8Path::new(output)), expected);
    }

    #[rstest]
    #[case("login.feature", "login")]
    #[case("a.b.feature", "a.b")]
    #[case("odd", "odd")]
    fn feature_extension_is_stripped(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(strip_feature_extension(name), expected);
    }

    #[rstest]
    fn output_path_mirrors_sub_folder() {
        let file = ScenarioFile::new("Login", "sign_in", "");
        assert_eq!(
            output_path(&file, Utf8Path::new("/out")),
            Utf8PathBuf::from("/out/Login/sign_in.swift")
        );
    }
}
