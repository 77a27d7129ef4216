//! Batch outcome reporting.
//!
//! [`Generator::run`](crate::generator::Generator::run) announces each step of
//! a batch through a [`BatchReporter`]. Callers pick how those events surface:
//! as structured log records, as plain labelled lines on stderr, as an
//! `indicatif` progress bar, or not at all.

use crate::ast::ScenarioFile;
use crate::generator::{BatchSummary, FailedFile, GenerateError, PurgeOutcome};
use camino::Utf8Path;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{info, warn};

/// Receives batch outcomes. Every method defaults to doing nothing.
pub trait BatchReporter {
    /// At least one feature file was found; `count` files will be processed.
    fn scenarios_found(&self, _count: usize) {}

    /// `file` was generated at `output`.
    fn file_processed(&self, _file: &ScenarioFile, _output: &Utf8Path) {}

    /// No feature files were found under `root`; the batch did not run.
    fn no_scenarios(&self, _root: &Utf8Path) {}

    /// A feature file could not be read or its output could not be written.
    fn file_failed(&self, _failure: &FailedFile) {}

    /// Every discovered file has been handled.
    fn batch_complete(&self, _summary: &BatchSummary) {}
}

fn failure_line(failure: &FailedFile) -> String {
    match failure.error() {
        GenerateError::Read { .. } => {
            format!("Failed to read scenario file: {}", failure.file_name())
        }
        _ => format!("Failed to generate {}: {}", failure.file_name(), failure.error()),
    }
}

fn summary_line(summary: &BatchSummary) -> String {
    let purge = match summary.purge {
        PurgeOutcome::Purged { removed } => format!(", cleared {removed} old entries"),
        PurgeOutcome::Skipped => String::new(),
        PurgeOutcome::Incomplete => String::from(", old output only partly cleared"),
    };
    format!(
        "Generated {} of {} files{purge}",
        summary.written.len(),
        summary.found
    )
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl BatchReporter for SilentReporter {}

/// Emits each event as a `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl BatchReporter for LogReporter {
    fn scenarios_found(&self, count: usize) {
        info!(count, "feature files found");
    }

    fn file_processed(&self, file: &ScenarioFile, output: &Utf8Path) {
        info!(source = %file.display_path(), output = %output, "file processed");
    }

    fn no_scenarios(&self, root: &Utf8Path) {
        warn!(root = %root, "no scenarios found");
    }

    fn file_failed(&self, failure: &FailedFile) {
        warn!(file = %failure.file(), error = %failure.error(), "file failed");
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        info!(
            found = summary.found,
            written = summary.written.len(),
            failed = summary.failed.len(),
            "batch complete"
        );
    }
}

/// Writes short labelled lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn line(message: &str) {
        // Status output failures must not abort the batch.
        drop(writeln!(io::stderr(), "{message}"));
    }
}

impl BatchReporter for ConsoleReporter {
    fn scenarios_found(&self, count: usize) {
        Self::line(&format!("Found {count} feature files"));
    }

    fn file_processed(&self, _file: &ScenarioFile, output: &Utf8Path) {
        Self::line(&format!("Generated {output}"));
    }

    fn no_scenarios(&self, root: &Utf8Path) {
        Self::line(&format!(
            "No scenarios found in {root}, choose the main scenarios directory"
        ));
    }

    fn file_failed(&self, failure: &FailedFile) {
        Self::line(&failure_line(failure));
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        Self::line(&summary_line(summary));
    }
}

/// Draws a progress bar on stderr, one tick per file.
#[derive(Debug, Default)]
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    /// Create a reporter; the bar appears once files are found.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(bar) = guard.as_ref() {
            f(bar);
        }
    }
}

impl BatchReporter for ProgressReporter {
    fn scenarios_found(&self, count: usize) {
        let bar = ProgressBar::with_draw_target(
            Some(u64::try_from(count).unwrap_or(u64::MAX)),
            ProgressDrawTarget::stderr_with_hz(12),
        );
        let style = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        let mut guard = self
            .bar
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(bar);
    }

    fn file_processed(&self, file: &ScenarioFile, _output: &Utf8Path) {
        let name = file.file_name().to_owned();
        self.with_bar(|bar| {
            bar.set_message(name);
            bar.inc(1);
        });
    }

    fn no_scenarios(&self, root: &Utf8Path) {
        ConsoleReporter.no_scenarios(root);
    }

    fn file_failed(&self, failure: &FailedFile) {
        let line = failure_line(failure);
        self.with_bar(|bar| {
            bar.println(line);
            bar.inc(1);
        });
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        let line = summary_line(summary);
        self.with_bar(|bar| bar.finish_with_message(line));
    }
}

/// Forwards every event to each wrapped reporter in order.
#[derive(Default)]
pub struct Fanout {
    reporters: Vec<Box<dyn BatchReporter>>,
}

impl Fanout {
    /// Create an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reporter.
    #[must_use]
    pub fn with(mut self, reporter: impl BatchReporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }
}

impl BatchReporter for Fanout {
    fn scenarios_found(&self, count: usize) {
        self.reporters.iter().for_each(|r| r.scenarios_found(count));
    }

    fn file_processed(&self, file: &ScenarioFile, output: &Utf8Path) {
        self.reporters
            .iter()
            .for_each(|r| r.file_processed(file, output));
    }

    fn no_scenarios(&self, root: &Utf8Path) {
        self.reporters.iter().for_each(|r| r.no_scenarios(root));
    }

    fn file_failed(&self, failure: &FailedFile) {
        self.reporters.iter().for_each(|r| r.file_failed(failure));
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        self.reporters.iter().for_each(|r| r.batch_complete(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use std::sync::Arc;

    #[derive(Default, Clone)]
    struct Counter(Arc<Mutex<usize>>);

    impl BatchReporter for Counter {
        fn scenarios_found(&self, count: usize) {
            if let Ok(mut total) = self.0.lock() {
                *total += count;
            }
        }
    }

    #[rstest]
    fn fanout_forwards_to_every_reporter() {
        let first = Counter::default();
        let second = Counter::default();
        let fanout = Fanout::new().with(first.clone()).with(second.clone());
        fanout.scenarios_found(3);
        assert_eq!(first.0.lock().map(|n| *n).ok(), Some(3));
        assert_eq!(second.0.lock().map(|n| *n).ok(), Some(3));
    }

    #[rstest]
    fn read_failures_use_the_file_name() {
        let failure = FailedFile::new(
            Utf8PathBuf::from("Login/sign_in.feature"),
            GenerateError::Read {
                path: Utf8PathBuf::from("/root/Login/sign_in.feature"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
        );
        assert_eq!(
            failure_line(&failure),
            "Failed to read scenario file: sign_in.feature"
        );
    }

    #[rstest]
    #[case(PurgeOutcome::Skipped, "Generated 1 of 2 files")]
    #[case(PurgeOutcome::Purged { removed: 4 }, "Generated 1 of 2 files, cleared 4 old entries")]
    #[case(PurgeOutcome::Incomplete, "Generated 1 of 2 files, old output only partly cleared")]
    fn summary_mentions_purge(#[case] purge: PurgeOutcome, #[case] expected: &str) {
        let summary = BatchSummary {
            found: 2,
            written: vec![Utf8PathBuf::from("out/a.swift")],
            failed: vec![Utf8PathBuf::from("b.feature")],
            purge,
        };
        assert_eq!(summary_line(&summary), expected);
    }
}
