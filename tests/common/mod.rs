//! Shared helpers for integration tests.
//!
//! Integration tests under `tests/` compile as independent crates. This module
//! is included via `mod common;` in individual test files to share fixtures and
//! helpers.

use camino::Utf8Path;
use cucumber_converter::ast::ScenarioFile;
use cucumber_converter::generator::{BatchSummary, FailedFile, Generator};
use cucumber_converter::metadata::{BuildMetadata, FixedClock};
use cucumber_converter::status::BatchReporter;
use rstest::fixture;
use std::sync::Mutex;
use time::macros::datetime;

/// Generator stamping a fixed version and time.
#[fixture]
pub fn generator() -> Generator<BuildMetadata<FixedClock>> {
    Generator::new(BuildMetadata::with_clock(
        "1.2.3",
        FixedClock(datetime!(2024-05-06 07:08:09 UTC)),
    ))
}

/// Reporter that records each event as a short line.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Events seen so far, in order.
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl BatchReporter for Recorder {
    fn scenarios_found(&self, count: usize) {
        self.push(format!("found {count}"));
    }

    fn file_processed(&self, file: &ScenarioFile, _output: &Utf8Path) {
        self.push(format!("processed {}", file.display_path()));
    }

    fn no_scenarios(&self, _root: &Utf8Path) {
        self.push("none".to_owned());
    }

    fn file_failed(&self, failure: &FailedFile) {
        self.push(format!("failed {}", failure.file()));
    }

    fn batch_complete(&self, summary: &BatchSummary) {
        self.push(format!(
            "complete {}/{}",
            summary.written.len(),
            summary.found
        ));
    }
}
