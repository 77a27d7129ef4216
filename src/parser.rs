//! Line classifier for feature files.
//!
//! The parser walks the filtered lines of a feature file with a small state
//! machine. A `Scenario:` header opens a scenario, keyword lines become steps,
//! pipe-delimited lines attach to the most recent step, and comment lines
//! detach any following table rows. Lines that do not fit the current state
//! are discarded rather than reported: the generator favours forward progress
//! over strict validation.

use crate::ast::{DataTableRow, FeatureModel, Scenario, Step};
use tracing::trace;

const SCENARIO_PREFIX: &str = "Scenario:";
const TABLE_PREFIX: char = '|';
const COMMENT_PREFIX: char = '#';

/// What kind of line the scanner is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    ScenarioHeader(&'a str),
    TableRow(&'a str),
    Separator,
    Step(&'a str),
}

impl<'a> LineKind<'a> {
    fn classify(line: &'a str) -> Self {
        if line.starts_with(SCENARIO_PREFIX) {
            Self::ScenarioHeader(line)
        } else if line.starts_with(TABLE_PREFIX) {
            Self::TableRow(line)
        } else if line.trim().is_empty() || line.starts_with(COMMENT_PREFIX) {
            Self::Separator
        } else {
            Self::Step(line)
        }
    }
}

/// Scanner position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NoScenario,
    InScenario,
    InStep,
}

#[derive(Debug)]
struct Scanner {
    state: State,
    scenarios: Vec<Scenario>,
}

impl Scanner {
    const fn new() -> Self {
        Self {
            state: State::NoScenario,
            scenarios: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        self.state = match (self.state, LineKind::classify(line)) {
            (_, LineKind::ScenarioHeader(header)) => {
                self.scenarios.push(Scenario::new(header, Vec::new()));
                State::InScenario
            }
            (State::InStep, LineKind::TableRow(row)) => {
                if let Some(step) = self.current_step() {
                    step.push_row(DataTableRow::new(row));
                }
                State::InStep
            }
            (state, LineKind::TableRow(row)) => {
                trace!(row, "discarding table row without an open step");
                state
            }
            (State::NoScenario, LineKind::Separator) => State::NoScenario,
            (_, LineKind::Separator) => State::InScenario,
            (State::NoScenario, LineKind::Step(text)) => {
                trace!(text, "discarding step outside of a scenario");
                State::NoScenario
            }
            (_, LineKind::Step(text)) => {
                self.open_step(text);
                State::InStep
            }
        };
    }

    fn open_step(&mut self, text: &str) {
        let Some(scenario) = self.scenarios.last_mut() else {
            return;
        };
        let steps = scenario.steps_mut();
        let occurrence = steps.iter().filter(|step| step.text() == text).count() + 1;
        steps.push(Step::new(text, occurrence, Vec::new()));
    }

    fn current_step(&mut self) -> Option<&mut Step> {
        self.scenarios
            .last_mut()
            .and_then(|scenario| scenario.steps_mut().last_mut())
    }

    fn finish(self) -> FeatureModel {
        FeatureModel::new(self.scenarios)
    }
}

/// Return `true` when a raw line survives the pre-filter.
///
/// Blank lines are dropped, as is any line mentioning "feature" in any case,
/// which removes the `Feature:` header.
fn is_relevant(line: &str) -> bool {
    !line.trim().is_empty() && !line.to_lowercase().contains("feature")
}

/// Parse the text of one feature file into scenarios and steps.
///
/// Parsing never fails; malformed structure is skipped.
///
/// # Examples
///
/// ```rust
/// use cucumber_converter::parser::parse_feature;
///
/// let text = "\
/// Feature: Accounts
///   Scenario: Two tables
///     Given the following users exist:
///       | name |
///       | Ann  |
///     Given the following users exist:
///       | name |
///       | Bob  |
/// ";
/// let model = parse_feature(text);
/// let steps = model.scenarios()[0].steps();
/// assert_eq!(steps.len(), 2);
/// assert_eq!(steps[1].occurrence(), 2);
/// assert_eq!(steps[1].table()[1].as_str(), "| Bob  |");
/// ```
#[must_use]
pub fn parse_feature(contents: &str) -> FeatureModel {
    let mut scanner = Scanner::new();
    contents
        .lines()
        .filter(|line| is_relevant(line))
        .map(str::trim_start)
        .for_each(|line| scanner.feed(line));
    scanner.finish()
}
