//! Parsed feature-file structures.
//!
//! These types describe a single feature file after it has been read from
//! disk and split into scenarios. They are built fresh for every file,
//! consumed by the Swift generator, and dropped once the output is written.
//!
//! ```rust
//! use cucumber_converter::parser::parse_feature;
//!
//! let model = parse_feature("Scenario: Greeting\n  Given I open the app\n");
//! assert_eq!(model.scenarios().len(), 1);
//! assert_eq!(model.scenarios()[0].steps()[0].text(), "Given I open the app");
//! ```

use camino::Utf8PathBuf;

/// Raw contents of one discovered `.feature` file.
///
/// `sub_folder` names the immediate child of the scenarios root that holds
/// the file; the generator mirrors it under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFile {
    sub_folder: String,
    file_name: String,
    contents: String,
}

impl ScenarioFile {
    /// Bundle a file's location and text. `file_name` excludes the extension.
    #[must_use]
    pub fn new(
        sub_folder: impl Into<String>,
        file_name: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            sub_folder: sub_folder.into(),
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    /// Name of the first-level folder the file was found in.
    #[must_use]
    pub fn sub_folder(&self) -> &str {
        &self.sub_folder
    }

    /// File name with the `.feature` extension stripped.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Unparsed feature text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Relative location of the source file, used in log and failure output.
    #[must_use]
    pub fn display_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.sub_folder).join(format!("{}.feature", self.file_name))
    }
}

/// One pipe-delimited line attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTableRow(String);

impl DataTableRow {
    /// Store a raw table line such as `| name | age |`.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw line.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the row into trimmed cells, ignoring the outer pipes.
    #[must_use]
    pub fn cells(&self) -> Vec<&str> {
        self.0
            .trim()
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect()
    }
}

/// A single step line and the table rows that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    text: String,
    occurrence: usize,
    table: Vec<DataTableRow>,
}

impl Step {
    /// Create a step. `occurrence` is 1 for the first use of `text` within a
    /// scenario and increases for every repeat.
    #[must_use]
    pub fn new(text: impl Into<String>, occurrence: usize, table: Vec<DataTableRow>) -> Self {
        Self {
            text: text.into(),
            occurrence,
            table,
        }
    }

    /// Keyword-led step text exactly as written (left-trimmed).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based position among textually identical steps of the same scenario.
    #[must_use]
    pub const fn occurrence(&self) -> usize {
        self.occurrence
    }

    /// Attached table rows; the first row holds column names.
    #[must_use]
    pub fn table(&self) -> &[DataTableRow] {
        &self.table
    }

    pub(crate) fn push_row(&mut self, row: DataTableRow) {
        self.table.push(row);
    }
}

/// A `Scenario:` header and its ordered steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    header: String,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a scenario from its full header line.
    #[must_use]
    pub fn new(header: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            header: header.into(),
            steps,
        }
    }

    /// Full header line, including the `Scenario:` label.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Steps in source order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut Vec<Step> {
        &mut self.steps
    }
}

/// Immutable parse result for one feature file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureModel {
    scenarios: Vec<Scenario>,
}

impl FeatureModel {
    /// Wrap an ordered list of scenarios.
    #[must_use]
    pub const fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Scenarios in source order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Return `true` when the file contained no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
