//! Step call-line generator.
//!
//! Each parsed [`Step`] becomes one `try <name>(<args>)` line. Quoted values
//! in the step text turn into positional string arguments and an attached
//! data table becomes a dictionary literal keyed by its header row.

use crate::ast::{DataTableRow, Step};
use crate::naming::step_identifier;
use itertools::Itertools;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("valid quoted-value pattern"));

/// A data table split into its header row and value rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLiteral {
    names: Vec<String>,
    values: Vec<Vec<String>>,
}

impl TableLiteral {
    /// Build a table from raw rows. Returns `None` when `rows` is empty.
    #[must_use]
    pub fn from_rows(rows: &[DataTableRow]) -> Option<Self> {
        let (header, body) = rows.split_first()?;
        Some(Self {
            names: owned_cells(header),
            values: body.iter().map(owned_cells).collect(),
        })
    }

    /// Column names from the first row.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Remaining rows.
    #[must_use]
    pub fn values(&self) -> &[Vec<String>] {
        &self.values
    }
}

fn owned_cells(row: &DataTableRow) -> Vec<String> {
    row.cells().into_iter().map(str::to_owned).collect()
}

fn quoted_list(cells: &[String]) -> String {
    format!("[{}]", cells.iter().map(|cell| format!("\"{cell}\"")).join(", "))
}

impl Display for TableLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let values = self.values.iter().map(|row| quoted_list(row)).join(", ");
        write!(f, "[{}: [{values}]]", quoted_list(&self.names))
    }
}

/// The call derived from one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFunction {
    name: String,
    params: Vec<String>,
    table: Option<TableLiteral>,
}

impl GeneratedFunction {
    /// Call-target name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quoted values in the order they appeared.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Attached table, if any.
    #[must_use]
    pub const fn table(&self) -> Option<&TableLiteral> {
        self.table.as_ref()
    }
}

impl Display for GeneratedFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let args = self
            .params
            .iter()
            .map(|value| format!("\"{value}\""))
            .chain(self.table.iter().map(ToString::to_string))
            .join(", ");
        write!(f, "try {}({args})", self.name)
    }
}

/// Drop the leading Gherkin keyword: everything up to and including the
/// first space.
fn strip_keyword(text: &str) -> &str {
    text.split_once(' ').map_or(text, |(_, rest)| rest)
}

/// Derive the call for a step's text and table rows.
///
/// # Examples
///
/// ```rust
/// use cucumber_converter::step_gen::function_for;
///
/// let call = function_for(r#"When I enter "bob" and "secret""#, &[]);
/// assert_eq!(call.name(), "i_enter_and");
/// assert_eq!(call.params(), ["bob", "secret"]);
/// ```
#[must_use]
pub fn function_for(text: &str, rows: &[DataTableRow]) -> GeneratedFunction {
    let body = strip_keyword(text);
    let params = QUOTED
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|value| value.as_str().to_owned())
        .collect();
    let unquoted = QUOTED.replace_all(body, "");
    GeneratedFunction {
        name: step_identifier(&unquoted),
        params,
        table: TableLiteral::from_rows(rows),
    }
}

/// Render one step as a call line.
///
/// ```rust
/// use cucumber_converter::ast::Step;
/// use cucumber_converter::step_gen::emit_step;
///
/// let step = Step::new(r#"Then I should be told "Nope""#, 1, Vec::new());
/// assert_eq!(emit_step(&step), r#"try i_should_be_told("Nope")"#);
/// ```
#[must_use]
pub fn emit_step(step: &Step) -> String {
    function_for(step.text(), step.table()).to_string()
}
