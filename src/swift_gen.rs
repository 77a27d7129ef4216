//! Swift test-class generator.
//!
//! Converts a [`FeatureModel`] into the text of one XCTest source file: a
//! header comment naming the generator version and generation time, then a
//! single `XCTestCase` subclass with one method per scenario. Method bodies
//! hold one `try` call per step, with exact duplicate lines removed.

use crate::ast::{FeatureModel, Scenario};
use crate::metadata::MetadataProvider;
use crate::naming::{scenario_identifier, type_identifier};
use crate::step_gen::emit_step;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Extension given to generated files.
pub const SWIFT_EXTENSION: &str = "swift";

const INDENT: &str = "    ";

/// Header, class name and rendered methods for one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwiftFile {
    file_name: String,
    type_name: String,
    version: String,
    timestamp: String,
    methods: Vec<Method>,
}

/// One generated test method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: String,
    body: Vec<String>,
}

impl Method {
    /// Build a method from a scenario, dropping repeated call lines.
    #[must_use]
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            name: scenario_identifier(scenario.header()),
            body: scenario.steps().iter().map(emit_step).unique().collect(),
        }
    }

    /// Method name derived from the scenario header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call lines in step order.
    #[must_use]
    pub fn body(&self) -> &[String] {
        &self.body
    }
}

impl SwiftFile {
    /// Assemble the output for `file_name` (no extension).
    #[must_use]
    pub fn new(file_name: &str, model: &FeatureModel, meta: &dyn MetadataProvider) -> Self {
        Self {
            file_name: file_name.to_owned(),
            type_name: type_identifier(file_name),
            version: meta.version(),
            timestamp: meta.timestamp(),
            methods: model.scenarios().iter().map(Method::from_scenario).collect(),
        }
    }

    /// Name of the enclosing class.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Rendered methods in scenario order.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{INDENT}func {}() throws {{", self.name)?;
        for line in &self.body {
            writeln!(f, "{INDENT}{INDENT}{line}")?;
        }
        writeln!(f, "{INDENT}}}")
    }
}

impl Display for SwiftFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "//")?;
        writeln!(f, "//  {}.{SWIFT_EXTENSION}", self.file_name)?;
        writeln!(f, "//  Generated by cucumber-converter {}", self.version)?;
        writeln!(f, "//  Generated on {}", self.timestamp)?;
        writeln!(f, "//")?;
        writeln!(f)?;
        writeln!(f, "import XCTest")?;
        writeln!(f)?;
        writeln!(f, "final class {}: XCTestCase {{", self.type_name)?;
        for method in &self.methods {
            writeln!(f)?;
            write!(f, "{method}")?;
        }
        writeln!(f, "}}")
    }
}

/// Render the full source text for one feature file.
#[must_use]
pub fn generate(file_name: &str, model: &FeatureModel, meta: &dyn MetadataProvider) -> String {
    SwiftFile::new(file_name, model, meta).to_string()
}
