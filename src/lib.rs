//! Cucumber converter core library.
//!
//! Turns Gherkin `.feature` files into Swift `XCTestCase` skeletons. The
//! pipeline runs leaves first:
//!
//! - [`locator`] finds feature files below a scenarios root.
//! - [`parser`] reads one file into an [`ast::FeatureModel`].
//! - [`step_gen`] renders each step as a `try` call line, named by [`naming`].
//! - [`swift_gen`] wraps the calls into one class per file, stamped with
//!   [`metadata`].
//! - [`generator`] drives a whole batch and reports through [`status`].
//!
//! [`cli`], [`runner`] and [`prefs`] make up the command line front end.

pub mod ast;
pub mod cli;
pub mod generator;
pub mod locator;
pub mod metadata;
pub mod naming;
pub mod parser;
pub mod prefs;
pub mod runner;
pub mod status;
pub mod step_gen;
pub mod swift_gen;
