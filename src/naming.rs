//! Identifier rules for generated Swift code.
//!
//! Step call names and scenario method names must match the functions the
//! hand-written step library already declares, so these rules are applied
//! verbatim rather than producing "nicer" identifiers.

use itertools::Itertools;

const SCENARIO_LABEL: &str = "Scenario:";

/// Remove apostrophes and hyphens.
fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\'' | '-')).collect()
}

/// Normalise step text (keyword and quoted values already removed) into a
/// call name.
///
/// Lowercases, removes apostrophes and hyphens, replaces spaces with
/// underscores, collapses runs of underscores and drops a trailing one.
///
/// ```rust
/// use cucumber_converter::naming::step_identifier;
///
/// assert_eq!(step_identifier("I ask whether it's Friday yet"), "i_ask_whether_its_friday_yet");
/// assert_eq!(step_identifier("I should be told "), "i_should_be_told");
/// ```
#[must_use]
pub fn step_identifier(text: &str) -> String {
    let underscored = strip_punctuation(&text.to_lowercase()).replace(' ', "_");
    let mut collapsed: String = underscored
        .chars()
        .dedup_by(|a, b| *a == '_' && *b == '_')
        .collect();
    if collapsed.ends_with('_') {
        collapsed.pop();
    }
    collapsed
}

/// Derive a method name from a full `Scenario:` header line.
///
/// ```rust
/// use cucumber_converter::naming::scenario_identifier;
///
/// assert_eq!(scenario_identifier("Scenario: User's log-in"), "users_login");
/// ```
#[must_use]
pub fn scenario_identifier(header: &str) -> String {
    let title = header.strip_prefix(SCENARIO_LABEL).unwrap_or(header).trim();
    strip_punctuation(&title.to_lowercase()).replace(' ', "_")
}

/// Derive the enclosing class name from a feature file name.
///
/// The first character is upper-cased; spaces and hyphens become
/// underscores so the result stays a single Swift identifier.
///
/// ```rust
/// use cucumber_converter::naming::type_identifier;
///
/// assert_eq!(type_identifier("checkout-flow"), "Checkout_flow");
/// ```
#[must_use]
pub fn type_identifier(file_name: &str) -> String {
    let sanitised = file_name.replace([' ', '-'], "_");
    let mut chars = sanitised.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
