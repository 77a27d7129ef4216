//! Build metadata for generated file headers.
//!
//! Generated files carry the generator version and the time they were
//! written. Both values come from a [`MetadataProvider`] so the generator
//! never reads build descriptors or the system clock itself, and tests can
//! pin the output.
//!
//! The version prefers an externally supplied release string. Without one,
//! the crate's own `Cargo.toml` (embedded at compile time) is scanned for its
//! `version = "..."` assignment and the result is prefixed with `dev-` to mark
//! a non-release build.

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Compile-time override for the reported version.
pub const BUILD_VERSION_ENV: &str = "CUCUMBER_CONVERTER_BUILD_VERSION";

/// Prefix applied to versions read from the build descriptor.
pub const DEV_PREFIX: &str = "dev-";

const BUILD_DESCRIPTOR: &str = include_str!("../Cargo.toml");
const UNKNOWN_VERSION: &str = "unknown";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static VERSION_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*version\s*=\s*"([^"]+)""#).expect("valid version pattern")
});

/// Values stamped into each generated file's header.
pub trait MetadataProvider {
    /// Generator version string.
    fn version(&self) -> String;

    /// Human-readable generation time.
    fn timestamp(&self) -> String;
}

/// Source of the current time.
pub trait Clock {
    /// Current instant in UTC.
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Extract the first `version = "..."` assignment from a build descriptor.
///
/// Values that are not valid semantic versions are ignored.
///
/// ```rust
/// use cucumber_converter::metadata::descriptor_version;
///
/// let toml = "[package]\nname = \"demo\"\nversion = \"1.4.0\"\n";
/// assert_eq!(descriptor_version(toml).as_deref(), Some("1.4.0"));
/// assert_eq!(descriptor_version("name = \"demo\""), None);
/// ```
#[must_use]
pub fn descriptor_version(descriptor: &str) -> Option<String> {
    let raw = VERSION_ASSIGNMENT.captures(descriptor)?.get(1)?.as_str();
    Version::parse(raw).ok().map(|version| version.to_string())
}

/// Resolve the version: explicit release value first, then the descriptor
/// with the development prefix.
#[must_use]
pub fn resolve_version(external: Option<&str>, descriptor: &str) -> String {
    match external.map(str::trim).filter(|value| !value.is_empty()) {
        Some(release) => release.to_owned(),
        None => {
            let version =
                descriptor_version(descriptor).unwrap_or_else(|| UNKNOWN_VERSION.to_owned());
            format!("{DEV_PREFIX}{version}")
        }
    }
}

/// Default provider: resolved version plus a [`Clock`].
#[derive(Debug, Clone)]
pub struct BuildMetadata<C = SystemClock> {
    version: String,
    clock: C,
}

impl BuildMetadata<SystemClock> {
    /// Metadata for this build of the generator, stamped with the system time.
    #[must_use]
    pub fn current() -> Self {
        Self::with_clock(
            resolve_version(option_env!("CUCUMBER_CONVERTER_BUILD_VERSION"), BUILD_DESCRIPTOR),
            SystemClock,
        )
    }
}

impl<C: Clock> BuildMetadata<C> {
    /// Use an explicit version string and clock.
    #[must_use]
    pub fn with_clock(version: impl Into<String>, clock: C) -> Self {
        Self {
            version: version.into(),
            clock,
        }
    }
}

impl<C: Clock> MetadataProvider for BuildMetadata<C> {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn timestamp(&self) -> String {
        format_timestamp(self.clock.now())
    }
}

/// Render an instant in the header format, converting to UTC first.
#[must_use]
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    instant
        .to_offset(time::UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| instant.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    #[rstest]
    #[case(Some("2.0.1"), "version = \"0.1.0\"", "2.0.1")]
    #[case(Some("  "), "version = \"0.1.0\"", "dev-0.1.0")]
    #[case(None, "[package]\nversion = \"0.3.2\"\n", "dev-0.3.2")]
    #[case(None, "version = \"not-semver\"", "dev-unknown")]
    #[case(None, "", "dev-unknown")]
    fn version_resolution(
        #[case] external: Option<&str>,
        #[case] descriptor: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_version(external, descriptor), expected);
    }

    #[rstest]
    fn first_assignment_wins() {
        let toml = "version = \"1.0.0\"\n[dependencies]\nfoo = { version = \"9.9.9\" }\n";
        assert_eq!(descriptor_version(toml).as_deref(), Some("1.0.0"));
    }

    #[rstest]
    fn embedded_descriptor_has_a_version() {
        assert!(descriptor_version(BUILD_DESCRIPTOR).is_some());
    }

    #[rstest]
    fn fixed_clock_formats_in_utc() {
        let meta = BuildMetadata::with_clock(
            "1.0.0",
            FixedClock(datetime!(2024-03-05 07:08:09 +02:00)),
        );
        assert_eq!(meta.timestamp(), "2024-03-05 05:08:09 UTC");
        assert_eq!(meta.version(), "1.0.0");
    }
}
