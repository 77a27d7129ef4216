//! Snapshot tests for the Swift files generated from the `tests/data` tree.
//!
//! The generator runs with a fixed version and clock so every header is
//! stable. Snapshots live under `tests/snapshots/swift`.

mod common;

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use common::{Recorder, generator};
use cucumber_converter::generator::{BatchOutcome, Generator};
use cucumber_converter::metadata::{BuildMetadata, FixedClock};
use insta::{Settings, assert_snapshot};
use rstest::rstest;
use test_support::{FeatureTree, snapshot};

fn scenarios() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/scenarios")
}

#[rstest]
#[case("Login/sign_in.swift", "sign_in")]
#[case("Login/sign_out.swift", "sign_out")]
#[case("Search/basic.swift", "basic")]
fn generated_swift_matches_snapshot(
    generator: Generator<BuildMetadata<FixedClock>>,
    #[case] relative: &str,
    #[case] name: &str,
) -> Result<()> {
    let tree = FeatureTree::new()?;
    let recorder = Recorder::default();
    let outcome = generator.run(&scenarios(), &tree.output(), &recorder);
    ensure!(
        matches!(outcome, BatchOutcome::Completed(ref s) if s.is_clean() && s.found == 3),
        "unexpected outcome: {outcome:?}"
    );

    let files = snapshot(&tree.output())?;
    let text = files
        .get(relative)
        .with_context(|| format!("{relative} was not generated"))?;

    let mut settings = Settings::new();
    settings.set_snapshot_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/snapshots/swift"
    ));
    settings.set_prepend_module_to_snapshot(false);
    settings.bind(|| {
        assert_snapshot!(name, text);
    });
    Ok(())
}
