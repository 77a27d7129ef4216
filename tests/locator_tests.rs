//! Discovery tests against the fixture trees under `tests/data`.

use anyhow::Result;
use camino::Utf8PathBuf;
use cucumber_converter::locator::{collect, is_valid_root};
use rstest::{fixture, rstest};
use test_support::FeatureTree;

#[fixture]
fn data() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

fn names(paths: &[Utf8PathBuf]) -> Vec<&str> {
    paths.iter().filter_map(|p| p.file_name()).collect()
}

#[rstest]
fn collect_maps_folders_to_direct_feature_files(data: Utf8PathBuf) {
    let folders = collect(data.join("scenarios"));

    let keys: Vec<_> = folders.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Login", "Search"]);
    assert_eq!(
        folders.get("Login").map(|p| names(p)),
        Some(vec!["sign_in.feature", "sign_out.feature"])
    );
    assert_eq!(
        folders.get("Search").map(|p| names(p)),
        Some(vec!["basic.feature"])
    );
}

#[rstest]
fn deep_files_make_a_root_valid_without_being_collected(data: Utf8PathBuf) {
    let root = data.join("deep_only");
    assert!(is_valid_root(&root));
    assert!(collect(&root).is_empty());
}

#[rstest]
fn root_without_feature_files_is_invalid() -> Result<()> {
    let tree = FeatureTree::new()?
        .with("Notes/readme.md", "# notes")?
        .with("Notes/login.feature.bak", "Scenario: old")?;
    assert!(!is_valid_root(tree.root()));
    assert!(collect(tree.root()).is_empty());
    Ok(())
}

#[rstest]
fn loose_files_in_the_root_are_not_collected() -> Result<()> {
    let tree = FeatureTree::new()?
        .with("top.feature", "Scenario: top")?
        .with("Inner/inner.feature", "Scenario: inner")?;
    assert!(is_valid_root(tree.root()));
    let folders = collect(tree.root());
    assert_eq!(folders.len(), 1);
    assert!(folders.contains_key("Inner"));
    Ok(())
}
