//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! resolves paths, builds the reporters, and hands generation over to
//! [`Generator`].

use crate::cli::{Cli, Commands, GenerateArgs};
use crate::generator::{BatchOutcome, Generator};
use crate::locator;
use crate::prefs::{PathPreferences, PrefsStore};
use crate::status::{ConsoleReporter, Fanout, LogReporter, ProgressReporter};
use anyhow::{Context, Result, anyhow, bail};
use camino::Utf8PathBuf;
use indexmap::IndexMap;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Execute the parsed [`Cli`] commands.
///
/// # Errors
///
/// Returns an error if paths cannot be resolved, preferences cannot be
/// updated, no scenarios are found, or any feature file fails to generate.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Generate(GenerateArgs::default()));
    match command {
        Commands::Generate(args) => generate(cli, &args),
        Commands::Check { dir } => check(&dir),
        Commands::List { dir, json } => list(&dir, json),
    }
}

fn to_utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("path {} is not valid UTF-8", path.display()))
}

fn prefs_store(cli: &Cli) -> Result<PrefsStore> {
    match cli.config.clone() {
        Some(path) => Ok(PrefsStore::at(to_utf8(path)?)),
        None => Ok(PrefsStore::from_env()?),
    }
}

/// Fill missing paths from stored preferences.
fn resolve_paths(cli: &Cli, args: &GenerateArgs) -> Result<(Utf8PathBuf, Utf8PathBuf)> {
    let explicit = PathPreferences {
        scenarios: args.scenarios.clone().map(to_utf8).transpose()?,
        output: args.output.clone().map(to_utf8).transpose()?,
    };
    let needs_store = args.remember
        || args.forget
        || explicit.scenarios.is_none()
        || explicit.output.is_none();
    if !needs_store {
        return paths_from(explicit);
    }

    let store = prefs_store(cli)?;
    let stored = if args.forget {
        store.clear()?;
        debug!(path = %store.path(), "forgot remembered paths");
        PathPreferences::default()
    } else {
        store.load()?
    };
    let merged = PathPreferences {
        scenarios: explicit.scenarios.or(stored.scenarios),
        output: explicit.output.or(stored.output),
    };
    if args.remember {
        store
            .save(&merged)
            .with_context(|| format!("remembering paths in {}", store.path()))?;
    }
    paths_from(merged)
}

fn paths_from(prefs: PathPreferences) -> Result<(Utf8PathBuf, Utf8PathBuf)> {
    let scenarios = prefs
        .scenarios
        .context("no scenarios folder given; pass --scenarios or remember one")?;
    let output = prefs
        .output
        .context("no output folder given; pass --output or remember one")?;
    Ok((scenarios, output))
}

fn reporter(cli: &Cli) -> Fanout {
    let show_bar = cli
        .progress
        .unwrap_or_else(|| io::stderr().is_terminal());
    let fanout = Fanout::new().with(LogReporter);
    if show_bar {
        fanout.with(ProgressReporter::new())
    } else {
        fanout.with(ConsoleReporter)
    }
}

fn generate(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let (scenarios, output) = resolve_paths(cli, args)?;
    debug!(scenarios = %scenarios, output = %output, "resolved paths");
    let reporter = reporter(cli);
    let generator: Generator = Generator::default();
    match generator.run(&scenarios, &output, &reporter) {
        BatchOutcome::NoScenarios => bail!("no scenarios found in {scenarios}"),
        BatchOutcome::Completed(summary) if summary.is_clean() => Ok(()),
        BatchOutcome::Completed(summary) => bail!(
            "{} of {} feature files failed",
            summary.failed.len(),
            summary.found
        ),
    }
}

fn check(dir: &Path) -> Result<()> {
    if locator::is_valid_root(dir) {
        info!(dir = %dir.display(), "scenarios root is valid");
        Ok(())
    } else {
        bail!("no feature files found under {}", dir.display())
    }
}

/// Folder name to the bare file names `generate` would read.
fn listing(dir: &Path) -> IndexMap<String, Vec<String>> {
    locator::collect(dir)
        .into_iter()
        .map(|(folder, paths)| {
            let names = paths
                .iter()
                .filter_map(|path| path.file_name().map(str::to_owned))
                .collect();
            (folder, names)
        })
        .collect()
}

fn write_listing(out: &mut impl Write, folders: &IndexMap<String, Vec<String>>) -> io::Result<()> {
    for (folder, names) in folders {
        writeln!(out, "{folder}/")?;
        for name in names {
            writeln!(out, "  {name}")?;
        }
    }
    Ok(())
}

fn list(dir: &Path, json: bool) -> Result<()> {
    let folders = listing(dir);
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &folders).context("encoding listing")?;
        writeln!(out).context("writing listing")?;
    } else {
        write_listing(&mut out, &folders).context("writing listing")?;
    }
    Ok(())
}
