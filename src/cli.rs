//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. It only
//! depends on `clap` and the standard library so `build.rs` can include it to
//! render the manual page.

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::iter;
use std::path::PathBuf;

/// Turn Gherkin feature files into XCTest skeleton classes.
#[derive(Debug, Parser)]
#[command(name = "cucumber-converter", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose diagnostic logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Force the progress bar on or off.
    ///
    /// When omitted, the bar is drawn only when stderr is a terminal;
    /// otherwise plain status lines are printed.
    #[arg(long, global = true, value_name = "BOOL")]
    pub progress: Option<bool>,

    /// Use this preferences file instead of the default location.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "CUCUMBER_CONVERTER_CONFIG_PATH"
    )]
    pub config: Option<PathBuf>,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `generate` as the default
    /// command. Exits with clap's usage message on invalid input.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::try_parse_from_with_default(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Parse `args`, re-parsing with `generate` appended when no subcommand
    /// was given so the default command still picks up its environment
    /// fallbacks.
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let cli = Self::try_parse_from(args.clone())?;
        if cli.command.is_some() {
            return Ok(cli);
        }
        Self::try_parse_from(args.into_iter().chain(iter::once(OsString::from("generate"))))
    }
}

/// Arguments accepted by the `generate` command.
#[derive(Debug, Args, PartialEq, Eq, Clone, Default)]
pub struct GenerateArgs {
    /// Root folder whose subfolders hold `.feature` files.
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "CUCUMBER_CONVERTER_SCENARIOS"
    )]
    pub scenarios: Option<PathBuf>,

    /// Folder receiving the generated Swift files.
    ///
    /// Its previous contents are removed first when its parent folder is
    /// named `UITests`.
    #[arg(short, long, value_name = "DIR", env = "CUCUMBER_CONVERTER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Store the paths used by this run for later invocations.
    #[arg(long, conflicts_with = "forget")]
    pub remember: bool,

    /// Drop any stored paths before running.
    #[arg(long)]
    pub forget: bool,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Generate one Swift file per feature file `default`.
    Generate(GenerateArgs),

    /// Succeed when a `.feature` file exists anywhere below a folder.
    Check {
        /// Folder to inspect.
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Print the feature files that `generate` would pick up.
    List {
        /// Scenarios root to inspect.
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Print the mapping as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use rstest::rstest;

    #[rstest]
    #[case(&["cucumber-converter"])]
    #[case(&["cucumber-converter", "--progress", "false", "-v"])]
    fn missing_subcommand_parses_as_generate(#[case] args: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from_with_default(args)?;
        assert!(matches!(cli.command, Some(Commands::Generate(_))));
        Ok(())
    }

    #[rstest]
    fn global_flags_survive_the_default_command() -> Result<()> {
        let cli = Cli::try_parse_from_with_default([
            "cucumber-converter",
            "--progress",
            "true",
            "--config",
            "/tmp/prefs.toml",
        ])?;
        assert_eq!(cli.progress, Some(true));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/prefs.toml")));
        Ok(())
    }

    #[rstest]
    fn explicit_subcommand_is_kept() -> Result<()> {
        let cli = Cli::try_parse_from_with_default(["cucumber-converter", "check", "features"])?;
        assert_eq!(
            cli.command,
            Some(Commands::Check {
                dir: PathBuf::from("features")
            })
        );
        Ok(())
    }

    #[rstest]
    fn generate_flags_are_parsed() -> Result<()> {
        let cli = Cli::try_parse_from_with_default([
            "cucumber-converter",
            "generate",
            "--scenarios",
            "features",
            "--output",
            "UITests/Generated",
            "--remember",
        ])?;
        let Some(Commands::Generate(args)) = cli.command.as_ref() else {
            bail!("expected generate, got {:?}", cli.command);
        };
        assert_eq!(args.scenarios, Some(PathBuf::from("features")));
        assert_eq!(args.output, Some(PathBuf::from("UITests/Generated")));
        assert!(args.remember);
        Ok(())
    }
}
