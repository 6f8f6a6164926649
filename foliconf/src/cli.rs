//! Command-line interface definitions for `foliconf`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Parsed CLI arguments for `foliconf`.
#[derive(Debug, Parser)]
#[command(name = "foliconf")]
#[command(about = "Generate configuration typing stubs from marked section declarations")]
#[command(version)]
pub struct Args {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a source tree and regenerate the configuration artifacts.
    Gen(GenArgs),
}

/// Arguments for the `gen` subcommand.
#[derive(Debug, ClapArgs)]
pub struct GenArgs {
    /// Path of the runtime module to generate; the stub lands next to it.
    #[arg(value_name = "base")]
    pub base: Utf8PathBuf,
    /// Root directory to scan for declarations; defaults to the base path's
    /// parent directory.
    #[arg(long, value_name = "dir")]
    pub root: Option<Utf8PathBuf>,
    /// Log scanned files and registered sections.
    #[arg(short, long)]
    pub verbose: bool,
}
