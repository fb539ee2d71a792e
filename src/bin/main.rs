//! `apisan` command-line entry point.
//!
//! Two subcommands, mirroring the upstream driver's split between
//! instrumenting a build and mining the traces it produces:
//!
//! - `build` documents the compiler-wrapper invocation that captures
//!   traces; this crate never bundles that extractor, so it always exits
//!   non-zero with guidance instead of silently doing nothing.
//! - `check` runs one checker over a directory of `.as` trace files and
//!   prints any bugs found.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use apisan_core::checkers::CheckerKind;
use apisan_core::config;
use apisan_core::explorer::explore;

#[derive(Parser, Debug)]
#[command(name = "apisan", author, version, about, long_about = None)]
struct Cli {
    /// Raise the log level to `debug` regardless of `RUST_LOG`.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wrap a build command so it emits trace files instead of binaries.
    ///
    /// This core crate mines traces; it does not capture them. Run your
    /// build under apisan's compiler wrapper separately, then point
    /// `apisan check` at the directory it writes `.as` files to.
    Build {
        /// The build command that would normally produce object files.
        #[arg(required = true, num_args = 1..)]
        cmd: Vec<String>,
    },

    /// Mine a directory of trace files for API-misuse bugs.
    Check {
        /// Which strategy to run.
        #[arg(long, value_parser = parse_checker)]
        checker: CheckerKind,

        /// Directory containing `.as` trace files, scanned recursively.
        #[arg(long, default_value = "./as-out")]
        db: PathBuf,
    },
}

fn parse_checker(name: &str) -> Result<CheckerKind, String> {
    CheckerKind::from_name(name).ok_or_else(|| {
        format!("unknown checker '{name}', expected one of: {}", CheckerKind::ALL.join(", "))
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn print_bugs(bugs: &[apisan_core::model::BugReport]) {
    if bugs.is_empty() {
        return;
    }
    println!("{}{}{}", "=".repeat(30), " POTENTIAL BUGS ", "=".repeat(30));
    for bug in bugs {
        println!("{bug}");
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build { cmd } => {
            bail!(
                "apisan build does not bundle a trace-capturing compiler wrapper; \
                 wrap `{}` with your own extractor and run `apisan check` on its output",
                cmd.join(" ")
            );
        }
        Command::Check { checker, db } => {
            let config = config::load_from_env().context("loading configuration")?;

            if !db.is_dir() {
                bail!("trace directory {} does not exist", db.display());
            }

            let bugs = explore(&db, checker, &config);
            print_bugs(&bugs);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    if let Err(err) = run() {
        error!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
