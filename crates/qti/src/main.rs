//! QTI CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use qti_marshal::Profile;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "qti")]
#[command(version)]
#[command(about = "Convert and check QTI assessment documents", long_about = None)]
struct Cli {
    /// TOML file with marshalling options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document between QTI versions
    Convert {
        /// Input file
        input: PathBuf,

        /// Target profile (qti2 or qti3)
        #[arg(long)]
        to: Option<Profile>,

        /// Read the input as this profile instead of detecting it
        #[arg(long)]
        from: Option<Profile>,

        /// Write output to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Indent nested elements
        #[arg(long)]
        pretty: bool,

        /// Reject attributes the schema does not define
        #[arg(long)]
        strict: bool,
    },

    /// Check that documents convert cleanly
    Check {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Print diagnostics as JSON lines
        #[arg(long)]
        json: bool,

        /// Reject attributes the schema does not define
        #[arg(long)]
        strict: bool,
    },

    /// Print the component tree of a document
    Tree {
        /// Input file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "qti=debug" } else { "qti=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut options = config::load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            input,
            to,
            from,
            output,
            pretty,
            strict,
        } => {
            options.strict_attributes |= strict;
            commands::convert::execute(
                commands::convert::ConvertArgs {
                    input,
                    to,
                    from,
                    output,
                    pretty,
                },
                options,
            )
        }
        Commands::Check {
            inputs,
            json,
            strict,
        } => {
            options.strict_attributes |= strict;
            commands::check::execute(commands::check::CheckArgs { inputs, json }, options)
        }
        Commands::Tree { input } => commands::tree::execute(&input, options),
    }
}
