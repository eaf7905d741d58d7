//! serialgen CLI - Serialization code generator for annotated C++ headers
//!
//! Commands:
//! - `serialgen process` - Generate methods for every annotated class in a project
//! - `serialgen inspect` - Show what would be generated for one header
//! - `serialgen macros` - List discovered validation macros
//! - `serialgen check` - Validate a serialgen.toml configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod inspect;
mod logging;
mod macros;
mod process;
mod settings;

use settings::ConfigArgs;

#[derive(Parser)]
#[command(name = "serialgen")]
#[command(author, version, about = "Serialization code generator for C++ headers", long_about = None)]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate methods for every annotated class under the project directory
    Process {
        #[command(flatten)]
        config: ConfigArgs,

        /// Compute changes and print the generated methods without writing files
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the stages on one header without writing it
    Inspect {
        /// Header file to inspect
        file: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List validation macros discovered in the project and library trees
    Macros {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a serialgen.toml configuration
    Check {
        /// Path to serialgen.toml (default: ./serialgen.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            config,
            dry_run,
            json,
        } => {
            let mut resolved = config.resolve()?;
            resolved.dry_run |= dry_run;
            logging::init(cli.verbose, &resolved.log_level);
            process::run(resolved, json)?;
        }
        Commands::Inspect { file, config } => {
            let resolved = config.resolve()?;
            logging::init(cli.verbose, &resolved.log_level);
            inspect::run(&file, &resolved)?;
        }
        Commands::Macros { config, json } => {
            let resolved = config.resolve()?;
            logging::init(cli.verbose, &resolved.log_level);
            macros::run(&resolved, json)?;
        }
        Commands::Check { config } => {
            logging::init(cli.verbose, "info");
            check::run(config)?;
        }
    }

    Ok(())
}
