//! apisplit CLI
//!
//! Splits an API document into per-resource documents and runs the per-group
//! generator configurations.

use std::path::PathBuf;

use anyhow::Context;
use apisplit::{run_configuration, run_directory, split_files, RunReport, ToolConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apisplit")]
#[command(about = "Split API documents per resource and generate per-type TypeScript files")]
struct Cli {
    /// Tool configuration file (defaults to apisplit.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a document into one document, configuration and registry per group
    Split {
        /// Combined API document (JSON)
        input_file: PathBuf,
        /// Generator configuration to derive the per-group configurations from
        input_nswag_file: PathBuf,
        /// Directory receiving the per-group files
        output_directory: PathBuf,
    },

    /// Run a single generator configuration
    Run {
        /// Generator configuration file
        config_file: PathBuf,
    },

    /// Run every generator configuration in a directory
    RunBatch {
        /// Directory containing generator configurations
        input_directory: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_ref().map(|p| p.to_string_lossy().into_owned());
    let config = ToolConfig::load_from(config_path.as_deref())
        .context("failed to load tool configuration")?;

    match cli.command {
        Commands::Split {
            input_file,
            input_nswag_file,
            output_directory,
        } => {
            println!("✂️  Splitting {}", input_file.display());
            let report = split_files(&input_file, &input_nswag_file, &output_directory, &config)?;

            for group in &report.groups {
                println!("  ✅ {}", group);
            }
            println!();
            println!(
                "✅ {} group(s), {} file(s) written to {}",
                report.groups.len(),
                report.files.len(),
                output_directory.display()
            );
            Ok(())
        }

        Commands::Run { config_file } => {
            let report = run_configuration(&config_file, &config)
                .with_context(|| format!("failed to run {}", config_file.display()))?;
            print_run(&report);
            Ok(())
        }

        Commands::RunBatch { input_directory } => {
            println!("🔍 Running configurations in {}", input_directory.display());
            let reports = run_directory(&input_directory, &config)?;
            for report in &reports {
                print_run(report);
            }
            println!();
            println!("✅ {} configuration(s) processed", reports.len());
            Ok(())
        }
    }
}

fn print_run(report: &RunReport) {
    println!("  ✅ {} -> {}", report.config.display(), report.output.display());
    if let Some(types) = &report.types {
        println!(
            "     {} created, {} overwritten, {} kept",
            types.created.len(),
            types.overwritten.len(),
            types.kept.len()
        );
    }
}
