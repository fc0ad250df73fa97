//! cfgsync CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod manifest;

#[derive(Parser)]
#[command(name = "cfgsync")]
#[command(version)]
#[command(about = "Keep configuration files in sync with their shipped defaults", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a default document into a configuration file
    Update {
        /// Configuration file to update
        target: PathBuf,

        /// Default document to merge from
        #[arg(long, conflicts_with_all = ["resource_dir", "resource"])]
        default: Option<PathBuf>,

        /// Directory holding default documents
        #[arg(long, requires = "resource")]
        resource_dir: Option<PathBuf>,

        /// Name of the default document inside --resource-dir
        #[arg(long, requires = "resource_dir")]
        resource: Option<String>,

        /// Section kept exactly as the file has it (repeatable)
        #[arg(long = "ignore", value_name = "PATH")]
        ignored_sections: Vec<String>,

        /// Section forced back to the default (repeatable)
        #[arg(long = "override", value_name = "PATH")]
        override_sections: Vec<String>,

        /// Write the default when the file does not exist
        #[arg(long)]
        create_missing: bool,

        /// Print the merged document instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run every job listed in a manifest
    Run {
        /// Manifest file
        #[arg(default_value = "cfgsync.toml")]
        manifest: PathBuf,
    },

    /// List the key paths of a document
    Keys {
        /// Document to read
        file: PathBuf,

        /// Only list top-level keys
        #[arg(long)]
        top_level: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "cfgsync=debug" } else { "cfgsync=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Update {
            target,
            default,
            resource_dir,
            resource,
            ignored_sections,
            override_sections,
            create_missing,
            dry_run,
        } => commands::update::execute(commands::update::UpdateArgs {
            target,
            source: commands::update::DefaultSource::from_args(default, resource_dir, resource)?,
            ignored_sections,
            override_sections,
            create_missing,
            dry_run,
        }),
        Commands::Run { manifest } => commands::run::execute(&manifest),
        Commands::Keys { file, top_level } => commands::keys::execute(&file, top_level),
    }
}
