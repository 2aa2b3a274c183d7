/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Entry point for the stitch command-line interface.
 */

//! stitch CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stitch")]
#[command(version)]
#[command(about = "Compose YAML documents from imported files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a document, resolve its imports and print the result
    Compose {
        /// Document to load
        file: PathBuf,

        /// Directory relative imports resolve against (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Expand globs in sorted path order instead of filesystem order
        #[arg(long)]
        sorted: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Print the files a glob pattern matches, with their captures
    Matches {
        /// Glob pattern, e.g. 'items/{name:*}.yml'
        pattern: String,

        /// Directory relative patterns resolve against (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Print matches in sorted path order
        #[arg(long)]
        sorted: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stitch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compose {
            file,
            root,
            sorted,
            format,
        } => commands::compose::execute(&file, root, sorted, format),
        Commands::Matches {
            pattern,
            root,
            sorted,
        } => commands::matches::execute(&pattern, root, sorted),
    }
}
