mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, init, preview, CompileArgs, InitArgs, PreviewArgs};
use tracing_subscriber::EnvFilter;

/// Weekly CLI - compose, compile and preview newsletter issues
#[derive(Parser, Debug)]
#[command(name = "weekly")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config and an example issue
    Init(InitArgs),

    /// Compile an issue payload to HTML
    Compile(CompileArgs),

    /// Render the live preview of an issue payload
    Preview(PreviewArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Compile(args) => compile(args, &cwd),
                Command::Preview(args) => preview(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
