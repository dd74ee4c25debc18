mod commands;
mod config;
mod project;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, compile, init, preview, store, ApplyArgs, CompileArgs, InitArgs, PreviewArgs, StoreArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagesmith CLI - build single-file sites from page trees
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Pagesmith project
    Init(InitArgs),

    /// Compile project files to standalone HTML
    Compile(CompileArgs),

    /// Compile one project into a temporary file for viewing
    Preview(PreviewArgs),

    /// Run editor commands against a project file
    Apply(ApplyArgs),

    /// Manage the local project store
    Store(StoreArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Compile(args) => compile(args, &cwd),
        Command::Preview(args) => preview(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Store(args) => store(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
