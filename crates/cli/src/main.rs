mod manifest;
mod record;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use slashopt::quote;
use std::{fs, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, Manifest, write_default_manifest};
use crate::record::{ParseReport, build_registry, run_parse};

#[derive(Parser)]
#[command(name = "slashopt")]
#[command(version, about = "Inspect slash-style command-line declarations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample slashopt.json
    Init(InitArgs),

    /// Print the usage text for a manifest
    Usage(UsageArgs),

    /// Parse tokens against a manifest and show every dispatch
    Parse(ParseArgs),

    /// Quote values for the Windows command line
    Quote(QuoteArgs),

    /// Split a command line into arguments
    Split(SplitArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to the declaration manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the declaration manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,

    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,

    /// Tokens to parse, exactly as the command would receive them
    #[arg(value_name = "TOKEN", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct QuoteArgs {
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    values: Vec<String>,
}

#[derive(Parser)]
struct SplitArgs {
    #[arg(value_name = "LINE", allow_hyphen_values = true)]
    line: String,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Usage(args) => usage(args),
        Commands::Parse(args) => parse(args),
        Commands::Quote(args) => {
            println!("{}", quote::join(&args.values));
            Ok(())
        }
        Commands::Split(args) => {
            for token in quote::split(&args.line) {
                println!("{token}");
            }
            Ok(())
        }
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    let dest = write_default_manifest(&dir)?;

    eprintln!("Created: {}", dest.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to declare your options and arguments");
    eprintln!("  2. Run: slashopt usage");
    eprintln!("  3. Run: slashopt parse /A value");

    Ok(())
}

fn usage(args: UsageArgs) -> Result<()> {
    tracing::debug!("executing usage command");

    let manifest = Manifest::from_file(&args.manifest)?;
    let registry = build_registry(&manifest)?;
    print!("{}", registry.usage());
    Ok(())
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!(tokens = args.tokens.len(), "executing parse command");

    let manifest = Manifest::from_file(&args.manifest)?;
    let registry = build_registry(&manifest)?;
    let report = run_parse(&registry, &args.tokens);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.accepted {
            std::process::exit(1);
        }
        return Ok(());
    }

    print_report(&report);
    if let Some(err) = &report.error {
        bail!("tokens rejected: {err}");
    }
    Ok(())
}

fn print_report(report: &ParseReport) {
    for dispatch in &report.dispatches {
        match dispatch {
            record::Dispatch::Option { key, value: None } => println!("option   {key}"),
            record::Dispatch::Option {
                key,
                value: Some(value),
            } => println!("option   {key} = {}", quote::quote(value)),
            record::Dispatch::Argument { name, value } => {
                println!("argument {name} = {}", quote::quote(value))
            }
        }
    }
    if report.accepted {
        eprintln!("OK: {} dispatch(es)", report.dispatches.len());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
