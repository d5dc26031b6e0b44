//! Runcell CLI
//!
//! A command-line tool for running source files through the runcell
//! execution core.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use runcell::{Config, EXAMPLE_CONFIG, ExecutionRequest, Runner};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "runcell")]
#[command(about = "Run source files as bounded, ephemeral child processes")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: runcell.toml)
        #[arg(short, long, default_value = "runcell.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a source file
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language ID (e.g., python, javascript)
        #[arg(short, long)]
        language: String,

        /// File whose lines are fed to the program's standard input
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Deadline in seconds (overrides the configured value)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// List available languages
    Languages,

    /// Show effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::default()
    };

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            language,
            input,
            timeout,
        } => run_source(config, &source, &language, input.as_deref(), timeout).await,
        Commands::Languages => {
            list_languages(&config);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

async fn run_source(
    mut config: Config,
    source: &PathBuf,
    language_id: &str,
    input: Option<&std::path::Path>,
    timeout: Option<u64>,
) -> Result<()> {
    if let Some(secs) = timeout {
        config.timeout_secs = secs;
    }

    // Fail on a bad language ID before touching the filesystem
    config.get_language(language_id).context("unknown language")?;

    let code = tokio::fs::read_to_string(source)
        .await
        .context("failed to read source file")?;

    let inputs = if let Some(input_path) = input {
        tokio::fs::read_to_string(input_path)
            .await
            .context("failed to read input file")?
            .lines()
            .map(str::to_owned)
            .collect()
    } else {
        Vec::new()
    };

    info!(language = language_id, "running program");

    let runner = Runner::new(config);
    let request = ExecutionRequest::new(code, language_id).with_inputs(inputs);
    let result = runner.execute(&request).await;

    if !result.output.is_empty() {
        print!("{}", result.output);
    }

    // Log execution info via tracing (stderr), keeping stdout clean for piping
    info!(
        status = ?result.status,
        execution_time = format_args!("{:.3}s", result.execution_time),
        "execution result"
    );

    if let Some(error) = &result.error {
        if !error.is_empty() {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn list_languages(config: &Config) {
    println!("Available languages:\n");

    let mut languages: Vec<_> = config.languages.iter().collect();
    languages.sort_by_key(|(id, _)| *id);

    for (id, lang) in languages {
        println!("  {:<15} {}", id, lang.name);
    }
}

fn show_config(config: &Config) {
    println!("Execution deadline: {} seconds", config.timeout_secs);
    println!("Artifact directory: {}", config.artifact_dir().display());
    println!();
    println!("Languages configured: {}", config.languages.len());
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
