//! Word Sequence Experiment CLI.
//!
//! Commands:
//! - write: Generate all participants and write the artifact
//! - preview: Print the artifact to stdout instead
//! - catalog: Show the words and which may follow which

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wordseq_experiment::{ChainTerminator, ExperimentConfig};

#[derive(Parser)]
#[command(name = "wordseq-experiment")]
#[command(version)]
#[command(about = "Generate per-participant word sequences for the online sequence-learning task")]
struct Cli {
    /// Enable verbose logging (shows dead-end restarts)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds sequences.
#[derive(Args)]
struct ConfigArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of participants
    #[arg(short, long)]
    participants: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,
}

impl ConfigArgs {
    fn load(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(participants) = self.participants {
            config.participants = participants;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all participants and write the artifact
    Write {
        #[command(flatten)]
        config: ConfigArgs,

        /// Directory to write into
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Artifact name (without .txt)
        #[arg(long)]
        name: Option<String>,

        /// How the last conditional ends
        #[arg(long, value_enum)]
        chain: Option<ChainTerminator>,

        /// Also save a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the artifact to stdout without writing files
    Preview {
        #[command(flatten)]
        config: ConfigArgs,

        /// How the last conditional ends
        #[arg(long, value_enum)]
        chain: Option<ChainTerminator>,
    },

    /// Show the words and their permitted successors
    Catalog {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Write {
            config,
            output_dir,
            name,
            chain,
            report,
        } => {
            let mut config = config.load()?;
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(name) = name {
                config.output_name = name;
            }
            if let Some(chain) = chain {
                config.chain = chain;
            }

            let run_report = wordseq_experiment::run(&config)?;

            info!(
                participants = run_report.participants.len(),
                seed = run_report.seed,
                attempts_per_block = run_report.attempts_per_block(),
                "All done"
            );
            if let Some(artifact) = &run_report.artifact {
                println!("Sequences written to: {}", artifact.display());
            }

            if let Some(report) = report {
                run_report.save(&report)?;
                println!("Report written to: {}", report.display());
            }
        }

        Commands::Preview { config, chain } => {
            let mut config = config.load()?;
            if let Some(chain) = chain {
                config.chain = chain;
            }

            let (text, run_report) = wordseq_experiment::preview(&config)?;
            info!(seed = run_report.seed, "Preview generated");
            print!("{}", text);
        }

        Commands::Catalog { config } => {
            let config = match config {
                Some(path) => ExperimentConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => ExperimentConfig::default(),
            };
            let encoder = config.encoder()?;
            let catalog = encoder.catalog();

            for (pattern, code) in catalog.patterns().iter().zip(encoder.codes()) {
                let successors: Vec<String> = catalog
                    .successors(pattern)
                    .map(|next| encoder.encode(&next).map(str::to_string))
                    .collect::<Result<_, _>>()?;
                println!("{} {} -> {}", code, pattern, successors.join(","));
            }
        }
    }

    Ok(())
}
