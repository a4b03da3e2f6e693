use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::password;
use crate::config::AppConfig;
use crate::{database, ingest};

#[derive(Parser)]
#[command(name = "igs")]
#[command(about = "IGS CLI - census tract ingestion and credential utilities")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Load CSV sources into the tract store")]
    Ingest {
        #[arg(
            long = "source",
            help = "CSV file to ingest, repeatable (defaults to IGS_PRIMARY_CSV then IGS_EXTRA_CSV)"
        )]
        sources: Vec<PathBuf>,
    },

    #[command(about = "Print an argon2 hash suitable for AUTH_ADMIN_PASSWORD_HASH")]
    HashPassword {
        #[arg(help = "Plaintext password")]
        password: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Ingest { sources } => run_ingest(sources, output_format).await,
        Commands::HashPassword { password } => run_hash_password(&password, output_format),
    }
}

async fn run_ingest(sources: Vec<PathBuf>, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let sources = if sources.is_empty() {
        config.ingest.sources()
    } else {
        sources
    };

    let pool = database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.url))?;
    let inserted = ingest::ingest(&pool, &sources).await?;
    pool.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "inserted": inserted })),
        OutputFormat::Text => println!("Inserted {} census tracts", inserted),
    }
    Ok(())
}

fn run_hash_password(plaintext: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let hashword = password::hash(plaintext).map_err(|e| anyhow::anyhow!("hashing failed: {}", e))?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "hash": hashword })),
        OutputFormat::Text => println!("{}", hashword),
    }
    Ok(())
}
