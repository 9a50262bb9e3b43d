//! Schema Store CLI
//!
//! Save, read, list and delete configuration schemas in etcd.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use config_schema_store::{AppConfig, SchemaRepository};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-store")]
#[command(about = "Versioned, immutable configuration schema store")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new schema version
    Save {
        /// Key, e.g. "acme/billing/invoice/1.0.0"
        key: String,
        /// YAML schema file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print a schema
    Get {
        /// Key of the schema
        key: String,
    },

    /// Delete a schema
    Delete {
        /// Key of the schema
        key: String,
    },

    /// List schemas under a prefix, oldest version first
    List {
        /// Prefix, e.g. "acme/billing"
        prefix: String,
    },

    /// Show the latest version under a prefix
    Latest {
        /// Prefix, e.g. "acme/billing/invoice"
        prefix: String,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,

    /// Write a default config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "schema-store.toml")]
        output: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = match cli.command {
        Commands::Config { command } => return run_config(&command, cli.config.as_deref()),
        other => other,
    };

    let config = AppConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let repo = SchemaRepository::connect(&config.store)
        .await
        .context("connecting to store")?;

    match command {
        Commands::Save { key, file } => {
            let schema = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            repo.save_schema(&key, &schema).await?;
            println!("✅ Saved {}", key);
        }

        Commands::Get { key } => match repo.get_schema(&key).await? {
            Some(envelope) => {
                println!("# {} (created {})", key, envelope.creation_time.to_rfc3339());
                print!("{}", envelope.schema);
            }
            None => bail!("no schema with key '{}'", key),
        },

        Commands::Delete { key } => {
            repo.delete_schema(&key).await?;
            println!("🗑️  Deleted {}", key);
        }

        Commands::List { prefix } => {
            let records = repo.list_by_prefix(&prefix).await?;
            if records.is_empty() {
                println!("No schemas under '{}'.", prefix);
            } else {
                println!("📚 Schemas under '{}':", prefix);
                for record in records {
                    println!(
                        "  {} {}",
                        record.key(),
                        record.schema_data.creation_time.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }

        Commands::Latest { prefix } => {
            let latest = repo.latest_version(&prefix).await?;
            if latest.is_empty() {
                println!("No versions under '{}'.", prefix);
            } else {
                println!("{}", latest);
            }
        }

        Commands::Config { .. } => {}
    }
    Ok(())
}

fn run_config(command: &ConfigCommands, path: Option<&str>) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = AppConfig::load_from(path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Init { output } => {
            if std::path::Path::new(output).exists() {
                bail!("{} already exists", output);
            }
            AppConfig::default().save(output)?;
            println!("✅ Wrote default configuration to {}", output);
        }
    }
    Ok(())
}
