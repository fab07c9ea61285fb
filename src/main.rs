//! emi-quote - EMI pricing CLI for smartphone catalogs

use anyhow::Result;
use clap::{Parser, Subcommand};
use emi_quote::commands::{ListCommand, QuoteCommand, QuoteRequest};
use emi_quote::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "emi-quote",
    version,
    about = "EMI pricing for smartphone product pages",
    long_about = "Resolves variant prices, downpayment splits and monthly installments for catalog products."
)]
struct Cli {
    /// Base URL of the catalog API
    #[arg(long, global = true, env = "EMI_API_URL")]
    api_url: Option<String>,

    /// Read products from a JSON file instead of the API
    #[arg(long, global = true, env = "EMI_CATALOG_FILE")]
    catalog: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "EMI_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    #[command(alias = "ls")]
    List,

    /// Price a product with EMI plans
    #[command(alias = "q")]
    Quote {
        /// Product slug
        slug: String,

        /// Color key or label
        #[arg(long)]
        color: Option<String>,

        /// Storage key or label
        #[arg(long)]
        storage: Option<String>,

        /// Finish key or label
        #[arg(long)]
        finish: Option<String>,

        /// Downpayment percentage
        #[arg(short, long)]
        downpayment: Option<u8>,

        /// EMI plan identifier
        #[arg(short, long)]
        plan: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_file = Some(catalog);
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::List => {
            let cmd = ListCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Quote { slug, color, storage, finish, downpayment, plan } => {
            let request = QuoteRequest { color, storage, finish, downpayment, plan };

            let cmd = QuoteCommand::new(config);
            let output = cmd.execute(&slug, &request).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
