mod cart;
mod catalog;

use std::time::Duration;

use clap::{Parser, Subcommand};
use glowcart_core::{AppConfig, CategoryDefinitions};
use glowcart_store::Storefront;
use glowcart_woo::WooClient;
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;

#[derive(Debug, Parser)]
#[command(name = "glowcart-cli")]
#[command(about = "Storefront catalog and cart against a WooCommerce API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List category keys and how each one queries the catalog
    Categories,
    /// Fetch and print the products of one category
    Fetch {
        /// Category key (e.g. bestSellers, sunCare)
        key: String,
    },
    /// Look up a single product by ID
    Product { id: u64 },
    /// Full-text product search
    Search { term: String },
    /// Inspect or edit the file-backed cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
}

/// Everything a command handler needs, built once per run.
pub(crate) struct App {
    pub config: AppConfig,
    pub definitions: CategoryDefinitions,
    pub client: WooClient,
    pub storefront: Storefront,
}

impl App {
    fn build(config: AppConfig) -> anyhow::Result<Self> {
        let definitions = glowcart_core::load_category_definitions(&config.categories_path)?;
        let client = WooClient::from_config(&config)?;
        let storefront = Storefront::new(Duration::from_secs(config.fetch_timeout_secs));
        Ok(Self {
            config,
            definitions,
            client,
            storefront,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = glowcart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let Some(command) = cli.command else {
        println!("glowcart-cli: run with --help for available commands");
        return Ok(());
    };

    let app = App::build(config)?;
    match command {
        Commands::Categories => catalog::run_categories(&app),
        Commands::Fetch { key } => catalog::run_fetch(&app, &key).await,
        Commands::Product { id } => catalog::run_product(&app, id).await,
        Commands::Search { term } => catalog::run_search(&app, &term).await,
        Commands::Cart { command } => cart::run_cart(&app, command).await,
    }
}

#[cfg(test)]
mod tests;
