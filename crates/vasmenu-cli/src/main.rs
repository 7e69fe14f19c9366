use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use vasmenu_core::ProviderRegistry;
use vasmenu_engine::{CatalogService, MenuConfig, SearchFilters};
use vasmenu_provider::{AdapterRegistry, CatalogClient};

#[derive(Debug, Parser)]
#[command(name = "vasmenu-cli")]
#[command(about = "VAS menu catalog sync and query tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the initial sync pass and keep the per-provider schedulers
    /// running until ctrl-c.
    Run,
    /// Sync once (all providers, or one with --provider) and print the
    /// reports.
    Sync {
        #[arg(long)]
        provider: Option<String>,
    },
    /// Generate and print the current menu, or a single category bucket.
    Menu {
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the featured shelf.
    Featured,
    /// Search the menu.
    Search {
        query: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        available_only: bool,
        #[arg(long)]
        max_price: Option<Decimal>,
    },
    /// Print per-provider sync status and cache totals.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = vasmenu_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, providers_path = %config.providers_path.display(), "starting vasmenu");

    let providers = vasmenu_core::load_providers(&config.providers_path)?;
    let registry = ProviderRegistry::from(providers);
    let fetcher = Arc::new(CatalogClient::new(&config.user_agent)?);
    let service = Arc::new(CatalogService::new(
        registry,
        fetcher,
        AdapterRegistry::with_builtin(),
        MenuConfig {
            max_per_category: config.max_per_category,
            max_featured: config.max_featured,
        },
    ));

    match cli.command {
        Commands::Run => run(service).await?,
        Commands::Sync { provider } => sync(&service, provider.as_deref()).await?,
        Commands::Menu { category } => menu(&service, category.as_deref()).await?,
        Commands::Featured => {
            service.sync_all().await;
            print_json(&service.featured_products())?;
        }
        Commands::Search {
            query,
            category,
            provider,
            available_only,
            max_price,
        } => {
            service.sync_all().await;
            let filters = SearchFilters {
                category,
                provider_id: provider,
                available_only,
                max_price,
            };
            print_json(&service.search(&query, &filters))?;
        }
        Commands::Status => {
            service.sync_all().await;
            print_json(&service.stats())?;
        }
    }

    Ok(())
}

/// Initial sync, recurring per-provider jobs, graceful shutdown.
async fn run(service: Arc<CatalogService>) -> anyhow::Result<()> {
    let scheduler = vasmenu_engine::start(Arc::clone(&service)).await?;
    shutdown_signal().await;
    drop(scheduler);
    Ok(())
}

async fn sync(service: &CatalogService, provider: Option<&str>) -> anyhow::Result<()> {
    let reports = match provider {
        Some(id) => vec![service.sync_provider(id).await?],
        None => service.sync_all().await,
    };
    print_json(&reports)
}

async fn menu(service: &CatalogService, category: Option<&str>) -> anyhow::Result<()> {
    service.sync_all().await;
    match category {
        Some(name) => {
            let bucket = service
                .menu_by_category(name)
                .ok_or_else(|| anyhow::anyhow!("no category named '{name}' in the current menu"))?;
            print_json(&bucket)
        }
        None => print_json(&*service.current_menu()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping provider sync jobs");
}
