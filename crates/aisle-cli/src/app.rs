//! The `aisle` application: logging, catalog loading, and command dispatch.

use std::sync::Arc;

use aisle_core::{CatalogSource, CatalogStore, JsonCatalogSource, Product, Result, SampleCatalog};
use aisle_dialogue::DialogueEngine;
use aisle_vector::{RetrievalEngine, create_provider};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::cli::{BaseCommand, CliArgs};
use crate::commands;
use crate::config::AisleConfig;
use crate::config_handlers;

// ============================================================================
// AisleApp
// ============================================================================

/// The configured application.
///
/// Services are built per invocation in construction order: catalog store,
/// then retrieval engine, then dialogue engine.
#[derive(Debug, Clone)]
pub struct AisleApp {
    config: AisleConfig,
    config_path: Option<String>,
    verbose: bool,
}

impl AisleApp {
    /// Create from CLI args, loading config from file/env.
    ///
    /// `--catalog` takes precedence over `catalog.path`.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let mut config = AisleConfig::load(args.config.as_deref())?;
        if let Some(catalog) = &args.catalog {
            config.catalog.path = Some(catalog.clone());
        }
        Ok(Self {
            config,
            config_path: args.config.clone(),
            verbose: args.verbose,
        })
    }

    /// Create from an already loaded config.
    pub fn new(config: AisleConfig) -> Self {
        Self {
            config,
            config_path: None,
            verbose: false,
        }
    }

    /// The effective configuration.
    pub fn config(&self) -> &AisleConfig {
        &self.config
    }

    /// Initialise tracing-based logging on stderr.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    // ------------------------------------------------------------------------
    // Service construction
    // ------------------------------------------------------------------------

    /// Read the configured catalog source.
    pub fn load_products(&self) -> Result<Vec<Product>> {
        let source: Box<dyn CatalogSource> = match &self.config.catalog.path {
            Some(path) => Box::new(JsonCatalogSource::new(path)),
            None => Box::new(SampleCatalog),
        };
        let products = source.products()?;
        tracing::debug!("Loaded {} products from {} source", products.len(), source.name());
        Ok(products)
    }

    /// A catalog store holding the configured catalog, without vectors.
    pub fn catalog(&self) -> Result<Arc<CatalogStore>> {
        let store = Arc::new(CatalogStore::new());
        store.load(self.load_products()?);
        Ok(store)
    }

    /// An indexed retrieval engine over the configured catalog.
    pub async fn retrieval(&self) -> Result<Arc<RetrievalEngine>> {
        let provider = create_provider(&self.config.embedding)?;
        let retrieval = RetrievalEngine::new(Arc::new(CatalogStore::new()), provider)
            .with_config(self.config.retrieval.clone());
        retrieval.refresh(self.load_products()?).await?;
        Ok(Arc::new(retrieval))
    }

    /// A dialogue engine on top of [`retrieval`](Self::retrieval).
    pub async fn dialogue(&self) -> Result<DialogueEngine> {
        Ok(DialogueEngine::new(self.retrieval().await?)?.with_config(self.config.dialogue.clone()))
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        Self::init_logging(args.verbose, args.quiet);

        match args.command {
            Some(BaseCommand::Config(config_cmd)) => {
                config_handlers::handle_config_command(self.config_path.as_deref(), config_cmd.command)
            }
            Some(command) => {
                let output = self.execute(command).await?;
                print_json(&output)
            }
            None => print_json(&commands::version()),
        }
    }

    /// Execute a non-config command and return its JSON output.
    pub async fn execute(&self, command: BaseCommand) -> Result<Value> {
        match command {
            BaseCommand::Search {
                query,
                limit,
                min_score,
                filter,
            } => {
                let retrieval = self.retrieval().await?;
                commands::search(&retrieval, &query, limit, min_score, filter.to_filter()).await
            }
            BaseCommand::Chat { message, user_id } => {
                if let Some(reply) = commands::empty_message(&message) {
                    return Ok(reply);
                }
                let dialogue = self.dialogue().await?;
                commands::chat(&dialogue, &message, user_id.as_deref(), self.verbose).await
            }
            BaseCommand::Products { filter } => {
                commands::products(&self.catalog()?.snapshot(), &filter.to_filter())
            }
            BaseCommand::Product { id } => commands::product(&self.catalog()?.snapshot(), id),
            BaseCommand::Categories => Ok(commands::categories(&self.catalog()?.snapshot())),
            BaseCommand::Brands => Ok(commands::brands(&self.catalog()?.snapshot())),
            BaseCommand::Stats => commands::stats(&self.catalog()?.snapshot()),
            BaseCommand::Deal => Ok(commands::deal(&self.catalog()?.snapshot())),
            BaseCommand::Health => Ok(commands::health(&*self.retrieval().await?)),
            BaseCommand::Version => Ok(commands::version()),
            BaseCommand::Config(_) => Err(aisle_core::Error::config(
                "config commands print directly and have no JSON output",
            )),
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
