//! CLI argument parsing and command definitions.

use aisle_core::ProductFilter;
use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Semantic product search and a shopping assistant over a product catalog.
#[derive(Parser, Debug)]
#[command(name = "aisle", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "AISLE_CONFIG")]
    pub config: Option<String>,

    /// JSON catalog file (overrides `catalog.path`; default is the bundled sample).
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<BaseCommand>,
}

/// Category and price bounds shared by `search` and `products`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this category (case-insensitive).
    #[arg(long)]
    pub category: Option<String>,

    /// Inclusive lower price bound.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Inclusive upper price bound.
    #[arg(long)]
    pub max_price: Option<f64>,
}

impl FilterArgs {
    /// Convert into a catalog filter.
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// Aisle commands.
#[derive(Subcommand, Debug)]
pub enum BaseCommand {
    /// Rank products by semantic similarity to a query.
    Search {
        /// Query text (empty browses the catalog).
        query: String,

        /// Maximum number of results.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum similarity score.
        #[arg(long)]
        min_score: Option<f32>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Send one message to the shopping assistant.
    Chat {
        /// The message.
        message: String,

        /// Caller identifier, for logs only.
        #[arg(long)]
        user_id: Option<String>,
    },

    /// List products, optionally filtered.
    Products {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show one product by id.
    Product {
        /// Product id.
        id: u64,
    },

    /// List distinct categories.
    Categories,

    /// List distinct brands.
    Brands,

    /// Catalog statistics.
    Stats,

    /// The cheapest well-rated product.
    Deal,

    /// Print version information.
    Version,

    /// Check that the catalog loads and indexes.
    Health,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
