//! Command-line arguments.
//!
//! Global flags select the backend; each subcommand maps to one fetch that is
//! rendered through the loading/error/success views.

use clap::{ArgAction, Args, Parser, Subcommand};
use storefront_core::config::DEFAULT_API_URL;
use storefront_core::{parse_flag, PriceRange, ProductFilter, RatingFilter, StorefrontConfig};

/// Browse the storefront catalogue from the terminal.
#[derive(Parser, Debug)]
#[command(name = "storefront", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the storefront API.
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Serve requests from the in-memory mock backend (`true` or `false`).
    #[arg(
        long,
        env = "STOREFRONT_USE_MOCK",
        value_name = "BOOL",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = parse_flag,
        global = true
    )]
    pub use_mock: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// The startup configuration these flags describe.
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            api_base_url: self.api_url.clone(),
            use_mock: self.use_mock,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List products, optionally filtered.
    Products(ProductsArgs),

    /// Show one product.
    Product {
        /// Product identifier.
        id: String,
    },

    /// Sign in and show the session user.
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

/// Listing filters.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ProductsArgs {
    /// Case-insensitive name search.
    #[arg(long)]
    pub keyword: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// 1-based page number.
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Lowest price to include.
    #[arg(long)]
    pub price_gte: Option<f64>,

    /// Highest price to include.
    #[arg(long)]
    pub price_lte: Option<f64>,

    /// Only products rated at least this.
    #[arg(long)]
    pub min_rating: Option<f64>,
}

impl ProductsArgs {
    pub fn filter(&self) -> ProductFilter {
        let price = (self.price_gte.is_some() || self.price_lte.is_some()).then_some(PriceRange {
            gte: self.price_gte,
            lte: self.price_lte,
        });
        ProductFilter {
            keyword: self.keyword.clone(),
            category: self.category.clone(),
            page: self.page,
            limit: self.limit,
            price,
            ratings: self.min_rating.map(RatingFilter::AtLeast),
        }
    }
}
