//! Almas & Dimas CLI - the jewelry storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the current cart
//! almas cart show
//!
//! # Add two units of a product with selected options
//! almas cart add 64f1c2ab9d3e -q 2 -o Metal=Gold -o Size=52
//!
//! # Browse the catalog
//! almas product list --category bagues --max-price 10000
//!
//! # Sign in with a cart API token
//! almas login --token <TOKEN>
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and mutate the shopping cart
//! - `product` - Browse the catalog
//! - `login` / `logout` - Manage the stored API token

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use almas_dimas_storefront::products::ProductFilters;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "almas")]
#[command(author, version, about = "Almas & Dimas storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and mutate the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Store a cart API token and switch to the server cart
    Login {
        /// Bearer token for the cart API
        #[arg(long)]
        token: String,
    },
    /// Drop the stored token and return to the guest cart
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show {
        /// Print the cart as JSON instead of formatted lines
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Selected option as NAME=VALUE (repeatable)
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Set the quantity of a cart line (zero or less removes it)
    Update {
        /// Product id
        product_id: String,

        /// New number of units
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart, whatever its options
    Remove {
        /// Product id
        product_id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Show one product
    Show {
        /// Product id
        product_id: String,
    },
    /// List products
    List {
        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Products per page
        #[arg(long)]
        limit: Option<u32>,

        /// Category slug
        #[arg(long)]
        category: Option<String>,

        /// Free-text search
        #[arg(long)]
        search: Option<String>,

        /// Minimum price in MAD
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Maximum price in MAD
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Field to sort by (e.g. price, name)
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort direction (asc or desc)
        #[arg(long)]
        sort_order: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Default to info for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "almas=info,almas_dimas_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(json).await?,
            CartAction::Add {
                product_id,
                quantity,
                options,
            } => commands::cart::add(&product_id, quantity, &options).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&product_id).await?,
            CartAction::Clear => commands::cart::clear().await?,
        },
        Commands::Product { action } => match action {
            ProductAction::Show { product_id } => commands::catalog::show(&product_id).await?,
            ProductAction::List {
                page,
                limit,
                category,
                search,
                min_price,
                max_price,
                sort_by,
                sort_order,
            } => {
                let sort_order = sort_order
                    .as_deref()
                    .map(commands::catalog::parse_sort_order)
                    .transpose()?;
                let filters = ProductFilters {
                    page,
                    limit,
                    category,
                    min_price,
                    max_price,
                    search,
                    sort_by,
                    sort_order,
                };
                commands::catalog::list(&filters).await?;
            }
        },
        Commands::Login { token } => commands::session::login(&token).await?,
        Commands::Logout => commands::session::logout()?,
    }
    Ok(())
}
