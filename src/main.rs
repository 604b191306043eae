//! Builds the product recommendation report from order and product CSV exports.
//!
//! ```bash
//! product-correlation --orders order_details.csv --products products.csv --output recommendations.csv
//! ```

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use product_correlation::{io as tables, Recommender};

#[derive(Parser)]
#[command(name = "product-correlation")]
#[command(about = "Recommend for each product the product whose order quantities correlate best with it")]
struct Cli {
    /// Order details CSV with OrderID, ProductID and Quantity columns
    #[arg(long)]
    orders: PathBuf,

    /// Products CSV with ProductID and ProductName columns
    #[arg(long)]
    products: PathBuf,

    /// Where to write the report, stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the most ordered products to this CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of entries in the most ordered and most recommended summaries
    #[arg(long, default_value = "10")]
    top: usize,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let order_lines = tables::load_order_lines(&cli.orders)
        .with_context(|| format!("Failed to load order lines from {:?}", cli.orders))?;
    let products = tables::load_products(&cli.products)
        .with_context(|| format!("Failed to load products from {:?}", cli.products))?;

    let recommender = Recommender::new(&order_lines, &products)
        .context("Failed to build the quantity matrix")?;

    let matrix = recommender.matrix();
    info!(orders = matrix.num_orders(), products = matrix.num_products(), "quantity matrix ready");

    let most_ordered = matrix.most_ordered(cli.top);
    for summary in &most_ordered {
        info!(product = summary.product_id, orders = summary.orders, quantity = summary.quantity, "most ordered");
    }

    if let Some(path) = &cli.summary {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        tables::write_summaries(&most_ordered, file)?;
    }

    let report = recommender.report();

    for (product_id, count) in report.recommendation_counts().into_iter().take(cli.top) {
        info!(product = product_id, count, "most recommended");
    }

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create file: {:?}", path))?;
            tables::write_records(report.records(), file)?;
            info!(records = report.len(), path = ?path, "wrote report");
        }
        None => tables::write_records(report.records(), io::stdout().lock())?,
    }

    Ok(())
}
