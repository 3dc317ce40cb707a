use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use tray_core::{MenuCatalog, OrderConfig, default_menu};
use tray_cli::{CurrencyStyle, Selections, app, logging, utils};
use tray_data::MenuLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Build a lunch order from the menu and print the receipt.
///
/// Items are chosen by their menu key (see `--list`).
#[derive(Debug, Parser)]
#[command(name = "lunch-tray", version, about)]
struct Cli {
    /// Menu CSV file (key,name,category,price,description).
    /// The built-in menu is used when omitted.
    #[arg(long)]
    menu: Option<PathBuf>,

    /// Print the menu before the receipt.
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Entree menu key.
    #[arg(long)]
    entree: Option<String>,

    /// Side dish menu key.
    #[arg(long)]
    side: Option<String>,

    /// Accompaniment menu key.
    #[arg(long)]
    accompaniment: Option<String>,

    /// Sales tax rate, as a fraction (`0.08`) or percentage (`8%`).
    #[arg(long, default_value = "0.08")]
    tax_rate: String,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level);
    if let Some(path) = &cli.log_file {
        logging::log_to_file(path)?;
    }

    let catalog: Arc<dyn MenuCatalog> = match &cli.menu {
        Some(path) => {
            debug!(path = %path.display(), "loading menu");
            let catalog = MenuLoader::load_path(path)
                .with_context(|| format!("Failed to load menu: {}", path.display()))?;
            Arc::new(catalog)
        }
        None => Arc::new(default_menu()),
    };
    info!(items = catalog.len(), "menu ready");

    let tax_rate = utils::parse_decimal(&cli.tax_rate)
        .with_context(|| format!("Invalid --tax-rate: {}", cli.tax_rate))?;
    let config = OrderConfig::with_tax_rate(tax_rate).context("Invalid --tax-rate")?;
    let style = CurrencyStyle::default();

    if cli.list {
        println!("{}", app::format_menu(catalog.as_ref(), &style));
    }

    let selections = Selections {
        entree: cli.entree,
        side: cli.side,
        accompaniment: cli.accompaniment,
    };
    let report = app::run_session(catalog, config, &selections, style)?;

    for error in &report.rejected {
        eprintln!("skipped: {error}");
    }
    println!("{}", report.summary);
    if !report.complete {
        eprintln!("note: order is missing at least one course");
    }

    Ok(())
}
