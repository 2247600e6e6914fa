// Entry point: parse the command line, load both datasets once, then
// either run the interactive menu or render a single tab.
mod brands;
mod config;
mod content;
mod dashboard;
mod error;
mod loader;
mod logging;
mod navigation;
mod output;
mod render;
mod segments;
mod shell;
mod spend;
mod summary;
mod types;
mod util;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use dashboard::Dashboard;
use navigation::{Dataset, Selections, SpendMode, Tab};
use types::{Month, Segment};

#[derive(Parser)]
#[command(name = "saka-dashboard")]
#[command(about = "Customer segmentation dashboard over the SAKA retail and wholesale datasets", long_about = None)]
struct Cli {
    /// TOML config file (defaults to ./dashboard.toml, then built-in values)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wholesale transactions CSV, overrides the config
    #[arg(long)]
    wholesale: Option<PathBuf>,
    /// Retail transactions CSV, overrides the config
    #[arg(long)]
    retail: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (the default)
    Shell,
    /// Render one tab with the given selections
    Show {
        #[arg(long, value_enum, default_value_t = Dataset::Retail)]
        dataset: Dataset,
        #[arg(long, value_enum, default_value_t = Tab::Home)]
        tab: Tab,
        /// Customer name (or part of it) to look up
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        segment: Option<Segment>,
        /// Average spend per month instead of over all months
        #[arg(long)]
        monthly: bool,
        #[arg(long, value_delimiter = ',')]
        months: Option<Vec<Month>>,
        #[arg(long)]
        top_customers: Option<usize>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        top_brands: Option<usize>,
        /// Raw Data page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Also write the tab's tables as CSV/JSON into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_source) =
        config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    logging::initialize(&config.logging.level).context("failed to initialize logging")?;
    tracing::info!(source = %config_source, "configuration loaded");

    if let Some(path) = cli.wholesale {
        config.data.wholesale = path;
    }
    if let Some(path) = cli.retail {
        config.data.retail = path;
    }

    let dashboard = Dashboard::load(&config.data).context("failed to load source data")?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            shell::Shell::new(&dashboard, &config.display, stdin.lock(), stdout.lock()).run()?;
        }
        Commands::Show {
            dataset,
            tab,
            customer,
            segment,
            monthly,
            months,
            top_customers,
            category,
            top_brands,
            page,
            export,
        } => {
            let mut selections = Selections::new(&config.display);
            selections.customer_query = customer;
            selections.segment = segment;
            if monthly {
                selections.spend_mode = SpendMode::IndividualMonths;
            }
            if let Some(months) = months {
                selections.months = months;
            }
            if let Some(n) = top_customers {
                selections.top_customers = n;
            }
            selections.category = category;
            selections.top_brands = top_brands;
            selections.page = page;

            let view = dashboard.derive_view(dataset, tab, &selections, config.display.raw_rows);
            println!("{}", render::render_view(dataset, tab, &view, &config.display));

            if let Some(dir) = export {
                let written = render::export_view(&dir, dataset, tab, &selections, &view)
                    .with_context(|| format!("failed to export to {}", dir.display()))?;
                println!("(Tables exported to {})", dir.display());
                for path in written {
                    println!("- {}", path.display());
                }
            }
        }
    }

    Ok(())
}
