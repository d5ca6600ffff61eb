//! 🚀 tixdash-cli: the front door, the bouncer, the maitre d' of tixdash.
//!
//! 📦 Thin CLI wrapper: sets up logging, loads config, turns flags into a filter
//! patch, and lets the library do the heavy lifting. Like a manager. 🦆

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tixdash::filters::FilterPatch;
use tixdash::{DashboardQuery, TicketField};

// -- 🔧 default config file, picked up only if it actually exists
const DEFAULT_CONFIG_FILE: &str = "tixdash.toml";

/// 🎫 Filter and summarize a batch of support tickets.
#[derive(Debug, Parser)]
#[command(name = "tixdash", version, about)]
struct Cli {
    /// TOML config file. Falls back to ./tixdash.toml if present, else env vars only.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start of the date window (inclusive), e.g. 2024-01-01.
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<DateTime<Utc>>,

    /// End of the date window (inclusive). A bare date covers that whole day.
    #[arg(long, value_parser = parse_end_date_arg)]
    to: Option<DateTime<Utc>>,

    #[arg(long)]
    ticket_number: Option<String>,

    #[arg(long)]
    technology: Option<String>,

    #[arg(long)]
    client: Option<String>,

    #[arg(long)]
    ticket_type: Option<String>,

    #[arg(long)]
    assigned_to: Option<String>,

    /// Exact status, or the classes "Open" / "Closed".
    #[arg(long)]
    status: Option<String>,

    /// Drill into a category after filtering, e.g. status=open or client=Acme.
    #[arg(long, value_parser = parse_selection_arg)]
    select: Option<(String, String)>,

    /// Print the facet values for every field.
    #[arg(long)]
    facets: bool,

    /// Print the filtered tickets.
    #[arg(long)]
    tickets: bool,
}

fn parse_date_arg(raw: &str) -> Result<DateTime<Utc>, String> {
    tixdash::dates::parse_ticket_date(raw).ok_or_else(|| format!("'{raw}' is not a date we recognize"))
}

fn parse_end_date_arg(raw: &str) -> Result<DateTime<Utc>, String> {
    tixdash::dates::parse_end_of_day(raw).ok_or_else(|| format!("'{raw}' is not a date we recognize"))
}

fn parse_selection_arg(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((category, value)) if !category.trim().is_empty() => {
            Ok((category.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("'{raw}' should look like category=value")),
    }
}

impl Cli {
    fn into_query(self) -> DashboardQuery {
        let mut patch = FilterPatch::default();
        patch.start_date = self.from;
        patch.end_date = self.to;

        let selectors = [
            (TicketField::TicketNumber, self.ticket_number),
            (TicketField::Technology, self.technology),
            (TicketField::Client, self.client),
            (TicketField::TicketType, self.ticket_type),
            (TicketField::AssignedTo, self.assigned_to),
            (TicketField::Status, self.status),
        ];
        for (field, value) in selectors {
            if let Some(value) = value {
                patch = patch.with(field, value);
            }
        }

        DashboardQuery {
            patch,
            select: self.select,
            show_facets: self.facets,
            show_tickets: self.tickets,
        }
    }
}

/// 🔍 Work out which config file to use, if any.
fn resolve_config_path(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            // 🔒 an explicit path that doesn't exist is a mistake, not a suggestion
            let exists = path.try_exists().with_context(|| {
                format!("💀 Couldn't check whether '{}' exists", path.display())
            })?;
            anyhow::ensure!(
                exists,
                "💀 Configuration file '{}' does not exist. If it's a relative path, \
                 double check your cwd, or use an absolute path to be absolutely certain.",
                path.display()
            );
            Ok(Some(path))
        }
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            Ok(fallback.is_file().then(|| fallback.to_path_buf()))
        }
    }
}

fn main() {
    // 📡 Set up tracing, because println! debugging is a lifestyle choice we're moving past
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = resolve_config_path(cli.config.clone())?;
    let app_config = tixdash::app_config::load_config(config_path.as_deref())
        .context("💀 Couldn't load the config. Make sure you didn't forget something obvious.")?;

    let rendered = tixdash::run(app_config, cli.into_query())?;
    println!("{rendered}");
    Ok(())
}
