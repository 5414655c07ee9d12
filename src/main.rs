//! SEO Forge - keyword-driven domain appraisal
//!
//! Every subcommand prints a JSON envelope on stdout. Logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use seo_forge::api::{BacklinkSearchRequest, CheckRequest, SeoSearchRequest, TrendRequest};
use seo_forge::{Locale, SeoForge, Settings};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CLI arguments for seo-forge
#[derive(Parser, Debug)]
#[command(name = "seo-forge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rank candidate domain names by SEO value for a keyword")]
struct Cli {
    /// Seed for reproducible simulated figures
    #[arg(long, global = true, value_name = "SEED")]
    seed: Option<u64>,

    /// Skip DNS, WHOIS and Google Trends
    #[arg(long, global = true)]
    offline: bool,

    /// TOML file replacing the built-in data tables
    #[arg(long, global = true, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Domains ranked by estimated SEO value
    Seo {
        keyword: String,
        #[arg(short, long, default_value = "TR")]
        locale: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Available domains above a backlink floor
    Backlinks {
        keyword: String,
        #[arg(short, long, default_value = "TR")]
        locale: String,
        #[arg(short, long, default_value_t = 100)]
        min_backlinks: u64,
        #[arg(short = 'n', long, default_value_t = 15)]
        limit: usize,
    },
    /// Keyword trends and suggestions
    Trends {
        keyword: String,
        #[arg(short, long, default_value = "TR")]
        locale: String,
    },
    /// WHOIS check for a single name (".com" when no extension)
    Check { name: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<seo_forge::SeoForgeError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    seo_forge::init()?;

    let mut settings = Settings::from_env()?;
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if cli.tables.is_some() {
        settings.tables_path = cli.tables.clone();
    }
    if cli.offline {
        settings = Settings {
            probe_delay_ms: 0,
            trend_delay_ms: 0,
            ..settings
        };
    }

    let forge = SeoForge::from_settings(&settings, cli.offline)?;
    tracing::debug!(seed = forge.simulation().seed(), offline = cli.offline, "seo-forge ready");

    match cli.command {
        Command::Seo { keyword, locale, limit } => {
            let request = SeoSearchRequest::new(keyword, Locale::new(locale)).with_limit(limit);
            print_json(&forge.find_seo_domains(&request).await)
        }
        Command::Backlinks {
            keyword,
            locale,
            min_backlinks,
            limit,
        } => {
            let request = BacklinkSearchRequest::new(keyword, Locale::new(locale))
                .with_min_backlinks(min_backlinks)
                .with_limit(limit);
            print_json(&forge.find_backlink_domains(&request).await)
        }
        Command::Trends { keyword, locale } => {
            let request = TrendRequest {
                keyword,
                locale: Locale::new(locale),
            };
            print_json(&forge.fetch_keyword_trends(&request).await)
        }
        Command::Check { name } => print_json(&forge.check_domain(&CheckRequest { domain: name }).await),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{}", json);
    Ok(())
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "seo_forge=debug" } else { "seo_forge=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
