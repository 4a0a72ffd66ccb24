//! Docs-Scout main entry point
//!
//! This is the command-line interface for crawling documentation sites and
//! searching the saved collections.

use anyhow::{bail, Context};
use clap::Parser;
use docs_scout::config::{load_config_with_hash, Config, SiteEntry};
use docs_scout::crawler::crawl_sites;
use docs_scout::events::{EventSink, TracingSink};
use docs_scout::report::{
    generate_markdown_summary, load_statistics, print_statistics, CrawlSummary,
};
use docs_scout::storage::{open_store, DocumentStore};
use docs_scout::{Document, SearchEngine, SearchResponse};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Docs-Scout: crawl vendor documentation and answer how-to questions
///
/// Docs-Scout crawls each configured documentation site into a collection
/// of structured pages, then searches those collections with exact,
/// stemmed, heading and fuzzy matching.
#[derive(Parser, Debug)]
#[command(name = "docs-scout")]
#[command(version)]
#[command(about = "Crawl documentation sites and search them", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "query"])]
    dry_run: bool,

    /// Show statistics for the saved collections and exit
    #[arg(long, conflicts_with_all = ["dry_run", "query"])]
    stats: bool,

    /// Search the saved collections instead of crawling
    #[arg(long, value_name = "TEXT", conflicts_with_all = ["dry_run", "stats"])]
    query: Option<String>,

    /// Restrict crawling or searching to one configured site
    #[arg(long, value_name = "ID")]
    site: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let sites = select_sites(&config, cli.site.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, &sites);
        Ok(())
    } else if cli.stats {
        handle_stats(&config)
    } else if let Some(query) = &cli.query {
        handle_query(&config, &sites, query)
    } else {
        handle_crawl(&config, &sites, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_scout=info,warn"),
            1 => EnvFilter::new("docs_scout=debug,info"),
            2 => EnvFilter::new("docs_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Every configured site, or just the one named by `--site`
fn select_sites(config: &Config, site: Option<&str>) -> anyhow::Result<Vec<SiteEntry>> {
    match site {
        Some(id) => match config.site(id) {
            Some(entry) => Ok(vec![entry.clone()]),
            None => bail!(
                "Unknown site '{}' (configured: {})",
                id,
                config.sites.iter().map(|s| s.id.as_str()).collect::<Vec<_>>().join(", ")
            ),
        },
        None => Ok(config.sites.clone()),
    }
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config, sites: &[SiteEntry]) {
    println!("=== Docs-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per site: {}", config.crawler.max_pages);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Backend: {:?}", config.output.backend);
    println!("  Docs dir: {}", config.output.docs_dir);
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nContent selectors: {}", config.extraction.content_selectors.join(", "));
    println!(
        "Search: fuzzy threshold {}, excerpt {} chars",
        config.search.fuzzy_threshold, config.search.excerpt_chars
    );

    println!("\nSites ({}):", sites.len());
    for site in sites {
        println!(
            "  - {} -> {} (max {} pages)",
            site.id,
            site.base_url,
            config.page_budget(site)
        );
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} pages",
        sites.iter().map(|s| config.page_budget(s)).sum::<usize>()
    );
}

/// Handles the --stats mode: shows statistics for every saved collection
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.output).context("Failed to open document store")?;
    let stats = load_statistics(store.as_ref()).context("Failed to read collections")?;
    print_statistics(&store.location(), &stats);
    Ok(())
}

/// Handles the --query mode: searches the selected collections
fn handle_query(config: &Config, sites: &[SiteEntry], query: &str) -> anyhow::Result<()> {
    let store = open_store(&config.output).context("Failed to open document store")?;

    let mut documents: Vec<Document> = Vec::new();
    for site in sites {
        let loaded = store
            .load(&site.id)
            .with_context(|| format!("Failed to load collection '{}'", site.id))?;
        if let Some(warning) = loaded.warning {
            tracing::warn!("{}", warning);
        }
        documents.extend(loaded.documents);
    }

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let engine = SearchEngine::new(&config.search, sink);
    let response = engine.search(query, &documents)?;

    match response {
        SearchResponse::Matches(results) => {
            println!("Found {} results for \"{}\":\n", results.len(), query.trim());
            for result in results {
                println!("### {}", result.title);
                println!("URL: {}", result.url);
                println!("Excerpt: {}", result.excerpt);
                println!("Match Type: {}", result.match_kind);
                println!();
            }
        }
        SearchResponse::NotFound { message } => println!("{}", message),
    }

    Ok(())
}

/// Handles the main crawl operation: crawl and save each site, then summarize
async fn handle_crawl(
    config: &Config,
    sites: &[SiteEntry],
    config_hash: &str,
) -> anyhow::Result<()> {
    tracing::info!("Crawling {} site(s)", sites.len());

    let mut store = open_store(&config.output).context("Failed to open document store")?;
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let reports = crawl_sites(config, sites, sink, |report| {
        store.save(&report.site_id, report.documents())?;
        tracing::info!(
            "Saved {} documents for {} to {}",
            report.collection.len(),
            report.site_id,
            store.location()
        );
        Ok(())
    })
    .await
    .context("Crawl failed")?;

    let summary = CrawlSummary::from_reports(&reports, config_hash);
    let summary_path = Path::new(&config.output.summary_path);
    generate_markdown_summary(&summary, summary_path)
        .with_context(|| format!("Failed to write summary to {}", summary_path.display()))?;

    tracing::info!(
        "Crawl completed: {} documents from {} pages ({} failures)",
        summary.total_documents(),
        summary.total_processed(),
        summary.total_failures()
    );
    println!("✓ Summary written to: {}", summary_path.display());

    Ok(())
}
