use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use tpbsearch::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use tpbsearch::sort::sort_tokens;
use tpbsearch::{ProxyConfig, SearchConfig, SearchOutcome, Searcher};

#[derive(Parser)]
#[command(name = "tpbsearch")]
#[command(about = "Search Pirate Bay style torrent listings", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Print records as JSON instead of a listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Base url of the site
    #[arg(long, env = "TPB_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Proxy for every request, e.g. socks5h://127.0.0.1:9050
    #[arg(long, env = "TPB_PROXY", global = true)]
    proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "TPB_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    /// Pages fetched at once
    #[arg(long, env = "TPB_CONCURRENCY", default_value_t = 1, global = true)]
    concurrency: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings for a term
    Search {
        /// Search term
        term: String,

        /// Maximum number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        max_pages: u32,

        /// Sort token, e.g. seeds_desc (see `sorts`)
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Top torrents
    Top {
        /// Category code
        #[arg(short, long)]
        category: Option<u32>,

        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Top torrents of the last 48 hours
    Top48h {
        /// Category code
        #[arg(short, long)]
        category: Option<u32>,

        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Most recent uploads
    Recent {
        /// Listing page
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        #[arg(short, long)]
        sort: Option<String>,
    },

    /// List the accepted sort tokens
    Sorts,
}

impl ConnectionArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            base_url: self.base_url.clone(),
            proxy: self.proxy.as_ref().map(ProxyConfig::all),
            timeout_secs: self.timeout,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: self.concurrency,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config = cli.connection.config();
    let searcher = Searcher::new(&config)?;

    let outcome = match &cli.command {
        Commands::Search {
            term,
            max_pages,
            sort,
        } => searcher.search(term, *max_pages, sort.as_deref()).await?,
        Commands::Top { category, sort } => searcher.top(*category, sort.as_deref()).await?,
        Commands::Top48h { category, sort } => {
            searcher.top48h(*category, sort.as_deref()).await?
        }
        Commands::Recent { page, sort } => searcher.recent(*page, sort.as_deref()).await?,
        Commands::Sorts => {
            for token in sort_tokens() {
                println!("{}", token);
            }
            return Ok(());
        }
    };

    if !outcome.status.is_complete() {
        warn!(status = ?outcome.status, "Search stopped early; results are partial");
    }
    info!(base_url = %config.base_url, "Done");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_listing(&outcome);
    }

    Ok(())
}

fn print_listing(outcome: &SearchOutcome) {
    if outcome.records.is_empty() {
        println!("No results found");
        return;
    }

    println!("{:-<120}", "");
    for (i, record) in outcome.records.iter().enumerate() {
        println!("{}. {}", i + 1, record.title);
        println!(
            "   Size: {} bytes | Seeders: {} | Leechers: {} | Uploaded: {} | By: {}",
            record.size_bytes, record.seeds, record.leeches, record.uploaded_at, record.uploader
        );
        println!("   Category: {} / {}", record.category, record.subcategory);
        println!("   Magnet: {}", record.magnet_link);
        println!("{:-<120}", "");
    }

    println!("\nTotal results: {} from {} page(s)", outcome.records.len(), outcome.pages_fetched);
}
