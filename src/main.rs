mod config;
mod crawl;
mod enrich;
mod failure;
mod fetch;
mod geo;
mod model;
mod output;
mod photo;
mod site;
mod state;
mod storage;
mod text;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use crate::config::Credentials;
use crate::crawl::{CrawlPolicy, Crawler};
use crate::enrich::google::{GoogleGeocoder, GoogleTranslate};
use crate::enrich::openai::OpenAiSummarizer;
use crate::fetch::HttpFetcher;
use crate::model::Language;
use crate::output::RunOutput;
use crate::state::DoneLog;
use crate::storage::SupabaseStorage;

#[derive(Parser)]
#[command(name = "kmap_scraper", about = "Travel content ingestion for the kmap catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl one source site, resuming from its done-log
    Run {
        /// Source name (see `sources`)
        #[arg(short, long)]
        source: String,
        /// Root output directory; the source's own subdirectory goes under it
        #[arg(short, long, default_value = "./result")]
        out: PathBuf,
        /// Max detail items to process this run
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Per-item latency floor in milliseconds (overrides the source default)
        #[arg(long = "interval", value_name = "MS")]
        interval_ms: Option<u64>,
        /// Pin the content language ("en" or "ja"), skipping detection
        #[arg(long)]
        lang: Option<String>,
        /// Treat a partially failed photo set as a skip instead of keeping the rest
        #[arg(long)]
        no_partial: bool,
    },
    /// Re-export CSVs from an existing run directory
    Export {
        /// Run directory holding the .jsonl logs
        dir: PathBuf,
    },
    /// Show done/failure counts for a run directory
    Report {
        dir: PathBuf,
    },
    /// List the supported source sites
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { source, out, limit, interval_ms, lang, no_partial } => {
            let Some(adapter) = site::by_name(&source) else {
                anyhow::bail!(
                    "unknown source '{}' (available: {})",
                    source,
                    site::names().join(", ")
                );
            };
            let pinned_language = match lang.as_deref() {
                Some(code) => Some(Language::parse(code).ok_or_else(|| {
                    anyhow::anyhow!("unsupported language '{}' (expected en or ja)", code)
                })?),
                None => None,
            };

            let creds = Credentials::from_env()?;
            let output = RunOutput::create(&out.join(adapter.output_dir()))?;
            let done = DoneLog::open(&output.done_path())?;

            let mut crawler = Crawler {
                fetcher: Box::new(HttpFetcher::new()?),
                detector: Box::new(GoogleTranslate::new(&creds.google_translation_api_key)),
                summarizer: Box::new(OpenAiSummarizer::new(&creds.openai_api_key)),
                geocoder: Box::new(GoogleGeocoder::new(&creds.google_map_api_key)),
                translator: Box::new(GoogleTranslate::new(&creds.google_translation_api_key)),
                storage: Box::new(SupabaseStorage::new(
                    &creds.supabase_url,
                    &creds.supabase_api_key,
                    &creds.supabase_bucket,
                )),
                adapter,
                output,
                done,
                policy: CrawlPolicy {
                    interval: interval_ms.map(Duration::from_millis),
                    pinned_language,
                    accept_partial_photos: !no_partial,
                    limit,
                },
            };

            let stats = crawler.run().await?;
            println!(
                "{} lists, {} items ({} completed, {} skipped)",
                stats.lists, stats.items, stats.completed, stats.skipped
            );
            Ok(())
        }
        Commands::Export { dir } => {
            let written = output::export_run(&dir)?;
            if written.is_empty() {
                println!("Nothing to export in {}", dir.display());
            } else {
                for path in &written {
                    println!("wrote {}", path.display());
                }
            }
            Ok(())
        }
        Commands::Report { dir } => {
            let done = DoneLog::open(&dir.join("done.txt"))?;
            println!("Done keys: {}", done.len());
            for (kind, n) in output::report_counts(&dir)? {
                println!("{:<20} {}", kind.as_str(), n);
            }
            Ok(())
        }
        Commands::Sources => {
            for name in site::names() {
                println!("{}", name);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
