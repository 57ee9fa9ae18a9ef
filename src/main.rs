mod check;
mod config;
mod fetch;
mod parser;
mod stats;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use config::ParserConfig;

#[derive(Parser)]
#[command(name = "diary_parser", about = "Turn a plain-text diary transcription into dated NDJSON entries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the source text and trim it to the diary span
    Fetch {
        #[arg(long, default_value = config::SOURCE_URL)]
        url: String,
        #[arg(short, long, default_value = config::TRIMMED_PATH)]
        output: PathBuf,
    },
    /// Split the trimmed text into dated entries with footnotes
    Parse {
        #[arg(short, long, default_value = config::TRIMMED_PATH)]
        input: PathBuf,
        #[arg(short, long, default_value = config::PARSED_PATH)]
        output: PathBuf,
        /// Brackets at least this long are treated as footnotes
        #[arg(long)]
        max_restoration_len: Option<usize>,
        /// Banner text that opens a skipped bookmarks block
        #[arg(long)]
        bookmarks_marker: Option<String>,
        /// Close an unterminated footnote block at the next header or entry start
        #[arg(long)]
        close_footnote_on_structure: bool,
    },
    /// Per-entry word and keyword counts as CSV
    Stats {
        #[arg(short, long, default_value = config::PARSED_PATH)]
        input: PathBuf,
        #[arg(short, long, default_value = config::STATS_PATH)]
        output: PathBuf,
    },
    /// Report entries whose date goes backwards
    Check {
        #[arg(short, long, default_value = config::PARSED_PATH)]
        input: PathBuf,
    },
    /// Fetch + parse + stats + check with default paths
    Run,
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
        Commands::Fetch { url, output } => {
            let size = fetch::fetch_and_trim(&url, config::START_MARKER, config::END_MARKER, &output).await?;
            println!("Success! Trimmed file size: {} characters.", size);
            Ok(())
        }
        Commands::Parse {
            input,
            output,
            max_restoration_len,
            bookmarks_marker,
            close_footnote_on_structure,
        } => {
            let mut cfg = ParserConfig::default();
            if let Some(len) = max_restoration_len {
                cfg.brackets.max_restoration_len = len;
            }
            if let Some(marker) = bookmarks_marker {
                cfg.bookmarks_marker = marker;
            }
            cfg.close_footnote_on_structure = close_footnote_on_structure;

            let n = parser::parse_file(&input, &output, &cfg)?;
            println!("Processed {} entries.", n);
            Ok(())
        }
        Commands::Stats { input, output } => {
            stats::generate(&input, &output)?;
            Ok(())
        }
        Commands::Check { input } => {
            check::check_file(&input)?;
            Ok(())
        }
        Commands::Run => {
            let trimmed = Path::new(config::TRIMMED_PATH);
            let parsed = Path::new(config::PARSED_PATH);

            // Phase 1: Fetch
            let t_fetch = Instant::now();
            let size = fetch::fetch_and_trim(config::SOURCE_URL, config::START_MARKER, config::END_MARKER, trimmed).await?;
            println!("Fetched {} characters in {:.1}s", size, t_fetch.elapsed().as_secs_f64());

            // Phase 2: Parse
            let t_parse = Instant::now();
            let n = parser::parse_file(trimmed, parsed, &ParserConfig::default())?;
            println!("Parsed {} entries in {:.1}s", n, t_parse.elapsed().as_secs_f64());
            if n == 0 {
                println!("Nothing to analyze.");
                return Ok(());
            }

            // Phase 3: Stats + order check
            stats::generate(parsed, Path::new(config::STATS_PATH))?;
            println!();
            check::check_file(parsed)?;
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
