use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_core::Encoding;
use folio_indexer::{build_site, load_config, lookup, BuildRequest};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, fmt};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio-indexer")]
#[command(about = "Build the prefix search index of a rendered site and check its links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the search index from rendered pages
    Build {
        /// Directory of rendered .html pages, or a .json/.jsonl page manifest
        #[arg(long)]
        input: PathBuf,
        /// Output search index file
        #[arg(long, default_value = "search.json")]
        output: PathBuf,
        /// Directory assets are resolved against (defaults to the input directory)
        #[arg(long)]
        site_root: Option<PathBuf>,
        /// Site config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Cap on every ranked result list
        #[arg(long)]
        max_results: Option<usize>,
        /// Index titles and headings only
        #[arg(long, default_value_t = false)]
        no_body: bool,
        /// Emit the nested trie instead of the flat prefix map
        #[arg(long, default_value_t = false)]
        nested: bool,
        /// Drop common English words while tokenizing
        #[arg(long, default_value_t = false)]
        stopwords: bool,
    },
    /// Print the ranked sites for a prefix from a built index
    Lookup {
        /// Search index file
        #[arg(long, default_value = "search.json")]
        index: PathBuf,
        prefix: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, site_root, config, max_results, no_body, nested, stopwords } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(max) = max_results {
                config.max_results = max;
            }
            if no_body {
                config.index_body = false;
            }
            if nested {
                config.encoding = Encoding::Nested;
            }
            if stopwords {
                config.stopwords = true;
            }
            let started = OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into());
            tracing::info!(started = %started, "build started");

            let out = build_site(BuildRequest { input, output, site_root, config })?;
            print!("{}", out.warnings.report());
            Ok(())
        }
        Commands::Lookup { index, prefix } => {
            for site in lookup(&index, &prefix)? {
                println!("{}\t{}", site.title, site.path);
            }
            Ok(())
        }
    }
}
