//! # docdrop CLI
//!
//! ```bash
//! docdrop --config ./config/docdrop.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docdrop init` | Create the SQLite database and collection table |
//! | `docdrop serve` | Start the HTTP API |
//! | `docdrop ingest --file/--url/--text` | Send a payload to a running server |
//! | `docdrop list` | Print stored records, newest first |

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docdrop::client::{self, IngestInput};
use docdrop::config;
use docdrop::migrate;
use docdrop::server;

/// docdrop: store uploaded PDFs and text, list them newest-first.
#[derive(Parser)]
#[command(name = "docdrop", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docdrop.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent: running it against an existing database is safe.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Send a PDF file, PDF URL, or text to a running server.
    #[command(group(ArgGroup::new("input").required(true).args(["file", "url", "text"])))]
    Ingest {
        /// Local PDF file, uploaded as a base64 data URL.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Remote PDF URL, fetched by the server.
        #[arg(long)]
        url: Option<String>,

        /// Plain text, stored verbatim.
        #[arg(long)]
        text: Option<String>,

        /// Source tag. Defaults to `pdf` for --file/--url and `text` for --text.
        #[arg(long)]
        source: Option<String>,

        /// Server base URL. Defaults to the configured bind address.
        #[arg(long)]
        server: Option<String>,
    },

    /// List stored records, newest first.
    List {
        /// Server base URL. Defaults to the configured bind address.
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("initialized {}", cfg.db.path.display());
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ingest {
            file,
            url,
            text,
            source,
            server,
        } => {
            let input = IngestInput::from_flags(file, url, text)
                .context("one of --file, --url, --text is required")?;
            let base = server.unwrap_or_else(|| cfg.server.base_url());
            client::run_ingest(&base, input, source.as_deref()).await?;
        }
        Commands::List { server } => {
            let base = server.unwrap_or_else(|| cfg.server.base_url());
            client::run_list(&base).await?;
        }
    }

    Ok(())
}
