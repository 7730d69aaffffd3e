//! # Acta Edition CLI (`acta`)
//!
//! The `acta` binary is the interface to the edition. Every command loads
//! the corpus fresh from the TEI file named in the configuration; the
//! `serve` command keeps it in memory behind the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! acta --config ./config/acta.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `acta check` | Load the corpus and print summary statistics |
//! | `acta search "<query>"` | Faceted search with pagination |
//! | `acta get <id>` | Print one document by its id |
//! | `acta index` | Print the person and place indices |
//! | `acta serve` | Start the JSON HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Verify a corpus file before deploying it
//! acta check --config ./config/acta.toml
//!
//! # Free text combined with facets; facets repeat and AND together
//! acta search "podatek" --person "Alexander" --place "Wilno" --page 2
//!
//! # Look up the document behind a result
//! acta get 21
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use acta_edition::{check, config, corpus, get, index_cmd, search, server};

/// Acta Edition: a digital-edition server for TEI-annotated historical
/// documents.
#[derive(Parser)]
#[command(
    name = "acta",
    about = "Acta Edition - a digital-edition server for TEI-annotated historical documents",
    version,
    long_about = "Acta Edition loads a TEI corpus once at startup, rewrites its scholarly \
    annotations into interactive display HTML, and serves faceted search, document lookup, \
    and person/place indices via a CLI and a JSON HTTP server."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Names the corpus file and the server bind address.
    #[arg(long, global = true, default_value = "./config/acta.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Load the corpus and print summary statistics.
    ///
    /// Fails with a non-zero exit when the corpus file is missing or not
    /// well-formed, exactly as server startup would.
    Check,

    /// Search the corpus.
    ///
    /// Free text matches anywhere in a document's flattened text
    /// (case-insensitive). Facet filters repeat and combine with AND
    /// semantics: every selected key must appear in the document.
    Search {
        /// Free-text query; may be empty when only facets are used.
        #[arg(default_value = "")]
        query: String,

        /// Selected person key; repeat the flag to require several.
        #[arg(long = "person")]
        persons: Vec<String>,

        /// Selected place key; repeat the flag to require several.
        #[arg(long = "place")]
        places: Vec<String>,

        /// Result page to show. Non-numeric input falls back to page 1.
        #[arg(long, default_value = "1")]
        page: String,
    },

    /// Print one document by its id.
    Get {
        /// Document id (the division's declared number).
        id: String,
    },

    /// Print the person and place indices.
    Index,

    /// Start the JSON HTTP server.
    ///
    /// Loads the corpus once, then serves `/search`, `/documents/{id}`,
    /// `/index`, and `/health` on the configured bind address.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Check => {
            check::run_check(&cfg)?;
        }
        Commands::Search {
            query,
            persons,
            places,
            page,
        } => {
            let corpus = corpus::load_corpus(&cfg.corpus.path)?;
            let page = search::parse_page(Some(page.as_str()));
            search::run_search(&corpus, &query, persons, places, page)?;
        }
        Commands::Get { id } => {
            let corpus = corpus::load_corpus(&cfg.corpus.path)?;
            get::run_get(&corpus, &id)?;
        }
        Commands::Index => {
            let corpus = corpus::load_corpus(&cfg.corpus.path)?;
            index_cmd::run_index(&corpus)?;
        }
        Commands::Serve => {
            let corpus = corpus::load_corpus(&cfg.corpus.path)?;
            server::run_server(&cfg, corpus).await?;
        }
    }

    Ok(())
}
