//! # Acta Edition
//!
//! A digital-edition server for TEI-annotated historical documents.
//!
//! The edition loads a single TEI corpus file once at startup, rewrites its
//! scholarly annotations (person and place references, footnotes, page
//! breaks, running headers) into interactive display HTML, and serves
//! faceted search, per-document lookup, and person/place indices over a
//! CLI and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌───────────────┐
//! │ TEI file  │──▶│ CorpusLoader  │──▶│ Corpus (RAM,   │
//! │ (startup) │   │ + transform   │   │ immutable)     │
//! └───────────┘   └──────────────┘   └───────┬───────┘
//!                                            │
//!                             ┌──────────────┤
//!                             ▼              ▼
//!                        ┌─────────┐   ┌──────────┐
//!                        │   CLI   │   │   HTTP   │
//!                        │ (acta)  │   │  (JSON)  │
//!                        └─────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! acta check                    # load the corpus, print what was built
//! acta search "wilno" --person "Alexander"
//! acta get 12                   # print one document
//! acta index                    # person and place indices
//! acta serve                    # start the JSON HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`tei`] | Owned XML tree and parser |
//! | [`render`] | TEI-to-HTML markup transform |
//! | [`corpus`] | Corpus loading and entity indices |
//! | [`search`] | Faceted filtering and pagination |
//! | [`server`] | JSON HTTP server |

pub mod check;
pub mod config;
pub mod corpus;
pub mod get;
pub mod index_cmd;
pub mod models;
pub mod render;
pub mod search;
pub mod server;
pub mod tei;
