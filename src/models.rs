//! Core data models of the edition.
//!
//! These types are built once by the corpus loader and shared read-only by
//! the query engine, the CLI printers, and the HTTP server.

use serde::Serialize;

/// One fully rendered corpus entry, keyed by its division number.
///
/// The `*_display` fields hold display HTML produced by the markup
/// transform; the plain fields hold whitespace-normalized text for listing
/// views and search.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub date_place_display: String,
    pub date_place_plain: String,
    pub summary_display: String,
    /// Plain summary truncated to the first 60 words, footnotes removed.
    pub summary_short: String,
    pub source_display: String,
    pub original_display: String,
    pub translation_display: String,
    /// Lower-cased flattened text of the whole division, used for
    /// substring search only; not part of the document's public shape.
    #[serde(skip)]
    pub search_text: String,
}

/// Index entry for one person or place key: the external reference URI
/// (fixed on first sight, possibly empty) and every document the entity
/// appears in, in corpus order.
#[derive(Debug, Clone, Serialize)]
pub struct EntityEntry {
    #[serde(rename = "ref")]
    pub reference: String,
    pub docs: Vec<DocRef>,
}

/// A document association inside an entity index entry.
#[derive(Debug, Clone, Serialize)]
pub struct DocRef {
    pub id: String,
    pub title: String,
}
