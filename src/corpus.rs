//! Corpus loading.
//!
//! Parses the TEI source file once at startup, renders every document
//! division into its display and plain variants, and builds the person and
//! place indices. The resulting [`Corpus`] is immutable for the rest of the
//! process lifetime; there is no partial or degraded load, a broken source
//! file aborts startup.

use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use crate::models::{DocRef, Document, EntityEntry};
use crate::render;
use crate::tei::{self, Element};

/// Plain summaries are truncated to this many whitespace-separated words.
const SUMMARY_MAX_WORDS: usize = 60;

/// The loaded edition: ordered documents plus the two entity indices.
#[derive(Debug)]
pub struct Corpus {
    /// Documents in source order (display order absent filtering).
    pub documents: Vec<Document>,
    /// Sorted, deduplicated person keys for the facet controls.
    pub person_keys: Vec<String>,
    /// Sorted, deduplicated place keys for the facet controls.
    pub place_keys: Vec<String>,
    pub person_index: BTreeMap<String, EntityEntry>,
    pub place_index: BTreeMap<String, EntityEntry>,
}

impl Corpus {
    /// Looks up a document by its id. A miss is an ordinary outcome, the
    /// caller maps it to "not found".
    pub fn find_document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }
}

/// Reads and parses the corpus file. Invoked exactly once at startup.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    parse_corpus(&xml).with_context(|| format!("Failed to load corpus from {}", path.display()))
}

/// Builds a [`Corpus`] from TEI source text.
pub fn parse_corpus(xml: &str) -> Result<Corpus> {
    let root = tei::parse(xml)?;

    let mut documents: Vec<Document> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut person_keys: BTreeSet<String> = BTreeSet::new();
    let mut place_keys: BTreeSet<String> = BTreeSet::new();
    let mut person_index: BTreeMap<String, EntityEntry> = BTreeMap::new();
    let mut place_index: BTreeMap<String, EntityEntry> = BTreeMap::new();

    let divisions = root
        .descendants()
        .filter(|e| e.is("div") && e.attr("type") == Some("document"));

    for (position, div) in divisions.enumerate() {
        let id = match div.attr("n") {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => bail!(
                "document division #{} has no 'n' identifier",
                position + 1
            ),
        };
        if !seen_ids.insert(id.clone()) {
            bail!("duplicate document id '{}'", id);
        }

        let title = match div.find("head") {
            Some(head) => render::collapse_ws(&head.text()),
            None => format!("Document {}", id),
        };

        let (date_place_display, date_place_plain) = match div.find_typed("ab", "date-place") {
            Some(node) => (
                render::collapse_ws(&render::render_html(node)),
                render::collapse_ws(&node.text()),
            ),
            None => (String::new(), String::new()),
        };

        let (summary_display, summary_short) = match div.find_typed("ab", "summary") {
            Some(node) => {
                let plain = render::collapse_ws(&render::text_without_footnotes(node));
                (
                    render::render_html(node),
                    truncate_words(&plain, SUMMARY_MAX_WORDS),
                )
            }
            None => (String::new(), String::new()),
        };

        let source_display = render::render_opt(div.find_typed("ab", "source"));

        index_entities(div, "persName", &id, &title, &mut person_keys, &mut person_index);
        index_entities(div, "placeName", &id, &title, &mut place_keys, &mut place_index);

        documents.push(Document {
            original_display: render::render_opt(div.find_typed("div", "original")),
            translation_display: render::render_opt(div.find_typed("div", "translation")),
            search_text: div.text().to_lowercase(),
            id,
            title,
            date_place_display,
            date_place_plain,
            summary_display,
            summary_short,
            source_display,
        });
    }

    Ok(Corpus {
        documents,
        person_keys: person_keys.into_iter().collect(),
        place_keys: place_keys.into_iter().collect(),
        person_index,
        place_index,
    })
}

/// Registers every keyed `persName`/`placeName` descendant of a division.
/// The reference URI is captured on first sight only; repeated references
/// from the same document do not duplicate the association.
fn index_entities(
    div: &Element,
    tag: &str,
    doc_id: &str,
    title: &str,
    keys: &mut BTreeSet<String>,
    index: &mut BTreeMap<String, EntityEntry>,
) {
    for el in div.descendants().filter(|e| e.is(tag)) {
        let key = match el.attr("key") {
            Some(k) if !k.is_empty() => k,
            _ => continue,
        };
        keys.insert(key.to_string());
        let entry = index.entry(key.to_string()).or_insert_with(|| EntityEntry {
            reference: el.attr("ref").unwrap_or("").to_string(),
            docs: Vec::new(),
        });
        if !entry.docs.iter().any(|d| d.id == doc_id) {
            entry.docs.push(DocRef {
                id: doc_id.to_string(),
                title: title.to_string(),
            });
        }
    }
}

fn truncate_words(s: &str, max: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() > max {
        format!("{}...", words[..max].join(" "))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <TEI>
          <text><body>
            <div type="document" n="1">
              <head>Letter to the Council</head>
              <ab type="date-place">Krakow,
                <placeName key="Krakow" ref="http://geo/krakow">Krakow</placeName>, 1502</ab>
              <ab type="summary">The king writes about taxes.<note n="1">Archival note.</note></ab>
              <ab type="source">AGAD, ks. 21</ab>
              <div type="original"><p><persName key="Alexander" ref="http://ps/alex">Alexander</persName> rex.</p></div>
              <div type="translation"><p>King Alexander.</p></div>
            </div>
            <div type="document" n="2">
              <ab type="summary">Short summary.</ab>
              <div type="original"><p><persName key="Alexander">Alexander</persName> again,
                with <persName key="Jan">Jan</persName>.</p></div>
            </div>
          </body></text>
        </TEI>"#;

    #[test]
    fn loads_documents_in_source_order() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        let ids: Vec<&str> = corpus.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn title_comes_from_head_or_fallback() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        assert_eq!(corpus.documents[0].title, "Letter to the Council");
        assert_eq!(corpus.documents[1].title, "Document 2");
    }

    #[test]
    fn date_place_has_display_and_plain_variants() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        let doc = &corpus.documents[0];
        assert!(doc.date_place_display.contains("badge bg-success"));
        assert_eq!(doc.date_place_plain, "Krakow, Krakow, 1502");
        assert_eq!(corpus.documents[1].date_place_plain, "");
    }

    #[test]
    fn summary_short_excludes_footnote_text() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        let doc = &corpus.documents[0];
        assert_eq!(doc.summary_short, "The king writes about taxes.");
        assert!(doc.summary_display.contains("data-bs-content=\"Archival note.\""));
    }

    #[test]
    fn summary_truncates_to_sixty_words() {
        let long: String = (1..=61).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let exact: String = (1..=60).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let xml = format!(
            "<TEI><div type=\"document\" n=\"1\"><ab type=\"summary\">{}</ab></div>\
             <div type=\"document\" n=\"2\"><ab type=\"summary\">{}</ab></div></TEI>",
            long, exact
        );
        let corpus = parse_corpus(&xml).unwrap();
        let truncated = &corpus.documents[0].summary_short;
        assert!(truncated.ends_with("w60..."));
        assert!(!truncated.contains("w61"));
        assert_eq!(corpus.documents[1].summary_short, exact);
    }

    #[test]
    fn footnote_interleaved_mid_sentence_never_leaks() {
        let xml = "<TEI><div type=\"document\" n=\"1\">\
                   <ab type=\"summary\">before <note>SECRET</note> after</ab></div></TEI>";
        let corpus = parse_corpus(xml).unwrap();
        assert_eq!(corpus.documents[0].summary_short, "before after");
    }

    #[test]
    fn entity_keys_are_sorted_and_unique() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        assert_eq!(corpus.person_keys, vec!["Alexander", "Jan"]);
        assert_eq!(corpus.place_keys, vec!["Krakow"]);
    }

    #[test]
    fn entity_entry_records_every_document_once() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        let alex = &corpus.person_index["Alexander"];
        let ids: Vec<&str> = alex.docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        // Reference is fixed on first sight, the ref-less second occurrence
        // does not overwrite it.
        assert_eq!(alex.reference, "http://ps/alex");
    }

    #[test]
    fn entity_key_stays_unique_across_many_documents() {
        let divs: String = (1..=50)
            .map(|i| {
                format!(
                    "<div type=\"document\" n=\"{}\"><p>\
                     <persName key=\"K\">K</persName> and <persName key=\"K\">K</persName>\
                     </p></div>",
                    i
                )
            })
            .collect();
        let corpus = parse_corpus(&format!("<TEI>{}</TEI>", divs)).unwrap();
        assert_eq!(corpus.person_keys, vec!["K"]);
        // Fifty documents, one association each; the repeated reference
        // within a document does not duplicate its entry.
        assert_eq!(corpus.person_index["K"].docs.len(), 50);
    }

    #[test]
    fn unkeyed_references_are_not_indexed() {
        let xml = "<TEI><div type=\"document\" n=\"1\">\
                   <p><persName>Anon</persName><persName key=\"\">Empty</persName></p></div></TEI>";
        let corpus = parse_corpus(xml).unwrap();
        assert!(corpus.person_keys.is_empty());
        assert!(corpus.person_index.is_empty());
    }

    #[test]
    fn search_text_is_lowercased_flat_text() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        let doc = &corpus.documents[0];
        assert!(doc.search_text.contains("letter to the council"));
        assert!(doc.search_text.contains("king alexander"));
        assert!(!doc.search_text.contains("Letter"));
    }

    #[test]
    fn full_text_variants_render_or_default_empty() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        assert!(corpus.documents[0].original_display.contains("badge bg-primary"));
        assert!(corpus.documents[0].translation_display.contains("King Alexander."));
        assert_eq!(corpus.documents[1].translation_display, "");
    }

    #[test]
    fn missing_division_id_is_fatal() {
        let err = parse_corpus("<TEI><div type=\"document\"><head>t</head></div></TEI>")
            .unwrap_err();
        assert!(err.to_string().contains("no 'n' identifier"));
    }

    #[test]
    fn duplicate_division_id_is_fatal() {
        let xml = "<TEI><div type=\"document\" n=\"7\"/><div type=\"document\" n=\"7\"/></TEI>";
        let err = parse_corpus(xml).unwrap_err();
        assert!(err.to_string().contains("duplicate document id '7'"));
    }

    #[test]
    fn malformed_xml_is_fatal() {
        assert!(parse_corpus("<TEI><div type=\"document\" n=\"1\"></TEI>").is_err());
    }

    #[test]
    fn find_document_hits_and_misses() {
        let corpus = parse_corpus(SAMPLE).unwrap();
        assert!(corpus.find_document("2").is_some());
        assert!(corpus.find_document("99").is_none());
    }
}
