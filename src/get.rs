//! Document retrieval by id.
//!
//! Prints one document's metadata and rendered variants to stdout. Used by
//! the `acta get` CLI command; the HTTP equivalent lives in the server
//! module.

use anyhow::Result;

use crate::corpus::Corpus;

/// CLI entry point: look a document up and print it, or exit non-zero on
/// a miss.
pub fn run_get(corpus: &Corpus, id: &str) -> Result<()> {
    let doc = match corpus.find_document(id) {
        Some(d) => d,
        None => {
            eprintln!("Error: document not found: {}", id);
            std::process::exit(1);
        }
    };

    println!("--- Document ---");
    println!("id:         {}", doc.id);
    println!("title:      {}", doc.title);
    if !doc.date_place_plain.is_empty() {
        println!("date/place: {}", doc.date_place_plain);
    }
    println!();

    if !doc.summary_short.is_empty() {
        println!("--- Summary ---");
        println!("{}", doc.summary_short);
        println!();
    }

    if !doc.source_display.is_empty() {
        println!("--- Source ---");
        println!("{}", doc.source_display);
        println!();
    }

    if !doc.original_display.is_empty() {
        println!("--- Original ---");
        println!("{}", doc.original_display);
        println!();
    }

    if !doc.translation_display.is_empty() {
        println!("--- Translation ---");
        println!("{}", doc.translation_display);
        println!();
    }

    Ok(())
}
