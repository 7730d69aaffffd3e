//! Corpus load check and summary.
//!
//! Loads the corpus exactly the way the server does and prints what was
//! built. Used by `acta check` to confirm a corpus file is servable before
//! deploying it.

use anyhow::Result;

use crate::config::Config;
use crate::corpus;

/// Run the check command: load the corpus and print a summary.
pub fn run_check(config: &Config) -> Result<()> {
    let corpus = corpus::load_corpus(&config.corpus.path)?;

    let with_translation = corpus
        .documents
        .iter()
        .filter(|d| !d.translation_display.is_empty())
        .count();

    println!("Acta Edition - Corpus Check");
    println!("===========================");
    println!();
    println!("  Corpus:      {}", config.corpus.path.display());
    println!();
    println!("  Documents:   {}", corpus.documents.len());
    println!("  Translated:  {} / {}", with_translation, corpus.documents.len());
    println!("  Persons:     {}", corpus.person_keys.len());
    println!("  Places:      {}", corpus.place_keys.len());
    println!();

    Ok(())
}
