use anyhow::Result;

use crate::corpus::Corpus;
use crate::models::EntityEntry;

/// CLI entry point: print the person and place indices alphabetically.
pub fn run_index(corpus: &Corpus) -> Result<()> {
    print_section("Persons", &corpus.person_index);
    println!();
    print_section("Places", &corpus.place_index);
    Ok(())
}

fn print_section(label: &str, index: &std::collections::BTreeMap<String, EntityEntry>) {
    println!("{} ({})", label, index.len());
    for (key, entry) in index {
        if entry.reference.is_empty() {
            println!("  {}", key);
        } else {
            println!("  {} <{}>", key, entry.reference);
        }
        for doc in &entry.docs {
            println!("    [{}] {}", doc.id, doc.title);
        }
    }
}
