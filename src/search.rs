use anyhow::Result;
use serde::{Serialize, Serializer};

use crate::corpus::Corpus;
use crate::models::Document;

/// Fixed page size of every result window.
pub const PAGE_SIZE: usize = 10;

/// One faceted query: free text plus selected person/place keys and the
/// requested page. Empty text and empty selections filter nothing.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub q: String,
    pub persons: Vec<String>,
    pub places: Vec<String>,
    pub page: i64,
}

/// One entry of the pagination window shown as navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    /// Ellipsis between page links, not a page itself.
    Gap,
}

impl Serialize for PageLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PageLink::Page(n) => serializer.serialize_u64(*n as u64),
            PageLink::Gap => serializer.serialize_str("gap"),
        }
    }
}

/// A served result window plus its pagination metadata.
#[derive(Debug)]
pub struct QueryPage<'a> {
    pub results: Vec<&'a Document>,
    pub total: usize,
    pub total_pages: usize,
    /// The page actually served after clamping the request.
    pub page: usize,
    pub window: Vec<PageLink>,
}

/// Filters the document list and returns the requested page window.
///
/// Stages narrow in sequence: free text, then person facets, then place
/// facets, each with AND semantics. Source order is preserved throughout.
pub fn run_query<'a>(documents: &'a [Document], params: &QueryParams) -> QueryPage<'a> {
    let q = params.q.to_lowercase();
    let mut results: Vec<&Document> = documents.iter().collect();

    if !q.is_empty() {
        results.retain(|d| d.search_text.contains(&q));
    }
    if !params.persons.is_empty() {
        results.retain(|d| params.persons.iter().all(|key| facet_matches(d, key)));
    }
    if !params.places.is_empty() {
        results.retain(|d| params.places.iter().all(|key| facet_matches(d, key)));
    }

    let total = results.len();
    let total_pages = total.div_ceil(PAGE_SIZE);
    let page = clamp_page(params.page, total_pages);
    let window = page_window(total_pages, page);

    let start = (page - 1) * PAGE_SIZE;
    let results: Vec<&Document> = results.into_iter().skip(start).take(PAGE_SIZE).collect();

    QueryPage {
        results,
        total,
        total_pages,
        page,
        window,
    }
}

/// Whether a document matches one selected facet key.
///
/// Deliberately substring containment over the rendered full-text variants
/// (a key can in principle collide with unrelated markup text); the policy
/// lives here alone so exact structural matching could replace it without
/// touching the rest of the engine.
fn facet_matches(doc: &Document, key: &str) -> bool {
    doc.original_display.contains(key) || doc.translation_display.contains(key)
}

/// Clamps a requested page into `[1, total_pages]`. The upper clamp only
/// applies when there is at least one page.
fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let mut page = if requested < 1 { 1 } else { requested as usize };
    if total_pages > 0 && page > total_pages {
        page = total_pages;
    }
    page
}

/// Page numbers to show as navigation controls. Seven or fewer pages are
/// listed in full; otherwise the window keeps the first and last page
/// visible with ellipsis gaps around the current neighborhood.
pub fn page_window(total_pages: usize, page: usize) -> Vec<PageLink> {
    use PageLink::{Gap, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }
    if page <= 4 {
        vec![Page(1), Page(2), Page(3), Page(4), Page(5), Gap, Page(total_pages)]
    } else if page + 3 >= total_pages {
        vec![
            Page(1),
            Gap,
            Page(total_pages - 4),
            Page(total_pages - 3),
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ]
    } else {
        vec![
            Page(1),
            Gap,
            Page(page - 1),
            Page(page),
            Page(page + 1),
            Gap,
            Page(total_pages),
        ]
    }
}

/// Parses a textual page number, silently falling back to page 1 on absent
/// or non-numeric input.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// CLI entry point: run a query and print the result window to stdout.
pub fn run_search(
    corpus: &Corpus,
    query: &str,
    persons: Vec<String>,
    places: Vec<String>,
    page: i64,
) -> Result<()> {
    let params = QueryParams {
        q: query.to_string(),
        persons,
        places,
        page,
    };
    let result = run_query(&corpus.documents, &params);

    if result.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!(
        "{} document(s), page {} of {}.",
        result.total, result.page, result.total_pages
    );
    println!();

    let offset = (result.page - 1) * PAGE_SIZE;
    for (i, doc) in result.results.iter().enumerate() {
        println!("{}. [{}] {}", offset + i + 1, doc.id, doc.title);
        if !doc.date_place_plain.is_empty() {
            println!("    {}", doc.date_place_plain);
        }
        if !doc.summary_short.is_empty() {
            println!("    {}", doc.summary_short);
        }
        println!();
    }

    let window: Vec<String> = result
        .window
        .iter()
        .map(|link| match link {
            PageLink::Page(n) => n.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect();
    println!("pages: {}", window.join(" "));

    Ok(())
}
