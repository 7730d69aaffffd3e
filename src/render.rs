//! TEI-to-HTML rendering.
//!
//! Rewrites the five annotation kinds the edition displays interactively
//! and passes everything else through unchanged:
//!
//! | TEI element | Rendered as |
//! |-------------|-------------|
//! | `persName` | new-tab link styled as a person badge, keyed tooltip |
//! | `placeName` | same link shape styled as a place badge |
//! | `note` | focus-triggered popover anchor with a `[n]` superscript marker |
//! | `pb` | non-selectable ` [str. N] ` inline label, or removed if unnumbered |
//! | `fw type="header"` | de-emphasized block label with the header text |
//!
//! Rendering reads a borrowed [`Element`] tree and builds a fresh string,
//! so the source tree is never mutated and repeated renders of the same
//! subtree are byte-identical.

use crate::tei::{Element, Node};

/// Renders the contents of `node` to display HTML. The node's own wrapping
/// tag is not emitted, only its children.
pub fn render_html(node: &Element) -> String {
    let mut out = String::new();
    for child in &node.children {
        render_node(child, &mut out);
    }
    out
}

/// Renders an optional subtree; absence yields the empty string.
pub fn render_opt(node: Option<&Element>) -> String {
    node.map(render_html).unwrap_or_default()
}

/// Collapses every run of whitespace to a single space and trims the ends.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flattened character data of the subtree with every `note` descendant
/// skipped, so footnote text cannot leak into shortened plain renderings.
pub fn text_without_footnotes(node: &Element) -> String {
    let mut out = String::new();
    collect_text_skipping_notes(&node.children, &mut out);
    out
}

fn collect_text_skipping_notes(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) if el.is("note") => {}
            Node::Element(el) => collect_text_skipping_notes(&el.children, out),
        }
    }
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => push_escaped_text(t, out),
        Node::Element(el) => render_element(el, out),
    }
}

fn render_element(el: &Element, out: &mut String) {
    match el.local_name() {
        "persName" => render_name_badge(el, "bg-primary", out),
        "placeName" => render_name_badge(el, "bg-success", out),
        "note" => render_footnote(el, out),
        "pb" => render_page_break(el, out),
        "fw" if el.attr("type") == Some("header") => render_running_header(el, out),
        _ => render_passthrough(el, out),
    }
}

/// Person and place references become links opening in a new browsing
/// context; the entity key rides along as the tooltip.
fn render_name_badge(el: &Element, color: &str, out: &mut String) {
    out.push_str("<a href=\"");
    push_escaped_attr(el.attr("ref").unwrap_or("#"), out);
    out.push_str("\" title=\"");
    push_escaped_attr(el.attr("key").unwrap_or(""), out);
    out.push_str("\" target=\"_blank\" class=\"badge ");
    out.push_str(color);
    out.push_str(" text-decoration-none\">");
    push_escaped_text(&el.text(), out);
    out.push_str("</a>");
}

/// Footnotes become focus-triggered popovers: clicking anywhere else
/// dismisses the bubble. The marker is `[n]`, or `[*]` when the source
/// carries no numeral.
fn render_footnote(el: &Element, out: &mut String) {
    let body = collapse_ws(&el.text());
    let numeral = el.attr("n").unwrap_or("*");
    out.push_str(
        "<a tabindex=\"0\" role=\"button\" class=\"text-danger text-decoration-none fw-bold mx-1\" \
         data-bs-toggle=\"popover\" data-bs-trigger=\"focus\" data-bs-placement=\"top\" \
         data-bs-content=\"",
    );
    push_escaped_attr(&body, out);
    out.push_str("\" title=\"Przypis ");
    push_escaped_attr(numeral, out);
    out.push_str("\"><sup>[");
    push_escaped_text(numeral, out);
    out.push_str("]</sup></a>");
}

/// Numbered page breaks become a non-selectable inline label; unnumbered
/// ones are dropped without replacement.
fn render_page_break(el: &Element, out: &mut String) {
    match el.attr("n") {
        Some(n) if !n.is_empty() => {
            out.push_str("<span class=\"small text-black-50 fw-bold user-select-none\"> [str. ");
            push_escaped_text(n, out);
            out.push_str("] </span>");
        }
        _ => {}
    }
}

fn render_running_header(el: &Element, out: &mut String) {
    out.push_str(
        "<span class=\"d-block small text-muted border-top border-secondary-subtle \
         pt-1 mt-3 mb-2 text-end fst-italic user-select-none\">",
    );
    push_escaped_text(&el.text(), out);
    out.push_str("</span>");
}

/// Unhandled elements keep their tag and attributes; children are still
/// rendered recursively, so annotations nested inside them are rewritten.
fn render_passthrough(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        push_escaped_attr(value, out);
        out.push('"');
    }
    if el.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        for child in &el.children {
            render_node(child, out);
        }
        out.push_str("</");
        out.push_str(&el.name);
        out.push('>');
    }
}

fn push_escaped_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tei;

    fn render_str(xml: &str) -> String {
        let root = tei::parse(xml).unwrap();
        render_html(&root)
    }

    #[test]
    fn person_reference_becomes_badge_link() {
        let html = render_str(
            "<p><persName ref=\"http://x/jan\" key=\"Jan Olbracht\">Jan</persName></p>",
        );
        assert_eq!(
            html,
            "<p><a href=\"http://x/jan\" title=\"Jan Olbracht\" target=\"_blank\" \
             class=\"badge bg-primary text-decoration-none\">Jan</a></p>"
        );
    }

    #[test]
    fn place_reference_uses_place_badge() {
        let html = render_str("<p><placeName key=\"Wilno\">Wilno</placeName></p>");
        assert!(html.contains("badge bg-success text-decoration-none"));
        assert!(html.contains("title=\"Wilno\""));
    }

    #[test]
    fn missing_ref_defaults_to_non_navigating_anchor() {
        let html = render_str("<p><persName key=\"K\">K</persName></p>");
        assert!(html.contains("href=\"#\""));
    }

    #[test]
    fn footnote_without_numeral_renders_star_marker() {
        let html = render_str("<p><note>margin text</note></p>");
        assert!(html.contains("<sup>[*]</sup>"));
        assert!(html.contains("title=\"Przypis *\""));
    }

    #[test]
    fn footnote_body_is_whitespace_collapsed() {
        let html = render_str("<p><note n=\"2\">  one\n   two\t three </note></p>");
        assert!(html.contains("data-bs-content=\"one two three\""));
        assert!(html.contains("<sup>[2]</sup>"));
        assert!(html.contains("data-bs-trigger=\"focus\""));
    }

    #[test]
    fn page_break_without_number_is_removed() {
        assert_eq!(render_str("<p>a<pb/>b</p>"), "<p>ab</p>");
        assert_eq!(render_str("<p>a<pb n=\"\"/>b</p>"), "<p>ab</p>");
    }

    #[test]
    fn page_break_with_number_renders_label() {
        assert_eq!(
            render_str("<p><pb n=\"12\"/></p>"),
            "<p><span class=\"small text-black-50 fw-bold user-select-none\"> [str. 12] </span></p>"
        );
    }

    #[test]
    fn running_header_becomes_block_label() {
        let html = render_str("<p><fw type=\"header\">1502 nr 7</fw></p>");
        assert!(html.starts_with("<p><span class=\"d-block small text-muted"));
        assert!(html.contains("1502 nr 7"));
        assert!(html.ends_with("</span></p>"));
    }

    #[test]
    fn non_header_fw_passes_through() {
        let html = render_str("<p><fw type=\"sig\">A2</fw></p>");
        assert_eq!(html, "<p><fw type=\"sig\">A2</fw></p>");
    }

    #[test]
    fn unknown_elements_pass_through_with_nested_rewrites() {
        let html = render_str("<ab rend=\"i\">see <persName key=\"K\">K</persName></ab>");
        assert!(html.starts_with("<ab rend=\"i\">see <a href=\"#\""));
        assert!(html.ends_with("</ab>"));
    }

    #[test]
    fn wrapping_tag_is_not_emitted() {
        let root = tei::parse("<ab>inner <hi>text</hi></ab>").unwrap();
        let ab = root.find("ab").unwrap();
        assert_eq!(render_html(ab), "inner <hi>text</hi>");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let html = render_str("<p a=\"x&amp;y\">1 &lt; 2 &amp; 3</p>");
        assert_eq!(html, "<p a=\"x&amp;y\">1 &lt; 2 &amp; 3</p>");
    }

    #[test]
    fn rendering_is_repeatable_and_does_not_mutate_input() {
        let root = tei::parse(
            "<div><p><persName key=\"K\">K</persName><note n=\"1\">n</note><pb n=\"3\"/></p></div>",
        )
        .unwrap();
        let before = root.clone();
        let first = render_html(&root);
        let second = render_html(&root);
        assert_eq!(first, second);
        assert_eq!(root, before);
    }

    #[test]
    fn text_without_footnotes_skips_note_subtrees() {
        let root = tei::parse("<ab>start <note n=\"1\">hidden</note> end</ab>").unwrap();
        let ab = root.find("ab").unwrap();
        assert_eq!(collapse_ws(&text_without_footnotes(ab)), "start end");
    }

    #[test]
    fn empty_optional_subtree_renders_empty() {
        assert_eq!(render_opt(None), "");
    }

    #[test]
    fn collapse_ws_trims_and_joins() {
        assert_eq!(collapse_ws("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_ws("   "), "");
    }
}
