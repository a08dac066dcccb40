//! HTML title and text extraction.

use scraper::{ElementRef, Html, Node, Selector};

const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "svg", "template", "iframe"];
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "article", "section",
    "main", "blockquote", "pre",
];

/// Document title, when the page has a non-empty one.
pub fn extract_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title: String = doc.select(&selector).next()?.text().collect();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Visible text with script/style noise stripped and whitespace collapsed.
///
/// `Html` is not `Send`, so parsing happens and finishes inside this call;
/// nothing borrowed from the document escapes.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    if let Ok(selector) = Selector::parse("body") {
        if let Some(body) = doc.select(&selector).next() {
            let mut buf = String::new();
            walk(&body, &mut buf);
            return collapse_whitespace(&buf);
        }
    }
    collapse_whitespace(&doc.root_element().text().collect::<String>())
}

fn walk(node: &ElementRef<'_>, buf: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(element) => {
                let tag = element.name();
                if SKIP_TAGS.contains(&tag) {
                    continue;
                }
                // Block boundaries become whitespace so adjacent runs of
                // text do not glue together.
                if BLOCK_TAGS.contains(&tag) {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    walk(&child_ref, buf);
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
