//! Parsed tank page and the text-walking helpers shared by the field strategies

use scraper::{ElementRef, Html};

/// Elements whose text never counts as visible page content
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Elements treated as block-level containers when widening a search scope
pub(crate) const BLOCK_TAGS: &[&str] = &[
    "div", "p", "li", "td", "th", "dd", "dt", "tr", "section", "article", "header", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "form", "body",
];

/// A parsed HTML document ready for field extraction
pub(crate) struct Page {
    document: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Iterates over visible text nodes in document order, paired with their
    /// parent element
    pub fn text_nodes(&self) -> impl Iterator<Item = (ElementRef<'_>, &str)> {
        self.document.root_element().descendants().filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if SKIPPED_TAGS.contains(&parent.value().name()) {
                return None;
            }
            Some((parent, &**text))
        })
    }

    /// Concatenates all visible text of the document without separators
    pub fn full_text(&self) -> String {
        self.text_nodes().map(|(_, text)| text).collect()
    }
}

/// Collects an element's text with whitespace runs collapsed to one space
pub(crate) fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the element itself if it is block-level, otherwise its nearest
/// block-level ancestor
pub(crate) fn enclosing_block(element: ElementRef) -> Option<ElementRef> {
    if BLOCK_TAGS.contains(&element.value().name()) {
        return Some(element);
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| BLOCK_TAGS.contains(&ancestor.value().name()))
}

/// Parses a captured number, tolerating thousands separators
///
/// Returns `None` for unparsable or non-finite values.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
