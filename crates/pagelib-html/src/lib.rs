//! pagelib HTML
//!
//! HTML5 parsing (html5ever) into the pagelib arena DOM, and serialization
//! back to markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{get_inner_html, get_outer_html, HtmlSerializer};

use pagelib_dom::{Document, DomError, NodeId};

/// Result type for HTML operations
pub type HtmlResult<T> = Result<T, HtmlError>;

/// HTML parsing errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("DOM construction failed: {0}")]
    Dom(#[from] DomError),

    #[error("parsed document has no <body>")]
    MissingBody,
}

/// Parse an HTML string into a document
pub fn parse(html: &str) -> HtmlResult<Document> {
    HtmlParser::new().parse(html)
}

/// Parse body content; returns the document and its `<body>`
///
/// Markup is wrapped the way a browser would wrap it, so a bare `<table>` or
/// `<img>` ends up as a child of the returned body.
pub fn parse_fragment(html: &str) -> HtmlResult<(Document, NodeId)> {
    let document = parse(html)?;
    let body = document.body().ok_or(HtmlError::MissingBody)?;
    Ok((document, body))
}

/// Serialize a whole document
pub fn serialize(document: &Document) -> String {
    HtmlSerializer::new(document.tree()).outer_html(document.tree().root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_returns_body() {
        let (doc, body) = parse_fragment("<table><tr><th>A</th></tr></table>").unwrap();
        let table = doc.tree().first_child(body).unwrap();
        assert!(doc.tree().has_tag(table, "table"));
        assert_eq!(doc.tree().get_elements_by_tag_name(table, "th").len(), 1);
    }

    #[test]
    fn test_serialize_document() {
        let doc = parse("<!DOCTYPE html><p class=a>x</p>").unwrap();
        assert_eq!(
            serialize(&doc),
            r#"<!DOCTYPE html><html><head></head><body><p class="a">x</p></body></html>"#
        );
    }
}
