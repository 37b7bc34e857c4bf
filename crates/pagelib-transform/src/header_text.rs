//! Table header text extraction
//!
//! Collects short header strings used to caption a collapsed table.

use pagelib_dom::{DomTree, NodeId};
use pagelib_html::get_inner_html;

/// Headers with this many links or more read as navigation, not a caption
const MAX_HEADER_LINKS: usize = 3;

/// Header strings of `root` in document order
///
/// A `th` contributes its trimmed text unless the text is empty, it holds
/// three or more links, or it matches `page_title`. Nested tables are not
/// entered; their headers belong to them.
pub fn get_header_text_array(tree: &DomTree, root: NodeId, page_title: Option<&str>) -> Vec<String> {
    let mut headers = Vec::new();
    collect_header_text(tree, root, page_title, &mut headers);
    headers
}

fn collect_header_text(tree: &DomTree, element: NodeId, page_title: Option<&str>, headers: &mut Vec<String>) {
    for child in tree.child_elements(element) {
        if tree.has_tag(child, "th") {
            if let Some(text) = header_text(tree, child, page_title) {
                headers.push(text);
            }
        }
        if !tree.has_tag(child, "table") {
            collect_header_text(tree, child, page_title, headers);
        }
    }
}

fn header_text(tree: &DomTree, th: NodeId, page_title: Option<&str>) -> Option<String> {
    if tree.get_elements_by_tag_name(th, "a").len() >= MAX_HEADER_LINKS {
        return None;
    }
    let text = tree.text_content(th);
    let trimmed = text.trim();
    if trimmed.is_empty() || is_page_title(tree, th, &text, page_title) {
        return None;
    }
    Some(trimmed.to_string())
}

fn is_page_title(tree: &DomTree, th: NodeId, text: &str, page_title: Option<&str>) -> bool {
    let Some(title) = page_title else {
        return false;
    };
    text == title || text.trim() == title || get_inner_html(tree, th) == title
}
