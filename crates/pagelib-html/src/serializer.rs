//! innerHTML / outerHTML
//!
//! Attributes come out in stored order, always as `name="value"`, matching
//! what a browser's `outerHTML` gives for empty values like `srcset=""`.

use pagelib_dom::{DomTree, ElementData, NodeData, NodeId};

/// Elements that never get an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Clone, Copy)]
enum Escape {
    Text,
    Attribute,
    Raw,
}

/// Writes a subtree of a [`DomTree`] as markup
pub struct HtmlSerializer<'a> {
    tree: &'a DomTree,
    out: String,
}

impl<'a> HtmlSerializer<'a> {
    pub fn new(tree: &'a DomTree) -> Self {
        Self { tree, out: String::new() }
    }

    /// Markup of `node`'s children
    pub fn inner_html(mut self, node: NodeId) -> String {
        self.write_children(node);
        self.out
    }

    /// Markup of `node` itself
    pub fn outer_html(mut self, node: NodeId) -> String {
        self.write_node(node);
        self.out
    }

    fn write_node(&mut self, id: NodeId) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Document => self.write_children(id),
            NodeData::Doctype { name, .. } => {
                self.out.push_str("<!DOCTYPE ");
                self.out.push_str(tree.resolve(*name));
                self.out.push('>');
            }
            NodeData::Comment(comment) => {
                self.out.push_str("<!--");
                self.out.push_str(comment);
                self.out.push_str("-->");
            }
            NodeData::Text(text) => self.push(&text.content, Escape::Text),
            NodeData::Element(element) => self.write_element(id, element),
        }
    }

    fn write_element(&mut self, id: NodeId, element: &ElementData) {
        let tree = self.tree;
        let tag = tree.resolve(element.name);
        self.write_start_tag(tag, element);
        if VOID_ELEMENTS.contains(&tag) {
            return;
        }

        if RAW_TEXT_ELEMENTS.contains(&tag) {
            for (_, child) in tree.children(id) {
                if let Some(text) = child.as_text() {
                    self.push(text, Escape::Raw);
                }
            }
        } else {
            self.write_children(id);
        }

        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn write_start_tag(&mut self, tag: &str, element: &ElementData) {
        let tree = self.tree;
        self.out.push('<');
        self.out.push_str(tag);
        for attr in &element.attrs {
            self.out.push(' ');
            self.out.push_str(tree.resolve(attr.name));
            self.out.push_str("=\"");
            self.push(&attr.value, Escape::Attribute);
            self.out.push('"');
        }
        self.out.push('>');
    }

    fn write_children(&mut self, id: NodeId) {
        let tree = self.tree;
        for (child, _) in tree.children(id) {
            self.write_node(child);
        }
    }

    fn push(&mut self, text: &str, escape: Escape) {
        for c in text.chars() {
            let entity = match (escape, c) {
                (Escape::Raw, _) => None,
                (_, '&') => Some("&amp;"),
                (_, '<') => Some("&lt;"),
                (_, '>') => Some("&gt;"),
                (Escape::Text, '\u{a0}') => Some("&nbsp;"),
                (Escape::Attribute, '"') => Some("&quot;"),
                _ => None,
            };
            match entity {
                Some(entity) => self.out.push_str(entity),
                None => self.out.push(c),
            }
        }
    }
}

/// innerHTML of `node`
pub fn get_inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new(tree).inner_html(node)
}

/// outerHTML of `node`
pub fn get_outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new(tree).outer_html(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping_depends_on_context() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        tree.set_attribute(p, "title", "\"a\" & <b>").unwrap();
        let text = tree.create_text("\"a\" & <b>\u{a0}");
        tree.append_child(p, text).unwrap();

        assert_eq!(
            get_outer_html(&tree, p),
            r#"<p title="&quot;a&quot; &amp; &lt;b&gt;">"a" &amp; &lt;b&gt;&nbsp;</p>"#
        );
    }

    #[test]
    fn test_void_element_and_empty_attribute() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let img = tree.create_element("img");
        let text = tree.create_text("a < b");
        tree.set_attribute(div, "class", "x").unwrap();
        tree.set_attribute(img, "srcset", "").unwrap();
        tree.append_child(div, img).unwrap();
        tree.append_child(div, text).unwrap();

        assert_eq!(get_outer_html(&tree, div), r#"<div class="x"><img srcset="">a &lt; b</div>"#);
        assert_eq!(get_inner_html(&tree, div), r#"<img srcset="">a &lt; b"#);
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let mut tree = DomTree::new();
        let style = tree.create_element("style");
        let css = tree.create_text("a > b { color: red }");
        tree.append_child(style, css).unwrap();
        assert_eq!(get_outer_html(&tree, style), "<style>a > b { color: red }</style>");
    }

    #[test]
    fn test_comment_and_missing_node() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment(" note ");
        assert_eq!(get_outer_html(&tree, comment), "<!-- note -->");
        assert_eq!(get_outer_html(&tree, NodeId::NONE), "");
    }
}
