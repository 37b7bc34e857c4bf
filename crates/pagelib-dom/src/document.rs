//! Document: the tree plus its url and html/head/body shortcuts

use crate::{DomTree, NodeId};

/// html/head/body, located once after the tree is built
#[derive(Debug, Clone, Copy, Default)]
struct Skeleton {
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
}

#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    skeleton: Skeleton,
}

impl Document {
    /// `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut document = Self::empty(url);
        let tree = &mut document.tree;
        let (html, head, body) = (tree.create_element("html"), tree.create_element("head"), tree.create_element("body"));

        // Fresh detached nodes under the document root cannot fail to link.
        let root = tree.root();
        let linked = tree.append_child(root, html)
            .and_then(|_| tree.append_child(html, head))
            .and_then(|_| tree.append_child(html, body));
        debug_assert!(linked.is_ok());

        document.finalize();
        document
    }

    /// Bare document node only; call [`Document::finalize`] after filling
    /// the tree
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            skeleton: Skeleton::default(),
        }
    }

    /// Find html/head/body in the current tree
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find = |parent: NodeId, tag: &str| {
            tree.child_elements(parent).into_iter().find(|&child| tree.has_tag(child, tag))
        };
        let html = find(tree.root(), "html");
        self.skeleton = Skeleton {
            html,
            head: html.and_then(|html| find(html, "head")),
            body: html.and_then(|html| find(html, "body")),
        };
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Trimmed text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        self.head()
            .and_then(|head| self.tree.get_elements_by_tag_name(head, "title").first().copied())
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.skeleton.html
    }

    pub fn head(&self) -> Option<NodeId> {
        self.skeleton.head
    }

    pub fn body(&self) -> Option<NodeId> {
        self.skeleton.body
    }

    /// First element in document order with the given `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> DomTree {
        self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
