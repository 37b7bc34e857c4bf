//! Arena node records

use crate::{InternedString, NodeId};

/// One arena slot: tree links plus payload
///
/// Missing links hold `NodeId::NONE`; `last_child` makes append O(1).
#[derive(Debug)]
pub struct Node {
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

impl Node {
    /// Detached node carrying `data`
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.as_element().is_some()
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        if let NodeData::Element(element) = &self.data { Some(element) } else { None }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        if let NodeData::Element(element) = &mut self.data { Some(element) } else { None }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        if let NodeData::Text(text) = &self.data { Some(&text.content) } else { None }
    }
}

/// Node payload
#[derive(Debug)]
pub enum NodeData {
    Document,
    Doctype {
        name: InternedString,
        public_id: String,
        system_id: String,
    },
    Element(ElementData),
    Text(TextData),
    Comment(String),
}

/// Tag name and attributes
///
/// Attributes keep insertion order; serialization and `outerHTML`
/// comparisons depend on it.
#[derive(Debug)]
pub struct ElementData {
    pub name: InternedString,
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: InternedString) -> Self {
        Self { name, attrs: Vec::new() }
    }

    fn position(&self, name: InternedString) -> Option<usize> {
        self.attrs.iter().position(|attr| attr.name == name)
    }

    pub fn get_attr(&self, name: InternedString) -> Option<&str> {
        self.position(name).map(|i| self.attrs[i].value.as_str())
    }

    /// Overwrite in place, or append a new attribute
    pub fn set_attr(&mut self, name: InternedString, value: String) {
        match self.position(name) {
            Some(i) => self.attrs[i].value = value,
            None => self.attrs.push(Attribute { name, value }),
        }
    }

    /// Returns the removed value
    pub fn remove_attr(&mut self, name: InternedString) -> Option<String> {
        self.position(name).map(|i| self.attrs.remove(i).value)
    }
}

#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: InternedString,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: InternedString = InternedString(10);
    const ALT: InternedString = InternedString(11);

    #[test]
    fn test_overwrite_keeps_attribute_order() {
        let mut img = ElementData::new(InternedString(1));
        img.set_attr(SRC, "/a.png".into());
        img.set_attr(ALT, "A".into());
        img.set_attr(SRC, "/b.png".into());

        let order: Vec<_> = img.attrs.iter().map(|a| (a.name, a.value.as_str())).collect();
        assert_eq!(order, [(SRC, "/b.png"), (ALT, "A")]);
    }

    #[test]
    fn test_remove_attr_returns_value_once() {
        let mut img = ElementData::new(InternedString(1));
        img.set_attr(SRC, "/a.png".into());
        assert_eq!(img.remove_attr(SRC).as_deref(), Some("/a.png"));
        assert_eq!(img.remove_attr(SRC), None);
        assert_eq!(img.get_attr(SRC), None);
    }

    #[test]
    fn test_payload_accessors() {
        let text = Node::new(NodeData::Text(TextData { content: "x".into() }));
        assert_eq!(text.as_text(), Some("x"));
        assert!(!text.is_element());
        assert!(Node::new(NodeData::Element(ElementData::new(InternedString(1)))).is_element());
        assert!(Node::new(NodeData::Document).as_element().is_none());
    }
}
