//! DOMTokenList (classList)
//!
//! Space-separated token list backing the `class` attribute, plus the
//! `DomTree` helpers that read and write it.

use crate::{DomResult, DomTree, NodeId};

/// Ordered, duplicate-free class tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl From<&str> for DOMTokenList {
    /// Split on ASCII whitespace, keeping the first of any duplicates
    fn from(value: &str) -> Self {
        let mut list = Self::default();
        list.add(&value.split_whitespace().collect::<Vec<_>>());
        list
    }
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.iter().any(|t| t == token)
    }

    /// classList.add(...tokens)
    pub fn add(&mut self, tokens: &[&str]) {
        for &token in tokens {
            if token.is_empty() || self.contains(token) {
                continue;
            }
            self.tokens.push(token.to_owned());
        }
    }

    /// classList.remove(...tokens)
    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    /// classList.toggle; `force` pins the outcome. Returns presence afterwards.
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let keep = force.unwrap_or_else(|| !self.contains(token));
        if keep {
            self.add(&[token]);
        } else {
            self.remove(&[token]);
        }
        keep
    }

    /// Swap `old` for `new` at the same position
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        let Some(slot) = self.tokens.iter_mut().find(|t| t.as_str() == old) else {
            return false;
        };
        *slot = new.to_owned();
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

impl DomTree {
    /// Parsed `class` attribute
    pub fn class_list(&self, id: NodeId) -> DOMTokenList {
        self.get_attribute(id, "class")
            .map(DOMTokenList::from)
            .unwrap_or_default()
    }

    /// Write a class list back to the `class` attribute
    pub fn set_class_list(&mut self, id: NodeId, list: &DOMTokenList) -> DomResult<()> {
        self.set_attribute(id, "class", &list.to_string())
    }

    /// Check for a class
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get_attribute(id, "class")
            .is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }

    /// Add a class
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let mut list = self.class_list(id);
        list.add(&[class]);
        self.set_class_list(id, &list)
    }

    /// Remove a class; leaves an empty `class` attribute like the DOM does
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        if !self.has_attribute(id, "class") {
            return Ok(());
        }
        let mut list = self.class_list(id);
        list.remove(&[class]);
        self.set_class_list(id, &list)
    }

    /// Descendant elements carrying `class`, in document order
    pub fn get_elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&d| self.has_class(d, class))
            .collect()
    }

    /// Nearest inclusive ancestor carrying `class`
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.closest(id, |tree, candidate| tree.has_class(candidate, class))
    }
}
