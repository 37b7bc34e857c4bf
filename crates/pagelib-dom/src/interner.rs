//! Tag and attribute name interning
//!
//! Elements carry a 4-byte id per name instead of an owned string.

use std::collections::HashMap;
use std::rc::Rc;

/// Interned name id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

/// Name table for one tree
///
/// Each distinct name is stored once; ids index `names`.
#[derive(Debug)]
pub struct StringInterner {
    names: Vec<Rc<str>>,
    ids: HashMap<Rc<str>, InternedString>,
}

/// Names pre-interned so lookups for them never miss
const PRELOADED: &[&str] = &[
    // tags
    "html", "head", "body", "div", "span", "p", "a", "img", "label", "strong",
    "table", "caption", "thead", "tbody", "tfoot", "tr", "th", "td",
    // attributes
    "id", "class", "style", "href", "src", "srcset", "alt", "title", "width", "height",
    "data-src", "data-srcset",
];

impl StringInterner {
    pub fn new() -> Self {
        let mut interner = Self {
            names: Vec::with_capacity(64),
            ids: HashMap::with_capacity(64),
        };
        // id 0 is the empty string
        interner.intern("");
        for name in PRELOADED {
            interner.intern(name);
        }
        interner
    }

    /// Id for `name`, adding it on first sight
    pub fn intern(&mut self, name: &str) -> InternedString {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = InternedString(self.names.len() as u32);
        let name: Rc<str> = Rc::from(name);
        self.names.push(Rc::clone(&name));
        self.ids.insert(name, id);
        id
    }

    /// Id for `name` if it was interned before
    pub fn lookup(&self, name: &str) -> Option<InternedString> {
        self.ids.get(name).copied()
    }

    /// Name behind `id`; unknown ids resolve to ""
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.names.get(id.0 as usize).map_or("", |name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut interner = StringInterner::new();
        let a = interner.intern("pagelib_collapse_table_icon");
        let b = interner.intern("pagelib_collapse_table_icon");
        assert_eq!(a, b);
        assert_eq!(interner.get(a), "pagelib_collapse_table_icon");
    }

    #[test]
    fn test_empty_is_zero() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(""), Some(InternedString::EMPTY));
        assert_eq!(interner.get(InternedString::EMPTY), "");
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let interner = StringInterner::new();
        let before = interner.len();
        assert!(interner.lookup("never-seen").is_none());
        assert_eq!(interner.len(), before);
        assert!(interner.lookup("th").is_some());
    }
}
