//! Inline style (CSSStyleDeclaration)
//!
//! Ordered `name: value [!important]` declarations parsed from and written
//! back to the `style` attribute. Priority is tracked per declaration so a
//! value can be moved elsewhere and restored with the same precedence.

use crate::{DomResult, DomTree, NodeId};

/// Priority string for `!important` declarations
pub const IMPORTANT: &str = "important";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    name: String,
    value: String,
    important: bool,
}

/// Inline style declaration block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    declarations: Vec<Declaration>,
}

impl CssStyleDeclaration {
    /// Create an empty declaration block
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `style` attribute
    ///
    /// Later declarations of the same property win, as in the cascade.
    pub fn parse(css: &str) -> Self {
        let mut style = Self::new();
        for chunk in split_declarations(css) {
            let Some((name, value)) = chunk.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let (value, important) = strip_important(value.trim());
            if name.is_empty() || value.is_empty() {
                continue;
            }
            let priority = if important { IMPORTANT } else { "" };
            style.set_property(&name, value, priority);
        }
        style
    }

    /// Number of declarations
    pub fn length(&self) -> usize {
        self.declarations.len()
    }

    /// Check if no declarations are set
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Property value, or "" when unset
    pub fn get_property_value(&self, name: &str) -> &str {
        self.find(name).map_or("", |d| d.value.as_str())
    }

    /// "important" or ""
    pub fn get_property_priority(&self, name: &str) -> &str {
        match self.find(name) {
            Some(d) if d.important => IMPORTANT,
            _ => "",
        }
    }

    /// Set a property; an empty value removes it
    pub fn set_property(&mut self, name: &str, value: &str, priority: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(name);
            return;
        }
        let important = priority.eq_ignore_ascii_case(IMPORTANT);

        match self.declarations.iter_mut().find(|d| d.name.eq_ignore_ascii_case(name)) {
            Some(existing) => {
                existing.value = value.to_string();
                existing.important = important;
            }
            None => self.declarations.push(Declaration {
                name: name.to_ascii_lowercase(),
                value: value.to_string(),
                important,
            }),
        }
    }

    /// Remove a property, returning the old value (or "")
    pub fn remove_property(&mut self, name: &str) -> String {
        match self.declarations.iter().position(|d| d.name.eq_ignore_ascii_case(name)) {
            Some(index) => self.declarations.remove(index).value,
            None => String::new(),
        }
    }

    /// Serialized declaration block
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.name, d.value)
                } else {
                    format!("{}: {};", d.name, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split on `;` outside of parentheses and quotes
fn split_declarations(css: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in css.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&css[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&css[start..]);
    parts
}

fn strip_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case(IMPORTANT) {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

impl DomTree {
    /// Parsed inline style
    pub fn style(&self, id: NodeId) -> CssStyleDeclaration {
        self.get_attribute(id, "style")
            .map(CssStyleDeclaration::parse)
            .unwrap_or_default()
    }

    /// Write a declaration block back; an empty block drops the attribute
    pub fn set_style(&mut self, id: NodeId, style: &CssStyleDeclaration) -> DomResult<()> {
        if style.is_empty() {
            self.remove_attribute(id, "style")?;
            Ok(())
        } else {
            self.set_attribute(id, "style", &style.css_text())
        }
    }

    /// Inline property value, `None` when unset
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        let style = self.style(id);
        let value = style.get_property_value(name);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Set one inline property
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str, priority: &str) -> DomResult<()> {
        let mut style = self.style(id);
        style.set_property(name, value, priority);
        self.set_style(id, &style)
    }

    /// Remove one inline property, returning its old value
    pub fn remove_style_property(&mut self, id: NodeId, name: &str) -> DomResult<String> {
        if !self.has_attribute(id, "style") {
            return Ok(String::new());
        }
        let mut style = self.style(id);
        let old = style.remove_property(name);
        self.set_style(id, &style)?;
        Ok(old)
    }

    /// Inline `display: none`
    pub fn is_display_none(&self, id: NodeId) -> bool {
        self.style(id).get_property_value("display").eq_ignore_ascii_case("none")
    }
}
