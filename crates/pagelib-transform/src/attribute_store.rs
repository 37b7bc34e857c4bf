//! Shadow attribute storage
//!
//! Moves element attributes and inline style properties into `data-*`
//! attributes and back. A style property is stored as two shadow attributes,
//! value and priority, so `!important` survives the round trip.

use pagelib_dom::{DomTree, NodeId};

use crate::TransformResult;

/// Something that can be stashed in a shadow attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservedAttribute {
    /// Plain attribute, stored as `data-<name>`
    Attribute(&'static str),
    /// Inline style property, stored as `data-style-<name>` and
    /// `data-style-<name>-priority`
    StyleProperty(&'static str),
}

impl PreservedAttribute {
    /// Shadow attribute holding the value
    pub fn shadow_name(&self) -> String {
        match self {
            PreservedAttribute::Attribute(name) => format!("data-{name}"),
            PreservedAttribute::StyleProperty(name) => format!("data-style-{name}"),
        }
    }

    /// Shadow attribute holding the style priority
    pub fn priority_shadow_name(&self) -> Option<String> {
        match self {
            PreservedAttribute::Attribute(_) => None,
            PreservedAttribute::StyleProperty(name) => Some(format!("data-style-{name}-priority")),
        }
    }

    /// Value currently on the element, if set
    fn current(&self, tree: &DomTree, element: NodeId) -> Option<(String, String)> {
        match self {
            PreservedAttribute::Attribute(name) => tree
                .get_attribute(element, name)
                .map(|value| (value.to_string(), String::new())),
            PreservedAttribute::StyleProperty(name) => {
                let style = tree.style(element);
                let value = style.get_property_value(name);
                (!value.is_empty())
                    .then(|| (value.to_string(), style.get_property_priority(name).to_string()))
            }
        }
    }
}

/// Copy each attribute present on `source` into shadow attributes on
/// `destination`
///
/// Originals are left untouched. Absent attributes write nothing, so a later
/// `restore` knows they were never there.
pub fn preserve(tree: &mut DomTree, source: NodeId, destination: NodeId, attributes: &[PreservedAttribute]) -> TransformResult<()> {
    for attribute in attributes {
        let Some((value, priority)) = attribute.current(tree, source) else {
            continue;
        };
        tree.set_attribute(destination, &attribute.shadow_name(), &value)?;
        if let Some(priority_name) = attribute.priority_shadow_name() {
            if !priority.is_empty() {
                tree.set_attribute(destination, &priority_name, &priority)?;
            }
        }
    }
    Ok(())
}

/// Copy shadow attributes on `source` back onto `destination`
///
/// Shadow attributes stay in place; see [`discard`].
pub fn restore(tree: &mut DomTree, source: NodeId, destination: NodeId, attributes: &[PreservedAttribute]) -> TransformResult<()> {
    for attribute in attributes {
        let Some(value) = tree.get_attribute(source, &attribute.shadow_name()).map(str::to_string) else {
            continue;
        };
        match attribute {
            PreservedAttribute::Attribute(name) => tree.set_attribute(destination, name, &value)?,
            PreservedAttribute::StyleProperty(name) => {
                let priority = attribute
                    .priority_shadow_name()
                    .and_then(|priority_name| tree.get_attribute(source, &priority_name))
                    .unwrap_or("")
                    .to_string();
                tree.set_style_property(destination, name, &value, &priority)?;
            }
        }
    }
    Ok(())
}

/// Remove shadow attributes from `element`
pub fn discard(tree: &mut DomTree, element: NodeId, attributes: &[PreservedAttribute]) -> TransformResult<()> {
    for attribute in attributes {
        tree.remove_attribute(element, &attribute.shadow_name())?;
        if let Some(priority_name) = attribute.priority_shadow_name() {
            tree.remove_attribute(element, &priority_name)?;
        }
    }
    Ok(())
}

/// Check whether `element` holds a shadow copy of `attribute`
pub fn is_preserved(tree: &DomTree, element: NodeId, attribute: PreservedAttribute) -> bool {
    tree.has_attribute(element, &attribute.shadow_name())
}
