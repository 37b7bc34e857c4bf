//! Element boxes and the viewport
//!
//! The host fills a [`LayoutMap`]; `Page::bounding_client_rect` reads it.

use std::collections::HashMap;

use crate::NodeId;

/// A box in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    /// Nothing rendered
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    /// Same rect shifted by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Visible area of the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(360.0, 640.0)
    }
}

/// Layout boxes in document coordinates, supplied by the host
///
/// Elements without an entry have no box (not rendered).
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    rects: HashMap<NodeId, DOMRect>,
}

impl LayoutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the box of an element
    pub fn set(&mut self, node: NodeId, rect: DOMRect) {
        self.rects.insert(node, rect);
    }

    /// Forget the box of an element
    pub fn remove(&mut self, node: NodeId) -> Option<DOMRect> {
        self.rects.remove(&node)
    }

    /// Box of an element in document coordinates
    pub fn get(&self, node: NodeId) -> Option<DOMRect> {
        self.rects.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect_edges() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
    }

    #[test]
    fn test_translate() {
        let rect = DOMRect::from_xywh(0.0, 500.0, 10.0, 10.0).translate(0.0, -200.0);
        assert_eq!(rect.top(), 300.0);
    }

    #[test]
    fn test_empty() {
        assert!(DOMRect::new().is_empty());
        assert!(!DOMRect::from_xywh(0.0, 0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_layout_map() {
        let mut layout = LayoutMap::new();
        layout.set(NodeId(3), DOMRect::from_xywh(0.0, 0.0, 5.0, 5.0));
        assert_eq!(layout.get(NodeId(3)).map(|r| r.width), Some(5.0));
        assert!(layout.get(NodeId(4)).is_none());
        assert!(layout.remove(NodeId(3)).is_some());
        assert!(layout.is_empty());
    }
}
