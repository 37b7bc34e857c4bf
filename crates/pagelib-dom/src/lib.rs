//! pagelib DOM - Document Object Model
//!
//! Arena-backed DOM tree plus the small slice of a browser window the page
//! transforms need: inline styles, class lists, layout geometry, events and
//! timers. Everything hangs off an explicit [`Page`] so independent pages can
//! be transformed side by side in one process.

mod classlist;
mod document;
mod error;
mod events;
mod geometry;
mod interner;
mod node;
mod page;
mod style;
mod timers;
mod tree;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{Event, EventTarget, EventType, Handler, ListenerId, ListenerOptions, ListenerRegistry, Subscription};
pub use geometry::{DOMRect, LayoutMap, Viewport};
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use page::{Page, Window};
pub use style::{CssStyleDeclaration, IMPORTANT};
pub use timers::{TimerCallback, TimerId, TimerQueue};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a sentinel-encoded link into an option
    #[inline]
    pub(crate) fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
