//! Lazy image loading
//!
//! Images are turned into placeholders: the real `src`/`srcset` move into
//! shadow attributes, `src` points at a transparent pixel, and the box is
//! pinned to its final size. A [`LazyLoadTransformer`] watches scrolling,
//! resizing and table toggles, and swaps the real source back in once a
//! placeholder comes within load distance of the viewport.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use pagelib_dom::{
    DomTree, EventTarget, EventType, ListenerOptions, NodeId, Page, Subscription, IMPORTANT,
};

use crate::attribute_store::{self, PreservedAttribute};
use crate::collapse_table::SECTION_TOGGLED_EVENT;
use crate::throttle::Throttle;
use crate::viewport::is_within_load_distance;
use crate::{TransformConfig, TransformResult};

pub const PENDING_CLASS: &str = "pagelib_lazy_load_image_pending";
pub const LOADED_CLASS: &str = "pagelib_lazy_load_image_loaded";
/// Placeholder whose real image is downloading; cleared with the pending class
pub const LOADING_CLASS: &str = "pagelib_lazy_load_image_loading";

/// Transparent 1x1 GIF
pub const PLACEHOLDER_SRC: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Default minimum time between two load passes
pub const DEFAULT_THROTTLE_PERIOD: Duration = Duration::from_millis(100);

const PRESERVED: &[PreservedAttribute] = &[
    PreservedAttribute::Attribute("src"),
    PreservedAttribute::Attribute("srcset"),
    PreservedAttribute::StyleProperty("width"),
    PreservedAttribute::StyleProperty("height"),
    // Raw `style` last, so restoring writes the author's text back verbatim
    RAW_STYLE,
];

const RAW_STYLE: PreservedAttribute = PreservedAttribute::Attribute("style");

const DIMENSIONS: [&str; 2] = ["width", "height"];

/// Smallest dimension, per unit, worth deferring
const MINIMUM_LAZY_LOAD_SIZE: &[(&str, f64)] = &[("px", 50.0), ("ex", 10.0), ("em", 5.0)];

// ============================================================================
// Placeholder conversion
// ============================================================================

/// Image is large enough, or of unknown size, to be worth deferring
///
/// Each dimension comes from inline style, falling back to the attribute.
/// Unitless values are pixels; unknown units and unparseable values count as
/// large.
pub fn is_lazy_loadable(tree: &DomTree, image: NodeId) -> bool {
    DIMENSIONS.iter().all(|dimension| {
        let value = tree
            .style_property(image, dimension)
            .or_else(|| tree.get_attribute(image, dimension).map(str::to_string));
        value.is_none_or(|value| is_dimension_lazy_loadable(&value))
    })
}

fn is_dimension_lazy_loadable(value: &str) -> bool {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let Ok(number) = number.parse::<f64>() else {
        return true;
    };
    let unit = match unit.trim() {
        "" => "px".to_string(),
        unit => unit.to_ascii_lowercase(),
    };
    MINIMUM_LAZY_LOAD_SIZE
        .iter()
        .find(|(name, _)| *name == unit)
        .is_none_or(|&(_, minimum)| number >= minimum)
}

/// Element is a placeholder that has not loaded yet
pub fn is_placeholder(tree: &DomTree, image: NodeId) -> bool {
    tree.has_class(image, PENDING_CLASS)
}

/// Rewrite `image` into a pending placeholder
///
/// Source attributes, dimension styles and the raw `style` text are stashed;
/// the box keeps its width and height through `!important` overrides.
pub fn convert_image_to_placeholder(tree: &mut DomTree, image: NodeId) -> TransformResult<()> {
    attribute_store::preserve(tree, image, image, PRESERVED)?;

    let pinned: Vec<(&str, String)> = DIMENSIONS
        .iter()
        .filter_map(|&dimension| pinned_dimension(tree, image, dimension).map(|value| (dimension, value)))
        .collect();

    tree.set_attribute(image, "src", PLACEHOLDER_SRC)?;
    if tree.has_attribute(image, "srcset") {
        tree.set_attribute(image, "srcset", "")?;
    }
    for (dimension, value) in pinned {
        tree.set_style_property(image, dimension, &value, IMPORTANT)?;
    }
    tree.add_class(image, PENDING_CLASS)?;
    Ok(())
}

/// Size to hold a placeholder at: the numeric attribute in pixels, else the
/// inline style value
fn pinned_dimension(tree: &DomTree, image: NodeId, dimension: &str) -> Option<String> {
    tree.get_attribute(image, dimension)
        .map(str::trim)
        .filter(|value| value.parse::<f64>().is_ok())
        .map(|value| format!("{value}px"))
        .or_else(|| tree.style_property(image, dimension))
}

/// Start the real download for `placeholder`
///
/// A detached image fetches the stashed source; its `load` event finishes
/// the placeholder. Returns the downloading element.
pub fn load_image(page: &mut Page, placeholder: NodeId) -> TransformResult<NodeId> {
    let download = page.tree_mut().create_element("img");

    page.add_event_listener(EventTarget::Node(download), EventType::Load, move |page, _| {
        if let Err(err) = finish_image_load(page.tree_mut(), placeholder) {
            tracing::warn!(%placeholder, %err, "restoring loaded image failed");
        }
    }, ListenerOptions::ONCE);

    let tree = page.tree_mut();
    for name in ["src", "srcset"] {
        if let Some(value) = tree.get_attribute(placeholder, &format!("data-{name}")).map(str::to_string) {
            tree.set_attribute(download, name, &value)?;
        }
    }
    tree.add_class(placeholder, LOADING_CLASS)?;
    page.request_image(download);

    tracing::trace!(%placeholder, %download, "image load started");
    Ok(download)
}

/// Put the stashed attributes back on a placeholder whose image arrived
fn finish_image_load(tree: &mut DomTree, placeholder: NodeId) -> TransformResult<()> {
    attribute_store::restore(tree, placeholder, placeholder, PRESERVED)?;

    for (original, name) in [(PreservedAttribute::Attribute("src"), "src"), (RAW_STYLE, "style")] {
        if !attribute_store::is_preserved(tree, placeholder, original) {
            tree.remove_attribute(placeholder, name)?;
        }
    }

    attribute_store::discard(tree, placeholder, PRESERVED)?;
    tree.remove_class(placeholder, PENDING_CLASS)?;
    tree.remove_class(placeholder, LOADING_CLASS)?;
    tree.add_class(placeholder, LOADED_CLASS)?;
    Ok(())
}

// ============================================================================
// Transformer
// ============================================================================

#[derive(Default)]
struct LazyLoadState {
    placeholders: Vec<NodeId>,
    subscriptions: Vec<Subscription>,
}

struct LazyLoadInner {
    load_distance_multiplier: f64,
    state: RefCell<LazyLoadState>,
    throttle: Throttle<TransformResult<usize>>,
}

/// Loads placeholders as they near the viewport
///
/// One per page. Holds the pending placeholders and the window listeners;
/// listeners are registered while anything is pending and removed once the
/// last placeholder loads.
pub struct LazyLoadTransformer {
    inner: Rc<LazyLoadInner>,
}

impl LazyLoadTransformer {
    pub fn new(load_distance_multiplier: f64) -> Self {
        Self::with_throttle_period(load_distance_multiplier, DEFAULT_THROTTLE_PERIOD)
    }

    pub fn with_throttle_period(load_distance_multiplier: f64, period: Duration) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<LazyLoadInner>| {
            let weak = weak.clone();
            let throttle = Throttle::wrap(period, move |page| match weak.upgrade() {
                Some(inner) => inner.load_images(page),
                None => Ok(0),
            });
            LazyLoadInner {
                load_distance_multiplier,
                state: RefCell::new(LazyLoadState::default()),
                throttle,
            }
        });
        Self { inner }
    }

    pub fn from_config(config: &TransformConfig) -> Self {
        Self::with_throttle_period(config.load_distance_multiplier, config.throttle_period())
    }

    /// Convert lazy-loadable images under `root` and start watching them
    ///
    /// Returns the number of images converted.
    pub fn convert_images_to_placeholders(&self, page: &mut Page, root: NodeId) -> TransformResult<usize> {
        let images: Vec<NodeId> = page
            .tree()
            .get_elements_by_tag_name(root, "img")
            .into_iter()
            .filter(|&image| {
                let tree = page.tree();
                !is_placeholder(tree, image) && !tree.has_class(image, LOADED_CLASS) && is_lazy_loadable(tree, image)
            })
            .collect();

        for &image in &images {
            convert_image_to_placeholder(page.tree_mut(), image)?;
            self.inner.state.borrow_mut().placeholders.push(image);
        }

        tracing::debug!(converted = images.len(), pending = self.pending_count(), "images converted to placeholders");
        self.register(page);
        Ok(images.len())
    }

    /// Adopt placeholders already present under `root`, e.g. from a
    /// server-side pass
    ///
    /// Placeholders whose download has started are left alone.
    pub fn collect_existing_placeholders(&self, page: &mut Page, root: NodeId) -> usize {
        let found: Vec<NodeId> = page
            .tree()
            .get_elements_by_class_name(root, PENDING_CLASS)
            .into_iter()
            .filter(|&image| !page.tree().has_class(image, LOADING_CLASS))
            .collect();
        let added = {
            let mut state = self.inner.state.borrow_mut();
            let before = state.placeholders.len();
            for image in found {
                if !state.placeholders.contains(&image) {
                    state.placeholders.push(image);
                }
            }
            state.placeholders.len() - before
        };
        tracing::debug!(added, "existing placeholders collected");
        self.register(page);
        added
    }

    /// Load every pending placeholder that is visible and within load
    /// distance
    ///
    /// Returns the number started. Deregisters once nothing is pending.
    pub fn load_images(&self, page: &mut Page) -> TransformResult<usize> {
        self.inner.load_images(page)
    }

    /// Throttled [`load_images`](Self::load_images); returns the last
    /// completed pass's result
    pub fn load_placeholders(&self, page: &mut Page) -> Option<TransformResult<usize>> {
        self.inner.throttle.queue(page)
    }

    /// Stop listening and forget all pending placeholders
    ///
    /// Downloads already started still finish.
    pub fn deregister(&self, page: &mut Page) {
        self.inner.deregister(page);
    }

    pub fn pending_count(&self) -> usize {
        self.inner.state.borrow().placeholders.len()
    }

    pub fn pending_images(&self) -> Vec<NodeId> {
        self.inner.state.borrow().placeholders.clone()
    }

    /// Window listeners are active
    pub fn is_registered(&self) -> bool {
        !self.inner.state.borrow().subscriptions.is_empty()
    }

    pub fn load_distance_multiplier(&self) -> f64 {
        self.inner.load_distance_multiplier
    }

    fn register(&self, page: &mut Page) {
        {
            let state = self.inner.state.borrow();
            if !state.subscriptions.is_empty() || state.placeholders.is_empty() {
                return;
            }
        }

        let events = [
            EventType::Scroll,
            EventType::Resize,
            EventType::Custom(SECTION_TOGGLED_EVENT),
        ];
        let subscriptions: Vec<Subscription> = events
            .into_iter()
            .map(|event_type| {
                let throttle = self.inner.throttle.clone();
                page.add_event_listener(EventTarget::Window, event_type, move |page, _| {
                    throttle.queue(page);
                }, ListenerOptions::default())
            })
            .collect();

        tracing::debug!(listeners = subscriptions.len(), "lazy load registered");
        self.inner.state.borrow_mut().subscriptions = subscriptions;
    }
}

impl LazyLoadInner {
    fn load_images(&self, page: &mut Page) -> TransformResult<usize> {
        let pending = self.state.borrow().placeholders.clone();
        let mut remaining = Vec::with_capacity(pending.len());
        let mut started = 0;

        for (index, &placeholder) in pending.iter().enumerate() {
            let eligible = page.is_visible(placeholder)
                && is_within_load_distance(page, placeholder, self.load_distance_multiplier);
            if !eligible {
                remaining.push(placeholder);
                continue;
            }
            if let Err(err) = load_image(page, placeholder) {
                remaining.extend_from_slice(&pending[index..]);
                self.state.borrow_mut().placeholders = remaining;
                tracing::warn!(%placeholder, %err, "image load pass aborted");
                return Err(err);
            }
            started += 1;
        }

        let now_empty = remaining.is_empty();
        tracing::debug!(started, pending = remaining.len(), "image load pass");
        self.state.borrow_mut().placeholders = remaining;
        if now_empty {
            self.deregister(page);
        }
        Ok(started)
    }

    fn deregister(&self, page: &mut Page) {
        let subscriptions = {
            let mut state = self.state.borrow_mut();
            state.placeholders.clear();
            std::mem::take(&mut state.subscriptions)
        };
        for subscription in &subscriptions {
            page.remove_event_listener(subscription);
        }
        self.throttle.reset(page);
        if !subscriptions.is_empty() {
            tracing::debug!("lazy load deregistered");
        }
    }
}

impl std::fmt::Debug for LazyLoadTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("LazyLoadTransformer")
            .field("load_distance_multiplier", &self.inner.load_distance_multiplier)
            .field("pending", &state.placeholders.len())
            .field("registered", &!state.subscriptions.is_empty())
            .field("throttle", &self.inner.throttle)
            .finish()
    }
}
