//! Table collapsing
//!
//! Wraps each eligible table in a container of three children: a header with
//! a caption, the table itself, and a footer. Header and footer clicks toggle
//! the table between collapsed and expanded. Every toggle announces the new
//! state with a `section-toggled` event on the window.
//!
//! ```text
//! div.pagelib_collapse_table_container
//! ├── div.pagelib_collapse_table_collapsed_container   (header)
//! │   └── label.pagelib_collapse_table_collapsed_caption
//! ├── table
//! └── div.pagelib_collapse_table_collapsed_bottom      (footer)
//! ```

use std::rc::Rc;

use pagelib_dom::{DomTree, Event, EventTarget, EventType, ListenerOptions, NodeId, Page};

use crate::config::TransformConfig;
use crate::header_text::get_header_text_array;
use crate::{TransformError, TransformResult};

pub const CONTAINER_CLASS: &str = "pagelib_collapse_table_container";
pub const HEADER_CLASS: &str = "pagelib_collapse_table_collapsed_container";
pub const FOOTER_CLASS: &str = "pagelib_collapse_table_collapsed_bottom";
pub const CAPTION_CLASS: &str = "pagelib_collapse_table_collapsed_caption";
pub const CAPTION_TEXT_CLASS: &str = "pagelib_collapse_table_collapse_text";
pub const EXPANDED_CLASS: &str = "pagelib_collapse_table_expanded";
pub const COLLAPSED_CLASS: &str = "pagelib_collapse_table_collapsed";
pub const ICON_CLASS: &str = "pagelib_collapse_table_icon";

/// Window event fired after every toggle
pub const SECTION_TOGGLED_EVENT: &str = "section-toggled";

/// Header strings shown in a caption
const CAPTION_HEADER_LIMIT: usize = 2;

/// Detail of a `section-toggled` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionToggled {
    /// The table is hidden after the toggle
    pub collapsed: bool,
}

/// Called with the container when a footer click collapses its table
pub type FooterCallback = Rc<dyn Fn(&mut Page, NodeId)>;

/// Options for [`collapse_tables`]
#[derive(Clone)]
pub struct CollapseOptions {
    pub page_title: Option<String>,
    pub is_main_page: bool,
    pub infobox_label: String,
    pub other_label: String,
    pub footer_label: String,
    pub blacklist: Vec<String>,
    pub footer_callback: Option<FooterCallback>,
}

impl Default for CollapseOptions {
    fn default() -> Self {
        Self::from_config(&TransformConfig::default())
    }
}

impl CollapseOptions {
    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            page_title: config.page_title.clone(),
            is_main_page: config.is_main_page,
            infobox_label: config.infobox_label.clone(),
            other_label: config.other_label.clone(),
            footer_label: config.footer_label.clone(),
            blacklist: config.collapse_blacklist.clone(),
            footer_callback: None,
        }
    }

    /// Set the footer callback, typically a scroll back to the table top
    pub fn with_footer_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Page, NodeId) + 'static,
    {
        self.footer_callback = Some(Rc::new(callback));
        self
    }
}

impl std::fmt::Debug for CollapseOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollapseOptions")
            .field("page_title", &self.page_title)
            .field("is_main_page", &self.is_main_page)
            .field("infobox_label", &self.infobox_label)
            .field("other_label", &self.other_label)
            .field("footer_label", &self.footer_label)
            .field("blacklist", &self.blacklist)
            .field("footer_callback", &self.footer_callback.is_some())
            .finish()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Why a table is left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyWrapped,
    Hidden,
    Blacklisted,
    MainPage,
    NoHeaderText,
}

/// Outcome of classifying one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollapseDecision {
    Collapse { header_text: Vec<String>, is_infobox: bool },
    Skip(SkipReason),
}

/// Table is not inline-hidden and carries no blacklisted class
pub fn is_eligible_for_collapse(tree: &DomTree, table: NodeId, blacklist: &[String]) -> bool {
    !tree.is_display_none(table)
        && !blacklist.iter().any(|class| tree.has_class(table, class))
}

/// Decide whether `table` gets wrapped
pub fn classify_table(tree: &DomTree, table: NodeId, options: &CollapseOptions) -> CollapseDecision {
    if options.is_main_page {
        return CollapseDecision::Skip(SkipReason::MainPage);
    }
    if tree.closest_with_class(table, CONTAINER_CLASS).is_some() {
        return CollapseDecision::Skip(SkipReason::AlreadyWrapped);
    }
    if tree.is_display_none(table) {
        return CollapseDecision::Skip(SkipReason::Hidden);
    }
    if !is_eligible_for_collapse(tree, table, &options.blacklist) {
        return CollapseDecision::Skip(SkipReason::Blacklisted);
    }

    let header_text = get_header_text_array(tree, table, options.page_title.as_deref());
    let is_infobox = tree.has_class(table, "infobox");
    if header_text.is_empty() && !is_infobox {
        return CollapseDecision::Skip(SkipReason::NoHeaderText);
    }
    CollapseDecision::Collapse { header_text, is_infobox }
}

/// Caption text after the title: up to two headers and an ellipsis
pub fn caption_suffix(header_text: &[String]) -> Option<String> {
    if header_text.is_empty() {
        return None;
    }
    let shown: Vec<&str> = header_text
        .iter()
        .take(CAPTION_HEADER_LIMIT)
        .map(String::as_str)
        .collect();
    Some(format!(": {} …", shown.join(", ")))
}

// ============================================================================
// Collapse pass
// ============================================================================

/// Wrap every eligible table under `content_root`
///
/// Returns the number of tables wrapped. Tables already inside a container
/// are skipped, so running the pass again wraps nothing new.
pub fn collapse_tables(page: &mut Page, content_root: NodeId, options: &CollapseOptions) -> TransformResult<usize> {
    if options.is_main_page {
        tracing::debug!("main page, tables left expanded");
        return Ok(0);
    }

    let tables = page.tree().get_elements_by_tag_name(content_root, "table");
    let mut wrapped = 0;
    for table in tables {
        match classify_table(page.tree(), table, options) {
            CollapseDecision::Collapse { header_text, is_infobox } => {
                let parts = wrap_table(page.tree_mut(), table, &header_text, is_infobox, options)?;
                attach_toggle_listeners(page, &parts, options.footer_callback.clone());
                wrapped += 1;
            }
            CollapseDecision::Skip(reason) => {
                tracing::trace!(%table, ?reason, "table not collapsed");
            }
        }
    }

    tracing::debug!(wrapped, "collapsed tables");
    Ok(wrapped)
}

fn wrap_table(tree: &mut DomTree, table: NodeId, header_text: &[String], is_infobox: bool, options: &CollapseOptions) -> TransformResult<ContainerParts> {
    let parent = tree.parent(table).ok_or(TransformError::MissingParent(table))?;

    let container = tree.create_element("div");
    tree.add_class(container, CONTAINER_CLASS)?;
    tree.insert_before(parent, container, Some(table))?;

    let header = tree.create_element("div");
    tree.add_class(header, HEADER_CLASS)?;
    tree.set_style_property(header, "display", "block", "")?;
    let title = if is_infobox { &options.infobox_label } else { &options.other_label };
    let caption = build_caption(tree, title, header_text)?;
    tree.append_child(header, caption)?;

    let footer = tree.create_element("div");
    tree.add_class(footer, FOOTER_CLASS)?;
    tree.add_class(footer, ICON_CLASS)?;
    let footer_text = tree.create_text(&options.footer_label);
    tree.append_child(footer, footer_text)?;

    tree.append_child(container, header)?;
    tree.append_child(container, table)?;
    tree.append_child(container, footer)?;

    tree.set_style_property(table, "margin-top", "0px", "")?;
    tree.set_style_property(table, "margin-bottom", "0px", "")?;

    let parts = ContainerParts {
        container,
        header,
        table,
        footer,
        caption: Some(caption),
    };
    apply_collapse_state(tree, &parts, CollapseState::Collapsed)?;

    tracing::trace!(%table, %container, is_infobox, "table wrapped");
    Ok(parts)
}

fn build_caption(tree: &mut DomTree, title: &str, header_text: &[String]) -> TransformResult<NodeId> {
    let caption = tree.create_element("label");
    tree.add_class(caption, CAPTION_CLASS)?;

    let strong = tree.create_element("strong");
    let title_text = tree.create_text(title);
    tree.append_child(strong, title_text)?;
    tree.append_child(caption, strong)?;

    if let Some(suffix) = caption_suffix(header_text) {
        let span = tree.create_element("span");
        tree.add_class(span, CAPTION_TEXT_CLASS)?;
        let text = tree.create_text(&suffix);
        tree.append_child(span, text)?;
        tree.append_child(caption, span)?;
    }
    Ok(caption)
}

/// Wire header and footer clicks of a container to [`toggle_collapse`]
fn attach_toggle_listeners(page: &mut Page, parts: &ContainerParts, footer_callback: Option<FooterCallback>) {
    let header = parts.header;
    page.add_event_listener(EventTarget::Node(header), EventType::Click, move |page, _| {
        if let Err(err) = toggle_collapse(page, header, None) {
            tracing::warn!(%header, %err, "header toggle failed");
        }
    }, ListenerOptions::default());

    let footer = parts.footer;
    page.add_event_listener(EventTarget::Node(footer), EventType::Click, move |page, _| {
        if let Err(err) = toggle_collapse(page, footer, footer_callback.as_ref()) {
            tracing::warn!(%footer, %err, "footer toggle failed");
        }
    }, ListenerOptions::default());
}

/// Attach click handling to containers that already exist under `root`
///
/// For markup wrapped ahead of time, e.g. by a server-side pass. Returns the
/// number of containers wired.
pub fn setup_event_handlers(page: &mut Page, root: NodeId, footer_callback: Option<FooterCallback>) -> TransformResult<usize> {
    let containers = page.tree().get_elements_by_class_name(root, CONTAINER_CLASS);
    for &container in &containers {
        let parts = ContainerParts::of(page.tree(), container)?;
        attach_toggle_listeners(page, &parts, footer_callback.clone());
    }
    tracing::debug!(containers = containers.len(), "collapse handlers attached");
    Ok(containers.len())
}

// ============================================================================
// State machine
// ============================================================================

/// The children of a collapse container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerParts {
    pub container: NodeId,
    pub header: NodeId,
    pub table: NodeId,
    pub footer: NodeId,
    pub caption: Option<NodeId>,
}

impl ContainerParts {
    /// Read header, table and footer from a container element
    pub fn of(tree: &DomTree, container: NodeId) -> TransformResult<Self> {
        let children = tree.child_elements(container);
        let [header, table, footer] = children[..] else {
            return Err(TransformError::MalformedContainer(container));
        };
        let caption = tree.get_elements_by_class_name(header, CAPTION_CLASS).first().copied();
        Ok(Self { container, header, table, footer, caption })
    }
}

/// Presentation state of a wrapped table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseState {
    /// Table hidden, header caption shown
    Collapsed,
    /// Table and footer shown
    Expanded,
}

/// What a state looks like in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapsePresentation {
    pub table_display: &'static str,
    pub footer_display: &'static str,
    pub caption_visibility: &'static str,
    pub header_classes_removed: &'static [&'static str],
    pub header_classes_added: &'static [&'static str],
}

impl CollapseState {
    /// State implied by the table's inline `display`
    pub fn from_table_display(display: &str) -> Self {
        if display.eq_ignore_ascii_case("none") {
            CollapseState::Collapsed
        } else {
            CollapseState::Expanded
        }
    }

    /// Current state of a container
    pub fn of(tree: &DomTree, parts: &ContainerParts) -> Self {
        Self::from_table_display(tree.style(parts.table).get_property_value("display"))
    }

    /// State after one toggle
    pub fn next(self) -> Self {
        match self {
            CollapseState::Collapsed => CollapseState::Expanded,
            CollapseState::Expanded => CollapseState::Collapsed,
        }
    }

    pub fn is_collapsed(self) -> bool {
        self == CollapseState::Collapsed
    }

    pub fn presentation(self) -> CollapsePresentation {
        match self {
            CollapseState::Collapsed => CollapsePresentation {
                table_display: "none",
                footer_display: "none",
                caption_visibility: "visible",
                header_classes_removed: &[COLLAPSED_CLASS, ICON_CLASS],
                header_classes_added: &[EXPANDED_CLASS],
            },
            CollapseState::Expanded => CollapsePresentation {
                table_display: "block",
                footer_display: "block",
                caption_visibility: "hidden",
                header_classes_removed: &[EXPANDED_CLASS],
                header_classes_added: &[COLLAPSED_CLASS, ICON_CLASS],
            },
        }
    }
}

/// Write `state` into the container's styles and classes
pub fn apply_collapse_state(tree: &mut DomTree, parts: &ContainerParts, state: CollapseState) -> TransformResult<()> {
    let presentation = state.presentation();

    tree.set_style_property(parts.table, "display", presentation.table_display, "")?;
    tree.set_style_property(parts.footer, "display", presentation.footer_display, "")?;
    if let Some(caption) = parts.caption {
        tree.set_style_property(caption, "visibility", presentation.caption_visibility, "")?;
    }

    let mut classes = tree.class_list(parts.header);
    classes.remove(presentation.header_classes_removed);
    classes.add(presentation.header_classes_added);
    tree.set_class_list(parts.header, &classes)?;
    Ok(())
}

/// Toggle the container that `clicked` (its header or footer) belongs to
///
/// Returns whether the table is now collapsed. `footer_callback` runs only
/// when `clicked` is the footer and the table was collapsed by this toggle.
pub fn toggle_collapse(page: &mut Page, clicked: NodeId, footer_callback: Option<&FooterCallback>) -> TransformResult<bool> {
    let container = page.tree().parent(clicked).ok_or(TransformError::MissingParent(clicked))?;
    let parts = ContainerParts::of(page.tree(), container)?;

    let state = CollapseState::of(page.tree(), &parts).next();
    apply_collapse_state(page.tree_mut(), &parts, state)?;
    let collapsed = state.is_collapsed();
    tracing::trace!(%container, collapsed, "table toggled");

    if collapsed && clicked == parts.footer {
        if let Some(callback) = footer_callback {
            callback(page, container);
        }
    }

    page.dispatch_event(Event::custom(
        SECTION_TOGGLED_EVENT,
        EventTarget::Window,
        SectionToggled { collapsed },
    ));
    Ok(collapsed)
}

/// Expand the collapsed table containing `element`, if there is one
///
/// Used before scrolling to an anchor inside a table. Returns whether a table
/// was expanded.
pub fn expand_collapsed_table_if_it_contains_element(page: &mut Page, element: NodeId) -> TransformResult<bool> {
    let Some(container) = page.tree().closest_with_class(element, CONTAINER_CLASS) else {
        return Ok(false);
    };
    let parts = ContainerParts::of(page.tree(), container)?;
    if !CollapseState::of(page.tree(), &parts).is_collapsed() {
        return Ok(false);
    }
    toggle_collapse(page, parts.header, None)?;
    Ok(true)
}
