//! pagelib transforms
//!
//! Page transforms for wiki article HTML shown in a small viewport:
//!
//! - [`collapse_tables`] hides large tables behind a captioned toggle
//! - [`LazyLoadTransformer`] defers image downloads until an image nears the
//!   viewport
//!
//! Both work on an explicit [`pagelib_dom::Page`]. They talk to each other only
//! through the `section-toggled` window event: expanding a table can reveal
//! images that were hidden, so the lazy loader re-checks its pending images.

pub mod attribute_store;
pub mod collapse_table;
mod config;
mod error;
mod header_text;
pub mod lazy_load;
mod throttle;
mod viewport;

pub use collapse_table::{
    apply_collapse_state, caption_suffix, classify_table, collapse_tables,
    expand_collapsed_table_if_it_contains_element, is_eligible_for_collapse, setup_event_handlers,
    toggle_collapse, CollapseDecision, CollapseOptions, CollapsePresentation, CollapseState,
    ContainerParts, FooterCallback, SectionToggled, SkipReason, SECTION_TOGGLED_EVENT,
};
pub use config::{TransformConfig, DEFAULT_COLLAPSE_BLACKLIST};
pub use error::{TransformError, TransformResult};
pub use header_text::get_header_text_array;
pub use lazy_load::{
    convert_image_to_placeholder, is_lazy_loadable, is_placeholder, load_image, LazyLoadTransformer,
};
pub use throttle::{throttle_delay, Throttle};
pub use viewport::{is_within_load_distance, rect_within_load_distance};
