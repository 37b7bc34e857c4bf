//! Server-side prerender pass
//!
//! Runs the page transforms once, without a live viewport, and hands back
//! markup a client can pick up with `setup_event_handlers` and
//! `collect_existing_placeholders`.

use anyhow::{Context, Result};
use pagelib_dom::{Page, Viewport};
use pagelib_html::{serialize, HtmlParser};
use pagelib_transform::{collapse_tables, CollapseOptions, LazyLoadTransformer, TransformConfig};

/// Counts from one prerender
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrerenderReport {
    pub tables_collapsed: usize,
    pub images_deferred: usize,
}

/// Transform `html` and serialize the result
pub fn prerender(html: &str, config: &TransformConfig) -> Result<(String, PrerenderReport)> {
    config.validate().context("invalid transform config")?;

    let document = HtmlParser::new().parse(html).context("failed to parse input HTML")?;
    let mut page = Page::new(document, Viewport::default());
    let body = page.document.body().context("document has no <body>")?;

    let tables_collapsed = collapse_tables(&mut page, body, &CollapseOptions::from_config(config))
        .context("collapsing tables")?;

    let lazy = LazyLoadTransformer::from_config(config);
    let images_deferred = lazy
        .convert_images_to_placeholders(&mut page, body)
        .context("converting images to placeholders")?;
    // Placeholders stay in the markup; loading is the client's job.
    lazy.deregister(&mut page);

    let report = PrerenderReport { tables_collapsed, images_deferred };
    tracing::info!(tables_collapsed, images_deferred, "prerender finished");
    Ok((serialize(&page.document), report))
}

/// Parse a JSON config
pub fn load_config(json: &str) -> Result<TransformConfig> {
    let config: TransformConfig = serde_json::from_str(json).context("config is not valid JSON")?;
    Ok(config)
}
