//! Prerendered markup picked up by a client page

use pagelib_cli::prerender;
use pagelib_dom::{DOMRect, Page, Viewport};
use pagelib_html::HtmlParser;
use pagelib_transform::collapse_table::CONTAINER_CLASS;
use pagelib_transform::{setup_event_handlers, LazyLoadTransformer, TransformConfig};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html><head><title>Lighthouse</title></head><body>
<p>Lighthouses guide ships.</p>
<table class="infobox"><tr><th>Height</th><td>40 m</td></tr><tr><td><img src="/tower.jpg" width="220" height="300"></td></tr></table>
<img src="/beam.jpg" width="300" height="180">
</body></html>"#;

#[test]
fn test_client_resumes_prerendered_page() {
    let (markup, report) = prerender(ARTICLE, &TransformConfig::default()).unwrap();
    assert_eq!(report.tables_collapsed, 1);
    assert_eq!(report.images_deferred, 2);

    let mut page = Page::new(HtmlParser::new().parse(&markup).unwrap(), Viewport::new(360.0, 640.0));
    let body = page.document.body().unwrap();
    assert_eq!(setup_event_handlers(&mut page, body, None).unwrap(), 1);

    let images = page.tree().get_elements_by_tag_name(body, "img");
    for &img in &images {
        page.window.layout_mut().set(img, DOMRect::from_xywh(0.0, 100.0, 300.0, 200.0));
    }
    let lazy = LazyLoadTransformer::new(1.0);
    assert_eq!(lazy.collect_existing_placeholders(&mut page, body), 2);

    // The table image is hidden inside a collapsed table
    page.scroll_to(0.0);
    page.flush_timers();
    assert_eq!(lazy.pending_count(), 1);

    let container = page.tree().get_elements_by_class_name(body, CONTAINER_CLASS)[0];
    let header = page.tree().first_child(container).unwrap();
    page.click(header);
    page.flush_timers();
    page.complete_image_loads();

    assert_eq!(lazy.pending_count(), 0);
    let sources: Vec<_> = images.iter().map(|&img| page.tree().get_attribute(img, "src")).collect();
    assert_eq!(sources, [Some("/tower.jpg"), Some("/beam.jpg")]);
}

#[test]
fn test_page_title_is_left_out_of_caption() {
    let html = "<table><tr><th>Lighthouse</th><th>Keeper</th></tr></table>";
    let config = TransformConfig { page_title: Some("Lighthouse".into()), ..TransformConfig::default() };
    let (markup, _) = prerender(html, &config).unwrap();

    assert!(markup.contains("Keeper"));
    assert!(!markup.contains(": Lighthouse"));
}
