//! Integration tests for lazy image loading
//!
//! Layout boxes are set by hand; scrolling, timers and image downloads run on
//! the page's virtual window.

use pagelib_dom::{DOMRect, DomTree, EventTarget, EventType, NodeId, Page, Viewport};
use pagelib_html::{get_outer_html, parse_fragment, serialize, HtmlParser};
use pagelib_transform::lazy_load::{LOADED_CLASS, LOADING_CLASS, PENDING_CLASS, PLACEHOLDER_SRC};
use pagelib_transform::{collapse_tables, CollapseOptions, LazyLoadTransformer};

const VIEWPORT: Viewport = Viewport::new(400.0, 600.0);

fn page(html: &str) -> (Page, NodeId) {
    let (document, body) = parse_fragment(html).unwrap();
    (Page::new(document, VIEWPORT), body)
}

fn images(page: &Page, root: NodeId) -> Vec<NodeId> {
    page.tree().get_elements_by_tag_name(root, "img")
}

fn place(page: &mut Page, node: NodeId, y: f64) {
    page.window.layout_mut().set(node, DOMRect::from_xywh(0.0, y, 300.0, 200.0));
}

/// Drop state classes so markup can be compared with the original
fn strip_state_classes(tree: &mut DomTree, image: NodeId) {
    tree.remove_class(image, PENDING_CLASS).unwrap();
    tree.remove_class(image, LOADED_CLASS).unwrap();
    if tree.get_attribute(image, "class") == Some("") {
        tree.remove_attribute(image, "class").unwrap();
    }
}

fn window_listeners(page: &Page) -> usize {
    [EventType::Scroll, EventType::Resize]
        .into_iter()
        .map(|event_type| page.window.listeners().count(EventTarget::Window, event_type))
        .sum()
}

// ============================================================================
// ELIGIBILITY
// ============================================================================

#[test]
fn test_tiny_image_is_never_deferred() {
    let (mut page, body) = page(r#"<img src="/" style="width:1px;height:2px">"#);
    let img = images(&page, body)[0];
    page.window.layout_mut().set(img, DOMRect::from_xywh(0.0, 900.0, 1.0, 2.0));
    let lazy = LazyLoadTransformer::new(2.0);

    assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 0);
    page.scroll_to(50.0);
    page.flush_timers();
    page.complete_image_loads();

    assert!(!page.tree().has_class(img, PENDING_CLASS));
    assert_eq!(page.tree().get_attribute(img, "src"), Some("/"));
    assert!(!lazy.is_registered());
}

#[test]
fn test_conversion_skips_existing_placeholders() {
    let (mut page, body) = page(r#"<img src="/a.png"><img src="/b.png" width="20" height="20">"#);
    let lazy = LazyLoadTransformer::new(1.0);

    assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 1);
    assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 0);
    assert_eq!(lazy.pending_count(), 1);
}

// ============================================================================
// LOADING
// ============================================================================

#[test]
fn test_scroll_loads_image_within_distance() {
    let (mut page, body) = page(r#"<img src="/big.png" width="300" height="200">"#);
    let img = images(&page, body)[0];
    place(&mut page, img, 900.0);
    let lazy = LazyLoadTransformer::new(2.0);

    assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 1);
    assert!(lazy.is_registered());
    assert_eq!(page.tree().get_attribute(img, "src"), Some(PLACEHOLDER_SRC));
    assert!(page.tree().has_class(img, PENDING_CLASS));

    page.scroll_to(100.0);
    assert_eq!(page.flush_timers(), 1);
    assert_eq!(lazy.pending_count(), 0);
    assert!(!lazy.is_registered());
    assert_eq!(window_listeners(&page), 0);

    let download = page.pending_image_requests()[0];
    assert_eq!(page.tree().get_attribute(download, "src"), Some("/big.png"));
    assert!(page.tree().has_class(img, PENDING_CLASS));

    assert_eq!(page.complete_image_loads(), 1);
    let tree = page.tree();
    assert!(!tree.has_class(img, PENDING_CLASS));
    assert!(tree.has_class(img, LOADED_CLASS));
    assert_eq!(tree.get_attribute(img, "src"), Some("/big.png"));
    assert!(!tree.has_attribute(img, "data-src"));
    assert!(!tree.has_attribute(img, "style"));
}

#[test]
fn test_far_image_waits_for_scroll() {
    let (mut page, body) = page(r#"<img src="/near.png"><img src="/far.png">"#);
    let found = images(&page, body);
    let [near, far] = found[..] else { panic!("expected two images") };
    place(&mut page, near, 100.0);
    place(&mut page, far, 5000.0);
    let lazy = LazyLoadTransformer::new(1.0);
    lazy.convert_images_to_placeholders(&mut page, body).unwrap();

    assert_eq!(lazy.load_images(&mut page).unwrap(), 1);
    assert_eq!(lazy.pending_images(), vec![far]);
    assert!(lazy.is_registered());

    page.scroll_to(3000.0);
    page.flush_timers();
    assert_eq!(lazy.pending_count(), 1);

    page.scroll_to(4500.0);
    page.flush_timers();
    assert_eq!(lazy.pending_count(), 0);
    assert_eq!(page.complete_image_loads(), 2);
    assert_eq!(page.tree().get_attribute(far, "src"), Some("/far.png"));
}

#[test]
fn test_resize_triggers_evaluation() {
    let (mut page, body) = page(r#"<img src="/a.png">"#);
    let img = images(&page, body)[0];
    place(&mut page, img, 1000.0);
    let lazy = LazyLoadTransformer::new(1.0);
    lazy.convert_images_to_placeholders(&mut page, body).unwrap();

    page.resize(Viewport::new(400.0, 1100.0));
    page.flush_timers();
    assert_eq!(lazy.pending_count(), 0);
}

#[test]
fn test_scroll_burst_runs_one_pass() {
    let (mut page, body) = page(r#"<img src="/far.png">"#);
    let img = images(&page, body)[0];
    place(&mut page, img, 50_000.0);
    let lazy = LazyLoadTransformer::new(1.0);
    lazy.convert_images_to_placeholders(&mut page, body).unwrap();

    for y in 0..25 {
        page.scroll_to(f64::from(y) * 10.0);
    }
    assert_eq!(page.flush_timers(), 1);
    assert_eq!(lazy.load_placeholders(&mut page), Some(Ok(0)));
}

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn test_placeholder_round_trip_restores_markup() {
    let cases = [
        r#"<img alt="A" src="/a.png" srcset="/a2.png 2x" style="width: 120px; height: 80px !important;">"#,
        r#"<img src="/a.png" style="width:120px;height:80px">"#,
        r#"<img src="/a.png" width="300" height="200" style="">"#,
        r#"<img src="/a.png" srcset="" style="HEIGHT : 6em;width:10ex ;">"#,
        r#"<img alt="B" class="thumb" src="/b.png">"#,
    ];
    for html in cases {
        let (mut page, body) = page(html);
        let img = images(&page, body)[0];
        assert_eq!(get_outer_html(page.tree(), img), html);
        place(&mut page, img, 0.0);

        let lazy = LazyLoadTransformer::new(1.0);
        assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 1, "{html}");
        assert_ne!(get_outer_html(page.tree(), img), html);

        lazy.load_images(&mut page).unwrap();
        assert_eq!(page.complete_image_loads(), 1);
        strip_state_classes(page.tree_mut(), img);

        assert_eq!(get_outer_html(page.tree(), img), html);
    }
}

// ============================================================================
// TABLE TOGGLES
// ============================================================================

#[test]
fn test_expanding_table_loads_hidden_image() {
    let html = r#"<table><tr><th>Gallery</th></tr><tr><td><img src="/in-table.png"></td></tr></table>"#;
    let (mut page, body) = page(html);
    let img = images(&page, body)[0];
    place(&mut page, img, 200.0);

    collapse_tables(&mut page, body, &CollapseOptions::default()).unwrap();
    let lazy = LazyLoadTransformer::new(1.0);
    assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 1);

    page.scroll_to(0.0);
    page.flush_timers();
    assert_eq!(lazy.pending_count(), 1);

    let container = page.tree().get_elements_by_class_name(body, "pagelib_collapse_table_container")[0];
    let header = page.tree().first_child(container).unwrap();
    page.click(header);
    page.flush_timers();

    assert_eq!(lazy.pending_count(), 0);
    page.complete_image_loads();
    assert_eq!(page.tree().get_attribute(img, "src"), Some("/in-table.png"));
}

// ============================================================================
// REGISTRATION
// ============================================================================

#[test]
fn test_deregister_is_idempotent() {
    let (mut page, body) = page(r#"<img src="/a.png">"#);
    let lazy = LazyLoadTransformer::new(1.0);
    lazy.convert_images_to_placeholders(&mut page, body).unwrap();
    assert_eq!(window_listeners(&page), 2);

    lazy.deregister(&mut page);
    lazy.deregister(&mut page);
    assert!(!lazy.is_registered());
    assert_eq!(lazy.pending_count(), 0);
    assert_eq!(window_listeners(&page), 0);

    page.scroll_to(10.0);
    assert!(page.window.timers().is_empty());
}

#[test]
fn test_nothing_to_convert_registers_nothing() {
    let (mut page, body) = page("<p>no images</p>");
    let lazy = LazyLoadTransformer::new(1.0);
    assert_eq!(lazy.convert_images_to_placeholders(&mut page, body).unwrap(), 0);
    assert!(!lazy.is_registered());
    assert_eq!(page.window.listeners().len(), 0);
}

#[test]
fn test_prerendered_placeholders_are_adopted() {
    let (mut server, body) = page(r#"<p>intro</p><img src="/a.png" width="300" height="200">"#);
    LazyLoadTransformer::new(1.0).convert_images_to_placeholders(&mut server, body).unwrap();
    let markup = serialize(&server.document);

    let mut client = Page::new(HtmlParser::new().parse(&markup).unwrap(), VIEWPORT);
    let body = client.document.body().unwrap();
    let img = images(&client, body)[0];
    place(&mut client, img, 0.0);

    let lazy = LazyLoadTransformer::new(1.0);
    assert_eq!(lazy.collect_existing_placeholders(&mut client, body), 1);
    assert_eq!(lazy.collect_existing_placeholders(&mut client, body), 0);
    assert!(lazy.is_registered());

    client.scroll_to(0.0);
    client.flush_timers();
    client.complete_image_loads();
    assert_eq!(client.tree().get_attribute(img, "src"), Some("/a.png"));
    assert!(!client.tree().has_attribute(img, "style"));
}

#[test]
fn test_downloading_placeholder_is_not_adopted_again() {
    let (mut page, body) = page(r#"<img src="/a.png" width="300" height="200">"#);
    let img = images(&page, body)[0];
    place(&mut page, img, 0.0);
    let lazy = LazyLoadTransformer::new(1.0);
    lazy.convert_images_to_placeholders(&mut page, body).unwrap();

    assert_eq!(lazy.load_images(&mut page).unwrap(), 1);
    assert!(page.tree().has_class(img, PENDING_CLASS));
    assert!(page.tree().has_class(img, LOADING_CLASS));

    assert_eq!(lazy.collect_existing_placeholders(&mut page, body), 0);
    assert_eq!(lazy.pending_count(), 0);
    assert!(!lazy.is_registered());

    page.scroll_to(10.0);
    page.flush_timers();
    assert_eq!(page.pending_image_requests().len(), 1);
    assert_eq!(page.complete_image_loads(), 1);
    assert_eq!(page.tree().get_attribute(img, "class"), Some(LOADED_CLASS));
    assert_eq!(page.tree().get_attribute(img, "src"), Some("/a.png"));
}

#[test]
fn test_pages_are_independent() {
    let (mut first, first_body) = page(r#"<img src="/one.png">"#);
    let (mut second, second_body) = page(r#"<img src="/two.png">"#);
    let first_lazy = LazyLoadTransformer::new(1.0);
    let second_lazy = LazyLoadTransformer::new(1.0);
    first_lazy.convert_images_to_placeholders(&mut first, first_body).unwrap();
    second_lazy.convert_images_to_placeholders(&mut second, second_body).unwrap();

    let img = images(&first, first_body)[0];
    place(&mut first, img, 0.0);
    first.scroll_to(0.0);
    first.flush_timers();

    assert_eq!(first_lazy.pending_count(), 0);
    assert_eq!(second_lazy.pending_count(), 1);
    assert!(second.window.timers().is_empty());
    assert!(second_lazy.is_registered());
}
