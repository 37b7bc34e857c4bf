//! Load distance checks against the live viewport

use pagelib_dom::{DOMRect, NodeId, Page};

/// Element box lies within `multiplier` viewport heights of the viewport
///
/// Reads the current layout on every call.
pub fn is_within_load_distance(page: &Page, element: NodeId, multiplier: f64) -> bool {
    rect_within_load_distance(
        &page.bounding_client_rect(element),
        page.window.inner_height(),
        multiplier,
    )
}

/// Viewport-relative `rect` is within `multiplier * inner_height` above or
/// below the viewport
pub fn rect_within_load_distance(rect: &DOMRect, inner_height: f64, multiplier: f64) -> bool {
    let range = inner_height * multiplier;
    !(rect.top() > range || rect.bottom() < -range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelib_dom::{Document, Viewport};

    #[test]
    fn test_rect_bounds() {
        let height = 600.0;
        let on_screen = DOMRect::from_xywh(0.0, 100.0, 50.0, 50.0);
        let below = DOMRect::from_xywh(0.0, 1250.0, 50.0, 50.0);
        let above = DOMRect::from_xywh(0.0, -1400.0, 50.0, 50.0);

        assert!(rect_within_load_distance(&on_screen, height, 0.0));
        assert!(rect_within_load_distance(&below, height, 2.5));
        assert!(!rect_within_load_distance(&below, height, 2.0));
        assert!(!rect_within_load_distance(&above, height, 2.0));
        assert!(rect_within_load_distance(&above, height, 3.0));
    }

    #[test]
    fn test_edge_is_inclusive() {
        let rect = DOMRect::from_xywh(0.0, 600.0, 10.0, 10.0);
        assert!(rect_within_load_distance(&rect, 600.0, 1.0));
    }

    #[test]
    fn test_follows_scroll() {
        let mut page = Page::new(Document::default(), Viewport::new(400.0, 500.0));
        let body = page.document.body().unwrap();
        let img = page.tree_mut().create_element("img");
        page.tree_mut().append_child(body, img).unwrap();
        page.window.layout_mut().set(img, DOMRect::from_xywh(0.0, 2000.0, 100.0, 100.0));

        assert!(!is_within_load_distance(&page, img, 1.0));
        page.scroll_to(1600.0);
        assert!(is_within_load_distance(&page, img, 1.0));
    }
}
