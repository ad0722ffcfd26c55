use super::*;
use cellsize_core::{Announcement, PageHeaderKind};

fn editorial() -> PageHeader {
    PageHeader::new(PageHeaderKind::Editorial, "Editorial", "<p>Fresh picks</p>")
}

fn zero_chrome() -> PromotionalHeaderLayout {
    PromotionalHeaderLayout {
        top_margin: 0.0,
        default_margin: 0.0,
        body_spacing: 0.0,
        stacked_margin: 0.0,
        ..PromotionalHeaderLayout::default()
    }
}

#[test]
fn minimum_clamp_raises_short_content() {
    let sizer = PromotionalHeaderSizer::default();
    assert_eq!(sizer.apply_minimum(50.0), 150.0);
}

#[test]
fn minimum_clamp_keeps_tall_content() {
    let sizer = PromotionalHeaderSizer::default();
    assert_eq!(sizer.apply_minimum(500.0), 500.0);
}

#[test]
fn tablets_use_larger_minimum() {
    let sizer = PromotionalHeaderSizer::new(Arc::new(MonospacedTextMeasurer), DeviceClass::Tablet);
    assert_eq!(sizer.minimum_height(), 300.0);
    assert_eq!(sizer.apply_minimum(200.0), 300.0);
}

#[test]
fn category_headers_are_sized_synchronously() {
    let sizer = PromotionalHeaderSizer::default();
    let header = PageHeader::new(PageHeaderKind::Category, "Art", "Drawings");
    // 30 top + 30 title + 12 + 20 body + 12 + 15 bottom = 119, below the floor.
    assert_eq!(sizer.computed_height(&header, None, 320.0), 119.0);
    assert_eq!(
        sizer.compute(&ItemContent::PageHeader(header), 320.0),
        SizeOutcome::Ready(150.0)
    );
}

#[test]
fn category_ignores_rendered_height() {
    let sizer = PromotionalHeaderSizer::default();
    let header = PageHeader::new(PageHeaderKind::Category, "Art", "Drawings");
    assert_eq!(
        sizer.computed_height(&header, Some(1000.0), 320.0),
        sizer.computed_height(&header, None, 320.0)
    );
}

#[test]
fn long_category_body_grows_past_minimum() {
    let sizer = PromotionalHeaderSizer::default();
    let body = "word ".repeat(200);
    let header = PageHeader::new(PageHeaderKind::Category, "Art", body);
    match sizer.compute(&ItemContent::PageHeader(header), 320.0) {
        SizeOutcome::Ready(height) => assert!(height > 150.0),
        other => panic!("expected a synchronous height, got {other:?}"),
    }
}

#[test]
fn editorial_headers_request_a_render() {
    let sizer = PromotionalHeaderSizer::default();
    let outcome = sizer.compute(&ItemContent::PageHeader(editorial()), 320.0);
    let SizeOutcome::Pending(spec) = outcome else {
        panic!("editorial header should be pending");
    };
    assert_eq!(spec.width, 290.0);
    assert_eq!(spec.markup, editorial_html("<p>Fresh picks</p>"));
}

#[test]
fn generic_kind_renders_like_editorial() {
    let sizer = PromotionalHeaderSizer::default();
    let header = PageHeader::new(PageHeaderKind::Generic, "Title", "<p>x</p>");
    assert!(matches!(
        sizer.compute(&ItemContent::PageHeader(header), 320.0),
        SizeOutcome::Pending(_)
    ));
}

#[test]
fn short_render_is_floored() {
    let sizer = PromotionalHeaderSizer::default().with_layout(zero_chrome());
    let header = PageHeader::new(PageHeaderKind::Editorial, "", "<p>x</p>");
    let content = ItemContent::PageHeader(header);
    assert_eq!(sizer.finish(&content, 320.0, 40.0), 150.0);
}

#[test]
fn tall_render_passes_through() {
    let sizer = PromotionalHeaderSizer::default().with_layout(zero_chrome());
    let header = PageHeader::new(PageHeaderKind::Editorial, "", "<p>x</p>");
    let content = ItemContent::PageHeader(header);
    assert_eq!(sizer.finish(&content, 320.0, 400.0), 400.0);
}

#[test]
fn rendered_height_adds_chrome() {
    let sizer = PromotionalHeaderSizer::default();
    let content = ItemContent::PageHeader(editorial());
    // 30 top + 30 title + 400 markup + 12 + 15 bottom.
    assert_eq!(sizer.finish(&content, 320.0, 400.0), 487.0);
}

#[test]
fn call_to_action_and_credit_stack_when_too_wide() {
    let sizer = PromotionalHeaderSizer::default();
    let header = PageHeader::new(PageHeaderKind::Category, "", "")
        .with_cta("Shop now")
        .with_posted_by("ello");
    // Side by side: max(20, 16). Stacked: 20 + 8 + 16.
    assert_eq!(sizer.computed_height(&header, None, 320.0), 89.0);
    assert_eq!(sizer.computed_height(&header, None, 150.0), 113.0);
}

#[test]
fn fallback_is_unrendered_height_with_floor() {
    let sizer = PromotionalHeaderSizer::default();
    let content = ItemContent::PageHeader(editorial());
    assert_eq!(sizer.fallback(&content, 320.0), Some(150.0));
    assert_eq!(sizer.fallback(&ItemContent::Unmeasurable, 320.0), None);
}

#[test]
fn other_content_measures_zero() {
    let sizer = PromotionalHeaderSizer::default();
    let content = ItemContent::Announcement(Announcement::default());
    assert_eq!(sizer.compute(&content, 320.0), SizeOutcome::Ready(0.0));
}
