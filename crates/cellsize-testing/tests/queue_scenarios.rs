use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cellsize_core::{HeightSource, ItemId, QueueConfig};
use cellsize_testing::prelude::*;

#[test]
fn sync_async_sync_items_write_in_order() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new().with_chrome(5.0));
    let batch = rule.submit(
        vec![
            announcement_item(1, "11", "", ""),
            editorial_item(2, "B", "<p>b</p>"),
            announcement_item(3, "33", "", ""),
        ],
        320.0,
    );

    assert_eq!(rule.heights().order(), vec![1]);
    assert!(rule.queue().has_render_in_flight());
    assert!(!batch.is_complete());

    assert!(rule.resolve_render(40.0));

    let batch = batch.batch();
    assert_order(&batch, &[1, 2, 3]);
    assert_batch_height(&batch, ItemId(1), 11.0);
    assert_batch_height(&batch, ItemId(2), 45.0);
    assert_batch_height(&batch, ItemId(3), 33.0);
    assert_eq!(rule.heights().order(), vec![1, 2, 3]);
}

#[test]
fn second_job_waits_for_first_render() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new());
    let first = rule.submit(vec![editorial_item(1, "A", "<p>a</p>")], 320.0);
    let second = rule.submit(vec![announcement_item(2, "20", "", "")], 320.0);

    assert!(!first.is_complete());
    assert!(!second.is_complete());
    assert_eq!(rule.queue().pending_jobs(), 2);
    assert!(rule.heights().is_empty());

    let completed = Rc::new(RefCell::new(Vec::new()));
    rule.queue().on_height_changed({
        let completed = completed.clone();
        move |change| completed.borrow_mut().push(change.item.0)
    });

    rule.resolve_render(60.0);

    assert_eq!(first.completions(), 1);
    assert_eq!(second.completions(), 1);
    assert_eq!(*completed.borrow(), vec![1, 2]);
    assert!(rule.queue().is_idle());
}

#[test]
fn at_most_one_render_outstanding() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new());
    let batch = rule.submit(
        (1..=4).map(|id| editorial_item(id, "E", "<p>e</p>")),
        300.0,
    );
    rule.submit(vec![editorial_item(5, "E", "<p>e</p>")], 300.0);

    for _ in 0..5 {
        assert_eq!(rule.renderer().outstanding(), 1);
        assert!(rule.resolve_render(10.0));
    }

    assert!(batch.is_complete());
    assert_eq!(rule.renderer().max_outstanding(), 1);
    assert_eq!(rule.queue().stats().peak_in_flight, 1);
    assert_eq!(rule.renderer().request_count(), 5);
}

#[test]
fn empty_job_never_touches_renderer() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new());
    let batch = rule.submit(Vec::new(), 320.0);
    assert!(batch.is_complete());
    assert!(batch.batch().is_empty());
    assert_eq!(rule.renderer().request_count(), 0);
}

#[test]
fn scripted_heights_resolve_without_frames() {
    let renderer = FakeRenderer::scripted([ScriptedRender::Height(25.0), ScriptedRender::Height(35.0)]);
    let rule = MeasurementTestRule::with_renderer(QueueConfig::default(), ScriptedSizer::new(), renderer);
    let batch = rule.submit(
        vec![editorial_item(1, "A", "a"), editorial_item(2, "B", "b")],
        200.0,
    );

    let batch = batch.batch();
    assert_batch_height(&batch, ItemId(1), 25.0);
    assert_batch_height(&batch, ItemId(2), 35.0);
    assert_eq!(rule.scheduler().frames_requested(), 0);
}

#[test]
fn stalled_render_times_out_to_sizer_fallback() {
    let config = QueueConfig::default().with_render_timeout(Duration::from_millis(250));
    let rule = MeasurementTestRule::with_config(config, ScriptedSizer::new().with_fallback(99.0));
    let batch = rule.submit(
        vec![editorial_item(1, "A", "a"), announcement_item(2, "7", "", "")],
        320.0,
    );

    assert!(!rule.advance_time(Duration::from_millis(249)));
    assert!(rule.advance_time(Duration::from_millis(1)));

    let batch = batch.batch();
    assert_batch_height(&batch, ItemId(1), 99.0);
    assert_batch_height(&batch, ItemId(2), 7.0);
    assert_eq!(rule.renderer().outstanding(), 0);
    assert_eq!(rule.queue().stats().renders_timed_out, 1);
    assert_eq!(rule.heights().changes()[0].source, HeightSource::Fallback);
}

#[test]
fn queue_fallback_height_applies_without_sizer_fallback() {
    let config = QueueConfig::default()
        .with_render_timeout(Duration::from_millis(10))
        .with_fallback_height(44.0);
    let rule = MeasurementTestRule::with_config(config, ScriptedSizer::new());
    let batch = rule.submit(vec![editorial_item(1, "A", "a")], 320.0);

    rule.advance_time(Duration::from_millis(10));
    assert_batch_height(&batch.batch(), ItemId(1), 44.0);
}

#[test]
fn late_resolution_after_timeout_is_ignored() {
    let config = QueueConfig::default().with_render_timeout(Duration::from_millis(10));
    let rule = MeasurementTestRule::with_config(config, ScriptedSizer::new());
    let batch = rule.submit(vec![editorial_item(1, "A", "a")], 320.0);
    rule.advance_time(Duration::from_millis(10));
    assert!(batch.is_complete());

    assert!(!rule.renderer().resolve(500.0));
    assert_eq!(batch.completions(), 1);
    assert_batch_height(&batch.batch(), ItemId(1), 0.0);
}

#[test]
fn failed_render_uses_fallback_and_continues() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new().with_fallback(12.0));
    let batch = rule.submit(
        vec![editorial_item(1, "A", "a"), editorial_item(2, "B", "b")],
        320.0,
    );

    assert!(rule.fail_render("surface lost"));
    assert!(rule.resolve_render(30.0));

    let batch = batch.batch();
    assert_batch_height(&batch, ItemId(1), 12.0);
    assert_batch_height(&batch, ItemId(2), 30.0);
    assert_eq!(rule.queue().stats().renders_failed, 1);
}

#[test]
fn unmeasurable_items_resolve_to_zero() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new());
    let batch = rule.submit(vec![unmeasurable_item(1)], 320.0);
    assert_batch_height(&batch.batch(), ItemId(1), 0.0);
}

#[test]
fn resubmitting_from_completion_queues_behind_active_job() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new());
    let follow_up = BatchSlot::new();

    {
        let queue = rule.queue().clone();
        let follow_up = follow_up.clone();
        rule.queue().submit(vec![announcement_item(1, "1", "", "")], 320.0, move |_| {
            queue.submit(vec![announcement_item(3, "3", "", "")], 320.0, follow_up.callback());
        });
    }

    assert!(follow_up.is_complete());
    assert_eq!(rule.heights().order(), vec![1, 3]);
}

#[test]
fn render_request_uses_sizer_markup_and_width() {
    let rule = MeasurementTestRule::new(ScriptedSizer::new());
    rule.submit(vec![editorial_item(8, "A", "<p>markup</p>")], 275.0);

    let request = rule.renderer().last_request().expect("request issued");
    assert_eq!(request.item, ItemId(8));
    assert_eq!(request.markup, "<p>markup</p>");
    assert_approx_eq(request.width, 275.0, 0.0, "render width");
}
