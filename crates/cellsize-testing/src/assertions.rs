//! Assertion helpers for measured heights.

use cellsize_core::{ItemId, MeasuredBatch};

/// Assert that a value is within `tolerance` of the expected one.
///
/// Text metrics go through float arithmetic, so exact comparisons are
/// brittle for anything but whole-point results.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that `batch` holds `expected` for `id` in both columns.
pub fn assert_batch_height(batch: &MeasuredBatch, id: ItemId, expected: f32) {
    let heights = batch
        .get(id)
        .unwrap_or_else(|| panic!("{id} missing from batch {:?}", batch.order()));
    assert_approx_eq(heights.one_column, expected, 0.01, &format!("{id} one column"));
    assert_approx_eq(heights.multi_column, expected, 0.01, &format!("{id} multi column"));
}

/// Assert the order heights were written in.
pub fn assert_order(batch: &MeasuredBatch, expected: &[u64]) {
    let actual: Vec<u64> = batch.order().into_iter().map(|id| id.0).collect();
    assert_eq!(actual, expected, "measurement order");
}
