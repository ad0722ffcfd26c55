mod sample;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use cellsize_calculators::{DeviceClass, StreamCellSizer};
use cellsize_core::{MeasuredBatch, MeasurementQueue, QueueConfig};
use cellsize_runtime_std::{StdRuntime, ThreadRenderer};
use cellsize_text::{CachedTextMeasurer, MonospacedTextMeasurer};

const DEFAULT_WIDTH: f32 = 375.0;

fn parse_width() -> anyhow::Result<f32> {
    match std::env::args().nth(1) {
        Some(arg) => {
            let width: f32 = arg
                .parse()
                .with_context(|| format!("width {arg:?} is not a number"))?;
            if !width.is_finite() || width < 0.0 {
                bail!("width must be a non-negative number, got {width}");
            }
            Ok(width)
        }
        None => Ok(DEFAULT_WIDTH),
    }
}

fn print_batch(title: &str, batch: &MeasuredBatch) {
    println!("{title} (width {}):", batch.width());
    for (id, heights) in batch.iter() {
        println!("  {id:>4}  {:>7.1}", heights.one_column);
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let width = parse_width()?;
    let device = DeviceClass::from_screen_width(width);
    log::info!("measuring sample stream at width {width} for {device:?}");

    let runtime = StdRuntime::new();

    let measurer = Arc::new(CachedTextMeasurer::new(MonospacedTextMeasurer));
    let renderer =
        ThreadRenderer::spawn(sample::measure_markup).context("failed to start render worker")?;
    let queue = MeasurementQueue::with_config(
        QueueConfig::default().with_render_timeout(Duration::from_secs(2)),
        StreamCellSizer::new(measurer.clone(), device),
        renderer,
        runtime.clock(),
        runtime.scheduler(),
    );
    queue.on_height_changed(|change| {
        log::debug!("{} -> {:?} ({:?})", change.item, change.heights, change.source);
    });

    queue.submit(sample::first_page(), width, |batch| print_batch("first page", &batch));
    queue.submit(sample::second_page(), width, |batch| print_batch("second page", &batch));

    // Pump on every frame request, and at least every 50 ms so a stalled
    // render still reaches its timeout.
    while !queue.is_idle() {
        runtime.wait_for_frame(Duration::from_millis(50));
        queue.pump();
    }

    let stats = queue.stats();
    log::info!(
        "{} jobs, {} items, {} renders ({} timed out, {} failed), text cache {} hits / {} misses",
        stats.jobs_completed,
        stats.items_measured,
        stats.renders_issued,
        stats.renders_timed_out,
        stats.renders_failed,
        measurer.hits(),
        measurer.misses()
    );
    Ok(())
}
