//! Interval derivation: point observations → contiguous, windowed intervals.
//!
//! Per device, in child order:
//!
//! 1. each interval ends where the next one starts; the last ends at the
//!    window end
//! 2. if unknown synthesis is on and the first observation starts after the
//!    window start, a synthetic interval `[window.start, first.start)` is
//!    prepended
//! 3. starts before the window start are clamped to it
//! 4. intervals ending at or before the window start, or without positive
//!    width, are dropped
//!
//! Children are not re-sorted. An out-of-order child yields a non-positive
//! interval; it is dropped and the ends are reassigned from the surviving
//! starts until every interval has positive width.

use crate::config::UnknownSettings;
use crate::pipeline::legend::Legend;
use crate::types::{Device, StateInterval, TimeWindow};
use chrono::{DateTime, Utc};

/// Derive intervals for every device against the padded window
pub fn derive_intervals(
    devices: &mut [Device],
    window: &TimeWindow,
    unknown: &UnknownSettings,
    legend: &Legend,
) {
    let _span = tracing::debug_span!("derive_intervals").entered();

    let unknown_color = legend
        .unknown()
        .map(|entry| entry.color.as_str())
        .unwrap_or(unknown.color.as_str());

    for device in devices.iter_mut() {
        derive_device(device, window, unknown, unknown_color);
        tracing::trace!(
            "Device {:?}: {} intervals",
            device.name,
            device.intervals.len()
        );
    }
}

fn derive_device(
    device: &mut Device,
    window: &TimeWindow,
    unknown: &UnknownSettings,
    unknown_color: &str,
) {
    let intervals = &mut device.intervals;

    if intervals.windows(2).any(|pair| pair[1].start < pair[0].start) {
        tracing::warn!(
            "Observations for device {:?} are not in chronological order",
            device.name
        );
    }

    settle_observed(intervals, window.end);

    if unknown.show {
        if let Some(first_start) = intervals.first().map(|first| first.start) {
            if first_start > window.start {
                intervals.insert(
                    0,
                    StateInterval::unknown(
                        window.start,
                        first_start,
                        unknown.label.as_str(),
                        unknown_color,
                    ),
                );
            }
        }
    }

    for interval in intervals.iter_mut() {
        if interval.start < window.start {
            interval.start = window.start;
        }
    }

    intervals.retain(|interval| interval.end > window.start && interval.is_positive());
}

// Each pass removes at least one interval, so this terminates.
fn settle_observed(intervals: &mut Vec<StateInterval>, last_end: DateTime<Utc>) {
    loop {
        assign_ends(intervals, last_end);
        let before = intervals.len();
        intervals.retain(StateInterval::is_positive);
        if intervals.len() == before {
            break;
        }
    }
}

fn assign_ends(intervals: &mut [StateInterval], last_end: DateTime<Utc>) {
    let next_starts: Vec<_> = intervals
        .iter()
        .skip(1)
        .map(|interval| interval.start)
        .chain(std::iter::once(last_end))
        .collect();
    for (interval, end) in intervals.iter_mut().zip(next_starts) {
        interval.end = end;
    }
}
