//! Geometry: intervals → plot-space rectangles, plus per-device identity keys.
//!
//! Geometry is cached on each [`StateInterval`]; a layout pass only fills in
//! intervals that have none. Anything that moves the scales (a new viewport)
//! must call [`invalidate_geometry`] first.
//!
//! The device key is the sum of every interval's four coordinates plus the
//! 1-based position of every highlighted interval. It changes exactly when the
//! row's footprint or highlight pattern changes and never depends on labels.

use crate::pipeline::scale::Scales;
use crate::types::{Device, Geometry, StateInterval};

/// Fill in missing geometry and recompute every device key
pub fn compute_geometry(devices: &mut [Device], scales: &Scales) {
    let _span = tracing::debug_span!("compute_geometry").entered();

    let bandwidth = scales.device.bandwidth();
    for device in devices.iter_mut() {
        let Some(band) = scales.device.position(&device.name) else {
            tracing::warn!("Device {:?} has no band, skipping its geometry", device.name);
            continue;
        };

        let mut computed = 0usize;
        for interval in device.intervals.iter_mut().filter(|i| i.geometry().is_none()) {
            interval.set_geometry(Geometry {
                x1: scales.time.apply(interval.start),
                x2: scales.time.apply(interval.end),
                y1: band,
                y2: band + bandwidth,
            });
            computed += 1;
        }
        device.key = device_key(device);
        tracing::trace!(
            "Device {:?}: {} geometries computed, key {}",
            device.name,
            computed,
            device.key
        );
    }
}

/// Identity key of a device from its geometry and highlight positions
///
/// Intervals without geometry contribute nothing.
pub fn device_key(device: &Device) -> f64 {
    let footprint: f64 = device
        .intervals
        .iter()
        .filter_map(StateInterval::geometry)
        .map(Geometry::sum)
        .sum();
    let highlights: f64 = device.highlight_positions().map(|p| p as f64).sum();
    footprint + highlights
}

/// Drop cached geometry on every interval
pub fn invalidate_geometry(devices: &mut [Device]) {
    devices.iter_mut().for_each(Device::invalidate_geometry);
}
