//! Scales: time → x pixel, device name → y band.
//!
//! Both are pure functions of their domain and range and are rebuilt on
//! every layout pass.

use crate::pipeline::layout::PlotDimensions;
use crate::types::{Device, TimeWindow};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Gap between bands, as a fraction of the step
pub const DEVICE_PADDING_INNER: f64 = 0.1;
/// Gap before the first and after the last band, as a fraction of the step
pub const DEVICE_PADDING_OUTER: f64 = 0.2;
/// Centre the bands in any leftover space
pub const DEVICE_ALIGN: f64 = 0.5;

/// Linear mapping from a time window onto a pixel span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: TimeWindow,
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: TimeWindow, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> TimeWindow {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Pixel position of `time`
    ///
    /// A zero-width domain maps everything to the middle of the range.
    pub fn apply(&self, time: DateTime<Utc>) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain.duration().num_milliseconds() as f64;
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        let offset = (time - self.domain.start).num_milliseconds() as f64;
        r0 + offset / span * (r1 - r0)
    }
}

/// Discrete mapping from device names onto equal-height bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Band scale with the device row padding
    ///
    /// Duplicate names share the band of their first occurrence.
    pub fn new<I, S>(names: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_padding(
            names,
            range,
            DEVICE_PADDING_INNER,
            DEVICE_PADDING_OUTER,
            DEVICE_ALIGN,
        )
    }

    pub fn with_padding<I, S>(
        names: I,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
        align: f64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domain = Vec::new();
        let mut index = HashMap::new();
        for name in names {
            let name = name.as_ref();
            if !index.contains_key(name) {
                index.insert(name.to_string(), domain.len());
                domain.push(name.to_string());
            }
        }

        let mut scale = Self {
            domain,
            index,
            range,
            padding_inner: padding_inner.clamp(0.0, 1.0),
            padding_outer: padding_outer.max(0.0),
            align: align.clamp(0.0, 1.0),
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        scale
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };

        self.step = (hi - lo) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = lo + (hi - lo - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    /// Start of the band for `name`
    pub fn position(&self, name: &str) -> Option<f64> {
        let i = *self.index.get(name)?;
        let (r0, r1) = self.range;
        // A reversed range hands out bands from the far end.
        let slot = if r1 < r0 { self.domain.len() - 1 - i } else { i };
        Some(self.start + self.step * slot as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// The two scales of one layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub time: TimeScale,
    pub device: BandScale,
}

/// Build scales for the devices, window and plot rectangle
pub fn compute_scales(devices: &[Device], window: &TimeWindow, plot: &PlotDimensions) -> Scales {
    let _span = tracing::debug_span!("compute_scales").entered();

    let scales = Scales {
        time: TimeScale::new(*window, (plot.x1, plot.x2)),
        device: BandScale::new(devices.iter().map(|d| d.name.as_str()), (plot.y1, plot.y2)),
    };
    tracing::debug!(
        "Scales: {} bands of {:.1}px, x {:.1}..{:.1}",
        scales.device.domain().len(),
        scales.device.bandwidth(),
        plot.x1,
        plot.x2
    );
    scales
}
