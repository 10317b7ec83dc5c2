//! Core data types for the event viewer
//!
//! This module contains the interval model every pipeline stage works on.
//!
//! # Main Types
//!
//! - [`Device`] - One timeline row, owning its ordered state intervals
//! - [`StateInterval`] - A span during which a device holds one state
//! - [`Geometry`] - Plot-space rectangle of an interval
//! - [`TimeWindow`] - The padded visible time range
//!
//! # Interval Lifecycle
//!
//! Conversion creates one interval per observation with only its start time
//! known (`end == start`). Interval derivation then assigns ends from the
//! following interval, prepends the synthetic unknown interval, clamps to the
//! window and drops anything without positive width. Geometry is filled in
//! last, once scales exist, and cached on the interval until invalidated.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Plot-space rectangle of an interval, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    /// Time-axis start
    pub x1: f64,
    /// Time-axis end
    pub x2: f64,
    /// Device band start
    pub y1: f64,
    /// Device band end
    pub y2: f64,
}

impl Geometry {
    /// Sum of the four coordinates
    pub fn sum(&self) -> f64 {
        self.x1 + self.x2 + self.y1 + self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// A span `[start, end)` during which a device holds one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateInterval {
    pub start: DateTime<Utc>,
    /// Exclusive upper bound
    pub end: DateTime<Utc>,
    /// Raw observation time; unlike `start` this is never clamped
    pub first_seen: DateTime<Utc>,
    pub state: String,
    pub color: String,
    pub highlight: bool,
    pub is_unknown: bool,
    geometry: Option<Geometry>,
}

impl StateInterval {
    /// Interval for a raw observation; its end is not known yet
    pub fn observed(
        time: DateTime<Utc>,
        state: impl Into<String>,
        color: impl Into<String>,
        highlight: bool,
    ) -> Self {
        Self {
            start: time,
            end: time,
            first_seen: time,
            state: state.into(),
            color: color.into(),
            highlight,
            is_unknown: false,
            geometry: None,
        }
    }

    /// Synthetic interval covering the time before a device's first observation
    pub fn unknown(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            first_seen: start,
            state: label.into(),
            color: color.into(),
            highlight: false,
            is_unknown: true,
            geometry: None,
        }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether the interval has positive width
    pub fn is_positive(&self) -> bool {
        self.end > self.start
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// Drop cached geometry so the next layout pass recomputes it
    pub fn invalidate_geometry(&mut self) {
        self.geometry = None;
    }
}

/// One timeline row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub name: String,
    pub intervals: Vec<StateInterval>,
    /// Identity token for matching rows across redraws
    pub key: f64,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
            key: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// 1-based positions of highlighted intervals
    pub fn highlight_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals
            .iter()
            .enumerate()
            .filter(|(_, interval)| interval.highlight)
            .map(|(i, _)| i + 1)
    }

    pub fn invalidate_geometry(&mut self) {
        self.intervals
            .iter_mut()
            .for_each(StateInterval::invalidate_geometry);
    }
}

/// The visible time range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Zero-width window at the Unix epoch, used when there are no observations
    pub fn empty() -> Self {
        Self::new(DateTime::default(), DateTime::default())
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `end <= start`
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }
}
