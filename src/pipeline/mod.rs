//! Data transformation pipeline.
//!
//! A host matrix goes through a fixed sequence of pure stages. Each stage
//! takes its configuration explicitly and runs to completion; nothing is
//! shared between runs except what [`crate::viewer::EventViewer`] chooses to
//! cache.
//!
//! # Architecture
//!
//! ```text
//! DataMatrix ──► validate ──► convert ──► derive_intervals
//!                   │            │               │
//!                   ▼            ▼               ▼
//!          ValidationReport   Legend      contiguous, windowed
//!                          TimeWindow        intervals
//!                                                │
//!   compute_axis_dimensions ◄────────────────────┤
//!   compute_legend_dimensions                    │
//!              │                                 │
//!              ▼                                 ▼
//!   compute_plot_dimensions ──► compute_scales ──► compute_geometry
//!                                                   (+ device keys)
//! ```
//!
//! # Design
//!
//! - **Report, don't fail** - missing roles or non-date times produce a
//!   [`ValidationReport`] and no output, never a partial result.
//! - **Explicit legend map** - label → index lookups, insertion-ordered
//!   iteration, unknown entry pinned at index 0.
//! - **Owned geometry cache** - each interval owns its geometry; a new
//!   viewport invalidates it explicitly.
//! - **Acyclic sizing** - axis gutters come from raw names and timestamps,
//!   so they exist before the scales they constrain.

pub mod axis;
pub mod convert;
pub mod geometry;
pub mod intervals;
pub mod layout;
pub mod legend;
pub mod scale;
pub mod validation;

pub use axis::{compute_axis_dimensions, AxisDimensions, AXIS_LABEL_MARGIN};
pub use convert::{convert, padded_window, Conversion, ConvertedData};
pub use geometry::{compute_geometry, device_key, invalidate_geometry};
pub use intervals::derive_intervals;
pub use layout::{
    compute_legend_dimensions, compute_plot_dimensions, LegendDimensions, PlotDimensions,
    Viewport,
};
pub use legend::{Legend, LegendEntry};
pub use scale::{compute_scales, BandScale, Scales, TimeScale};
pub use validation::{validate, Check, ValidationReport};
