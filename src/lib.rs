//! # Event Viewer: device state timelines
//!
//! Turns a host data matrix (devices × time-stamped state observations) into
//! a Gantt-style timeline: contiguous state intervals per device, clamped to
//! a padded time window, with a stable legend, scales, axis gutters and
//! per-interval geometry ready for drawing.
//!
//! ## Architecture
//!
//! - **Input**: the host matrix and its column role bindings
//! - **Pipeline**: validation, conversion, interval derivation, sizing,
//!   scales and geometry, each a pure stage
//! - **Viewer**: decides per refresh how much of the pipeline to rerun
//! - **Collaborators**: colour palette and text measurement sit behind
//!   traits so a host can supply its own
//!
//! ## Configuration
//!
//! [`Settings`] mirrors the host's formatting pane (legend, axes, lead/lag
//! padding, colour overrides, unknown-state synthesis) and loads from JSON or
//! TOML.
//!
//! ## Example
//!
//! ```no_run
//! use event_viewer::{DataMatrix, EventViewer, Settings, Update, Viewport};
//!
//! fn main() -> event_viewer::Result<()> {
//!     let matrix = DataMatrix::from_json_file("events.json")?;
//!     let mut viewer = EventViewer::new(Settings::default(), "en-US");
//!
//!     match viewer.update(&matrix, Viewport::new(1280.0, 480.0)) {
//!         Update::Rendered(view) => {
//!             for device in &view.devices {
//!                 println!("{}: {} intervals", device.name, device.intervals.len());
//!             }
//!         }
//!         Update::Invalid(report) => {
//!             for check in report.missing() {
//!                 println!("missing: {}", check);
//!             }
//!         }
//!         Update::Unchanged => {}
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod measure;
pub mod palette;
pub mod pipeline;
pub mod types;
pub mod viewer;

// Re-export commonly used types
pub use config::Settings;
pub use error::{Result, ViewerError};
pub use format::TimeFormatter;
pub use input::{CellValue, ColumnMetadata, DataMatrix, MatrixNode, MatrixRow, Role};
pub use pipeline::{Legend, ValidationReport, Viewport};
pub use types::{Device, Geometry, StateInterval, TimeWindow};
pub use viewer::{EventViewer, TimelineView, Update};
