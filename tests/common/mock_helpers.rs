//! Deterministic stand-ins for the host collaborators

use event_viewer::measure::{TextMeasurer, TextProperties};
use event_viewer::palette::ColorPalette;
use std::cell::RefCell;
use std::rc::Rc;

/// Measures every non-empty text with the same extents
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasurer {
    pub width: f64,
    pub height: f64,
}

impl TextMeasurer for FixedMeasurer {
    fn measure_width(&self, _properties: &TextProperties, text: &str) -> f64 {
        if text.is_empty() {
            0.0
        } else {
            self.width
        }
    }

    fn measure_height(&self, _properties: &TextProperties, text: &str) -> f64 {
        if text.is_empty() {
            0.0
        } else {
            self.height
        }
    }
}

pub fn fixed_measurer() -> FixedMeasurer {
    FixedMeasurer {
        width: 40.0,
        height: 15.0,
    }
}

/// Palette that answers `#<key>` and records every key it was asked for
#[derive(Debug, Clone, Default)]
pub struct RecordingPalette {
    pub requests: Rc<RefCell<Vec<String>>>,
}

impl ColorPalette for RecordingPalette {
    fn color_for(&mut self, key: &str) -> String {
        self.requests.borrow_mut().push(key.to_string());
        format!("#{}", key)
    }
}
