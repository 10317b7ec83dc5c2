//! Text measurement
//!
//! Axis and legend sizing need the rendered extent of label text. The actual
//! measurement belongs to whoever renders (a browser, a font rasterizer), so
//! the pipeline only talks to the [`TextMeasurer`] trait.
//! [`ApproximateTextMeasurer`] is a headless estimate used by the CLI.

use crate::config::{FontStyle, FontWeight};

/// Pixels per typographic point at 96 DPI
pub const PX_PER_PT: f64 = 96.0 / 72.0;

/// Font properties used to measure a piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextProperties {
    pub font_family: String,
    pub font_size_pt: f64,
    pub font_style: FontStyle,
    pub font_weight: FontWeight,
}

impl TextProperties {
    /// Font size in pixels
    pub fn font_size_px(&self) -> f64 {
        self.font_size_pt * PX_PER_PT
    }
}

/// Measures rendered text extents in pixels
#[cfg_attr(test, mockall::automock)]
pub trait TextMeasurer {
    fn measure_width(&self, properties: &TextProperties, text: &str) -> f64;

    fn measure_height(&self, properties: &TextProperties, text: &str) -> f64;
}

/// Character-count based estimate of text extents
///
/// Average glyph advance is taken as a fixed fraction of the font size, bold
/// text is a little wider. Height is the line height of the font and does not
/// depend on the text.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateTextMeasurer {
    /// Average glyph advance as a fraction of the font size
    pub advance_ratio: f64,
    /// Line height as a fraction of the font size
    pub line_height_ratio: f64,
}

impl Default for ApproximateTextMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.55,
            line_height_ratio: 1.2,
        }
    }
}

impl TextMeasurer for ApproximateTextMeasurer {
    fn measure_width(&self, properties: &TextProperties, text: &str) -> f64 {
        let weight_factor = match properties.font_weight {
            FontWeight::Normal => 1.0,
            FontWeight::SemiBold => 1.05,
            FontWeight::Bold => 1.1,
        };
        text.chars().count() as f64 * properties.font_size_px() * self.advance_ratio * weight_factor
    }

    fn measure_height(&self, properties: &TextProperties, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        properties.font_size_px() * self.line_height_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontSettings;

    #[test]
    fn test_width_grows_with_text() {
        let measurer = ApproximateTextMeasurer::default();
        let props = FontSettings::default().text_properties();
        let short = measurer.measure_width(&props, "A");
        let long = measurer.measure_width(&props, "Assembly line 4");
        assert!(long > short);
        assert_eq!(measurer.measure_width(&props, ""), 0.0);
    }

    #[test]
    fn test_height_is_line_height() {
        let measurer = ApproximateTextMeasurer::default();
        let props = FontSettings::default().text_properties();
        let h = measurer.measure_height(&props, "12:00");
        assert!((h - 11.0 * PX_PER_PT * 1.2).abs() < 1e-9);
        assert_eq!(measurer.measure_height(&props, ""), 0.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let measurer = ApproximateTextMeasurer::default();
        let normal = FontSettings::default().text_properties();
        let bold = FontSettings {
            weight: FontWeight::Bold,
            ..Default::default()
        }
        .text_properties();
        assert!(measurer.measure_width(&bold, "Press") > measurer.measure_width(&normal, "Press"));
    }
}
