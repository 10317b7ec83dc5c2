//! Time formatting and tooltip fields
//!
//! [`TimeFormatter`] renders timestamps for axis labels and tooltips using
//! the host locale. [`tooltip`] is a pure function from an interval to the
//! rows a tooltip shows; drawing the tooltip is left to the renderer.

use crate::error::{Result, ViewerError};
use crate::types::StateInterval;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Locale, Utc};
use serde::Serialize;

/// Localized date and time
pub const DEFAULT_TIME_FORMAT: &str = "%x %X";

/// Locale-aware timestamp formatter
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    locale: Locale,
    locale_tag: String,
    pattern: String,
}

impl TimeFormatter {
    /// Build a formatter, failing on an unknown locale or an invalid pattern
    pub fn try_new(locale: &str, pattern: Option<&str>) -> Result<Self> {
        let resolved =
            parse_locale(locale).ok_or_else(|| ViewerError::Locale(locale.to_string()))?;
        let pattern = pattern.unwrap_or(DEFAULT_TIME_FORMAT);
        if !is_valid_pattern(pattern) {
            return Err(ViewerError::Config(format!(
                "Invalid time format pattern: {}",
                pattern
            )));
        }
        Ok(Self {
            locale: resolved,
            locale_tag: locale.to_string(),
            pattern: pattern.to_string(),
        })
    }

    /// Build a formatter, falling back to POSIX and the default pattern
    pub fn new(locale: &str, pattern: Option<&str>) -> Self {
        let resolved = parse_locale(locale).unwrap_or_else(|| {
            tracing::warn!("Unknown locale {:?}, formatting times with POSIX", locale);
            Locale::POSIX
        });
        let pattern = match pattern {
            Some(p) if is_valid_pattern(p) => p,
            Some(p) => {
                tracing::warn!("Invalid time format {:?}, using {:?}", p, DEFAULT_TIME_FORMAT);
                DEFAULT_TIME_FORMAT
            }
            None => DEFAULT_TIME_FORMAT,
        };
        Self {
            locale: resolved,
            locale_tag: locale.to_string(),
            pattern: pattern.to_string(),
        }
    }

    pub fn format(&self, time: DateTime<Utc>) -> String {
        time.format_localized(&self.pattern, self.locale).to_string()
    }

    /// Locale tag the formatter was built from
    pub fn locale_tag(&self) -> &str {
        &self.locale_tag
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::POSIX,
            locale_tag: "POSIX".to_string(),
            pattern: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// Resolve a host locale tag such as `en-US` or `de_DE`
pub fn parse_locale(tag: &str) -> Option<Locale> {
    let normalized = tag.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).ok()
}

fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// One row of an interval tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipItem {
    pub header: String,
    pub display_name: &'static str,
    pub value: String,
    pub color: String,
    /// Opacity of the colour swatch; time rows hide theirs
    pub opacity: f32,
}

/// Tooltip rows for an interval: state, start time, end time
pub fn tooltip(
    device_name: &str,
    interval: &StateInterval,
    formatter: &TimeFormatter,
) -> Vec<TooltipItem> {
    vec![
        TooltipItem {
            header: device_name.to_string(),
            display_name: "State",
            value: interval.state.clone(),
            color: interval.color.clone(),
            opacity: 1.0,
        },
        TooltipItem {
            header: String::new(),
            display_name: "Start time",
            value: formatter.format(interval.start),
            color: interval.color.clone(),
            opacity: 0.0,
        },
        TooltipItem {
            header: String::new(),
            display_name: "End time",
            value: formatter.format(interval.end),
            color: interval.color.clone(),
            opacity: 0.0,
        },
    ]
}
