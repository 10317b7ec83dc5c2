//! Ingestion: host matrix → devices, legend and time window.
//!
//! One [`Device`] per matrix row, one zero-width [`StateInterval`] per child
//! observation. While walking rows (and children within a row) in order, every
//! state label is resolved against the [`Legend`], which fixes legend indices
//! in first-encounter order. All distinct timestamps are collected into the
//! time series; its bounds, shifted by the lead/lag offsets, give the padded
//! [`TimeWindow`].

use crate::config::{Settings, TimeAxisSettings};
use crate::format::TimeFormatter;
use crate::input::{DataMatrix, Role};
use crate::palette::ColorPalette;
use crate::pipeline::legend::Legend;
use crate::pipeline::validation::{validate, ValidationReport};
use crate::types::{Device, StateInterval, TimeWindow};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeSet;

/// Everything ingestion produces for a valid matrix
#[derive(Debug, Clone)]
pub struct ConvertedData {
    /// Devices in row order
    pub devices: Vec<Device>,
    pub legend: Legend,
    /// Padded window
    pub window: TimeWindow,
    /// Earliest and latest observation, without padding
    pub observed: TimeWindow,
    /// Distinct observation timestamps, ascending
    pub time_series: Vec<DateTime<Utc>>,
    pub formatter: TimeFormatter,
}

/// Outcome of ingestion
#[derive(Debug, Clone)]
pub enum Conversion {
    Valid(ConvertedData),
    /// Requirements not met; nothing was converted
    Invalid(ValidationReport),
}

impl Conversion {
    pub fn into_data(self) -> Option<ConvertedData> {
        match self {
            Conversion::Valid(data) => Some(data),
            Conversion::Invalid(_) => None,
        }
    }
}

/// Convert a host matrix into the device/interval model
pub fn convert(
    matrix: &DataMatrix,
    settings: &Settings,
    palette: &mut dyn ColorPalette,
    locale: &str,
) -> Conversion {
    let _span = tracing::debug_span!("convert").entered();

    let report = validate(matrix);
    if !report.is_valid() {
        return Conversion::Invalid(report);
    }

    let time_format = matrix
        .column_for(Role::Time)
        .and_then(|column| column.format.as_deref());
    let formatter = TimeFormatter::new(locale, time_format);

    let mut legend = if settings.unknown.show {
        Legend::with_unknown(&settings.unknown, &settings.state_color)
    } else {
        Legend::new()
    };
    let mut series = BTreeSet::new();
    let mut devices = Vec::with_capacity(matrix.rows.len());

    for row in &matrix.rows {
        let mut device = Device::new(row.value.label());
        for node in &row.children {
            // Validation guarantees every time parses.
            let Some(time) = node.value.as_timestamp() else {
                continue;
            };
            series.insert(time);

            let label = node.state().label();
            let index = legend.resolve(&label, &settings.state_color, palette);
            let color = legend.entries()[index].color.clone();
            device
                .intervals
                .push(StateInterval::observed(time, label, color, node.highlight));
        }
        devices.push(device);
    }

    let time_series: Vec<_> = series.into_iter().collect();
    let observed = match (time_series.first(), time_series.last()) {
        (Some(&min), Some(&max)) => TimeWindow::new(min, max),
        _ => TimeWindow::empty(),
    };
    let window = padded_window(observed, &settings.time_axis);

    tracing::debug!(
        "Converted {} devices, {} legend entries, {} timestamps, window {} .. {}",
        devices.len(),
        legend.len(),
        time_series.len(),
        window.start,
        window.end
    );

    Conversion::Valid(ConvertedData {
        devices,
        legend,
        window,
        observed,
        time_series,
        formatter,
    })
}

/// Apply lead/lag padding to the observed bounds
///
/// Both offsets move their bound forward in time. If the padded window would
/// end at or before its start, the padding is dropped and the observed bounds
/// are used as-is.
pub fn padded_window(observed: TimeWindow, axis: &TimeAxisSettings) -> TimeWindow {
    let padded = match (
        shift(observed.start, axis.lead_seconds()),
        shift(observed.end, axis.lag_seconds()),
    ) {
        (Some(start), Some(end)) => TimeWindow::new(start, end),
        _ => {
            tracing::warn!("Lead/lag padding overflows the time range, ignoring it");
            return observed;
        }
    };

    if padded.is_degenerate() && padded != observed {
        tracing::warn!(
            "Padding inverts the time window ({} .. {}), ignoring it",
            padded.start,
            padded.end
        );
        return observed;
    }
    padded
}

fn shift(time: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let delta = TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)?;
    time.checked_add_signed(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimePrecision;
    use crate::input::{CellValue, ColumnMetadata, MatrixNode, MatrixRow};
    use crate::palette::DefaultPalette;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn node(h: u32, state: &str) -> MatrixNode {
        MatrixNode::new(t(h, 0), state)
    }

    fn matrix(rows: Vec<MatrixRow>) -> DataMatrix {
        let mut matrix = DataMatrix::with_standard_columns();
        matrix.rows = rows;
        matrix
    }

    fn run(matrix: &DataMatrix, settings: &Settings) -> ConvertedData {
        convert(matrix, settings, &mut DefaultPalette::new(), "en-US")
            .into_data()
            .expect("valid input")
    }

    #[test]
    fn test_invalid_matrix_short_circuits() {
        let mut m = matrix(vec![MatrixRow::new("Press 1", vec![node(8, "Running")])]);
        m.columns.retain(|c| !c.has_role(Role::State));
        match convert(&m, &Settings::default(), &mut DefaultPalette::new(), "en-US") {
            Conversion::Invalid(report) => assert!(!report.state_field),
            Conversion::Valid(_) => panic!("expected invalid conversion"),
        }
    }

    #[test]
    fn test_legend_order_rows_then_children() {
        let m = matrix(vec![
            MatrixRow::new("Press 1", vec![node(8, "Running"), node(9, "Idle")]),
            MatrixRow::new("Press 2", vec![node(8, "Fault"), node(9, "Running")]),
        ]);
        let mut settings = Settings::default();
        settings.unknown.show = false;
        let data = run(&m, &settings);

        let labels: Vec<_> = data.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Running", "Idle", "Fault"]);
    }

    #[test]
    fn test_unknown_entry_first() {
        let m = matrix(vec![MatrixRow::new("Press 1", vec![node(8, "Running")])]);
        let data = run(&m, &Settings::default());
        assert!(data.legend.entry(0).unwrap().is_unknown);
        assert_eq!(data.legend.entry(1).unwrap().label, "Running");
    }

    #[test]
    fn test_intervals_carry_legend_color_and_highlight() {
        let m = matrix(vec![MatrixRow::new(
            "Press 1",
            vec![node(8, "Running"), node(9, "Idle").highlighted()],
        )]);
        let data = run(&m, &Settings::default());
        let device = &data.devices[0];
        assert_eq!(device.name, "Press 1");
        assert_eq!(device.intervals.len(), 2);
        assert_eq!(
            device.intervals[1].color,
            data.legend.color_of("Idle").unwrap()
        );
        assert!(device.intervals[1].highlight);
        assert_eq!(device.intervals[0].first_seen, t(8, 0));
    }

    #[test]
    fn test_time_series_distinct_and_sorted() {
        let m = matrix(vec![
            MatrixRow::new("Press 1", vec![node(9, "A"), node(10, "B")]),
            MatrixRow::new("Press 2", vec![node(8, "A"), node(9, "B")]),
        ]);
        let data = run(&m, &Settings::default());
        assert_eq!(data.time_series, vec![t(8, 0), t(9, 0), t(10, 0)]);
        assert_eq!(data.observed, TimeWindow::new(t(8, 0), t(10, 0)));
        assert_eq!(data.window, data.observed);
    }

    #[test]
    fn test_lead_and_lag_padding() {
        let m = matrix(vec![MatrixRow::new("Press 1", vec![node(8, "A"), node(12, "B")])]);
        let mut settings = Settings::default();
        settings.time_axis.lead_time = Some(60.0);
        settings.time_axis.lead_time_precision = TimePrecision::Minute;
        settings.time_axis.lag_time = Some(30.0);
        settings.time_axis.lag_time_precision = TimePrecision::Minute;
        let data = run(&m, &settings);
        assert_eq!(data.window, TimeWindow::new(t(9, 0), t(12, 30)));
    }

    #[test]
    fn test_inverted_padding_is_ignored() {
        let observed = TimeWindow::new(t(8, 0), t(9, 0));
        let axis = TimeAxisSettings {
            lead_time: Some(2.0),
            lead_time_precision: TimePrecision::Hour,
            ..Default::default()
        };
        assert_eq!(padded_window(observed, &axis), observed);
    }

    #[test]
    fn test_zero_devices() {
        let data = run(&matrix(Vec::new()), &Settings::default());
        assert!(data.devices.is_empty());
        assert!(data.time_series.is_empty());
        assert_eq!(data.window, TimeWindow::empty());
    }

    #[test]
    fn test_device_without_children() {
        let m = matrix(vec![
            MatrixRow::new("Press 1", vec![node(8, "A")]),
            MatrixRow::new("Press 2", Vec::new()),
        ]);
        let data = run(&m, &Settings::default());
        assert_eq!(data.devices.len(), 2);
        assert!(data.devices[1].is_empty());
    }

    #[test]
    fn test_column_format_reaches_formatter() {
        let mut m = matrix(vec![MatrixRow::new("Press 1", vec![node(8, "A")])]);
        m.columns[1] = ColumnMetadata::new("Time", Role::Time).with_format("%H:%M");
        let data = run(&m, &Settings::default());
        assert_eq!(data.formatter.format(t(8, 0)), "08:00");
    }

    #[test]
    fn test_blank_and_numeric_states() {
        let m = matrix(vec![MatrixRow::new(
            CellValue::Number(7.0),
            vec![
                MatrixNode::new(t(8, 0), CellValue::Null),
                MatrixNode::new(t(9, 0), CellValue::Number(3.0)),
            ],
        )]);
        let data = run(&m, &Settings::default());
        assert_eq!(data.devices[0].name, "7");
        assert_eq!(data.devices[0].intervals[0].state, "(Blank)");
        assert_eq!(data.devices[0].intervals[1].state, "3");
    }
}
