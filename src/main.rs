//! Event Viewer - command line entry point
//!
//! Reads a host data matrix from JSON, runs the timeline pipeline once and
//! prints the laid-out view (or the requirement checklist) as JSON.

use anyhow::Context;
use clap::Parser;
use event_viewer::{
    DataMatrix, EventViewer, Settings, TimeFormatter, TimelineView, Update, Viewport,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "event-viewer")]
#[command(about = "Lay out device state timelines from a JSON data matrix")]
struct Args {
    /// JSON file holding the data matrix
    input: PathBuf,

    /// Settings file (JSON, or TOML with a .toml extension)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value = "400")]
    height: f64,

    /// Locale for time labels, e.g. en-US or de-DE
    #[arg(short, long, default_value = event_viewer::viewer::DEFAULT_LOCALE)]
    locale: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct IntervalOutput<'a> {
    state: &'a str,
    color: &'a str,
    start: String,
    end: String,
    highlight: bool,
    is_unknown: bool,
    geometry: Option<&'a event_viewer::Geometry>,
}

#[derive(Serialize)]
struct DeviceOutput<'a> {
    name: &'a str,
    key: f64,
    intervals: Vec<IntervalOutput<'a>>,
}

#[derive(Serialize)]
struct ViewOutput<'a> {
    window: [String; 2],
    legend: &'a event_viewer::Legend,
    devices: Vec<DeviceOutput<'a>>,
    layout: &'a event_viewer::viewer::Layout,
}

#[derive(Serialize)]
struct ChecklistOutput {
    valid: bool,
    checks: std::collections::BTreeMap<&'static str, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

fn view_output(view: &TimelineView) -> ViewOutput<'_> {
    let devices = view
        .devices
        .iter()
        .map(|device| DeviceOutput {
            name: &device.name,
            key: device.key,
            intervals: device
                .intervals
                .iter()
                .map(|interval| IntervalOutput {
                    state: &interval.state,
                    color: &interval.color,
                    start: view.format_time(interval.start),
                    end: view.format_time(interval.end),
                    highlight: interval.highlight,
                    is_unknown: interval.is_unknown,
                    geometry: interval.geometry(),
                })
                .collect(),
        })
        .collect();

    ViewOutput {
        window: [
            view.format_time(view.window.start),
            view.format_time(view.window.end),
        ],
        legend: &view.legend,
        devices,
        layout: &view.layout,
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,event_viewer=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let matrix = DataMatrix::from_json_file(&args.input)
        .with_context(|| format!("Failed to read data matrix from {}", args.input.display()))?;

    tracing::info!(
        "Loaded {} devices from {}",
        matrix.rows.len(),
        args.input.display()
    );

    TimeFormatter::try_new(&args.locale, None)
        .with_context(|| format!("Unsupported --locale {:?}", args.locale))?;

    let mut viewer = EventViewer::new(settings, args.locale.as_str());
    let json = match viewer.update(&matrix, Viewport::new(args.width, args.height)) {
        Update::Rendered(view) => serde_json::to_string_pretty(&view_output(view))?,
        Update::Invalid(report) => serde_json::to_string_pretty(&ChecklistOutput {
            valid: false,
            checks: report.to_map(),
            warning: report
                .time_warning()
                .map(|(title, message)| format!("{}: {}", title, message)),
        })?,
        Update::Unchanged => anyhow::bail!("Viewer reported no change on its first update"),
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
