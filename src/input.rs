//! Host input model
//!
//! The host hands over a two-level matrix: one row per device, and under it
//! one child node per time-stamped observation carrying the state value and
//! an optional highlight marker. Column metadata says which column is bound
//! to which role.
//!
//! ```text
//! rows ─┬─ "Press 1" ─┬─ 2024-03-01T08:00Z  [Running]
//!       │             └─ 2024-03-01T09:30Z  [Idle]
//!       └─ "Press 2" ─── 2024-03-01T08:15Z  [Running]  (highlighted)
//! ```

use crate::error::{Result, ResultExt, ViewerError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text shown for empty cells
pub const BLANK_LABEL: &str = "(Blank)";

static NULL_CELL: CellValue = CellValue::Null;

/// Role a column is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Device,
    Time,
    #[serde(alias = "event")]
    State,
    Highlight,
}

/// Metadata of one column in the host query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Host format string, used for time columns (chrono strftime syntax)
    #[serde(default)]
    pub format: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            roles: vec![role],
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// A single cell value
///
/// JSON strings always deserialize as `Text` so labels keep their exact
/// spelling; [`CellValue::as_timestamp`] parses dates out of text on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// Interpret the cell as a point in time
    ///
    /// Accepts native date/time cells and text in RFC 3339 or
    /// `YYYY-MM-DD HH:MM:SS` form (taken as UTC). Numbers are not dates.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            CellValue::DateTime(t) => Some(*t),
            CellValue::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }

    /// Display label of the cell
    pub fn label(&self) -> String {
        match self {
            CellValue::Null => BLANK_LABEL.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::DateTime(t) => t.to_rfc3339(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(t: DateTime<Utc>) -> Self {
        CellValue::DateTime(t)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

// Integral values print without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One observation under a device row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixNode {
    /// Time of the observation
    pub value: CellValue,
    /// Measure values; the state is the first one
    #[serde(default)]
    pub values: Vec<CellValue>,
    #[serde(default)]
    pub highlight: bool,
}

impl MatrixNode {
    pub fn new(time: impl Into<CellValue>, state: impl Into<CellValue>) -> Self {
        Self {
            value: time.into(),
            values: vec![state.into()],
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// State value of this observation
    pub fn state(&self) -> &CellValue {
        self.values.first().unwrap_or(&NULL_CELL)
    }
}

/// One device row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub value: CellValue,
    #[serde(default)]
    pub children: Vec<MatrixNode>,
}

impl MatrixRow {
    pub fn new(device: impl Into<CellValue>, children: Vec<MatrixNode>) -> Self {
        Self {
            value: device.into(),
            children,
        }
    }
}

/// The full hierarchical input handed over by the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataMatrix {
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

impl DataMatrix {
    /// Matrix with the three required role columns and no rows
    pub fn with_standard_columns() -> Self {
        Self {
            columns: vec![
                ColumnMetadata::new("Device", Role::Device),
                ColumnMetadata::new("Time", Role::Time),
                ColumnMetadata::new("State", Role::State),
            ],
            rows: Vec::new(),
        }
    }

    /// First column bound to `role`
    pub fn column_for(&self, role: Role) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.has_role(role))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.column_for(role).is_some()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ViewerError::Input(format!("Failed to parse data matrix: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(ViewerError::from)
            .with_context(|| format!("Failed to read data file {:?}", path))?;
        Self::from_json_str(&content)
    }
}
