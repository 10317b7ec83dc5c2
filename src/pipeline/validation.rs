//! Input requirement checks.
//!
//! Before anything is converted the matrix must bind a device, a time and a
//! state column, and every observed time must be a real date/time. The
//! outcome is a [`ValidationReport`] rather than an error so a host can draw
//! a "missing fields" checklist from it.

use crate::input::{DataMatrix, Role};
use serde::Serialize;
use std::collections::BTreeMap;

/// One input requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Check {
    Device,
    Time,
    ValidTime,
    State,
}

impl Check {
    pub const ALL: [Check; 4] = [Check::Device, Check::Time, Check::ValidTime, Check::State];

    /// Display name shown in the checklist
    pub fn label(&self) -> &'static str {
        match self {
            Check::Device => "Device field",
            Check::Time => "Time field",
            Check::ValidTime => "Time field contains date/time values",
            Check::State => "Event/State field",
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-requirement outcome of validating a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub device_field: bool,
    pub time_field: bool,
    pub time_field_valid: bool,
    pub state_field: bool,
}

impl ValidationReport {
    /// Report with every requirement met
    pub fn passing() -> Self {
        Self {
            device_field: true,
            time_field: true,
            time_field_valid: true,
            state_field: true,
        }
    }

    pub fn passed(&self, check: Check) -> bool {
        match check {
            Check::Device => self.device_field,
            Check::Time => self.time_field,
            Check::ValidTime => self.time_field_valid,
            Check::State => self.state_field,
        }
    }

    pub fn is_valid(&self) -> bool {
        Check::ALL.iter().all(|c| self.passed(*c))
    }

    /// All checks with their outcome, in checklist order
    pub fn entries(&self) -> Vec<(Check, bool)> {
        Check::ALL.iter().map(|c| (*c, self.passed(*c))).collect()
    }

    /// Checks that failed
    pub fn missing(&self) -> Vec<Check> {
        Check::ALL
            .iter()
            .copied()
            .filter(|c| !self.passed(*c))
            .collect()
    }

    /// Requirement name → outcome
    pub fn to_map(&self) -> BTreeMap<&'static str, bool> {
        self.entries()
            .into_iter()
            .map(|(check, ok)| (check.label(), ok))
            .collect()
    }

    /// Warning title and message when a time field is bound but holds no dates
    pub fn time_warning(&self) -> Option<(&'static str, &'static str)> {
        (self.time_field && !self.time_field_valid).then_some((
            "Error in 'Time' field",
            "Provided field for the 'Time' does not contain date/time values",
        ))
    }
}

/// Check a matrix against the input requirements
pub fn validate(matrix: &DataMatrix) -> ValidationReport {
    let _span = tracing::debug_span!("validate").entered();

    let time_field = matrix.has_role(Role::Time);
    let time_field_valid = time_field
        && matrix
            .rows
            .iter()
            .flat_map(|row| row.children.iter())
            .all(|node| node.value.as_timestamp().is_some());

    let report = ValidationReport {
        device_field: matrix.has_role(Role::Device),
        time_field,
        time_field_valid,
        state_field: matrix.has_role(Role::State),
    };

    if !report.is_valid() {
        tracing::warn!(
            "Input is missing requirements: {:?}",
            report.missing().iter().map(Check::label).collect::<Vec<_>>()
        );
    }
    report
}
