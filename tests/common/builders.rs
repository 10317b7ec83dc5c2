//! Test data builders for creating host matrices

use chrono::{DateTime, Utc};
use event_viewer::{DataMatrix, MatrixNode, MatrixRow};

/// Builder for a matrix with the standard device/time/state columns
pub struct MatrixBuilder {
    matrix: DataMatrix,
}

impl MatrixBuilder {
    pub fn new() -> Self {
        Self {
            matrix: DataMatrix::with_standard_columns(),
        }
    }

    /// Add a device with `(time, state)` observations in the given order
    pub fn device(mut self, name: &str, observations: &[(DateTime<Utc>, &str)]) -> Self {
        let children = observations
            .iter()
            .map(|&(time, state)| MatrixNode::new(time, state))
            .collect();
        self.matrix.rows.push(MatrixRow::new(name, children));
        self
    }

    /// Mark the `index`-th observation of the last added device as highlighted
    pub fn highlight(mut self, index: usize) -> Self {
        if let Some(node) = self
            .matrix
            .rows
            .last_mut()
            .and_then(|row| row.children.get_mut(index))
        {
            node.highlight = true;
        }
        self
    }

    pub fn build(self) -> DataMatrix {
        self.matrix
    }
}

impl Default for MatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::at;

    #[test]
    fn test_matrix_builder() {
        let matrix = MatrixBuilder::new()
            .device("Press 1", &[(at(8, 0), "Running"), (at(9, 0), "Idle")])
            .highlight(1)
            .device("Press 2", &[])
            .build();

        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].children.len(), 2);
        assert!(matrix.rows[0].children[1].highlight);
        assert!(matrix.rows[1].children.is_empty());
    }
}
