//! Two-parameter pivot of mean scores.

use serde::{Deserialize, Serialize};

use tg_types::ParamValue;

/// Mean scores arranged with one parameter's values as row labels and
/// another's as column labels, ready for heatmap-style display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    row_param: String,
    col_param: String,
    row_values: Vec<ParamValue>,
    col_values: Vec<ParamValue>,
    cells: Vec<Vec<f64>>,
}

impl PivotTable {
    pub(crate) fn new(
        row_param: String,
        col_param: String,
        row_values: Vec<ParamValue>,
        col_values: Vec<ParamValue>,
        cells: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            row_param,
            col_param,
            row_values,
            col_values,
            cells,
        }
    }

    pub fn row_param(&self) -> &str {
        &self.row_param
    }

    pub fn col_param(&self) -> &str {
        &self.col_param
    }

    pub fn row_values(&self) -> &[ParamValue] {
        &self.row_values
    }

    pub fn col_values(&self) -> &[ParamValue] {
        &self.col_values
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_values.len(), self.col_values.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col]
    }

    pub fn cells(&self) -> &[Vec<f64>] {
        &self.cells
    }
}

impl std::fmt::Display for PivotTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label_width = self
            .row_values
            .iter()
            .map(|v| v.to_string().len())
            .chain([self.row_param.len()])
            .max()
            .unwrap_or(0);
        let col_width = self
            .col_values
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(0)
            .max(6);

        writeln!(f, "{} \\ {}", self.row_param, self.col_param)?;
        write!(f, "{:label_width$}", "")?;
        for value in &self.col_values {
            write!(f, "  {:>col_width$}", value.to_string())?;
        }
        writeln!(f)?;
        for (i, value) in self.row_values.iter().enumerate() {
            write!(f, "{:label_width$}", value.to_string())?;
            for j in 0..self.col_values.len() {
                write!(f, "  {:>col_width$.4}", self.cells[i][j])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
