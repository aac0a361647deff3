//! Aggregated result-table transforms.

use serde::{Deserialize, Serialize};

use tg_types::{
    CandidateSummary, ParamSet, ParamValue, ReportError, TuneResult, UnresolvedNameError,
};

use crate::pivot::PivotTable;

/// The aggregated result table: one row per parameter combination, with
/// parameter columns plus mean, standard deviation, and rank.
///
/// Every transform returns a new table; the search output itself is
/// never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsTable {
    param_names: Vec<String>,
    rows: Vec<CandidateSummary>,
}

impl ResultsTable {
    pub fn from_summaries(summaries: &[CandidateSummary]) -> Self {
        let param_names = summaries
            .first()
            .map(|s| s.params.names().map(String::from).collect())
            .unwrap_or_default();
        Self {
            param_names,
            rows: summaries.to_vec(),
        }
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn rows(&self) -> &[CandidateSummary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows reordered by descending mean score; equal means keep their
    /// enumeration order.
    pub fn sorted_by_mean(&self) -> Self {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            b.mean_score
                .partial_cmp(&a.mean_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.candidate.cmp(&b.candidate))
        });
        Self {
            param_names: self.param_names.clone(),
            rows,
        }
    }

    /// Keep only the named parameter columns, in the given order. The
    /// metric columns (mean, std, rank) always survive projection.
    pub fn project(&self, params: &[&str]) -> TuneResult<Self> {
        for &name in params {
            if !self.param_names.iter().any(|n| n == name) {
                return Err(ReportError::UnknownColumn {
                    name: name.to_string(),
                }
                .into());
            }
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut projected = ParamSet::new();
            for &name in params {
                let value = row.params.get(name).ok_or_else(|| ReportError::UnknownColumn {
                    name: name.to_string(),
                })?;
                projected.insert(name, value.clone());
            }
            rows.push(CandidateSummary {
                params: projected,
                ..row.clone()
            });
        }
        Ok(Self {
            param_names: params.iter().map(|&n| n.to_string()).collect(),
            rows,
        })
    }

    /// Strip the structural qualifier from every parameter column:
    /// `classifier__learning_rate` becomes `learning_rate`, a bare name
    /// is left unchanged. Fails if two columns would collide.
    pub fn shorten_names(&self, separator: &str) -> TuneResult<Self> {
        let mut renames: Vec<(String, String)> = Vec::with_capacity(self.param_names.len());
        for name in &self.param_names {
            let short = shorten(name, separator);
            if let Some((first, _)) = renames.iter().find(|(_, s)| *s == short) {
                return Err(ReportError::from(UnresolvedNameError {
                    short,
                    first: first.clone(),
                    second: name.clone(),
                })
                .into());
            }
            renames.push((name.clone(), short));
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut params = ParamSet::new();
                for (name, value) in row.params.iter() {
                    let renamed = renames
                        .iter()
                        .find(|(long, _)| long == name)
                        .map(|(_, short)| short.as_str())
                        .unwrap_or(name);
                    params.insert(renamed, value.clone());
                }
                CandidateSummary {
                    params,
                    ..row.clone()
                }
            })
            .collect();

        Ok(Self {
            param_names: renames.into_iter().map(|(_, short)| short).collect(),
            rows,
        })
    }

    /// Arrange mean scores with `row_param`'s values as row labels and
    /// `col_param`'s as column labels, for the two-parameter
    /// visualization case. Value order follows first appearance in the
    /// table.
    pub fn pivot(&self, row_param: &str, col_param: &str) -> TuneResult<PivotTable> {
        for name in [row_param, col_param] {
            if !self.param_names.iter().any(|n| n == name) {
                return Err(ReportError::UnknownColumn {
                    name: name.to_string(),
                }
                .into());
            }
        }

        let mut row_values: Vec<ParamValue> = Vec::new();
        let mut col_values: Vec<ParamValue> = Vec::new();
        for row in &self.rows {
            if let Some(v) = row.params.get(row_param) {
                if !row_values.contains(v) {
                    row_values.push(v.clone());
                }
            }
            if let Some(v) = row.params.get(col_param) {
                if !col_values.contains(v) {
                    col_values.push(v.clone());
                }
            }
        }

        let mut cells: Vec<Vec<Option<f64>>> =
            vec![vec![None; col_values.len()]; row_values.len()];
        for row in &self.rows {
            let (rv, cv) = match (row.params.get(row_param), row.params.get(col_param)) {
                (Some(rv), Some(cv)) => (rv, cv),
                _ => continue,
            };
            let ri = row_values.iter().position(|v| v == rv).unwrap_or_default();
            let cj = col_values.iter().position(|v| v == cv).unwrap_or_default();
            if cells[ri][cj].is_some() {
                return Err(ReportError::AmbiguousCell {
                    row: rv.to_string(),
                    column: cv.to_string(),
                }
                .into());
            }
            cells[ri][cj] = Some(row.mean_score);
        }

        let mut filled = Vec::with_capacity(row_values.len());
        for (i, row) in cells.into_iter().enumerate() {
            let mut out = Vec::with_capacity(col_values.len());
            for (j, cell) in row.into_iter().enumerate() {
                out.push(cell.ok_or_else(|| ReportError::MissingCell {
                    row: row_values[i].to_string(),
                    column: col_values[j].to_string(),
                })?);
            }
            filled.push(out);
        }

        tracing::debug!(
            rows = row_values.len(),
            cols = col_values.len(),
            "Pivoted mean scores on {} x {}",
            row_param,
            col_param
        );
        Ok(PivotTable::new(
            row_param.to_string(),
            col_param.to_string(),
            row_values,
            col_values,
            filled,
        ))
    }
}

fn shorten(name: &str, separator: &str) -> String {
    if separator.is_empty() {
        return name.to_string();
    }
    match name.rfind(separator) {
        Some(i) => name[i + separator.len()..].to_string(),
        None => name.to_string(),
    }
}

impl std::fmt::Display for ResultsTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut headers: Vec<String> = self.param_names.clone();
        headers.extend(["mean_score".to_string(), "std_score".to_string(), "rank".to_string()]);

        let mut grid: Vec<Vec<String>> = vec![headers];
        for row in &self.rows {
            let mut cells: Vec<String> = self
                .param_names
                .iter()
                .map(|name| {
                    row.params
                        .get(name)
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                })
                .collect();
            cells.push(format!("{:.4}", row.mean_score));
            cells.push(format!("{:.4}", row.std_score));
            cells.push(row.rank.to_string());
            grid.push(cells);
        }

        let widths: Vec<usize> = (0..grid[0].len())
            .map(|col| grid.iter().map(|r| r[col].len()).max().unwrap_or(0))
            .collect();
        for row in &grid {
            for (cell, &width) in row.iter().zip(&widths) {
                write!(f, "{cell:>width$}  ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_types::TuneError;

    /// Twelve candidates over learning_rate x max_leaf_nodes with
    /// strictly increasing synthetic means, so candidate 11 is best.
    fn summaries() -> Vec<CandidateSummary> {
        let rates = [0.01, 0.1, 1.0, 10.0];
        let nodes = [3i64, 10, 30];
        let mut out = Vec::new();
        for (i, (&lr, &n)) in rates
            .iter()
            .flat_map(|lr| nodes.iter().map(move |n| (lr, n)))
            .enumerate()
        {
            let mut params = ParamSet::new();
            params.insert("classifier__learning_rate", lr);
            params.insert("classifier__max_leaf_nodes", n);
            let mean = 0.6 + 0.01 * i as f64;
            out.push(CandidateSummary {
                candidate: i,
                params,
                fold_scores: vec![mean, mean],
                mean_score: mean,
                std_score: 0.0,
                rank: 12 - i,
            });
        }
        out
    }

    #[test]
    fn sorting_puts_the_best_mean_first() {
        let table = ResultsTable::from_summaries(&summaries()).sorted_by_mean();
        assert_eq!(table.rows()[0].rank, 1);
        assert_eq!(table.rows()[0].candidate, 11);
        let means: Vec<f64> = table.rows().iter().map(|r| r.mean_score).collect();
        let mut sorted = means.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(means, sorted);
    }

    #[test]
    fn sorting_ties_keep_enumeration_order() {
        let mut rows = summaries();
        for row in &mut rows {
            row.mean_score = 0.8;
        }
        let table = ResultsTable::from_summaries(&rows).sorted_by_mean();
        let candidates: Vec<usize> = table.rows().iter().map(|r| r.candidate).collect();
        assert_eq!(candidates, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn projection_keeps_selected_columns_and_metrics() {
        let table = ResultsTable::from_summaries(&summaries());
        let projected = table.project(&["classifier__learning_rate"]).unwrap();
        assert_eq!(projected.param_names(), &["classifier__learning_rate"]);
        assert_eq!(projected.rows()[0].params.len(), 1);
        assert_eq!(projected.rows()[0].rank, 12);
        assert_eq!(projected.rows()[0].mean_score, 0.6);
    }

    #[test]
    fn projection_rejects_unknown_columns() {
        let table = ResultsTable::from_summaries(&summaries());
        assert!(matches!(
            table.project(&["no_such_parameter"]),
            Err(TuneError::Report(ReportError::UnknownColumn { .. }))
        ));
    }

    #[test]
    fn shortening_strips_the_structural_prefix() {
        let table = ResultsTable::from_summaries(&summaries())
            .shorten_names("__")
            .unwrap();
        assert_eq!(table.param_names(), &["learning_rate", "max_leaf_nodes"]);
        assert!(table.rows()[0].params.get("learning_rate").is_some());
    }

    #[test]
    fn shortening_keeps_bare_names_unchanged() {
        assert_eq!(shorten("learning_rate", "__"), "learning_rate");
        assert_eq!(shorten("a__b__c", "__"), "c");
    }

    #[test]
    fn shortening_detects_collisions() {
        let mut params_a = ParamSet::new();
        params_a.insert("classifier__alpha", 0.1);
        params_a.insert("sampler__alpha", 0.2);
        let row = CandidateSummary {
            candidate: 0,
            params: params_a,
            fold_scores: vec![0.5],
            mean_score: 0.5,
            std_score: 0.0,
            rank: 1,
        };
        let err = ResultsTable::from_summaries(&[row]).shorten_names("__");
        match err {
            Err(TuneError::Report(ReportError::Unresolved(e))) => {
                assert_eq!(e.short, "alpha");
                assert_eq!(e.first, "classifier__alpha");
                assert_eq!(e.second, "sampler__alpha");
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn pivot_produces_a_complete_grid() {
        let table = ResultsTable::from_summaries(&summaries())
            .shorten_names("__")
            .unwrap();
        let pivot = table.pivot("learning_rate", "max_leaf_nodes").unwrap();

        assert_eq!(pivot.shape(), (4, 3));
        assert_eq!(pivot.row_values().len(), 4);
        assert_eq!(pivot.col_values().len(), 3);
        // Candidate 0 sits at (0, 0), candidate 11 at (3, 2).
        assert_eq!(pivot.cell(0, 0), 0.6);
        assert!((pivot.cell(3, 2) - 0.71).abs() < 1e-12);
    }

    #[test]
    fn pivot_rejects_unknown_parameters() {
        let table = ResultsTable::from_summaries(&summaries());
        assert!(matches!(
            table.pivot("classifier__learning_rate", "missing"),
            Err(TuneError::Report(ReportError::UnknownColumn { .. }))
        ));
    }

    #[test]
    fn pivot_rejects_duplicate_cells() {
        // A third varying parameter makes (row, col) pairs non-unique.
        let mut rows = Vec::new();
        for (i, &extra) in [1i64, 2].iter().enumerate() {
            let mut params = ParamSet::new();
            params.insert("a", 1i64);
            params.insert("b", 2i64);
            params.insert("c", extra);
            rows.push(CandidateSummary {
                candidate: i,
                params,
                fold_scores: vec![0.5],
                mean_score: 0.5,
                std_score: 0.0,
                rank: i + 1,
            });
        }
        assert!(matches!(
            ResultsTable::from_summaries(&rows).pivot("a", "b"),
            Err(TuneError::Report(ReportError::AmbiguousCell { .. }))
        ));
    }

    #[test]
    fn pivot_reports_missing_cells() {
        let mut rows = summaries();
        rows.remove(5);
        let table = ResultsTable::from_summaries(&rows);
        assert!(matches!(
            table.pivot("classifier__learning_rate", "classifier__max_leaf_nodes"),
            Err(TuneError::Report(ReportError::MissingCell { .. }))
        ));
    }

    #[test]
    fn display_renders_headers_and_rows() {
        let table = ResultsTable::from_summaries(&summaries())
            .shorten_names("__")
            .unwrap();
        let text = table.to_string();
        assert!(text.contains("learning_rate"));
        assert!(text.contains("mean_score"));
        assert!(text.contains("0.7100"));
    }
}
