//! CSV ingestion: read a delimited table, split off the target column,
//! and intern target labels into class ids.

use std::collections::HashMap;
use std::path::Path;

use csv::ReaderBuilder;

use tg_types::{DataError, Dataset, TuneResult};

/// Loads a headered CSV file into a [`Dataset`].
///
/// Every non-target column must be numeric; the target column may hold
/// arbitrary strings, which are interned into class ids in order of
/// first appearance.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load `path`, designating `target_column` as the label column.
    pub fn load<P: AsRef<Path>>(&self, path: P, target_column: &str) -> TuneResult<Dataset> {
        let path = path.as_ref();
        tracing::info!("Loading CSV data from: {}", path.display());

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to open CSV file {}: {}", path.display(), e),
            })?;

        let headers = rdr
            .headers()
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV headers: {}", e),
            })?
            .clone();

        let target_idx = headers
            .iter()
            .position(|h| h == target_column)
            .ok_or_else(|| DataError::MissingTargetColumn {
                name: target_column.to_string(),
            })?;

        let feature_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut features: Vec<Vec<f64>> = Vec::new();
        let mut labels: Vec<usize> = Vec::new();
        let mut label_names: Vec<String> = Vec::new();
        let mut label_ids: HashMap<String, usize> = HashMap::new();

        for (record_num, result) in rdr.records().enumerate() {
            // Header occupies line 1, so the first record is line 2.
            let line = record_num + 2;
            let record = result.map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV record at line {}: {}", line, e),
            })?;

            if record.len() != headers.len() {
                return Err(DataError::ParseError {
                    line,
                    message: format!(
                        "record has {} columns, expected {}",
                        record.len(),
                        headers.len()
                    ),
                }
                .into());
            }

            let mut row = Vec::with_capacity(feature_names.len());
            for (col, value) in record.iter().enumerate() {
                if col == target_idx {
                    let label = value.trim();
                    let id = match label_ids.get(label) {
                        Some(&id) => id,
                        None => {
                            let id = label_names.len();
                            label_names.push(label.to_string());
                            label_ids.insert(label.to_string(), id);
                            id
                        }
                    };
                    labels.push(id);
                } else {
                    let parsed: f64 = value.trim().parse().map_err(|_| DataError::ParseError {
                        line,
                        message: format!(
                            "column {} value {:?} is not numeric",
                            headers.get(col).unwrap_or(""),
                            value
                        ),
                    })?;
                    row.push(parsed);
                }
            }
            features.push(row);
        }

        if features.is_empty() {
            return Err(DataError::EmptyDataset.into());
        }

        tracing::info!(
            rows = features.len(),
            features = feature_names.len(),
            classes = label_names.len(),
            "Loaded dataset from {}",
            path.display()
        );

        Dataset::new(feature_names, features, labels, label_names)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}
