//! In-memory tabular dataset: a feature matrix plus interned class labels.

use serde::{Deserialize, Serialize};

use crate::errors::{DataError, TuneResult};

/// A read-only table of feature rows with one class label per row.
///
/// Labels are stored as indices into `label_names`, so the original
/// string labels survive for reporting while comparisons stay cheap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    labels: Vec<usize>,
    label_names: Vec<String>,
}

impl Dataset {
    /// Build a dataset, validating row widths and label ranges.
    pub fn new(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        labels: Vec<usize>,
        label_names: Vec<String>,
    ) -> TuneResult<Self> {
        if labels.len() != features.len() {
            return Err(DataError::LabelCountMismatch {
                labels: labels.len(),
                rows: features.len(),
            }
            .into());
        }
        let expected = feature_names.len();
        for (row, values) in features.iter().enumerate() {
            if values.len() != expected {
                return Err(DataError::RowWidthMismatch {
                    row,
                    actual: values.len(),
                    expected,
                }
                .into());
            }
        }
        for &id in &labels {
            if id >= label_names.len() {
                return Err(DataError::InvalidLabel {
                    id,
                    classes: label_names.len(),
                }
                .into());
            }
        }
        Ok(Self {
            feature_names,
            features,
            labels,
            label_names,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_classes(&self) -> usize {
        self.label_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.features[index]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.features.iter().map(|r| r.as_slice())
    }

    /// Extract the given rows into a new dataset, preserving order.
    ///
    /// The label table is carried over unchanged so class ids remain
    /// comparable between a fold and the full dataset.
    pub fn take(&self, indices: &[usize]) -> TuneResult<Self> {
        let mut features = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());
        for &index in indices {
            if index >= self.features.len() {
                return Err(DataError::RowOutOfRange {
                    index,
                    rows: self.features.len(),
                }
                .into());
            }
            features.push(self.features[index].clone());
            labels.push(self.labels[index]);
        }
        Ok(Self {
            feature_names: self.feature_names.clone(),
            features,
            labels,
            label_names: self.label_names.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Dataset {
        Dataset::new(
            vec!["age".to_string(), "hours".to_string()],
            vec![
                vec![25.0, 40.0],
                vec![38.0, 50.0],
                vec![52.0, 20.0],
                vec![29.0, 45.0],
            ],
            vec![0, 1, 0, 1],
            vec!["<=50K".to_string(), ">50K".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn construction_validates_row_width() {
        let err = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 2.0], vec![3.0]],
            vec![0, 0],
            vec!["x".to_string()],
        );
        assert!(matches!(
            err,
            Err(crate::TuneError::Data(DataError::RowWidthMismatch { row: 1, .. }))
        ));
    }

    #[test]
    fn construction_validates_label_range() {
        let err = Dataset::new(
            vec!["a".to_string()],
            vec![vec![1.0]],
            vec![3],
            vec!["x".to_string()],
        );
        assert!(matches!(
            err,
            Err(crate::TuneError::Data(DataError::InvalidLabel { id: 3, .. }))
        ));
    }

    #[test]
    fn take_preserves_order_and_label_table() {
        let data = toy();
        let subset = data.take(&[2, 0]).unwrap();
        assert_eq!(subset.n_rows(), 2);
        assert_eq!(subset.row(0), &[52.0, 20.0]);
        assert_eq!(subset.row(1), &[25.0, 40.0]);
        assert_eq!(subset.labels(), &[0, 0]);
        assert_eq!(subset.label_names(), data.label_names());
    }

    #[test]
    fn take_rejects_out_of_range_rows() {
        let data = toy();
        assert!(matches!(
            data.take(&[0, 9]),
            Err(crate::TuneError::Data(DataError::RowOutOfRange { index: 9, .. }))
        ));
    }
}
