//! Baseline estimators and the parameter-namespace adapter.
//!
//! These are deliberately simple, fully deterministic models: enough to
//! exercise the search engine end-to-end and to serve as floors when
//! judging a tuned model.

use tg_types::{
    Dataset, DataError, Estimator, InvalidGridError, ParamSet, TuneError, TuneResult,
};

/// Predicts the most frequent training class for every row.
///
/// Exposes no tunable parameters; configuring it with anything is an
/// invalid grid.
#[derive(Debug, Clone, Default)]
pub struct MajorityClass {
    class_counts: Vec<usize>,
    majority: Option<usize>,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Estimator for MajorityClass {
    fn configure(&mut self, params: &ParamSet) -> TuneResult<()> {
        if let Some(name) = params.names().next() {
            return Err(InvalidGridError::UnknownParameter {
                parameter: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn fit(&mut self, data: &Dataset) -> TuneResult<()> {
        if data.is_empty() {
            return Err(DataError::EmptyDataset.into());
        }
        let mut counts = vec![0usize; data.n_classes()];
        for &label in data.labels() {
            counts[label] += 1;
        }
        // Ties go to the smallest class id.
        let majority = counts
            .iter()
            .enumerate()
            .max_by(|(ia, ca), (ib, cb)| ca.cmp(cb).then(ib.cmp(ia)))
            .map(|(i, _)| i);
        self.class_counts = counts;
        self.majority = majority;
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> TuneResult<Vec<usize>> {
        let majority = self
            .majority
            .ok_or_else(|| TuneError::Internal("MajorityClass used before fit".to_string()))?;
        Ok(vec![majority; data.n_rows()])
    }

    fn predict_proba(&self, data: &Dataset) -> TuneResult<Vec<Vec<f64>>> {
        if self.majority.is_none() {
            return Err(TuneError::Internal(
                "MajorityClass used before fit".to_string(),
            ));
        }
        let total: usize = self.class_counts.iter().sum();
        let row: Vec<f64> = self
            .class_counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect();
        Ok(vec![row; data.n_rows()])
    }
}

/// k-nearest-neighbour classifier with a tunable neighbour count `k`
/// and Minkowski distance exponent `power`.
///
/// Fully deterministic: neighbour ties resolve by training-row order and
/// vote ties by the smallest class id, so refitting on the same data
/// reproduces predictions exactly.
#[derive(Debug, Clone)]
pub struct KNearest {
    k: usize,
    power: f64,
    train: Option<Dataset>,
}

impl KNearest {
    pub fn new(k: usize, power: f64) -> Self {
        Self {
            k,
            power,
            train: None,
        }
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let sum: f64 = a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs().powf(self.power))
            .sum();
        sum.powf(1.0 / self.power)
    }

    fn votes(&self, row: &[f64], train: &Dataset) -> Vec<usize> {
        let mut neighbours: Vec<(f64, usize)> = train
            .rows()
            .enumerate()
            .map(|(i, r)| (self.distance(row, r), i))
            .collect();
        neighbours.sort_by(|(da, ia), (db, ib)| {
            da.partial_cmp(db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        });

        let k = self.k.min(neighbours.len());
        let mut counts = vec![0usize; train.n_classes()];
        for &(_, idx) in neighbours.iter().take(k) {
            counts[train.labels()[idx]] += 1;
        }
        counts
    }
}

impl Default for KNearest {
    fn default() -> Self {
        Self::new(5, 2.0)
    }
}

impl Estimator for KNearest {
    fn configure(&mut self, params: &ParamSet) -> TuneResult<()> {
        for (name, value) in params.iter() {
            match name {
                "k" => {
                    let k = value.as_int().ok_or_else(|| InvalidGridError::InvalidValue {
                        parameter: "k".to_string(),
                        value: value.to_string(),
                        message: "expected an integer".to_string(),
                    })?;
                    if k < 1 {
                        return Err(InvalidGridError::InvalidValue {
                            parameter: "k".to_string(),
                            value: value.to_string(),
                            message: "must be at least 1".to_string(),
                        }
                        .into());
                    }
                    self.k = k as usize;
                }
                "power" => {
                    let power =
                        value
                            .as_float()
                            .ok_or_else(|| InvalidGridError::InvalidValue {
                                parameter: "power".to_string(),
                                value: value.to_string(),
                                message: "expected a number".to_string(),
                            })?;
                    if power <= 0.0 {
                        return Err(InvalidGridError::InvalidValue {
                            parameter: "power".to_string(),
                            value: value.to_string(),
                            message: "must be positive".to_string(),
                        }
                        .into());
                    }
                    self.power = power;
                }
                other => {
                    return Err(InvalidGridError::UnknownParameter {
                        parameter: other.to_string(),
                    }
                    .into())
                }
            }
        }
        Ok(())
    }

    fn fit(&mut self, data: &Dataset) -> TuneResult<()> {
        if data.is_empty() {
            return Err(DataError::EmptyDataset.into());
        }
        self.train = Some(data.clone());
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> TuneResult<Vec<usize>> {
        let train = self
            .train
            .as_ref()
            .ok_or_else(|| TuneError::Internal("KNearest used before fit".to_string()))?;

        let mut predictions = Vec::with_capacity(data.n_rows());
        for row in data.rows() {
            let counts = self.votes(row, train);
            let winner = counts
                .iter()
                .enumerate()
                .max_by(|(ia, ca), (ib, cb)| ca.cmp(cb).then(ib.cmp(ia)))
                .map(|(i, _)| i)
                .unwrap_or(0);
            predictions.push(winner);
        }
        Ok(predictions)
    }

    fn predict_proba(&self, data: &Dataset) -> TuneResult<Vec<Vec<f64>>> {
        let train = self
            .train
            .as_ref()
            .ok_or_else(|| TuneError::Internal("KNearest used before fit".to_string()))?;

        let mut rows = Vec::with_capacity(data.n_rows());
        for row in data.rows() {
            let counts = self.votes(row, train);
            let total: usize = counts.iter().sum();
            rows.push(
                counts
                    .iter()
                    .map(|&c| c as f64 / total as f64)
                    .collect(),
            );
        }
        Ok(rows)
    }
}

/// Routes structurally prefixed parameter names to an inner estimator.
///
/// A grid declared against a composite model addresses each step's
/// parameters as `step__param`; this adapter strips its own prefix and
/// forwards the bare names, rejecting anything outside its namespace.
pub struct Namespaced {
    prefix: String,
    inner: Box<dyn Estimator>,
}

impl Namespaced {
    pub fn new(prefix: impl Into<String>, inner: Box<dyn Estimator>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }
}

impl Estimator for Namespaced {
    fn configure(&mut self, params: &ParamSet) -> TuneResult<()> {
        let qualifier = format!("{}__", self.prefix);
        let mut forwarded = ParamSet::new();
        for (name, value) in params.iter() {
            match name.strip_prefix(&qualifier) {
                Some(bare) => forwarded.insert(bare, value.clone()),
                None => {
                    return Err(InvalidGridError::UnknownParameter {
                        parameter: name.to_string(),
                    }
                    .into())
                }
            }
        }
        self.inner.configure(&forwarded)
    }

    fn fit(&mut self, data: &Dataset) -> TuneResult<()> {
        self.inner.fit(data)
    }

    fn predict(&self, data: &Dataset) -> TuneResult<Vec<usize>> {
        self.inner.predict(data)
    }

    fn predict_proba(&self, data: &Dataset) -> TuneResult<Vec<Vec<f64>>> {
        self.inner.predict_proba(data)
    }
}
