//! The estimator seam: anything that can be configured, fitted, and
//! queried for predictions can be tuned by the search driver.

use crate::dataset::Dataset;
use crate::errors::TuneResult;
use crate::params::ParamSet;

/// A tunable classifier.
///
/// The driver never assumes a model family: it configures an estimator
/// with one parameter combination, fits it on a training partition, and
/// asks for predictions on the held-out rows. Implementations must
/// reject unknown parameter names with
/// [`InvalidGridError::UnknownParameter`](crate::InvalidGridError::UnknownParameter),
/// which is how a malformed grid surfaces at combination-application
/// time.
pub trait Estimator: Send {
    /// Apply one parameter combination before fitting.
    fn configure(&mut self, params: &ParamSet) -> TuneResult<()>;

    /// Train on the given rows and labels.
    fn fit(&mut self, data: &Dataset) -> TuneResult<()>;

    /// Predict a class id for every row.
    fn predict(&self, data: &Dataset) -> TuneResult<Vec<usize>>;

    /// Per-class confidence for every row; rows sum to 1.
    fn predict_proba(&self, data: &Dataset) -> TuneResult<Vec<Vec<f64>>>;
}

/// Mints a fresh, unfitted estimator for each unit of work.
///
/// Every (candidate, fold) evaluation and the final refit get their own
/// instance, so no training state leaks between folds or threads.
pub trait EstimatorBuilder: Send + Sync {
    fn build(&self) -> Box<dyn Estimator>;
}

impl<F> EstimatorBuilder for F
where
    F: Fn() -> Box<dyn Estimator> + Send + Sync,
{
    fn build(&self) -> Box<dyn Estimator> {
        (self)()
    }
}
