use thiserror::Error;

/// Main error type for the TuneGrid system
#[derive(Error, Debug)]
pub enum TuneError {
    #[error("Grid error: {0}")]
    Grid(#[from] InvalidGridError),

    #[error("Empty grid: {0}")]
    EmptyGrid(#[from] EmptyGridError),

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TuneGrid operations
pub type TuneResult<T> = Result<T, TuneError>;

/// Malformed search space, detected before any training occurs (except
/// for unknown parameter names, which only surface once a combination is
/// applied to an estimator).
#[derive(Error, Debug)]
pub enum InvalidGridError {
    #[error("parameter {parameter} declares no candidate values")]
    EmptyValueList { parameter: String },

    #[error("grid declares no parameters")]
    NoParameters,

    #[error("duplicate parameter {parameter} in grid")]
    DuplicateParameter { parameter: String },

    #[error("estimator does not expose parameter {parameter}")]
    UnknownParameter { parameter: String },

    #[error("parameter {parameter} rejected value {value}: {message}")]
    InvalidValue {
        parameter: String,
        value: String,
        message: String,
    },

    #[error("grid expands past the supported combination count")]
    TooLarge,
}

/// Defensive: a validated grid can never expand to zero combinations,
/// but the driver refuses to rank an empty result table all the same.
#[derive(Error, Debug)]
#[error("parameter grid expanded to zero combinations")]
pub struct EmptyGridError;

/// A training attempt failed. Propagated immediately with enough context
/// to reproduce the failure; the search never retries.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("training failed for candidate {candidate} on fold {fold}: {message}")]
    Fold {
        candidate: usize,
        fold: usize,
        message: String,
    },

    #[error("refit of winning candidate {candidate} failed: {message}")]
    Refit { candidate: usize, message: String },
}

/// Two distinct parameters collapsed to the same display name.
#[derive(Error, Debug)]
#[error("parameters {first} and {second} both shorten to {short}")]
pub struct UnresolvedNameError {
    pub short: String,
    pub first: String,
    pub second: String,
}

/// Reporting-layer errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Unresolved(#[from] UnresolvedNameError),

    #[error("column not found: {name}")]
    UnknownColumn { name: String },

    #[error("pivot cell ({row}, {column}) has no mean score")]
    MissingCell { row: String, column: String },

    #[error("pivot cell ({row}, {column}) is filled by more than one candidate")]
    AmbiguousCell { row: String, column: String },
}

/// Data-related errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to load data: {message}")]
    LoadingFailed { message: String },

    #[error("parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("target column not found: {name}")]
    MissingTargetColumn { name: String },

    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("row {row} has {actual} features, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        actual: usize,
        expected: usize,
    },

    #[error("label count {labels} does not match row count {rows}")]
    LabelCountMismatch { labels: usize, rows: usize },

    #[error("label id {id} out of range for {classes} classes")]
    InvalidLabel { id: usize, classes: usize },

    #[error("row index {index} out of range for {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_error_carries_candidate_and_fold() {
        let err = FitError::Fold {
            candidate: 7,
            fold: 1,
            message: "singular matrix".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("candidate 7"));
        assert!(text.contains("fold 1"));
        assert!(text.contains("singular matrix"));
    }

    #[test]
    fn unresolved_name_lists_both_sources() {
        let err = UnresolvedNameError {
            short: "learning_rate".to_string(),
            first: "classifier__learning_rate".to_string(),
            second: "sampler__learning_rate".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("classifier__learning_rate"));
        assert!(text.contains("sampler__learning_rate"));
    }

    #[test]
    fn sub_errors_convert_into_umbrella() {
        let grid_err = InvalidGridError::EmptyValueList {
            parameter: "max_leaf_nodes".to_string(),
        };
        let tune_err: TuneError = grid_err.into();
        match tune_err {
            TuneError::Grid(_) => (),
            _ => panic!("Expected Grid error"),
        }

        let tune_err: TuneError = EmptyGridError.into();
        match tune_err {
            TuneError::EmptyGrid(_) => (),
            _ => panic!("Expected EmptyGrid error"),
        }
    }
}
