//! Errors
//!
//! Custom error types used throughout the `sensor-pipeline` crate.
use thiserror::Error;

/// Errors that can occur while validating data or training a model.
#[derive(Debug, Error)]
pub enum SensorError {
    /// A source file or collection could not be read, or was malformed.
    #[error("Unable to access data: {0}")]
    DataAccess(String),
    /// A cell could not be coerced to a floating point number.
    #[error("Column {column} holds non numeric value {value:?} at row {row}.")]
    NonNumericValue { column: String, row: usize, value: String },
    /// A candidate dataset lacks columns required by the baseline.
    #[error("Required columns missing from dataset: {columns:?}")]
    MissingColumns { columns: Vec<String> },
    /// Pruning removed every column of a dataset.
    #[error("No usable columns left in the {0} dataset after dropping missing values.")]
    EmptyDataset(String),
    /// A trained model did not pass an acceptance gate.
    #[error("Model rejected: {0}")]
    ModelQuality(String),
    /// Unable to write or read a report, array or model.
    #[error("Unable to persist object: {0}")]
    Persistence(String),
    /// A model file did not exist at load time.
    #[error("The file: {0} does not exist")]
    ModelNotFound(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// A report section was written twice within one run.
    #[error("Report key {0} was already written in this run.")]
    DuplicateReportKey(String),
    /// Any error, tagged with the pipeline step it surfaced in.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<SensorError>,
    },
}

impl SensorError {
    /// Wrap the error with the name of the step that produced it.
    pub fn at_stage(self, stage: impl ToString) -> Self {
        SensorError::Stage {
            stage: stage.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through any stage wrappers.
    pub fn root(&self) -> &SensorError {
        match self {
            SensorError::Stage { source, .. } => source.root(),
            e => e,
        }
    }
}
