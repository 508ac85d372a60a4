//! Classifier
//!
//! The learning collaborator of the training stage. Any model that can be
//! fit on a feature matrix and predict binary labels can be trained and
//! persisted by [`crate::trainer::ModelTrainer`].
pub mod logistic;

pub use logistic::LogisticRegression;

use crate::data::RowMajorMatrix;
use crate::errors::SensorError;
use crate::utils::{load_object, save_object};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

pub trait Classifier {
    /// Fit the model on features `x` and binary targets `y` (0.0 or 1.0).
    fn fit(&mut self, x: &RowMajorMatrix<f64>, y: &[f64]) -> Result<(), SensorError>;

    /// Predicted label, 0.0 or 1.0, for every row of `x`.
    /// Fails if `x` does not have the number of features the model was fit on.
    fn predict(&self, x: &RowMajorMatrix<f64>) -> Result<Vec<f64>, SensorError>;
}

/// IO
pub trait ModelIO: Serialize + DeserializeOwned + Sized {
    /// Save a model as a json object to a file, creating parent directories.
    ///
    /// * `path` - Path to save model.
    fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), SensorError> {
        save_object(path, self)
    }

    /// Dump a model as a json object
    fn json_dump(&self) -> Result<String, SensorError> {
        serde_json::to_string(self).map_err(|e| SensorError::Persistence(e.to_string()))
    }

    /// Load a model from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, SensorError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| SensorError::Persistence(e.to_string()))
    }

    /// Load a model from a path to a json model object.
    /// Fails with [`SensorError::ModelNotFound`] if nothing exists at `path`.
    ///
    /// * `path` - Path to load model from.
    fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, SensorError> {
        load_object(path)
    }
}

impl ModelIO for LogisticRegression {}
