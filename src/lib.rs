//! Validation of tabular sensor data against a trusted baseline, drift
//! detection, and acceptance gating of a binary classifier.

// Modules
pub mod artifact;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod data;
pub mod drift;
pub mod errors;
pub mod metrics;
pub mod report;
pub mod source;
pub mod store;
pub mod trainer;
pub mod utils;
pub mod validation;

// Individual classes, and functions
pub use classifier::{Classifier, LogisticRegression, ModelIO};
pub use data::Dataset;
pub use errors::SensorError;
pub use report::ValidationReport;
pub use trainer::ModelTrainer;
pub use validation::DataValidation;
