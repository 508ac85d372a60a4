//! Artifacts
//!
//! Immutable pointers to the durable output of a stage, handed to the next one.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Train and test partitions written by the ingestion stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub train_file_path: PathBuf,
    pub test_file_path: PathBuf,
}

/// Location of the persisted validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValidationArtifact {
    pub report_file_path: PathBuf,
}

/// Feature/target arrays written by the transformation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformationArtifact {
    pub transformed_train_path: PathBuf,
    pub transformed_test_path: PathBuf,
}

/// Location of the accepted model and its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTrainerArtifact {
    pub model_path: PathBuf,
    pub f1_train_score: f64,
    pub f1_test_score: f64,
}

impl fmt::Display for DataValidationArtifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DataValidationArtifact(report_file_path={})", self.report_file_path.display())
    }
}

impl fmt::Display for ModelTrainerArtifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ModelTrainerArtifact(model_path={}, f1_train_score={:.4}, f1_test_score={:.4})",
            self.model_path.display(),
            self.f1_train_score,
            self.f1_test_score
        )
    }
}
