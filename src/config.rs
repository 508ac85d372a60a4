//! Pipeline Configuration
//!
//! Configuration of the validation and training stages and of the
//! document store, read from and written to YAML.
use crate::constants::{MISSING_SENTINEL, MISSING_THRESHOLD, TARGET_COLUMN};
use crate::errors::SensorError;
use crate::utils::{read_yaml_file, validate_float_parameter, validate_positive_float_parameter, write_yaml_file};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options of the data validation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Location of the trusted baseline dataset.
    pub base_file_path: PathBuf,
    /// Destination of the validation report.
    pub report_file_path: PathBuf,
    /// Columns with a missing fraction strictly above this are dropped.
    pub missing_threshold: f64,
    /// Columns left out of numeric coercion and drift testing.
    pub excluded_columns: Vec<String>,
    /// Literal value of the baseline that stands for a missing value.
    pub missing_sentinel: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            base_file_path: PathBuf::from("aps_failure_training_set1.csv"),
            report_file_path: PathBuf::from("artifact/data_validation/report.yaml"),
            missing_threshold: MISSING_THRESHOLD,
            excluded_columns: vec![TARGET_COLUMN.to_string()],
            missing_sentinel: MISSING_SENTINEL.to_string(),
        }
    }
}

/// Options of the model training stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub model_path: PathBuf,
    /// Minimum F1 score on the test partition.
    pub expected_score: f64,
    /// Largest accepted gap between train and test F1 scores.
    pub overfitting_threshold: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            model_path: PathBuf::from("artifact/model_trainer/model/model.json"),
            expected_score: 0.7,
            overfitting_threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub database: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            root: PathBuf::from("store"),
            database: "aps".to_string(),
            collection: "sensor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub validation: ValidationConfig,
    pub trainer: TrainerConfig,
    pub store: StoreConfig,
}

impl PipelineConfig {
    /// Defaults with every stage output placed under
    /// `<artifact_root>/<timestamp>/`, one directory per run.
    pub fn timestamped<P: AsRef<Path>>(artifact_root: P, timestamp: DateTime<Utc>) -> Self {
        let run_dir = artifact_root
            .as_ref()
            .join(timestamp.format("%m%d%Y__%H%M%S").to_string());
        let mut config = PipelineConfig::default();
        config.validation.report_file_path = run_dir.join("data_validation").join("report.yaml");
        config.trainer.model_path = run_dir.join("model_trainer").join("model").join("model.json");
        config
    }
}

/// IO
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Check parameter ranges.
    fn validate(&self) -> Result<(), SensorError> {
        Ok(())
    }

    /// Dump the configuration as a YAML document.
    fn to_yaml(&self) -> Result<String, SensorError> {
        serde_yaml::to_string(self).map_err(|e| SensorError::Persistence(e.to_string()))
    }

    /// Parse and validate a configuration from a YAML document.
    fn from_yaml(yaml: &str) -> Result<Self, SensorError> {
        let config = serde_yaml::from_str::<Self>(yaml).map_err(|e| SensorError::DataAccess(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a YAML file.
    ///
    /// * `path` - Path to save the configuration.
    fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), SensorError> {
        write_yaml_file(path, self)
    }

    /// Load and validate a configuration from a YAML file.
    ///
    /// * `path` - Path to load the configuration from.
    fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, SensorError> {
        let config: Self = read_yaml_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigIO for ValidationConfig {
    fn validate(&self) -> Result<(), SensorError> {
        validate_float_parameter(self.missing_threshold, 0.0, 1.0, "missing_threshold")
    }
}

impl ConfigIO for TrainerConfig {
    fn validate(&self) -> Result<(), SensorError> {
        validate_float_parameter(self.expected_score, 0.0, 1.0, "expected_score")?;
        validate_positive_float_parameter(self.overfitting_threshold, "overfitting_threshold")
    }
}

impl ConfigIO for PipelineConfig {
    fn validate(&self) -> Result<(), SensorError> {
        self.validation.validate()?;
        self.trainer.validate()
    }
}
