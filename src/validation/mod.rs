//! Data Validation
//!
//! Checks a train and a test candidate against the trusted baseline:
//! drops mostly empty columns, verifies every baseline column is still
//! present and tests each numeric column for drift. Findings are merged
//! into one [`ValidationReport`] that is written once, at the end of a
//! successful run.
pub mod prune;
pub mod schema;

pub use prune::prune_missing_columns;
pub use schema::{check_required_columns, SchemaCheck};

use crate::artifact::{DataIngestionArtifact, DataValidationArtifact};
use crate::config::ValidationConfig;
use crate::constants::{
    DATA_DRIFT_TEST, DATA_DRIFT_TRAIN, MISSING_COLUMNS_TEST, MISSING_COLUMNS_TRAIN, MISSING_VALUES_BASE,
    MISSING_VALUES_TEST, MISSING_VALUES_TRAIN,
};
use crate::data::{Dataset, NumericView};
use crate::drift::detect_drift;
use crate::errors::SensorError;
use crate::report::ValidationReport;
use crate::source::{CsvSource, DatasetSource};
use log::{info, warn};
use std::fmt;

/// Steps of a validation run. An error raised while moving to a step
/// is reported as a failure of that step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Loaded,
    BaselinePruned,
    CandidatesPruned,
    Reconciled,
    DriftChecked,
    Persisted,
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ValidationStage::Loaded => "loading datasets",
            ValidationStage::BaselinePruned => "pruning baseline",
            ValidationStage::CandidatesPruned => "pruning candidates",
            ValidationStage::Reconciled => "reconciling schemas",
            ValidationStage::DriftChecked => "detecting drift",
            ValidationStage::Persisted => "persisting report",
        };
        write!(f, "Data validation ({})", s)
    }
}

/// Report keys used for one candidate partition.
struct CandidateKeys {
    name: &'static str,
    missing_values: &'static str,
    missing_columns: &'static str,
    data_drift: &'static str,
}

const TRAIN_KEYS: CandidateKeys = CandidateKeys {
    name: "train",
    missing_values: MISSING_VALUES_TRAIN,
    missing_columns: MISSING_COLUMNS_TRAIN,
    data_drift: DATA_DRIFT_TRAIN,
};

const TEST_KEYS: CandidateKeys = CandidateKeys {
    name: "test",
    missing_values: MISSING_VALUES_TEST,
    missing_columns: MISSING_COLUMNS_TEST,
    data_drift: DATA_DRIFT_TEST,
};

pub struct DataValidation {
    pub config: ValidationConfig,
    pub ingestion_artifact: DataIngestionArtifact,
}

impl DataValidation {
    pub fn new(config: ValidationConfig, ingestion_artifact: DataIngestionArtifact) -> Self {
        info!("{} Data Validation {}", ">>".repeat(5), "<<".repeat(5));
        DataValidation {
            config,
            ingestion_artifact,
        }
    }

    /// Load the baseline and both candidates, validate them and write the report.
    pub fn initiate_data_validation(&self) -> Result<DataValidationArtifact, SensorError> {
        let base = CsvSource::new(&self.config.base_file_path);
        let train = CsvSource::new(&self.ingestion_artifact.train_file_path);
        let test = CsvSource::new(&self.ingestion_artifact.test_file_path);
        self.run(&base, &train, &test)
    }

    /// Validate datasets from arbitrary sources and write the report.
    pub fn run(
        &self,
        base: &impl DatasetSource,
        train: &impl DatasetSource,
        test: &impl DatasetSource,
    ) -> Result<DataValidationArtifact, SensorError> {
        let stage = ValidationStage::Loaded;
        info!("Reading base dataset");
        let base_df = base.load().map_err(|e| e.at_stage(stage))?;
        info!("Reading train dataset");
        let train_df = train.load().map_err(|e| e.at_stage(stage))?;
        info!("Reading test dataset");
        let test_df = test.load().map_err(|e| e.at_stage(stage))?;

        let report = self.validate(base_df, train_df, test_df)?;

        let stage = ValidationStage::Persisted;
        info!("Writing report to {}", self.config.report_file_path.display());
        report
            .save_report(&self.config.report_file_path)
            .map_err(|e| e.at_stage(stage))?;

        let artifact = DataValidationArtifact {
            report_file_path: self.config.report_file_path.clone(),
        };
        info!("Data validation artifact: {}", artifact);
        Ok(artifact)
    }

    /// Run every check over already loaded datasets and return the merged report.
    /// Nothing is written to disk.
    pub fn validate(&self, base: Dataset, train: Dataset, test: Dataset) -> Result<ValidationReport, SensorError> {
        let mut report = ValidationReport::new();
        let threshold = self.config.missing_threshold;
        let excluded = &self.config.excluded_columns;

        info!("Replacing '{}' values with missing in base dataset", self.config.missing_sentinel);
        let base = base.replace_sentinel(&self.config.missing_sentinel);

        let stage = ValidationStage::BaselinePruned;
        info!("Dropping columns with missing values from base dataset");
        let (base, fragment) = prune_missing_columns(base, threshold, MISSING_VALUES_BASE);
        report.merge(fragment).map_err(|e| e.at_stage(stage))?;
        let base = base.ok_or_else(|| SensorError::EmptyDataset("base".to_string()).at_stage(stage))?;

        let stage = ValidationStage::CandidatesPruned;
        let mut candidates = Vec::with_capacity(2);
        for (keys, df) in [(TRAIN_KEYS, train), (TEST_KEYS, test)] {
            info!("Dropping columns with missing values from {} dataset", keys.name);
            let (df, fragment) = prune_missing_columns(df, threshold, keys.missing_values);
            report.merge(fragment).map_err(|e| e.at_stage(stage))?;
            match df {
                Some(df) => candidates.push((keys, df)),
                None => warn!(
                    "No usable columns left in {} dataset, skipping its schema and drift checks",
                    keys.name
                ),
            }
        }

        let stage = ValidationStage::Reconciled;
        let base_view: NumericView = base.to_numeric(excluded).map_err(|e| e.at_stage(stage))?;
        let mut reconciled = Vec::with_capacity(candidates.len());
        for (keys, df) in candidates {
            let view = df.to_numeric(excluded).map_err(|e| e.at_stage(stage))?;
            info!("Checking all required columns are present in {} dataset", keys.name);
            match check_required_columns(&base, &df, keys.missing_columns) {
                SchemaCheck::Passed => reconciled.push((keys, view)),
                SchemaCheck::Failed(fragment) => {
                    warn!("{} dataset is missing required columns, skipping drift detection", keys.name);
                    report.merge(fragment).map_err(|e| e.at_stage(stage))?;
                }
            }
        }

        let stage = ValidationStage::DriftChecked;
        for (keys, view) in reconciled {
            info!(
                "As all columns are available in {} dataset hence detecting data drift",
                keys.name
            );
            let fragment = detect_drift(&base_view, &view, keys.data_drift).map_err(|e| e.at_stage(stage))?;
            report.merge(fragment).map_err(|e| e.at_stage(stage))?;
        }

        Ok(report)
    }
}
