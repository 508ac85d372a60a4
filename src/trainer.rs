//! Model Trainer
//!
//! Fits a classifier on the transformed train array, scores it with F1 on
//! both partitions and only persists it if it passes the acceptance gates.
use crate::artifact::{DataTransformationArtifact, ModelTrainerArtifact};
use crate::classifier::{Classifier, ModelIO};
use crate::config::TrainerConfig;
use crate::data::RowMajorMatrix;
use crate::errors::SensorError;
use crate::metrics::f1_score;
use crate::utils::load_array_data;
use log::info;

/// Slack allowed when comparing the score gap with the overfitting threshold.
const SCORE_TOLERANCE: f64 = 1e-12;

pub struct ModelTrainer<C: Classifier + ModelIO> {
    pub config: TrainerConfig,
    pub transformation_artifact: DataTransformationArtifact,
    model: C,
}

impl<C: Classifier + ModelIO> ModelTrainer<C> {
    /// * `model` - Unfitted classifier to train.
    pub fn new(config: TrainerConfig, transformation_artifact: DataTransformationArtifact, model: C) -> Self {
        info!("{} Model Trainer {}", ">>".repeat(5), "<<".repeat(5));
        ModelTrainer {
            config,
            transformation_artifact,
            model,
        }
    }

    /// Hyperparameter search hook, currently a no-op.
    // TODO: grid search over the classifier's learning rate and iteration count.
    pub fn fine_tune(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    pub fn train_model(&mut self, x: &RowMajorMatrix<f64>, y: &[f64]) -> Result<(), SensorError> {
        self.model.fit(x, y)
    }

    /// Check the scores against the configured gates.
    pub fn check_scores(&self, f1_train_score: f64, f1_test_score: f64) -> Result<(), SensorError> {
        info!("Checking if model is underfitted or not");
        if f1_test_score < self.config.expected_score {
            return Err(SensorError::ModelQuality(format!(
                "model is not good as it is not able to give expected score: {}, model actual score: {}",
                self.config.expected_score, f1_test_score
            )));
        }

        info!("Checking if model is overfitted or not");
        let diff = (f1_train_score - f1_test_score).abs();
        if diff - self.config.overfitting_threshold > SCORE_TOLERANCE {
            return Err(SensorError::ModelQuality(format!(
                "train and test score difference: {:.4} is more than overfitting threshold: {}",
                diff, self.config.overfitting_threshold
            )));
        }
        Ok(())
    }

    /// Train, score and gate the model, then save it.
    pub fn initiate_model_trainer(mut self) -> Result<ModelTrainerArtifact, SensorError> {
        info!("Loading train and test array");
        let train_arr = load_array_data(&self.transformation_artifact.transformed_train_path)
            .map_err(|e| e.at_stage("Model trainer (loading arrays)"))?;
        let test_arr = load_array_data(&self.transformation_artifact.transformed_test_path)
            .map_err(|e| e.at_stage("Model trainer (loading arrays)"))?;

        info!("Splitting input and target feature from train and test array");
        let (x_train, y_train) = train_arr.split_target().map_err(|e| e.at_stage("Model trainer (loading arrays)"))?;
        let (x_test, y_test) = test_arr.split_target().map_err(|e| e.at_stage("Model trainer (loading arrays)"))?;
        if x_train.cols != x_test.cols {
            return Err(SensorError::DataAccess(format!(
                "train array has {} features but test array has {}",
                x_train.cols, x_test.cols
            ))
            .at_stage("Model trainer (loading arrays)"));
        }

        self.fine_tune().map_err(|e| e.at_stage("Model trainer (fine tuning)"))?;
        info!("Training the model");
        self.train_model(&x_train, &y_train)
            .map_err(|e| e.at_stage("Model trainer (fitting)"))?;

        info!("Calculating f1 train score");
        let yhat_train = self
            .model
            .predict(&x_train)
            .map_err(|e| e.at_stage("Model trainer (scoring)"))?;
        let f1_train_score = f1_score(&y_train, &yhat_train);
        info!("Calculating f1 test score");
        let yhat_test = self
            .model
            .predict(&x_test)
            .map_err(|e| e.at_stage("Model trainer (scoring)"))?;
        let f1_test_score = f1_score(&y_test, &yhat_test);
        info!("Train score: {} and test score: {}", f1_train_score, f1_test_score);

        self.check_scores(f1_train_score, f1_test_score)
            .map_err(|e| e.at_stage("Model trainer (acceptance)"))?;

        info!("Saving model object");
        self.model
            .save_model(&self.config.model_path)
            .map_err(|e| e.at_stage("Model trainer (saving model)"))?;

        let artifact = ModelTrainerArtifact {
            model_path: self.config.model_path.clone(),
            f1_train_score,
            f1_test_score,
        };
        info!("Model trainer artifact: {}", artifact);
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticRegression;
    use crate::utils::save_array_data;
    use serde::{Deserialize, Serialize};
    use std::path::Path;
    use tempfile::tempdir;

    /// Predicts whatever the first feature holds.
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Echo {
        fitted: bool,
    }

    impl Classifier for Echo {
        fn fit(&mut self, _x: &RowMajorMatrix<f64>, _y: &[f64]) -> Result<(), SensorError> {
            self.fitted = true;
            Ok(())
        }
        fn predict(&self, x: &RowMajorMatrix<f64>) -> Result<Vec<f64>, SensorError> {
            Ok((0..x.rows).map(|i| *x.get(i, 0)).collect())
        }
    }

    impl ModelIO for Echo {}

    /// Rows of (prediction, label) giving the requested confusion counts.
    fn scored_array(tp: usize, fp: usize, fn_: usize, tn: usize) -> RowMajorMatrix<f64> {
        let mut data = Vec::new();
        for (pred, label, n) in [(1.0, 1.0, tp), (1.0, 0.0, fp), (0.0, 1.0, fn_), (0.0, 0.0, tn)] {
            for _ in 0..n {
                data.push(pred);
                data.push(label);
            }
        }
        let rows = tp + fp + fn_ + tn;
        RowMajorMatrix::new(data, rows, 2)
    }

    fn setup(
        dir: &Path,
        train: &RowMajorMatrix<f64>,
        test: &RowMajorMatrix<f64>,
        expected_score: f64,
        overfitting_threshold: f64,
    ) -> (TrainerConfig, DataTransformationArtifact) {
        let artifact = DataTransformationArtifact {
            transformed_train_path: dir.join("transformed").join("train.json"),
            transformed_test_path: dir.join("transformed").join("test.json"),
        };
        save_array_data(&artifact.transformed_train_path, train).unwrap();
        save_array_data(&artifact.transformed_test_path, test).unwrap();
        let config = TrainerConfig {
            model_path: dir.join("model_trainer").join("model.json"),
            expected_score,
            overfitting_threshold,
        };
        (config, artifact)
    }

    #[test]
    fn test_underfitted_model_rejected() {
        let dir = tempdir().unwrap();
        // F1 0.90 on test.
        let (config, artifact) = setup(dir.path(), &scored_array(9, 1, 1, 9), &scored_array(9, 1, 1, 9), 0.92, 0.1);
        let model_path = config.model_path.clone();
        let err = ModelTrainer::new(config, artifact, Echo::default())
            .initiate_model_trainer()
            .unwrap_err();
        match err.root() {
            SensorError::ModelQuality(msg) => {
                assert!(msg.contains("expected score: 0.92"));
                assert!(msg.contains("0.9"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!model_path.exists());
    }

    #[test]
    fn test_overfitted_model_rejected() {
        let dir = tempdir().unwrap();
        // F1 0.99 on train, 0.95 on test.
        let (config, artifact) = setup(
            dir.path(),
            &scored_array(99, 1, 1, 99),
            &scored_array(19, 1, 1, 19),
            0.9,
            0.02,
        );
        let err = ModelTrainer::new(config, artifact, Echo::default())
            .initiate_model_trainer()
            .unwrap_err();
        match err.root() {
            SensorError::ModelQuality(msg) => {
                assert!(msg.contains("0.0400"));
                assert!(msg.contains("overfitting threshold: 0.02"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_score_gap_at_threshold_accepted() {
        let dir = tempdir().unwrap();
        let artifact = DataTransformationArtifact {
            transformed_train_path: dir.path().join("train.json"),
            transformed_test_path: dir.path().join("test.json"),
        };
        let config = TrainerConfig {
            expected_score: 0.9,
            overfitting_threshold: 0.02,
            ..TrainerConfig::default()
        };
        let trainer = ModelTrainer::new(config, artifact, Echo::default());
        assert!(trainer.check_scores(0.97, 0.95).is_ok());
        assert!(trainer.check_scores(0.95, 0.97).is_ok());
        assert!(trainer.check_scores(0.98, 0.95).is_err());
    }

    #[test]
    fn test_feature_count_mismatch_fails() {
        let dir = tempdir().unwrap();
        let train = RowMajorMatrix::new(vec![1.0, 1.0, -1.0, 0.0, 2.0, 1.0, -2.0, 0.0], 4, 2);
        let test = RowMajorMatrix::new(vec![1.0, 0.5, 1.0, -1.0, 0.5, 0.0], 2, 3);
        let (config, artifact) = setup(dir.path(), &train, &test, 0.5, 0.5);
        let model_path = config.model_path.clone();
        let err = ModelTrainer::new(config, artifact, LogisticRegression::default())
            .initiate_model_trainer()
            .unwrap_err();
        match err.root() {
            SensorError::DataAccess(msg) => assert!(msg.contains("1 features but test array has 2")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(err.to_string().contains("loading arrays"));
        assert!(!model_path.exists());
    }

    #[test]
    fn test_accepted_model_saved() {
        let dir = tempdir().unwrap();
        let (config, artifact) = setup(
            dir.path(),
            &scored_array(19, 1, 1, 19),
            &scored_array(19, 1, 1, 19),
            0.9,
            0.02,
        );
        let artifact = ModelTrainer::new(config.clone(), artifact, Echo::default())
            .initiate_model_trainer()
            .unwrap();
        assert!((artifact.f1_test_score - 0.95).abs() < 1e-12);
        assert!((artifact.f1_train_score - 0.95).abs() < 1e-12);
        assert_eq!(artifact.model_path, config.model_path);
        assert!(Echo::load_model(&artifact.model_path).unwrap().fitted);
    }

    #[test]
    fn test_missing_array_fails() {
        let dir = tempdir().unwrap();
        let artifact = DataTransformationArtifact {
            transformed_train_path: dir.path().join("train.json"),
            transformed_test_path: dir.path().join("test.json"),
        };
        let err = ModelTrainer::new(TrainerConfig::default(), artifact, Echo::default())
            .initiate_model_trainer()
            .unwrap_err();
        assert!(matches!(err.root(), SensorError::DataAccess(_)));
        assert!(err.to_string().contains("loading arrays"));
    }

    #[test]
    fn test_logistic_regression_end_to_end() {
        let dir = tempdir().unwrap();
        let mut data = Vec::new();
        for i in 0..120 {
            let label = (i % 3 == 0) as u8 as f64;
            data.push((if label == 1.0 { 2.0 } else { -2.0 }) + (i % 5) as f64 * 0.05);
            data.push((i % 4) as f64);
            data.push(label);
        }
        let array = RowMajorMatrix::new(data, 120, 3);
        let (config, artifact) = setup(dir.path(), &array, &array, 0.9, 0.05);
        let artifact = ModelTrainer::new(config, artifact, LogisticRegression::default())
            .initiate_model_trainer()
            .unwrap();
        assert_eq!(artifact.f1_test_score, 1.0);
        assert!(LogisticRegression::load_model(&artifact.model_path).is_ok());
    }
}
