use crate::classifier::Classifier;
use crate::data::RowMajorMatrix;
use crate::errors::SensorError;
use log::info;
use serde::{Deserialize, Serialize};

const PROBABILITY_EPS: f64 = 1e-6;

fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// Binary logistic regression fit with full batch gradient descent on
/// standardized features. Missing (NaN) features are imputed with the
/// training mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub learning_rate: f64,
    pub iterations: usize,
    /// L2 penalty on the weights.
    pub l2: f64,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        LogisticRegression {
            learning_rate: 0.5,
            iterations: 300,
            l2: 1e-4,
            weights: Vec::new(),
            bias: 0.0,
            means: Vec::new(),
            scales: Vec::new(),
        }
    }
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, iterations: usize, l2: f64) -> Self {
        LogisticRegression {
            learning_rate,
            iterations,
            l2,
            ..Default::default()
        }
    }

    fn standardize(&self, x: &RowMajorMatrix<f64>) -> Vec<f64> {
        let mut out = Vec::with_capacity(x.data.len());
        for i in 0..x.rows {
            for (j, v) in x.row(i).iter().enumerate() {
                out.push(if v.is_nan() { 0.0 } else { (v - self.means[j]) / self.scales[j] });
            }
        }
        out
    }

    fn column_moments(x: &RowMajorMatrix<f64>) -> (Vec<f64>, Vec<f64>) {
        let mut means = Vec::with_capacity(x.cols);
        let mut scales = Vec::with_capacity(x.cols);
        for j in 0..x.cols {
            let values: Vec<f64> = (0..x.rows).map(|i| *x.get(i, j)).filter(|v| !v.is_nan()).collect();
            if values.is_empty() {
                means.push(0.0);
                scales.push(1.0);
                continue;
            }
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            means.push(mean);
            scales.push(if var > 0.0 { var.sqrt() } else { 1.0 });
        }
        (means, scales)
    }

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &RowMajorMatrix<f64>) -> Result<Vec<f64>, SensorError> {
        if x.cols != self.weights.len() {
            return Err(SensorError::DataAccess(format!(
                "feature matrix has {} columns but the model was fit on {}",
                x.cols,
                self.weights.len()
            )));
        }
        let z = self.standardize(x);
        Ok((0..x.rows)
            .map(|i| {
                let row = &z[i * x.cols..(i + 1) * x.cols];
                let margin = self.bias + row.iter().zip(&self.weights).map(|(v, w)| v * w).sum::<f64>();
                sigmoid(margin)
            })
            .collect())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &RowMajorMatrix<f64>, y: &[f64]) -> Result<(), SensorError> {
        if x.rows == 0 || x.rows != y.len() {
            return Err(SensorError::DataAccess(format!(
                "feature matrix has {} rows but {} targets were given",
                x.rows,
                y.len()
            )));
        }
        if let Some(bad) = y.iter().find(|v| **v != 0.0 && **v != 1.0) {
            return Err(SensorError::DataAccess(format!("target value {} is not a binary label", bad)));
        }

        let (means, scales) = Self::column_moments(x);
        self.means = means;
        self.scales = scales;
        let z = self.standardize(x);
        let n = x.rows as f64;

        let positive = (y.iter().sum::<f64>() / n).clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS);
        self.bias = (positive / (1.0 - positive)).ln();
        self.weights = vec![0.0; x.cols];

        for _ in 0..self.iterations {
            let mut grad_w = vec![0.0; x.cols];
            let mut grad_b = 0.0;
            for (i, y_) in y.iter().enumerate() {
                let row = &z[i * x.cols..(i + 1) * x.cols];
                let margin = self.bias + row.iter().zip(&self.weights).map(|(v, w)| v * w).sum::<f64>();
                let g = sigmoid(margin) - y_;
                for (gw, v) in grad_w.iter_mut().zip(row) {
                    *gw += g * v;
                }
                grad_b += g;
            }
            for (w, gw) in self.weights.iter_mut().zip(&grad_w) {
                *w -= self.learning_rate * (gw / n + self.l2 * *w);
            }
            self.bias -= self.learning_rate * grad_b / n;
        }
        info!("Fitted logistic regression on {} rows and {} features", x.rows, x.cols);
        Ok(())
    }

    fn predict(&self, x: &RowMajorMatrix<f64>) -> Result<Vec<f64>, SensorError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| if p >= 0.5 { 1.0 } else { 0.0 })
            .collect())
    }
}
