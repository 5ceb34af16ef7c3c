// src/classifier/model.rs

use crate::classifier::dataset::FEATURE_NAMES;
use crate::classifier::ClassifierError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::LogisticRegression;
use std::path::Path;

pub type Logit = LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Per-column standardisation fitted on the training rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl Scaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len().max(1) as f64;

        let means: Vec<f64> = (0..width)
            .map(|c| rows.iter().map(|r| r[c]).sum::<f64>() / n)
            .collect();

        let std_devs = (0..width)
            .map(|c| {
                let var = rows.iter().map(|r| (r[c] - means[c]).powi(2)).sum::<f64>() / n;
                // Constant columns are left centred but unscaled.
                if var > 0.0 {
                    var.sqrt()
                } else {
                    1.0
                }
            })
            .collect();

        Self { means, std_devs }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}

/// Everything classification needs, written to disk after training.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub trained_at: DateTime<Utc>,
    pub feature_names: Vec<String>,
    pub scaler: Scaler,
    pub model: Logit,
}

impl ModelArtifact {
    pub fn new(scaler: Scaler, model: Logit) -> Self {
        Self {
            trained_at: Utc::now(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            scaler,
            model,
        }
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<bool>, ClassifierError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let scaled = DenseMatrix::from_2d_vec(&self.scaler.transform_all(rows));
        let labels = self
            .model
            .predict(&scaled)
            .map_err(|e| ClassifierError::Model(e.to_string()))?;
        Ok(labels.into_iter().map(|l| l == 1).collect())
    }

    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let json =
            serde_json::to_vec(self).map_err(|e| ClassifierError::Serde(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| ClassifierError::Io(format!("{}: {e}", path.display())))
    }

    /// Loads a saved model and checks it was trained on this build's features.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ClassifierError::Io(format!("{}: {e}", path.display())))?;
        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|e| ClassifierError::Serde(e.to_string()))?;

        let expected: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        if artifact.feature_names != expected {
            return Err(ClassifierError::FeatureMismatch {
                expected,
                found: artifact.feature_names,
            });
        }
        Ok(artifact)
    }
}
