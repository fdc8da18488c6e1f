use serde::Deserialize;
use thiserror::Error;

use crate::classifier::{ModelError, SparseVector};

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("non-finite score for class {class}")]
    NonFiniteScore { class: usize },

    #[error("class index {index} out of range for {classes} classes")]
    ClassIndex { index: usize, classes: usize },

    #[error("feature column {column} out of range for {features} features")]
    FeatureColumn { column: usize, features: usize },
}

/// On-disk form of the fitted classifier: one coefficient row and one
/// intercept per class.
#[derive(Debug, Deserialize)]
pub struct ClassifierArtifact {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug)]
pub struct LinearClassifier {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self, ModelError> {
        if artifact.coef.is_empty() {
            return Err(ModelError::Shape("classifier has no classes".to_string()));
        }
        if artifact.coef.len() != artifact.intercept.len() {
            return Err(ModelError::Shape(format!(
                "{} coefficient rows but {} intercepts",
                artifact.coef.len(),
                artifact.intercept.len()
            )));
        }

        let features = artifact.coef[0].len();
        if let Some(row) = artifact.coef.iter().find(|row| row.len() != features) {
            return Err(ModelError::Shape(format!(
                "ragged coefficient rows ({} vs {})",
                row.len(),
                features
            )));
        }

        Ok(Self {
            coef: artifact.coef,
            intercept: artifact.intercept,
        })
    }

    pub fn classes(&self) -> usize {
        self.coef.len()
    }

    pub fn features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    /// Scores every class and returns the index of the best one. Equal
    /// scores break toward the lowest index, so predictions are stable.
    pub fn predict(&self, vector: &SparseVector) -> Result<usize, ClassifyError> {
        let features = self.features();
        if let Some(&(column, _)) = vector
            .entries()
            .iter()
            .find(|&&(column, _)| column >= features)
        {
            return Err(ClassifyError::FeatureColumn { column, features });
        }

        let mut best: Option<(usize, f64)> = None;
        for (class, (row, intercept)) in self.coef.iter().zip(&self.intercept).enumerate() {
            let mut score = *intercept;
            for &(column, weight) in vector.entries() {
                score += row[column] * weight;
            }
            if !score.is_finite() {
                return Err(ClassifyError::NonFiniteScore { class });
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((class, score));
            }
        }

        // from_artifact guarantees at least one class.
        best.map(|(class, _)| class)
            .ok_or(ClassifyError::ClassIndex {
                index: 0,
                classes: 0,
            })
    }
}
