pub mod labels;
pub mod linear;
pub mod vectorizer;

pub use labels::{Category, LabelEncoder, LabelEncoderArtifact};
pub use linear::{ClassifierArtifact, ClassifyError, LinearClassifier};
pub use vectorizer::{SparseVector, TfidfArtifact, TfidfVectorizer};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::normalize::NormalizedText;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown category label: {0}")]
    UnknownLabel(String),

    #[error("artifact shape mismatch: {0}")]
    Shape(String),
}

/// The frozen model: vectorizer, label encoder and classifier loaded
/// together and validated against each other. Construct once, share via
/// `Arc`; classification itself is `&self` and lock-free.
#[derive(Debug)]
pub struct CategoryModel {
    vectorizer: TfidfVectorizer,
    labels: LabelEncoder,
    classifier: LinearClassifier,
}

impl CategoryModel {
    /// Loads the three artifact files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let vectorizer = TfidfVectorizer::from_artifact(read_json(dir.join(VECTORIZER_FILE))?)?;
        let labels = LabelEncoder::from_artifact(read_json(dir.join(LABEL_ENCODER_FILE))?)?;
        let classifier = LinearClassifier::from_artifact(read_json(dir.join(CLASSIFIER_FILE))?)?;

        let model = Self::from_parts(vectorizer, labels, classifier)?;
        info!(
            dir = %dir.display(),
            classes = model.labels.len(),
            features = model.vectorizer.vocabulary_size(),
            "loaded category model"
        );
        Ok(model)
    }

    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        labels: LabelEncoder,
        classifier: LinearClassifier,
    ) -> Result<Self, ModelError> {
        if labels.len() != classifier.classes() {
            return Err(ModelError::Shape(format!(
                "{} labels but {} classifier classes",
                labels.len(),
                classifier.classes()
            )));
        }
        if vectorizer.vocabulary_size() != classifier.features() {
            return Err(ModelError::Shape(format!(
                "{} vocabulary terms but {} classifier features",
                vectorizer.vocabulary_size(),
                classifier.features()
            )));
        }

        Ok(Self {
            vectorizer,
            labels,
            classifier,
        })
    }

    pub fn classify(&self, text: &NormalizedText) -> Result<Category, ClassifyError> {
        let vector = self.vectorizer.transform(text.as_str());
        let index = self.classifier.predict(&vector)?;
        self.labels
            .decode(index)
            .ok_or(ClassifyError::ClassIndex {
                index,
                classes: self.labels.len(),
            })
    }

    /// The shared vectorizer, also used for tag extraction.
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, ModelError> {
    let contents = fs::read_to_string(&path).map_err(|source| ModelError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ModelError::Parse { path, source })
}
