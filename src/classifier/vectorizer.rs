use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::classifier::ModelError;

// Tokens are runs of two or more word characters, the pattern the
// vectorizer was fitted with.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// On-disk form of the fitted vectorizer: term to column mapping, per-column
/// inverse document frequencies, and the n-gram range used at fit time.
#[derive(Debug, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    pub ngram_range: (usize, usize),
}

/// Sparse feature vector: `(column, weight)` pairs in ascending column
/// order, zero entries omitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn l2_norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt()
    }
}

/// Frozen TF-IDF transform. `transform` never fails: text sharing no
/// vocabulary with the fit corpus simply yields an empty vector.
#[derive(Debug)]
pub struct TfidfVectorizer {
    index: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    ngram_min: usize,
    ngram_max: usize,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ModelError> {
        let (ngram_min, ngram_max) = artifact.ngram_range;
        if ngram_min == 0 || ngram_min > ngram_max {
            return Err(ModelError::Shape(format!(
                "invalid ngram range ({ngram_min}, {ngram_max})"
            )));
        }

        let columns = artifact.idf.len();
        if artifact.vocabulary.len() != columns {
            return Err(ModelError::Shape(format!(
                "vocabulary has {} terms but idf has {} entries",
                artifact.vocabulary.len(),
                columns
            )));
        }

        let mut terms: Vec<Option<String>> = vec![None; columns];
        for (term, column) in &artifact.vocabulary {
            match terms.get_mut(*column) {
                Some(slot @ None) => *slot = Some(term.clone()),
                Some(_) => {
                    return Err(ModelError::Shape(format!(
                        "vocabulary column {column} assigned twice"
                    )));
                }
                None => {
                    return Err(ModelError::Shape(format!(
                        "vocabulary column {column} out of range for {columns} idf entries"
                    )));
                }
            }
        }
        // Lengths match and no column repeats, so every slot is filled.
        let terms = terms.into_iter().flatten().collect();

        Ok(Self {
            index: artifact.vocabulary,
            terms,
            idf: artifact.idf,
            ngram_min,
            ngram_max,
        })
    }

    /// Number of feature columns.
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Term behind a feature column.
    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    /// Counts vocabulary n-grams in `text`, weights them by IDF and
    /// L2-normalizes the result.
    pub fn transform(&self, text: &str) -> SparseVector {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_REGEX
            .find_iter(&lowered)
            .map(|token| token.as_str())
            .collect();

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for n in self.ngram_min..=self.ngram_max {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&column) = self.index.get(gram.as_str()) {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(column, count)| (column, count * self.idf[column]))
            .collect();
        entries.sort_unstable_by_key(|&(column, _)| column);

        let norm = entries
            .iter()
            .map(|&(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for entry in &mut entries {
                entry.1 /= norm;
            }
        }

        SparseVector { entries }
    }
}
