use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::ModelError;

/// The taxonomy is closed: predictions can only ever be one of these eight
/// labels, and artifacts naming anything else are rejected at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Entertainment & Media")]
    EntertainmentMedia,
    #[serde(rename = "Science & Learning")]
    ScienceLearning,
    #[serde(rename = "News & Politics")]
    NewsPolitics,
    #[serde(rename = "Howto & Style")]
    HowtoStyle,
    #[serde(rename = "Sports")]
    Sports,
    #[serde(rename = "Autos & Vehicles")]
    AutosVehicles,
    #[serde(rename = "Lifestyle & Pets")]
    LifestylePets,
    #[serde(rename = "Travel & Adventures")]
    TravelAdventures,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::EntertainmentMedia,
        Category::ScienceLearning,
        Category::NewsPolitics,
        Category::HowtoStyle,
        Category::Sports,
        Category::AutosVehicles,
        Category::LifestylePets,
        Category::TravelAdventures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::EntertainmentMedia => "Entertainment & Media",
            Category::ScienceLearning => "Science & Learning",
            Category::NewsPolitics => "News & Politics",
            Category::HowtoStyle => "Howto & Style",
            Category::Sports => "Sports",
            Category::AutosVehicles => "Autos & Vehicles",
            Category::LifestylePets => "Lifestyle & Pets",
            Category::TravelAdventures => "Travel & Adventures",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact for [`LabelEncoder`]: the ordered class list the model was
/// trained against.
#[derive(Debug, Deserialize)]
pub struct LabelEncoderArtifact {
    pub classes: Vec<String>,
}

/// Maps the classifier's class indices back to categories.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<Category>,
}

impl LabelEncoder {
    pub fn from_artifact(artifact: LabelEncoderArtifact) -> Result<Self, ModelError> {
        if artifact.classes.is_empty() {
            return Err(ModelError::Shape("label encoder has no classes".to_string()));
        }

        let classes = artifact
            .classes
            .into_iter()
            .map(|label| Category::from_label(&label).ok_or(ModelError::UnknownLabel(label)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { classes })
    }

    pub fn decode(&self, index: usize) -> Option<Category> {
        self.classes.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
