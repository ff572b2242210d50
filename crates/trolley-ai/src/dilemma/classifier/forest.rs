use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Classifier, ClassifierError, ModelLoadError};
use crate::dilemma::domain::TrackId;
use crate::dilemma::features::FeatureVector;

/// Decision forest exported from the training pipeline as JSON.
///
/// Each tree routes the feature vector with `value <= threshold` going left; the forest
/// returns the majority vote, with ties resolved to track 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub feature_count: usize,
    pub trees: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        track: TrackId,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn evaluate(&self, values: &[u32]) -> TrackId {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { track } => return *track,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = values.get(*feature).copied().unwrap_or_default();
                    node = if f64::from(value) <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}

impl ForestModel {
    pub fn from_path(path: &Path) -> Result<Self, ModelLoadError> {
        let file = std::fs::File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.trees.is_empty() {
            return Err(ModelLoadError::Invalid("forest contains no trees".to_string()));
        }

        for (index, tree) in self.trees.iter().enumerate() {
            if let Some(feature) = tree.max_feature() {
                if feature >= self.feature_count {
                    return Err(ModelLoadError::Invalid(format!(
                        "tree {index} splits on feature {feature} but the model declares {} features",
                        self.feature_count
                    )));
                }
            }
        }

        Ok(())
    }

    fn vote(&self, values: &[u32]) -> TrackId {
        let votes_for_two = self
            .trees
            .iter()
            .filter(|tree| tree.evaluate(values) == TrackId::Two)
            .count();

        if votes_for_two * 2 > self.trees.len() {
            TrackId::Two
        } else {
            TrackId::One
        }
    }
}

impl Classifier for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Result<TrackId, ClassifierError> {
        if features.len() != self.feature_count {
            return Err(ClassifierError::IncompatibleInput {
                expected: self.feature_count,
                actual: features.len(),
            });
        }
        Ok(self.vote(features.values()))
    }
}
