//! Serialized model artifacts.
//!
//! Artifacts are JSON documents exported by the training pipeline. Two
//! layouts are supported:
//!
//! - `linear`: a weight vector and bias, scored as a dot product
//! - `gradient_boosted_trees`: a forest of binary decision trees summed
//!   with a base score
//!
//! Either layout may name a link function; `logit` squashes the raw sum
//! through the standard logistic curve, `identity` passes it through.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CovariateSet, ModelError, ScoringModel};

/// Link applied to the raw model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkFunction {
    /// Raw scores pass through unchanged.
    #[default]
    Identity,
    /// Scores are squashed through the logistic function.
    Logit,
}

impl LinkFunction {
    fn apply(self, raw: f64) -> f64 {
        match self {
            LinkFunction::Identity => raw,
            LinkFunction::Logit => 1.0 / (1.0 + (-raw).exp()),
        }
    }
}

/// One node of a decision tree, index-linked within its tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Route a feature vector from the root to a leaf.
    ///
    /// Any walk longer than the node count means the index links form a
    /// cycle, which load-time validation treats as a broken artifact.
    fn evaluate(&self, features: &[f64]) -> Result<f64, ModelError> {
        let mut index = 0usize;
        for _ in 0..self.nodes.len() {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(*feature).copied().ok_or_else(|| {
                        ModelError::Invalid {
                            reason: format!(
                                "split references feature {} but only {} were supplied",
                                feature,
                                features.len()
                            ),
                        }
                    })?;
                    index = if x < *threshold { *left } else { *right };
                }
            }
        }
        Err(ModelError::Invalid {
            reason: "tree walk exceeded the node count".to_string(),
        })
    }

    fn validate(&self, tree_index: usize, feature_width: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid {
                reason: format!("tree {} has no nodes", tree_index),
            });
        }
        for (node_index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= feature_width {
                    return Err(ModelError::Invalid {
                        reason: format!(
                            "tree {} node {} splits on feature {} of {}",
                            tree_index, node_index, feature, feature_width
                        ),
                    });
                }
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(ModelError::Invalid {
                        reason: format!(
                            "tree {} node {} links outside the {} node table",
                            tree_index,
                            node_index,
                            self.nodes.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Supported artifact layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ArtifactKind {
    Linear {
        weights: Vec<f64>,
        bias: f64,
    },
    GradientBoostedTrees {
        trees: Vec<Tree>,
        #[serde(default)]
        base_score: f64,
    },
}

/// A scoring model deserialized from a JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactModel {
    #[serde(flatten)]
    kind: ArtifactKind,
    /// Input cardinality recorded at export time.
    #[serde(default)]
    n_features: Option<usize>,
    #[serde(default)]
    link: LinkFunction,
}

impl ArtifactModel {
    /// Load and validate an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] for a missing file,
    /// [`ModelError::Parse`] for malformed JSON, and
    /// [`ModelError::Invalid`] when the artifact's internal links are
    /// broken (dangling node indices, out-of-range feature indices).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(ModelError::NotFound { path });
        }

        let file = File::open(&path).map_err(|e| ModelError::Io {
            path: path.clone(),
            source: e,
        })?;
        let model: ArtifactModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ModelError::Parse {
                path: path.clone(),
                source: e,
            })?;

        model.validate()?;

        debug!(
            path = %path.display(),
            kind = model.kind_name(),
            n_features = ?model.n_features,
            "loaded model artifact"
        );
        Ok(model)
    }

    /// Parse and validate an artifact from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: ArtifactModel =
            serde_json::from_str(json).map_err(|e| ModelError::Invalid {
                reason: e.to_string(),
            })?;
        model.validate()?;
        Ok(model)
    }

    fn kind_name(&self) -> &'static str {
        match &self.kind {
            ArtifactKind::Linear { .. } => "linear",
            ArtifactKind::GradientBoostedTrees { .. } => "gradient_boosted_trees",
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        match &self.kind {
            ArtifactKind::Linear { weights, .. } => {
                if weights.is_empty() {
                    return Err(ModelError::Invalid {
                        reason: "linear model has no weights".to_string(),
                    });
                }
                if let Some(declared) = self.n_features {
                    if declared != weights.len() {
                        return Err(ModelError::Invalid {
                            reason: format!(
                                "artifact declares {} features but carries {} weights",
                                declared,
                                weights.len()
                            ),
                        });
                    }
                }
            }
            ArtifactKind::GradientBoostedTrees { trees, .. } => {
                if trees.is_empty() {
                    return Err(ModelError::Invalid {
                        reason: "forest has no trees".to_string(),
                    });
                }
                let width = self.n_features.unwrap_or(CovariateSet::WIDTH);
                for (index, tree) in trees.iter().enumerate() {
                    tree.validate(index, width)?;
                }
            }
        }
        Ok(())
    }
}

impl ScoringModel for ArtifactModel {
    fn expected_input_size(&self) -> Option<usize> {
        match &self.kind {
            // A linear model's width is its weight vector, declared or not
            ArtifactKind::Linear { weights, .. } => Some(weights.len()),
            ArtifactKind::GradientBoostedTrees { .. } => self.n_features,
        }
    }

    fn predict(&self, covariates: &CovariateSet) -> Result<f64, ModelError> {
        let features = covariates.as_array();

        let raw = match &self.kind {
            ArtifactKind::Linear { weights, bias } => {
                weights
                    .iter()
                    .zip(features.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + bias
            }
            ArtifactKind::GradientBoostedTrees { trees, base_score } => {
                let mut sum = *base_score;
                for tree in trees {
                    sum += tree.evaluate(&features)?;
                }
                sum
            }
        };

        let score = self.link.apply(raw);
        if !score.is_finite() {
            return Err(ModelError::NonFiniteScore);
        }
        Ok(score)
    }
}
