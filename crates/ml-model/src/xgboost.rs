//! Gradient-boosted tree ensemble read from an XGBoost JSON model.
//!
//! Only the parts of the `save_model("*.json")` layout needed for inference
//! are read:
//!
//! ```text
//! learner.learner_model_param.{base_score, num_feature}
//! learner.objective.name
//! learner.gradient_booster.model.trees[*].{left_children, right_children,
//!                                          split_indices, split_conditions}
//! ```
//!
//! ## Algorithm
//! For each tree, start at node 0. At a split node go left when
//! `x[split_index] < split_condition`, right otherwise. A node whose left
//! child is `-1` is a leaf and its `split_conditions` entry is the leaf
//! value. The margin is the base margin plus the sum of leaf values, then
//! the objective's link function is applied.
//!
//! Feature rows never carry missing values, so `default_left` is not read.

use crate::error::{ModelError, Result};
use crate::features::{FeatureRow, NUM_FEATURES};
use crate::relevance::RelevanceModel;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// =============================================================================
// JSON layout
// =============================================================================

#[derive(Debug, Deserialize)]
struct ModelFile {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    learner_model_param: LearnerModelParam,
    objective: Objective,
    gradient_booster: GradientBooster,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    #[serde(default)]
    num_feature: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    name: String,
    #[serde(default)]
    model: Option<GbTreeModel>,
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    trees: Vec<RawTree>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<u32>,
    split_conditions: Vec<f32>,
}

// =============================================================================
// Compiled ensemble
// =============================================================================

/// Output transform implied by the training objective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Raw margin (`reg:squarederror`, `rank:*`, ...)
    Identity,
    /// Sigmoid of the margin (`binary:logistic`, `reg:logistic`)
    Logistic,
    /// Exponential of the margin (`count:poisson`, `reg:gamma`, `reg:tweedie`)
    Exp,
}

impl Link {
    fn for_objective(name: &str) -> Self {
        match name {
            "binary:logistic" | "reg:logistic" => Link::Logistic,
            "count:poisson" | "reg:gamma" | "reg:tweedie" => Link::Exp,
            _ => Link::Identity,
        }
    }

    /// `base_score` is stored in output space; move it to margin space
    fn base_margin(self, base_score: f32) -> f32 {
        match self {
            Link::Identity => base_score,
            Link::Logistic => {
                let p = base_score.clamp(1e-7, 1.0 - 1e-7);
                (p / (1.0 - p)).ln()
            }
            Link::Exp => base_score.max(f32::MIN_POSITIVE).ln(),
        }
    }

    fn apply(self, margin: f32) -> f32 {
        match self {
            Link::Identity => margin,
            Link::Logistic => 1.0 / (1.0 + (-margin).exp()),
            Link::Exp => margin.exp(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf(f32),
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Check array shapes and child links, then flatten into nodes.
    ///
    /// Children must point forward (XGBoost allocates them after their
    /// parent), which also guarantees traversal terminates.
    fn compile(tree_id: usize, raw: RawTree, num_feature: usize) -> Result<Self> {
        let len = raw.left_children.len();
        if len == 0 {
            return Err(ModelError::InvalidTree {
                tree: tree_id,
                reason: "no nodes".to_string(),
            });
        }
        if raw.right_children.len() != len
            || raw.split_indices.len() != len
            || raw.split_conditions.len() != len
        {
            return Err(ModelError::InvalidTree {
                tree: tree_id,
                reason: "node arrays have different lengths".to_string(),
            });
        }

        let mut nodes = Vec::with_capacity(len);
        for id in 0..len {
            let left = raw.left_children[id];
            if left == -1 {
                nodes.push(Node::Leaf(raw.split_conditions[id]));
                continue;
            }

            let right = raw.right_children[id];
            let child_ok = |c: i32| c > id as i32 && (c as usize) < len;
            if !child_ok(left) || !child_ok(right) {
                return Err(ModelError::InvalidTree {
                    tree: tree_id,
                    reason: format!("node {} has invalid children ({}, {})", id, left, right),
                });
            }

            let feature = raw.split_indices[id] as usize;
            if feature >= num_feature {
                return Err(ModelError::InvalidTree {
                    tree: tree_id,
                    reason: format!("node {} splits on feature {}", id, feature),
                });
            }

            nodes.push(Node::Split {
                feature,
                threshold: raw.split_conditions[id],
                left: left as usize,
                right: right as usize,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, x: &[f32; NUM_FEATURES]) -> f32 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[feature] < threshold { left } else { right };
                }
            }
        }
    }
}

/// A boosted tree ensemble that implements [`RelevanceModel`].
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<Tree>,
    base_margin: f32,
    link: Link,
    objective: String,
}

impl TreeEnsemble {
    /// Parse an XGBoost JSON model
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(json).map_err(|source| ModelError::Json {
            what: "relevance model".to_string(),
            source,
        })?;
        let learner = file.learner;

        let num_feature = match learner.learner_model_param.num_feature.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ModelError::InvalidModel(format!("num_feature {:?}", raw)))?,
            None => NUM_FEATURES,
        };
        if num_feature != NUM_FEATURES {
            return Err(ModelError::FeatureCountMismatch {
                expected: num_feature,
                found: NUM_FEATURES,
            });
        }

        let base_score = parse_base_score(&learner.learner_model_param.base_score)?;
        let link = Link::for_objective(&learner.objective.name);

        if learner.gradient_booster.name != "gbtree" {
            return Err(ModelError::InvalidModel(format!(
                "unsupported booster {}",
                learner.gradient_booster.name
            )));
        }
        let raw_trees = learner
            .gradient_booster
            .model
            .ok_or_else(|| ModelError::InvalidModel("gbtree without model".to_string()))?
            .trees;

        let trees = raw_trees
            .into_iter()
            .enumerate()
            .map(|(id, raw)| Tree::compile(id, raw, num_feature))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Compiled {} trees (objective {}, base_score {})",
            trees.len(),
            learner.objective.name,
            base_score
        );

        Ok(Self {
            trees,
            base_margin: link.base_margin(base_score),
            link,
            objective: learner.objective.name,
        })
    }

    /// Load an XGBoost JSON model from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::from_json_str(&json)?;
        info!(
            "Loaded relevance model from {:?} ({} trees, objective {})",
            path,
            model.num_trees(),
            model.objective()
        );
        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    pub fn link(&self) -> Link {
        self.link
    }

    fn predict_row(&self, row: &FeatureRow) -> f32 {
        let x = row.to_array();
        let margin = self
            .trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.leaf_value(&x));
        self.link.apply(margin)
    }
}

impl RelevanceModel for TreeEnsemble {
    fn name(&self) -> &str {
        "xgboost-tree-ensemble"
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        Ok(rows.iter().map(|row| self.predict_row(row) as f64).collect())
    }
}

/// XGBoost writes `base_score` as `"5E-1"`, newer versions as `"[5E-1]"`
fn parse_base_score(raw: &str) -> Result<f32> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    trimmed
        .trim()
        .parse::<f32>()
        .map_err(|_| ModelError::InvalidModel(format!("base_score {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One stump on Check Size (feature 5) and one on Stage (feature 1)
    fn model_json(objective: &str, base_score: &str) -> String {
        format!(
            r#"{{
            "learner": {{
                "learner_model_param": {{"base_score": "{base_score}", "num_feature": "8", "num_class": "0"}},
                "objective": {{"name": "{objective}"}},
                "gradient_booster": {{
                    "name": "gbtree",
                    "model": {{
                        "trees": [
                            {{
                                "left_children": [1, -1, -1],
                                "right_children": [2, -1, -1],
                                "split_indices": [5, 0, 0],
                                "split_conditions": [1000.0, 0.1, 0.3],
                                "default_left": [1, 0, 0]
                            }},
                            {{
                                "left_children": [1, -1, -1],
                                "right_children": [2, -1, -1],
                                "split_indices": [1, 0, 0],
                                "split_conditions": [0.5, 0.2, -0.2],
                                "default_left": [0, 0, 0]
                            }}
                        ]
                    }}
                }}
            }},
            "version": [2, 0, 3]
        }}"#
        )
    }

    fn row(stage: u32, check_size: f64) -> FeatureRow {
        FeatureRow {
            industry: 0,
            stage,
            funding_required: 0.0,
            investor_industry: 0,
            investor_stage: 0,
            check_size,
            success_rate: 0.0,
            firm: 0,
        }
    }

    #[test]
    fn test_identity_objective_sums_leaves() {
        let model = TreeEnsemble::from_json_str(&model_json("rank:pairwise", "[5E-1]")).unwrap();
        assert_eq!(model.num_trees(), 2);
        assert_eq!(model.objective(), "rank:pairwise");
        assert_eq!(model.link(), Link::Identity);

        let scores = model.predict(&[row(0, 500.0), row(1, 5000.0)]).unwrap();
        // 0.5 + 0.1 + 0.2 and 0.5 + 0.3 - 0.2
        assert!((scores[0] - 0.8).abs() < 1e-6);
        assert!((scores[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_is_strict_less_than() {
        let model = TreeEnsemble::from_json_str(&model_json("reg:squarederror", "0")).unwrap();
        let scores = model.predict(&[row(0, 1000.0)]).unwrap();
        // 1000 is not < 1000, so the right leaf (0.3) is taken
        assert!((scores[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_logistic_objective() {
        let model = TreeEnsemble::from_json_str(&model_json("binary:logistic", "5E-1")).unwrap();
        let scores = model.predict(&[row(0, 500.0)]).unwrap();
        // base margin logit(0.5) = 0, margin 0.3
        let expected = 1.0 / (1.0 + (-0.3f64).exp());
        assert!((scores[0] - expected).abs() < 1e-6);
        assert!(scores[0] > 0.0 && scores[0] < 1.0);
    }

    #[test]
    fn test_feature_count_must_match() {
        let json = model_json("rank:pairwise", "0.5")
            .replace("\"num_feature\": \"8\"", "\"num_feature\": \"9\"");
        let err = TreeEnsemble::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ModelError::FeatureCountMismatch { expected: 9, found: 8 }));
    }

    #[test]
    fn test_backward_child_link_rejected() {
        let json = model_json("rank:pairwise", "0.5").replacen(
            "\"left_children\": [1, -1, -1]",
            "\"left_children\": [0, -1, -1]",
            1,
        );
        let err = TreeEnsemble::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTree { tree: 0, .. }));
    }

    #[test]
    fn test_split_on_unknown_feature_rejected() {
        let json = model_json("rank:pairwise", "0.5").replacen(
            "\"split_indices\": [5, 0, 0]",
            "\"split_indices\": [8, 0, 0]",
            1,
        );
        assert!(TreeEnsemble::from_json_str(&json).is_err());
    }

    #[test]
    fn test_dart_booster_rejected() {
        let json = model_json("rank:pairwise", "0.5")
            .replace("\"name\": \"gbtree\"", "\"name\": \"dart\"");
        assert!(matches!(
            TreeEnsemble::from_json_str(&json),
            Err(ModelError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_parse_base_score_forms() {
        assert_eq!(parse_base_score("5E-1").unwrap(), 0.5);
        assert_eq!(parse_base_score("[5E-1]").unwrap(), 0.5);
        assert!(parse_base_score("half").is_err());
    }
}
