//! Gradient-boosted tree ensemble
//!
//! Reads the XGBoost JSON dump format (`dump_model(with_stats=True)`), keeps
//! node covers for attribution, and scores binary logistic models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::inference::Classifier;
use crate::error::{ArtifactError, InferenceError, SchemaError};
use crate::logic::preprocess::TransformedFeatures;

// ============================================================================
// DUMP FORMAT
// ============================================================================

/// Learning objective; only binary logistic models produce a default probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
}

/// On-disk form of the ensemble (`model.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleDump {
    pub objective: Objective,
    /// Global bias in probability space
    pub base_score: f64,
    pub trees: Vec<DumpNode>,
}

/// One node of an XGBoost JSON dump
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DumpNode {
    Split {
        nodeid: usize,
        split: String,
        split_condition: f32,
        yes: usize,
        no: usize,
        missing: usize,
        cover: f64,
        children: Vec<DumpNode>,
    },
    Leaf {
        nodeid: usize,
        leaf: f64,
        cover: f64,
    },
}

impl DumpNode {
    fn nodeid(&self) -> usize {
        match self {
            DumpNode::Split { nodeid, .. } | DumpNode::Leaf { nodeid, .. } => *nodeid,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
        cover: f64,
    },
    Leaf {
        value: f64,
        cover: f64,
    },
}

impl Node {
    pub fn cover(&self) -> f64 {
        match self {
            Node::Split { cover, .. } | Node::Leaf { cover, .. } => *cover,
        }
    }
}

/// Flattened regression tree
///
/// Index 0 is the root and child indices are dense, independent of the
/// dump's `nodeid`s.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// Child a value follows at a split: `missing` for NaN, `yes` when below threshold
    pub fn route(value: f32, threshold: f32, yes: usize, no: usize, missing: usize) -> usize {
        if value.is_nan() {
            missing
        } else if value < threshold {
            yes
        } else {
            no
        }
    }

    /// Leaf value reached by `x`
    pub fn predict(&self, x: &TransformedFeatures) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value, .. } => return value,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                    ..
                } => {
                    let value = x.get(feature).unwrap_or(f32::NAN);
                    id = Self::route(value, threshold, yes, no, missing);
                }
            }
        }
    }

    /// Cover-weighted mean leaf value
    ///
    /// Recurses with each split's own child ratios, the same weights the
    /// attribution engine uses, so `base + sum(attributions)` stays exact even
    /// when a dump's covers were rounded.
    pub fn expected_value(&self) -> f64 {
        self.expected_from(0)
    }

    fn expected_from(&self, id: usize) -> f64 {
        match self.nodes[id] {
            Node::Leaf { value, .. } => value,
            Node::Split { yes, no, cover, .. } => {
                (self.expected_from(yes) * self.nodes[yes].cover()
                    + self.expected_from(no) * self.nodes[no].cover())
                    / cover
            }
        }
    }

    /// Flatten one dumped tree into dense indices, root first
    ///
    /// Dump ids may have gaps (pruned nodes) and a child id may be smaller
    /// than its parent's (XGBoost reuses freed ids). Structure is checked by
    /// walking from the root: every referenced child must exist, no node may
    /// be reached twice, and every dumped node must be reachable.
    fn from_dump(
        index: usize,
        root: DumpNode,
        feature_names: &[String],
    ) -> Result<Self, ArtifactError> {
        let invalid = |msg: String| ArtifactError::InvalidModel(format!("tree {}: {}", index, msg));

        let root_id = root.nodeid();
        let mut by_id: HashMap<usize, Node> = HashMap::new();
        let mut stack = vec![root];

        while let Some(dump) = stack.pop() {
            let id = dump.nodeid();
            let node = match dump {
                DumpNode::Leaf { leaf, cover, .. } => Node::Leaf { value: leaf, cover },
                DumpNode::Split {
                    split,
                    split_condition,
                    yes,
                    no,
                    missing,
                    cover,
                    children,
                    ..
                } => {
                    if yes == no || (missing != yes && missing != no) {
                        return Err(invalid(format!(
                            "node {} has invalid children ({}, {}, missing {})",
                            id, yes, no, missing
                        )));
                    }
                    stack.extend(children);
                    Node::Split {
                        feature: resolve_feature(&split, feature_names)?,
                        threshold: split_condition,
                        yes,
                        no,
                        missing,
                        cover,
                    }
                }
            };

            if !(node.cover() > 0.0 && node.cover().is_finite()) {
                return Err(invalid(format!("node {} has non-positive cover", id)));
            }
            if by_id.insert(id, node).is_some() {
                return Err(invalid(format!("repeats node id {}", id)));
            }
        }

        // Breadth-first from the root; position in `order` is the dense index
        let mut dense: HashMap<usize, usize> = HashMap::with_capacity(by_id.len());
        dense.insert(root_id, 0);
        let mut order = vec![root_id];
        let mut next = 0;
        while next < order.len() {
            let id = order[next];
            if let Some(Node::Split { yes, no, .. }) = by_id.get(&id).copied() {
                for child in [yes, no] {
                    if !by_id.contains_key(&child) {
                        return Err(invalid(format!(
                            "node {} references missing node {}",
                            id, child
                        )));
                    }
                    if dense.insert(child, order.len()).is_some() {
                        return Err(invalid(format!("node {} is reached more than once", child)));
                    }
                    order.push(child);
                }
            }
            next += 1;
        }

        if order.len() != by_id.len() {
            let mut orphans: Vec<usize> = by_id
                .keys()
                .filter(|id| !dense.contains_key(id))
                .copied()
                .collect();
            orphans.sort_unstable();
            return Err(invalid(format!("nodes {:?} are not reachable from the root", orphans)));
        }

        let nodes = order
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .map(|node| match node {
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                    cover,
                } => Node::Split {
                    feature,
                    threshold,
                    yes: dense[&yes],
                    no: dense[&no],
                    missing: dense[&missing],
                    cover,
                },
                leaf => leaf,
            })
            .collect();

        let tree = Self { nodes };
        tree.warn_on_inconsistent_cover(index);
        Ok(tree)
    }

    /// Attributions only add up when each split's cover equals its children's sum
    fn warn_on_inconsistent_cover(&self, index: usize) {
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Split { yes, no, cover, .. } = node {
                let children = self.nodes[*yes].cover() + self.nodes[*no].cover();
                if (children - cover).abs() > 1e-3 * cover.max(1.0) {
                    log::warn!(
                        "Tree {} node {}: cover {} != children cover {}",
                        index,
                        id,
                        cover,
                        children
                    );
                }
            }
        }
    }
}

/// `f<index>` or a display name
fn resolve_feature(split: &str, feature_names: &[String]) -> Result<usize, SchemaError> {
    if let Some(index) = feature_names.iter().position(|name| name == split) {
        return Ok(index);
    }
    let index: usize = split
        .strip_prefix('f')
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| SchemaError::UnknownFeature(split.to_string()))?;
    if index >= feature_names.len() {
        return Err(SchemaError::FeatureIndexOutOfRange {
            index,
            width: feature_names.len(),
        });
    }
    Ok(index)
}

// ============================================================================
// ENSEMBLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    objective: Objective,
    base_margin: f64,
    trees: Vec<Tree>,
    n_features: usize,
}

impl TreeEnsemble {
    /// Flatten a dump, resolving split features against `feature_names`
    pub fn from_dump(dump: EnsembleDump, feature_names: &[String]) -> Result<Self, ArtifactError> {
        if !(dump.base_score > 0.0 && dump.base_score < 1.0) {
            return Err(ArtifactError::InvalidModel(format!(
                "base_score {} must lie strictly between 0 and 1",
                dump.base_score
            )));
        }

        let trees = dump
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, root)| Tree::from_dump(i, root, feature_names))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Tree ensemble: {} trees over {} features",
            trees.len(),
            feature_names.len()
        );

        Ok(Self {
            objective: dump.objective,
            base_margin: logit(dump.base_score),
            trees,
            n_features: feature_names.len(),
        })
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn base_margin(&self) -> f64 {
        self.base_margin
    }

    fn check_width(&self, x: &TransformedFeatures) -> Result<(), InferenceError> {
        if x.len() != self.n_features {
            return Err(InferenceError::WidthMismatch {
                expected: self.n_features,
                got: x.len(),
            });
        }
        Ok(())
    }

    /// Raw log-odds output
    pub fn predict_margin(&self, x: &TransformedFeatures) -> Result<f64, InferenceError> {
        self.check_width(x)?;
        Ok(self.base_margin + self.trees.iter().map(|t| t.predict(x)).sum::<f64>())
    }

    /// Expected log-odds over the training distribution (cover-weighted)
    pub fn expected_margin(&self) -> f64 {
        self.base_margin + self.trees.iter().map(Tree::expected_value).sum::<f64>()
    }
}

impl Classifier for TreeEnsemble {
    fn kind(&self) -> &str {
        "gbdt"
    }

    fn predict_proba(&self, features: &TransformedFeatures) -> Result<Vec<f64>, InferenceError> {
        let p = sigmoid(self.predict_margin(features)?);
        Ok(vec![1.0 - p, p])
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn as_tree_ensemble(&self) -> Option<&TreeEnsemble> {
        Some(self)
    }
}

pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}
