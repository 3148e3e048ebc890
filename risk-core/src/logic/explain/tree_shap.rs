//! Path-dependent TreeSHAP
//!
//! Exact Shapley values of one tree's output for one row, where "feature
//! absent" means averaging over both children weighted by training cover.
//! Runs in O(leaves · depth²) by tracking, along each root-to-leaf path, the
//! proportion of subsets of unique path features that reach the current node.

use crate::logic::model::gbdt::{Node, Tree};
use crate::logic::preprocess::TransformedFeatures;

#[derive(Debug, Clone, Copy)]
struct PathElement {
    /// `None` only for the root placeholder
    feature: Option<usize>,
    /// Fraction of cover flowing this way when the feature is absent
    zero_fraction: f64,
    /// 1.0 if the row itself flows this way, else 0.0
    one_fraction: f64,
    /// Permutation weight
    pweight: f64,
}

/// Add `tree`'s attributions for `x` into `phi`
pub(crate) fn tree_shap(tree: &Tree, x: &TransformedFeatures, phi: &mut [f64]) {
    recurse(tree, 0, x, phi, &[], 1.0, 1.0, None);
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    node_id: usize,
    x: &TransformedFeatures,
    phi: &mut [f64],
    parent_path: &[PathElement],
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    let mut path = parent_path.to_vec();
    extend_path(&mut path, zero_fraction, one_fraction, feature);

    match *tree.node(node_id) {
        Node::Leaf { value, .. } => {
            for i in 1..path.len() {
                let weight = unwound_path_sum(&path, i);
                let el = path[i];
                if let Some(f) = el.feature {
                    phi[f] += weight * (el.one_fraction - el.zero_fraction) * value;
                }
            }
        }
        Node::Split {
            feature: split,
            threshold,
            yes,
            no,
            missing,
            cover,
        } => {
            let value = x.get(split).unwrap_or(f32::NAN);
            let hot = Tree::route(value, threshold, yes, no, missing);
            let cold = if hot == yes { no } else { yes };
            let hot_zero_fraction = tree.node(hot).cover() / cover;
            let cold_zero_fraction = tree.node(cold).cover() / cover;

            // A feature seen earlier on the path is folded into this split
            let mut incoming_zero_fraction = 1.0;
            let mut incoming_one_fraction = 1.0;
            if let Some(k) = (1..path.len()).find(|&k| path[k].feature == Some(split)) {
                incoming_zero_fraction = path[k].zero_fraction;
                incoming_one_fraction = path[k].one_fraction;
                unwind_path(&mut path, k);
            }

            recurse(
                tree,
                hot,
                x,
                phi,
                &path,
                hot_zero_fraction * incoming_zero_fraction,
                incoming_one_fraction,
                Some(split),
            );
            recurse(
                tree,
                cold,
                x,
                phi,
                &path,
                cold_zero_fraction * incoming_zero_fraction,
                0.0,
                Some(split),
            );
        }
    }
}

fn extend_path(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / denom;
        path[i].pweight = zero_fraction * path[i].pweight * (depth - i) as f64 / denom;
    }
}

/// Undo the extension that added `path[index]`
///
/// Weights stay in place; only feature data shifts down before the tail is dropped.
fn unwind_path(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            next_one_portion = tmp - path[i].pweight * zero_fraction * (depth - i) as f64 / denom;
        } else {
            path[i].pweight = path[i].pweight * denom / (zero_fraction * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    path.pop();
}

/// Total permutation weight if `path[index]` were unwound
fn unwound_path_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let tmp = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero_fraction * ((depth - i) as f64 / denom);
        } else if zero_fraction != 0.0 {
            total += (path[i].pweight / zero_fraction) / ((depth - i) as f64 / denom);
        }
    }

    total
}
