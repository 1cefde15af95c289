//! Binary decision tree classifier
//!
//! Gini splits over weighted class totals, grown depth-first or best-first
//! (when `max_leaf_nodes` is set), with minimal cost-complexity pruning.
//! Nodes live in an arena; a child always has a larger index than its parent.

use crate::error::{CancelError, Result};
use crate::preprocessing::DesignMatrix;
use super::config::{ClassWeight, TreeConfig};
use super::models::{binarize, Classifier};
use crate::threshold::DEFAULT_THRESHOLD;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::debug;

/// Values closer than this are treated as equal when placing thresholds
const FEATURE_THRESHOLD: f64 = 1e-7;

/// Node payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf,
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Arena node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub parent: Option<usize>,
    pub depth: usize,
    pub n_samples: usize,
    /// Weighted class totals `[negative, positive]`
    pub value: [f64; 2],
    pub impurity: f64,
}

impl TreeNode {
    pub fn weight(&self) -> f64 {
        self.value[0] + self.value[1]
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Weighted positive-class share
    pub fn proba(&self) -> f64 {
        let w = self.weight();
        if w > 0.0 {
            self.value[1] / w
        } else {
            0.0
        }
    }

    /// Majority class, ties to the negative class
    pub fn class(&self) -> u8 {
        if self.value[1] > self.value[0] {
            1
        } else {
            0
        }
    }
}

/// Weakest-link pruning sequence of a fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruningPath {
    /// Effective alphas, starting at 0 and ending at the alpha that prunes to the root
    pub ccp_alphas: Vec<f64>,
    /// Total weighted leaf impurity of the subtree at each alpha
    pub impurities: Vec<f64>,
}

/// Fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub config: TreeConfig,
    features: Vec<String>,
    nodes: Vec<TreeNode>,
    importances: Array1<f64>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    improvement: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

struct Pending {
    node: usize,
    indices: Vec<usize>,
}

struct Grower<'a> {
    config: &'a TreeConfig,
    x: &'a Array2<f64>,
    labels: Vec<usize>,
    weights: Vec<f64>,
    root_weight: f64,
    nodes: Vec<TreeNode>,
}

impl<'a> Grower<'a> {
    fn class_totals(&self, indices: &[usize]) -> [f64; 2] {
        let mut totals = [0.0; 2];
        for &i in indices {
            totals[self.labels[i]] += self.weights[i];
        }
        totals
    }

    fn push_node(&mut self, indices: &[usize], parent: Option<usize>, depth: usize) -> usize {
        let value = self.class_totals(indices);
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            kind: NodeKind::Leaf,
            parent,
            depth,
            n_samples: indices.len(),
            value,
            impurity: gini(value),
        });
        id
    }

    /// Best admissible split of a node, or `None` when it must stay a leaf
    fn find_split(&self, node: usize, indices: &[usize]) -> Option<SplitCandidate> {
        let current = &self.nodes[node];
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);

        if n < self.config.min_samples_split
            || n < 2 * min_leaf
            || self.config.max_depth.map_or(false, |d| current.depth >= d)
            || current.impurity <= f64::EPSILON
        {
            return None;
        }

        let totals = current.value;
        let n_features = self.x.ncols();

        // Each feature independently finds its lowest weighted child impurity
        let per_feature: Vec<Option<(f64, f64)>> = (0..n_features)
            .into_par_iter()
            .map(|feature| {
                let mut order: Vec<(f64, usize)> =
                    indices.iter().map(|&i| (self.x[[i, feature]], i)).collect();
                order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                let mut left = [0.0; 2];
                let mut best: Option<(f64, f64)> = None;
                for pos in 0..n - 1 {
                    let (v, i) = order[pos];
                    left[self.labels[i]] += self.weights[i];

                    let next = order[pos + 1].0;
                    if next <= v + FEATURE_THRESHOLD {
                        continue;
                    }
                    let n_left = pos + 1;
                    if n_left < min_leaf || n - n_left < min_leaf {
                        continue;
                    }

                    let right = [totals[0] - left[0], totals[1] - left[1]];
                    let cost = weighted_gini(left) + weighted_gini(right);
                    if best.map_or(true, |(c, _)| cost < c) {
                        let mut threshold = v / 2.0 + next / 2.0;
                        if threshold == next || !threshold.is_finite() {
                            threshold = v;
                        }
                        best = Some((cost, threshold));
                    }
                }
                best
            })
            .collect();

        let mut chosen: Option<(usize, f64, f64)> = None;
        for (feature, result) in per_feature.into_iter().enumerate() {
            if let Some((cost, threshold)) = result {
                if chosen.map_or(true, |(_, c, _)| cost < c) {
                    chosen = Some((feature, cost, threshold));
                }
            }
        }
        let (feature, cost, threshold) = chosen?;

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.x[[i, feature]] <= threshold);

        let improvement = (current.weight() * current.impurity - cost) / self.root_weight;
        Some(SplitCandidate {
            feature,
            threshold,
            improvement,
            left,
            right,
        })
    }

    fn apply_split(&mut self, node: usize, split: SplitCandidate) -> (Pending, Pending) {
        let depth = self.nodes[node].depth + 1;
        let left = self.push_node(&split.left, Some(node), depth);
        let right = self.push_node(&split.right, Some(node), depth);
        self.nodes[node].kind = NodeKind::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        (
            Pending { node: left, indices: split.left },
            Pending { node: right, indices: split.right },
        )
    }

    fn grow_depth_first(&mut self, indices: Vec<usize>) {
        let root = self.push_node(&indices, None, 0);
        let mut stack = vec![Pending { node: root, indices }];

        while let Some(pending) = stack.pop() {
            if let Some(split) = self.find_split(pending.node, &pending.indices) {
                let (left, right) = self.apply_split(pending.node, split);
                stack.push(right);
                stack.push(left);
            }
        }
    }

    fn grow_best_first(&mut self, indices: Vec<usize>, max_leaf_nodes: usize) {
        let root = self.push_node(&indices, None, 0);
        let mut frontier: Vec<(Pending, SplitCandidate)> = Vec::new();
        if let Some(split) = self.find_split(root, &indices) {
            frontier.push((Pending { node: root, indices }, split));
        }

        let mut splits_left = max_leaf_nodes.saturating_sub(1);
        while splits_left > 0 && !frontier.is_empty() {
            let mut best = 0;
            for (i, (_, split)) in frontier.iter().enumerate() {
                if split.improvement > frontier[best].1.improvement {
                    best = i;
                }
            }
            let (pending, split) = frontier.remove(best);
            let (left, right) = self.apply_split(pending.node, split);
            splits_left -= 1;

            for child in [left, right] {
                if let Some(split) = self.find_split(child.node, &child.indices) {
                    frontier.push((child, split));
                }
            }
        }
    }
}

impl DecisionTree {
    /// Grow a tree on a named design matrix and a 0/1 target
    pub fn fit(config: &TreeConfig, x: &DesignMatrix, y: &Array1<f64>) -> Result<Self> {
        let (n_samples, n_features) = x.data.dim();
        if n_samples != y.len() {
            return Err(CancelError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 || n_features == 0 {
            return Err(CancelError::ValidationError(
                "cannot fit a tree on an empty matrix".to_string(),
            ));
        }
        if config.min_samples_split < 2 {
            return Err(CancelError::InvalidParameter {
                name: "min_samples_split".to_string(),
                value: config.min_samples_split.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        if config.max_leaf_nodes.map_or(false, |m| m < 2) {
            return Err(CancelError::InvalidParameter {
                name: "max_leaf_nodes".to_string(),
                value: format!("{:?}", config.max_leaf_nodes),
                reason: "must be at least 2".to_string(),
            });
        }

        let labels: Vec<usize> = y
            .iter()
            .map(|&v| {
                if v == 1.0 {
                    Ok(1)
                } else if v == 0.0 {
                    Ok(0)
                } else {
                    Err(CancelError::DataError(format!("tree target must be 0/1, found {}", v)))
                }
            })
            .collect::<Result<_>>()?;

        let weights = sample_weights(&labels, config.class_weight);
        let root_weight: f64 = weights.iter().sum();

        let mut grower = Grower {
            config,
            x: &x.data,
            labels,
            weights,
            root_weight,
            nodes: Vec::new(),
        };
        let indices: Vec<usize> = (0..n_samples).collect();
        match config.max_leaf_nodes {
            Some(max_leaf_nodes) => grower.grow_best_first(indices, max_leaf_nodes),
            None => grower.grow_depth_first(indices),
        }

        let tree = Self::from_nodes(*config, x.columns.clone(), grower.nodes);
        debug!(
            nodes = tree.node_count(),
            depth = tree.depth(),
            leaves = tree.n_leaves(),
            "Grew decision tree"
        );

        if config.ccp_alpha > 0.0 {
            return Ok(tree.prune(config.ccp_alpha));
        }
        Ok(tree)
    }

    fn from_nodes(config: TreeConfig, features: Vec<String>, nodes: Vec<TreeNode>) -> Self {
        let importances = compute_importances(&nodes, features.len());
        Self {
            config,
            features,
            nodes,
            importances,
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Longest root-to-leaf path in edges; a lone root has depth 0
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Feature importances paired with their names, largest first
    pub fn ranked_importances(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .features
            .iter()
            .cloned()
            .zip(self.importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    fn leaf_for(&self, row: ndarray::ArrayView1<f64>) -> &TreeNode {
        let mut id = 0;
        loop {
            match self.nodes[id].kind {
                NodeKind::Leaf => return &self.nodes[id],
                NodeKind::Split { feature, threshold, left, right } => {
                    id = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Weakest-link effective alphas and the subtree impurity after each prune
    pub fn cost_complexity_path(&self) -> PruningPath {
        let mut path = PruningPath {
            ccp_alphas: Vec::new(),
            impurities: Vec::new(),
        };
        self.weakest_link(|alpha, impurity| {
            path.ccp_alphas.push(alpha);
            path.impurities.push(impurity);
            true
        });
        path
    }

    /// Minimal cost-complexity pruning: collapse every branch whose effective
    /// alpha does not exceed `alpha`
    pub fn prune(&self, alpha: f64) -> Self {
        if alpha <= 0.0 {
            return self.clone();
        }
        // Relative slack so a path alpha reproduces its own subtree despite round-off
        let limit = alpha * (1.0 + 1e-10);
        let collapsed = self.weakest_link(|effective, _| effective <= limit);
        let mut config = self.config;
        config.ccp_alpha = alpha;
        Self::from_nodes(config, self.features.clone(), compact(&self.nodes, &collapsed))
    }

    /// Repeatedly collapse the weakest branch while `keep_going` accepts its alpha.
    /// The callback first sees `(0, full-tree impurity)`. Returns the collapsed nodes.
    fn weakest_link(&self, mut keep_going: impl FnMut(f64, f64) -> bool) -> Vec<bool> {
        let n = self.nodes.len();
        let mut collapsed = vec![false; n];
        if n == 0 {
            return collapsed;
        }

        let root_weight = self.nodes[0].weight();
        let r_node: Vec<f64> = self
            .nodes
            .iter()
            .map(|node| node.weight() / root_weight * node.impurity)
            .collect();

        let mut n_leaves = vec![0usize; n];
        let mut r_branch = vec![0.0; n];
        for i in (0..n).rev() {
            match self.nodes[i].kind {
                NodeKind::Leaf => {
                    n_leaves[i] = 1;
                    r_branch[i] = r_node[i];
                }
                NodeKind::Split { left, right, .. } => {
                    n_leaves[i] = n_leaves[left] + n_leaves[right];
                    r_branch[i] = r_branch[left] + r_branch[right];
                }
            }
        }

        let mut in_subtree = vec![true; n];
        let mut candidate: Vec<bool> = self.nodes.iter().map(|node| !node.is_leaf()).collect();

        if !keep_going(0.0, r_branch[0]) {
            return collapsed;
        }

        while candidate[0] {
            let mut effective = f64::INFINITY;
            let mut weakest = 0;
            for i in 0..n {
                if !in_subtree[i] || !candidate[i] {
                    continue;
                }
                let alpha = (r_node[i] - r_branch[i]) / (n_leaves[i] - 1) as f64;
                if alpha < effective {
                    effective = alpha;
                    weakest = i;
                }
            }

            if !keep_going(effective, r_node[weakest] + (r_branch[0] - r_branch[weakest])) {
                break;
            }

            // Collapse the weakest branch into a leaf
            let mut stack = match self.nodes[weakest].kind {
                NodeKind::Split { left, right, .. } => vec![left, right],
                NodeKind::Leaf => Vec::new(),
            };
            while let Some(id) = stack.pop() {
                in_subtree[id] = false;
                candidate[id] = false;
                if let NodeKind::Split { left, right, .. } = self.nodes[id].kind {
                    stack.push(left);
                    stack.push(right);
                }
            }
            candidate[weakest] = false;
            collapsed[weakest] = true;

            let removed_leaves = n_leaves[weakest] - 1;
            let delta = r_node[weakest] - r_branch[weakest];
            n_leaves[weakest] = 1;
            r_branch[weakest] = r_node[weakest];

            let mut ancestor = self.nodes[weakest].parent;
            while let Some(a) = ancestor {
                n_leaves[a] -= removed_leaves;
                r_branch[a] += delta;
                ancestor = self.nodes[a].parent;
            }
        }

        collapsed
    }

    /// Text rendering of the decision rules with weighted class totals per leaf
    pub fn export_text(&self, max_depth: usize) -> String {
        let mut out = String::new();
        if self.nodes.is_empty() {
            return out;
        }
        self.export_node(0, 0, max_depth, &mut out);
        out
    }

    fn export_node(&self, id: usize, level: usize, max_depth: usize, out: &mut String) {
        let indent = "|   ".repeat(level);
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Leaf => {
                let _ = writeln!(
                    out,
                    "{}|--- weights: [{:.2}, {:.2}] class: {}",
                    indent,
                    node.value[0],
                    node.value[1],
                    node.class()
                );
            }
            NodeKind::Split { feature, threshold, left, right } => {
                if level >= max_depth {
                    let subtree_depth = self.subtree_depth(id);
                    let _ = writeln!(out, "{}|--- truncated branch of depth {}", indent, subtree_depth);
                    return;
                }
                let name = &self.features[feature];
                let _ = writeln!(out, "{}|--- {} <= {:.2}", indent, name, threshold);
                self.export_node(left, level + 1, max_depth, out);
                let _ = writeln!(out, "{}|--- {} >  {:.2}", indent, name, threshold);
                self.export_node(right, level + 1, max_depth, out);
            }
        }
    }

    fn subtree_depth(&self, id: usize) -> usize {
        match self.nodes[id].kind {
            NodeKind::Leaf => 0,
            NodeKind::Split { left, right, .. } => {
                1 + self.subtree_depth(left).max(self.subtree_depth(right))
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict_proba(&self, x: &DesignMatrix) -> Result<Array1<f64>> {
        let aligned = x.select(&self.features)?;
        Ok(aligned
            .data
            .rows()
            .into_iter()
            .map(|row| self.leaf_for(row).proba())
            .collect())
    }

    /// At the default cut-off each row takes its leaf's majority class, the
    /// label `export_text` prints; other cut-offs threshold the leaf share.
    fn predict(&self, x: &DesignMatrix, threshold: f64) -> Result<Array1<f64>> {
        if threshold != DEFAULT_THRESHOLD {
            return Ok(binarize(&self.predict_proba(x)?, threshold));
        }
        let aligned = x.select(&self.features)?;
        Ok(aligned
            .data
            .rows()
            .into_iter()
            .map(|row| f64::from(self.leaf_for(row).class()))
            .collect())
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        Some(self.importances.clone())
    }
}

/// Per-sample weights implied by the class weighting
pub fn sample_weights(labels: &[usize], class_weight: ClassWeight) -> Vec<f64> {
    match class_weight {
        ClassWeight::Uniform => vec![1.0; labels.len()],
        ClassWeight::Balanced => {
            let mut counts = [0usize; 2];
            for &c in labels {
                counts[c] += 1;
            }
            let present = counts.iter().filter(|&&c| c > 0).count().max(1);
            let n = labels.len() as f64;
            let per_class: Vec<f64> = counts
                .iter()
                .map(|&c| if c > 0 { n / (present as f64 * c as f64) } else { 0.0 })
                .collect();
            labels.iter().map(|&c| per_class[c]).collect()
        }
    }
}

fn gini(value: [f64; 2]) -> f64 {
    let w = value[0] + value[1];
    if w <= 0.0 {
        return 0.0;
    }
    let p0 = value[0] / w;
    let p1 = value[1] / w;
    1.0 - p0 * p0 - p1 * p1
}

/// Node weight times Gini impurity
fn weighted_gini(value: [f64; 2]) -> f64 {
    let w = value[0] + value[1];
    if w <= 0.0 {
        return 0.0;
    }
    w - (value[0] * value[0] + value[1] * value[1]) / w
}

fn compute_importances(nodes: &[TreeNode], n_features: usize) -> Array1<f64> {
    let mut importances = Array1::zeros(n_features);
    for node in nodes {
        if let NodeKind::Split { feature, left, right, .. } = node.kind {
            let l = &nodes[left];
            let r = &nodes[right];
            importances[feature] += node.weight() * node.impurity
                - l.weight() * l.impurity
                - r.weight() * r.impurity;
        }
    }
    let total: f64 = importances.sum();
    if total > 0.0 {
        importances /= total;
    }
    importances
}

/// Rebuild the arena in preorder, turning collapsed nodes into leaves
fn compact(nodes: &[TreeNode], collapsed: &[bool]) -> Vec<TreeNode> {
    let mut out: Vec<TreeNode> = Vec::new();
    // (old id, new parent, is left child)
    let mut stack: Vec<(usize, Option<usize>, bool)> = vec![(0, None, true)];

    while let Some((old, parent, is_left)) = stack.pop() {
        let id = out.len();
        let mut node = nodes[old].clone();
        node.parent = parent;
        node.depth = parent.map_or(0, |p| out[p].depth + 1);

        let children = match node.kind {
            NodeKind::Split { left, right, .. } if !collapsed[old] => Some((left, right)),
            _ => None,
        };
        if children.is_none() {
            node.kind = NodeKind::Leaf;
        }
        out.push(node);

        if let Some(p) = parent {
            if let NodeKind::Split { left, right, .. } = &mut out[p].kind {
                if is_left {
                    *left = id;
                } else {
                    *right = id;
                }
            }
        }

        if let Some((left, right)) = children {
            stack.push((right, Some(id), false));
            stack.push((left, Some(id), true));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn design(data: Array2<f64>) -> DesignMatrix {
        let names = (0..data.ncols()).map(|i| format!("f{}", i)).collect();
        DesignMatrix::new(names, data).unwrap()
    }

    fn noisy_stairs() -> (DesignMatrix, Array1<f64>) {
        let n = 40;
        let data = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                ((i * 7) % 5) as f64
            }
        });
        let y = Array1::from_shape_fn(n, |i| {
            let base = if i >= 20 { 1.0 } else { 0.0 };
            if i % 9 == 4 {
                1.0 - base
            } else {
                base
            }
        });
        (design(data), y)
    }

    #[test]
    fn test_unconstrained_tree_memorizes() {
        let (x, y) = noisy_stairs();
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();
        let pred = tree.predict(&x, 0.5).unwrap();
        assert_eq!(pred, y);
        assert!(tree.nodes().iter().filter(|n| n.is_leaf()).all(|n| n.impurity == 0.0));
    }

    #[test]
    fn test_max_depth_respected() {
        let (x, y) = noisy_stairs();
        let tree = DecisionTree::fit(&TreeConfig::default().with_max_depth(2), &x, &y).unwrap();
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_best_first_leaf_limit() {
        let (x, y) = noisy_stairs();
        let config = TreeConfig::default().with_max_leaf_nodes(3);
        let tree = DecisionTree::fit(&config, &x, &y).unwrap();
        assert!(tree.n_leaves() <= 3);
        // The first split separates the two halves
        match tree.nodes()[0].kind {
            NodeKind::Split { feature, threshold, .. } => {
                assert_eq!(feature, 0);
                assert!(threshold > 18.0 && threshold < 21.0);
            }
            NodeKind::Leaf => panic!("root should split"),
        }
    }

    #[test]
    fn test_min_samples_split_blocks_growth() {
        let (x, y) = noisy_stairs();
        let config = TreeConfig::default().with_min_samples_split(41);
        let tree = DecisionTree::fit(&config, &x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_balanced_weights() {
        let labels = [0, 0, 0, 1];
        let w = sample_weights(&labels, ClassWeight::Balanced);
        assert!((w[0] - 4.0 / 6.0).abs() < 1e-12);
        assert!((w[3] - 2.0).abs() < 1e-12);
        let total_neg: f64 = w[..3].iter().sum();
        assert!((total_neg - w[3]).abs() < 1e-12);
    }

    #[test]
    fn test_importances_favor_signal() {
        let (x, y) = noisy_stairs();
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();
        let imp = tree.feature_importances().unwrap();
        assert!((imp.sum() - 1.0).abs() < 1e-9);
        assert!(imp[0] > imp[1]);
        assert_eq!(tree.ranked_importances()[0].0, "f0");
    }

    #[test]
    fn test_pruning_path_properties() {
        let (x, y) = noisy_stairs();
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();
        let path = tree.cost_complexity_path();

        assert_eq!(path.ccp_alphas[0], 0.0);
        for w in path.ccp_alphas.windows(2) {
            assert!(w[1] >= w[0] - 1e-12);
        }
        for w in path.impurities.windows(2) {
            assert!(w[1] >= w[0] - 1e-12);
        }

        let last = *path.ccp_alphas.last().unwrap();
        let root_only = tree.prune(last);
        assert_eq!(root_only.node_count(), 1);
    }

    #[test]
    fn test_prune_zero_is_identity() {
        let (x, y) = noisy_stairs();
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();
        let same = tree.prune(0.0);
        assert_eq!(same.nodes(), tree.nodes());
    }

    #[test]
    fn test_pruned_tree_is_consistent() {
        let (x, y) = noisy_stairs();
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();
        let path = tree.cost_complexity_path();
        let mid = path.ccp_alphas[path.ccp_alphas.len() / 2];
        let pruned = tree.prune(mid);

        assert!(pruned.node_count() < tree.node_count());
        for (id, node) in pruned.nodes().iter().enumerate() {
            if let NodeKind::Split { left, right, .. } = node.kind {
                assert!(left > id && right > id);
                assert_eq!(pruned.nodes()[left].parent, Some(id));
                assert_eq!(pruned.nodes()[right].depth, node.depth + 1);
            }
        }
        assert!(pruned.predict_proba(&x).is_ok());
    }

    #[test]
    fn test_export_text() {
        let x = design(array![[1.0], [2.0], [3.0], [4.0]]);
        let y = array![0.0, 0.0, 1.0, 1.0];
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();
        let text = tree.export_text(10);
        assert_eq!(
            text,
            "|--- f0 <= 2.50\n\
             |   |--- weights: [2.00, 0.00] class: 0\n\
             |--- f0 >  2.50\n\
             |   |--- weights: [0.00, 2.00] class: 1\n"
        );
    }

    #[test]
    fn test_tied_leaf_predicts_printed_class() {
        let x = design(array![[1.0], [1.0], [2.0], [2.0], [2.0]]);
        let y = array![0.0, 1.0, 0.0, 0.0, 0.0];
        let tree = DecisionTree::fit(&TreeConfig::default(), &x, &y).unwrap();

        assert!(tree.export_text(10).contains("weights: [1.00, 1.00] class: 0"));
        assert_eq!(tree.predict(&x, 0.5).unwrap(), array![0.0, 0.0, 0.0, 0.0, 0.0]);
        // Any other cut-off thresholds the leaf share
        assert_eq!(tree.predict(&x, 0.4).unwrap(), array![1.0, 1.0, 0.0, 0.0, 0.0]);

        let metrics = crate::metrics::evaluate(&tree, &x, &y, 0.5).unwrap();
        assert_eq!(metrics.confusion.tp + metrics.confusion.fp, 0);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = design(array![[1.0], [2.0]]);
        let y = array![0.0];
        assert!(matches!(
            DecisionTree::fit(&TreeConfig::default(), &x, &y),
            Err(CancelError::ShapeError { .. })
        ));
    }
}
