//! Gradient-boosted regression trees
//!
//! A compact least-squares boosting implementation: an initial constant
//! prediction plus shallow regression trees fitted to residuals. Trees use
//! exhaustive split search over midpoint thresholds, so fitting is fully
//! deterministic for a given sample order. The whole model serializes with
//! serde, which keeps the on-disk artifact a plain JSON document.

use serde::{Deserialize, Serialize};

/// Boosting hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbrtParams {
    /// Number of boosting iterations (trees)
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Minimum samples required in a leaf node
    pub min_samples_leaf: usize,
}

impl Default for GbrtParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 3,
            learning_rate: 0.1,
            min_samples_leaf: 1,
        }
    }
}

/// One regression tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Node::Leaf { value } => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row.get(*feature).copied().unwrap_or(0.0) <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

/// Fitted boosting ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    params: GbrtParams,
    init_value: f64,
    trees: Vec<Node>,
}

impl GradientBoostedTrees {
    /// Fit on row-major features and targets. Empty input yields a model
    /// that predicts 0.
    pub fn fit(params: GbrtParams, x: &[Vec<f64>], y: &[f64]) -> Self {
        let n = x.len().min(y.len());
        if n == 0 {
            return Self {
                params,
                init_value: 0.0,
                trees: Vec::new(),
            };
        }

        let init_value = y[..n].iter().sum::<f64>() / n as f64;
        let mut predictions = vec![init_value; n];
        let mut trees = Vec::with_capacity(params.n_estimators);
        let indices: Vec<usize> = (0..n).collect();

        for _ in 0..params.n_estimators {
            let residuals: Vec<f64> = y[..n]
                .iter()
                .zip(predictions.iter())
                .map(|(target, pred)| target - pred)
                .collect();
            let tree = fit_tree(x, &residuals, &indices, params.max_depth, params.min_samples_leaf);
            for (i, row) in x[..n].iter().enumerate() {
                predictions[i] += params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Self {
            params,
            init_value,
            trees,
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut value = self.init_value;
        for tree in &self.trees {
            value += self.params.learning_rate * tree.predict(row);
        }
        value
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn fit_tree(
    x: &[Vec<f64>],
    residuals: &[f64],
    indices: &[usize],
    depth: usize,
    min_samples_leaf: usize,
) -> Node {
    let mean = subset_mean(residuals, indices);
    if depth == 0 || indices.len() < 2 * min_samples_leaf.max(1) {
        return Node::Leaf { value: mean };
    }

    let best = best_split(x, residuals, indices, min_samples_leaf);
    match best {
        Some((feature, threshold)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| x[i][feature] <= threshold);
            if left_idx.is_empty() || right_idx.is_empty() {
                return Node::Leaf { value: mean };
            }
            Node::Split {
                feature,
                threshold,
                left: Box::new(fit_tree(x, residuals, &left_idx, depth - 1, min_samples_leaf)),
                right: Box::new(fit_tree(x, residuals, &right_idx, depth - 1, min_samples_leaf)),
            }
        }
        None => Node::Leaf { value: mean },
    }
}

/// Exhaustive least-squares split search: every feature, midpoints between
/// consecutive distinct values as candidate thresholds.
fn best_split(
    x: &[Vec<f64>],
    residuals: &[f64],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<(usize, f64)> {
    let n_features = x.first().map(|row| row.len()).unwrap_or(0);
    let mut best: Option<(usize, f64)> = None;
    let mut best_sse = f64::MAX;

    for feature in 0..n_features {
        let mut values: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x[i][feature], residuals[i]))
            .collect();
        values.sort_by(|a, b| a.0.total_cmp(&b.0));

        for split_at in min_samples_leaf.max(1)..=values.len().saturating_sub(min_samples_leaf.max(1)) {
            if split_at >= values.len() {
                break;
            }
            let (prev, next) = (values[split_at - 1].0, values[split_at].0);
            if prev == next {
                continue;
            }
            let threshold = (prev + next) / 2.0;
            let (left, right) = values.split_at(split_at);
            let sse = subset_sse(left) + subset_sse(right);
            if sse < best_sse {
                best_sse = sse;
                best = Some((feature, threshold));
            }
        }
    }

    best
}

fn subset_mean(residuals: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| residuals[i]).sum::<f64>() / indices.len() as f64
}

fn subset_sse(values: &[(f64, f64)]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().map(|(_, r)| r).sum::<f64>() / values.len() as f64;
    values.iter().map(|(_, r)| (r - mean).powi(2)).sum()
}

/// Per-feature standardization fitted on the training set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &[Vec<f64>]) -> Self {
        let n_features = x.first().map(|row| row.len()).unwrap_or(0);
        let n = x.len().max(1) as f64;
        let mut means = vec![0.0; n_features];
        for row in x {
            for (m, v) in means.iter_mut().zip(row.iter()) {
                *m += v;
            }
        }
        for m in means.iter_mut() {
            *m /= n;
        }
        let mut stds = vec![0.0; n_features];
        for row in x {
            for (s, (v, m)) in stds.iter_mut().zip(row.iter().zip(means.iter())) {
                *s += (v - m).powi(2);
            }
        }
        for s in stds.iter_mut() {
            *s = (*s / n).sqrt();
            // constant columns pass through unscaled
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Self { means, stds }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(i, v)| {
                let mean = self.means.get(i).copied().unwrap_or(0.0);
                let std = self.stds.get(i).copied().unwrap_or(1.0);
                (v - mean) / std
            })
            .collect()
    }

    pub fn transform(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        x.iter().map(|row| self.transform_row(row)).collect()
    }
}
