//! Regression trees fit on gradient/hessian pairs.
//!
//! Every node, internal or leaf, stores the shrinkage-scaled Newton estimate
//! for its subset of the training rows. That makes the decision path
//! self-describing: the value change across a split is the contribution of
//! that split's feature, and the changes telescope from the root value to
//! the leaf output.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::booster::BoosterParams;

/// A split must clear this gain to be kept; ties round to no split.
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        value: f64,
    },
    Leaf {
        value: f64,
    },
}

impl Node {
    pub fn value(&self) -> f64 {
        match self {
            Node::Leaf { value } | Node::Split { value, .. } => *value,
        }
    }
}

/// Binary regression tree stored as a node arena; the root is index 0.
/// Rows route left when `x[feature] < threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit one tree to per-row gradients and hessians by exact greedy
    /// splitting. Deterministic: features are scanned in order and only a
    /// strictly better gain replaces the current best.
    pub fn fit(
        features: &Array2<f64>,
        grad: &[f64],
        hess: &[f64],
        params: &BoosterParams,
    ) -> Self {
        let rows: Vec<usize> = (0..features.nrows()).collect();
        let mut builder = TreeBuilder {
            features,
            grad,
            hess,
            params,
            nodes: Vec::new(),
        };
        builder.grow(rows, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict(&self, x: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    index = if x[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Newton estimate over all training rows of this tree's round.
    pub fn root_value(&self) -> f64 {
        self.nodes[0].value()
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    features: &'a Array2<f64>,
    grad: &'a [f64],
    hess: &'a [f64],
    params: &'a BoosterParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let grad_sum: f64 = rows.iter().map(|&i| self.grad[i]).sum();
        let hess_sum: f64 = rows.iter().map(|&i| self.hess[i]).sum();
        let value = self.params.learning_rate * newton_step(grad_sum, hess_sum, self.params.lambda);

        let index = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        if depth >= self.params.max_depth || rows.len() < 2 {
            return index;
        }
        let Some(split) = self.best_split(&rows, grad_sum, hess_sum) else {
            return index;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&i| self.features[[i, split.feature]] < split.threshold);

        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            value,
        };
        index
    }

    fn best_split(&self, rows: &[usize], grad_sum: f64, hess_sum: f64) -> Option<SplitCandidate> {
        let lambda = self.params.lambda;
        let parent_score = grad_sum * grad_sum / (hess_sum + lambda);
        let mut best: Option<SplitCandidate> = None;

        let mut column: Vec<(f64, f64, f64)> = Vec::with_capacity(rows.len());
        for feature in 0..self.features.ncols() {
            column.clear();
            column.extend(
                rows.iter()
                    .map(|&i| (self.features[[i, feature]], self.grad[i], self.hess[i])),
            );
            column.sort_unstable_by(|a, b| {
                a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut grad_left = 0.0;
            let mut hess_left = 0.0;
            for k in 0..column.len() - 1 {
                grad_left += column[k].1;
                hess_left += column[k].2;
                if column[k].0 == column[k + 1].0 {
                    continue;
                }

                let hess_right = hess_sum - hess_left;
                if hess_left < self.params.min_child_weight
                    || hess_right < self.params.min_child_weight
                {
                    continue;
                }

                // Midpoint can collapse onto a neighbor for adjacent floats.
                let threshold = 0.5 * (column[k].0 + column[k + 1].0);
                if !(column[k].0 < threshold && threshold <= column[k + 1].0) {
                    continue;
                }

                let grad_right = grad_sum - grad_left;
                let gain = 0.5
                    * (grad_left * grad_left / (hess_left + lambda)
                        + grad_right * grad_right / (hess_right + lambda)
                        - parent_score)
                    - self.params.gamma;

                if gain > best.as_ref().map_or(MIN_GAIN, |b| b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }
        best
    }
}

fn newton_step(grad_sum: f64, hess_sum: f64, lambda: f64) -> f64 {
    -grad_sum / (hess_sum + lambda)
}
