//! Gradient boosting over regression trees with logistic loss.
//!
//! Training starts from a log-odds bias chosen so the bare model predicts
//! the positive class at its training-set rate, then fits one tree per round
//! to the current gradients and hessians. Leaves carry shrinkage already
//! applied, so the raw score of a record is just bias plus the sum of tree
//! outputs.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tree::RegressionTree;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoosterParams {
    /// Number of boosting rounds (one tree per round).
    pub rounds: usize,
    /// Shrinkage applied to every leaf estimate.
    pub learning_rate: f64,
    pub max_depth: usize,
    /// L2 regularization on leaf weights.
    pub lambda: f64,
    /// Minimum loss reduction required to keep a split.
    pub gamma: f64,
    /// Minimum hessian mass on each side of a split.
    pub min_child_weight: f64,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.3,
            max_depth: 6,
            lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error("training set is empty")]
    EmptyDataset,
    #[error("feature matrix has {rows} rows but {labels} labels")]
    LabelMismatch { rows: usize, labels: usize },
    #[error("row {0}: labels must be 0 or 1")]
    BadLabel(usize),
}

/// Trained ensemble: a bias plus a fixed sequence of trees. Immutable after
/// fitting and safe to share across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBooster {
    pub(crate) bias: f64,
    pub(crate) trees: Vec<RegressionTree>,
    params: BoosterParams,
}

impl GradientBooster {
    /// Fit the ensemble. Deterministic: identical input produces an
    /// identical model.
    pub fn fit(
        params: &BoosterParams,
        features: &Array2<f64>,
        labels: &[f64],
    ) -> Result<Self, FitError> {
        let rows = features.nrows();
        if rows == 0 {
            return Err(FitError::EmptyDataset);
        }
        if labels.len() != rows {
            return Err(FitError::LabelMismatch {
                rows,
                labels: labels.len(),
            });
        }
        if let Some(i) = labels.iter().position(|&y| y != 0.0 && y != 1.0) {
            return Err(FitError::BadLabel(i + 1));
        }

        let positives: f64 = labels.iter().sum();
        let prior = (positives / rows as f64).clamp(1e-6, 1.0 - 1e-6);
        let bias = (prior / (1.0 - prior)).ln();

        let mut margins = vec![bias; rows];
        let mut grad = vec![0.0; rows];
        let mut hess = vec![0.0; rows];
        let mut trees = Vec::with_capacity(params.rounds);

        for _round in 0..params.rounds {
            for i in 0..rows {
                let p = sigmoid(margins[i]);
                grad[i] = p - labels[i];
                hess[i] = (p * (1.0 - p)).max(1e-16);
            }

            let tree = RegressionTree::fit(features, &grad, &hess, params);
            for i in 0..rows {
                margins[i] += tree.predict(features.row(i));
            }
            trees.push(tree);
        }

        Ok(Self {
            bias,
            trees,
            params: params.clone(),
        })
    }

    /// Raw log-odds score.
    pub fn predict_margin(&self, x: ArrayView1<'_, f64>) -> f64 {
        self.bias + self.trees.iter().map(|tree| tree.predict(x)).sum::<f64>()
    }

    /// Positive-class probability.
    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> f64 {
        sigmoid(self.predict_margin(x))
    }

    /// Hard class at the 0.5 probability threshold.
    pub fn predict(&self, x: ArrayView1<'_, f64>) -> u8 {
        u8::from(self.predict_proba(x) >= 0.5)
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &BoosterParams {
        &self.params
    }
}

pub(crate) fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn test_params() -> BoosterParams {
        BoosterParams {
            rounds: 25,
            learning_rate: 0.3,
            max_depth: 3,
            lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1e-3,
        }
    }

    /// One informative feature: negative values are class 0, positive class 1.
    fn separable() -> (Array2<f64>, Vec<f64>) {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let x = i as f64 - 9.5;
            values.push(x);
            values.push(1.0); // constant second feature
            labels.push(if x > 0.0 { 1.0 } else { 0.0 });
        }
        (Array2::from_shape_vec((20, 2), values).unwrap(), labels)
    }

    #[test]
    fn learns_a_separable_problem() {
        let (features, labels) = separable();
        let booster = GradientBooster::fit(&test_params(), &features, &labels).unwrap();

        assert!(booster.predict_proba(array![-5.0, 1.0].view()) < 0.5);
        assert!(booster.predict_proba(array![5.0, 1.0].view()) > 0.5);
        assert_eq!(booster.predict(array![-5.0, 1.0].view()), 0);
        assert_eq!(booster.predict(array![5.0, 1.0].view()), 1);
    }

    #[test]
    fn probability_matches_margin() {
        let (features, labels) = separable();
        let booster = GradientBooster::fit(&test_params(), &features, &labels).unwrap();

        let x = array![3.0, 1.0];
        let margin = booster.predict_margin(x.view());
        let proba = booster.predict_proba(x.view());
        assert!((proba - sigmoid(margin)).abs() < 1e-15);
        assert!((0.0..=1.0).contains(&proba));
    }

    #[test]
    fn prediction_is_thresholded_probability() {
        let (features, labels) = separable();
        let booster = GradientBooster::fit(&test_params(), &features, &labels).unwrap();

        for i in -10..=10 {
            let x = array![i as f64, 1.0];
            let proba = booster.predict_proba(x.view());
            assert_eq!(booster.predict(x.view()), u8::from(proba >= 0.5));
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        let (features, labels) = separable();
        let a = GradientBooster::fit(&test_params(), &features, &labels).unwrap();
        let b = GradientBooster::fit(&test_params(), &features, &labels).unwrap();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn bias_reflects_class_prior() {
        let (features, labels) = separable();
        let booster = GradientBooster::fit(&test_params(), &features, &labels).unwrap();

        // Half the labels are positive, so the prior log-odds is zero.
        assert!(booster.bias().abs() < 1e-12);
        assert_eq!(booster.num_trees(), test_params().rounds);
    }

    #[test]
    fn rejects_empty_input() {
        let features = Array2::<f64>::zeros((0, 2));
        let err = GradientBooster::fit(&test_params(), &features, &[]).unwrap_err();
        assert!(matches!(err, FitError::EmptyDataset));
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let (features, mut labels) = separable();
        labels.pop();
        let err = GradientBooster::fit(&test_params(), &features, &labels).unwrap_err();
        assert!(matches!(err, FitError::LabelMismatch { .. }));
    }

    #[test]
    fn rejects_non_binary_labels() {
        let (features, mut labels) = separable();
        labels[3] = 2.0;
        let err = GradientBooster::fit(&test_params(), &features, &labels).unwrap_err();
        assert!(matches!(err, FitError::BadLabel(4)));
    }
}
