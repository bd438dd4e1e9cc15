//! Gradient boosting regressors.
//!
//! Two boosted-tree candidates for the discount stage: plain gradient
//! boosting with shrinkage, and a second-order variant with
//! L2-regularized leaf values.

use super::{DecisionTreeRegressor, RegressionTreeNode};
use crate::error::Result;
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Gradient Boosting Regressor.
///
/// # Algorithm
///
/// 1. Initialize with the target mean
/// 2. For each boosting iteration:
///    - Compute residuals (target - current prediction)
///    - Fit a small regression tree to the residuals
///    - Update predictions with `learning_rate` * `tree_prediction`
/// 3. Final prediction = init + sum of shrunk tree predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    /// Number of boosting iterations (trees)
    n_estimators: usize,
    /// Learning rate (shrinkage parameter)
    learning_rate: f32,
    /// Maximum depth of each tree
    max_depth: usize,
    /// Initial prediction (target mean)
    init_prediction: f32,
    /// Ensemble of regression trees
    estimators: Vec<DecisionTreeRegressor>,
}

impl GradientBoostingRegressor {
    /// Creates a new Gradient Boosting Regressor with default parameters.
    ///
    /// # Default Parameters
    ///
    /// - `n_estimators`: 100
    /// - `learning_rate`: 0.1
    /// - `max_depth`: 3
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            init_prediction: 0.0,
            estimators: Vec::new(),
        }
    }

    /// Sets the number of boosting iterations (trees).
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the learning rate (shrinkage parameter).
    ///
    /// Lower values require more trees but often generalize better.
    /// Typical values: 0.01 - 0.3
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum depth of each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Trains the regressor on squared-error loss.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err("x and y must have the same number of samples".into());
        }
        if x.n_rows() == 0 {
            return Err("Cannot fit with 0 samples".into());
        }

        let n_samples = x.n_rows();

        self.init_prediction = y.mean();
        let mut predictions = vec![self.init_prediction; n_samples];

        self.estimators = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            // Squared-error pseudo-residuals
            let residuals: Vec<f32> = y
                .as_slice()
                .iter()
                .zip(predictions.iter())
                .map(|(&yi, &pi)| yi - pi)
                .collect();

            let mut tree = DecisionTreeRegressor::new().with_max_depth(self.max_depth);
            tree.fit(x, &Vector::from_slice(&residuals))?;

            let tree_preds = tree.predict(x);
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += self.learning_rate * tree_pred;
            }

            self.estimators.push(tree);
        }

        Ok(())
    }

    /// Predicts target values for the given samples.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let n_samples = x.n_rows();
        let mut predictions = vec![self.init_prediction; n_samples];

        for tree in &self.estimators {
            let tree_preds = tree.predict(x);
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += self.learning_rate * tree_pred;
            }
        }

        Vector::from_vec(predictions)
    }

    /// Computes the R² score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let predictions = self.predict(x);
        crate::metrics::r_squared(&predictions, y)
    }

    /// Number of fitted trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Gradient boosting regressor with L2-regularized leaf weights.
///
/// Same residual-fitting loop as [`GradientBoostingRegressor`], but each
/// leaf value is the second-order optimum for squared-error loss:
/// `sum(residuals) / (n_leaf + lambda)`. The `lambda` penalty shrinks
/// leaves built from few samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtremeGradientBoostingRegressor {
    /// Number of boosting iterations (trees)
    n_estimators: usize,
    /// Learning rate (shrinkage parameter)
    learning_rate: f32,
    /// Maximum depth of each tree
    max_depth: usize,
    /// L2 regularization on leaf weights
    lambda: f32,
    /// Initial prediction (target mean)
    init_prediction: f32,
    /// Ensemble of regression trees
    estimators: Vec<DecisionTreeRegressor>,
}

impl ExtremeGradientBoostingRegressor {
    /// Creates a new regressor with default parameters.
    ///
    /// # Default Parameters
    ///
    /// - `n_estimators`: 100
    /// - `learning_rate`: 0.1
    /// - `max_depth`: 6
    /// - `lambda`: 1.0
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            lambda: 1.0,
            init_prediction: 0.0,
            estimators: Vec::new(),
        }
    }

    /// Sets the number of boosting iterations (trees).
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the learning rate (shrinkage parameter).
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum depth of each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the L2 regularization strength on leaf weights.
    #[must_use]
    pub fn with_lambda(mut self, lambda: f32) -> Self {
        self.lambda = lambda.max(0.0);
        self
    }

    /// Scales each leaf from the sample mean `sum/n` to the regularized
    /// optimum `sum/(n + lambda)`.
    fn regularize_leaves(node: &mut RegressionTreeNode, lambda: f32) {
        match node {
            RegressionTreeNode::Leaf(leaf) => {
                let n = leaf.n_samples as f32;
                if n > 0.0 {
                    leaf.value *= n / (n + lambda);
                }
            }
            RegressionTreeNode::Node(internal) => {
                Self::regularize_leaves(&mut internal.left, lambda);
                Self::regularize_leaves(&mut internal.right, lambda);
            }
        }
    }

    /// Trains the regressor on squared-error loss.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err("x and y must have the same number of samples".into());
        }
        if x.n_rows() == 0 {
            return Err("Cannot fit with 0 samples".into());
        }

        let n_samples = x.n_rows();

        self.init_prediction = y.mean();
        let mut predictions = vec![self.init_prediction; n_samples];

        self.estimators = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let residuals: Vec<f32> = y
                .as_slice()
                .iter()
                .zip(predictions.iter())
                .map(|(&yi, &pi)| yi - pi)
                .collect();

            let mut tree = DecisionTreeRegressor::new().with_max_depth(self.max_depth);
            tree.fit(x, &Vector::from_slice(&residuals))?;
            if let Some(root) = tree.tree_mut() {
                Self::regularize_leaves(root, self.lambda);
            }

            let tree_preds = tree.predict(x);
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += self.learning_rate * tree_pred;
            }

            self.estimators.push(tree);
        }

        Ok(())
    }

    /// Predicts target values for the given samples.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let n_samples = x.n_rows();
        let mut predictions = vec![self.init_prediction; n_samples];

        for tree in &self.estimators {
            let tree_preds = tree.predict(x);
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += self.learning_rate * tree_pred;
            }
        }

        Vector::from_vec(predictions)
    }

    /// Computes the R² score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let predictions = self.predict(x);
        crate::metrics::r_squared(&predictions, y)
    }
}

impl Default for ExtremeGradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Matrix<f32>, Vector<f32>) {
        // y = 3x with a kink
        let x = Matrix::from_vec(8, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])
            .expect("matrix");
        let y = Vector::from_slice(&[3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0]);
        (x, y)
    }

    #[test]
    fn test_gbm_improves_on_mean() {
        let (x, y) = linear_data();
        let mut gbm = GradientBoostingRegressor::new()
            .with_n_estimators(50)
            .with_learning_rate(0.2)
            .with_max_depth(3);
        gbm.fit(&x, &y).expect("fit");

        assert_eq!(gbm.n_estimators(), 50);
        assert!(gbm.score(&x, &y) > 0.9);
    }

    #[test]
    fn test_gbm_empty_fit_rejected() {
        let x = Matrix::from_vec(0, 1, vec![]).expect("matrix");
        let y = Vector::from_vec(vec![]);
        assert!(GradientBoostingRegressor::new().fit(&x, &y).is_err());
    }

    #[test]
    fn test_gbm_zero_estimators_predicts_mean() {
        let (x, y) = linear_data();
        let mut gbm = GradientBoostingRegressor::new().with_n_estimators(0);
        gbm.fit(&x, &y).expect("fit");

        let preds = gbm.predict(&x);
        for i in 0..preds.len() {
            assert!((preds[i] - y.mean()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_xgb_fits_training_data() {
        let (x, y) = linear_data();
        let mut xgb = ExtremeGradientBoostingRegressor::new()
            .with_n_estimators(60)
            .with_learning_rate(0.2)
            .with_max_depth(4)
            .with_lambda(1.0);
        xgb.fit(&x, &y).expect("fit");

        assert!(xgb.score(&x, &y) > 0.9);
    }

    #[test]
    fn test_xgb_lambda_shrinks_leaves() {
        let (x, y) = linear_data();

        let mut weak = ExtremeGradientBoostingRegressor::new()
            .with_n_estimators(1)
            .with_learning_rate(1.0)
            .with_lambda(100.0);
        weak.fit(&x, &y).expect("fit");

        let mut strong = ExtremeGradientBoostingRegressor::new()
            .with_n_estimators(1)
            .with_learning_rate(1.0)
            .with_lambda(0.0);
        strong.fit(&x, &y).expect("fit");

        // Heavy regularization keeps the single tree closer to the mean
        let weak_spread = weak.predict(&x)[7] - weak.predict(&x)[0];
        let strong_spread = strong.predict(&x)[7] - strong.predict(&x)[0];
        assert!(weak_spread.abs() < strong_spread.abs());
    }

    #[test]
    fn test_gbm_serde_round_trip() {
        let (x, y) = linear_data();
        let mut gbm = GradientBoostingRegressor::new().with_n_estimators(10);
        gbm.fit(&x, &y).expect("fit");

        let json = serde_json::to_string(&gbm).expect("serialize");
        let restored: GradientBoostingRegressor =
            serde_json::from_str(&json).expect("deserialize");
        let before = gbm.predict(&x);
        let after = restored.predict(&x);
        for i in 0..before.len() {
            assert!((before[i] - after[i]).abs() < f32::EPSILON);
        }
    }
}
