//! Decision trees and tree ensembles.
//!
//! CART-style trees with Gini impurity for classification and variance
//! reduction for regression, plus the random forest ensembles built on
//! them. All fitted models serialize with serde so they can live inside
//! a snapshot.

mod gradient_boosting;
mod helpers;

pub use gradient_boosting::{ExtremeGradientBoostingRegressor, GradientBoostingRegressor};

use crate::error::Result;
use crate::primitives::{Matrix, Vector};
use helpers::{build_regression_tree, build_tree};
use serde::{Deserialize, Serialize};

/// Internal node in a classification tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a classification tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class label for this leaf
    pub class_label: usize,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a classification tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Leaf node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Returns the depth of the tree rooted at this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Decision tree regressor using the CART algorithm.
///
/// Uses variance reduction for the splitting criterion. Leaf nodes
/// predict the mean of their target values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
}

impl DecisionTreeRegressor {
    /// Creates a new decision tree regressor with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
        }
    }

    /// Sets the maximum depth of the tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split a node.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Fits the decision tree to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_rows, _n_cols) = x.shape();
        if n_rows != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_rows == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.tree = Some(build_regression_tree(
            x,
            y,
            0,
            self.max_depth,
            self.min_samples_split,
        ));
        Ok(())
    }

    /// Predicts target values for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before fit()
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let (n_samples, n_features) = x.shape();
        let mut predictions = Vec::with_capacity(n_samples);

        for row in 0..n_samples {
            let mut sample = Vec::with_capacity(n_features);
            for col in 0..n_features {
                sample.push(x.get(row, col));
            }
            predictions.push(self.predict_one(&sample));
        }

        Vector::from_vec(predictions)
    }

    /// Predicts the value for a single sample.
    fn predict_one(&self, x: &[f32]) -> f32 {
        let tree = self.tree.as_ref().expect("Model not fitted");

        let mut node = tree;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    if x[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }

    /// Computes the R² score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let predictions = self.predict(x);
        crate::metrics::r_squared(&predictions, y)
    }

    /// Mutable access to the fitted tree root, for ensembles that
    /// adjust leaf values after building.
    pub(crate) fn tree_mut(&mut self) -> Option<&mut RegressionTreeNode> {
        self.tree.as_mut()
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Random Forest Regressor.
///
/// Ensemble of decision tree regressors trained on bootstrap samples.
/// Predictions are averaged across all trees to reduce variance.
///
/// # Examples
///
/// ```
/// use ahorro::tree::RandomForestRegressor;
/// use ahorro::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid dimensions");
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
///
/// let mut rf = RandomForestRegressor::new(10).with_max_depth(5).with_random_state(42);
/// rf.fit(&x, &y).expect("fit should succeed");
/// let predictions = rf.predict(&x);
/// assert_eq!(predictions.len(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
}

impl RandomForestRegressor {
    /// Creates a new Random Forest regressor.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Fits the random forest to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.trees = Vec::with_capacity(self.n_estimators);

        for i in 0..self.n_estimators {
            // Per-tree seed keeps trees distinct but reproducible
            let seed = self.random_state.map(|s| s + i as u64);
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut bootstrap_x_data = Vec::with_capacity(n_samples * n_features);
            let mut bootstrap_y_data = Vec::with_capacity(n_samples);

            for &idx in &bootstrap_indices {
                for j in 0..n_features {
                    bootstrap_x_data.push(x.get(idx, j));
                }
                bootstrap_y_data.push(y.as_slice()[idx]);
            }

            let bootstrap_x = Matrix::from_vec(n_samples, n_features, bootstrap_x_data)
                .map_err(|_| "Failed to create bootstrap matrix")?;
            let bootstrap_y = Vector::from_slice(&bootstrap_y_data);

            let mut tree = if let Some(max_depth) = self.max_depth {
                DecisionTreeRegressor::new().with_max_depth(max_depth)
            } else {
                DecisionTreeRegressor::new()
            };

            tree.fit(&bootstrap_x, &bootstrap_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predicts by averaging predictions from all trees.
    ///
    /// # Panics
    ///
    /// Panics if the model hasn't been fitted yet.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        assert!(
            !self.trees.is_empty(),
            "Cannot predict with an unfitted Random Forest. Call fit() first."
        );

        let n_samples = x.shape().0;
        let mut predictions = vec![0.0; n_samples];

        for tree in &self.trees {
            let tree_preds = tree.predict(x);
            for (pred, &tree_pred) in predictions.iter_mut().zip(tree_preds.as_slice().iter()) {
                *pred += tree_pred;
            }
        }

        let n_trees = self.trees.len() as f32;
        for pred in &mut predictions {
            *pred /= n_trees;
        }

        Vector::from_slice(&predictions)
    }

    /// Calculates R² score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let predictions = self.predict(x);
        crate::metrics::r_squared(&predictions, y)
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and builds trees recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    /// Number of features the model was trained on (for validation)
    #[serde(default)]
    n_features: Option<usize>,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            n_features: None,
        }
    }

    /// Sets the maximum depth of the tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fits the decision tree to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_rows, n_cols) = x.shape();
        if n_rows != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_rows == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.n_features = Some(n_cols);
        self.tree = Some(build_tree(x, y, 0, self.max_depth));
        Ok(())
    }

    /// Predicts class labels for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before fit() or if feature count doesn't match training data
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        let (n_samples, n_features) = x.shape();

        if let Some(expected) = self.n_features {
            assert!(
                n_features >= expected,
                "Feature count mismatch: model was trained with {expected} features but input has {n_features} features"
            );
        }

        let mut predictions = Vec::with_capacity(n_samples);

        for row in 0..n_samples {
            let mut sample = Vec::with_capacity(n_features);
            for col in 0..n_features {
                sample.push(x.get(row, col));
            }
            predictions.push(self.predict_one(&sample));
        }

        predictions
    }

    /// Predicts the class label for a single sample.
    fn predict_one(&self, x: &[f32]) -> usize {
        let tree = self.tree.as_ref().expect("Model not fitted yet");

        let mut node = tree;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(internal) => {
                    if x[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }

    /// Computes the accuracy score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> f32 {
        let predictions = self.predict(x);
        crate::metrics::accuracy_score(&predictions, y)
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Random Forest Classifier.
///
/// Combines multiple decision trees trained on bootstrap samples with
/// majority voting. `predict_proba` exposes the vote proportions, which
/// the inference pipeline turns into a confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
    /// Number of classes seen at fit time.
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Number of classes seen at fit time.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Fits the random forest to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.n_classes = y.iter().max().copied().unwrap_or(0) + 1;
        self.trees = Vec::with_capacity(self.n_estimators);

        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s + i as u64);
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut bootstrap_x_data = Vec::with_capacity(n_samples * n_features);
            let mut bootstrap_y = Vec::with_capacity(n_samples);

            for &idx in &bootstrap_indices {
                for j in 0..n_features {
                    bootstrap_x_data.push(x.get(idx, j));
                }
                bootstrap_y.push(y[idx]);
            }

            let bootstrap_x = Matrix::from_vec(n_samples, n_features, bootstrap_x_data)
                .map_err(|_| "Failed to create bootstrap matrix")?;

            let mut tree = if let Some(max_depth) = self.max_depth {
                DecisionTreeClassifier::new().with_max_depth(max_depth)
            } else {
                DecisionTreeClassifier::new()
            };

            tree.fit(&bootstrap_x, &bootstrap_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predicts class labels by majority voting.
    ///
    /// # Panics
    ///
    /// Panics if the model hasn't been fitted yet.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        let proba = self.predict_proba(x);
        let n_samples = proba.shape().0;
        let mut predictions = Vec::with_capacity(n_samples);

        for sample_idx in 0..n_samples {
            let mut best_class = 0;
            let mut best_proba = -1.0;
            for class_idx in 0..self.n_classes {
                let p = proba.get(sample_idx, class_idx);
                if p > best_proba {
                    best_proba = p;
                    best_class = class_idx;
                }
            }
            predictions.push(best_class);
        }

        predictions
    }

    /// Calculates accuracy score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> f32 {
        let predictions = self.predict(x);
        crate::metrics::accuracy_score(&predictions, y)
    }

    /// Predict class probabilities for input features.
    ///
    /// Returns the vote proportions across trees, shape
    /// `(n_samples, n_classes)`, each row summing to 1.0.
    ///
    /// # Panics
    ///
    /// Panics if the model hasn't been fitted yet.
    #[must_use]
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Matrix<f32> {
        assert!(
            !self.trees.is_empty(),
            "Cannot predict with an unfitted Random Forest. Call fit() first."
        );

        let n_samples = x.shape().0;
        let n_classes = self.n_classes;
        let mut proba_data = vec![0.0f32; n_samples * n_classes];
        let n_trees = self.trees.len() as f32;

        for tree in &self.trees {
            let tree_predictions = tree.predict(x);
            for (sample_idx, &predicted) in tree_predictions.iter().enumerate() {
                if predicted < n_classes {
                    proba_data[sample_idx * n_classes + predicted] += 1.0;
                }
            }
        }

        for p in &mut proba_data {
            *p /= n_trees;
        }

        Matrix::from_vec(n_samples, n_classes, proba_data)
            .expect("Matrix creation should succeed")
    }
}

/// Draws `n_samples` indices with replacement.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;

    let dist = Uniform::from(0..n_samples);

    let mut indices = Vec::with_capacity(n_samples);

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    } else {
        let mut rng = rand::thread_rng();
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Matrix<f32>, Vector<f32>) {
        let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).expect("matrix");
        let y = Vector::from_slice(&[5.0, 5.0, 5.0, 20.0, 20.0, 20.0]);
        (x, y)
    }

    fn class_data() -> (Matrix<f32>, Vec<usize>) {
        let x = Matrix::from_vec(
            8,
            2,
            vec![
                1.0, 1.0, 1.5, 2.0, 2.0, 1.0, 1.0, 2.0, // class 0 cluster
                8.0, 8.0, 8.5, 9.0, 9.0, 8.0, 8.0, 9.0, // class 1 cluster
            ],
        )
        .expect("matrix");
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_regressor_fits_step_function() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new().with_max_depth(3);
        tree.fit(&x, &y).expect("fit");

        let preds = tree.predict(&x);
        for i in 0..3 {
            assert!((preds[i] - 5.0).abs() < 1e-4);
        }
        for i in 3..6 {
            assert!((preds[i] - 20.0).abs() < 1e-4);
        }
        assert!(tree.score(&x, &y) > 0.99);
    }

    #[test]
    fn test_regressor_depth_zero_predicts_mean() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new().with_max_depth(0);
        tree.fit(&x, &y).expect("fit");
        let preds = tree.predict(&x);
        // Mean of [5,5,5,20,20,20] = 12.5
        assert!((preds[0] - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_regressor_rejects_mismatched_lengths() {
        let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("matrix");
        let y = Vector::from_slice(&[1.0]);
        assert!(DecisionTreeRegressor::new().fit(&x, &y).is_err());
    }

    #[test]
    fn test_classifier_separable_clusters() {
        let (x, y) = class_data();
        let mut tree = DecisionTreeClassifier::new().with_max_depth(5);
        tree.fit(&x, &y).expect("fit");

        assert_eq!(tree.predict(&x), y);
        assert!((tree.score(&x, &y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_forest_regressor_predicts() {
        let (x, y) = step_data();
        let mut rf = RandomForestRegressor::new(20)
            .with_max_depth(4)
            .with_random_state(42);
        rf.fit(&x, &y).expect("fit");

        let preds = rf.predict(&x);
        assert!(preds[0] < 12.5);
        assert!(preds[5] > 12.5);
        assert!(rf.score(&x, &y) > 0.8);
    }

    #[test]
    fn test_forest_regressor_reproducible() {
        let (x, y) = step_data();
        let mut a = RandomForestRegressor::new(5).with_random_state(7);
        let mut b = RandomForestRegressor::new(5).with_random_state(7);
        a.fit(&x, &y).expect("fit");
        b.fit(&x, &y).expect("fit");
        assert_eq!(a.predict(&x).as_slice(), b.predict(&x).as_slice());
    }

    #[test]
    fn test_forest_classifier_predict_proba_rows_sum_to_one() {
        let (x, y) = class_data();
        let mut rf = RandomForestClassifier::new(15)
            .with_max_depth(5)
            .with_random_state(42);
        rf.fit(&x, &y).expect("fit");

        assert_eq!(rf.n_classes(), 2);
        let proba = rf.predict_proba(&x);
        assert_eq!(proba.shape(), (8, 2));
        for row in 0..8 {
            let sum: f32 = (0..2).map(|c| proba.get(row, c)).sum();
            assert!((sum - 1.0).abs() < 1e-5, "row {row} sums to {sum}");
        }
    }

    #[test]
    fn test_forest_classifier_predict_matches_argmax() {
        let (x, y) = class_data();
        let mut rf = RandomForestClassifier::new(15)
            .with_max_depth(5)
            .with_random_state(42);
        rf.fit(&x, &y).expect("fit");

        let preds = rf.predict(&x);
        let proba = rf.predict_proba(&x);
        for (row, &pred) in preds.iter().enumerate() {
            for c in 0..2 {
                assert!(proba.get(row, pred) >= proba.get(row, c));
            }
        }
        assert!(rf.score(&x, &y) > 0.9);
    }

    #[test]
    fn test_forest_classifier_serde_round_trip() {
        let (x, y) = class_data();
        let mut rf = RandomForestClassifier::new(5)
            .with_max_depth(4)
            .with_random_state(1);
        rf.fit(&x, &y).expect("fit");

        let json = serde_json::to_string(&rf).expect("serialize");
        let restored: RandomForestClassifier = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(rf.predict(&x), restored.predict(&x));
        assert_eq!(restored.n_classes(), 2);
    }

    #[test]
    fn test_bootstrap_sample_deterministic_with_seed() {
        let a = bootstrap_sample(10, Some(42));
        let b = bootstrap_sample(10, Some(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert!(a.iter().all(|&i| i < 10));
    }
}
