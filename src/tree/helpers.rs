//! Helper functions for tree building algorithms.
//!
//! Internal routines shared by the decision tree and ensemble methods.

use super::{Leaf, Node, RegressionLeaf, RegressionNode, RegressionTreeNode, TreeNode};
use crate::primitives::{Matrix, Vector};
use std::collections::HashSet;

// ============================================================================
// Classification Tree Helpers
// ============================================================================

/// Calculate Gini impurity for a set of labels.
///
/// Gini impurity measures the probability of incorrectly classifying a randomly
/// chosen element if it were labeled according to the distribution of labels.
///
/// Formula: Gini = 1 - `Σ(p_i²)` where `p_i` is the proportion of class i
pub fn gini_impurity(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    // BTreeMap for deterministic iteration order
    let mut counts = std::collections::BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let n = labels.len() as f32;
    let mut gini = 1.0;

    for count in counts.values() {
        let p = *count as f32 / n;
        gini -= p * p;
    }

    gini
}

/// Calculate weighted Gini impurity for a split.
pub fn gini_split(left_labels: &[usize], right_labels: &[usize]) -> f32 {
    let n_left = left_labels.len() as f32;
    let n_right = right_labels.len() as f32;
    let n_total = n_left + n_right;

    if n_total == 0.0 {
        return 0.0;
    }

    let weight_left = n_left / n_total;
    let weight_right = n_right / n_total;

    weight_left * gini_impurity(left_labels) + weight_right * gini_impurity(right_labels)
}

/// Get sorted unique values from feature data.
pub(super) fn get_sorted_unique_values(x: &[f32]) -> Vec<f32> {
    let mut sorted_indices: Vec<usize> = (0..x.len()).collect();
    sorted_indices.sort_by(|&a, &b| {
        x[a].partial_cmp(&x[b])
            .expect("f32 values should be comparable")
    });

    let mut unique_values = Vec::new();
    let mut prev_val = x[sorted_indices[0]];
    unique_values.push(prev_val);

    for &idx in sorted_indices.get(1..).unwrap_or(&[]) {
        if (x[idx] - prev_val).abs() > 1e-10 {
            unique_values.push(x[idx]);
            prev_val = x[idx];
        }
    }

    unique_values
}

/// Split labels into left and right partitions based on threshold.
pub(super) fn split_labels_by_threshold(
    x: &[f32],
    y: &[usize],
    threshold: f32,
) -> Option<(Vec<usize>, Vec<usize>)> {
    let mut left_labels = Vec::new();
    let mut right_labels = Vec::new();

    for (idx, &val) in x.iter().enumerate() {
        if val <= threshold {
            left_labels.push(y[idx]);
        } else {
            right_labels.push(y[idx]);
        }
    }

    if left_labels.is_empty() || right_labels.is_empty() {
        None
    } else {
        Some((left_labels, right_labels))
    }
}

/// Find the best split for a given feature.
pub(super) fn find_best_split_for_feature(x: &[f32], y: &[usize]) -> Option<(f32, f32)> {
    if x.len() < 2 {
        return None;
    }

    let unique_values = get_sorted_unique_values(x);
    if unique_values.len() < 2 {
        return None;
    }

    let current_impurity = gini_impurity(y);
    let mut best_gain = 0.0;
    let mut best_threshold = 0.0;

    // Try each midpoint as threshold
    for i in 0..unique_values.len() - 1 {
        let threshold = (unique_values[i] + unique_values[i + 1]) / 2.0;

        if let Some((left_labels, right_labels)) = split_labels_by_threshold(x, y, threshold) {
            let gain = current_impurity - gini_split(&left_labels, &right_labels);

            if gain > best_gain {
                best_gain = gain;
                best_threshold = threshold;
            }
        }
    }

    if best_gain > 0.0 {
        Some((best_threshold, best_gain))
    } else {
        None
    }
}

/// Find the best split across all features.
pub(super) fn find_best_split(x_matrix: &Matrix<f32>, y: &[usize]) -> Option<(usize, f32, f32)> {
    let (n_samples, n_features) = x_matrix.shape();

    if n_samples < 2 {
        return None;
    }

    let mut best_gain = 0.0;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;

    for feature_idx in 0..n_features {
        let mut feature_values = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            feature_values.push(x_matrix.get(row, feature_idx));
        }

        if let Some((threshold, gain)) = find_best_split_for_feature(&feature_values, y) {
            if gain > best_gain {
                best_gain = gain;
                best_feature = feature_idx;
                best_threshold = threshold;
            }
        }
    }

    if best_gain > 0.0 {
        Some((best_feature, best_threshold, best_gain))
    } else {
        None
    }
}

/// Find the majority class from a set of labels.
pub(super) fn majority_class(labels: &[usize]) -> usize {
    let mut counts = std::collections::BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }
    // BTreeMap iterates in key order, so ties break toward the lowest class
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .expect("at least one label should exist")
        .0
}

/// Split data into subsets based on indices.
pub(super) fn split_data_by_indices(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
) -> (Matrix<f32>, Vec<usize>) {
    let n_cols = x.shape().1;
    let mut data = Vec::with_capacity(indices.len() * n_cols);
    let mut labels = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_cols {
            data.push(x.get(idx, col));
        }
        labels.push(y[idx]);
    }

    let matrix = Matrix::from_vec(indices.len(), n_cols, data)
        .expect("matrix creation should succeed with valid indices");
    (matrix, labels)
}

/// Check if tree building should stop at this node.
pub(super) fn check_stopping_criteria(
    y: &[usize],
    depth: usize,
    max_depth: Option<usize>,
) -> Option<TreeNode> {
    let n_samples = y.len();

    // Criterion 1: All same label (pure node)
    let unique_labels: HashSet<_> = y.iter().collect();
    if unique_labels.len() == 1 {
        return Some(TreeNode::Leaf(Leaf {
            class_label: y[0],
            n_samples,
        }));
    }

    // Criterion 2: Max depth reached
    if let Some(max_d) = max_depth {
        if depth >= max_d {
            return Some(TreeNode::Leaf(Leaf {
                class_label: majority_class(y),
                n_samples,
            }));
        }
    }

    None
}

/// Split data indices based on feature threshold.
pub(super) fn split_indices_by_threshold(
    x: &Matrix<f32>,
    feature_idx: usize,
    threshold: f32,
    n_samples: usize,
) -> Option<(Vec<usize>, Vec<usize>)> {
    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();

    for row in 0..n_samples {
        if x.get(row, feature_idx) <= threshold {
            left_indices.push(row);
        } else {
            right_indices.push(row);
        }
    }

    if left_indices.is_empty() || right_indices.is_empty() {
        None
    } else {
        Some((left_indices, right_indices))
    }
}

/// Build a classification tree recursively.
pub(super) fn build_tree(
    x: &Matrix<f32>,
    y: &[usize],
    depth: usize,
    max_depth: Option<usize>,
) -> TreeNode {
    let n_samples = y.len();

    if let Some(leaf) = check_stopping_criteria(y, depth, max_depth) {
        return leaf;
    }

    let Some((feature_idx, threshold, _gain)) = find_best_split(x, y) else {
        return TreeNode::Leaf(Leaf {
            class_label: majority_class(y),
            n_samples,
        });
    };

    let Some((left_indices, right_indices)) =
        split_indices_by_threshold(x, feature_idx, threshold, n_samples)
    else {
        return TreeNode::Leaf(Leaf {
            class_label: majority_class(y),
            n_samples,
        });
    };

    let (left_matrix, left_labels) = split_data_by_indices(x, y, &left_indices);
    let (right_matrix, right_labels) = split_data_by_indices(x, y, &right_indices);

    let left_child = build_tree(&left_matrix, &left_labels, depth + 1, max_depth);
    let right_child = build_tree(&right_matrix, &right_labels, depth + 1, max_depth);

    TreeNode::Node(Node {
        feature_idx,
        threshold,
        left: Box::new(left_child),
        right: Box::new(right_child),
    })
}

// ============================================================================
// Regression Tree Helpers
// ============================================================================

/// Variance of a set of target values, the MSE of predicting their mean.
pub(super) fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n
}

/// Weighted variance of a split.
pub(super) fn variance_split(left: &[f32], right: &[f32]) -> f32 {
    let n_left = left.len() as f32;
    let n_right = right.len() as f32;
    let n_total = n_left + n_right;

    if n_total == 0.0 {
        return 0.0;
    }

    (n_left / n_total) * variance(left) + (n_right / n_total) * variance(right)
}

/// Split target values by threshold on a feature column.
fn split_values_by_threshold(x: &[f32], y: &[f32], threshold: f32) -> Option<(Vec<f32>, Vec<f32>)> {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for (idx, &val) in x.iter().enumerate() {
        if val <= threshold {
            left.push(y[idx]);
        } else {
            right.push(y[idx]);
        }
    }

    if left.is_empty() || right.is_empty() {
        None
    } else {
        Some((left, right))
    }
}

/// Find the best variance-reducing split for a feature.
fn find_best_regression_split_for_feature(x: &[f32], y: &[f32]) -> Option<(f32, f32)> {
    if x.len() < 2 {
        return None;
    }

    let unique_values = get_sorted_unique_values(x);
    if unique_values.len() < 2 {
        return None;
    }

    let current_variance = variance(y);
    let mut best_gain = 0.0;
    let mut best_threshold = 0.0;

    for i in 0..unique_values.len() - 1 {
        let threshold = (unique_values[i] + unique_values[i + 1]) / 2.0;

        if let Some((left, right)) = split_values_by_threshold(x, y, threshold) {
            let gain = current_variance - variance_split(&left, &right);

            if gain > best_gain {
                best_gain = gain;
                best_threshold = threshold;
            }
        }
    }

    if best_gain > 0.0 {
        Some((best_threshold, best_gain))
    } else {
        None
    }
}

/// Find the best variance-reducing split across all features.
fn find_best_regression_split(x_matrix: &Matrix<f32>, y: &[f32]) -> Option<(usize, f32, f32)> {
    let (n_samples, n_features) = x_matrix.shape();

    if n_samples < 2 {
        return None;
    }

    let mut best_gain = 0.0;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;

    for feature_idx in 0..n_features {
        let mut feature_values = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            feature_values.push(x_matrix.get(row, feature_idx));
        }

        if let Some((threshold, gain)) =
            find_best_regression_split_for_feature(&feature_values, y)
        {
            if gain > best_gain {
                best_gain = gain;
                best_feature = feature_idx;
                best_threshold = threshold;
            }
        }
    }

    if best_gain > 0.0 {
        Some((best_feature, best_threshold, best_gain))
    } else {
        None
    }
}

/// Mean of a set of target values.
fn mean_value(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Extract subsets of a regression dataset by row index.
fn split_regression_data_by_indices(
    x: &Matrix<f32>,
    y: &[f32],
    indices: &[usize],
) -> (Matrix<f32>, Vec<f32>) {
    let n_cols = x.shape().1;
    let mut data = Vec::with_capacity(indices.len() * n_cols);
    let mut values = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_cols {
            data.push(x.get(idx, col));
        }
        values.push(y[idx]);
    }

    let matrix = Matrix::from_vec(indices.len(), n_cols, data)
        .expect("matrix creation should succeed with valid indices");
    (matrix, values)
}

/// Build a regression tree recursively using variance reduction.
pub(super) fn build_regression_tree(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    depth: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
) -> RegressionTreeNode {
    build_regression_tree_inner(x, y.as_slice(), depth, max_depth, min_samples_split)
}

fn build_regression_tree_inner(
    x: &Matrix<f32>,
    y: &[f32],
    depth: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
) -> RegressionTreeNode {
    let n_samples = y.len();

    let depth_reached = max_depth.is_some_and(|max_d| depth >= max_d);
    if depth_reached || n_samples < min_samples_split || variance(y) < 1e-12 {
        return RegressionTreeNode::Leaf(RegressionLeaf {
            value: mean_value(y),
            n_samples,
        });
    }

    let Some((feature_idx, threshold, _gain)) = find_best_regression_split(x, y) else {
        return RegressionTreeNode::Leaf(RegressionLeaf {
            value: mean_value(y),
            n_samples,
        });
    };

    let Some((left_indices, right_indices)) =
        split_indices_by_threshold(x, feature_idx, threshold, n_samples)
    else {
        return RegressionTreeNode::Leaf(RegressionLeaf {
            value: mean_value(y),
            n_samples,
        });
    };

    let (left_matrix, left_values) = split_regression_data_by_indices(x, y, &left_indices);
    let (right_matrix, right_values) = split_regression_data_by_indices(x, y, &right_indices);

    let left_child =
        build_regression_tree_inner(&left_matrix, &left_values, depth + 1, max_depth, min_samples_split);
    let right_child =
        build_regression_tree_inner(&right_matrix, &right_values, depth + 1, max_depth, min_samples_split);

    RegressionTreeNode::Node(RegressionNode {
        feature_idx,
        threshold,
        left: Box::new(left_child),
        right: Box::new(right_child),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gini_pure_node() {
        assert!((gini_impurity(&[1, 1, 1])).abs() < 1e-6);
    }

    #[test]
    fn test_gini_balanced_binary() {
        // Two classes 50/50: 1 - 0.25 - 0.25 = 0.5
        assert!((gini_impurity(&[0, 0, 1, 1]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gini_empty() {
        assert!((gini_impurity(&[])).abs() < 1e-6);
    }

    #[test]
    fn test_gini_split_weighted() {
        // Pure halves give zero split impurity
        assert!((gini_split(&[0, 0], &[1, 1])).abs() < 1e-6);
    }

    #[test]
    fn test_majority_class_tie_breaks_low() {
        assert_eq!(majority_class(&[2, 1, 1, 2]), 1);
        assert_eq!(majority_class(&[3, 3, 0]), 3);
    }

    #[test]
    fn test_variance() {
        assert!((variance(&[2.0, 2.0, 2.0])).abs() < 1e-6);
        // [0, 2]: mean 1, variance 1
        assert!((variance(&[0.0, 2.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_find_best_split_separable() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 10.0, 11.0]).expect("matrix");
        let y = vec![0, 0, 1, 1];
        let (feature, threshold, gain) = find_best_split(&x, &y).expect("separable");
        assert_eq!(feature, 0);
        assert!(threshold > 2.0 && threshold < 10.0);
        assert!(gain > 0.0);
    }

    #[test]
    fn test_find_best_split_constant_feature() {
        let x = Matrix::from_vec(4, 1, vec![1.0; 4]).expect("matrix");
        let y = vec![0, 1, 0, 1];
        assert!(find_best_split(&x, &y).is_none());
    }

    #[test]
    fn test_build_regression_tree_fits_step() {
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 10.0, 11.0]).expect("matrix");
        let y = Vector::from_slice(&[5.0, 5.0, 20.0, 20.0]);
        let tree = build_regression_tree(&x, &y, 0, Some(3), 2);
        assert!(tree.depth() >= 1);
    }
}
