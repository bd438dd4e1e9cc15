//! Evaluation metrics for both model stages.
//!
//! Regression metrics (R², MSE, RMSE, MAE) drive discount-model
//! selection; accuracy and the confusion matrix report platform
//! classifier quality.

use crate::primitives::Vector;

/// Computes the coefficient of determination R².
///
/// R² = 1 - SS_res / SS_tot
///
/// Returns 0.0 when the target is constant (SS_tot = 0).
///
/// # Examples
///
/// ```
/// use ahorro::metrics::r_squared;
/// use ahorro::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!(r2 > 0.9);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn r_squared(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let y_mean = y_true.mean();

    let ss_res: f32 = y_true
        .as_slice()
        .iter()
        .zip(y_pred.as_slice().iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    let ss_tot: f32 = y_true.as_slice().iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return 0.0;
    }

    1.0 - (ss_res / ss_tot)
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true` - `y_pred)²`
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let n = y_true.len() as f32;

    let sum_sq_error: f32 = y_true
        .as_slice()
        .iter()
        .zip(y_pred.as_slice().iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    sum_sq_error / n
}

/// Computes the Mean Absolute Error (MAE).
///
/// MAE = (1/n) * `Σ|y_true` - `y_pred`|
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let n = y_true.len() as f32;

    let sum_abs_error: f32 = y_true
        .as_slice()
        .iter()
        .zip(y_pred.as_slice().iter())
        .map(|(t, p)| (t - p).abs())
        .sum();

    sum_abs_error / n
}

/// Computes the Root Mean Squared Error (RMSE).
///
/// RMSE = sqrt(MSE)
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn rmse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    mse(y_pred, y_true).sqrt()
}

/// Fraction of class predictions that match the true labels.
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn accuracy_score(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

/// Confusion matrix with `n_classes` rows of true labels and columns
/// of predicted labels.
///
/// # Panics
///
/// Panics if slices have different lengths or contain labels outside
/// `0..n_classes`.
#[must_use]
pub fn confusion_matrix(y_pred: &[usize], y_true: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");

    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (&p, &t) in y_pred.iter().zip(y_true.iter()) {
        assert!(t < n_classes && p < n_classes, "Label outside 0..n_classes");
        matrix[t][p] += 1;
    }
    matrix
}

/// Per-class precision, recall, and F1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassReport {
    /// Fraction of predictions for this class that were correct.
    pub precision: f32,
    /// Fraction of true members of this class that were found.
    pub recall: f32,
    /// Harmonic mean of precision and recall.
    pub f1: f32,
}

/// Per-class precision/recall/F1 derived from the confusion matrix.
///
/// Classes absent from both predictions and truth score 0.0 across the
/// board.
///
/// # Panics
///
/// Panics if slices have different lengths or contain labels outside
/// `0..n_classes`.
#[must_use]
pub fn classification_report(
    y_pred: &[usize],
    y_true: &[usize],
    n_classes: usize,
) -> Vec<ClassReport> {
    let matrix = confusion_matrix(y_pred, y_true, n_classes);

    (0..n_classes)
        .map(|c| {
            let true_positive = matrix[c][c] as f32;
            let predicted: usize = (0..n_classes).map(|t| matrix[t][c]).sum();
            let actual: usize = matrix[c].iter().sum();

            let precision = if predicted > 0 {
                true_positive / predicted as f32
            } else {
                0.0
            };
            let recall = if actual > 0 {
                true_positive / actual as f32
            } else {
                0.0
            };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassReport {
                precision,
                recall,
                f1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_squared_perfect_fit() {
        let y = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert!((r_squared(&y, &y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_r_squared_mean_predictor_is_zero() {
        let y_true = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let y_pred = Vector::from_slice(&[2.0, 2.0, 2.0]);
        assert!(r_squared(&y_pred, &y_true).abs() < 1e-6);
    }

    #[test]
    fn test_r_squared_constant_target() {
        let y_true = Vector::from_slice(&[5.0, 5.0, 5.0]);
        let y_pred = Vector::from_slice(&[4.0, 5.0, 6.0]);
        assert!((r_squared(&y_pred, &y_true)).abs() < 1e-6);
    }

    #[test]
    fn test_r_squared_can_be_negative() {
        let y_true = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let y_pred = Vector::from_slice(&[3.0, 1.0, 5.0]);
        assert!(r_squared(&y_pred, &y_true) < 0.0);
    }

    #[test]
    fn test_mse_and_rmse() {
        let y_true = Vector::from_slice(&[0.0, 0.0]);
        let y_pred = Vector::from_slice(&[3.0, 4.0]);
        // MSE = (9 + 16) / 2 = 12.5
        assert!((mse(&y_pred, &y_true) - 12.5).abs() < 1e-6);
        assert!((rmse(&y_pred, &y_true) - 12.5f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_mae() {
        let y_true = Vector::from_slice(&[1.0, -1.0]);
        let y_pred = Vector::from_slice(&[2.0, 1.0]);
        assert!((mae(&y_pred, &y_true) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_accuracy_score() {
        let y_true = vec![0, 1, 2, 1];
        let y_pred = vec![0, 1, 1, 1];
        assert!((accuracy_score(&y_pred, &y_true) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_classification_report() {
        let y_true = vec![0, 0, 1, 1];
        let y_pred = vec![0, 1, 1, 1];
        let report = classification_report(&y_pred, &y_true, 2);

        // Class 0: predicted once, correctly; one member missed
        assert!((report[0].precision - 1.0).abs() < 1e-6);
        assert!((report[0].recall - 0.5).abs() < 1e-6);
        // Class 1: 2 of 3 predictions correct, both members found
        assert!((report[1].precision - 2.0 / 3.0).abs() < 1e-6);
        assert!((report[1].recall - 1.0).abs() < 1e-6);
        assert!(report[1].f1 > 0.7 && report[1].f1 < 0.9);
    }

    #[test]
    fn test_classification_report_absent_class() {
        let y_true = vec![0, 0];
        let y_pred = vec![0, 0];
        let report = classification_report(&y_pred, &y_true, 2);
        assert!((report[1].precision).abs() < 1e-6);
        assert!((report[1].recall).abs() < 1e-6);
        assert!((report[1].f1).abs() < 1e-6);
    }

    #[test]
    fn test_confusion_matrix() {
        let y_true = vec![0, 1, 1, 2];
        let y_pred = vec![0, 1, 2, 2];
        let m = confusion_matrix(&y_pred, &y_true, 3);
        assert_eq!(m[0][0], 1);
        assert_eq!(m[1][1], 1);
        assert_eq!(m[1][2], 1);
        assert_eq!(m[2][2], 1);
        assert_eq!(m[0][1], 0);
    }
}
