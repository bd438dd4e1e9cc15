//! Train/test splitting utilities.
//!
//! Both model stages hold out a fixed fraction of the data for
//! evaluation. The discount stage uses a plain shuffled split; the
//! platform stage stratifies on the high-discount indicator so both
//! splits see the same discount mix.

use crate::error::{AhorroError, Result};
use crate::primitives::{Matrix, Vector};
use std::collections::BTreeMap;

/// Extracts the rows named by `indices` from a feature matrix and
/// target vector.
fn extract_samples(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    indices: &[usize],
) -> (Matrix<f32>, Vector<f32>) {
    let n_features = x.shape().1;
    let mut x_data = Vec::with_capacity(indices.len() * n_features);
    let mut y_data = Vec::with_capacity(indices.len());

    for &idx in indices {
        for j in 0..n_features {
            x_data.push(x.get(idx, j));
        }
        y_data.push(y.as_slice()[idx]);
    }

    let x_subset =
        Matrix::from_vec(indices.len(), n_features, x_data).expect("Failed to create matrix");
    let y_subset = Vector::from_vec(y_data);

    (x_subset, y_subset)
}

/// Validates inputs and returns (n_train, n_test).
fn validate_split_inputs(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    test_size: f32,
) -> Result<(usize, usize)> {
    if test_size <= 0.0 || test_size >= 1.0 {
        return Err(AhorroError::Other(format!(
            "test_size must be between 0 and 1, got {test_size}"
        )));
    }

    let (n_samples, _) = x.shape();
    if n_samples != y.len() {
        return Err(AhorroError::dimension_mismatch(
            "samples",
            n_samples,
            y.len(),
        ));
    }

    let n_test = (n_samples as f32 * test_size).round() as usize;
    let n_train = n_samples - n_test;

    if n_test == 0 || n_train == 0 {
        return Err(AhorroError::Other(format!(
            "Split would result in empty train or test set (n_train={n_train}, n_test={n_test})"
        )));
    }

    Ok((n_train, n_test))
}

/// Shuffles indices with optional random seed.
fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut indices: Vec<usize> = (0..n_samples).collect();

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }

    indices
}

/// Split arrays into random train and test subsets.
///
/// # Arguments
///
/// * `x` - Feature matrix
/// * `y` - Target vector (labels or values)
/// * `test_size` - Proportion of dataset to include in test split (0.0 to 1.0)
/// * `random_state` - Optional random seed for reproducibility
///
/// # Returns
///
/// Tuple of (x_train, x_test, y_train, y_test)
///
/// # Errors
///
/// Returns an error if the inputs are inconsistent or either split
/// would be empty.
///
/// # Example
///
/// ```rust
/// use ahorro::model_selection::train_test_split;
/// use ahorro::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(10, 2, (0..20).map(|i| i as f32).collect()).expect("valid dimensions");
/// let y = Vector::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
///
/// let (x_train, x_test, y_train, y_test) = train_test_split(&x, &y, 0.2, Some(42)).expect("valid split");
/// assert_eq!(x_train.shape().0, 8);
/// assert_eq!(x_test.shape().0, 2);
/// ```
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    test_size: f32,
    random_state: Option<u64>,
) -> Result<(Matrix<f32>, Matrix<f32>, Vector<f32>, Vector<f32>)> {
    let (n_train, _) = validate_split_inputs(x, y, test_size)?;
    let n_samples = x.shape().0;

    let indices = shuffle_indices(n_samples, random_state);
    let train_indices = &indices[..n_train];
    let test_indices = &indices[n_train..];

    let (x_train, y_train) = extract_samples(x, y, train_indices);
    let (x_test, y_test) = extract_samples(x, y, test_indices);

    Ok((x_train, x_test, y_train, y_test))
}

/// Split with per-stratum proportions preserved.
///
/// Rows are grouped by `strata`, each group is shuffled and split at
/// `test_size`, and the per-group pieces are concatenated. Groups with
/// a single member go to the training split.
///
/// # Errors
///
/// Returns an error if the inputs are inconsistent or either overall
/// split would be empty.
#[allow(clippy::type_complexity)]
pub fn stratified_train_test_split(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    strata: &[usize],
    test_size: f32,
    random_state: Option<u64>,
) -> Result<(Matrix<f32>, Matrix<f32>, Vector<f32>, Vector<f32>)> {
    validate_split_inputs(x, y, test_size)?;
    let n_samples = x.shape().0;
    if strata.len() != n_samples {
        return Err(AhorroError::dimension_mismatch(
            "strata",
            n_samples,
            strata.len(),
        ));
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &stratum) in strata.iter().enumerate() {
        groups.entry(stratum).or_default().push(idx);
    }

    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for (stratum, mut members) in groups {
        if let Some(seed) = random_state {
            // Offset by the stratum id so groups don't share a permutation
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed + stratum as u64);
            members.shuffle(&mut rng);
        } else {
            let mut rng = rand::thread_rng();
            members.shuffle(&mut rng);
        }

        let n_test = (members.len() as f32 * test_size).round() as usize;
        let n_test = n_test.min(members.len().saturating_sub(1));
        let n_train = members.len() - n_test;

        train_indices.extend_from_slice(&members[..n_train]);
        test_indices.extend_from_slice(&members[n_train..]);
    }

    if test_indices.is_empty() {
        return Err(AhorroError::Other(
            "Stratified split produced an empty test set".to_string(),
        ));
    }

    let (x_train, y_train) = extract_samples(x, y, &train_indices);
    let (x_test, y_test) = extract_samples(x, y, &test_indices);

    Ok((x_train, x_test, y_train, y_test))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> (Matrix<f32>, Vector<f32>) {
        let x = Matrix::from_vec(n, 2, (0..2 * n).map(|i| i as f32).collect()).expect("matrix");
        let y = Vector::from_vec((0..n).map(|i| (i % 2) as f32).collect());
        (x, y)
    }

    #[test]
    fn test_train_test_split_shapes() {
        let (x, y) = dataset(10);
        let (x_train, x_test, y_train, y_test) =
            train_test_split(&x, &y, 0.2, Some(42)).expect("split");

        assert_eq!(x_train.shape(), (8, 2));
        assert_eq!(x_test.shape(), (2, 2));
        assert_eq!(y_train.len(), 8);
        assert_eq!(y_test.len(), 2);
    }

    #[test]
    fn test_train_test_split_reproducible() {
        let (x, y) = dataset(10);
        let first = train_test_split(&x, &y, 0.3, Some(7)).expect("split");
        let second = train_test_split(&x, &y, 0.3, Some(7)).expect("split");
        assert_eq!(first.0, second.0);
        assert_eq!(first.3, second.3);
    }

    #[test]
    fn test_train_test_split_no_row_loss() {
        let (x, y) = dataset(13);
        let (x_train, x_test, _, _) = train_test_split(&x, &y, 0.25, Some(1)).expect("split");
        assert_eq!(x_train.shape().0 + x_test.shape().0, 13);
    }

    #[test]
    fn test_train_test_split_invalid_test_size() {
        let (x, y) = dataset(10);
        assert!(train_test_split(&x, &y, 0.0, None).is_err());
        assert!(train_test_split(&x, &y, 1.0, None).is_err());
    }

    #[test]
    fn test_train_test_split_length_mismatch() {
        let (x, _) = dataset(10);
        let y = Vector::from_slice(&[1.0, 2.0]);
        assert!(train_test_split(&x, &y, 0.2, None).is_err());
    }

    #[test]
    fn test_stratified_split_preserves_mix() {
        // 8 rows of stratum 0, 4 rows of stratum 1
        let n = 12;
        let (x, _) = dataset(n);
        let strata: Vec<usize> = (0..n).map(|i| usize::from(i >= 8)).collect();
        let y = Vector::from_vec(strata.iter().map(|&s| s as f32).collect());

        let (_, _, y_train, y_test) =
            stratified_train_test_split(&x, &y, &strata, 0.25, Some(42)).expect("split");

        let train_ones = y_train.iter().filter(|&&v| v > 0.5).count();
        let test_ones = y_test.iter().filter(|&&v| v > 0.5).count();
        assert_eq!(train_ones, 3);
        assert_eq!(test_ones, 1);
        assert_eq!(y_train.len() + y_test.len(), n);
    }

    #[test]
    fn test_stratified_split_singleton_goes_to_train() {
        let n = 8;
        let (x, y) = dataset(n);
        // One lone member of stratum 1
        let strata: Vec<usize> = (0..n).map(|i| usize::from(i == 3)).collect();

        let (x_train, _, y_train, _) =
            stratified_train_test_split(&x, &y, &strata, 0.25, Some(0)).expect("split");

        // Row 3 must be in the training split
        let lone_row: Vec<f32> = vec![x.get(3, 0), x.get(3, 1)];
        let mut found = false;
        for i in 0..x_train.shape().0 {
            if (x_train.get(i, 0) - lone_row[0]).abs() < f32::EPSILON
                && (x_train.get(i, 1) - lone_row[1]).abs() < f32::EPSILON
            {
                found = true;
            }
        }
        assert!(found, "singleton stratum should land in train");
        assert!(y_train.len() >= 6);
    }

    #[test]
    fn test_stratified_split_reproducible() {
        let n = 12;
        let (x, y) = dataset(n);
        let strata: Vec<usize> = (0..n).map(|i| i % 2).collect();
        let first = stratified_train_test_split(&x, &y, &strata, 0.25, Some(9)).expect("split");
        let second = stratified_train_test_split(&x, &y, &strata, 0.25, Some(9)).expect("split");
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn test_stratified_split_strata_length_mismatch() {
        let (x, y) = dataset(10);
        let strata = vec![0usize; 4];
        assert!(stratified_train_test_split(&x, &y, &strata, 0.2, None).is_err());
    }
}
