//! Preprocessing transformers: feature standardization and label encoding.
//!
//! # Example
//!
//! ```
//! use ahorro::prelude::*;
//! use ahorro::preprocessing::StandardScaler;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! // Standardize to zero mean and unit variance
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//! assert!(scaled.get(0, 0).abs() < 2.0);
//! ```

use crate::error::{AhorroError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std
///
/// Fitted on the training split only; the same fitted parameters are
/// reused for the held-out split and at serving time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new unfitted `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        self.mean
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f32] {
        self.std
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x.get(i, j);
            }
            *mean_j = sum / n_samples as f32;
        }

        let mut std = vec![0.0; n_features];
        for (j, std_j) in std.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x.get(i, j) - mean[j];
                sum_sq += diff * diff;
            }
            // Use population std (divide by n, not n-1) like sklearn
            *std_j = (sum_sq / n_samples as f32).sqrt();
        }

        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| AhorroError::from("Scaler not fitted"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| AhorroError::from("Scaler not fitted"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(AhorroError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = vec![0.0; n_samples * n_features];

        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j) - mean[j];

                // Constant features would divide by zero
                if std[j] > 1e-10 {
                    val /= std[j];
                }

                result[i * n_features + j] = val;
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

/// Maps string labels to contiguous integer codes.
///
/// Classes are assigned codes in sorted order, so the mapping is
/// deterministic regardless of row order in the training data. Labels
/// not seen during fit are rejected at transform time.
///
/// # Example
///
/// ```
/// use ahorro::preprocessing::LabelEncoder;
///
/// let mut enc = LabelEncoder::new();
/// enc.fit(&["Flipkart".into(), "Amazon".into(), "Flipkart".into()]);
/// assert_eq!(enc.encode("Amazon").unwrap(), 0);
/// assert_eq!(enc.encode("Flipkart").unwrap(), 1);
/// assert!(enc.encode("Etsy").is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Field name used in unknown-label errors ("category", "platform").
    field: String,
    /// Label -> code. BTreeMap keeps iteration order stable.
    codes: BTreeMap<String, usize>,
    /// Code -> label, indexed by code.
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Creates a new unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder whose errors name the given field.
    #[must_use]
    pub fn for_field(field: &str) -> Self {
        Self {
            field: field.to_string(),
            ..Self::default()
        }
    }

    /// Learns the label dictionary from training data.
    ///
    /// Duplicate labels are collapsed; codes follow sorted label order.
    pub fn fit(&mut self, labels: &[String]) {
        let mut unique: Vec<String> = labels.to_vec();
        unique.sort();
        unique.dedup();

        self.codes = unique
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();
        self.classes = unique;
    }

    /// Encodes a single label.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for labels unseen at fit time.
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.codes.get(label).copied().ok_or_else(|| {
            let field = if self.field.is_empty() {
                "label"
            } else {
                &self.field
            };
            AhorroError::unknown_label(field, label)
        })
    }

    /// Encodes a batch of labels.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for the first unseen label.
    pub fn transform(&self, labels: &[String]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.encode(l)).collect()
    }

    /// Decodes an integer code back to its label.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is out of range.
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| AhorroError::domain(format!("label code {code} out of range")))
    }

    /// The known labels in code order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }
}
