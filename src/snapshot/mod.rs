//! Trained-model snapshots.
//!
//! A snapshot is the unit of exchange between the trainer and the
//! inference pipeline: eight AHR artifacts in one directory covering
//! both model stages, their scalers, their feature column lists, the
//! label dictionaries, and the training metadata.
//!
//! Saving is all-or-nothing: every artifact is serialized to bytes
//! before the first file is written, so a failed save cannot leave a
//! mixed-generation directory behind. Loading fails with
//! [`AhorroError::NotReady`] naming the first missing or corrupt
//! artifact.

use crate::error::{AhorroError, Result};
use crate::features::FeatureCodec;
use crate::linear_model::LinearRegression;
use crate::preprocessing::StandardScaler;
use crate::primitives::{Matrix, Vector};
use crate::serialization::{load_artifact, to_artifact_bytes};
use crate::traits::Estimator;
use crate::tree::{
    ExtremeGradientBoostingRegressor, GradientBoostingRegressor, RandomForestClassifier,
    RandomForestRegressor,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names of the eight snapshot artifacts.
pub const ARTIFACT_FILES: [&str; 8] = [
    "discount_model.ahr",
    "discount_scaler.ahr",
    "discount_features.ahr",
    "platform_model.ahr",
    "platform_scaler.ahr",
    "platform_features.ahr",
    "label_encoders.ahr",
    "model_metadata.ahr",
];

/// A fitted discount regressor, whichever candidate won selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiscountModel {
    /// Ordinary least squares baseline.
    Linear(LinearRegression),
    /// Bagged regression trees.
    RandomForest(RandomForestRegressor),
    /// Boosted regression trees with shrinkage.
    GradientBoosting(GradientBoostingRegressor),
    /// Boosted trees with L2-regularized leaves.
    ExtremeGradientBoosting(ExtremeGradientBoostingRegressor),
}

impl DiscountModel {
    /// Display name recorded in metadata and surfaced in predictions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DiscountModel::Linear(_) => "Linear Regression",
            DiscountModel::RandomForest(_) => "Random Forest",
            DiscountModel::GradientBoosting(_) => "Gradient Boosting",
            DiscountModel::ExtremeGradientBoosting(_) => "Extreme Gradient Boosting",
        }
    }

    /// Fits the underlying model.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        match self {
            DiscountModel::Linear(m) => m.fit(x, y),
            DiscountModel::RandomForest(m) => m.fit(x, y),
            DiscountModel::GradientBoosting(m) => m.fit(x, y),
            DiscountModel::ExtremeGradientBoosting(m) => m.fit(x, y),
        }
    }

    /// Predicts discount percentages.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        match self {
            DiscountModel::Linear(m) => m.predict(x),
            DiscountModel::RandomForest(m) => m.predict(x),
            DiscountModel::GradientBoosting(m) => m.predict(x),
            DiscountModel::ExtremeGradientBoosting(m) => m.predict(x),
        }
    }

    /// R² on held-out data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        match self {
            DiscountModel::Linear(m) => m.score(x, y),
            DiscountModel::RandomForest(m) => m.score(x, y),
            DiscountModel::GradientBoosting(m) => m.score(x, y),
            DiscountModel::ExtremeGradientBoosting(m) => m.score(x, y),
        }
    }
}

/// Provenance for a trained snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Display name of the winning discount regressor.
    pub discount_model_name: String,
    /// Display name of the platform classifier.
    pub platform_model_name: String,
    /// Held-out R² of the winning discount regressor.
    pub discount_r2: f32,
    /// Held-out accuracy of the platform classifier.
    pub platform_accuracy: f32,
    /// Number of training rows.
    pub n_samples: usize,
    /// Unix timestamp (seconds) when training finished.
    pub trained_at: u64,
}

/// Everything inference needs, loaded as one unit.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Winning discount regressor.
    pub discount_model: DiscountModel,
    /// Scaler fitted on the discount training split.
    pub discount_scaler: StandardScaler,
    /// Discount feature column names, in model input order.
    pub discount_features: Vec<String>,
    /// Platform classifier.
    pub platform_model: RandomForestClassifier,
    /// Scaler fitted on the platform training split.
    pub platform_scaler: StandardScaler,
    /// Platform feature column names, in model input order.
    pub platform_features: Vec<String>,
    /// Label dictionaries for category and platform.
    pub codec: FeatureCodec,
    /// Training provenance.
    pub metadata: TrainingMetadata,
}

impl Snapshot {
    /// Writes all eight artifacts into `dir`, creating it if needed.
    ///
    /// All artifacts are serialized before any file is written.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any write fails.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();

        let blobs: Vec<(PathBuf, Vec<u8>)> = vec![
            (dir.join(ARTIFACT_FILES[0]), to_artifact_bytes(&self.discount_model)?),
            (dir.join(ARTIFACT_FILES[1]), to_artifact_bytes(&self.discount_scaler)?),
            (dir.join(ARTIFACT_FILES[2]), to_artifact_bytes(&self.discount_features)?),
            (dir.join(ARTIFACT_FILES[3]), to_artifact_bytes(&self.platform_model)?),
            (dir.join(ARTIFACT_FILES[4]), to_artifact_bytes(&self.platform_scaler)?),
            (dir.join(ARTIFACT_FILES[5]), to_artifact_bytes(&self.platform_features)?),
            (dir.join(ARTIFACT_FILES[6]), to_artifact_bytes(&self.codec)?),
            (dir.join(ARTIFACT_FILES[7]), to_artifact_bytes(&self.metadata)?),
        ];

        fs::create_dir_all(dir)?;
        for (path, bytes) in blobs {
            fs::write(path, bytes)?;
        }

        Ok(())
    }

    /// Loads all eight artifacts from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::NotReady`] naming the first artifact that
    /// is missing or fails validation.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        Ok(Self {
            discount_model: load_named(dir, ARTIFACT_FILES[0])?,
            discount_scaler: load_named(dir, ARTIFACT_FILES[1])?,
            discount_features: load_named(dir, ARTIFACT_FILES[2])?,
            platform_model: load_named(dir, ARTIFACT_FILES[3])?,
            platform_scaler: load_named(dir, ARTIFACT_FILES[4])?,
            platform_features: load_named(dir, ARTIFACT_FILES[5])?,
            codec: load_named(dir, ARTIFACT_FILES[6])?,
            metadata: load_named(dir, ARTIFACT_FILES[7])?,
        })
    }
}

/// Loads one artifact, mapping any failure to `NotReady`.
fn load_named<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    load_artifact(dir.join(file)).map_err(|e| AhorroError::NotReady {
        missing: format!("{file}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Product;
    use crate::features::{DISCOUNT_FEATURES, PLATFORM_FEATURES};
    use crate::traits::Transformer;

    fn products() -> Vec<Product> {
        vec![
            Product {
                category: "Electronics".into(),
                platform: "Amazon".into(),
                price: 10_000.0,
                discounted_price: 8_000.0,
                discount_percent: 20.0,
                rating: 4.2,
                stock: 100.0,
            },
            Product {
                category: "Fashion".into(),
                platform: "Myntra".into(),
                price: 2_000.0,
                discounted_price: 1_500.0,
                discount_percent: 25.0,
                rating: 3.9,
                stock: 300.0,
            },
        ]
    }

    fn fitted_snapshot() -> Snapshot {
        let x = Matrix::from_vec(
            4,
            2,
            vec![1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0],
        )
        .expect("matrix");
        let y = Vector::from_slice(&[10.0, 15.0, 20.0, 25.0]);
        let labels = vec![0, 0, 1, 1];

        let mut discount_model = DiscountModel::Linear(LinearRegression::new());
        discount_model.fit(&x, &y).expect("fit regressor");

        let mut platform_model = RandomForestClassifier::new(5)
            .with_max_depth(3)
            .with_random_state(42);
        platform_model.fit(&x, &labels).expect("fit classifier");

        let mut scaler = StandardScaler::new();
        scaler.fit(&x).expect("fit scaler");

        Snapshot {
            discount_model,
            discount_scaler: scaler.clone(),
            discount_features: DISCOUNT_FEATURES.iter().map(|s| (*s).to_string()).collect(),
            platform_model,
            platform_scaler: scaler,
            platform_features: PLATFORM_FEATURES.iter().map(|s| (*s).to_string()).collect(),
            codec: FeatureCodec::fit(&products()),
            metadata: TrainingMetadata {
                discount_model_name: "Linear Regression".into(),
                platform_model_name: "Random Forest Classifier".into(),
                discount_r2: 0.95,
                platform_accuracy: 1.0,
                n_samples: 4,
                trained_at: 1_756_400_000,
            },
        }
    }

    #[test]
    fn test_discount_model_names() {
        assert_eq!(
            DiscountModel::Linear(LinearRegression::new()).name(),
            "Linear Regression"
        );
        assert_eq!(
            DiscountModel::RandomForest(RandomForestRegressor::new(1)).name(),
            "Random Forest"
        );
        assert_eq!(
            DiscountModel::GradientBoosting(GradientBoostingRegressor::new()).name(),
            "Gradient Boosting"
        );
        assert_eq!(
            DiscountModel::ExtremeGradientBoosting(ExtremeGradientBoostingRegressor::new())
                .name(),
            "Extreme Gradient Boosting"
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = fitted_snapshot();
        snapshot.save(dir.path()).expect("save");

        for file in ARTIFACT_FILES {
            assert!(dir.path().join(file).exists(), "{file} should exist");
        }

        let loaded = Snapshot::load(dir.path()).expect("load");
        assert_eq!(loaded.metadata.discount_model_name, "Linear Regression");
        assert_eq!(loaded.discount_features.len(), DISCOUNT_FEATURES.len());
        assert_eq!(loaded.codec.platforms(), snapshot.codec.platforms());

        // Loaded model predicts identically
        let x = Matrix::from_vec(1, 2, vec![2.5, 3.5]).expect("matrix");
        let before = snapshot.discount_model.predict(&x);
        let after = loaded.discount_model.predict(&x);
        assert!((before[0] - after[0]).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_missing_artifact_is_not_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = fitted_snapshot();
        snapshot.save(dir.path()).expect("save");

        fs::remove_file(dir.path().join("platform_model.ahr")).expect("remove");

        let err = Snapshot::load(dir.path()).expect_err("incomplete");
        assert!(matches!(err, AhorroError::NotReady { .. }));
        assert!(err.to_string().contains("platform_model.ahr"));
    }

    #[test]
    fn test_load_corrupt_artifact_is_not_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = fitted_snapshot();
        snapshot.save(dir.path()).expect("save");

        fs::write(dir.path().join("discount_scaler.ahr"), b"garbage").expect("write");

        let err = Snapshot::load(dir.path()).expect_err("corrupt");
        assert!(matches!(err, AhorroError::NotReady { .. }));
        assert!(err.to_string().contains("discount_scaler.ahr"));
    }

    #[test]
    fn test_load_empty_dir_is_not_ready() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Snapshot::load(dir.path()).expect_err("empty dir");
        assert!(matches!(err, AhorroError::NotReady { .. }));
        assert!(err.to_string().contains("discount_model.ahr"));
    }
}
