//! Training orchestration for both model stages.
//!
//! The trainer encodes products into the two feature tables, fits four
//! candidate discount regressors, keeps the one with the best held-out
//! R², fits the platform classifier on a stratified split, and bundles
//! everything into a [`Snapshot`].

use crate::data::ProductSource;
use crate::error::{AhorroError, Result};
use crate::features::{high_discount, FeatureCodec, DISCOUNT_FEATURES, PLATFORM_FEATURES};
use crate::linear_model::LinearRegression;
use crate::metrics::{classification_report, mae, r_squared, rmse};
use crate::model_selection::{stratified_train_test_split, train_test_split};
use crate::preprocessing::StandardScaler;
use crate::primitives::{Matrix, Vector};
use crate::snapshot::{DiscountModel, Snapshot, TrainingMetadata};
use crate::traits::Transformer;
use crate::tree::{
    ExtremeGradientBoostingRegressor, GradientBoostingRegressor, RandomForestClassifier,
    RandomForestRegressor,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Hyperparameters for a training run.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Fraction of rows held out for evaluation.
    pub test_size: f32,
    /// Seed for the splits and the tree ensembles.
    pub random_state: u64,
    /// Trees per forest/boosting ensemble.
    pub n_estimators: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            n_estimators: 100,
        }
    }
}

/// Held-out metrics for one discount candidate.
#[derive(Debug, Clone)]
pub struct CandidateReport {
    /// Candidate display name.
    pub name: &'static str,
    /// Held-out R².
    pub r2: f32,
    /// Held-out root mean squared error.
    pub rmse: f32,
    /// Held-out mean absolute error.
    pub mae: f32,
}

/// Outcome of a full training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Per-candidate held-out metrics, in evaluation order.
    pub candidates: Vec<CandidateReport>,
    /// Display name of the winning discount regressor.
    pub best_model: String,
    /// Held-out R² of the winner.
    pub best_r2: f32,
    /// Held-out accuracy of the platform classifier.
    pub platform_accuracy: f32,
    /// Number of training rows.
    pub n_samples: usize,
}

/// Trains both stages and produces a snapshot.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Creates a trainer with the given hyperparameters.
    #[must_use]
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Runs the full training flow against a product source.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::NoData`] for an empty source, or any
    /// encoding/fitting error from the stages.
    pub fn train(&self, source: &dyn ProductSource) -> Result<(Snapshot, TrainingReport)> {
        let products = source.products()?;
        if products.is_empty() {
            return Err(AhorroError::NoData {
                source: source.describe(),
            });
        }
        let n_samples = products.len();
        info!(n_samples, "starting training run");

        let codec = FeatureCodec::fit(&products);
        debug!(
            categories = codec.categories().len(),
            platforms = codec.platforms().len(),
            "label dictionaries fitted"
        );

        // Discount stage
        let discount_rows: Vec<Vec<f32>> = products
            .iter()
            .map(|p| codec.discount_row(p))
            .collect::<Result<_>>()?;
        let x_discount = Matrix::from_rows(&discount_rows)?;
        let y_discount =
            Vector::from_vec(products.iter().map(|p| p.discount_percent).collect());

        let (x_train, x_test, y_train, y_test) = train_test_split(
            &x_discount,
            &y_discount,
            self.config.test_size,
            Some(self.config.random_state),
        )?;

        let mut discount_scaler = StandardScaler::new();
        let x_train_scaled = discount_scaler.fit_transform(&x_train)?;
        let x_test_scaled = discount_scaler.transform(&x_test)?;

        let (best_model, candidates) =
            self.select_discount_model(&x_train_scaled, &y_train, &x_test_scaled, &y_test)?;
        let best_r2 = best_model.score(&x_test_scaled, &y_test);
        info!(model = best_model.name(), r2 = best_r2, "discount model selected");

        // Platform stage
        let platform_rows: Vec<Vec<f32>> = products
            .iter()
            .map(|p| codec.platform_row(p))
            .collect::<Result<_>>()?;
        let x_platform = Matrix::from_rows(&platform_rows)?;
        let platform_labels: Vec<usize> = products
            .iter()
            .map(|p| codec.encode_platform(&p.platform))
            .collect::<Result<_>>()?;
        let y_platform = Vector::from_vec(platform_labels.iter().map(|&l| l as f32).collect());

        let high_discount_rows = products
            .iter()
            .filter(|p| high_discount(p.discount_percent) == 1)
            .count();
        info!(
            high_discount_rows,
            share = high_discount_rows as f32 / n_samples as f32,
            "high-discount rows in batch"
        );

        let (xp_train, xp_test, yp_train, yp_test) = stratified_train_test_split(
            &x_platform,
            &y_platform,
            &platform_labels,
            self.config.test_size,
            Some(self.config.random_state),
        )?;

        let mut platform_scaler = StandardScaler::new();
        let xp_train_scaled = platform_scaler.fit_transform(&xp_train)?;
        let xp_test_scaled = platform_scaler.transform(&xp_test)?;

        let yp_train_labels: Vec<usize> = yp_train.iter().map(|&v| v as usize).collect();
        let yp_test_labels: Vec<usize> = yp_test.iter().map(|&v| v as usize).collect();

        let mut platform_model = RandomForestClassifier::new(self.config.n_estimators)
            .with_max_depth(10)
            .with_random_state(self.config.random_state);
        platform_model.fit(&xp_train_scaled, &yp_train_labels)?;
        let platform_accuracy = platform_model.score(&xp_test_scaled, &yp_test_labels);
        info!(accuracy = platform_accuracy, "platform classifier fitted");

        let yp_pred = platform_model.predict(&xp_test_scaled);
        let per_class = classification_report(&yp_pred, &yp_test_labels, codec.n_platforms());
        for (code, report) in per_class.iter().enumerate() {
            if let Ok(label) = codec.decode_platform(code) {
                debug!(
                    platform = label,
                    precision = report.precision,
                    recall = report.recall,
                    f1 = report.f1,
                    "per-class report"
                );
            }
        }

        let metadata = TrainingMetadata {
            discount_model_name: best_model.name().to_string(),
            platform_model_name: "Random Forest Classifier".to_string(),
            discount_r2: best_r2,
            platform_accuracy,
            n_samples,
            trained_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        let report = TrainingReport {
            candidates,
            best_model: best_model.name().to_string(),
            best_r2,
            platform_accuracy,
            n_samples,
        };

        let snapshot = Snapshot {
            discount_model: best_model,
            discount_scaler,
            discount_features: DISCOUNT_FEATURES.iter().map(|s| (*s).to_string()).collect(),
            platform_model,
            platform_scaler,
            platform_features: PLATFORM_FEATURES.iter().map(|s| (*s).to_string()).collect(),
            codec,
            metadata,
        };

        Ok((snapshot, report))
    }

    /// Fits the four candidates and returns the best by held-out R².
    ///
    /// Strict comparison, so the first candidate wins ties in
    /// declaration order.
    fn select_discount_model(
        &self,
        x_train: &Matrix<f32>,
        y_train: &Vector<f32>,
        x_test: &Matrix<f32>,
        y_test: &Vector<f32>,
    ) -> Result<(DiscountModel, Vec<CandidateReport>)> {
        let seed = self.config.random_state;
        let n = self.config.n_estimators;

        let mut candidates = vec![
            DiscountModel::Linear(LinearRegression::new()),
            DiscountModel::RandomForest(
                RandomForestRegressor::new(n)
                    .with_max_depth(10)
                    .with_random_state(seed),
            ),
            DiscountModel::GradientBoosting(
                GradientBoostingRegressor::new()
                    .with_n_estimators(n)
                    .with_max_depth(5)
                    .with_learning_rate(0.1),
            ),
            DiscountModel::ExtremeGradientBoosting(
                ExtremeGradientBoostingRegressor::new()
                    .with_n_estimators(n)
                    .with_max_depth(6)
                    .with_learning_rate(0.1),
            ),
        ];

        let mut reports = Vec::with_capacity(candidates.len());
        let mut best_idx = 0;
        let mut best_r2 = f32::NEG_INFINITY;

        for (idx, candidate) in candidates.iter_mut().enumerate() {
            candidate.fit(x_train, y_train)?;
            let predictions = candidate.predict(x_test);
            let report = CandidateReport {
                name: candidate.name(),
                r2: r_squared(&predictions, y_test),
                rmse: rmse(&predictions, y_test),
                mae: mae(&predictions, y_test),
            };
            debug!(
                model = report.name,
                r2 = report.r2,
                rmse = report.rmse,
                mae = report.mae,
                "candidate evaluated"
            );

            if report.r2 > best_r2 {
                best_r2 = report.r2;
                best_idx = idx;
            }
            reports.push(report);
        }

        Ok((candidates.swap_remove(best_idx), reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InMemorySource, Product};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Synthetic rows where discount follows the price bucket and
    /// platform follows the category.
    fn synthetic_products(n: usize) -> Vec<Product> {
        let mut rng = StdRng::seed_from_u64(7);
        let categories = ["Books", "Electronics", "Fashion"];
        let platforms = ["Myntra", "Amazon", "Flipkart"];

        (0..n)
            .map(|i| {
                let cat_idx = i % categories.len();
                let price = rng.gen_range(500.0..40_000.0f32);
                let discount = 5.0 + (price / 40_000.0) * 30.0 + rng.gen_range(-2.0..2.0f32);
                Product {
                    category: categories[cat_idx].to_string(),
                    platform: platforms[cat_idx].to_string(),
                    price,
                    discounted_price: price * (1.0 - discount / 100.0),
                    discount_percent: discount,
                    rating: rng.gen_range(3.0..5.0),
                    stock: rng.gen_range(10.0..500.0),
                }
            })
            .collect()
    }

    #[test]
    fn test_train_empty_source_is_no_data() {
        let trainer = Trainer::default();
        let source = InMemorySource::new(vec![]);
        let err = trainer.train(&source).expect_err("empty source");
        assert!(matches!(err, AhorroError::NoData { .. }));
    }

    #[test]
    fn test_train_produces_snapshot_and_report() {
        let trainer = Trainer::new(TrainerConfig {
            n_estimators: 10,
            ..TrainerConfig::default()
        });
        let source = InMemorySource::new(synthetic_products(60));
        let (snapshot, report) = trainer.train(&source).expect("train");

        assert_eq!(report.candidates.len(), 4);
        assert_eq!(report.n_samples, 60);
        assert_eq!(snapshot.metadata.discount_model_name, report.best_model);
        assert_eq!(snapshot.discount_features.len(), 8);
        assert_eq!(snapshot.platform_features.len(), 7);
        assert_eq!(snapshot.codec.platforms().len(), 3);

        // The winner's R² must be the max over candidates
        let max_r2 = report
            .candidates
            .iter()
            .map(|c| c.r2)
            .fold(f32::NEG_INFINITY, f32::max);
        assert!((report.best_r2 - max_r2).abs() < 1e-5);
    }

    #[test]
    fn test_train_deterministic_with_same_seed() {
        let config = TrainerConfig {
            n_estimators: 5,
            ..TrainerConfig::default()
        };
        let source = InMemorySource::new(synthetic_products(40));

        let (_, a) = Trainer::new(config.clone()).train(&source).expect("train");
        let (_, b) = Trainer::new(config).train(&source).expect("train");

        assert_eq!(a.best_model, b.best_model);
        assert!((a.best_r2 - b.best_r2).abs() < 1e-6);
        assert!((a.platform_accuracy - b.platform_accuracy).abs() < 1e-6);
    }

    #[test]
    fn test_candidate_names_in_declaration_order() {
        let trainer = Trainer::new(TrainerConfig {
            n_estimators: 5,
            ..TrainerConfig::default()
        });
        let source = InMemorySource::new(synthetic_products(40));
        let (_, report) = trainer.train(&source).expect("train");

        let names: Vec<&str> = report.candidates.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "Linear Regression",
                "Random Forest",
                "Gradient Boosting",
                "Extreme Gradient Boosting"
            ]
        );
    }
}
