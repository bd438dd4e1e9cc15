//! Chained inference over a loaded snapshot.
//!
//! Stage one picks the platform from the shopper's category and
//! budget, unless the query pins one. Stage two feeds the platform
//! code into the discount regressor. Neither stage sees the other's
//! internals; the only coupling is the platform code flowing between
//! the feature rows.

use crate::error::Result;
use crate::features::ServingAssumptions;
use crate::primitives::Matrix;
use crate::recommend::recommend;
use crate::snapshot::Snapshot;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Discounts are clamped into this range before pricing.
pub const DISCOUNT_MIN: f32 = 0.0;
/// Upper clamp for predicted discounts.
pub const DISCOUNT_MAX: f32 = 50.0;

/// Clamps a raw regressor output into the valid discount range.
#[must_use]
pub fn clamp_discount(discount: f32) -> f32 {
    discount.clamp(DISCOUNT_MIN, DISCOUNT_MAX)
}

fn default_category() -> String {
    "Electronics".to_string()
}

fn default_budget() -> f32 {
    5000.0
}

/// A shopper's deal query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealQuery {
    /// Product category to shop in.
    #[serde(default = "default_category")]
    pub category: String,
    /// Maximum spend.
    #[serde(default = "default_budget")]
    pub budget: f32,
    /// Preferred platform. When set, the classifier stage is skipped
    /// and the confidence is 100.
    #[serde(default)]
    pub platform: Option<String>,
}

impl Default for DealQuery {
    fn default() -> Self {
        Self {
            category: default_category(),
            budget: default_budget(),
            platform: None,
        }
    }
}

/// The predicted deal for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealPrediction {
    /// Expected discount percentage, one decimal.
    pub predicted_discount: f32,
    /// Platform most likely to carry the best deal.
    pub best_platform: String,
    /// Classifier confidence as a percentage, one decimal. Exactly
    /// 100.0 when the query pinned the platform.
    pub platform_confidence: f32,
    /// The shopper's budget, two decimals.
    pub estimated_price: f32,
    /// Budget after the expected discount, two decimals.
    pub discounted_price: f32,
    /// Budget minus the discounted price, two decimals.
    pub savings: f32,
    /// The queried category, echoed back.
    pub category: String,
    /// Shopper-facing advice.
    pub recommendations: Vec<String>,
    /// Display name of the discount regressor in use.
    pub model_used: String,
}

/// Runs both model stages against a trained snapshot.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    snapshot: Snapshot,
    assumptions: ServingAssumptions,
}

fn round_to(value: f32, decimals: u32) -> f32 {
    let factor = 10f32.powi(decimals as i32);
    (value * factor).round() / factor
}

impl InferencePipeline {
    /// Wraps a snapshot with the default serving assumptions.
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            assumptions: ServingAssumptions::default(),
        }
    }

    /// Overrides the serving assumptions.
    #[must_use]
    pub fn with_assumptions(mut self, assumptions: ServingAssumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    /// Metadata of the underlying snapshot.
    #[must_use]
    pub fn metadata(&self) -> &crate::snapshot::TrainingMetadata {
        &self.snapshot.metadata
    }

    /// Predicts the best platform and expected discount for a query.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AhorroError::UnknownLabel`] when the
    /// category or the pinned platform was not seen during training,
    /// or a scaling error when the snapshot's feature widths disagree
    /// with the codec.
    pub fn predict(&self, query: &DealQuery) -> Result<DealPrediction> {
        let (platform_code, platform, confidence) = match &query.platform {
            Some(preferred) => {
                let code = self.snapshot.codec.encode_platform(preferred)?;
                (code, preferred.clone(), 100.0)
            }
            None => {
                let (code, confidence) = self.predict_platform(query)?;
                let platform = self.snapshot.codec.decode_platform(code)?.to_string();
                (code, platform, confidence)
            }
        };
        debug!(platform = %platform, confidence, "platform stage done");

        let discount = clamp_discount(self.predict_discount(query, platform_code)?);
        debug!(discount, "discount stage done");

        let discounted_price = query.budget * (1.0 - discount / 100.0);
        let savings = query.budget - discounted_price;

        Ok(DealPrediction {
            predicted_discount: round_to(discount, 1),
            recommendations: recommend(discount, &platform, &query.category, query.budget),
            best_platform: platform,
            platform_confidence: round_to(confidence, 1),
            estimated_price: round_to(query.budget, 2),
            discounted_price: round_to(discounted_price, 2),
            savings: round_to(savings, 2),
            category: query.category.clone(),
            model_used: self.snapshot.metadata.discount_model_name.clone(),
        })
    }

    /// Classifier stage: platform code and confidence.
    fn predict_platform(&self, query: &DealQuery) -> Result<(usize, f32)> {
        let row = self.snapshot.codec.serving_platform_row(
            &query.category,
            query.budget,
            &self.assumptions,
        )?;
        debug_assert_eq!(row.len(), self.snapshot.platform_features.len());

        let x = Matrix::from_rows(&[row])?;
        let x = self.snapshot.platform_scaler.transform(&x)?;
        let proba = self.snapshot.platform_model.predict_proba(&x);

        let (_, n_classes) = proba.shape();
        let mut best_code = 0;
        let mut best_proba = f32::NEG_INFINITY;
        for code in 0..n_classes {
            let p = proba.get(0, code);
            if p > best_proba {
                best_proba = p;
                best_code = code;
            }
        }
        Ok((best_code, best_proba * 100.0))
    }

    /// Regressor stage: expected discount on the chosen platform.
    fn predict_discount(&self, query: &DealQuery, platform_code: usize) -> Result<f32> {
        let row = self.snapshot.codec.serving_discount_row(
            &query.category,
            query.budget,
            platform_code,
            &self.assumptions,
        )?;
        debug_assert_eq!(row.len(), self.snapshot.discount_features.len());

        let x = Matrix::from_rows(&[row])?;
        let x = self.snapshot.discount_scaler.transform(&x)?;
        Ok(self.snapshot.discount_model.predict(&x)[0])
    }
}
