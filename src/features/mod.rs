//! Feature engineering for deal prediction.
//!
//! Turns raw product rows into the fixed-width numeric feature vectors
//! the two model stages consume. The bucket boundaries and feature
//! column orders here are load-bearing: they must match between
//! training and serving, so both paths go through this module.

use crate::data::Product;
use crate::error::{AhorroError, Result};
use crate::preprocessing::LabelEncoder;
use serde::{Deserialize, Serialize};

/// Column order of the discount regression features.
pub const DISCOUNT_FEATURES: [&str; 8] = [
    "platform_code",
    "category_code",
    "price",
    "rating",
    "stock",
    "price_bucket",
    "rating_bucket",
    "stock_bucket",
];

/// Column order of the platform classification features.
pub const PLATFORM_FEATURES: [&str; 7] = [
    "category_code",
    "price",
    "discount_percent",
    "rating",
    "stock",
    "price_bucket",
    "discount_effectiveness",
];

/// Discount percentages above this count as "high discount" for the
/// stratified platform split.
pub const HIGH_DISCOUNT_THRESHOLD: f32 = 20.0;

/// Price tier code: 0..=4 over fixed rupee boundaries.
#[must_use]
pub fn bucket_price(price: f32) -> f32 {
    if price < 1_000.0 {
        0.0
    } else if price < 5_000.0 {
        1.0
    } else if price < 15_000.0 {
        2.0
    } else if price < 30_000.0 {
        3.0
    } else {
        4.0
    }
}

/// Rating tier code: 0..=3 with inclusive upper bounds.
#[must_use]
pub fn bucket_rating(rating: f32) -> f32 {
    if rating <= 3.5 {
        0.0
    } else if rating <= 4.0 {
        1.0
    } else if rating <= 4.5 {
        2.0
    } else {
        3.0
    }
}

/// Stock tier code: 0..=3 with inclusive upper bounds.
#[must_use]
pub fn bucket_stock(stock: f32) -> f32 {
    if stock <= 50.0 {
        0.0
    } else if stock <= 150.0 {
        1.0
    } else if stock <= 300.0 {
        2.0
    } else {
        3.0
    }
}

/// Fraction of the original price removed by the discount.
///
/// # Errors
///
/// Returns [`AhorroError::Domain`] if the original price is not positive.
pub fn discount_effectiveness(price: f32, discounted_price: f32) -> Result<f32> {
    if price <= 0.0 {
        return Err(AhorroError::domain(format!(
            "price must be positive to compute discount effectiveness, got {price}"
        )));
    }
    Ok((price - discounted_price) / price)
}

/// Binary high-discount indicator used to stratify the platform split.
#[must_use]
pub fn high_discount(discount_percent: f32) -> usize {
    usize::from(discount_percent > HIGH_DISCOUNT_THRESHOLD)
}

/// Fixed inputs substituted for the product attributes a shopper's
/// query does not carry.
///
/// The rating bucket is derived from the assumed rating, but the stock
/// bucket is pinned rather than derived from the assumed stock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServingAssumptions {
    /// Assumed product rating.
    pub rating: f32,
    /// Assumed units in stock.
    pub stock: f32,
    /// Pinned stock tier code.
    pub stock_bucket: f32,
    /// Discount percentage fed to the platform stage before the
    /// discount stage has run.
    pub discount_estimate: f32,
    /// Effectiveness paired with the discount estimate.
    pub discount_effectiveness: f32,
}

impl Default for ServingAssumptions {
    fn default() -> Self {
        Self {
            rating: 4.0,
            stock: 200.0,
            stock_bucket: 2.0,
            discount_estimate: 15.0,
            discount_effectiveness: 0.15,
        }
    }
}

/// Encodes products and queries into model-ready feature rows.
///
/// Holds the two label dictionaries learned at training time. Every
/// path into the models funnels through `discount_row` / `platform_row`
/// so the column order cannot drift between training and serving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCodec {
    category_encoder: LabelEncoder,
    platform_encoder: LabelEncoder,
}

impl FeatureCodec {
    /// Learns both label dictionaries from training products.
    #[must_use]
    pub fn fit(products: &[Product]) -> Self {
        let categories: Vec<String> = products.iter().map(|p| p.category.clone()).collect();
        let platforms: Vec<String> = products.iter().map(|p| p.platform.clone()).collect();

        let mut category_encoder = LabelEncoder::for_field("category");
        category_encoder.fit(&categories);
        let mut platform_encoder = LabelEncoder::for_field("platform");
        platform_encoder.fit(&platforms);

        Self {
            category_encoder,
            platform_encoder,
        }
    }

    /// Encodes a category label.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for categories unseen at fit time.
    pub fn encode_category(&self, category: &str) -> Result<usize> {
        self.category_encoder.encode(category)
    }

    /// Encodes a platform label.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for platforms unseen at fit time.
    pub fn encode_platform(&self, platform: &str) -> Result<usize> {
        self.platform_encoder.encode(platform)
    }

    /// Decodes a platform code back to its label.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is out of range.
    pub fn decode_platform(&self, code: usize) -> Result<&str> {
        self.platform_encoder.decode(code)
    }

    /// Known category labels in code order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        self.category_encoder.classes()
    }

    /// Known platform labels in code order.
    #[must_use]
    pub fn platforms(&self) -> &[String] {
        self.platform_encoder.classes()
    }

    /// Number of distinct platforms.
    #[must_use]
    pub fn n_platforms(&self) -> usize {
        self.platform_encoder.n_classes()
    }

    /// Discount-stage feature row for a training product.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for unseen labels.
    pub fn discount_row(&self, product: &Product) -> Result<Vec<f32>> {
        let platform_code = self.encode_platform(&product.platform)? as f32;
        let category_code = self.encode_category(&product.category)? as f32;
        Ok(vec![
            platform_code,
            category_code,
            product.price,
            product.rating,
            product.stock,
            bucket_price(product.price),
            bucket_rating(product.rating),
            bucket_stock(product.stock),
        ])
    }

    /// Platform-stage feature row for a training product.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for unseen labels and
    /// [`AhorroError::Domain`] for non-positive prices.
    pub fn platform_row(&self, product: &Product) -> Result<Vec<f32>> {
        let category_code = self.encode_category(&product.category)? as f32;
        let effectiveness = discount_effectiveness(product.price, product.discounted_price)?;
        Ok(vec![
            category_code,
            product.price,
            product.discount_percent,
            product.rating,
            product.stock,
            bucket_price(product.price),
            effectiveness,
        ])
    }

    /// Discount-stage feature row at serving time.
    ///
    /// The shopper supplies a category and budget; the predicted
    /// platform code and the serving assumptions fill in the rest.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for an unseen category.
    pub fn serving_discount_row(
        &self,
        category: &str,
        budget: f32,
        platform_code: usize,
        assume: &ServingAssumptions,
    ) -> Result<Vec<f32>> {
        let category_code = self.encode_category(category)? as f32;
        Ok(vec![
            platform_code as f32,
            category_code,
            budget,
            assume.rating,
            assume.stock,
            bucket_price(budget),
            bucket_rating(assume.rating),
            assume.stock_bucket,
        ])
    }

    /// Platform-stage feature row at serving time.
    ///
    /// # Errors
    ///
    /// Returns [`AhorroError::UnknownLabel`] for an unseen category.
    pub fn serving_platform_row(
        &self,
        category: &str,
        budget: f32,
        assume: &ServingAssumptions,
    ) -> Result<Vec<f32>> {
        let category_code = self.encode_category(category)? as f32;
        Ok(vec![
            category_code,
            budget,
            assume.discount_estimate,
            assume.rating,
            assume.stock,
            bucket_price(budget),
            assume.discount_effectiveness,
        ])
    }
}
