//! Training data model and sources.

use crate::error::{AhorroError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One historical product listing used for training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product category label, e.g. "Electronics".
    pub category: String,
    /// Selling platform label, e.g. "Amazon".
    pub platform: String,
    /// Listed price before discount.
    pub price: f32,
    /// Price after the discount was applied.
    pub discounted_price: f32,
    /// Observed discount percentage (the regression target).
    pub discount_percent: f32,
    /// Average customer rating.
    pub rating: f32,
    /// Units in stock at observation time.
    pub stock: f32,
}

/// A source of training products.
///
/// Implementations hand the trainer a fully materialized row set; the
/// trainer rejects empty sets with [`AhorroError::NoData`].
pub trait ProductSource {
    /// Loads all products from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    fn products(&self) -> Result<Vec<Product>>;

    /// Human-readable description used in error messages.
    fn describe(&self) -> String;

    /// Distinct category labels, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn categories(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> = self
            .products()?
            .into_iter()
            .map(|p| p.category)
            .collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }

    /// Distinct platform labels, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn platforms(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> = self
            .products()?
            .into_iter()
            .map(|p| p.platform)
            .collect();
        labels.sort();
        labels.dedup();
        Ok(labels)
    }
}

/// Loads products from a JSON file containing an array of records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading from the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ProductSource for JsonFileSource {
    fn products(&self) -> Result<Vec<Product>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| AhorroError::Serialization(format!("{}: {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory source, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    products: Vec<Product>,
}

impl InMemorySource {
    /// Wraps an owned row set.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl ProductSource for InMemorySource {
    fn products(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} rows)", self.products.len())
    }
}
