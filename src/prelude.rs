//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use ahorro::prelude::*;
//! ```

pub use crate::data::{InMemorySource, JsonFileSource, Product, ProductSource};
pub use crate::error::{AhorroError, Result};
pub use crate::features::{FeatureCodec, ServingAssumptions};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{accuracy_score, mae, mse, r_squared, rmse};
pub use crate::pipeline::{DealPrediction, DealQuery, InferencePipeline};
pub use crate::preprocessing::{LabelEncoder, StandardScaler};
pub use crate::primitives::{Matrix, Vector};
pub use crate::snapshot::Snapshot;
pub use crate::train::{Trainer, TrainerConfig, TrainingReport};
pub use crate::traits::{Estimator, Transformer};
pub use crate::tree::{
    DecisionTreeClassifier, DecisionTreeRegressor, ExtremeGradientBoostingRegressor,
    GradientBoostingRegressor, RandomForestClassifier, RandomForestRegressor,
};
