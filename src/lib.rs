//! Ahorro: shopping deal prediction in pure Rust.
//!
//! Ahorro trains two chained models over a product catalog. A random
//! forest classifier picks the platform most likely to carry the best
//! deal for a category and budget, and the best of four candidate
//! regressors estimates the discount to expect there.
//!
//! # Quick Start
//!
//! ```
//! use ahorro::prelude::*;
//!
//! // Fit a regressor on y = 2*x + 1
//! let x = Matrix::from_vec(4, 1, vec![
//!     1.0,
//!     2.0,
//!     3.0,
//!     4.0,
//! ]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//! assert!(model.score(&x, &y) > 0.99);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: Product records and catalog sources
//! - [`features`]: Bucketing, label dictionaries, and feature rows
//! - [`linear_model`]: Ordinary least squares regression
//! - [`tree`]: Decision trees, random forests, and gradient boosting
//! - [`metrics`]: Regression and classification metrics
//! - [`model_selection`]: Train/test splitting, plain and stratified
//! - [`preprocessing`]: Standard scaling and label encoding
//! - [`train`]: Candidate selection and the full training flow
//! - [`snapshot`]: Trained artifact bundle with save/load
//! - [`serialization`]: The AHR1 artifact container
//! - [`pipeline`]: Chained platform-then-discount inference
//! - [`recommend`]: Shopper-facing advice for a predicted deal

pub mod data;
pub mod error;
pub mod features;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod recommend;
pub mod serialization;
pub mod snapshot;
pub mod train;
pub mod traits;
pub mod tree;
