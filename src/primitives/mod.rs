//! Core numeric types: `Vector` and `Matrix`.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
