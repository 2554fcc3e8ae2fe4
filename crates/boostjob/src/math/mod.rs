//! Dense row-major tables used for features and labels.
//!
//! `Array2` holds a feature table (rows are examples) and `Array1` a label
//! vector. Both keep their data in a single `Vec` so they can be handed to a
//! boosting engine as flat slices.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
