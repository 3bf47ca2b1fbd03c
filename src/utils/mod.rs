//! Shared numeric helpers.

mod matrix;
mod moments;

pub use matrix::{center_columns, center_vector, detect_constant_columns, row_range};
pub use moments::{mean, sample_moments, Moments};
