//! Core types: data frames, formulas, options and fit results.

mod formula;
mod frame;
mod options;
mod result;

pub use formula::{is_valid_name, Formula, FormulaError};
pub use frame::{DataFrame, FrameError};
pub use options::{validate_threshold, OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use result::{Inference, ParameterInference, RegressionResult};
