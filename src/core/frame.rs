//! Tabular data with named numeric columns.
//!
//! Column 0 is the target (dependent variable); every following column is
//! a feature. All columns are `f64` and share one row count.

use faer::{Col, Mat};
use thiserror::Error;

/// Errors raised while building or indexing a [`DataFrame`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("data frame must contain at least one column")]
    NoColumns,

    #[error("column '{name}' has {len} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        len: usize,
        expected: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("need at least {needed} columns, got {got}")]
    TooFewColumns { needed: usize, got: usize },
}

/// An ordered set of equally long, uniquely named numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl DataFrame {
    /// Build a frame from `(name, values)` pairs, in order.
    pub fn new<S, I>(columns: I) -> Result<Self, FrameError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vec<f64>)>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut values: Vec<Vec<f64>> = Vec::new();

        for (name, col) in columns {
            let name = name.into();
            if names.contains(&name) {
                return Err(FrameError::DuplicateColumn(name));
            }
            if let Some(first) = values.first() {
                if col.len() != first.len() {
                    return Err(FrameError::LengthMismatch {
                        name,
                        len: col.len(),
                        expected: first.len(),
                    });
                }
            }
            names.push(name);
            values.push(col);
        }

        if names.is_empty() {
            return Err(FrameError::NoColumns);
        }

        let n_rows = values[0].len();
        Ok(Self {
            names,
            columns: values,
            n_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Column names in order, target first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the target column (column 0).
    pub fn target_name(&self) -> &str {
        &self.names[0]
    }

    /// Names of the feature columns (columns 1..).
    pub fn feature_names(&self) -> &[String] {
        &self.names[1..]
    }

    /// Values of the target column.
    pub fn target(&self) -> &[f64] {
        &self.columns[0]
    }

    /// Column by position.
    pub fn column_at(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Result<&[f64], FrameError> {
        self.position(name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Error unless the frame has at least `needed` columns.
    pub fn require_columns(&self, needed: usize) -> Result<(), FrameError> {
        if self.n_columns() < needed {
            return Err(FrameError::TooFewColumns {
                needed,
                got: self.n_columns(),
            });
        }
        Ok(())
    }

    /// Target column as a `faer` vector.
    pub fn target_vector(&self) -> Col<f64> {
        let y = &self.columns[0];
        Col::from_fn(self.n_rows, |i| y[i])
    }

    /// Feature columns as an `n_rows × (n_columns - 1)` matrix.
    pub fn feature_matrix(&self) -> Mat<f64> {
        let features = &self.columns[1..];
        Mat::from_fn(self.n_rows, features.len(), |i, j| features[j][i])
    }

    /// Named columns as a matrix, in the order given.
    pub fn matrix_of<S: AsRef<str>>(&self, names: &[S]) -> Result<Mat<f64>, FrameError> {
        let cols = names
            .iter()
            .map(|n| self.column(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Mat::from_fn(self.n_rows, cols.len(), |i, j| cols[j][i]))
    }

    /// A new frame holding only the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame, FrameError> {
        let cols = names
            .iter()
            .map(|n| {
                let name = n.as_ref();
                self.column(name).map(|c| (name.to_string(), c.to_vec()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        DataFrame::new(cols)
    }

    /// A new frame with every column reordered by ascending values of `name`.
    ///
    /// The sort is stable; NaN values sort last.
    pub fn sort_by(&self, name: &str) -> Result<DataFrame, FrameError> {
        let key = self.column(name)?;
        let mut order: Vec<usize> = (0..self.n_rows).collect();
        order.sort_by(|&a, &b| key[a].total_cmp(&key[b]));

        let columns = self
            .columns
            .iter()
            .map(|col| order.iter().map(|&i| col[i]).collect())
            .collect();

        Ok(Self {
            names: self.names.clone(),
            columns,
            n_rows: self.n_rows,
        })
    }
}
