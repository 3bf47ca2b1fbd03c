//! Model formulas of the form `response ~ term + term + ...`.

use super::frame::{DataFrame, FrameError};
use std::fmt;
use thiserror::Error;

/// Errors raised while assembling or parsing a [`Formula`].
#[derive(Debug, Error, PartialEq)]
pub enum FormulaError {
    #[error("formula '{0}' is missing '~'")]
    MissingTilde(String),

    #[error("formula has no response variable")]
    MissingResponse,

    #[error("formula has no terms")]
    NoTerms,

    #[error("'{0}' is not a valid variable name")]
    InvalidName(String),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// A linear model formula: one response and an ordered list of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    response: String,
    terms: Vec<String>,
    intercept: bool,
}

impl Formula {
    /// Build a formula from names, validating every one of them.
    pub fn new<S: Into<String>>(
        response: impl Into<String>,
        terms: impl IntoIterator<Item = S>,
        intercept: bool,
    ) -> Result<Self, FormulaError> {
        let response = response.into();
        validate_name(&response)?;

        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        if terms.is_empty() {
            return Err(FormulaError::NoTerms);
        }
        for term in &terms {
            validate_name(term)?;
        }

        Ok(Self {
            response,
            terms,
            intercept,
        })
    }

    /// `target ~ f1 + f2 + ... + fn` from a frame's column order.
    pub fn from_frame(df: &DataFrame) -> Result<Self, FormulaError> {
        df.require_columns(2)?;
        Self::new(df.target_name(), df.feature_names().iter().cloned(), true)
    }

    /// Parse `y ~ a + b`. A `- 1` or `+ 0` term drops the intercept and a
    /// `+ 1` term is accepted as an explicit intercept.
    pub fn parse(s: &str) -> Result<Self, FormulaError> {
        let (lhs, rhs) = s
            .split_once('~')
            .ok_or_else(|| FormulaError::MissingTilde(s.to_string()))?;

        let response = lhs.trim();
        if response.is_empty() {
            return Err(FormulaError::MissingResponse);
        }

        let mut intercept = true;
        let mut terms = Vec::new();

        for (sign, token) in split_signed(rhs) {
            match (sign, token.as_str()) {
                ('-', "1") | ('+', "0") => intercept = false,
                ('+', "1") => intercept = true,
                ('+', name) if !name.is_empty() => {
                    if !terms.iter().any(|t| t == name) {
                        terms.push(name.to_string());
                    }
                }
                (_, other) => return Err(FormulaError::InvalidName(format!("{sign}{other}"))),
            }
        }

        Self::new(response, terms, intercept)
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    /// Error unless every variable in the formula is a frame column.
    pub fn check_against(&self, df: &DataFrame) -> Result<(), FormulaError> {
        df.column(&self.response)?;
        for term in &self.terms {
            df.column(term)?;
        }
        Ok(())
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.response, self.terms.join(" + "))?;
        if !self.intercept {
            write!(f, " - 1")?;
        }
        Ok(())
    }
}

/// A name usable inside a formula: `[A-Za-z_][A-Za-z0-9_.]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn validate_name(name: &str) -> Result<(), FormulaError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(FormulaError::InvalidName(name.to_string()))
    }
}

/// Split the right-hand side into `(sign, token)` pairs.
fn split_signed(rhs: &str) -> Vec<(char, String)> {
    let mut out = Vec::new();
    let mut sign = '+';
    let mut current = String::new();

    for c in rhs.chars() {
        if c == '+' || c == '-' {
            out.push((sign, current.trim().to_string()));
            current.clear();
            sign = c;
        } else {
            current.push(c);
        }
    }
    out.push((sign, current.trim().to_string()));

    // A leading empty token before the first operator is not a term.
    if out.len() > 1 && out[0].1.is_empty() {
        out.remove(0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_frame() {
        let df = DataFrame::new(vec![
            ("price", vec![1.0, 2.0]),
            ("sqft", vec![3.0, 4.0]),
            ("rooms", vec![5.0, 6.0]),
        ])
        .unwrap();

        let formula = Formula::from_frame(&df).unwrap();
        assert_eq!(formula.to_string(), "price ~ sqft + rooms");
        assert!(formula.has_intercept());
    }

    #[test]
    fn test_from_frame_needs_feature() {
        let df = DataFrame::new(vec![("y", vec![1.0, 2.0])]).unwrap();
        assert!(matches!(
            Formula::from_frame(&df),
            Err(FormulaError::Frame(FrameError::TooFewColumns { .. }))
        ));
    }

    #[test]
    fn test_rejects_operator_names() {
        let err = Formula::new("y", ["x-1.5"], true).unwrap_err();
        assert_eq!(err, FormulaError::InvalidName("x-1.5".into()));

        assert!(!is_valid_name("living area"));
        assert!(!is_valid_name("2x"));
        assert!(is_valid_name("_x2.log"));
    }

    #[test]
    fn test_parse() {
        let f = Formula::parse("y ~ a + b").unwrap();
        assert_eq!(f.response(), "y");
        assert_eq!(f.terms(), &["a".to_string(), "b".to_string()]);
        assert!(f.has_intercept());

        let f = Formula::parse("y~a+b-1").unwrap();
        assert!(!f.has_intercept());
        assert_eq!(f.to_string(), "y ~ a + b - 1");

        let f = Formula::parse("y ~ 0 + a").unwrap();
        assert!(!f.has_intercept());
        assert_eq!(f.terms(), &["a".to_string()]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Formula::parse("y a b"),
            Err(FormulaError::MissingTilde(_))
        ));
        assert_eq!(
            Formula::parse(" ~ a").unwrap_err(),
            FormulaError::MissingResponse
        );
        assert_eq!(Formula::parse("y ~ 1").unwrap_err(), FormulaError::NoTerms);
        assert!(Formula::parse("y ~ a - b").is_err());
    }
}
