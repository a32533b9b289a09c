use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-field validation errors, as returned by 422 responses:
/// `{"errors": {"email": ["has already been taken"]}}`.
///
/// Forms render each entry as `{field} {message}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// A single-entry error map.
    ///
    /// Used to fold transport and server failures into the same shape
    /// forms render for validation errors.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), vec![message.into()]);
        Self(map)
    }

    /// Append one message to a field's list.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{} {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("validation: {0}")]
    Unprocessable(FieldErrors),

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Field-keyed rendering of any error.
    ///
    /// Validation errors pass through; everything else collapses to a
    /// single `error` entry with the display text.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ApiError::Unprocessable(errors) => errors.clone(),
            other => FieldErrors::single("error", other.to_string()),
        }
    }
}
