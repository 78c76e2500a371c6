//! Word-presence index over designated text fields.
//!
//! # Responsibility
//! - Tokenize text fields into lowercase words.
//! - Build the immutable per-record token set used by `$text` predicates.
//!
//! # Invariants
//! - Tokens are split on single spaces only; no stemming or punctuation
//!   stripping. Consecutive spaces yield an empty token.
//! - The index stores presence only, no frequency or position.

use crate::model::document::Document;
use crate::model::scalar::{Scalar, ScalarKind};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type IndexResult<T> = Result<T, IndexError>;

/// Raised when a designated text field cannot be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    MissingTextField { field: String },
    NonStringTextField { field: String, kind: ScalarKind },
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTextField { field } => {
                write!(f, "full-text field `{field}` is missing or not a scalar")
            }
            Self::NonStringTextField { field, kind } => {
                write!(f, "full-text field `{field}` must be a string, found {kind}")
            }
        }
    }
}

impl Error for IndexError {}

/// Lowercase token set derived from a record's text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextIndex {
    words: BTreeSet<String>,
}

impl TextIndex {
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Returns whether every word is present.
    pub fn contains_all<'a>(&self, mut words: impl Iterator<Item = &'a str>) -> bool {
        words.all(|word| self.contains(word))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Splits text on single spaces and lowercases every token.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(' ').map(str::to_lowercase)
}

/// Builds the token set for `document` from `text_fields`.
///
/// # Errors
/// - `MissingTextField` when a field has no scalar value.
/// - `NonStringTextField` when a field holds a boolean or number.
pub fn build_index<D: Document>(document: &D, text_fields: &[D::Field]) -> IndexResult<TextIndex> {
    let mut words = BTreeSet::new();

    for field in text_fields {
        let text = match document.scalar(field) {
            Some(Scalar::String(text)) => text,
            Some(other) => {
                return Err(IndexError::NonStringTextField {
                    field: field.as_ref().to_string(),
                    kind: other.kind(),
                })
            }
            None => {
                return Err(IndexError::MissingTextField {
                    field: field.as_ref().to_string(),
                })
            }
        };
        words.extend(tokenize(text.as_str()));
    }

    Ok(TextIndex { words })
}
