//! Rendered query clauses and value escaping

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One filter fragment in the Drive query grammar, e.g. `name contains 'x'`.
///
/// Clauses produced by [`crate::search_terms`] are always well formed. Use
/// [`Clause::raw`] for hand-written fragments; it rejects text that would
/// break the surrounding query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Clause(String);

impl Clause {
    pub(crate) fn rendered(text: String) -> Self {
        Self(text)
    }

    /// Accept a caller-written clause
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] when the text is blank or leaves
    /// a single-quoted literal open.
    pub fn raw(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SearchError::invalid_input("clause must not be empty"));
        }
        if has_open_literal(&text) {
            return Err(SearchError::invalid_input(format!(
                "clause has an unterminated quoted value: {}",
                text
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Folder ID when the clause is exactly `'<id>' in parents`
    pub(crate) fn parent_scope(&self) -> Option<String> {
        let literal = self.0.trim().strip_suffix(" in parents")?;
        let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;

        let mut id = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => id.push(chars.next()?),
                // An unescaped quote means more than one literal
                '\'' => return None,
                other => id.push(other),
            }
        }
        Some(id)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Clause {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escape a value for use inside a single-quoted literal
///
/// Backslashes are doubled first, then quotes are backslash-escaped.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            other => out.push(other),
        }
    }
    out
}

/// Quote a value as a literal: `'value'`
pub(crate) fn quote(value: &str) -> String {
    format!("'{}'", escape(value))
}

fn has_open_literal(text: &str) -> bool {
    let mut in_literal = false;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if in_literal => {
                chars.next();
            }
            '\'' => in_literal = !in_literal,
            _ => {}
        }
    }
    in_literal
}
