//! Query assembly

use crate::clause::Clause;
use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Boolean operator joining every clause of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }

    /// Literal separator placed between clauses
    pub fn separator(&self) -> &'static str {
        match self {
            Combinator::And => " and ",
            Combinator::Or => " or ",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Combinator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Combinator::And),
            "or" => Ok(Combinator::Or),
            other => Err(SearchError::invalid_input(format!(
                "unknown combining operator '{}', expected 'and' or 'or'",
                other
            ))),
        }
    }
}

/// Ordered clauses joined by one [`Combinator`].
///
/// Clauses are joined without parentheses. Mixing operators means nesting
/// a pre-rendered group through [`Clause::raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<Clause>,
    combinator: Combinator,
}

impl Query {
    pub fn new(clauses: Vec<Clause>, combinator: Combinator) -> Self {
        Self {
            clauses,
            combinator,
        }
    }

    /// Clauses joined with `and`
    pub fn all(clauses: Vec<Clause>) -> Self {
        Self::new(clauses, Combinator::And)
    }

    /// Clauses joined with `or`
    pub fn any(clauses: Vec<Clause>) -> Self {
        Self::new(clauses, Combinator::Or)
    }

    /// A query with no filter: everything the caller can see
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the query string, `None` when there is nothing to filter on
    pub fn render(&self) -> Option<String> {
        if self.clauses.is_empty() {
            return None;
        }
        let parts: Vec<&str> = self.clauses.iter().map(Clause::as_str).collect();
        Some(parts.join(self.combinator.separator()))
    }
}

impl From<Clause> for Query {
    fn from(clause: Clause) -> Self {
        Self::all(vec![clause])
    }
}
