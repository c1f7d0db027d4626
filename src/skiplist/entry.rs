use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// What is skipped for one operator
///
/// An operator listed without implementations is skipped entirely. An operator
/// listed with implementations only skips those; the operator itself still runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Every implementation of the operator is skipped
    Entire,
    /// Only these implementations are skipped (never empty)
    Implementations(HashSet<String>),
}

impl Exclusion {
    /// Build from an implementation list; an empty list means the whole operator
    pub fn from_implementations<I, S>(implementations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = implementations.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Exclusion::Entire
        } else {
            Exclusion::Implementations(set)
        }
    }

    /// Whether `implementation` is skipped under this exclusion
    pub fn covers(&self, implementation: &str) -> bool {
        match self {
            Exclusion::Entire => true,
            Exclusion::Implementations(set) => set.contains(implementation),
        }
    }

    /// Implementation names in sorted order (empty for `Entire`)
    pub fn sorted_implementations(&self) -> Vec<&str> {
        match self {
            Exclusion::Entire => Vec::new(),
            Exclusion::Implementations(set) => {
                let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
                names.sort_unstable();
                names
            }
        }
    }
}

impl Serialize for Exclusion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Exclusion::Entire => serializer.serialize_none(),
            Exclusion::Implementations(_) => self.sorted_implementations().serialize(serializer),
        }
    }
}

/// One operator and what is skipped for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionEntry<'a> {
    pub operator: &'a str,
    pub exclusion: &'a Exclusion,
}

/// Three-way answer for an operator lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionStatus {
    /// Operator is not in the skip list
    NotExcluded,
    /// Some implementations of the operator are skipped
    Partial,
    /// The whole operator is skipped
    Entire,
}

impl ExclusionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExclusionStatus::NotExcluded => "not_excluded",
            ExclusionStatus::Partial => "partial",
            ExclusionStatus::Entire => "entire",
        }
    }
}

impl std::fmt::Display for ExclusionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
