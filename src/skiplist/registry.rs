use super::entry::{Exclusion, ExclusionEntry, ExclusionStatus};
use super::error::{MalformedInput, Result, SkipListError};
use super::parse::{self, RawDocument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// How repeated operator keys in one document are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the last value and log a warning
    #[default]
    LastWins,
    /// Fail the load
    Reject,
}

/// Options applied while loading a skip list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub duplicates: DuplicatePolicy,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

/// Immutable registry of skipped operators and implementations
///
/// Loaded once before a benchmark run and then only read. Lookups are plain
/// map membership tests and never fail: unknown names are simply not excluded.
///
/// # Example
/// ```
/// use benchskip::skiplist::{LoadOptions, SkipList};
///
/// let skips = SkipList::from_yaml_str(
///     "gemm:\n  - triton_tma_persistent_matmul\nragged_attention:\n",
///     &LoadOptions::default(),
/// )?;
/// assert!(!skips.is_operator_excluded("gemm"));
/// assert!(skips.is_implementation_excluded("gemm", "triton_tma_persistent_matmul"));
/// assert!(!skips.is_active("ragged_attention", "anything"));
/// assert!(skips.is_active("unknown_op", "x"));
/// # Ok::<(), benchskip::skiplist::SkipListError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    operators: HashMap<String, Exclusion>,
}

impl SkipList {
    /// Registry that skips nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a skip list from YAML text
    ///
    /// # Errors
    /// Returns [`SkipListError::Malformed`] if the text is not a mapping from
    /// operator names to either nothing or a list of implementation names, and
    /// [`SkipListError::DuplicateOperator`] if an operator repeats under
    /// [`DuplicatePolicy::Reject`].
    ///
    /// # Example YAML
    /// ```yaml
    /// gemm:
    ///   # FIXME: tma kernels fail on this runner
    ///   - triton_tma_persistent_matmul
    /// ragged_attention:
    /// ```
    pub fn from_yaml_str(text: &str, options: &LoadOptions) -> Result<Self> {
        let entries = match parse::parse_document(text)? {
            RawDocument::Empty => Vec::new(),
            RawDocument::Mapping(entries) => entries,
            RawDocument::Other(found) => {
                return Err(MalformedInput::NotAMapping { found }.into());
            }
        };

        let mut operators: HashMap<String, Exclusion> = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let operator = parse::operator_name(key)?;
            let names = parse::implementation_names(&operator, value)?;
            let exclusion = collapse_duplicates(&operator, names);

            if operators.contains_key(&operator) {
                match options.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(SkipListError::DuplicateOperator(operator));
                    }
                    DuplicatePolicy::LastWins => {
                        tracing::warn!(
                            operator = %operator,
                            "Operator listed more than once in skip list; keeping the last entry"
                        );
                    }
                }
            }
            operators.insert(operator, exclusion);
        }

        tracing::debug!(operators = operators.len(), "Loaded skip list");
        Ok(Self { operators })
    }

    /// Load a skip list from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SkipListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Reading skip list");
        Self::from_yaml_str(&text, options)
    }

    /// Build a skip list from (operator, implementations) pairs
    ///
    /// An empty implementation list skips the whole operator. Later pairs for
    /// the same operator replace earlier ones.
    pub fn from_entries<I, O, L, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (O, L)>,
        O: Into<String>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let operators = entries
            .into_iter()
            .map(|(operator, implementations)| {
                (
                    operator.into(),
                    Exclusion::from_implementations(implementations),
                )
            })
            .collect();
        Self { operators }
    }

    /// True only if the whole operator is skipped
    ///
    /// An operator listed with specific implementations is partially excluded
    /// and returns false here.
    pub fn is_operator_excluded(&self, operator: &str) -> bool {
        matches!(self.operators.get(operator), Some(Exclusion::Entire))
    }

    /// True if this implementation of the operator is skipped
    pub fn is_implementation_excluded(&self, operator: &str, implementation: &str) -> bool {
        self.operators
            .get(operator)
            .is_some_and(|exclusion| exclusion.covers(implementation))
    }

    /// Whether the harness should run this operator/implementation pair
    pub fn is_active(&self, operator: &str, implementation: &str) -> bool {
        !self.is_implementation_excluded(operator, implementation)
    }

    pub fn status(&self, operator: &str) -> ExclusionStatus {
        match self.operators.get(operator) {
            None => ExclusionStatus::NotExcluded,
            Some(Exclusion::Entire) => ExclusionStatus::Entire,
            Some(Exclusion::Implementations(_)) => ExclusionStatus::Partial,
        }
    }

    /// Keep the candidates that should run, in their original order
    pub fn active_implementations<I>(&self, operator: &str, candidates: I) -> Vec<I::Item>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        candidates
            .into_iter()
            .filter(|candidate| self.is_active(operator, candidate.as_ref()))
            .collect()
    }

    pub fn get(&self, operator: &str) -> Option<&Exclusion> {
        self.operators.get(operator)
    }

    /// Operator names in sorted order
    pub fn operators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Entries in sorted operator order
    pub fn iter(&self) -> impl Iterator<Item = ExclusionEntry<'_>> {
        let mut entries: Vec<ExclusionEntry<'_>> = self
            .operators
            .iter()
            .map(|(operator, exclusion)| ExclusionEntry {
                operator: operator.as_str(),
                exclusion,
            })
            .collect();
        entries.sort_unstable_by(|a, b| a.operator.cmp(b.operator));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Serialize back to the declarative YAML format
    ///
    /// Operators and implementation names are sorted so the output is stable.
    /// Whole-operator entries are written as `null`.
    pub fn to_yaml_string(&self) -> std::result::Result<String, serde_yaml::Error> {
        if self.operators.is_empty() {
            return Ok(String::new());
        }
        serde_yaml::to_string(&self.sorted())
    }

    /// Sorted view used for YAML and JSON output
    pub fn sorted(&self) -> BTreeMap<&str, &Exclusion> {
        self.operators
            .iter()
            .map(|(operator, exclusion)| (operator.as_str(), exclusion))
            .collect()
    }
}

fn collapse_duplicates(operator: &str, names: Vec<String>) -> Exclusion {
    let listed = names.len();
    let exclusion = Exclusion::from_implementations(names);
    if let Exclusion::Implementations(set) = &exclusion {
        if set.len() < listed {
            tracing::warn!(
                operator = %operator,
                listed,
                unique = set.len(),
                "Duplicate implementation names in skip list entry"
            );
        }
    }
    exclusion
}
