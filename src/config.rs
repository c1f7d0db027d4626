// Run-mode configuration
//
// Each run mode (GPU type plus toolchain flavor, e.g. "h100_pytorch" or
// "h100_triton_main") has its own skip list. By convention the list for mode M
// lives at <skip_dir>/skip_tests_M.yaml; a TOML config can point individual
// modes elsewhere and choose the duplicate-key policy.

use crate::skiplist::{DuplicatePolicy, LoadOptions, SkipList};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory searched for skip lists when no config says otherwise
pub const DEFAULT_SKIP_DIR: &str = "skip_lists";

/// Configuration for locating and loading per-mode skip lists
///
/// # Example TOML
/// ```toml
/// skip_dir = "test/test_gpu"
/// default_mode = "h100_pytorch"
/// duplicate_keys = "reject"
///
/// [modes]
/// fbcode = "internal/skip_tests_fbcode.yaml"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkipConfig {
    /// Directory holding skip_tests_<mode>.yaml files
    pub skip_dir: PathBuf,

    /// Mode used when none is given explicitly
    pub default_mode: Option<String>,

    /// Policy for operators listed twice in one file
    pub duplicate_keys: DuplicatePolicy,

    /// Per-mode file overrides; relative paths are resolved against `skip_dir`
    pub modes: BTreeMap<String, PathBuf>,
}

impl Default for SkipConfig {
    fn default() -> Self {
        Self {
            skip_dir: PathBuf::from(DEFAULT_SKIP_DIR),
            default_mode: None,
            duplicate_keys: DuplicatePolicy::LastWins,
            modes: BTreeMap::new(),
        }
    }
}

impl SkipConfig {
    /// Load configuration from a TOML file
    ///
    /// A relative `skip_dir` is taken relative to the config file's directory.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.skip_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.skip_dir = parent.join(&config.skip_dir);
            }
        }
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid skip-list configuration")?;
        for mode in config.modes.keys() {
            validate_mode_name(mode)?;
        }
        if let Some(mode) = &config.default_mode {
            validate_mode_name(mode)?;
        }
        Ok(config)
    }

    /// Pick the run mode: the explicit one if given, else the configured default
    pub fn resolve_mode<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str> {
        let mode = match explicit.or(self.default_mode.as_deref()) {
            Some(mode) => mode,
            None => bail!("No run mode given and no default_mode configured"),
        };
        validate_mode_name(mode)?;
        Ok(mode)
    }

    /// Path of the skip list for `mode`
    pub fn skip_file_for(&self, mode: &str) -> Result<PathBuf> {
        validate_mode_name(mode)?;
        let path = match self.modes.get(mode) {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.skip_dir.join(path),
            None => self.skip_dir.join(format!("skip_tests_{}.yaml", mode)),
        };
        tracing::debug!(mode, path = %path.display(), "Resolved skip list for run mode");
        Ok(path)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            duplicates: self.duplicate_keys,
        }
    }

    /// Resolve the mode and load its skip list
    pub fn load_for_mode(&self, explicit: Option<&str>) -> Result<SkipList> {
        let mode = self.resolve_mode(explicit)?;
        let path = self.skip_file_for(mode)?;
        SkipList::from_file(&path, &self.load_options())
            .with_context(|| format!("Failed to load skip list for run mode '{}'", mode))
    }
}

/// Mode names become part of a file name, so they must not carry path syntax
fn validate_mode_name(mode: &str) -> Result<()> {
    if mode.is_empty() {
        bail!("Run mode name must not be empty");
    }
    let allowed = mode
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !allowed || mode.contains("..") {
        bail!(
            "Invalid run mode '{}': use letters, digits, '_', '-' or '.'",
            mode
        );
    }
    Ok(())
}
