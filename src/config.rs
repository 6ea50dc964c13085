//! Folder filtering configuration.
//!
//! Decides which subdirectories of the root are eligible for organizing.
//! Rules are loaded from a TOML file and compiled once before a run:
//! - Hidden folder toggle
//! - Exact folder name matching
//! - Glob pattern matching against the folder name
//! - Regex pattern matching against the folder name
//! - Include patterns that override every exclude rule
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! include_hidden = true
//!
//! [filters.exclude]
//! names = ["node_modules", "$RECYCLE.BIN"]
//! patterns = ["tmp*"]
//! regex = ["^\\d{4}$"]
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Bucket directories are never candidates, whatever the rules say.

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the per-directory configuration file looked up in the root.
pub const LOCAL_CONFIG_FILE: &str = ".folder-organizer.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Root-level filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether folders starting with "." are organized. Defaults to true.
    #[serde(default = "default_include_hidden")]
    pub include_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            include_hidden: default_include_hidden(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

fn default_include_hidden() -> bool {
    true
}

/// Rules for leaving folders where they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact folder names (case-sensitive).
    #[serde(default)]
    pub names: Vec<String>,

    /// Glob patterns matched against the folder name.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the folder name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Glob patterns that override the exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.folder-organizer.toml` inside `root`
    /// 3. `$HOME/.config/folder-organizer/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = root.join(LOCAL_CONFIG_FILE);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("folder-organizer")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "loading configuration");
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the rules into matchers.
    pub fn compile(self) -> Result<FolderFilter, ConfigError> {
        FolderFilter::new(self.filters)
    }
}

/// Compiled filter rules, ready to test folder names.
#[derive(Debug, Clone)]
pub struct FolderFilter {
    include_hidden: bool,
    exclude_names: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl FolderFilter {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            exclude_names: rules.exclude.names.into_iter().collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// A filter that accepts every folder.
    pub fn accept_all() -> Self {
        Self {
            include_hidden: true,
            exclude_names: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Check whether a folder name should be organized.
    ///
    /// Order, with early return:
    /// 1. Include patterns - match means include
    /// 2. Hidden folder rule
    /// 3. Exact name
    /// 4. Glob patterns
    /// 5. Regex patterns
    /// 6. Default: include
    pub fn should_include(&self, folder_name: &str) -> bool {
        if self.include_patterns.iter().any(|p| p.matches(folder_name)) {
            return true;
        }

        if !self.include_hidden && folder_name.starts_with('.') {
            return false;
        }

        if self.exclude_names.contains(folder_name) {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(folder_name)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(folder_name))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
