//! Configuration management for lint-sweep.
//!
//! Supports layered configuration: defaults → project → user → env

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the project-level configuration file
pub const PROJECT_CONFIG_FILE: &str = "lint-sweep.toml";

/// Prefix for environment variable overrides (`LINT_SWEEP_TOKEN`, ...)
pub const ENV_PREFIX: &str = "LINT_SWEEP";

const DEFAULT_CONFIG: &str = include_str!("../default_config.toml");

/// Validated configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bearer credential for the search API
    #[serde(default)]
    pub token: String,
    /// Root directory for all clone targets
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,
    /// Substrings; a repository whose name contains any of them is skipped
    #[serde(default)]
    pub excluded_names: Vec<String>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub linter: LinterConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Load configuration with hierarchy: defaults → project → user → env
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        // 1. Start with defaults
        let mut builder = Config::builder().add_source(File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        // 2. Project-specific config (lint-sweep.toml in the working directory)
        if let Some(root) = project_root {
            let project_config = root.join(PROJECT_CONFIG_FILE);
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
        }

        // 3. User config (~/.config/lint-sweep/config.toml)
        if let Some(config_dir) = directories::ProjectDirs::from("org", "lint-sweep", "lint-sweep")
        {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. Environment variables (LINT_SWEEP_*)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("excluded_names")
                .with_list_parse_key("linter.args")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        loaded.validate()
    }

    /// Parse a TOML document layered over the built-in defaults
    pub fn from_toml(overrides: &str) -> Result<Self, ConfigError> {
        use config::{Config, File, FileFormat};

        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        loaded.validate()
    }

    /// Check required values and normalize the denylist
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "token is required (set {}_TOKEN)",
                ENV_PREFIX
            )));
        }
        if self.linter.args.is_empty() {
            return Err(ConfigError::Invalid(
                "linter.args must list at least one argument".to_string(),
            ));
        }
        if self.execution.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "execution.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.execution.clone_timeout_secs == 0 || self.execution.lint_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "execution timeouts must be at least 1 second".to_string(),
            ));
        }
        if self.search.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "search.timeout_secs must be at least 1 second".to_string(),
            ));
        }
        if let LinterSource::Build { clone_url, .. } = &self.linter.source {
            if clone_url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "linter.source.clone_url is required for the build strategy".to_string(),
                ));
            }
        }

        // An empty substring would match every repository
        self.excluded_names.retain(|name| !name.trim().is_empty());

        Ok(self)
    }
}

fn default_projects_dir() -> PathBuf {
    PathBuf::from("projects")
}

/// Repository search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_search_url(),
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_search_url() -> String {
    "https://api.github.com/search/repositories?q=language:go&stars:>500".to_string()
}

fn default_search_timeout_secs() -> u64 {
    60
}

/// Linter acquisition and invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    #[serde(default)]
    pub source: LinterSource,
    /// File name of the binary produced by the build strategy
    #[serde(default = "default_binary_name")]
    pub binary_name: String,
    /// Scratch directory for the build strategy (defaults under the OS temp dir)
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
    /// Static arguments passed to every lint invocation
    #[serde(default)]
    pub args: Vec<String>,
}

impl LinterConfig {
    /// Directory the build strategy works in
    pub fn build_dir(&self) -> PathBuf {
        self.build_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("lint-sweep"))
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            source: LinterSource::default(),
            binary_name: default_binary_name(),
            build_dir: None,
            args: Vec::new(),
        }
    }
}

fn default_binary_name() -> String {
    "linter".to_string()
}

/// How the linter binary is obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum LinterSource {
    /// Use an existing executable as-is
    Binary { path: PathBuf },
    /// Clone the linter repository and compile it
    Build {
        clone_url: String,
        #[serde(default = "default_main_path")]
        main_path: String,
        #[serde(default = "default_toolchain")]
        toolchain: String,
    },
}

impl Default for LinterSource {
    fn default() -> Self {
        Self::Binary {
            path: PathBuf::from("golangci-lint"),
        }
    }
}

fn default_main_path() -> String {
    ".".to_string()
}

fn default_toolchain() -> String {
    "go".to_string()
}

/// Fan-out limits and subprocess settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Upper bound on concurrently running clone or lint subprocesses
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_subprocess_timeout_secs")]
    pub clone_timeout_secs: u64,
    #[serde(default = "default_subprocess_timeout_secs")]
    pub lint_timeout_secs: u64,
    /// Version-control executable used for clone and fetch
    #[serde(default = "default_vcs_binary")]
    pub vcs_binary: String,
}

impl ExecutionConfig {
    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }

    pub fn lint_timeout(&self) -> Duration {
        Duration::from_secs(self.lint_timeout_secs)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            clone_timeout_secs: default_subprocess_timeout_secs(),
            lint_timeout_secs: default_subprocess_timeout_secs(),
            vcs_binary: default_vcs_binary(),
        }
    }
}

fn default_max_concurrency() -> usize {
    8
}

fn default_subprocess_timeout_secs() -> u64 {
    600
}

fn default_vcs_binary() -> String {
    "git".to_string()
}

/// Report rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

/// Output format for the final report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
