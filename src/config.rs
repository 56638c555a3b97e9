//! Configuration module.
//!
//! Layered configuration:
//! - Default values
//! - TOML configuration file (`.codevision/settings.toml`, found by walking up
//!   from the current directory)
//! - Environment variable overrides
//! - CLI argument overrides (applied by the commands)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CV_` and use double underscores
//! to separate nested levels:
//! - `CV_INDEXING__PARALLEL_THREADS=8` sets `indexing.parallel_threads`
//! - `CV_LOGGING__DEFAULT=debug` sets `logging.default`
//! - `CV_RETRIEVE__MAX_CONTEXT_BYTES=50000` sets `retrieve.max_context_bytes`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory holding settings and the index, relative to the workspace root.
pub const CONFIG_DIR: &str = ".codevision";

/// Ignore file read by the walker in addition to `.gitignore`.
pub const IGNORE_FILE: &str = ".codevisionignore";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding `code_index.json`
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Workspace root directory (where .codevision is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub retrieve: RetrieveConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Number of parallel threads for extraction
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// File extensions treated as source files
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Patterns to ignore during indexing (gitignore syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Honour .gitignore files found in the tree
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Follow symbolic links while walking
    #[serde(default = "default_false")]
    pub follow_links: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MergeConfig {
    /// Files whose name contains any of these substrings are left out
    #[serde(default = "default_merge_excludes")]
    pub exclude_name_contains: Vec<String>,

    /// Width of the `=` separator line between files
    #[serde(default = "default_separator_width")]
    pub separator_width: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RetrieveConfig {
    /// Soft limit on the size of a retrieved source bundle
    #[serde(default = "default_max_context_bytes")]
    pub max_context_bytes: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for every target
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `indexer = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_index_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("index")
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_source_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_merge_excludes() -> Vec<String> {
    vec!["Assembly".to_string()]
}
fn default_separator_width() -> usize {
    80
}
fn default_max_context_bytes() -> usize {
    200_000
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            workspace_root: None,
            indexing: IndexingConfig::default(),
            merge: MergeConfig::default(),
            retrieve: RetrieveConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            source_extensions: default_source_extensions(),
            ignore_patterns: vec![
                "bin/**".to_string(),
                "obj/**".to_string(),
                ".git/**".to_string(),
                "*.generated.*".to_string(),
            ],
            respect_gitignore: true,
            follow_links: false,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            exclude_name_contains: default_merge_excludes(),
            separator_width: default_separator_width(),
        }
    }
}

impl Default for RetrieveConfig {
    fn default() -> Self {
        Self {
            max_context_bytes: default_max_context_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl IndexingConfig {
    /// Whether `path` carries one of the configured source extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.source_extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

fn env_provider() -> Env {
    // Double underscore separates nesting levels; single underscores stay.
    Env::prefixed("CV_").split("__")
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Find the workspace config by looking for a .codevision directory
    /// from the current directory up to the filesystem root.
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .codevision is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Index directory, resolved against the workspace root when relative.
    pub fn index_dir(&self) -> PathBuf {
        match &self.workspace_root {
            Some(root) if self.index_path.is_relative() => root.join(&self.index_path),
            _ => self.index_path.clone(),
        }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        let existed = config_path.exists();
        Settings::default().save(&config_path)?;
        if existed {
            println!("Overwrote configuration at: {}", config_path.display());
        } else {
            println!("Created default configuration at: {}", config_path.display());
        }

        Self::create_default_ignore_file(force)?;

        Ok(config_path)
    }

    /// Create a default .codevisionignore file with common .NET build output
    fn create_default_ignore_file(force: bool) -> Result<(), Box<dyn std::error::Error>> {
        let ignore_path = PathBuf::from(IGNORE_FILE);

        if !force && ignore_path.exists() {
            println!("Found existing {IGNORE_FILE} file");
            return Ok(());
        }

        let default_content = r#"# codevision ignore patterns (gitignore syntax)
# Files matching these patterns are not indexed or merged.

# Build output
bin/
obj/
out/
publish/

# IDE state
.vs/
.idea/
*.user

# Package restore
packages/

# Generated code
*.g.cs
*.g.i.cs
*.Designer.cs

# codevision's own directory
.codevision/
"#;

        std::fs::write(&ignore_path, default_content)?;
        println!("Created default {IGNORE_FILE} file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.index_path, PathBuf::from(".codevision/index"));
        assert!(settings.indexing.parallel_threads > 0);
        assert_eq!(settings.indexing.source_extensions, vec!["cs"]);
        assert_eq!(settings.merge.exclude_name_contains, vec!["Assembly"]);
        assert_eq!(settings.merge.separator_width, 80);
        assert_eq!(settings.logging.default, "warn");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
version = 2

[indexing]
parallel_threads = 4
ignore_patterns = ["custom/**"]
source_extensions = ["cs", "csx"]

[merge]
exclude_name_contains = ["Assembly", "Generated"]

[logging]
default = "info"

[logging.modules]
indexer = "debug"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert_eq!(settings.indexing.parallel_threads, 4);
        // Custom ignore patterns replace the defaults
        assert_eq!(settings.indexing.ignore_patterns, vec!["custom/**"]);
        assert_eq!(settings.indexing.source_extensions, vec!["cs", "csx"]);
        assert_eq!(settings.merge.exclude_name_contains.len(), 2);
        assert_eq!(settings.logging.default, "info");
        assert_eq!(settings.logging.modules["indexer"], "debug");
    }

    #[test]
    fn test_save_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.indexing.parallel_threads = 2;
        settings.retrieve.max_context_bytes = 1234;

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.indexing.parallel_threads, 2);
        assert_eq!(loaded.retrieve.max_context_bytes, 1234);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        fs::write(&config_path, "[indexing]\nparallel_threads = 16\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();

        assert_eq!(settings.indexing.parallel_threads, 16);
        // Defaults are still present
        assert_eq!(settings.version, 1);
        assert!(!settings.indexing.ignore_patterns.is_empty());
        assert_eq!(settings.retrieve.max_context_bytes, 200_000);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[merge]\nseparator_width = 40\n").unwrap();

        unsafe {
            std::env::set_var("CV_MERGE__SEPARATOR_WIDTH", "12");
        }
        let settings = Settings::load_from(&config_path).unwrap();
        unsafe {
            std::env::remove_var("CV_MERGE__SEPARATOR_WIDTH");
        }

        assert_eq!(settings.merge.separator_width, 12);
    }

    #[test]
    fn test_is_source_file() {
        let config = IndexingConfig::default();
        assert!(config.is_source_file(Path::new("src/Program.cs")));
        assert!(config.is_source_file(Path::new("src/Legacy.CS")));
        assert!(!config.is_source_file(Path::new("src/readme.md")));
        assert!(!config.is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn test_index_dir_resolves_against_workspace() {
        let mut settings = Settings::default();
        settings.workspace_root = Some(PathBuf::from("/work"));
        assert_eq!(settings.index_dir(), PathBuf::from("/work/.codevision/index"));

        settings.index_path = PathBuf::from("/abs/index");
        assert_eq!(settings.index_dir(), PathBuf::from("/abs/index"));
    }
}
