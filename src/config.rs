use crate::parser::Conventions;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Upstream repository and local mirror
    #[serde(default)]
    pub sync: SyncConfig,
    /// Recipe database
    #[serde(default)]
    pub store: StoreConfig,
    /// Heading labels and URL bases of the recipe corpus
    #[serde(default)]
    pub conventions: Conventions,
    /// AI recipe generator
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Configuration for the repository mirror
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Git URL of the upstream recipe repository
    #[serde(default = "default_repo_url")]
    pub repo_url: String,
    /// Local checkout directory
    #[serde(default = "default_mirror_dir")]
    pub mirror_dir: PathBuf,
    /// Subdirectory of the checkout holding the recipes
    #[serde(default = "default_recipes_dir")]
    pub recipes_dir: String,
    /// Extension of recipe documents
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Use the existing checkout without cloning or pulling
    #[serde(default)]
    pub offline: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repo_url: default_repo_url(),
            mirror_dir: default_mirror_dir(),
            recipes_dir: default_recipes_dir(),
            extension: default_extension(),
            offline: false,
        }
    }
}

/// Configuration for the recipe database
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// SQLite database file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Configuration for the Gemini recipe generator
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// Model identifier (e.g., "gemini-1.5-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for authentication (can also be set via GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Base URL of the Generative Language API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_repo_url() -> String {
    "https://github.com/Anduin2017/HowToCook.git".to_string()
}

fn default_mirror_dir() -> PathBuf {
    PathBuf::from("HowToCook_Repo")
}

fn default_recipes_dir() -> String {
    "dishes".to_string()
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/recipes.sqlite")
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    60
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with HOWTOCOOK__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: HOWTOCOOK__SYNC__MIRROR_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: HOWTOCOOK__GENERATOR__API_KEY
        .add_source(
            Environment::with_prefix("HOWTOCOOK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
