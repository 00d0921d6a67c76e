//! Configuration management for apisplit
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (apisplit.toml)
//! - Environment variables (APISPLIT__*)
//!
//! ## Example config file (apisplit.toml):
//! ```toml
//! [split]
//! prefix_segments = 1
//! document_extension = "json"
//! generator_extension = "nswag"
//! registry_extension = "refs.json"
//! clean_output = true
//!
//! [codegen]
//! type_extension = "ts"
//! helpers_module = "jsonParse"
//! write_policy = "never"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::codegen::WritePolicy;

/// Main configuration for the splitter and the per-type generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Document splitting settings
    #[serde(default)]
    pub split: SplitConfig,

    /// Code generation settings
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Document splitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Number of leading path segments shared by all operations; the segment
    /// right after them is the group key
    #[serde(default = "default_prefix_segments")]
    pub prefix_segments: usize,

    /// Extension of the reduced per-group document
    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    /// Extension of generator configuration files
    #[serde(default = "default_generator_extension")]
    pub generator_extension: String,

    /// Extension of the persisted type reference registry
    #[serde(default = "default_registry_extension")]
    pub registry_extension: String,

    /// Empty the output directory before writing groups
    #[serde(default = "default_true")]
    pub clean_output: bool,
}

/// Code generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Extension of generated source files
    #[serde(default = "default_type_extension")]
    pub type_extension: String,

    /// Type name of the shared helpers module
    #[serde(default = "default_helpers_module")]
    pub helpers_module: String,

    /// What to do when a per-type file already exists
    #[serde(default)]
    pub write_policy: WritePolicy,
}

// Default value functions
fn default_prefix_segments() -> usize {
    1
}

fn default_document_extension() -> String {
    "json".to_string()
}

fn default_generator_extension() -> String {
    "nswag".to_string()
}

fn default_registry_extension() -> String {
    "refs.json".to_string()
}

fn default_type_extension() -> String {
    "ts".to_string()
}

fn default_helpers_module() -> String {
    "jsonParse".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            prefix_segments: default_prefix_segments(),
            document_extension: default_document_extension(),
            generator_extension: default_generator_extension(),
            registry_extension: default_registry_extension(),
            clean_output: true,
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            type_extension: default_type_extension(),
            helpers_module: default_helpers_module(),
            write_policy: WritePolicy::default(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from the default locations, then `config_path` when
    /// given, then `APISPLIT__*` environment variables
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["apisplit.toml", ".apisplit.toml", "config/apisplit.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "apisplit") {
            let xdg_config = config_dir.config_dir().join("apisplit.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (APISPLIT__*)
        builder = builder.add_source(
            Environment::with_prefix("APISPLIT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
