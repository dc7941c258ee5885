use crate::error::{AdvisorError, Result};
use crate::models::Language;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agri-advisor";
const ENV_PREFIX: &str = "AGRI_ADVISOR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherConfig>,
    #[serde(default)]
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Rule table file; the built-in table is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Used when `advise` is given neither a location nor coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("enabled", &self.enabled)
            .field("location", &self.location)
            .finish()
    }
}

impl WeatherConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    Google,
    Azure,
    #[default]
    Dictionary,
}

impl TranslationProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationProvider::Google => "google",
            TranslationProvider::Azure => "azure",
            TranslationProvider::Dictionary => "dictionary",
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub provider: TranslationProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Azure resource region
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_source_language")]
    pub source_language: Language,
}

fn default_region() -> String {
    "global".into()
}

fn default_source_language() -> Language {
    Language::English
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            api_key: None,
            region: default_region(),
            timeout_secs: default_timeout_secs(),
            source_language: default_source_language(),
        }
    }
}

impl std::fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("timeout_secs", &self.timeout_secs)
            .field("source_language", &self.source_language)
            .finish()
    }
}

impl TranslationConfig {
    /// API key for the configured provider, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Config {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(AdvisorError::Config(format!(
                    "Config file not found at {:?}",
                    p
                )));
            }
            Some(p) => Some(p),
            None => Self::find_config_path().filter(|p| p.exists()),
        };

        let content = match &config_path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                std::fs::read_to_string(path)
                    .map_err(|e| AdvisorError::Config(format!("Failed to read config: {}", e)))?
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                String::new()
            }
        };

        Self::from_yaml(&content)
    }

    /// Parse a YAML document, substituting `${VAR}` placeholders and applying
    /// `AGRI_ADVISOR__SECTION__KEY` environment overrides.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let settings = config::Config::builder()
            .add_source(config::File::from_str(&content, config::FileFormat::Yaml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config: {}", e)))?;

        settings
            .try_deserialize()
            .map_err(|e| AdvisorError::Config(format!("Invalid config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
    }

    /// Path of the config file that `load` would read, if any.
    pub fn resolved_path(config_override: Option<&Path>) -> Option<PathBuf> {
        match config_override {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_path().filter(|p| p.exists()),
        }
    }

    /// Default path for writing new config files (~/.config/agri-advisor/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine config directory".into()))?
            .join(APP_DIR);
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to `target` (or the default path).
    pub fn setup_interactive(target: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up agri-advisor!");
        println!();

        println!("Rules (leave blank to use the built-in rule table)");
        let rules_path: String = Input::new()
            .with_prompt("  Rule file")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)?;

        let weather = if owm_api_key.is_empty() {
            None
        } else {
            let location: String = Input::new()
                .with_prompt("  Default location")
                .default(String::new())
                .allow_empty(true)
                .interact_text()
                .map_err(input_error)?;

            Some(WeatherConfig {
                api_key: owm_api_key,
                timeout_secs: default_timeout_secs(),
                enabled: true,
                location: Some(location).filter(|l| !l.trim().is_empty()),
            })
        };

        println!();

        println!("Translation");
        let providers = [
            TranslationProvider::Dictionary,
            TranslationProvider::Google,
            TranslationProvider::Azure,
        ];
        let labels: Vec<&str> = providers.iter().map(|p| p.as_str()).collect();
        let choice = Select::new()
            .with_prompt("  Provider")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(input_error)?;
        let provider = providers[choice];

        let (api_key, region) = match provider {
            TranslationProvider::Dictionary => (None, default_region()),
            _ => {
                let key: String = Password::new()
                    .with_prompt("  API key")
                    .allow_empty_password(true)
                    .interact()
                    .map_err(input_error)?;
                let region = if provider == TranslationProvider::Azure {
                    Input::new()
                        .with_prompt("  Region")
                        .default(default_region())
                        .interact_text()
                        .map_err(input_error)?
                } else {
                    default_region()
                };
                (Some(key).filter(|k| !k.is_empty()), region)
            }
        };

        println!();

        let config = Config {
            rules: RulesConfig {
                path: Some(rules_path)
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
            },
            weather,
            translation: TranslationConfig {
                provider,
                api_key,
                region,
                ..TranslationConfig::default()
            },
        };

        let config_path = match target {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agri-advisor configuration\n# Generated by `agri-advisor init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AdvisorError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

fn input_error(e: dialoguer::Error) -> AdvisorError {
    AdvisorError::Config(format!("Input error: {}", e))
}
