//! Configuration management for the extractor server
//!
//! All settings come from the environment (optionally seeded from a `.env`
//! file by `dotenvy`) and are loaded once at startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("{0}")]
    Constraint(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub llm: LlmConfig,
    pub rag: RagConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Size ceiling in bytes
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
    /// Lower-case extensions including the leading dot
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
    pub embedding_model: String,
    pub temperature: f32,
    /// Token count above which documents go through retrieval
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            cors: CorsConfig {
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            upload: UploadConfig::default(),
            llm: LlmConfig {
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".to_string(),
                model_name: "gpt-4".to_string(),
                embedding_model: "text-embedding-ada-002".to_string(),
                temperature: 0.0,
                max_tokens: 4000,
                timeout_secs: 60,
            },
            rag: RagConfig::default(),
            output: OutputConfig {
                dir: PathBuf::from("outputs"),
            },
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_mime_types: vec!["application/pdf".to_string()],
            allowed_extensions: vec![".pdf".to_string()],
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults, except `OPENAI_API_KEY`.
    /// Set-but-malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let config = Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or(&lookup, "SERVER_PORT", defaults.server.port)?,
            },
            cors: CorsConfig {
                allowed_origins: list_or(&lookup, "ALLOWED_ORIGINS", defaults.cors.allowed_origins),
            },
            upload: UploadConfig {
                max_file_size: parse_or(&lookup, "MAX_FILE_SIZE", defaults.upload.max_file_size)?,
                allowed_mime_types: list_or(
                    &lookup,
                    "ALLOWED_MIME_TYPES",
                    defaults.upload.allowed_mime_types,
                ),
                allowed_extensions: list_or(
                    &lookup,
                    "ALLOWED_EXTENSIONS",
                    defaults.upload.allowed_extensions,
                )
                .into_iter()
                .map(normalize_extension)
                .collect(),
            },
            llm: LlmConfig {
                api_key,
                base_url: lookup("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.llm.base_url),
                model_name: lookup("MODEL_NAME").unwrap_or(defaults.llm.model_name),
                embedding_model: lookup("EMBEDDING_MODEL").unwrap_or(defaults.llm.embedding_model),
                temperature: parse_or(&lookup, "TEMPERATURE", defaults.llm.temperature)?,
                max_tokens: parse_or(&lookup, "MAX_TOKENS", defaults.llm.max_tokens)?,
                timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", defaults.llm.timeout_secs)?,
            },
            rag: RagConfig {
                chunk_size: parse_or(&lookup, "CHUNK_SIZE", defaults.rag.chunk_size)?,
                chunk_overlap: parse_or(&lookup, "CHUNK_OVERLAP", defaults.rag.chunk_overlap)?,
                top_k: parse_or(&lookup, "RETRIEVAL_TOP_K", defaults.rag.top_k)?,
            },
            output: OutputConfig {
                dir: lookup("OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.output.dir),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }
        if self.upload.max_file_size == 0 {
            return Err(ConfigError::Constraint("MAX_FILE_SIZE must be positive".into()));
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Constraint("MAX_TOKENS must be positive".into()));
        }
        if self.rag.chunk_size == 0 {
            return Err(ConfigError::Constraint("CHUNK_SIZE must be positive".into()));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::Constraint(format!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.rag.chunk_overlap, self.rag.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(ConfigError::Constraint("RETRIEVAL_TOP_K must be positive".into()));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn list_or<F>(lookup: &F, key: &str, default: Vec<String>) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => {
            let items: Vec<String> = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if items.is_empty() {
                default
            } else {
                items
            }
        }
        None => default,
    }
}

fn normalize_extension(ext: String) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_api_key() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.model_name, "gpt-4");
        assert_eq!(config.llm.max_tokens, 4000);
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.chunk_overlap, 200);
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.upload.allowed_extensions, vec![".pdf"]);
        assert_eq!(config.output.dir, PathBuf::from("outputs"));
        assert_eq!(config.cors.allowed_origins.len(), 2);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("OPENAI_API_KEY"))));

        let result = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")]));
        assert!(matches!(result, Err(ConfigError::Missing("OPENAI_API_KEY"))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_TOKENS", "8000"),
            ("TEMPERATURE", "0.2"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("ALLOWED_EXTENSIONS", "PDF"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ]))
        .unwrap();

        assert_eq!(config.llm.max_tokens, 8000);
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.upload.allowed_extensions, vec![".pdf"]);
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_malformed_number_is_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_TOKENS", "lots"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "MAX_TOKENS", .. })
        ));
    }

    #[test]
    fn test_constraints() {
        let zero_size = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_FILE_SIZE", "0"),
        ]));
        assert!(matches!(zero_size, Err(ConfigError::Constraint(_))));

        let overlap = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CHUNK_SIZE", "100"),
            ("CHUNK_OVERLAP", "100"),
        ]));
        assert!(matches!(overlap, Err(ConfigError::Constraint(_))));
    }
}
