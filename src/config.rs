use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(&'static str),
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(name) => {
                write!(f, "{} is missing from environment variables", name)
            }
            ConfigError::InvalidValue {
                variable,
                value,
                reason,
            } => write!(f, "Invalid value {:?} for {}: {}", value, variable, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub database_url: String,
    pub vector_store_path: PathBuf,
    pub port: u16,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_k: usize,
    pub provider_timeout_secs: Option<u64>,
    pub provider_max_retries: u32,
    pub max_upload_bytes: usize,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_api_key =
            get("OPENAI_API_KEY").ok_or(ConfigError::MissingVariable("OPENAI_API_KEY"))?;

        let config = Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-ada-002".to_string()),
            database_url: get("DATABASE_URL").unwrap_or_else(|| "rag_chatbot.db".to_string()),
            vector_store_path: PathBuf::from(
                get("VECTOR_STORE_PATH").unwrap_or_else(|| "./vector_index".to_string()),
            ),
            port: parse_or("PORT", get("PORT"), 8000)?,
            chunk_size: parse_or("CHUNK_SIZE", get("CHUNK_SIZE"), 1000)?,
            chunk_overlap: parse_or("CHUNK_OVERLAP", get("CHUNK_OVERLAP"), 200)?,
            retrieval_k: parse_or("RETRIEVAL_K", get("RETRIEVAL_K"), 2)?,
            provider_timeout_secs: get("PROVIDER_TIMEOUT_SECS")
                .map(|v| parse("PROVIDER_TIMEOUT_SECS", v))
                .transpose()?,
            provider_max_retries: parse_or("PROVIDER_MAX_RETRIES", get("PROVIDER_MAX_RETRIES"), 0)?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                100 * 1024 * 1024,
            )?,
            log_file: get("LOG_FILE").map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                variable: "CHUNK_SIZE",
                value: self.chunk_size.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidValue {
                variable: "CHUNK_OVERLAP",
                value: self.chunk_overlap.to_string(),
                reason: format!("must be smaller than CHUNK_SIZE ({})", self.chunk_size),
            });
        }

        if self.retrieval_k == 0 {
            return Err(ConfigError::InvalidValue {
                variable: "RETRIEVAL_K",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn parse<T>(variable: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            variable,
            reason: e.to_string(),
            value,
        })
}

fn parse_or<T>(variable: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => parse(variable, value),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_api_key_is_required() {
        let result = AppConfig::from_lookup(lookup(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingVariable("OPENAI_API_KEY"))
        ));

        let blank = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "   ")]));
        assert!(matches!(blank, Err(ConfigError::MissingVariable(_))));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.retrieval_k, 2);
        assert_eq!(config.provider_timeout_secs, None);
        assert_eq!(config.provider_max_retries, 0);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "9001"),
            ("PROVIDER_TIMEOUT_SECS", "30"),
            ("LOG_FILE", "app.log"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.provider_timeout_secs, Some(30));
        assert_eq!(config.log_file, Some(PathBuf::from("app.log")));

        let invalid = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(
            invalid,
            Err(ConfigError::InvalidValue { variable: "PORT", .. })
        ));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let result = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CHUNK_SIZE", "100"),
            ("CHUNK_OVERLAP", "100"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                variable: "CHUNK_OVERLAP",
                ..
            })
        ));
    }
}
