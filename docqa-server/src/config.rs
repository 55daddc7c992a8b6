//! Process configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use docqa_chat::{AssistantError, Result};
use docqa_rag::{FileType, RagConfig, openai::OPENAI_API_BASE};

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `None` when `OPENAI_API_KEY` is unset or blank.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub embedding_model: Option<String>,
    pub completion_model: Option<String>,
    pub data_dir: PathBuf,
    pub file_type: FileType,
    pub chunk_size: Option<usize>,
    pub top_k: Option<usize>,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: OPENAI_API_BASE.to_string(),
            embedding_model: None,
            completion_model: None,
            data_dir: PathBuf::from("data"),
            file_type: FileType::Docx,
            chunk_size: None,
            top_k: None,
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let file_type = match var("DOCQA_FILE_TYPE") {
            Some(value) => FileType::from_str(&value).map_err(configuration)?,
            None => defaults.file_type,
        };

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            embedding_model: var("OPENAI_EMBEDDING_MODEL"),
            completion_model: var("OPENAI_COMPLETION_MODEL"),
            data_dir: var("DOCQA_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            file_type,
            chunk_size: parse_var("DOCQA_CHUNK_SIZE", var("DOCQA_CHUNK_SIZE"))?,
            top_k: parse_var("DOCQA_TOP_K", var("DOCQA_TOP_K"))?,
            host: var("DOCQA_HOST").unwrap_or(defaults.host),
            port: parse_var("DOCQA_PORT", var("DOCQA_PORT"))?.unwrap_or(defaults.port),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Retrieval settings, overriding the defaults with any configured values.
    pub fn rag_config(&self) -> Result<RagConfig> {
        let defaults = RagConfig::default();
        RagConfig::builder()
            .chunk_size(self.chunk_size.unwrap_or(defaults.chunk_size))
            .chunk_overlap(defaults.chunk_overlap)
            .top_k(self.top_k.unwrap_or(defaults.top_k))
            .build()
            .map_err(configuration)
    }
}

fn configuration(err: impl std::fmt::Display) -> AssistantError {
    AssistantError::Configuration(err.to_string())
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>().map_err(|_| {
                AssistantError::Configuration(format!("{key} has an invalid value '{v}'"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert!(!config.has_credentials());
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.file_type, FileType::Docx);
        assert_eq!(config.port, 8501);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");

        let rag = config.rag_config().unwrap();
        assert_eq!(rag.chunk_size, 1000);
        assert_eq!(rag.top_k, 4);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(!config.has_credentials());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("DOCQA_FILE_TYPE", "pdf"),
            ("DOCQA_DATA_DIR", "/srv/docs"),
            ("DOCQA_CHUNK_SIZE", "500"),
            ("DOCQA_TOP_K", "2"),
            ("DOCQA_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.file_type, FileType::Pdf);
        assert_eq!(config.data_dir, PathBuf::from("/srv/docs"));
        assert_eq!(config.port, 9000);
        let rag = config.rag_config().unwrap();
        assert_eq!(rag.chunk_size, 500);
        assert_eq!(rag.top_k, 2);
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let err = config_from(&[("DOCQA_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");

        let err = config_from(&[("DOCQA_FILE_TYPE", "xlsx")]).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");

        let config = config_from(&[("DOCQA_TOP_K", "0")]).unwrap();
        assert_eq!(config.rag_config().unwrap_err().kind(), "ConfigurationError");
    }
}
