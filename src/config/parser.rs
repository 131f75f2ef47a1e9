use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to record which configuration a harvest run was started
/// with, so changes between runs are visible in the logs.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[site]
base-url = "https://example.com"
listing-path = "/new"

[harvest]
max-retries = 3
retry-delay-ms = 300
page-delay-ms = 50
fetch-timeout-secs = 10
max-workers = 5
freshness = "yesterday"

[translation]
api-url = "https://translate.example.com/v2/translate"
api-key = "secret"
target-lang = "KO"

[output]
database-path = "./test.db"

[schedule]
interval-minutes = 60
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.site.listing_url(), "https://example.com/new");
        assert_eq!(config.harvest.max_retries, 3);
        assert_eq!(config.harvest.max_workers, 5);
        assert_eq!(config.translation.target_lang, "KO");
        assert_eq!(config.schedule.interval_minutes, 60);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let minimal = r#"
[site]
base-url = "https://example.com"
listing-path = "/new"

[harvest]

[output]
database-path = "./test.db"
"#;
        let file = create_temp_config(minimal);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.harvest.max_retries, 3);
        assert_eq!(config.harvest.freshness, crate::config::Freshness::Yesterday);
        assert!(config.translation.api_key.is_empty());
        assert_eq!(config.schedule.interval_minutes, 60);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let bad = VALID_CONFIG.replace("max-workers = 5", "max-workers = 0");
        let file = create_temp_config(&bad);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        assert_ne!(
            compute_config_hash(file1.path()).unwrap(),
            compute_config_hash(file2.path()).unwrap()
        );
    }
}
