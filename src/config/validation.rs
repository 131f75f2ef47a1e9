//! Configuration validation
//!
//! Checks that fail here would otherwise surface much later, in the middle
//! of a harvest cycle.

use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a loaded configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(config)?;
    validate_harvest(config)?;
    validate_schedule(config)?;
    Ok(())
}

fn validate_site(config: &Config) -> Result<(), ConfigError> {
    let base = Url::parse(&config.site.base_url)
        .map_err(|_| ConfigError::InvalidUrl(config.site.base_url.clone()))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got scheme '{}'",
            base.scheme()
        )));
    }

    if config.site.base_url.ends_with('/') {
        return Err(ConfigError::Validation(
            "base-url must not end with a trailing slash".to_string(),
        ));
    }

    if !config.site.listing_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "listing-path must start with '/', got '{}'",
            config.site.listing_path
        )));
    }

    Ok(())
}

fn validate_harvest(config: &Config) -> Result<(), ConfigError> {
    if config.harvest.max_retries == 0 {
        return Err(ConfigError::Validation(
            "max-retries must be at least 1".to_string(),
        ));
    }

    if config.harvest.max_workers == 0 {
        return Err(ConfigError::Validation(
            "max-workers must be at least 1".to_string(),
        ));
    }

    if config.harvest.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_schedule(config: &Config) -> Result<(), ConfigError> {
    if config.schedule.interval_minutes == 0 {
        return Err(ConfigError::Validation(
            "interval-minutes must be at least 1".to_string(),
        ));
    }
    Ok(())
}
