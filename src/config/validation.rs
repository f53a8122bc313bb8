use crate::config::types::{Config, ExtractConfig, FeedConfig, FetchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_feed_config(&config.feed)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates HTTP request configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.retries > 10 {
        return Err(ConfigError::Validation(format!(
            "retries must be at most 10, got {}",
            config.retries
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates feed pagination configuration
fn validate_feed_config(config: &FeedConfig) -> Result<(), ConfigError> {
    if config.page_limit < 1 || config.page_limit > 250 {
        return Err(ConfigError::Validation(format!(
            "page-limit must be between 1 and 250, got {}",
            config.page_limit
        )));
    }

    if config.max_pages < 1 || config.max_pages > 100 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 100, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates extraction configuration
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.hero_cap < 1 || config.hero_cap > 100 {
        return Err(ConfigError::Validation(format!(
            "hero-cap must be between 1 and 100, got {}",
            config.hero_cap
        )));
    }

    Ok(())
}
