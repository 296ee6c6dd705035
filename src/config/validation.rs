use crate::config::types::{Config, OutputConfig, PolitenessConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on listing pages walked in one run
const MAX_PAGES: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_politeness_config(&config.politeness)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_crawler_name(&config.name)?;

    let root = Url::parse(&config.root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root '{}': {}", config.root, e)))?;

    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Root URL '{}' must use HTTP or HTTPS",
            config.root
        )));
    }

    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page_param cannot be empty".to_string(),
        ));
    }

    if config.pages < 1 || config.pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "pages must be between 1 and {}, got {}",
            MAX_PAGES, config.pages
        )));
    }

    if config.currency.len() != 3 || !config.currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "currency must be a three-letter uppercase code, got '{}'",
            config.currency
        )));
    }

    let pattern = config.host_pattern();
    if pattern.is_empty() || pattern.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidPattern(format!(
            "Host pattern '{}' must be non-empty and contain no whitespace",
            pattern
        )));
    }

    Ok(())
}

/// Crawler names key the cache directory, so keep them path-safe
fn validate_crawler_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "site name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "site name must contain only alphanumeric characters and hyphens, got '{}'",
            name
        )));
    }

    Ok(())
}

/// Validates politeness rules
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 || config.parallelism > 100 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and 100, got {}",
            config.parallelism
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
