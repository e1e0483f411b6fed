use crate::config::types::{Config, OutputConfig, RepositoryConfig, SourcesConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_sources_config(&config.sources)?;
    validate_output_config(&config.output)?;
    validate_repository_config(&config.repository)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates that there is something to crawl
fn validate_sources_config(config: &SourcesConfig) -> Result<(), ConfigError> {
    if config.configured_count() == 0 {
        return Err(ConfigError::Validation(
            "at least one of sources.feeds, sources.sitemaps or sources.repositories must be set"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.page_index.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "page_index cannot be empty".to_string(),
        ));
    }

    if config.repository_index.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "repository_index cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates repository listing configuration
fn validate_repository_config(config: &RepositoryConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.host_root).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid host_root '{}': {}", config.host_root, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "host_root '{}' must use http or https",
            config.host_root
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "host_root '{}' has no host",
            config.host_root
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
