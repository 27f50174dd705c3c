use crate::config::types::{Config, CrawlerConfig, ExtractorConfig, TableConfig, UserAgentConfig};
use crate::ConfigError;

/// Upper bound on pages per site, matching the single-URL endpoint limit
const MAX_PAGES_LIMIT: u32 = 500;

/// Upper bound on concurrently crawled sites
const MAX_CONCURRENCY_LIMIT: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extractor_config(&config.extractor)?;
    validate_table_config(&config.table)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > MAX_PAGES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGES_LIMIT, config.max_pages
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.max_concurrency
        )));
    }

    if let Some(row_timeout) = config.row_timeout {
        if row_timeout < config.request_timeout {
            return Err(ConfigError::Validation(format!(
                "row_timeout ({}s) must not be shorter than request_timeout ({}s)",
                row_timeout, config.request_timeout
            )));
        }
    }

    if config.priority_keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "priority_keywords cannot contain empty entries".to_string(),
        ));
    }

    for ext in &config.asset_extensions {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent value cannot be empty".to_string(),
        ));
    }

    if config.value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user agent value cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates extractor tuning lists
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    for pattern in &config.placeholder_domains {
        validate_domain_pattern(pattern)?;
    }

    if config.ignored_local_parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "ignored_local_parts cannot contain empty entries".to_string(),
        ));
    }

    for ext in &config.asset_suffixes {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates table layout
fn validate_table_config(config: &TableConfig) -> Result<(), ConfigError> {
    for (field, value) in [
        ("url_column", &config.url_column),
        ("name_column", &config.name_column),
        ("email_column", &config.email_column),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
        }
    }

    if config.email_column == config.url_column {
        return Err(ConfigError::Validation(format!(
            "email_column '{}' would overwrite the url column",
            config.email_column
        )));
    }

    if config.separator.is_empty() {
        return Err(ConfigError::Validation(
            "separator cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a file extension entry such as ".png"
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    let valid = ext.len() > 1
        && ext.starts_with('.')
        && ext[1..].chars().all(|c| c.is_ascii_alphanumeric());

    if !valid {
        return Err(ConfigError::InvalidPattern(format!(
            "Extension '{}' must look like '.png'",
            ext
        )));
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(domain) => validate_domain_string(domain),
        None => validate_domain_string(pattern),
    }
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
