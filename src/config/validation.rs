use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, SourceConfig};
use crate::profile::FieldSelectorProfile;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_source_config(&config.source)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Largest accepted end ID; the loop advances past it to terminate
pub const MAX_END_ID: u64 = u64::MAX - 1;

/// Validates an article ID range
///
/// Shared by the config file checks and the run-level overrides.
///
/// # Arguments
///
/// * `start_id` - Explicit first ID, if any
/// * `end_id` - Last ID (inclusive)
pub fn validate_id_range(start_id: Option<u64>, end_id: u64) -> Result<(), ConfigError> {
    if end_id < 1 || end_id > MAX_END_ID {
        return Err(ConfigError::Validation(format!(
            "end_id must be between 1 and {}, got {}",
            MAX_END_ID, end_id
        )));
    }

    if let Some(start_id) = start_id {
        if start_id < 1 || start_id > end_id {
            return Err(ConfigError::Validation(format!(
                "start_id must be between 1 and end_id ({}), got {}",
                end_id, start_id
            )));
        }
    }

    Ok(())
}

/// Validates the ID range and cadence settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_id_range(config.start_id, config.end_id)?;

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint_interval must be >= 1, got {}",
            config.checkpoint_interval
        )));
    }

    if config.pacing_min_ms > config.pacing_max_ms {
        return Err(ConfigError::Validation(format!(
            "pacing_min_ms ({}) cannot exceed pacing_max_ms ({})",
            config.pacing_min_ms, config.pacing_max_ms
        )));
    }

    Ok(())
}

/// Validates the source URL template and selector profile
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    let url = config.article_url(1)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "url_template must use http or https, got '{}'",
            url.scheme()
        )));
    }

    // Compiles every selector, surfacing syntax errors at load time
    FieldSelectorProfile::from_config(&config.profile)?;

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_path.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint_path cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_path == config.path {
        return Err(ConfigError::Validation(
            "checkpoint_path must differ from the output path".to_string(),
        ));
    }

    Ok(())
}
