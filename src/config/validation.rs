use crate::config::types::{
    ClassifierConfig, Config, CrawlerConfig, ExtractorConfig, OutputConfig, RecordField,
    SignatureConfig, SiteConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_extractor_config(&config.extractor)?;
    validate_output_config(&config.output)?;
    validate_classifier_config(&config.classifier)?;
    Ok(())
}

/// Validates the site origin and start page
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("origin", &config.origin)?;
    validate_http_url("start-url", &config.start_url)?;
    Ok(())
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be >= 100ms, got {}ms",
            config.delay_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates tag signatures and the attribute translation table
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    validate_signature("job", &config.job)?;
    validate_signature("title", &config.title)?;
    validate_signature("posted", &config.posted)?;
    validate_signature("next-page", &config.next_page)?;

    if config.fields.keys().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "extractor.fields cannot contain an empty attribute name".to_string(),
        ));
    }

    // Without a link attribute no record could ever carry a url
    if !config.fields.values().any(|f| *f == RecordField::Url) {
        return Err(ConfigError::Validation(
            "extractor.fields must map one attribute to 'url'".to_string(),
        ));
    }

    Ok(())
}

fn validate_signature(name: &str, signature: &SignatureConfig) -> Result<(), ConfigError> {
    if signature.tag.trim().is_empty()
        || signature.attribute.trim().is_empty()
        || signature.value.trim().is_empty()
    {
        return Err(ConfigError::Validation(format!(
            "extractor.{} needs a non-empty tag, attribute and value",
            name
        )));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }

    if config.rules_path.is_empty() {
        return Err(ConfigError::Validation(
            "rules-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.buzz_delimiter.is_empty() {
        return Err(ConfigError::Validation(
            "buzz-delimiter cannot be empty".to_string(),
        ));
    }
    Ok(())
}
