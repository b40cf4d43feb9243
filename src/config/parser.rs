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
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at startup so an output file can be traced back to the
/// configuration that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
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
    use crate::config::MissingFieldPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[site]
origin = "https://mirror.example.org"
page-size = 50

[http]
user-agent = "TestAgent/1.0"
timeout-secs = 5

[crawler]
page-delay-ms = 0
max-pages = 3
two-pass = true
missing-fields = "fill-forward"

[output]
schedule-path = "out/schedule.csv"
combinations-path = "out/combos.csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.origin, "https://mirror.example.org");
        assert_eq!(config.site.page_size, 50);
        assert_eq!(config.site.schedule_type, 3);
        assert_eq!(config.http.user_agent, "TestAgent/1.0");
        assert_eq!(config.crawler.max_pages, Some(3));
        assert!(config.crawler.two_pass);
        assert_eq!(
            config.crawler.missing_fields,
            MissingFieldPolicy::FillForward
        );
        assert_eq!(config.crawler.combination_delay_ms, 300);
        assert_eq!(config.output.combinations_path, "out/combos.csv");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.site.origin, "https://www.ccsd.org.uk");
        assert_eq!(config.site.listing_path, "/ccsdschedule/CCSDScheduleCode");
        assert_eq!(config.site.page_size, 20);
        assert!(config.site.include_inactive);
        assert_eq!(config.crawler.page_delay_ms, 500);
        assert_eq!(config.crawler.missing_fields, MissingFieldPolicy::Empty);
        assert!(!config.crawler.two_pass);
        assert_eq!(config.output.schedule_path, "ccsd.csv");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/ccsd.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_missing_field_policy_is_rejected() {
        let result = parse_config("[crawler]\nmissing-fields = \"guess\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[site]\npage-size = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("[site]\npage-size = 20\n");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[site]\npage-size = 20\n");
        let file2 = create_temp_config("[site]\npage-size = 40\n");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
