//! Configuration validation.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Log levels accepted in `logging.level`.
pub const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Formats accepted in `logging.format`.
pub const VALID_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Targets accepted in `logging.target`.
pub const VALID_TARGETS: &[&str] = &["stderr", "stdout", "file"];

/// Rotation periods accepted in `logging.rotation`.
pub const VALID_ROTATIONS: &[&str] = &["daily", "hourly", "minutely", "never"];

/// Validate a deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_events(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_events(config: &Config) -> ConfigResult<()> {
    let events = &config.events;

    if events
        .flush_point
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(ConfigError::Invalid {
            field: "events.flush_point",
            reason: "handler name must not be empty".to_owned(),
        });
    }

    let mut seen = HashSet::new();
    for name in &events.error_handlers {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "events.error_handlers",
                reason: "handler name must not be empty".to_owned(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::Invalid {
                field: "events.error_handlers",
                reason: format!("handler '{name}' is listed more than once"),
            });
        }
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let logging = &config.logging;

    let level = logging.level.trim().to_ascii_lowercase();
    if !VALID_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Invalid {
            field: "logging.level",
            reason: unsupported("log level", &logging.level, VALID_LEVELS),
        });
    }

    if !VALID_FORMATS.contains(&logging.format.as_str()) {
        return Err(ConfigError::Invalid {
            field: "logging.format",
            reason: unsupported("log format", &logging.format, VALID_FORMATS),
        });
    }

    if logging.directives.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            field: "logging.directives",
            reason: "filter directives must not be empty".to_owned(),
        });
    }

    if !VALID_TARGETS.contains(&logging.target.as_str()) {
        return Err(ConfigError::Invalid {
            field: "logging.target",
            reason: unsupported("log target", &logging.target, VALID_TARGETS),
        });
    }

    if !VALID_ROTATIONS.contains(&logging.rotation.as_str()) {
        return Err(ConfigError::Invalid {
            field: "logging.rotation",
            reason: unsupported("rotation", &logging.rotation, VALID_ROTATIONS),
        });
    }

    if logging.target == "file" {
        if logging.directory.is_none() {
            return Err(ConfigError::Invalid {
                field: "logging.directory",
                reason: "required when logging.target is \"file\"".to_owned(),
            });
        }
        if logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.file_prefix",
                reason: "file prefix must not be empty".to_owned(),
            });
        }
    }

    Ok(())
}

fn unsupported(what: &str, value: &str, accepted: &[&str]) -> String {
    format!(
        "unsupported {what} '{value}'; expected one of: {}",
        accepted.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::Invalid { field, .. }) => field.to_owned(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_level() {
        let mut config = Config::default();
        config.logging.level = String::new();
        assert_eq!(field_of(validate(&config)), "logging.level");
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".to_owned();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }

    #[test]
    fn test_empty_flush_point() {
        let mut config = Config::default();
        config.events.flush_point = Some("  ".to_owned());
        assert_eq!(field_of(validate(&config)), "events.flush_point");
    }

    #[test]
    fn test_duplicate_error_handler() {
        let mut config = Config::default();
        config.events.error_handlers = vec!["reporter_error".to_owned(), "reporter_error".to_owned()];
        assert_eq!(field_of(validate(&config)), "events.error_handlers");
    }

    #[test]
    fn test_empty_error_handler() {
        let mut config = Config::default();
        config.events.error_handlers = vec![String::new()];
        assert_eq!(field_of(validate(&config)), "events.error_handlers");
    }

    #[test]
    fn test_padded_level_is_accepted() {
        let mut config = Config::default();
        config.logging.level = " info ".to_owned();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_target() {
        let mut config = Config::default();
        config.logging.target = "syslog".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.target");
    }

    #[test]
    fn test_unknown_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.rotation");
    }

    #[test]
    fn test_file_target_needs_directory() {
        let mut config = Config::default();
        config.logging.target = "file".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.directory");

        config.logging.directory = Some("/var/log/vigil".into());
        assert!(validate(&config).is_ok());

        config.logging.file_prefix = String::new();
        assert_eq!(field_of(validate(&config)), "logging.file_prefix");
    }
}
