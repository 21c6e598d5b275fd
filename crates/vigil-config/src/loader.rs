//! Config file loading.
//!
//! `load()` runs:
//! 1. Read the config file, if one is given
//! 2. Apply env var fallbacks for unset fields
//! 3. Deserialize into [`Config`]
//! 4. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::apply_env_fallbacks;
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load configuration from an optional file plus env fallbacks.
///
/// A missing file is an error when a path is given explicitly.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable or malformed, or if
/// the result fails validation.
pub fn load<S: ::std::hash::BuildHasher>(
    path: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    let (mut doc, origin) = match path {
        Some(path) => {
            let content = read_file(path)?;
            let doc = parse_table(&content, &path.display().to_string())?;
            info!(path = %path.display(), "loaded config file");
            (doc, path.display().to_string())
        },
        None => (toml::Table::new(), "<defaults>".to_owned()),
    };

    let applied = apply_env_fallbacks(&mut doc, env_vars);
    if applied > 0 {
        debug!(applied, "applied env var fallbacks");
    }

    let config: Config = toml::Value::Table(doc)
        .try_into()
        .map_err(|e| ConfigError::Malformed {
            origin,
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Load a config from a specific file path (no env fallbacks).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed or
/// validated.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = read_file(path)?;
    from_toml_str(&content, &path.display().to_string())
}

/// Parse and validate a TOML document; `origin` names it in errors.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the document is malformed or invalid.
pub fn from_toml_str(content: &str, origin: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::Malformed {
        origin: origin.to_owned(),
        source: e,
    })?;

    validate::validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Check size after reading to avoid TOCTOU between stat and read.
    let size = content.len() as u64;
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_CONFIG_FILE_SIZE,
        });
    }

    Ok(content)
}

fn parse_table(content: &str, origin: &str) -> ConfigResult<toml::Table> {
    toml::from_str(content).map_err(|e| ConfigError::Malformed {
        origin: origin.to_owned(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_load_without_file() {
        let config = load(None, &no_env()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[events]
flush_point = "flush"
error_handlers = ["reporter_error"]
warn_unused_handlers = false

[logging]
level = "debug"
format = "json"
directives = ["vigil_events=trace"]
"#
        )
        .unwrap();

        let config = load_file(file.path()).unwrap();
        assert_eq!(config.events.flush_point.as_deref(), Some("flush"));
        assert_eq!(config.events.error_handlers, vec!["reporter_error"]);
        assert!(!config.events.warn_unused_handlers);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.directives, vec!["vigil_events=trace"]);
    }

    #[test]
    fn test_missing_sections_default() {
        let config = from_toml_str("[logging]\nlevel = \"warn\"\n", "<test>").unwrap();
        assert_eq!(config.events, crate::EventsConfig::default());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_file_logging_section() {
        let config = from_toml_str(
            "[logging]\ntarget = \"file\"\ndirectory = \"/var/log/vigil\"\nrotation = \"hourly\"\nmax_files = 24\n",
            "<test>",
        )
        .unwrap();
        assert_eq!(config.logging.target, "file");
        assert_eq!(
            config.logging.directory.as_deref(),
            Some(Path::new("/var/log/vigil"))
        );
        assert_eq!(config.logging.rotation, "hourly");
        assert_eq!(config.logging.max_files, 24);
        assert_eq!(config.logging.file_prefix, "vigil");
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/path/vigil.toml"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = from_toml_str("[events\nflush_point = 1", "<test>");
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = from_toml_str("[events]\nqueue_limit = 10\n", "<test>");
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn test_env_fallback_only_for_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let env: HashMap<String, String> = [
            ("VIGIL_LOG".to_owned(), "trace".to_owned()),
            ("VIGIL_LOG_FORMAT".to_owned(), "compact".to_owned()),
        ]
        .into_iter()
        .collect();

        let config = load(Some(&path), &env).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_env_fallback_is_validated() {
        let env: HashMap<String, String> = [("VIGIL_LOG_FORMAT".to_owned(), "xml".to_owned())]
            .into_iter()
            .collect();

        let result = load(None, &env);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = load_file(&file_path);
        assert!(matches!(result, Err(ConfigError::TooLarge { .. })));
    }
}
