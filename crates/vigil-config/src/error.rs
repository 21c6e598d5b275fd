use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a Vigil configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be opened or read.
    #[error("cannot read vigil config {}: {source}", path.display())]
    Unreadable {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The config file is larger than the loader accepts.
    #[error("vigil config {} is {size} bytes (limit {limit})", path.display())]
    TooLarge {
        /// File that was requested.
        path: PathBuf,
        /// Size of the file contents.
        size: u64,
        /// Maximum accepted size.
        limit: u64,
    },

    /// The document is not valid TOML or does not match the schema.
    #[error("malformed vigil config ({origin}): {source}")]
    Malformed {
        /// File path or `<string>` / `<defaults>` naming the document.
        origin: String,
        /// TOML decoder error.
        #[source]
        source: toml::de::Error,
    },

    /// A setting has a value the engine cannot use.
    #[error("bad value for `{field}`: {reason}")]
    Invalid {
        /// Dotted key of the offending setting, e.g. `logging.level`.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

/// Result alias for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_names_the_field() {
        let err = ConfigError::Invalid {
            field: "logging.level",
            reason: "unsupported log level 'loud'".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "bad value for `logging.level`: unsupported log level 'loud'"
        );
    }

    #[test]
    fn test_too_large_reports_sizes() {
        let err = ConfigError::TooLarge {
            path: PathBuf::from("/etc/vigil.toml"),
            size: 2_000_000,
            limit: 1_048_576,
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/vigil.toml"));
        assert!(msg.contains("2000000"));
    }
}
