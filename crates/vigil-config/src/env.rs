//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override. They are only applied to fields
//! the config file did not set.

use std::collections::HashMap;

use tracing::debug;

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    section: &'static str,
    key: &'static str,
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "VIGIL_LOG",
        section: "logging",
        key: "level",
    },
    EnvMapping {
        var_name: "VIGIL_LOG_FORMAT",
        section: "logging",
        key: "format",
    },
];

/// Collect the `VIGIL_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("VIGIL_"))
        .collect()
}

/// Apply environment variable fallbacks to fields missing from `doc`.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    doc: &mut toml::Table,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let Some(val) = env_vars.get(mapping.var_name) else {
            continue;
        };

        let section = doc
            .entry(mapping.section)
            .or_insert(toml::Value::Table(toml::Table::new()));
        let Some(section) = section.as_table_mut() else {
            continue;
        };
        if section.contains_key(mapping.key) {
            continue;
        }

        debug!(
            var = mapping.var_name,
            field = %format!("{}.{}", mapping.section, mapping.key),
            "applying env var fallback"
        );
        section.insert(mapping.key.to_owned(), toml::Value::String(val.clone()));
        count = count.saturating_add(1);
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_fallback_fills_missing_fields() {
        let mut doc = toml::Table::new();
        let applied = apply_env_fallbacks(
            &mut doc,
            &env(&[("VIGIL_LOG", "debug"), ("VIGIL_LOG_FORMAT", "json")]),
        );

        assert_eq!(applied, 2);
        assert_eq!(doc["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(doc["logging"]["format"].as_str(), Some("json"));
    }

    #[test]
    fn test_fallback_never_overrides_file() {
        let mut doc: toml::Table = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        let applied = apply_env_fallbacks(&mut doc, &env(&[("VIGIL_LOG", "trace")]));

        assert_eq!(applied, 0);
        assert_eq!(doc["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_unrelated_vars_ignored() {
        let mut doc = toml::Table::new();
        assert_eq!(apply_env_fallbacks(&mut doc, &env(&[("VIGIL_OTHER", "x")])), 0);
        assert!(doc.is_empty());
    }
}
