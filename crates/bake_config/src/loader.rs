//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::flags::FlagElement;
use crate::types::{BuildConfig, FlagList};
use std::path::Path;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "bakefile.json";

/// Loads and validates a `bakefile.json` configuration from a project directory.
///
/// A project without a configuration file builds with the defaults.
pub fn load_config(project_dir: &Path) -> Result<BuildConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "no configuration file, using defaults");
            return Ok(BuildConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            })
        }
    };
    load_config_from_str(&content)
}

/// Parses and validates a `bakefile.json` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<BuildConfig, ConfigError> {
    let config: BuildConfig =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &BuildConfig) -> Result<(), ConfigError> {
    if config.program.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "program must not be empty".to_string(),
        ));
    }
    if config.threads == Some(0) {
        return Err(ConfigError::ValidationError(
            "threads must be at least 1".to_string(),
        ));
    }
    for (key, list) in [
        ("c-flags", &config.c_flags),
        ("cxx-flags", &config.cxx_flags),
        ("linker-flags", &config.linker_flags),
    ] {
        validate_flag_list(key, list)?;
    }
    for (key, command) in [("cc", &config.cc), ("cxx", &config.cxx)] {
        if command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "{key} must name a compiler"
            )));
        }
    }
    Ok(())
}

fn validate_flag_list(key: &str, list: &FlagList) -> Result<(), ConfigError> {
    if let FlagList::Elements(elements) = list {
        for raw in elements {
            FlagElement::parse(raw)
                .map_err(|e| ConfigError::ValidationError(format!("{key}: {e}")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = load_config_from_str(r#"{ "program": "app" }"#).unwrap();
        assert_eq!(config.program, "app");
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "program": "demo",
            "c-flags": ["-Wall", "@DEBUG: -g", "@!DEBUG: -O2"],
            "cxx-flags": "-std=c++20",
            "linker-flags": ["-lm", "@WIN: -static"],
            "threads": 8,
            "build-stats-file": "build-stats.txt",
            "cc": "ccache gcc",
            "cxx": "clang++"
        }"#;
        let config = load_config_from_str(json).unwrap();
        assert_eq!(config.program, "demo");
        assert_eq!(config.threads, Some(8));
        assert_eq!(config.cc.as_deref(), Some("ccache gcc"));
        assert_eq!(config.cxx.as_deref(), Some("clang++"));
    }

    #[test]
    fn invalid_json_errors() {
        let err = load_config_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn wrong_type_errors() {
        let err = load_config_from_str(r#"{ "threads": "many" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn zero_threads_errors() {
        let err = load_config_from_str(r#"{ "threads": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_program_errors() {
        let err = load_config_from_str(r#"{ "program": "" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn malformed_conditional_names_the_key() {
        let err = load_config_from_str(r#"{ "linker-flags": ["@WIN -static"] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("linker-flags"));
    }

    #[test]
    fn blank_compiler_errors() {
        let err = load_config_from_str(r#"{ "cc": "  " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "program": "tool" }"#).unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.program, "tool");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.program, "a.out");
    }
}
