//! TOML parameter files and parameter resolution.
//!
//! A parameter file names an engine and a table of parameter values:
//!
//! ```toml
//! engine = "delay-reverb"
//!
//! [params]
//! feedback = 0.4
//! "delay time" = 0.08
//! ```
//!
//! Keys match a parameter's name, short name or string id, ignoring case.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sencillo_core::EngineWithParams;
use serde::Deserialize;
use thiserror::Error;

/// Errors from loading a parameter file or applying parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file.
    #[error("failed to read parameter file '{path}': {source}")]
    ReadFile {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse parameter file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// No engine with this id.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// Neither the command line nor the file named an engine.
    #[error("no engine given (use --engine or set `engine` in the parameter file)")]
    MissingEngine,

    /// The engine has no parameter with this name.
    #[error("engine '{engine}' has no parameter '{param}'")]
    UnknownParameter {
        /// Engine id.
        engine: String,
        /// Requested parameter name.
        param: String,
    },

    /// The value could not be parsed as a number.
    #[error("invalid value '{value}' for parameter '{param}'")]
    InvalidValue {
        /// Parameter name as given.
        param: String,
        /// Raw value.
        value: String,
    },

    /// The value is outside the parameter's range.
    #[error("{param} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Parameter display name.
        param: String,
        /// Requested value.
        value: f32,
        /// Range minimum.
        min: f32,
        /// Range maximum.
        max: f32,
    },
}

/// Contents of a parameter file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamFile {
    /// Engine id, e.g. `"delay-reverb"`.
    #[serde(default)]
    pub engine: Option<String>,
    /// Parameter name to value.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl ParamFile {
    /// Parse a parameter file from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a parameter file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), params = file.params.len(), "loaded parameter file");
        Ok(file)
    }
}

/// Parse a `name=value` command-line pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid parameter '{s}' (expected name=value)")),
    }
}

/// Parse a raw command-line value.
pub fn parse_value(param: &str, raw: &str) -> Result<f32, ConfigError> {
    raw.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidValue {
            param: param.to_string(),
            value: raw.to_string(),
        })
}

/// Set one parameter by name, rejecting unknown names and out-of-range values.
pub fn apply_param(
    engine: &mut dyn EngineWithParams,
    engine_id: &str,
    name: &str,
    value: f32,
) -> Result<(), ConfigError> {
    let index = engine
        .engine_find_param(name)
        .ok_or_else(|| ConfigError::UnknownParameter {
            engine: engine_id.to_string(),
            param: name.to_string(),
        })?;
    let Some(desc) = engine.engine_param_info(index) else {
        return Err(ConfigError::UnknownParameter {
            engine: engine_id.to_string(),
            param: name.to_string(),
        });
    };
    if !desc.contains(value) {
        return Err(ConfigError::OutOfRange {
            param: desc.name.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        });
    }

    engine.engine_set_param(index, value);
    tracing::debug!(engine = engine_id, param = desc.name, value, "parameter set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sencillo_effects::EngineRegistry;

    #[test]
    fn parses_file() {
        let file = ParamFile::from_toml(
            r#"
            engine = "delay-reverb"

            [params]
            feedback = 0.4
            "delay time" = 0.08
            "#,
        )
        .unwrap();
        assert_eq!(file.engine.as_deref(), Some("delay-reverb"));
        assert_eq!(file.params["feedback"], 0.4);
        assert_eq!(file.params["delay time"], 0.08);
    }

    #[test]
    fn engine_is_optional() {
        let file = ParamFile::from_toml("[params]\nthreshold = 0.5\n").unwrap();
        assert!(file.engine.is_none());
        assert_eq!(file.params.len(), 1);
    }

    #[test]
    fn bad_toml_is_error() {
        assert!(matches!(
            ParamFile::from_toml("engine = "),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn key_val_parsing() {
        assert_eq!(
            parse_key_val("delay time=0.08").unwrap(),
            ("delay time".to_string(), "0.08".to_string())
        );
        assert!(parse_key_val("feedback").is_err());
        assert!(parse_key_val("=1").is_err());
        assert!(parse_value("feedback", "abc").is_err());
        assert!(parse_value("feedback", "inf").is_err());
        assert_eq!(parse_value("feedback", "0.25").unwrap(), 0.25);
    }

    #[test]
    fn apply_checks_name_and_range() {
        let mut engine = EngineRegistry::new().create("delay-reverb").unwrap();
        apply_param(engine.as_mut(), "delay-reverb", "FEEDBACK", 0.3).unwrap();
        assert_eq!(engine.engine_get_param(8), 0.3);

        assert!(matches!(
            apply_param(engine.as_mut(), "delay-reverb", "drive", 1.0),
            Err(ConfigError::UnknownParameter { .. })
        ));
        assert!(matches!(
            apply_param(engine.as_mut(), "delay-reverb", "feedback", 1.5),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}
