//! Declarative configuration schema resolved from environment variables.
//!
//! A service declares its configuration as a flat list of [`ConfigOption`]s,
//! each naming a dotted path (`"db.host"`), an optional default, and a value
//! type. Resolution scans a prefixed slice of the process environment and
//! produces a nested JSON object, coercing every raw string to its declared
//! type. The same schema can be rendered back out as a shell-sourceable
//! `.env` template, see [`template`].
//!
//! # Example
//!
//! ```rust,ignore
//! use svckit::config::{resolve_from_env, ConfigOption, OptionType};
//!
//! let options = vec![
//!     ConfigOption::new("db.host").default("localhost").help("Database host"),
//!     ConfigOption::new("db.port").default(5432),
//!     ConfigOption::new("log.jsonformat").default(false),
//!     ConfigOption::new("amqp.password").typ(OptionType::String),
//! ];
//!
//! // With MYAPP_DB_PORT=5433 in the environment this yields
//! // {"db": {"host": "localhost", "port": 5433}, ...}
//! let config = resolve_from_env("MYAPP_", &options)?;
//! ```

pub mod template;

pub use template::{
    print_env_template, print_env_template_and_exit, render_env_template, shell_quote,
};

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced by schema resolution and value coercion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required options had neither a default nor an
    /// environment value. Carries every missing variable name so an
    /// operator can fix all omissions in one pass.
    #[error("Missing required options: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    /// A boolean-typed option received a token outside the recognized set.
    #[error("Not a boolean: {0}")]
    NotABoolean(String),

    /// A value could not be coerced to the option's declared type.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Environment variable suffix of the offending option.
        key: String,
        /// Why coercion failed.
        reason: String,
    },

    /// A dotted option name would descend through a value that an earlier
    /// option already set to a scalar.
    #[error("Option {0} conflicts with a non-mapping value on its path")]
    PathConflict(String),
}

/// Value type of a configuration option.
///
/// Inferred from the default's runtime type when not given explicitly;
/// options with neither a type nor a default are strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    /// UTF-8 string, taken verbatim from the environment.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float. Integral defaults widen to float.
    Float,
    /// Boolean. Accepts `1/yes/true/on` and `0/no/false/off`, any letter case.
    Boolean,
}

impl OptionType {
    fn infer(value: &Value) -> OptionType {
        match value {
            Value::Bool(_) => OptionType::Boolean,
            Value::Number(n) if n.is_f64() => OptionType::Float,
            Value::Number(_) => OptionType::Integer,
            _ => OptionType::String,
        }
    }

    /// Parse a boolean token.
    ///
    /// Every string outside the recognized set is rejected. A truthy-looking
    /// value like `"banana"` must fail, never silently read as true.
    fn parse_boolean(raw: &str) -> Result<bool, ConfigError> {
        match raw.to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(ConfigError::NotABoolean(raw.to_string())),
        }
    }
}

/// One declared configuration field: a dotted name, an optional default,
/// a value type, and optional help text for the template renderer.
///
/// Schemas are built once at startup and never mutated:
///
/// ```rust,ignore
/// let option = ConfigOption::new("db.port")
///     .default(5432)
///     .help("Database port");
/// assert_eq!(option.env_key(), "DB_PORT");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigOption {
    /// Dotted path locating the value in the resolved structure.
    pub name: String,
    /// Default value used when the environment provides nothing.
    pub default: Option<Value>,
    /// Whether resolution fails when no value and no default are present.
    pub required: bool,
    /// Explicit value type; inferred from the default when absent.
    pub typ: Option<OptionType>,
    /// Human-readable description, used only when rendering templates.
    pub help: String,
}

impl ConfigOption {
    /// Create a required option with the given dotted name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            required: true,
            typ: None,
            help: String::new(),
        }
    }

    /// Set the default value. Also drives type inference when no explicit
    /// type is given.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the option as optional or required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the value type explicitly.
    pub fn typ(mut self, typ: OptionType) -> Self {
        self.typ = Some(typ);
        self
    }

    /// Set the help text shown in rendered templates.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Effective value type: explicit, else inferred from the default,
    /// else string.
    pub fn option_type(&self) -> OptionType {
        self.typ.unwrap_or_else(|| {
            self.default
                .as_ref()
                .map(OptionType::infer)
                .unwrap_or(OptionType::String)
        })
    }

    /// Environment variable suffix for this option: the dotted name with
    /// `.` replaced by `_`, upper-cased. A pure function of the name.
    pub fn env_key(&self) -> String {
        self.name.replace('.', "_").to_uppercase()
    }

    /// Coerce a raw value to the option's declared type.
    ///
    /// Raw strings are parsed; already-typed values (a boolean default, an
    /// integer default for a float option) pass through or widen.
    pub fn value(&self, raw: &Value) -> Result<Value, ConfigError> {
        match self.option_type() {
            OptionType::Boolean => match raw {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                Value::String(s) => OptionType::parse_boolean(s).map(Value::Bool),
                other => Err(ConfigError::NotABoolean(other.to_string())),
            },
            OptionType::Integer => match raw {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(raw.clone()),
                Value::String(s) => s.trim().parse::<i64>().map(Value::from).map_err(|e| {
                    ConfigError::InvalidValue {
                        key: self.env_key(),
                        reason: format!("invalid integer '{}': {}", s, e),
                    }
                }),
                other => Err(ConfigError::InvalidValue {
                    key: self.env_key(),
                    reason: format!("expected an integer, got {}", other),
                }),
            },
            OptionType::Float => match raw {
                Value::Number(n) => {
                    n.as_f64()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .ok_or_else(|| ConfigError::InvalidValue {
                            key: self.env_key(),
                            reason: format!("not representable as a float: {}", n),
                        })
                }
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: self.env_key(),
                        reason: format!("invalid float '{}'", s),
                    }),
                other => Err(ConfigError::InvalidValue {
                    key: self.env_key(),
                    reason: format!("expected a float, got {}", other),
                }),
            },
            OptionType::String => match raw {
                Value::String(s) => Ok(Value::String(s.clone())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                other => Err(ConfigError::InvalidValue {
                    key: self.env_key(),
                    reason: format!("expected a string, got {}", other),
                }),
            },
        }
    }

    /// Render a value to its environment-variable string form.
    ///
    /// Absent values render as the empty string; booleans render lower-case
    /// so templates round-trip through [`OptionType::Boolean`] parsing.
    pub fn as_env_var(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Resolve a schema against a flat environment snapshot.
///
/// Only environment keys starting with `prefix` are considered; the prefix is
/// stripped before matching each option's [`ConfigOption::env_key`]. Values
/// are coerced to their declared types and inserted at the option's dotted
/// path, creating intermediate objects as needed; options sharing a path
/// prefix merge into one nested structure.
///
/// All missing required options are collected before failing, so one
/// [`ConfigError::MissingRequired`] names every omission at once.
///
/// Quirk, preserved deliberately: a present-but-empty environment value is
/// treated as absent. `MYAPP_DB_HOST=""` falls back to the default (or trips
/// the missing check), it does not resolve to an empty string.
///
/// Each call reads only its two inputs and returns a fresh value; reloading
/// configuration means running resolution again.
pub fn resolve(
    prefix: &str,
    options: &[ConfigOption],
    environ: &HashMap<String, String>,
) -> Result<Value, ConfigError> {
    let scoped: HashMap<String, &str> = environ
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(prefix)
                .map(|rest| (rest.to_string(), value.as_str()))
        })
        .collect();

    let mut missing = Vec::new();
    let mut root = Map::new();

    for option in options {
        let key = option.env_key();
        // Empty values count as absent. Inherited quirk, see above.
        let env_value = scoped.get(&key).copied().filter(|v| !v.is_empty());

        if option.required && option.default.is_none() && env_value.is_none() {
            missing.push(format!("{}{}", prefix, key));
            continue;
        }

        let value = match env_value {
            Some(raw) => option.value(&Value::String(raw.to_string()))?,
            None => match &option.default {
                Some(default) => option.value(default)?,
                None => Value::Null,
            },
        };

        insert_nested(&mut root, &option.name, value)?;
    }

    if !missing.is_empty() {
        return Err(ConfigError::MissingRequired(missing));
    }

    Ok(Value::Object(root))
}

/// Resolve a schema against the current process environment.
pub fn resolve_from_env(prefix: &str, options: &[ConfigOption]) -> Result<Value, ConfigError> {
    let environ: HashMap<String, String> = std::env::vars().collect();
    resolve(prefix, options, &environ)
}

fn insert_nested(root: &mut Map<String, Value>, name: &str, value: Value) -> Result<(), ConfigError> {
    let parts: Vec<&str> = name.split('.').collect();
    let (last, parents) = match parts.split_last() {
        Some(split) => split,
        None => return Ok(()),
    };

    let mut cur = root;
    for part in parents {
        cur = cur
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ConfigError::PathConflict(name.to_string()))?;
    }
    cur.insert((*last).to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Option schema tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_env_key_from_dotted_name() {
        assert_eq!(ConfigOption::new("db.host").env_key(), "DB_HOST");
        assert_eq!(ConfigOption::new("debug").env_key(), "DEBUG");
        assert_eq!(ConfigOption::new("amqp.ssl.cacert").env_key(), "AMQP_SSL_CACERT");
    }

    #[test]
    fn test_type_inferred_from_default() {
        assert_eq!(
            ConfigOption::new("a").default("x").option_type(),
            OptionType::String
        );
        assert_eq!(
            ConfigOption::new("a").default(5432).option_type(),
            OptionType::Integer
        );
        assert_eq!(
            ConfigOption::new("a").default(0.5).option_type(),
            OptionType::Float
        );
        assert_eq!(
            ConfigOption::new("a").default(true).option_type(),
            OptionType::Boolean
        );
    }

    #[test]
    fn test_type_defaults_to_string() {
        assert_eq!(ConfigOption::new("a").option_type(), OptionType::String);
    }

    #[test]
    fn test_explicit_type_wins_over_inference() {
        let option = ConfigOption::new("a").default("1").typ(OptionType::Integer);
        assert_eq!(option.option_type(), OptionType::Integer);
    }

    // ------------------------------------------------------------------------
    // Coercion tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_boolean_tokens() {
        let option = ConfigOption::new("flag").typ(OptionType::Boolean);
        for token in ["1", "yes", "true", "on", "YES", "True", "ON"] {
            assert_eq!(
                option.value(&json!(token)).unwrap(),
                json!(true),
                "token: {}",
                token
            );
        }
        for token in ["0", "no", "false", "off", "NO", "False", "OFF"] {
            assert_eq!(
                option.value(&json!(token)).unwrap(),
                json!(false),
                "token: {}",
                token
            );
        }
    }

    #[test]
    fn test_boolean_rejects_truthy_looking_strings() {
        let option = ConfigOption::new("flag").typ(OptionType::Boolean);
        let err = option.value(&json!("banana")).unwrap_err();
        assert_eq!(err, ConfigError::NotABoolean("banana".to_string()));
        assert!(option.value(&json!("")).is_err());
        assert!(option.value(&json!("2")).is_err());
    }

    #[test]
    fn test_boolean_passthrough() {
        let option = ConfigOption::new("flag").default(false);
        assert_eq!(option.value(&json!(true)).unwrap(), json!(true));
        assert_eq!(option.value(&json!(false)).unwrap(), json!(false));
    }

    #[test]
    fn test_integer_coercion() {
        let option = ConfigOption::new("port").default(5432);
        assert_eq!(option.value(&json!("5433")).unwrap(), json!(5433));
        assert_eq!(option.value(&json!(5432)).unwrap(), json!(5432));
        assert!(option.value(&json!("5433x")).is_err());
    }

    #[test]
    fn test_integer_error_names_key() {
        let option = ConfigOption::new("db.port").default(5432);
        match option.value(&json!("oops")) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "DB_PORT"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_float_coercion() {
        let option = ConfigOption::new("ratio").default(0.5);
        assert_eq!(option.value(&json!("0.25")).unwrap(), json!(0.25));
        // Integral defaults widen to float.
        assert_eq!(option.value(&json!(2)).unwrap(), json!(2.0));
        assert!(option.value(&json!("fast")).is_err());
    }

    #[test]
    fn test_string_coercion() {
        let option = ConfigOption::new("name");
        assert_eq!(option.value(&json!("x")).unwrap(), json!("x"));
        assert_eq!(option.value(&json!(5)).unwrap(), json!("5"));
        assert_eq!(option.value(&json!(true)).unwrap(), json!("true"));
    }

    #[test]
    fn test_as_env_var() {
        let option = ConfigOption::new("a");
        assert_eq!(option.as_env_var(None), "");
        assert_eq!(option.as_env_var(Some(&json!("x"))), "x");
        assert_eq!(option.as_env_var(Some(&json!(5432))), "5432");
        assert_eq!(option.as_env_var(Some(&json!(true))), "true");
        assert_eq!(option.as_env_var(Some(&Value::Null)), "");
    }

    // ------------------------------------------------------------------------
    // Resolution tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_defaults_used_when_env_is_empty() {
        let options = vec![
            ConfigOption::new("db.host").default("localhost"),
            ConfigOption::new("db.port").default(5432),
            ConfigOption::new("debug").default(false),
        ];
        let config = resolve("APP_", &options, &env(&[])).unwrap();
        assert_eq!(
            config,
            json!({"db": {"host": "localhost", "port": 5432}, "debug": false})
        );
    }

    #[test]
    fn test_env_overrides_default() {
        let options = vec![
            ConfigOption::new("db.host").default("localhost"),
            ConfigOption::new("db.port").default(5432),
        ];
        let environ = env(&[("APP_DB_PORT", "5433"), ("OTHER_DB_HOST", "ignored")]);
        let config = resolve("APP_", &options, &environ).unwrap();
        assert_eq!(config, json!({"db": {"host": "localhost", "port": 5433}}));
    }

    #[test]
    fn test_dotted_names_merge_into_nested_structure() {
        let options = vec![
            ConfigOption::new("db.host"),
            ConfigOption::new("db.port").default(5432),
        ];
        let environ = env(&[("APP_DB_HOST", "x"), ("APP_DB_PORT", "5432")]);
        let config = resolve("APP_", &options, &environ).unwrap();
        assert_eq!(config, json!({"db": {"host": "x", "port": 5432}}));
    }

    #[test]
    fn test_all_missing_options_reported_at_once() {
        let options = vec![
            ConfigOption::new("db.host"),
            ConfigOption::new("db.password"),
            ConfigOption::new("db.port").default(5432),
        ];
        let err = resolve("APP_", &options, &env(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired(vec![
                "APP_DB_HOST".to_string(),
                "APP_DB_PASSWORD".to_string(),
            ])
        );
        assert_eq!(
            err.to_string(),
            "Missing required options: APP_DB_HOST, APP_DB_PASSWORD"
        );
    }

    #[test]
    fn test_empty_string_env_value_treated_as_absent() {
        let options = vec![ConfigOption::new("db.host").default("localhost")];
        let environ = env(&[("APP_DB_HOST", "")]);
        let config = resolve("APP_", &options, &environ).unwrap();
        assert_eq!(config, json!({"db": {"host": "localhost"}}));
    }

    #[test]
    fn test_empty_string_trips_missing_check() {
        let options = vec![ConfigOption::new("db.password")];
        let environ = env(&[("APP_DB_PASSWORD", "")]);
        let err = resolve("APP_", &options, &environ).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired(vec!["APP_DB_PASSWORD".to_string()])
        );
    }

    #[test]
    fn test_required_with_default_is_satisfied() {
        let options = vec![ConfigOption::new("debug").default(false)];
        let config = resolve("APP_", &options, &env(&[])).unwrap();
        assert_eq!(config, json!({"debug": false}));
    }

    #[test]
    fn test_optional_without_default_resolves_to_null() {
        let options = vec![ConfigOption::new("db.cacert").required(false)];
        let config = resolve("APP_", &options, &env(&[])).unwrap();
        assert_eq!(config, json!({"db": {"cacert": null}}));
    }

    #[test]
    fn test_boolean_env_value_rejected_with_offending_token() {
        let options = vec![ConfigOption::new("debug").default(false)];
        let environ = env(&[("APP_DEBUG", "banana")]);
        let err = resolve("APP_", &options, &environ).unwrap_err();
        assert_eq!(err, ConfigError::NotABoolean("banana".to_string()));
    }

    #[test]
    fn test_path_conflict_is_an_error() {
        let options = vec![
            ConfigOption::new("db").default("scalar"),
            ConfigOption::new("db.host").default("localhost"),
        ];
        let err = resolve("APP_", &options, &env(&[])).unwrap_err();
        assert_eq!(err, ConfigError::PathConflict("db.host".to_string()));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let options = vec![ConfigOption::new("db.port").default(5432)];
        let environ = env(&[("APP_DB_PORT", "9000")]);
        let first = resolve("APP_", &options, &environ).unwrap();
        let second = resolve("APP_", &options, &environ).unwrap();
        assert_eq!(first, second);
    }
}
