//! Transform engines.
//!
//! A [`TransformEngine`] is a pure function from `(content, config)` to new
//! content. The walker never looks inside it; it only calls it once per matched
//! file with the run's [`EffectiveConfig`].

use regex::Regex;
use serde_json::Value;

use crate::error::TransformError;
use crate::models::{EffectiveConfig, Plugin};

/// Rewrites file content according to a configuration.
///
/// Implementations must be pure: the same input gives the same output and no
/// state is shared between calls. Any `Fn(&str, &EffectiveConfig) -> Result<String, TransformError>`
/// closure is an engine.
pub trait TransformEngine: Send + Sync {
    fn transform(&self, source: &str, config: &EffectiveConfig) -> Result<String, TransformError>;
}

impl<F> TransformEngine for F
where
    F: Fn(&str, &EffectiveConfig) -> Result<String, TransformError> + Send + Sync,
{
    fn transform(&self, source: &str, config: &EffectiveConfig) -> Result<String, TransformError> {
        self(source, config)
    }
}

/// Engine implementing the plugins of [`Plugin`].
///
/// Plugins run in a fixed order: `indent`, `trailing_whitespace`,
/// `line_endings`, `final_newline`. Unset plugins and `null` values are
/// no-ops, so an empty configuration leaves content untouched. Keys that are
/// not known plugins are ignored.
pub struct BuiltinEngine {
    /// Leading tabs of a line
    leading_tabs: Regex,

    /// Spaces and tabs before a line break (CRLF aware)
    trailing_whitespace: Regex,
}

impl BuiltinEngine {
    pub fn new() -> Self {
        Self {
            leading_tabs: Regex::new(r"(?m)^\t+").expect("Invalid leading tab regex"),
            trailing_whitespace: Regex::new(r"(?mR)[ \t]+$")
                .expect("Invalid trailing whitespace regex"),
        }
    }

    fn indent(&self, source: String, value: &Value) -> Result<String, TransformError> {
        let unit = match value {
            Value::Number(n) => match n.as_u64() {
                Some(width) => " ".repeat(width as usize),
                None => return Err(invalid(Plugin::Indent, "a number or a string", value)),
            },
            Value::String(unit) => unit.clone(),
            _ => return Err(invalid(Plugin::Indent, "a number or a string", value)),
        };

        Ok(self
            .leading_tabs
            .replace_all(&source, |caps: &regex::Captures<'_>| unit.repeat(caps[0].len()))
            .into_owned())
    }

    fn trailing_whitespace(&self, source: String, value: &Value) -> Result<String, TransformError> {
        match value {
            Value::Bool(true) => Ok(self.trailing_whitespace.replace_all(&source, "").into_owned()),
            Value::Bool(false) => Ok(source),
            _ => Err(invalid(Plugin::TrailingWhitespace, "a boolean", value)),
        }
    }

    fn line_endings(&self, source: String, value: &Value) -> Result<String, TransformError> {
        let lf = source.replace("\r\n", "\n");
        match value.as_str() {
            Some("lf") => Ok(lf),
            Some("crlf") => Ok(lf.replace('\n', "\r\n")),
            _ => Err(invalid(Plugin::LineEndings, "\"lf\" or \"crlf\"", value)),
        }
    }

    fn final_newline(&self, source: String, value: &Value) -> Result<String, TransformError> {
        let Value::Bool(wanted) = value else {
            return Err(invalid(Plugin::FinalNewline, "a boolean", value));
        };

        let line_break = if source.contains("\r\n") { "\r\n" } else { "\n" };
        let mut trimmed = source.trim_end_matches(['\r', '\n']).to_string();
        if *wanted && !trimmed.is_empty() {
            trimmed.push_str(line_break);
        }
        Ok(trimmed)
    }
}

impl Default for BuiltinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformEngine for BuiltinEngine {
    fn transform(&self, source: &str, config: &EffectiveConfig) -> Result<String, TransformError> {
        let mut content = source.to_string();

        for plugin in Plugin::ALL {
            let Some(value) = config.plugin(plugin).filter(|v| !v.is_null()) else {
                continue;
            };
            content = match plugin {
                Plugin::Indent => self.indent(content, value)?,
                Plugin::TrailingWhitespace => self.trailing_whitespace(content, value)?,
                Plugin::LineEndings => self.line_endings(content, value)?,
                Plugin::FinalNewline => self.final_newline(content, value)?,
            };
        }

        for (key, _) in config.iter().filter(|(k, _)| Plugin::from_name(k).is_none()) {
            tracing::debug!("Ignoring unknown plugin key: {}", key);
        }

        Ok(content)
    }
}

fn invalid(plugin: Plugin, expected: &'static str, found: &Value) -> TransformError {
    TransformError::InvalidOption {
        plugin: plugin.name(),
        expected,
        found: found.to_string(),
    }
}
