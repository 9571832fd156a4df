//! Keys file loading
//!
//! A keys file describes one view's shortcuts outside code: which raw event
//! to listen for, whether to scope to the view's element, and the default
//! combo → method bindings. The format is line based:
//!
//! ```text
//! # Editor shortcuts
//! $mod = ctrl
//! trigger = keydown
//! scoped = false
//! keys = $mod+s cmd+s, save
//! keys = esc, close
//! ```
//!
//! # Architecture
//! Parsing is two-pass, using nom combinators for each line:
//! 1. First pass: Collect `$name = value` variable definitions
//! 2. Second pass: Substitute variables and parse settings
//!
//! Every combo is parsed and resolved to key codes at load time, so a file
//! that loads will always bind cleanly.
//!
//! # Example
//!
//! ```
//! use view_keys::config::KeysFile;
//! use view_keys::core::Trigger;
//!
//! let file = KeysFile::parse("trigger = keyup\nkeys = ctrl+s, save")?;
//! assert_eq!(file.trigger, Trigger::KeyUp);
//! assert_eq!(file.keys[0].method, "save");
//! # Ok::<(), view_keys::config::ConfigError>(())
//! ```

pub mod error;

pub use error::ConfigError;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::{eof, rest},
    IResult, Parser,
};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{KeyCombo, Overlap, OverlapDetector, Trigger};
use crate::engine::{resolve_combos, BindingSpec, EngineConfig};

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("variable pattern should be valid regex")
});

/// One `keys = COMBOS, METHOD` line
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyEntry {
    /// 1-based line number
    pub line: usize,

    /// Combo string after variable substitution
    pub combo: String,

    /// View method the combo calls
    pub method: String,

    /// Parsed alternatives, in written order
    pub combos: Vec<KeyCombo>,
}

/// Parsed keys file
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeysFile {
    /// Raw event to listen for
    pub trigger: Trigger,

    /// Listen on the view's element instead of the document
    pub scoped: bool,

    /// Default bindings, in file order
    pub keys: Vec<KeyEntry>,
}

impl KeysFile {
    /// Reads and parses a keys file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist, and any
    /// parse error with its line number.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let file = Self::parse(&content)?;

        debug!(path = %path.display(), keys = file.keys.len(), "loaded keys file");
        Ok(file)
    }

    /// Parses keys file content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        // First pass: Collect variable definitions
        let variables = collect_variables(content);

        // Second pass: Parse settings with variable substitution
        let mut file = KeysFile::default();

        for (line_num, line) in content.lines().enumerate() {
            let line_num = line_num + 1;

            let line_trimmed = line.trim();
            if line_trimmed.is_empty()
                || line_trimmed.starts_with('#')
                || line_trimmed.starts_with('$')
            {
                continue;
            }

            let substituted = substitute_variables(line_trimmed, &variables, line_num)?;

            let (name, value) = match parse_setting(&substituted) {
                Ok((_, setting)) => setting,
                Err(e) => {
                    return Err(ConfigError::InvalidSyntax {
                        line: line_num,
                        message: format!("{:?}", e),
                    });
                }
            };

            match name {
                "trigger" => {
                    file.trigger = value.parse().map_err(|value| ConfigError::InvalidTrigger {
                        value,
                        line: line_num,
                    })?;
                }
                "scoped" => file.scoped = parse_bool(name, value, line_num)?,
                "keys" => file.keys.push(parse_key_entry(value, line_num)?),
                other => {
                    return Err(ConfigError::InvalidSyntax {
                        line: line_num,
                        message: format!("unknown setting '{}'", other),
                    });
                }
            }
        }

        Ok(file)
    }

    /// Engine configuration described by this file
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            bind_to: None,
            trigger: self.trigger,
            scoped: self.scoped,
        }
    }

    /// Default bindings as a spec of method names
    pub fn binding_spec(&self) -> BindingSpec {
        self.keys.iter().fold(BindingSpec::new(), |spec, entry| {
            spec.key(entry.combo.as_str(), entry.method.as_str())
        })
    }

    /// Combos that fire together on the same events
    pub fn overlaps(&self) -> Vec<Overlap> {
        let mut detector = OverlapDetector::new();
        for entry in &self.keys {
            for combo in &entry.combos {
                detector.add_combo(combo.clone(), entry.method.clone());
            }
        }
        detector.find_overlaps()
    }
}

/// Collect variable definitions
///
/// Format: `$name = value`. Later definitions win.
pub fn collect_variables(content: &str) -> HashMap<String, String> {
    let mut variables = HashMap::new();

    for line in content.lines() {
        let line_trimmed = line.trim();

        if let Some(definition) = line_trimmed.strip_prefix('$') {
            if let Some((name, value)) = definition.split_once('=') {
                variables.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    variables
}

/// Substitute `$name` references in a line
///
/// Unlike plain string replacement, `$mod` never matches inside `$modkey`.
pub fn substitute_variables(
    line: &str,
    variables: &HashMap<String, String>,
    line_num: usize,
) -> Result<String, ConfigError> {
    if let Some(missing) = VARIABLE
        .captures_iter(line)
        .map(|caps| caps[1].to_string())
        .find(|name| !variables.contains_key(name))
    {
        return Err(ConfigError::UndefinedVariable {
            variable: missing,
            line: line_num,
        });
    }

    Ok(VARIABLE
        .replace_all(line, |caps: &Captures| variables[&caps[1]].clone())
        .into_owned())
}

/// Parse a `name = value` setting line
pub fn parse_setting(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = (space0, char('='), space0).parse(input)?;
    let (input, value) = rest(input)?;

    Ok((input, (name, value.trim())))
}

/// Parse the value of a `keys` line: `COMBOS, METHOD`
pub fn parse_keys_value(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, combos) = take_until(",")(input)?;
    let (input, _) = (char(','), space0).parse(input)?;
    let (input, method) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = (space0, eof).parse(input)?;

    Ok((input, (combos.trim(), method)))
}

fn parse_key_entry(value: &str, line_num: usize) -> Result<KeyEntry, ConfigError> {
    let (combo, method) = match parse_keys_value(value) {
        Ok((_, parsed)) => parsed,
        Err(e) => {
            return Err(ConfigError::InvalidSyntax {
                line: line_num,
                message: format!("expected 'keys = COMBOS, METHOD': {:?}", e),
            });
        }
    };

    let combos = resolve_combos(combo)
        .map_err(|source| ConfigError::Bind {
            line: line_num,
            source,
        })?
        .into_iter()
        .map(|(_, parsed)| parsed)
        .collect();

    Ok(KeyEntry {
        line: line_num,
        combo: combo.to_string(),
        method: method.to_string(),
        combos,
    })
}

fn parse_bool(setting: &str, value: &str, line_num: usize) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            setting: setting.to_string(),
            value: value.to_string(),
            line: line_num,
        }),
    }
}

#[cfg(test)]
mod tests;
