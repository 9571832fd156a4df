//! src/core/types.rs
//!
//! Core type definitions for view key bindings
//!
//! This module defines the fundamental types used throughout the crate:
//! - `KeyCode`: Numeric key identifier as reported by the event source
//! - `Modifier`: Temporal modifier keys (SHIFT, CTRL, ALT, META)
//! - `KeyCombo`: A base key plus the modifiers that must be held
//! - `Trigger`: Which raw keyboard event the engine listens for
//! - `KeyEvent`: A raw keyboard event with its modifier flags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric key identifier (e.g. 13 for enter, 83 for "s")
pub type KeyCode = u32;

/// Keyboard modifier keys
///
/// Represents the four temporal keys a binding can require.
/// Several platform names map to the same modifier (e.g., CMD, SUPER → Meta).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Modifier {
    /// Shift key
    Shift,
    /// Control key
    Ctrl,
    /// Alt/Option key
    Alt,
    /// Meta/Command/Windows key
    Meta,
}

impl Modifier {
    /// Resolves a modifier name as written in a combo string.
    ///
    /// Matching is case-insensitive. Returns `None` for anything that is
    /// not a known modifier name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "shift" => Some(Modifier::Shift),
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" | "options" => Some(Modifier::Alt),
            "meta" | "cmd" | "command" | "super" => Some(Modifier::Meta),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Shift => write!(f, "shift"),
            Modifier::Ctrl => write!(f, "ctrl"),
            Modifier::Alt => write!(f, "alt"),
            Modifier::Meta => write!(f, "meta"),
        }
    }
}

/// A base key and the modifiers that must be held with it
///
/// Represents one alternative of a combo string like `ctrl+shift+k`.
/// Modifiers are kept in the order they were written; the base key is
/// stored lowercased.
///
/// # Example
/// ```
/// use view_keys::core::{KeyCombo, Modifier};
///
/// let combo = KeyCombo::new(vec![Modifier::Ctrl], "S");
/// assert_eq!(combo.key, "s");
/// assert_eq!(combo.to_string(), "ctrl+s");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct KeyCombo {
    /// Modifier keys that must all be active
    pub modifiers: Vec<Modifier>,

    /// Base key name (e.g., "s", "enter", "f5")
    pub key: String,
}

impl KeyCombo {
    /// Create a new KeyCombo, lowercasing the key name
    pub fn new(modifiers: Vec<Modifier>, key: &str) -> Self {
        Self {
            modifiers,
            key: key.to_lowercase(),
        }
    }

    /// Modifiers sorted and deduplicated
    ///
    /// `ctrl+shift+k` and `shift+ctrl+k` fire on exactly the same events,
    /// so anything comparing combos by effect should use this form.
    pub fn normalized_modifiers(&self) -> Vec<Modifier> {
        let mut modifiers = self.modifiers.clone();
        modifiers.sort();
        modifiers.dedup();
        modifiers
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

/// Raw keyboard event kind the engine listens for
///
/// Defaults to `KeyDown`, which repeats while a key is held.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Trigger {
    /// Key pressed (repeats on hold)
    #[default]
    KeyDown,
    /// Key released
    KeyUp,
    /// Character-producing key pressed
    KeyPress,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::KeyDown => write!(f, "keydown"),
            Trigger::KeyUp => write!(f, "keyup"),
            Trigger::KeyPress => write!(f, "keypress"),
        }
    }
}

impl FromStr for Trigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keydown" => Ok(Trigger::KeyDown),
            "keyup" => Ok(Trigger::KeyUp),
            "keypress" => Ok(Trigger::KeyPress),
            other => Err(other.to_string()),
        }
    }
}

/// A raw keyboard event
///
/// Carries the firing key code and the state of each modifier at the time
/// the event was raised.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyEvent {
    /// Code of the key that fired
    pub key_code: KeyCode,
    /// Shift held
    pub shift: bool,
    /// Control held
    pub ctrl: bool,
    /// Alt held
    pub alt: bool,
    /// Meta held
    pub meta: bool,
}

impl KeyEvent {
    /// An event for `key_code` with no modifiers held
    pub fn new(key_code: KeyCode) -> Self {
        Self {
            key_code,
            ..Self::default()
        }
    }

    /// An event for a symbolic key name, `None` if the name has no code
    pub fn from_name(name: &str) -> Option<Self> {
        crate::core::keycode::code_of(name).map(Self::new)
    }

    /// An event that fires `combo` exactly, `None` if its key has no code
    pub fn from_combo(combo: &KeyCombo) -> Option<Self> {
        let event = Self::from_name(&combo.key)?;
        Some(combo.modifiers.iter().fold(event, |event, m| event.with(*m)))
    }

    /// Returns a copy with `modifier` held
    pub fn with(mut self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Shift => self.shift = true,
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Alt => self.alt = true,
            Modifier::Meta => self.meta = true,
        }
        self
    }

    /// Whether `modifier` was held when the event fired
    pub fn is_active(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(key_code: KeyCode) -> Self {
        Self::new(key_code)
    }
}
