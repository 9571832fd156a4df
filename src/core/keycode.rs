// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/keycode.rs
//!
//! Symbolic key name ↔ key code translation
//!
//! Single characters resolve to their uppercase character code, so
//! `"s"` and `"S"` both give 83 without touching the table. Longer names
//! go through a fixed table of named keys plus a handful of aliases that
//! read better on some platforms (`options` for alt, `return` for enter).
//!
//! The table is built once on first use and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::types::KeyCode;

/// Named keys in definition order
///
/// Order matters for [`name_of`]: when several names share a code the
/// first one listed wins.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("backspace", 8),
    ("tab", 9),
    ("enter", 13),
    ("space", 32),
    // Temporal modifiers
    ("shift", 16),
    ("ctrl", 17),
    ("alt", 18),
    ("meta", 91),
    // Modal
    ("caps_lock", 20),
    ("esc", 27),
    ("num_lock", 144),
    // Navigation
    ("page_up", 33),
    ("page_down", 34),
    ("end", 35),
    ("home", 36),
    ("left", 37),
    ("up", 38),
    ("right", 39),
    ("down", 40),
    // Insert/delete
    ("insert", 45),
    ("delete", 46),
    // F keys
    ("f1", 112),
    ("f2", 113),
    ("f3", 114),
    ("f4", 115),
    ("f5", 116),
    ("f6", 117),
    ("f7", 118),
    ("f8", 119),
    ("f9", 120),
    ("f10", 121),
    ("f11", 122),
    ("f12", 123),
];

/// Alias → canonical name
const ALIASES: &[(&str, &str)] = &[("options", "alt"), ("return", "enter")];

static KEY_MAP: LazyLock<HashMap<&'static str, KeyCode>> = LazyLock::new(|| {
    let mut map: HashMap<&'static str, KeyCode> = NAMED_KEYS.iter().copied().collect();

    for &(alias, canonical) in ALIASES {
        if let Some(code) = map.get(canonical).copied() {
            map.insert(alias, code);
        }
    }

    map
});

/// Resolves a symbolic key name to its key code
///
/// # Returns
/// - Single character: its uppercase character code
/// - Named key or alias: the table code (case-insensitive)
/// - Anything else: `None`
///
/// # Example
/// ```
/// use view_keys::core::keycode::code_of;
///
/// assert_eq!(code_of("s"), Some(83));
/// assert_eq!(code_of("Return"), code_of("enter"));
/// assert_eq!(code_of("hyper"), None);
/// ```
pub fn code_of(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        // 'ß' uppercases to "SS"; only the first char counts
        return c.to_uppercase().next().map(|upper| upper as KeyCode);
    }

    KEY_MAP.get(name.to_lowercase().as_str()).copied()
}

/// Reverse lookup from key code to a symbolic name
///
/// Returns the first table name carrying `code`, falling back to the
/// character whose code point is `code`. Codes that are not valid
/// characters give an empty string. Intended for diagnostics; dispatch
/// never goes through here.
pub fn name_of(code: KeyCode) -> String {
    NAMED_KEYS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| (*name).to_string())
        .or_else(|| char::from_u32(code).map(String::from))
        .unwrap_or_default()
}

/// Whether `name` is a table entry or alias rather than a plain character
pub fn is_named_key(name: &str) -> bool {
    KEY_MAP.contains_key(name.to_lowercase().as_str())
}

/// All named keys in definition order, aliases excluded
pub fn named_keys() -> impl Iterator<Item = (&'static str, KeyCode)> {
    NAMED_KEYS.iter().copied()
}
