//! Overlapping shortcut detection
//!
//! Two bindings overlap when they resolve to the same key code and require
//! the same set of modifiers: every event that fires one fires the other.
//! That is allowed (both handlers run, in registration order) but is
//! usually a mistake worth reporting.
//!
//! # Performance
//! - Add combo: O(1) average case
//! - Check overlap: O(1) average case
//! - List all overlaps: O(n log n) where n = number of unique combos

use std::collections::HashMap;

use crate::core::keycode::code_of;
use crate::core::types::{KeyCode, KeyCombo, Modifier};

/// What a combo effectively fires on: key code plus sorted modifiers
type FiringKey = (KeyCode, Vec<Modifier>);

/// Detects overlapping shortcuts using HashMap-based indexing.
///
/// Combos whose key has no code are ignored; they can never fire.
pub struct OverlapDetector {
    /// Maps the firing key to every (combo, handler label) using it.
    combos: HashMap<FiringKey, Vec<(KeyCombo, String)>>,
}

/// A set of bindings that all fire on the same events.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlap {
    /// Key code shared by every binding
    pub key_code: KeyCode,

    /// First combo registered for this firing key
    pub combo: KeyCombo,

    /// Handler labels in registration order (always 2 or more)
    pub handlers: Vec<String>,
}

impl OverlapDetector {
    /// Creates a new empty detector.
    pub fn new() -> Self {
        Self {
            combos: HashMap::new(),
        }
    }

    /// Adds a combo bound to the handler described by `label`.
    pub fn add_combo(&mut self, combo: KeyCombo, label: impl Into<String>) {
        let Some(code) = code_of(&combo.key) else {
            return;
        };

        self.combos
            .entry((code, combo.normalized_modifiers()))
            .or_default()
            .push((combo, label.into()));
    }

    /// Finds every firing key with two or more combos, ordered by key code.
    pub fn find_overlaps(&self) -> Vec<Overlap> {
        let mut overlaps: Vec<Overlap> = self
            .combos
            .iter()
            .filter(|(_, entries)| entries.len() > 1)
            .map(|((code, _), entries)| Overlap {
                key_code: *code,
                combo: entries[0].0.clone(),
                handlers: entries.iter().map(|(_, label)| label.clone()).collect(),
            })
            .collect();

        overlaps.sort_by(|a, b| {
            a.key_code
                .cmp(&b.key_code)
                .then_with(|| a.combo.normalized_modifiers().cmp(&b.combo.normalized_modifiers()))
        });
        overlaps
    }

    /// Checks if `combo` fires together with at least one other binding.
    pub fn has_overlap(&self, combo: &KeyCombo) -> bool {
        code_of(&combo.key)
            .and_then(|code| self.combos.get(&(code, combo.normalized_modifiers())))
            .map(|entries| entries.len() > 1)
            .unwrap_or(false)
    }

    /// Returns the total number of combos tracked.
    pub fn total_combos(&self) -> usize {
        self.combos.values().map(|v| v.len()).sum()
    }
}

impl Default for OverlapDetector {
    fn default() -> Self {
        Self::new()
    }
}
