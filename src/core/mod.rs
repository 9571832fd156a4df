// Copyright 2025 bakri (tidynest@proton.me)
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

//! src/core/mod.rs
//!
//! Core key handling module
//!
//! This module contains the data structures and algorithms that do not
//! depend on any bind target or host view:
//! - Type definitions for key codes, modifiers, combos and events
//! - The symbolic key name ↔ key code table
//! - Combo string parsing
//! - Overlap detection using HashMap-based O(1) lookup
//!
//! Everything here is pure and can be unit tested without an event source.

pub mod conflict;
pub mod keycode;
pub mod parser;
pub mod types;

pub use conflict::{Overlap, OverlapDetector};
pub use parser::ParseError;
pub use types::*;

#[cfg(test)]
mod tests;
