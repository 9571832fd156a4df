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

//! View Keys
//!
//! Declarative keyboard shortcuts for UI views: a view declares combos like
//! `"ctrl+s cmd+s"` or `"esc"` mapped to handlers, and raw keyboard events
//! are routed to every matching handler with modifier-key filtering.
//!
//! # Features
//!
//! - **Symbolic key names:** Single characters, named keys and aliases
//! - **Modifier matching:** shift, ctrl, alt and meta, with platform aliases
//! - **Alternatives:** One handler for several combos in a single string
//! - **One listener per view:** Namespaced so views sharing the document
//!   never remove each other's listeners
//! - **Keys files:** Shortcuts kept outside code, validated at load time
//!
//! # Architecture
//!
//! - **`core`:** Key code table, combo parser, types, overlap detection
//! - **`engine`:** Binding table, dispatch, bind targets
//! - **`view`:** Lifecycle glue for host views
//! - **`config`:** Keys file parsing
//!
//! # Examples
//!
//! ## Binding keys on a view
//!
//! ```
//! use std::rc::Rc;
//! use view_keys::core::{KeyEvent, Modifier, Trigger};
//! use view_keys::engine::{handler, BindingSpec, EventTarget, KeyBindingEngine};
//!
//! let engine = KeyBindingEngine::new(Rc::new(EventTarget::new()));
//! let spec = BindingSpec::new()
//!     .key("ctrl+s cmd+s", handler(|_event, key| println!("save ({key})")))
//!     .key("esc", handler(|_event, _key| println!("close")));
//! engine.delegate(Some(&spec))?;
//!
//! // Unscoped engines listen on the shared document target
//! EventTarget::document().emit(Trigger::KeyDown, &KeyEvent::new(83).with(Modifier::Meta));
//! engine.undelegate();
//! # Ok::<(), view_keys::engine::BindError>(())
//! ```
//!
//! ## Loading a keys file
//!
//! ```no_run
//! use view_keys::config::KeysFile;
//! use std::path::Path;
//!
//! let file = KeysFile::load(Path::new("/tmp/editor.keys"))?;
//! println!("Found {} shortcuts", file.keys.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod view;

// Re-export commonly used types for convenience
pub use self::core::{KeyCode, KeyCombo, KeyEvent, Modifier, Trigger};
pub use engine::{BindingSpec, KeyBindingEngine};
pub use view::KeysView;
