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

//! Handlers and binding specifications
//!
//! A handler is a shared callable receiving the raw event and the symbolic
//! key name of the binding that fired. Views refer to handlers either
//! directly or by method name; names are resolved through a lookup the
//! host view supplies, never by reflection.

use std::fmt;
use std::rc::Rc;

use crate::core::KeyEvent;

/// Shared key handler, called as `(event, key name)`
///
/// Identity is pointer identity: unbinding a specific handler removes the
/// bindings holding a clone of the same `Rc`.
pub type Handler = Rc<dyn Fn(&KeyEvent, &str)>;

/// Host capability resolving a method name to a handler
pub type MethodLookup = Rc<dyn Fn(&str) -> Option<Handler>>;

/// Wraps a closure into a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&KeyEvent, &str) + 'static,
{
    Rc::new(f)
}

/// A handler given directly or by the name of a view method
#[derive(Clone)]
pub enum HandlerRef {
    /// Already-invocable handler
    Callable(Handler),
    /// Method name, resolved through the engine's lookup at bind time
    Method(String),
}

impl HandlerRef {
    /// Method name, if this reference is by name
    pub fn method_name(&self) -> Option<&str> {
        match self {
            HandlerRef::Callable(_) => None,
            HandlerRef::Method(name) => Some(name),
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Callable(h) => write!(f, "Callable({:p})", Rc::as_ptr(h)),
            HandlerRef::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

impl From<Handler> for HandlerRef {
    fn from(handler: Handler) -> Self {
        HandlerRef::Callable(handler)
    }
}

impl From<&Handler> for HandlerRef {
    fn from(handler: &Handler) -> Self {
        HandlerRef::Callable(Rc::clone(handler))
    }
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        HandlerRef::Method(name.to_string())
    }
}

impl From<String> for HandlerRef {
    fn from(name: String) -> Self {
        HandlerRef::Method(name)
    }
}

/// Ordered mapping from combo string to handler
///
/// Entries are registered in insertion order, which decides invocation
/// order when several of them share a key code.
///
/// # Example
/// ```
/// use view_keys::engine::BindingSpec;
///
/// let spec = BindingSpec::new()
///     .key("ctrl+s cmd+s", "save")
///     .key("esc", "close");
/// assert_eq!(spec.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BindingSpec {
    entries: Vec<(String, HandlerRef)>,
}

impl BindingSpec {
    /// Creates an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder style
    pub fn key(mut self, combo: impl Into<String>, handler: impl Into<HandlerRef>) -> Self {
        self.push(combo, handler);
        self
    }

    /// Adds an entry
    pub fn push(&mut self, combo: impl Into<String>, handler: impl Into<HandlerRef>) {
        self.entries.push((combo.into(), handler.into()));
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandlerRef)> {
        self.entries.iter().map(|(combo, handler)| (combo.as_str(), handler))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the spec has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
