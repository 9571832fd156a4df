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

//! Key binding engine
//!
//! Each view owns one [`KeyBindingEngine`]. The engine keeps a table from
//! key code to bindings, attaches a single listener to its bind target and
//! routes every raw event to the bindings whose modifiers are all held.
//!
//! # Lifecycle
//!
//! - **Undelegated** (initial): no listener, no bindings
//! - `delegate()` → **Delegated**: one listener attached, bindings active
//! - `undelegate()` → **Undelegated**
//!
//! Calling `delegate()` while delegated clears everything and rebuilds it;
//! delegation is never additive.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use view_keys::core::{KeyEvent, Modifier, Trigger};
//! use view_keys::engine::{handler, BindingSpec, EngineConfig, EventTarget, KeyBindingEngine};
//!
//! let element = Rc::new(EventTarget::new());
//! let config = EngineConfig { scoped: true, ..EngineConfig::default() };
//! let engine = KeyBindingEngine::with_config(element.clone(), config);
//!
//! let save = handler(|_event, key| println!("save via {key}"));
//! engine.delegate(Some(&BindingSpec::new().key("ctrl+s cmd+s", save)))?;
//!
//! let event = KeyEvent::new(83).with(Modifier::Ctrl);
//! element.emit(Trigger::KeyDown, &event);
//! # Ok::<(), view_keys::engine::BindError>(())
//! ```
//!
//! # Re-entrancy
//!
//! No borrow of engine state is held while a handler runs. Dispatch walks a
//! snapshot of the bindings for the event's key code, so a handler may
//! bind, unbind or undelegate on its own engine; changes apply from the
//! next event.

pub mod error;
pub mod handler;
pub mod target;

pub use error::BindError;
pub use handler::{handler, BindingSpec, Handler, HandlerRef, MethodLookup};
pub use target::{BindTarget, EventTarget, Listener};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::core::keycode::{self, code_of};
use crate::core::parser::{parse_base_keys, parse_combos};
use crate::core::{KeyCode, KeyCombo, KeyEvent, Modifier, Trigger};

/// Source of per-engine ids used to namespace listeners
static NEXT_CID: AtomicU64 = AtomicU64::new(1);

/// Per-view engine configuration
///
/// Read when the engine delegates; changing it afterwards takes effect on
/// the next `delegate()`.
#[derive(Clone, Default)]
pub struct EngineConfig {
    /// Explicit bind target, overriding `scoped`
    pub bind_to: Option<Rc<dyn BindTarget>>,

    /// Raw event to listen for
    pub trigger: Trigger,

    /// Listen on the view's own element instead of the document
    pub scoped: bool,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("bind_to", &self.bind_to.is_some())
            .field("trigger", &self.trigger)
            .field("scoped", &self.scoped)
            .finish()
    }
}

/// One registered shortcut
///
/// Created by `bind`, never mutated; unbinding discards it.
#[derive(Clone)]
pub struct Binding {
    /// Symbolic base key as written (lowercased)
    pub key: String,

    /// Modifiers that must all be held
    pub modifiers: Vec<Modifier>,

    /// Handler to invoke
    pub handler: Handler,

    /// Method name when the handler was bound by name
    pub method: Option<String>,
}

impl Binding {
    /// Whether `event` satisfies every modifier this binding requires
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.modifiers.iter().all(|m| event.is_active(*m))
    }

    /// The combo this binding was registered for
    pub fn combo(&self) -> KeyCombo {
        KeyCombo::new(self.modifiers.clone(), &self.key)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("modifiers", &self.modifiers)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Listener currently attached to a bind target
struct Attachment {
    target: Rc<dyn BindTarget>,
    trigger: Trigger,
    namespace: String,
}

struct EngineState {
    cid: String,
    element: Rc<dyn BindTarget>,
    config: EngineConfig,
    /// Bind target, resolved on first delegation
    target: Option<Rc<dyn BindTarget>>,
    attachment: Option<Attachment>,
    bindings: HashMap<KeyCode, Vec<Binding>>,
    defaults: BindingSpec,
    lookup: Option<MethodLookup>,
}

impl EngineState {
    fn resolve_target(&mut self) -> Rc<dyn BindTarget> {
        if let Some(target) = &self.target {
            return Rc::clone(target);
        }

        let target: Rc<dyn BindTarget> = match (&self.config.bind_to, self.config.scoped) {
            (Some(bind_to), _) => Rc::clone(bind_to),
            (None, true) => Rc::clone(&self.element),
            (None, false) => EventTarget::document() as Rc<dyn BindTarget>,
        };

        self.target = Some(Rc::clone(&target));
        target
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        if let Some(Attachment {
            target,
            trigger,
            namespace,
        }) = self.attachment.take()
        {
            target.off(trigger, &namespace);
            debug!(%trigger, %namespace, "dropped delegated engine");
        }
    }
}

/// Binding and dispatch engine owned by one view
///
/// Cloning gives another handle to the same engine. Handlers that need to
/// reach their own engine should capture [`KeyBindingEngine::downgrade`]
/// rather than a clone, otherwise the engine keeps itself alive.
#[derive(Clone)]
pub struct KeyBindingEngine {
    state: Rc<RefCell<EngineState>>,
}

/// Non-owning engine handle
#[derive(Clone)]
pub struct WeakEngine {
    state: Weak<RefCell<EngineState>>,
}

impl WeakEngine {
    /// Upgrades to a full handle if the engine is still alive
    pub fn upgrade(&self) -> Option<KeyBindingEngine> {
        self.state.upgrade().map(|state| KeyBindingEngine { state })
    }
}

impl KeyBindingEngine {
    /// Creates an engine for a view whose root element is `element`
    pub fn new(element: Rc<dyn BindTarget>) -> Self {
        Self::with_config(element, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration
    pub fn with_config(element: Rc<dyn BindTarget>, config: EngineConfig) -> Self {
        let cid = format!("view{}", NEXT_CID.fetch_add(1, Ordering::Relaxed));

        Self {
            state: Rc::new(RefCell::new(EngineState {
                cid,
                element,
                config,
                target: None,
                attachment: None,
                bindings: HashMap::new(),
                defaults: BindingSpec::new(),
                lookup: None,
            })),
        }
    }

    /// Sets the lookup used to resolve handlers given by method name
    pub fn with_lookup<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<Handler> + 'static,
    {
        self.state.borrow_mut().lookup = Some(Rc::new(lookup));
        self
    }

    /// Sets the spec `delegate(None)` registers
    pub fn with_keys(self, spec: BindingSpec) -> Self {
        self.state.borrow_mut().defaults = spec;
        self
    }

    /// Replaces the configuration
    ///
    /// The bind target is resolved again on the next `delegate()`. An
    /// attached listener stays where it is until then.
    pub fn configure(&self, config: EngineConfig) {
        let mut state = self.state.borrow_mut();
        state.config = config;
        state.target = None;
    }

    /// Current configuration
    pub fn config(&self) -> EngineConfig {
        self.state.borrow().config.clone()
    }

    /// Returns a non-owning handle to this engine
    pub fn downgrade(&self) -> WeakEngine {
        WeakEngine {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Unique id of this engine
    pub fn cid(&self) -> String {
        self.state.borrow().cid.clone()
    }

    /// Listener namespace, e.g. `keydown.delegateKeysview3`
    pub fn namespace(&self) -> String {
        let state = self.state.borrow();
        format!("{}.{}", state.config.trigger, listener_namespace(&state.cid))
    }

    /// Whether a listener is currently attached
    pub fn is_delegated(&self) -> bool {
        self.state.borrow().attachment.is_some()
    }

    /// Attaches the listener and registers `spec` (or the default spec)
    ///
    /// Always starts from scratch: any existing listener is detached and
    /// every binding is discarded first.
    ///
    /// # Errors
    ///
    /// Returns the first `bind` error. Entries before it stay registered
    /// and the listener stays attached.
    pub fn delegate(&self, spec: Option<&BindingSpec>) -> Result<&Self, BindError> {
        self.undelegate();

        let (target, trigger, namespace, defaults) = {
            let mut state = self.state.borrow_mut();
            let target = state.resolve_target();
            let trigger = state.config.trigger;
            let namespace = listener_namespace(&state.cid);
            let defaults = spec.is_none().then(|| state.defaults.clone());
            (target, trigger, namespace, defaults)
        };

        let weak = self.downgrade();
        let listener: Listener = Rc::new(move |event: &KeyEvent| {
            if let Some(engine) = weak.upgrade() {
                engine.dispatch(event);
            }
        });
        target.on(trigger, &namespace, listener);

        debug!(%trigger, %namespace, "delegated keys");

        self.state.borrow_mut().attachment = Some(Attachment {
            target,
            trigger,
            namespace,
        });

        let spec = spec.or(defaults.as_ref());
        if let Some(spec) = spec {
            for (combo, handler) in spec.iter() {
                self.bind(combo, handler.clone())?;
            }
        }

        Ok(self)
    }

    /// Detaches the listener and discards every binding
    ///
    /// Safe to call when never delegated.
    pub fn undelegate(&self) -> &Self {
        let attachment = {
            let mut state = self.state.borrow_mut();
            state.bindings.clear();
            state.attachment.take()
        };

        if let Some(Attachment {
            target,
            trigger,
            namespace,
        }) = attachment
        {
            target.off(trigger, &namespace);
            debug!(%trigger, %namespace, "undelegated keys");
        }

        self
    }

    /// Registers `handler` for every alternative in `combo`
    ///
    /// `"ctrl+s cmd+s"` registers two bindings. All alternatives are parsed
    /// and resolved before any of them is registered.
    ///
    /// # Errors
    ///
    /// - `BindError::Parse` for malformed combos or unknown modifiers
    /// - `BindError::UnresolvedKey` when a base key has no key code
    /// - `BindError::UnresolvedHandler` when a method name has no handler
    pub fn bind(&self, combo: &str, handler: impl Into<HandlerRef>) -> Result<&Self, BindError> {
        let resolved = resolve_combos(combo)?;
        let handler_ref = handler.into();
        let handler = self.resolve_handler(&handler_ref)?;
        let method = handler_ref.method_name().map(str::to_string);

        let mut state = self.state.borrow_mut();
        for (code, parsed) in resolved {
            trace!(combo = %parsed, code, "bind");
            state.bindings.entry(code).or_default().push(Binding {
                key: parsed.key,
                modifiers: parsed.modifiers,
                handler: Rc::clone(&handler),
                method: method.clone(),
            });
        }

        Ok(self)
    }

    /// Removes the bindings of `handler` under every alternative in `combo`
    ///
    /// Other handlers on the same keys keep their bindings and order. A
    /// handler given by name is looked up again, so the lookup must return
    /// the same `Rc` it returned at bind time for anything to be removed.
    /// A name the lookup doesn't know selects nothing.
    ///
    /// # Errors
    ///
    /// Returns `BindError::Parse` when `combo` is malformed (empty, or an
    /// empty `+` segment). Modifiers are not validated, since only the base
    /// key selects what gets removed.
    pub fn unbind(&self, combo: &str, handler: impl Into<HandlerRef>) -> Result<&Self, BindError> {
        let codes = unbind_codes(combo)?;
        let handler = match self.resolve_handler(&handler.into()) {
            Ok(handler) => handler,
            Err(BindError::UnresolvedHandler(name)) => {
                trace!(%combo, method = %name, "unbind of unknown method");
                return Ok(self);
            }
            Err(e) => return Err(e),
        };

        let mut state = self.state.borrow_mut();
        for code in codes {
            if let Some(bindings) = state.bindings.get_mut(&code) {
                bindings.retain(|b| !Rc::ptr_eq(&b.handler, &handler));
            }
        }

        Ok(self)
    }

    /// Removes every binding under the alternatives in `combo`
    ///
    /// # Errors
    ///
    /// Same as [`KeyBindingEngine::unbind`]: only malformed combos fail.
    pub fn unbind_key(&self, combo: &str) -> Result<&Self, BindError> {
        let codes = unbind_codes(combo)?;

        let mut state = self.state.borrow_mut();
        for code in codes {
            state.bindings.remove(&code);
        }

        Ok(self)
    }

    /// Removes every binding, leaving the listener attached
    pub fn unbind_all(&self) -> &Self {
        self.state.borrow_mut().bindings.clear();
        self
    }

    /// Invokes every binding matching `event`, in registration order
    ///
    /// Events whose key code has no bindings are ignored.
    pub fn dispatch(&self, event: &KeyEvent) -> &Self {
        let snapshot = self.state.borrow().bindings.get(&event.key_code).cloned();

        let Some(bindings) = snapshot else {
            return self;
        };

        for binding in bindings.iter().filter(|b| b.matches(event)) {
            trace!(key = %binding.key, code = event.key_code, "dispatch");
            (binding.handler)(event, &binding.key);
        }

        self
    }

    /// Dispatches a modifier-free event for a symbolic key name
    ///
    /// Names without a key code are ignored like any unbound key.
    pub fn dispatch_key(&self, name: &str) -> &Self {
        match KeyEvent::from_name(name) {
            Some(event) => self.dispatch(&event),
            None => self,
        }
    }

    /// Dispatches a modifier-free event for a raw key code
    pub fn dispatch_code(&self, code: KeyCode) -> &Self {
        self.dispatch(&KeyEvent::new(code))
    }

    /// Symbolic name for a key code
    pub fn name_of(&self, code: KeyCode) -> String {
        keycode::name_of(code)
    }

    /// Total number of registered bindings
    pub fn binding_count(&self) -> usize {
        self.state.borrow().bindings.values().map(Vec::len).sum()
    }

    /// Bindings registered for `code`, in invocation order
    pub fn bindings_for(&self, code: KeyCode) -> Vec<Binding> {
        self.state
            .borrow()
            .bindings
            .get(&code)
            .cloned()
            .unwrap_or_default()
    }

    /// Every registered combo with the method name it calls, by key code
    pub fn combos(&self) -> Vec<(KeyCombo, Option<String>)> {
        let state = self.state.borrow();
        let mut codes: Vec<&KeyCode> = state.bindings.keys().collect();
        codes.sort();

        codes
            .into_iter()
            .flat_map(|code| state.bindings[code].iter())
            .map(|b| (b.combo(), b.method.clone()))
            .collect()
    }

    fn resolve_handler(&self, handler: &HandlerRef) -> Result<Handler, BindError> {
        match handler {
            HandlerRef::Callable(h) => Ok(Rc::clone(h)),
            HandlerRef::Method(name) => {
                // Released before calling into the host
                let lookup = self.state.borrow().lookup.clone();
                lookup
                    .and_then(|lookup| lookup(name))
                    .ok_or_else(|| BindError::UnresolvedHandler(name.clone()))
            }
        }
    }
}

impl fmt::Debug for KeyBindingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("KeyBindingEngine")
            .field("cid", &state.cid)
            .field("config", &state.config)
            .field("delegated", &state.attachment.is_some())
            .field("bindings", &state.bindings.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

fn listener_namespace(cid: &str) -> String {
    format!("delegateKeys{}", cid)
}

/// Parses `combo` and resolves every alternative's key code
///
/// All alternatives must resolve; the first failure is returned.
pub fn resolve_combos(combo: &str) -> Result<Vec<(KeyCode, KeyCombo)>, BindError> {
    parse_combos(combo)?
        .into_iter()
        .map(|parsed| match code_of(&parsed.key) {
            Some(code) => Ok((code, parsed)),
            None => Err(BindError::UnresolvedKey {
                key: parsed.key,
                combo: combo.to_string(),
            }),
        })
        .collect()
}

/// Key codes selected by `combo` for removal
///
/// Only base keys are read. Keys without a code cannot hold bindings, so
/// they select nothing.
fn unbind_codes(combo: &str) -> Result<Vec<KeyCode>, BindError> {
    Ok(parse_base_keys(combo)?
        .iter()
        .filter_map(|key| code_of(key))
        .collect())
}

#[cfg(test)]
mod tests;
