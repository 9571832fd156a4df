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

//! Bind targets
//!
//! A bind target is whatever raises raw keyboard events: a view's own
//! element, or the document-wide target every unscoped view shares.
//! Listeners are registered under a trigger plus a namespace so that each
//! engine can remove exactly its own listener from a shared target.
//!
//! [`EventTarget`] is the in-process implementation. Hosts bridging a real
//! toolkit implement [`BindTarget`] on their own element handle and call
//! the registered listeners from the toolkit's key callback.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::core::{KeyEvent, Trigger};

/// Raw event listener registered on a bind target
pub type Listener = Rc<dyn Fn(&KeyEvent)>;

/// Something keyboard listeners can be attached to
pub trait BindTarget {
    /// Registers `listener` for `trigger` events under `namespace`
    fn on(&self, trigger: Trigger, namespace: &str, listener: Listener);

    /// Removes every listener registered for `trigger` under `namespace`
    ///
    /// Removing a namespace that was never registered is a no-op.
    fn off(&self, trigger: Trigger, namespace: &str);
}

struct Registration {
    trigger: Trigger,
    namespace: String,
    listener: Listener,
}

/// In-process event target
///
/// Keeps listeners in registration order and calls them synchronously from
/// [`EventTarget::emit`].
#[derive(Default)]
pub struct EventTarget {
    listeners: RefCell<Vec<Registration>>,
}

thread_local! {
    static DOCUMENT: Rc<EventTarget> = Rc::new(EventTarget::new());
}

impl EventTarget {
    /// Creates a target with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// The document-wide target shared by every unscoped view
    ///
    /// UI work happens on one thread, so there is one document per thread.
    pub fn document() -> Rc<EventTarget> {
        DOCUMENT.with(Rc::clone)
    }

    /// Delivers `event` to every listener registered for `trigger`
    ///
    /// Listeners run over a snapshot, so a listener may register or remove
    /// listeners (including itself) without affecting this delivery.
    /// Returns the number of listeners called.
    pub fn emit(&self, trigger: Trigger, event: &KeyEvent) -> usize {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.trigger == trigger)
            .map(|r| Rc::clone(&r.listener))
            .collect();

        trace!(%trigger, key_code = event.key_code, listeners = snapshot.len(), "emit");

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Whether a listener is registered for `trigger` under `namespace`
    pub fn has_listener(&self, trigger: Trigger, namespace: &str) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|r| r.trigger == trigger && r.namespace == namespace)
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl BindTarget for EventTarget {
    fn on(&self, trigger: Trigger, namespace: &str, listener: Listener) {
        self.listeners.borrow_mut().push(Registration {
            trigger,
            namespace: namespace.to_string(),
            listener,
        });
    }

    fn off(&self, trigger: Trigger, namespace: &str) {
        self.listeners
            .borrow_mut()
            .retain(|r| !(r.trigger == trigger && r.namespace == namespace));
    }
}
