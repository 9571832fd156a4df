//! View integration
//!
//! Views hold a [`KeyBindingEngine`] and expose it through [`KeysView`].
//! The trait's provided `delegate_events`/`undelegate_events` are what the
//! host calls when the view is attached to or detached from its element;
//! they run the view's own event wiring and the key engine together.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use view_keys::engine::{handler, BindingSpec, EventTarget, KeyBindingEngine};
//! use view_keys::view::KeysView;
//!
//! struct Editor {
//!     keys: KeyBindingEngine,
//! }
//!
//! impl KeysView for Editor {
//!     fn keys(&self) -> &KeyBindingEngine {
//!         &self.keys
//!     }
//! }
//!
//! let spec = BindingSpec::new().key("esc", handler(|_, _| {}));
//! let editor = Editor {
//!     keys: KeyBindingEngine::new(Rc::new(EventTarget::new())).with_keys(spec),
//! };
//!
//! editor.delegate_events()?;
//! assert!(editor.keys().is_delegated());
//! editor.undelegate_events();
//! # Ok::<(), view_keys::engine::BindError>(())
//! ```

use crate::engine::{BindError, KeyBindingEngine};

/// A view with declarative key bindings
pub trait KeysView {
    /// The view's key engine
    fn keys(&self) -> &KeyBindingEngine;

    /// Host hook wiring the view's other events
    fn delegate_view_events(&self) {}

    /// Host hook removing the view's other events
    fn undelegate_view_events(&self) {}

    /// Wires view events, then delegates the engine's default keys
    fn delegate_events(&self) -> Result<&Self, BindError> {
        self.delegate_view_events();
        self.keys().delegate(None)?;
        Ok(self)
    }

    /// Undelegates keys, then removes the view's other events
    fn undelegate_events(&self) -> &Self {
        self.keys().undelegate();
        self.undelegate_view_events();
        self
    }
}
