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

//! Binding engine tests
//!
//! Covers the registration and dispatch rules:
//! - Modifier filtering and registration order
//! - Alternatives in one combo string
//! - Targeted and full unbinding
//! - Method-name handlers resolved through the view's lookup
//! - Re-delegation discarding earlier bindings

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{KeyEvent, Modifier, ParseError, Trigger};
use crate::engine::*;

type Log = Rc<RefCell<Vec<String>>>;

/// Handler appending `label:key` to the log
fn recorder(log: &Log, label: &str) -> Handler {
    let log = Rc::clone(log);
    let label = label.to_string();
    handler(move |_event, key| log.borrow_mut().push(format!("{label}:{key}")))
}

/// Scoped engine on a fresh element
fn scoped_engine() -> (Rc<EventTarget>, KeyBindingEngine) {
    let element = Rc::new(EventTarget::new());
    let config = EngineConfig {
        scoped: true,
        ..EngineConfig::default()
    };
    let engine = KeyBindingEngine::with_config(element.clone(), config);
    (element, engine)
}

fn ctrl_s() -> KeyEvent {
    KeyEvent::new(83).with(Modifier::Ctrl)
}

#[test]
fn test_modifier_required() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("ctrl+s", recorder(&log, "save")).unwrap();

    engine.dispatch(&ctrl_s());
    assert_eq!(*log.borrow(), vec!["save:s"]);

    engine.dispatch(&KeyEvent::new(83));
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_extra_modifiers_still_match() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("ctrl+s", recorder(&log, "save")).unwrap();
    engine.dispatch(&ctrl_s().with(Modifier::Shift));

    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_unmodified_binding_always_matches() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("s", recorder(&log, "search")).unwrap();
    engine.dispatch(&ctrl_s());
    engine.dispatch(&KeyEvent::new(83));

    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_alternatives_register_each_key() {
    let log = Log::default();
    let (_, engine) = scoped_engine();
    let h = recorder(&log, "h");

    engine.bind("a b", &h).unwrap();
    assert_eq!(engine.binding_count(), 2);

    engine.dispatch_key("a");
    engine.dispatch_key("B");

    assert_eq!(*log.borrow(), vec!["h:a", "h:b"]);
}

#[test]
fn test_registration_order_and_modifier_sets() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("ctrl+k", recorder(&log, "first")).unwrap();
    engine.bind("shift+k", recorder(&log, "second")).unwrap();
    engine.bind("k", recorder(&log, "third")).unwrap();

    engine.dispatch(&KeyEvent::new(75).with(Modifier::Shift));
    assert_eq!(*log.borrow(), vec!["second:k", "third:k"]);

    log.borrow_mut().clear();
    engine.dispatch(&KeyEvent::new(75).with(Modifier::Ctrl).with(Modifier::Shift));
    assert_eq!(*log.borrow(), vec!["first:k", "second:k", "third:k"]);
}

#[test]
fn test_handler_receives_key_name_as_bound() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("Return", recorder(&log, "a")).unwrap();
    engine.bind("enter", recorder(&log, "b")).unwrap();
    engine.dispatch_code(13);

    assert_eq!(*log.borrow(), vec!["a:return", "b:enter"]);
}

#[test]
fn test_unbind_specific_handler() {
    let log = Log::default();
    let (_, engine) = scoped_engine();
    let h = recorder(&log, "h");
    let other = recorder(&log, "other");

    engine.bind("s", &h).unwrap();
    engine.bind("s", &other).unwrap();
    engine.bind("s", &h).unwrap();

    engine.unbind("s", &h).unwrap();
    engine.dispatch_key("s");

    assert_eq!(*log.borrow(), vec!["other:s"]);
    assert_eq!(engine.bindings_for(83).len(), 1);
}

#[test]
fn test_unbind_key_clears_slot() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("s", recorder(&log, "a")).unwrap();
    engine.bind("ctrl+s", recorder(&log, "b")).unwrap();
    engine.bind("esc", recorder(&log, "c")).unwrap();

    engine.unbind_key("s").unwrap();
    engine.dispatch(&ctrl_s());
    engine.dispatch_key("esc");

    assert_eq!(*log.borrow(), vec!["c:esc"]);
}

#[test]
fn test_unbind_all() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    engine.bind("a b c", recorder(&log, "h")).unwrap();
    engine.unbind_all();

    assert_eq!(engine.binding_count(), 0);
    engine.dispatch_key("a");
    assert!(log.borrow().is_empty());
}

#[test]
fn test_redundant_teardown_is_noop() {
    let (_, engine) = scoped_engine();
    let h = handler(|_, _| {});

    engine.undelegate();
    engine.unbind_all();
    assert!(engine.unbind_key("s").is_ok());
    assert!(engine.unbind("s", &h).is_ok());
    assert!(engine.unbind("s", "never_bound").is_ok());
    assert!(!engine.is_delegated());

    let engine = engine.with_lookup(|_| None);
    assert!(engine.unbind("s", "never_bound").is_ok());
}

#[test]
fn test_unbind_unknown_method_keeps_bindings() {
    let log = Log::default();
    let (_, engine) = scoped_engine();
    let engine = engine.with_lookup(|_| None);

    engine.bind("s", recorder(&log, "h")).unwrap();
    engine.unbind("s", "missing").unwrap();

    assert_eq!(engine.binding_count(), 1);
}

#[test]
fn test_unbind_reads_only_base_key() {
    let log = Log::default();
    let (_, engine) = scoped_engine();
    let h = recorder(&log, "h");

    engine.bind("ctrl+s esc", &h).unwrap();

    // The modifier never selects the slot, so an unknown one is harmless
    engine.unbind_key("hyper+s").unwrap();
    assert!(engine.bindings_for(83).is_empty());
    assert_eq!(engine.binding_count(), 1);

    engine.unbind("hyper+esc", &h).unwrap();
    assert_eq!(engine.binding_count(), 0);

    assert!(matches!(
        engine.unbind_key("ctrl+"),
        Err(BindError::Parse(ParseError::InvalidSyntax { .. }))
    ));
}

#[test]
fn test_dispatch_without_bindings_is_noop() {
    let (_, engine) = scoped_engine();
    engine.dispatch_code(999);
    engine.dispatch_key("not-a-key");
    assert_eq!(engine.binding_count(), 0);
}

#[test]
fn test_unresolved_key_rejected() {
    let log = Log::default();
    let (_, engine) = scoped_engine();

    let result = engine.bind("esc hyper", recorder(&log, "h"));
    assert_eq!(
        result.err(),
        Some(BindError::UnresolvedKey {
            key: "hyper".to_string(),
            combo: "esc hyper".to_string(),
        })
    );

    // Nothing from the failed combo was registered
    assert_eq!(engine.binding_count(), 0);
}

#[test]
fn test_parse_errors_propagate() {
    let (_, engine) = scoped_engine();
    let result = engine.bind("hyper+s", handler(|_, _| {}));
    assert!(matches!(
        result,
        Err(BindError::Parse(ParseError::UnknownModifier { .. }))
    ));
}

#[test]
fn test_method_lookup() {
    let log = Log::default();
    let save = recorder(&log, "save");
    let methods = Rc::new(vec![("save".to_string(), Rc::clone(&save))]);

    let (_, engine) = scoped_engine();
    let engine = engine.with_lookup(move |name| {
        methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, h)| Rc::clone(h))
    });

    engine.bind("ctrl+s", "save").unwrap();
    engine.dispatch(&ctrl_s());
    assert_eq!(*log.borrow(), vec!["save:s"]);

    let bound = engine.bindings_for(83);
    assert_eq!(bound[0].method.as_deref(), Some("save"));

    // Unbinding by name finds the same Rc
    engine.unbind("s", "save").unwrap();
    assert_eq!(engine.binding_count(), 0);
}

#[test]
fn test_unknown_method() {
    let (_, engine) = scoped_engine();
    assert_eq!(
        engine.bind("s", "missing").err(),
        Some(BindError::UnresolvedHandler("missing".to_string()))
    );

    let engine = engine.with_lookup(|_| None);
    assert!(matches!(
        engine.bind("s", "missing"),
        Err(BindError::UnresolvedHandler(_))
    ));
}

#[test]
fn test_delegate_registers_spec_and_listens() {
    let log = Log::default();
    let (element, engine) = scoped_engine();

    let spec = BindingSpec::new()
        .key("ctrl+s", recorder(&log, "save"))
        .key("esc", recorder(&log, "close"));
    engine.delegate(Some(&spec)).unwrap();

    assert!(engine.is_delegated());
    assert_eq!(element.listener_count(), 1);

    element.emit(Trigger::KeyDown, &ctrl_s());
    element.emit(Trigger::KeyDown, &KeyEvent::new(27));
    // Not the configured trigger
    element.emit(Trigger::KeyUp, &KeyEvent::new(27));

    assert_eq!(*log.borrow(), vec!["save:s", "close:esc"]);
}

#[test]
fn test_delegate_uses_default_spec() {
    let log = Log::default();
    let (element, engine) = scoped_engine();
    let engine = engine.with_keys(BindingSpec::new().key("f5", recorder(&log, "refresh")));

    engine.delegate(None).unwrap();
    element.emit(Trigger::KeyDown, &KeyEvent::new(116));

    assert_eq!(*log.borrow(), vec!["refresh:f5"]);
}

#[test]
fn test_redelegate_discards_previous_bindings() {
    let log = Log::default();
    let (element, engine) = scoped_engine();

    engine
        .delegate(Some(&BindingSpec::new().key("a", recorder(&log, "old"))))
        .unwrap();
    engine.bind("b", recorder(&log, "extra")).unwrap();

    engine.undelegate();
    assert!(!engine.is_delegated());
    assert_eq!(element.listener_count(), 0);

    engine
        .delegate(Some(&BindingSpec::new().key("c", recorder(&log, "new"))))
        .unwrap();
    assert_eq!(element.listener_count(), 1);

    for name in ["a", "b", "c"] {
        element.emit(Trigger::KeyDown, &KeyEvent::from_name(name).unwrap());
    }
    assert_eq!(*log.borrow(), vec!["new:c"]);
}

#[test]
fn test_delegate_twice_keeps_one_listener() {
    let log = Log::default();
    let (element, engine) = scoped_engine();
    let spec = BindingSpec::new().key("a", recorder(&log, "h"));

    engine.delegate(Some(&spec)).unwrap();
    engine.delegate(Some(&spec)).unwrap();

    assert_eq!(element.listener_count(), 1);
    assert_eq!(engine.binding_count(), 1);

    element.emit(Trigger::KeyDown, &KeyEvent::new(65));
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_handler_can_unbind_itself_during_dispatch() {
    let log = Log::default();
    let (element, engine) = scoped_engine();
    let weak = engine.downgrade();

    let once = {
        let log = Rc::clone(&log);
        handler(move |_event, key| {
            log.borrow_mut().push(format!("once:{key}"));
            if let Some(engine) = weak.upgrade() {
                engine.unbind_key(key).unwrap();
            }
        })
    };

    engine
        .delegate(Some(
            &BindingSpec::new()
                .key("x", once)
                .key("x", recorder(&log, "after")),
        ))
        .unwrap();

    element.emit(Trigger::KeyDown, &KeyEvent::new(88));
    // The snapshot still runs the second binding
    assert_eq!(*log.borrow(), vec!["once:x", "after:x"]);

    element.emit(Trigger::KeyDown, &KeyEvent::new(88));
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_handler_can_undelegate_during_dispatch() {
    let (element, engine) = scoped_engine();
    let weak = engine.downgrade();

    engine
        .delegate(Some(&BindingSpec::new().key("esc", handler(move |_, _| {
            if let Some(engine) = weak.upgrade() {
                engine.undelegate();
            }
        }))))
        .unwrap();

    element.emit(Trigger::KeyDown, &KeyEvent::new(27));
    assert!(!engine.is_delegated());
    assert_eq!(element.listener_count(), 0);
}

#[test]
fn test_name_of() {
    let (_, engine) = scoped_engine();
    assert_eq!(engine.name_of(27), "esc");
    assert_eq!(engine.name_of(65), "A");
}

#[test]
fn test_combos_lists_bindings() {
    let (_, engine) = scoped_engine();
    let engine = engine.with_lookup(|_| Some(handler(|_, _| {})));

    engine.bind("ctrl+s cmd+s", "save").unwrap();
    engine.bind("esc", handler(|_, _| {})).unwrap();

    let combos = engine.combos();
    assert_eq!(combos.len(), 3);
    assert_eq!(combos[0].0.to_string(), "esc");
    assert_eq!(combos[0].1, None);
    assert_eq!(combos[1].0.to_string(), "ctrl+s");
    assert_eq!(combos[2].0.to_string(), "meta+s");
    assert_eq!(combos[2].1.as_deref(), Some("save"));
}
