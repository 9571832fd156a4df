//! Engine module tests
//!
//! Contains test suites for the binding engine:
//! - Registration, unregistration and dispatch
//! - Delegation lifecycle and bind target resolution
//! - Listener namespacing on shared targets

#[cfg(test)]
mod engine_tests;
