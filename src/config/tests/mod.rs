//! Config module tests
//!
//! - Keys file parsing (settings, variables, errors with line numbers)
//! - Loading from disk
//! - Building engines from a loaded file
