//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Key code table tests
//! - Combo parser tests
//! - Overlap detection tests
