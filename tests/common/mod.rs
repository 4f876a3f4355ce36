#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: Addresses, scenario files, and a state harness
//! - `assertions`: Assertion helpers with descriptive failure messages

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_err, assert_error_contains, assert_ok, assert_wei};
pub use fixtures::{addr, fixture_path, load_scenario, Harness};
