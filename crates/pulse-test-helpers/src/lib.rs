//! Shared test utilities for Pulse.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Custom assertion macros for testing
//! - [`mock`] - Recording scroll surface and mode-switch probe
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! pulse-test-helpers = { workspace = true, features = ["mock"] }
//! ```
//!
//! ```rust,ignore
//! use pulse_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

pub use must::*;
