//! Integration tests for the command router.
//!
//! These exercise the public API only: registry, dispatcher, bundled
//! modules and the console front end.

pub mod bundled_test;
pub mod dispatch_test;
