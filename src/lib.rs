//! chatcmd - A two-level text command router for chat bots.
//!
//! This library exposes the router and the bundled modules for use in
//! integration tests and other front ends.

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod modules;
