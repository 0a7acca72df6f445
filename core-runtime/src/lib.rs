//! # Core Runtime Module
//!
//! Foundational infrastructure shared by the Drive client crates:
//! - Logging and tracing bootstrap
//! - Configuration management
//! - Event bus for listing and mutation events
//!
//! ## Overview
//!
//! Nothing in here knows how to talk to Drive. It establishes the logging
//! conventions, the validated configuration every client is built from, and
//! the broadcast channel that replaces "print if verbose" side effects.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
