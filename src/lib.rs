//! weatherdash: terminal weather dashboard
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod advice;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod http;
pub mod location;
pub mod providers;
pub mod reference;
pub mod render;
pub mod types;
