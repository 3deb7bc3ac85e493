//! testdeck
//!
//! Terminal dashboard for discovering and running pytest-style tests.
//!
//! Pure core (`model`, `state`) and impure shell (`discovery`, `runner`,
//! `view`). Background runs talk to the UI loop only through
//! [`model::RunUpdate`] messages.

pub mod config;
pub mod discovery;
pub mod framework;
pub mod logging;
pub mod model;
pub mod runner;
pub mod state;
pub mod view;
