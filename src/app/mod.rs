//! Application orchestration layer
//!
//! This module provides high-level orchestration functions that coordinate
//! between the configuration, the task queue and the TUI without containing
//! detailed implementation logic.

/// Terminal startup with the selected store, proxies and provider catalog
pub mod launch;

// Re-export commonly used functions for convenience
pub use launch::{list_providers, run_wizard_terminal};
