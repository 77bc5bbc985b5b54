//! MailVerify Library
//!
//! This library provides the email verification wizard (provider selection,
//! credential entry, confirmation and task handoff), the background task
//! queue verification tasks are submitted to, and the terminal application
//! hosting both.

// Module declarations
pub mod app;
pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod shortcuts;
pub mod tasks;
pub mod tui;
pub mod wizard;
