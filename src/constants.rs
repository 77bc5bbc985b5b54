//! Application-wide constants.
//!
//! This module defines the application name along with the names of the
//! views and pages the wizard navigates between.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "MailVerify";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "mailverify";

/// Name of the email verification wizard view.
pub const EMAIL_VERIFICATION_VIEW: &str = "email-verification";

/// Page hosting the email verification wizard.
pub const EMAIL_VERIFICATION_PAGE: &str = "Email Verification";

/// Page listing submitted tasks.
pub const TASKS_PAGE: &str = "Tasks";

/// Page where a store and proxies are chosen before starting a wizard.
pub const TASK_CREATION_PAGE: &str = "Task Creation";

/// Binding context for shortcuts that apply on every page.
pub const GLOBAL_CONTEXT: &str = "global";
