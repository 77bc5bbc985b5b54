//! Data models for providers, stores, proxies, and verification tasks.
//!
//! Models are independent of UI and wizard logic.

pub mod provider;
pub mod task;

// Re-export all model types
pub use provider::{CatalogError, ProviderCatalog, ProviderDescriptor};
pub use task::{Endpoint, StoreRef, TaskDescriptor};
