//! Task descriptors handed from the wizard to the scheduler.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::ProviderDescriptor;

/// The store an email verification task runs for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreRef {
    /// Store display name
    pub name: String,
}

impl StoreRef {
    /// Creates a store reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A proxy endpoint, kept exactly as supplied by the proxy list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint(String);

impl Endpoint {
    /// Wraps an endpoint string.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self(endpoint.into())
    }

    /// The endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable record submitted to the scheduler once the wizard is confirmed.
#[derive(Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    id: String,
    store: StoreRef,
    proxies: Vec<Endpoint>,
    provider: ProviderDescriptor,
    username: String,
    password: Zeroizing<String>,
}

impl TaskDescriptor {
    /// Bundles a task under a freshly generated identifier.
    pub fn new(
        store: StoreRef,
        proxies: Vec<Endpoint>,
        provider: ProviderDescriptor,
        username: String,
        password: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            store,
            proxies,
            provider,
            username,
            password: Zeroizing::new(password),
        }
    }

    /// Process-unique task identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Store the task runs for.
    #[must_use]
    pub fn store(&self) -> &StoreRef {
        &self.store
    }

    /// Proxies available to the task.
    #[must_use]
    pub fn proxies(&self) -> &[Endpoint] {
        &self.proxies
    }

    /// Selected email provider.
    #[must_use]
    pub fn provider(&self) -> &ProviderDescriptor {
        &self.provider
    }

    /// Email account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Email account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("id", &self.id)
            .field("store", &self.store)
            .field("proxies", &self.proxies)
            .field("provider", &self.provider.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> TaskDescriptor {
        TaskDescriptor::new(
            StoreRef::new("Corner Shop"),
            vec![Endpoint::new("http://127.0.0.1:8080")],
            ProviderDescriptor::new("gmail", "Gmail", "imap.gmail.com"),
            "someone@example.com".to_string(),
            "hunter2".to_string(),
        )
    }

    #[test]
    fn test_task_ids_are_unique() {
        assert_ne!(descriptor().id(), descriptor().id());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", descriptor());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("someone@example.com"));
    }
}
