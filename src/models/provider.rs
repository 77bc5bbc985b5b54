//! Email provider descriptors and the selectable provider catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Default IMAP-over-TLS port.
const DEFAULT_IMAP_PORT: u16 = 993;

/// Connection parameters and display name of one email provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Stable identifier in lowercase (e.g., "gmail")
    pub id: String,
    /// Name shown in the catalog grid (e.g., "Gmail")
    pub name: String,
    /// IMAP server host name
    pub imap_host: String,
    /// IMAP server port
    #[serde(default = "default_imap_port")]
    pub imap_port: u16,
}

fn default_imap_port() -> u16 {
    DEFAULT_IMAP_PORT
}

impl ProviderDescriptor {
    /// Creates a descriptor on the default IMAP-over-TLS port.
    pub fn new(id: impl Into<String>, name: impl Into<String>, imap_host: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            imap_host: imap_host.into(),
            imap_port: DEFAULT_IMAP_PORT,
        }
    }

    /// Display name accessor used by the catalog renderer.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Errors raised while loading or validating a provider catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog contains no providers.
    #[error("provider catalog is empty")]
    Empty,
    /// A provider has a blank display name.
    #[error("provider '{id}' has an empty name")]
    EmptyName {
        /// Offending provider id
        id: String,
    },
    /// Two providers share the same id.
    #[error("duplicate provider id '{0}'")]
    DuplicateId(String),
    /// The catalog file could not be read.
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        /// File that failed to load
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The catalog file is not valid TOML.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    providers: Vec<ProviderDescriptor>,
}

/// Ordered, immutable list of selectable providers.
///
/// Cloning is cheap; all clones share the same entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCatalog {
    providers: Arc<[ProviderDescriptor]>,
}

impl ProviderCatalog {
    /// Builds a catalog after validating it.
    pub fn new(providers: Vec<ProviderDescriptor>) -> Result<Self, CatalogError> {
        if providers.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if provider.name.trim().is_empty() {
                return Err(CatalogError::EmptyName {
                    id: provider.id.clone(),
                });
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(CatalogError::DuplicateId(provider.id.clone()));
            }
        }

        Ok(Self {
            providers: providers.into(),
        })
    }

    /// Catalog with no entries. Only reachable through this constructor; the
    /// wizard refuses to start with it.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            providers: Vec::new().into(),
        }
    }

    /// The providers shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let providers = [
            ("gmail", "Gmail", "imap.gmail.com"),
            ("outlook", "Outlook", "outlook.office365.com"),
            ("hotmail", "Hotmail", "outlook.office365.com"),
            ("yahoo", "Yahoo", "imap.mail.yahoo.com"),
            ("icloud", "iCloud", "imap.mail.me.com"),
            ("aol", "AOL", "imap.aol.com"),
            ("gmx", "GMX", "imap.gmx.com"),
            ("zoho", "Zoho", "imap.zoho.com"),
            ("yandex", "Yandex", "imap.yandex.com"),
            ("mailru", "Mail.ru", "imap.mail.ru"),
            ("fastmail", "Fastmail", "imap.fastmail.com"),
            ("webde", "Web.de", "imap.web.de"),
            ("libero", "Libero", "imapmail.libero.it"),
            ("tonline", "T-Online", "secureimap.t-online.de"),
            ("virgilio", "Virgilio", "in.virgilio.it"),
        ]
        .into_iter()
        .map(|(id, name, host)| ProviderDescriptor::new(id, name, host))
        .collect::<Vec<_>>();

        Self {
            providers: providers.into(),
        }
    }

    /// Parses a catalog from TOML text (`[[providers]]` tables).
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.providers)
    }

    /// Loads a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Number of providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the catalog has no providers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProviderDescriptor> {
        self.providers.get(index)
    }

    /// Iterates providers in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter()
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
