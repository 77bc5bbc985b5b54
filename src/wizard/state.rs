//! Wizard steps, accumulated credentials, and per-instance wizard state.

use std::fmt;

use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox};
use zeroize::Zeroize;

use super::editor::{FieldLimits, InputEditor};
use super::output::Segment;
use crate::models::{Endpoint, ProviderDescriptor, StoreRef};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    /// Choose a provider from the catalog grid
    Provider,
    /// Enter the account username
    Username,
    /// Enter the account password (masked)
    Password,
    /// Review the summary and confirm
    Confirm,
}

impl WizardStep {
    /// Gets the next step in the wizard
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Provider => Some(Self::Username),
            Self::Username => Some(Self::Password),
            Self::Password => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }

    /// Gets the step title
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Provider => "Email Provider",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Confirm => "Confirm",
        }
    }
}

/// Initial capacity of a [`SecretBuffer`], in bytes.
const SECRET_CAPACITY: usize = 64;

/// A growable credential buffer that is zeroed when cleared or dropped.
///
/// The text lives in a [`SecretBox`], so it is redacted from `Debug` output
/// and wiped on drop. Growing past the current capacity moves the text into a
/// fresh box and drops the old one, which wipes the previous allocation.
pub struct SecretBuffer {
    inner: SecretBox<String>,
}

impl SecretBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SECRET_CAPACITY)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SecretBox::new(Box::new(String::with_capacity(capacity))),
        }
    }

    /// Appends one character.
    pub fn push(&mut self, ch: char) {
        let current = self.inner.expose_secret();
        let needed = current.len() + ch.len_utf8();
        if needed > current.capacity() {
            let mut grown = Self::with_capacity(needed.max(current.capacity() * 2));
            grown.inner.expose_secret_mut().push_str(current);
            *self = grown;
        }
        self.inner.expose_secret_mut().push(ch);
    }

    /// Removes the last character.
    ///
    /// The removed bytes stay in spare capacity until the next clear or drop,
    /// both of which zero the whole allocation.
    pub fn pop(&mut self) -> Option<char> {
        self.inner.expose_secret_mut().pop()
    }

    /// The plain-text secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Number of characters (not bytes).
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.expose().chars().count()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    /// Moves the content out, leaving this buffer empty.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::new())
    }

    /// Zeroes and empties the buffer.
    pub fn clear(&mut self) {
        self.inner.expose_secret_mut().zeroize();
    }
}

impl Default for SecretBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer(<{} chars>)", self.char_count())
    }
}

/// Values collected across the wizard steps.
#[derive(Debug, Default)]
pub struct CredentialRecord {
    /// Chosen provider (set by the Provider step)
    pub provider: Option<ProviderDescriptor>,
    /// Account username (set by the Username step)
    pub username: Option<String>,
    /// Account password (set by the Password step)
    pub password: SecretBuffer,
    /// True characters typed into the masked field, not yet committed
    pub(crate) typed_secret: SecretBuffer,
}

impl CredentialRecord {
    /// Wipes every collected value.
    pub fn clear(&mut self) {
        self.provider = None;
        self.username = None;
        self.password.clear();
        self.typed_secret.clear();
    }

    /// True characters currently typed into the masked field.
    #[must_use]
    pub fn typed_secret(&self) -> &SecretBuffer {
        &self.typed_secret
    }
}

/// State exclusively owned by one active wizard instance.
#[derive(Debug)]
pub struct WizardState {
    /// Current step
    pub step: WizardStep,
    /// Transcript lines of the current step
    pub(crate) lines: Vec<Vec<Segment>>,
    /// Row of `lines` the input field is rendered at
    pub(crate) field_row: usize,
    /// Active input field
    pub(crate) editor: InputEditor,
    /// Values collected so far
    pub credentials: CredentialRecord,
    /// Store the task is created for
    pub store: Option<StoreRef>,
    /// Proxies handed to the task
    pub proxies: Vec<Endpoint>,
}

impl WizardState {
    /// Creates the initial state (Provider step, nothing collected).
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: WizardStep::Provider,
            lines: Vec::new(),
            field_row: 0,
            editor: InputEditor::plain("", FieldLimits::default()),
            credentials: CredentialRecord::default(),
            store: None,
            proxies: Vec::new(),
        }
    }

    /// Returns every field to its initial value, wiping credentials.
    pub fn reset(&mut self) {
        self.step = WizardStep::Provider;
        self.lines.clear();
        self.field_row = 0;
        self.editor = InputEditor::plain("", FieldLimits::default());
        self.credentials.clear();
        self.store = None;
        self.proxies.clear();
    }

    /// Transcript lines of the current step.
    #[must_use]
    pub fn lines(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    /// Row the input field is rendered at.
    #[must_use]
    pub fn field_row(&self) -> usize {
        self.field_row
    }

    /// Active input field editor.
    #[must_use]
    pub fn editor(&self) -> &InputEditor {
        &self.editor
    }

    /// Whether the active field hides what is typed.
    #[must_use]
    pub fn input_hidden(&self) -> bool {
        self.editor.is_masked()
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
