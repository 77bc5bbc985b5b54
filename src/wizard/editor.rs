//! Per-keystroke editing of the wizard's single input field.
//!
//! An [`InputEditor`] owns the visible field and applies one of three edit
//! policies:
//!
//! - **Plain**: printable characters and space are written as typed.
//! - **Masked**: each printable character writes the mask glyph to the field
//!   and appends the true character to a [`SecretBuffer`] owned by the
//!   caller. Field and secret always hold the same number of characters.
//! - **Restricted**: only characters from a fixed set are written; anything
//!   else is dropped silently.
//!
//! The field may carry a protected prefix (the prompt text). Backspace never
//! reaches into it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::SecretBuffer;

/// Characters accepted by the confirmation field.
pub const CONFIRM_CHARS: &[char] = &['Y', 'y', 'N', 'n'];

/// Default column budget for free-text fields.
pub const DEFAULT_MAX_COLUMNS: usize = 750;

/// Default margin kept free at the end of a free-text line.
pub const DEFAULT_COLUMN_MARGIN: usize = 50;

/// Column budget of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    /// Maximum column the cursor may reach after a write
    pub max_columns: usize,
    /// Columns kept free at the end of the line
    pub margin: usize,
}

impl FieldLimits {
    /// Budget for the one-character confirmation field.
    pub const SINGLE_CHOICE: Self = Self {
        max_columns: 1,
        margin: 1,
    };

    /// Creates a budget.
    #[must_use]
    pub const fn new(max_columns: usize, margin: usize) -> Self {
        Self {
            max_columns,
            margin,
        }
    }

    /// Whether writing one more character to `field` would exceed the budget.
    ///
    /// The field never scrolls horizontally, so the bound is taken on the
    /// cursor column and the line length alone.
    #[must_use]
    pub fn exceeded(&self, field: &FieldBuffer) -> bool {
        field.cursor_column() + 1 > self.max_columns
            || field.line_len() + self.margin > self.max_columns
    }
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COLUMNS, DEFAULT_COLUMN_MARGIN)
    }
}

/// The visible line of an input field: protected prompt prefix plus typed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuffer {
    prefix: String,
    value: String,
}

impl FieldBuffer {
    /// Creates an empty field behind `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            value: String::new(),
        }
    }

    /// Protected prompt text.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Text typed after the prefix, exactly as displayed.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// First editable column.
    #[must_use]
    pub fn protected_offset(&self) -> usize {
        self.prefix.chars().count()
    }

    /// Cursor column; the cursor always sits after the last character.
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.protected_offset() + self.value.chars().count()
    }

    /// Length of the whole line in characters.
    #[must_use]
    pub fn line_len(&self) -> usize {
        self.cursor_column()
    }

    /// Prefix and value as one line.
    #[must_use]
    pub fn rendered(&self) -> String {
        format!("{}{}", self.prefix, self.value)
    }

    /// Empties the typed value, keeping the prefix.
    pub fn clear(&mut self) {
        self.value.clear();
    }

    fn push(&mut self, ch: char) {
        self.value.push(ch);
    }

    fn pop(&mut self) -> Option<char> {
        self.value.pop()
    }
}

/// Mutable state an edit policy works on for one key event.
pub struct EditContext<'a> {
    /// Visible field
    pub field: &'a mut FieldBuffer,
    /// Hidden true-value buffer (only touched by masked editing)
    pub secret: &'a mut SecretBuffer,
    /// Column budget
    pub limits: FieldLimits,
}

/// One handler per key event an edit policy reacts to.
///
/// Each returns `true` when the field changed.
pub trait KeyEditor {
    /// A printable, non-space character.
    fn on_char(&self, ctx: &mut EditContext<'_>, ch: char) -> bool;

    /// The space bar.
    fn on_space(&self, ctx: &mut EditContext<'_>) -> bool;

    /// Backspace.
    fn on_backspace(&self, ctx: &mut EditContext<'_>) -> bool {
        if ctx.field.cursor_column() <= ctx.field.protected_offset() {
            return false;
        }
        ctx.field.pop().is_some()
    }
}

/// Writes characters and spaces as typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEditor;

impl KeyEditor for PlainEditor {
    fn on_char(&self, ctx: &mut EditContext<'_>, ch: char) -> bool {
        if ctx.limits.exceeded(ctx.field) {
            return false;
        }
        ctx.field.push(ch);
        true
    }

    fn on_space(&self, ctx: &mut EditContext<'_>) -> bool {
        self.on_char(ctx, ' ')
    }
}

/// Shows a glyph per character and keeps the true value in the secret buffer.
#[derive(Debug, Clone, Copy)]
pub struct MaskedEditor {
    /// Glyph written in place of each character
    pub glyph: char,
}

impl KeyEditor for MaskedEditor {
    fn on_char(&self, ctx: &mut EditContext<'_>, ch: char) -> bool {
        if ctx.limits.exceeded(ctx.field) {
            return false;
        }
        ctx.field.push(self.glyph);
        ctx.secret.push(ch);
        true
    }

    /// Spaces are not accepted in masked fields.
    fn on_space(&self, _ctx: &mut EditContext<'_>) -> bool {
        false
    }

    fn on_backspace(&self, ctx: &mut EditContext<'_>) -> bool {
        if ctx.field.cursor_column() <= ctx.field.protected_offset() {
            return false;
        }
        let removed = ctx.field.pop().is_some();
        if removed {
            ctx.secret.pop();
        }
        removed
    }
}

/// Accepts only characters from a fixed set.
#[derive(Debug, Clone, Copy)]
pub struct RestrictedEditor {
    /// Accepted characters
    pub accepted: &'static [char],
}

impl KeyEditor for RestrictedEditor {
    fn on_char(&self, ctx: &mut EditContext<'_>, ch: char) -> bool {
        if !self.accepted.contains(&ch) || ctx.limits.exceeded(ctx.field) {
            return false;
        }
        ctx.field.push(ch);
        true
    }

    fn on_space(&self, ctx: &mut EditContext<'_>) -> bool {
        self.on_char(ctx, ' ')
    }
}

/// Edit policy of the active field.
#[derive(Debug, Clone, Copy)]
pub enum EditPolicy {
    /// Free text
    Plain(PlainEditor),
    /// Hidden text
    Masked(MaskedEditor),
    /// Single choice from a fixed alphabet
    Restricted(RestrictedEditor),
}

/// Outcome of feeding one key event to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The field changed
    Changed,
    /// The key was handled but nothing changed (limit, protected column, filtered)
    Unchanged,
    /// The key is not an editing key
    NotHandled,
}

/// Editing state machine for the active field.
#[derive(Debug, Clone)]
pub struct InputEditor {
    policy: EditPolicy,
    field: FieldBuffer,
    limits: FieldLimits,
}

impl InputEditor {
    /// Free-text field behind `prefix`.
    pub fn plain(prefix: impl Into<String>, limits: FieldLimits) -> Self {
        Self {
            policy: EditPolicy::Plain(PlainEditor),
            field: FieldBuffer::new(prefix),
            limits,
        }
    }

    /// Masked field writing `glyph` for each character.
    #[must_use]
    pub fn masked(glyph: char, limits: FieldLimits) -> Self {
        Self {
            policy: EditPolicy::Masked(MaskedEditor { glyph }),
            field: FieldBuffer::default(),
            limits,
        }
    }

    /// One-character field accepting only `accepted`.
    #[must_use]
    pub fn restricted(accepted: &'static [char]) -> Self {
        Self {
            policy: EditPolicy::Restricted(RestrictedEditor { accepted }),
            field: FieldBuffer::default(),
            limits: FieldLimits::SINGLE_CHOICE,
        }
    }

    /// The visible field.
    #[must_use]
    pub fn field(&self) -> &FieldBuffer {
        &self.field
    }

    /// Whether typed characters are hidden behind a glyph.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        matches!(self.policy, EditPolicy::Masked(_))
    }

    /// Empties the field, keeping its prompt prefix.
    pub fn clear(&mut self) {
        self.field.clear();
    }

    /// Applies one key event. `secret` receives the true characters of a masked field.
    pub fn handle_key(&mut self, key: KeyEvent, secret: &mut SecretBuffer) -> EditOutcome {
        let Self {
            policy,
            field,
            limits,
        } = self;
        let mut ctx = EditContext {
            field,
            secret,
            limits: *limits,
        };

        let changed = match key.code {
            KeyCode::Char(ch) if is_typing(key.modifiers) => {
                if ch == ' ' {
                    match policy {
                        EditPolicy::Plain(e) => e.on_space(&mut ctx),
                        EditPolicy::Masked(e) => e.on_space(&mut ctx),
                        EditPolicy::Restricted(e) => e.on_space(&mut ctx),
                    }
                } else {
                    match policy {
                        EditPolicy::Plain(e) => e.on_char(&mut ctx, ch),
                        EditPolicy::Masked(e) => e.on_char(&mut ctx, ch),
                        EditPolicy::Restricted(e) => e.on_char(&mut ctx, ch),
                    }
                }
            }
            KeyCode::Backspace => match policy {
                EditPolicy::Plain(e) => e.on_backspace(&mut ctx),
                EditPolicy::Masked(e) => e.on_backspace(&mut ctx),
                EditPolicy::Restricted(e) => e.on_backspace(&mut ctx),
            },
            _ => return EditOutcome::NotHandled,
        };

        if changed {
            EditOutcome::Changed
        } else {
            EditOutcome::Unchanged
        }
    }
}

/// Plain characters and shifted characters are typing; chords are not.
fn is_typing(modifiers: KeyModifiers) -> bool {
    modifiers.is_empty() || modifiers == KeyModifiers::SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(editor: &mut InputEditor, secret: &mut SecretBuffer, text: &str) {
        for ch in text.chars() {
            editor.handle_key(key(KeyCode::Char(ch)), secret);
        }
    }

    #[test]
    fn test_plain_typing_and_backspace() {
        let mut editor = InputEditor::plain("", FieldLimits::default());
        let mut secret = SecretBuffer::new();

        type_str(&mut editor, &mut secret, "a b");
        assert_eq!(editor.field().value(), "a b");

        editor.handle_key(key(KeyCode::Backspace), &mut secret);
        assert_eq!(editor.field().value(), "a ");
        assert!(secret.is_empty());
    }

    #[test]
    fn test_masked_abc_then_backspace() {
        let mut editor = InputEditor::masked('*', FieldLimits::default());
        let mut secret = SecretBuffer::new();

        type_str(&mut editor, &mut secret, "abc");
        editor.handle_key(key(KeyCode::Backspace), &mut secret);

        assert_eq!(secret.expose(), "ab");
        assert_eq!(editor.field().value(), "**");
        assert_eq!(editor.field().value().chars().count(), secret.char_count());
    }

    #[test]
    fn test_masked_ignores_space() {
        let mut editor = InputEditor::masked('*', FieldLimits::default());
        let mut secret = SecretBuffer::new();

        type_str(&mut editor, &mut secret, "a b");
        assert_eq!(secret.expose(), "ab");
        assert_eq!(editor.field().value(), "**");
    }

    #[test]
    fn test_masked_backspace_on_empty_field_keeps_buffers_aligned() {
        let mut editor = InputEditor::masked('*', FieldLimits::default());
        let mut secret = SecretBuffer::new();

        assert_eq!(
            editor.handle_key(key(KeyCode::Backspace), &mut secret),
            EditOutcome::Unchanged
        );
        assert!(secret.is_empty());
    }

    #[test]
    fn test_restricted_accepts_only_confirm_chars() {
        let mut editor = InputEditor::restricted(CONFIRM_CHARS);
        let mut secret = SecretBuffer::new();

        assert_eq!(
            editor.handle_key(key(KeyCode::Char('x')), &mut secret),
            EditOutcome::Unchanged
        );
        assert_eq!(editor.field().value(), "");

        editor.handle_key(key(KeyCode::Char('y')), &mut secret);
        assert_eq!(editor.field().value(), "y");

        // Single-choice budget: a second character is dropped
        editor.handle_key(key(KeyCode::Char('N')), &mut secret);
        assert_eq!(editor.field().value(), "y");

        editor.handle_key(key(KeyCode::Backspace), &mut secret);
        editor.handle_key(key(KeyCode::Char('N')), &mut secret);
        assert_eq!(editor.field().value(), "N");
    }

    #[test]
    fn test_backspace_never_deletes_prompt_prefix() {
        let mut editor = InputEditor::plain("Choose: ", FieldLimits::default());
        let mut secret = SecretBuffer::new();

        type_str(&mut editor, &mut secret, "1");
        assert_eq!(editor.field().cursor_column(), 9);

        editor.handle_key(key(KeyCode::Backspace), &mut secret);
        editor.handle_key(key(KeyCode::Backspace), &mut secret);
        assert_eq!(editor.field().rendered(), "Choose: ");
        assert_eq!(editor.field().cursor_column(), editor.field().protected_offset());
    }

    #[test]
    fn test_length_limit_discards_extra_characters() {
        let mut editor = InputEditor::plain("", FieldLimits::new(10, 4));
        let mut secret = SecretBuffer::new();

        type_str(&mut editor, &mut secret, "abcdefghij");
        // Writes stop once line_len + margin exceeds max_columns
        assert_eq!(editor.field().value(), "abcdefg");
    }

    #[test]
    fn test_cursor_bound_counts_the_prompt_prefix() {
        let mut editor = InputEditor::plain("ab", FieldLimits::new(5, 0));
        let mut secret = SecretBuffer::new();

        type_str(&mut editor, &mut secret, "xyzw");
        assert_eq!(editor.field().value(), "xyz");
        assert_eq!(editor.field().cursor_column(), 5);
    }

    #[test]
    fn test_chords_and_other_keys_are_not_typing() {
        let mut editor = InputEditor::plain("", FieldLimits::default());
        let mut secret = SecretBuffer::new();

        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_a, &mut secret), EditOutcome::NotHandled);
        assert_eq!(
            editor.handle_key(key(KeyCode::Left), &mut secret),
            EditOutcome::NotHandled
        );

        let shift_a = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(editor.handle_key(shift_a, &mut secret), EditOutcome::Changed);
        assert_eq!(editor.field().value(), "A");
    }
}
