// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The canonical key event produced by the input pipeline.
//!
//! A [`KeyEvent`] is an immutable value. Pipeline stages that need to reinterpret an
//! event (for example turning a `return` into a literal newline) consume it and produce
//! a modified copy via the builder style methods on this type, so an event that has
//! already been handed to a stage is never changed in place.

use std::fmt::{Display, Formatter};

/// Symbolic key names used by the decoder and the buffering stages.
pub mod key_names {
    pub const RETURN: &str = "return";
    pub const TAB: &str = "tab";
    pub const BACKSPACE: &str = "backspace";
    pub const ESCAPE: &str = "escape";
    pub const SPACE: &str = "space";
    pub const PASTE: &str = "paste";
    pub const PASTE_START: &str = "paste-start";
    pub const PASTE_END: &str = "paste-end";
}

/// One resolved logical keystroke (or synthetic event such as a paste).
///
/// Fields:
/// - `name`: symbolic name like `"a"`, `"return"`, `"f5"`, `"paste"`. Empty for
///   printable punctuation and for unclassified (unrecognized) sequences.
/// - `shift`, `alt`, `ctrl`, `cmd`: independent modifier flags. `cmd` is the
///   command/super key.
/// - `insertable`: `true` when the event is literal text to insert rather than a
///   command.
/// - `sequence`: the raw characters that produced this event. For a `paste` event this
///   is the pasted text.
/// - `literal_newline`: set on a `return` that the buffering stages decided is a
///   newline to insert and not a submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyEvent {
    pub name: String,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub cmd: bool,
    pub insertable: bool,
    pub sequence: String,
    pub literal_newline: bool,
}

impl KeyEvent {
    /// A key with the given name and raw sequence and no modifiers.
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            ..Default::default()
        }
    }

    /// A printable key whose text is inserted as-is.
    pub fn insertable_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            insertable: true,
            ..Self::new(name, text)
        }
    }

    /// A sequence that matched no known grammar. It keeps the raw characters so that
    /// nothing typed is silently lost.
    pub fn unclassified(sequence: impl Into<String>) -> Self { Self::new("", sequence) }

    /// Synthetic paste event carrying the pasted text.
    pub fn paste(text: impl Into<String>) -> Self {
        Self::insertable_text(key_names::PASTE, text)
    }

    #[must_use]
    pub fn with_shift(self, shift: bool) -> Self { Self { shift, ..self } }

    #[must_use]
    pub fn with_alt(self, alt: bool) -> Self { Self { alt, ..self } }

    #[must_use]
    pub fn with_ctrl(self, ctrl: bool) -> Self { Self { ctrl, ..self } }

    #[must_use]
    pub fn with_cmd(self, cmd: bool) -> Self { Self { cmd, ..self } }

    #[must_use]
    pub fn with_sequence(self, sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            ..self
        }
    }

    /// Copy of this `return` key that is marked as a newline to insert. The sequence is
    /// normalized to a carriage return.
    #[must_use]
    pub fn into_literal_newline(self) -> Self {
        Self {
            literal_newline: true,
            sequence: "\r".to_string(),
            ..self
        }
    }

    #[must_use]
    pub fn is_named(&self, name: &str) -> bool { self.name == name }

    #[must_use]
    pub fn is_unclassified(&self) -> bool { self.name.is_empty() && !self.insertable }

    #[must_use]
    pub fn has_modifiers(&self) -> bool { self.shift || self.alt || self.ctrl || self.cmd }
}

impl Display for KeyEvent {
    /// Renders a compact human readable form such as `ctrl+shift+up` or `"abc"` for
    /// insertable text. Used in debug logs.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.insertable && !self.has_modifiers() {
            return write!(f, "{:?}", self.sequence);
        }
        let modifiers = [
            (self.ctrl, "ctrl+"),
            (self.alt, "alt+"),
            (self.shift, "shift+"),
            (self.cmd, "cmd+"),
        ];
        for (is_set, label) in modifiers {
            if is_set {
                write!(f, "{label}")?;
            }
        }
        if self.name.is_empty() {
            write!(f, "{:?}", self.sequence)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests_key_event {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derived_copy_leaves_original_untouched() {
        let original = KeyEvent::new(key_names::RETURN, "\r").with_shift(true);
        let derived = original.clone().into_literal_newline();

        assert!(!original.literal_newline);
        assert!(derived.literal_newline);
        assert!(derived.shift);
        assert_eq!(derived.sequence, "\r");
    }

    #[test]
    fn unclassified_is_not_insertable() {
        let key = KeyEvent::unclassified("\x1b[99z");
        assert!(key.is_unclassified());
        assert!(!key.insertable);
        assert_eq!(key.name, "");
    }

    #[test]
    fn display_formats_modifiers_then_name() {
        let key = KeyEvent::new("up", "\x1b[1;6A").with_ctrl(true).with_shift(true);
        assert_eq!(key.to_string(), "ctrl+shift+up");
        assert_eq!(KeyEvent::insertable_text("a", "a").to_string(), "\"a\"");
    }
}
