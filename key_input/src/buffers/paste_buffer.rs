// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Bracketed paste coalescing.
//!
//! With bracketed paste enabled the terminal wraps pasted text in `ESC [ 200 ~` and
//! `ESC [ 201 ~`. The decoder turns the markers into `paste-start` and `paste-end` keys
//! and decodes the text in between like typing. This stage folds all of that back into
//! one `paste` key:
//!
//! ```text
//! paste-start  'a'  'b'  return  'c'  paste-end
//!      │        └────┴─────┴──────┘       │
//!      ▼              accumulate           ▼
//!   Collecting("")  ──────────▶  Collecting("ab\rc") ──▶ paste "ab\rc"
//! ```
//!
//! If the end marker never shows up (the terminal dropped it, or the app was
//! suspended mid paste), the accumulation is discarded after a long inactivity timeout
//! and [`PipelineEvent::PasteTimeout`] is emitted instead. A partial paste is never
//! emitted.

use crate::{KeyEvent, KeyStage, PipelineEvent, key_names};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PasteCollectionState {
    #[default]
    Inactive,
    Accumulating { text: String, deadline: Instant },
}

#[derive(Debug)]
pub struct PasteBuffer {
    state: PasteCollectionState,
    timeout: Duration,
}

impl PasteBuffer {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: PasteCollectionState::default(),
            timeout,
        }
    }

    #[must_use]
    pub fn state(&self) -> &PasteCollectionState { &self.state }
}

impl KeyStage for PasteBuffer {
    fn push(&mut self, key: KeyEvent, now: Instant, out: &mut Vec<PipelineEvent>) {
        let deadline = now + self.timeout;

        if let PasteCollectionState::Accumulating {
            text,
            deadline: current_deadline,
        } = &mut self.state
        {
            if key.is_named(key_names::PASTE_END) {
                // End marker: emit everything collected.
                let text = std::mem::take(text);
                self.state = PasteCollectionState::Inactive;
                if !text.is_empty() {
                    out.push(PipelineEvent::Key(KeyEvent::paste(text)));
                }
            } else {
                // While collecting: keep the literal text of every key.
                text.push_str(&key.sequence);
                *current_deadline = deadline;
            }
            return;
        }

        if key.is_named(key_names::PASTE_START) {
            // Start marker: begin collecting, emit nothing.
            self.state = PasteCollectionState::Accumulating {
                text: String::new(),
                deadline,
            };
        } else {
            out.push(PipelineEvent::Key(key));
        }
    }

    fn deadline(&self) -> Option<Instant> {
        match &self.state {
            PasteCollectionState::Inactive => None,
            PasteCollectionState::Accumulating { deadline, .. } => Some(*deadline),
        }
    }

    fn on_deadline(&mut self, now: Instant, out: &mut Vec<PipelineEvent>) {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            let discarded = std::mem::take(&mut self.state);
            if let PasteCollectionState::Accumulating { text, .. } = discarded {
                tracing::warn!(
                    message = "Bracketed paste timed out without end marker, discarded",
                    discarded_len = text.len()
                );
            }
            out.push(PipelineEvent::PasteTimeout);
        }
    }

    fn is_idle(&self) -> bool { self.state == PasteCollectionState::Inactive }

    fn clear(&mut self) { self.state = PasteCollectionState::Inactive; }
}

#[cfg(test)]
mod tests_paste_buffer {
    use super::*;
    use pretty_assertions::assert_eq;

    const PASTE_TIMEOUT: Duration = Duration::from_secs(30);

    fn key(name: &str, sequence: &str) -> KeyEvent { KeyEvent::new(name, sequence) }

    fn text(ch: &str) -> KeyEvent { KeyEvent::insertable_text(ch, ch) }

    #[test]
    fn coalesces_keys_between_markers() {
        let t0 = Instant::now();
        let mut it = PasteBuffer::new(PASTE_TIMEOUT);
        let mut out = vec![];

        it.push(key(key_names::PASTE_START, "\x1b[200~"), t0, &mut out);
        for ch in ["a", "b", "c"] {
            it.push(text(ch), t0, &mut out);
        }
        assert_eq!(out, vec![]);
        assert!(!it.is_idle());

        it.push(key(key_names::PASTE_END, "\x1b[201~"), t0, &mut out);
        assert_eq!(out, vec![PipelineEvent::Key(KeyEvent::paste("abc"))]);
        assert!(it.is_idle());
    }

    #[test]
    fn keeps_literal_control_text() {
        let t0 = Instant::now();
        let mut it = PasteBuffer::new(PASTE_TIMEOUT);
        let mut out = vec![];

        it.push(key(key_names::PASTE_START, "\x1b[200~"), t0, &mut out);
        it.push(text("x"), t0, &mut out);
        it.push(key(key_names::RETURN, "\r"), t0, &mut out);
        it.push(key(key_names::TAB, "\t"), t0, &mut out);
        it.push(key(key_names::PASTE_END, "\x1b[201~"), t0, &mut out);

        assert_eq!(out, vec![PipelineEvent::Key(KeyEvent::paste("x\r\t"))]);
    }

    #[test]
    fn passes_through_when_inactive() {
        let mut it = PasteBuffer::new(PASTE_TIMEOUT);
        let mut out = vec![];
        it.push(text("q"), Instant::now(), &mut out);
        assert_eq!(out, vec![PipelineEvent::Key(text("q"))]);
        assert_eq!(it.deadline(), None);
    }

    #[test]
    fn empty_paste_emits_nothing() {
        let t0 = Instant::now();
        let mut it = PasteBuffer::new(PASTE_TIMEOUT);
        let mut out = vec![];
        it.push(key(key_names::PASTE_START, "\x1b[200~"), t0, &mut out);
        it.push(key(key_names::PASTE_END, "\x1b[201~"), t0, &mut out);
        assert_eq!(out, vec![]);
        assert!(it.is_idle());
    }

    #[test]
    fn timeout_discards_and_signals() {
        let t0 = Instant::now();
        let mut it = PasteBuffer::new(PASTE_TIMEOUT);
        let mut out = vec![];

        it.push(key(key_names::PASTE_START, "\x1b[200~"), t0, &mut out);
        let t1 = t0 + Duration::from_secs(10);
        it.push(text("a"), t1, &mut out);
        assert_eq!(it.deadline(), Some(t1 + PASTE_TIMEOUT));

        it.on_deadline(t0 + PASTE_TIMEOUT, &mut out);
        assert_eq!(out, vec![], "each key restarts the inactivity timer");

        it.on_deadline(t1 + PASTE_TIMEOUT, &mut out);
        assert_eq!(out, vec![PipelineEvent::PasteTimeout]);
        assert!(it.is_idle());

        // Later keys flow through normally.
        it.push(text("b"), t1 + PASTE_TIMEOUT, &mut out);
        assert_eq!(out.last(), Some(&PipelineEvent::Key(text("b"))));
    }
}
