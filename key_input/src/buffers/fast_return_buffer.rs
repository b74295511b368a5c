// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A `return` hot on the heels of another key is a pasted newline.
//!
//! Terminals without bracketed paste deliver pasted multi line text as plain typing,
//! so every line break would submit. Humans can't press Enter within a few tens of
//! milliseconds of the previous key, so a `return` inside that window is treated as a
//! newline to insert. The pipeline leaves this stage out when the terminal speaks the
//! kitty keyboard protocol, since there Enter and pasted newlines are unambiguous.

use crate::{KeyEvent, KeyStage, PipelineEvent, key_names};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct FastReturnBuffer {
    last_key_at: Option<Instant>,
    window: Duration,
}

impl FastReturnBuffer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            last_key_at: None,
            window,
        }
    }
}

impl KeyStage for FastReturnBuffer {
    fn push(&mut self, key: KeyEvent, now: Instant, out: &mut Vec<PipelineEvent>) {
        let is_fast = self
            .last_key_at
            .is_some_and(|last| now.saturating_duration_since(last) <= self.window);
        self.last_key_at = Some(now);

        if is_fast && key.is_named(key_names::RETURN) && !key.literal_newline {
            out.push(PipelineEvent::Key(key.into_literal_newline()));
        } else {
            out.push(PipelineEvent::Key(key));
        }
    }

    fn clear(&mut self) { self.last_key_at = None; }
}

#[cfg(test)]
mod tests_fast_return_buffer {
    use super::*;
    use pretty_assertions::assert_eq;

    const WINDOW: Duration = Duration::from_millis(30);

    fn return_key() -> KeyEvent { KeyEvent::new(key_names::RETURN, "\r") }

    fn pushed(it: &mut FastReturnBuffer, key: KeyEvent, at: Instant) -> KeyEvent {
        let mut out = vec![];
        it.push(key, at, &mut out);
        match out.pop() {
            Some(PipelineEvent::Key(key)) => key,
            other => panic!("expected a key, got {other:?}"),
        }
    }

    #[test]
    fn return_within_window_is_newline() {
        let t0 = Instant::now();
        let mut it = FastReturnBuffer::new(WINDOW);
        pushed(&mut it, KeyEvent::insertable_text("a", "a"), t0);
        let key = pushed(&mut it, return_key(), t0 + Duration::from_millis(2));
        assert!(key.literal_newline);
    }

    #[test]
    fn slow_return_is_submit() {
        let t0 = Instant::now();
        let mut it = FastReturnBuffer::new(WINDOW);
        pushed(&mut it, KeyEvent::insertable_text("a", "a"), t0);
        let key = pushed(&mut it, return_key(), t0 + Duration::from_millis(200));
        assert_eq!(key, return_key());
    }

    #[test]
    fn first_key_is_never_fast() {
        let mut it = FastReturnBuffer::new(WINDOW);
        let key = pushed(&mut it, return_key(), Instant::now());
        assert!(!key.literal_newline);
    }

    #[test]
    fn only_return_is_reinterpreted() {
        let t0 = Instant::now();
        let mut it = FastReturnBuffer::new(WINDOW);
        pushed(&mut it, KeyEvent::insertable_text("a", "a"), t0);
        let key = pushed(&mut it, KeyEvent::new(key_names::TAB, "\t"), t0);
        assert_eq!(key, KeyEvent::new(key_names::TAB, "\t"));
    }
}
