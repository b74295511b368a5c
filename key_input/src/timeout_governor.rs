// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Time bound wrapper around the [`KeyDecoder`].
//!
//! Most escape sequences have no terminator that tells them apart from a prefix of a
//! longer one. `ESC` alone is the Escape key, but it is also the first byte of every
//! arrow key. [`TimedDecoder`] resolves this by watching the gap since the last
//! input chunk:
//!
//! ```text
//! chunk ──▶ feed chars ──▶ decoder pending? ──yes──▶ deadline = now + esc timeout
//!                                  │
//!                                  no ──▶ deadline = None
//!
//! deadline elapsed ──▶ feed EndOfInput ──▶ partial sequence resolves
//! ```
//!
//! Every chunk restarts the timer, so the wait is measured from the last byte and not
//! from the start of the sequence. There is no clock inside: callers pass `now` in and
//! ask for [`TimedDecoder::deadline`] to know when to call back.

use crate::{DecoderInput, KeyDecoder, KeyEvent, LocaleInfo};
use std::{any::Any,
          panic::{AssertUnwindSafe, catch_unwind},
          time::{Duration, Instant}};

#[derive(Debug)]
pub struct TimedDecoder {
    decoder: KeyDecoder,
    timeout: Duration,
    deadline: Option<Instant>,
}

impl TimedDecoder {
    #[must_use]
    pub fn new(locale: LocaleInfo, timeout: Duration) -> Self {
        Self {
            decoder: KeyDecoder::new(locale),
            timeout,
            deadline: None,
        }
    }

    /// Decode a whole chunk, then (re)arm or cancel the timer.
    pub fn feed_chunk(&mut self, chunk: &str, now: Instant) -> Vec<KeyEvent> {
        let keys = chunk
            .chars()
            .filter_map(|ch| self.feed_guarded(DecoderInput::Char(ch)))
            .collect();
        self.deadline = self.decoder.is_pending().then(|| now + self.timeout);
        keys
    }

    /// Force resolution of a pending sequence if the deadline has passed. The timer is
    /// single shot: it is not re-armed until the next chunk.
    pub fn on_timeout(&mut self, now: Instant) -> Option<KeyEvent> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.feed_guarded(DecoderInput::EndOfInput)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    #[must_use]
    pub fn is_pending(&self) -> bool { self.decoder.is_pending() }

    /// Drop any partial sequence and cancel the timer.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.deadline = None;
    }

    /// A fault inside the decoder must not take the input loop down. The offending
    /// input is dropped and the decoder starts over.
    fn feed_guarded(&mut self, input: DecoderInput) -> Option<KeyEvent> {
        let decoder = &mut self.decoder;
        match catch_unwind(AssertUnwindSafe(|| decoder.feed(input))) {
            Ok(maybe_key) => maybe_key,
            Err(payload) => {
                tracing::error!(
                    message = "Key decoder fault, input treated as unrecognized",
                    input = ?input,
                    panic = %panic_message(payload.as_ref())
                );
                self.decoder.reset();
                None
            }
        }
    }
}

/// Best effort text of a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
