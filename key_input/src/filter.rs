// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keeps mouse reports and focus change notifications away from keyboard consumers.
//!
//! The decoder already absorbs well formed mouse reports. Focus in/out (`ESC [ I`,
//! `ESC [ O`) have no key meaning and come out of the decoder as unclassified keys.
//! This is the last stage before broadcast and drops anything whose raw sequence is
//! one of these markers.

use crate::{KeyEvent, KeyStage, PipelineEvent,
            decoder::constants::{FOCUS_IN_SEQUENCE, FOCUS_OUT_SEQUENCE,
                                 PARAM_SEPARATOR, SGR_MOUSE_PRESS,
                                 SGR_MOUSE_RELEASE, X11_MOUSE_PAYLOAD_LEN}};
use std::time::Instant;

const SGR_MOUSE_PREFIX: &str = "\x1b[<";
const X11_MOUSE_PREFIX: &str = "\x1b[M";
const SGR_MOUSE_PARAM_COUNT: usize = 3;

/// `true` for mouse reports (SGR and X11) and focus in/out markers.
#[must_use]
pub fn is_non_keyboard_sequence(sequence: &str) -> bool {
    sequence == FOCUS_IN_SEQUENCE
        || sequence == FOCUS_OUT_SEQUENCE
        || is_sgr_mouse_sequence(sequence)
        || is_x11_mouse_sequence(sequence)
}

/// `ESC [ < button ; column ; row (M | m)`
fn is_sgr_mouse_sequence(sequence: &str) -> bool {
    let Some(rest) = sequence.strip_prefix(SGR_MOUSE_PREFIX) else {
        return false;
    };
    let Some(params) = rest
        .strip_suffix(SGR_MOUSE_PRESS)
        .or_else(|| rest.strip_suffix(SGR_MOUSE_RELEASE))
    else {
        return false;
    };
    let mut count = 0;
    for param in params.split(PARAM_SEPARATOR) {
        if param.is_empty() || !param.bytes().all(|it| it.is_ascii_digit()) {
            return false;
        }
        count += 1;
    }
    count == SGR_MOUSE_PARAM_COUNT
}

/// `ESC [ M` followed by exactly three payload chars.
fn is_x11_mouse_sequence(sequence: &str) -> bool {
    sequence
        .strip_prefix(X11_MOUSE_PREFIX)
        .is_some_and(|payload| payload.chars().count() == X11_MOUSE_PAYLOAD_LEN)
}

/// Pipeline stage wrapping [`is_non_keyboard_sequence`].
#[derive(Debug, Default)]
pub struct NonKeyboardFilter;

impl KeyStage for NonKeyboardFilter {
    fn push(&mut self, key: KeyEvent, _now: Instant, out: &mut Vec<PipelineEvent>) {
        if is_non_keyboard_sequence(&key.sequence) {
            tracing::trace!(message = "Dropped non keyboard sequence", sequence = ?key.sequence);
        } else {
            out.push(PipelineEvent::Key(key));
        }
    }
}
