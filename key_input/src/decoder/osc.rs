// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words Pc Pd

//! OSC (Operating System Command) payload handling.
//!
//! The decoder collects everything between `ESC ]` and the terminator (`BEL` or
//! `ESC \`) and hands the payload to [`key_from_osc_payload`]. The only OSC report that
//! carries user input is the OSC 52 clipboard report, which a terminal sends in reply to
//! a clipboard read request:
//!
//! ```text
//! ESC ] 52 ; c ; aGVsbG8= BEL
//!       ── ─── ──────────
//!       │   │    └── base64 text ("hello")
//!       │   └── selection (c = clipboard, p = primary, ...)
//!       └── OSC 52
//! ```
//!
//! Such a report becomes a synthetic `paste` key. Every other payload is dropped.

use crate::{KeyEvent, decoder::constants::{OSC_52_PREFIX, PARAM_SEPARATOR}};
use base64::{Engine as _,
             alphabet,
             engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig}};

/// Some terminals drop the trailing `=` padding.
const OSC_52_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Payload of a clipboard read query (as opposed to a report).
const OSC_52_QUERY: &str = "?";

/// Turn a complete OSC payload into a key. Returns [`None`] for anything that isn't a
/// decodable OSC 52 report.
#[must_use]
pub fn key_from_osc_payload(payload: &str) -> Option<KeyEvent> {
    let (_selection, data) = payload
        .strip_prefix(OSC_52_PREFIX)?
        .split_once(PARAM_SEPARATOR)?;

    if data == OSC_52_QUERY {
        return None;
    }

    match OSC_52_ENGINE.decode(data) {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => Some(KeyEvent::paste(String::from_utf8_lossy(&bytes))),
        Err(error) => {
            tracing::warn!(
                message = "Failed to decode OSC 52 clipboard data",
                payload_len = data.len(),
                error = %error
            );
            None
        }
    }
}
