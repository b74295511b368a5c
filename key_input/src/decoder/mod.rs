// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! Escape sequence decoder: raw chars in, [`KeyEvent`]s out.
//!
//! ## Where You Are in the Pipeline
//!
//! ```text
//! stdin bytes ─▶ Utf8ChunkDecoder ─▶ chars
//!    │
//! ┌──▼───────────────────────────────┐  ┌──────────────────┐
//! │ decoder (KeyDecoder)             ◀──┤ **YOU ARE HERE** │
//! │ • CSI / SS3 / OSC state machine  │  └──────────────────┘
//! │ • key table + modifier decoding  │
//! │ • mouse absorption               │
//! └──┬───────────────────────────────┘
//!    ▼
//! TimedDecoder ─▶ paste ─▶ backslash ─▶ fast return ─▶ filter ─▶ KeyRegistry
//! ```
//!
//! The decoder itself is total and has no clock. Time only enters through
//! [`DecoderInput::EndOfInput`], which the [`crate::TimedDecoder`] feeds after a quiet
//! period.
//!
//! [`KeyEvent`]: crate::KeyEvent

// Attach.
pub mod constants;

// Conditionally public modules for documentation and testing.

#[cfg(any(test, doc))]
pub mod key_table;
#[cfg(not(any(test, doc)))]
mod key_table;

#[cfg(any(test, doc))]
pub mod modifiers;
#[cfg(not(any(test, doc)))]
mod modifiers;

#[cfg(any(test, doc))]
pub mod option_letters;
#[cfg(not(any(test, doc)))]
mod option_letters;

#[cfg(any(test, doc))]
pub mod osc;
#[cfg(not(any(test, doc)))]
mod osc;

mod decoder_state;

// Re-export.
pub use decoder_state::*;
