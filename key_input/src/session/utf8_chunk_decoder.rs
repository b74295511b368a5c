// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words multibyte

//! Byte chunks to text.
//!
//! A `read()` on stdin can split a multibyte character anywhere. The incomplete tail of
//! a chunk is held back and prepended to the next one:
//!
//! ```text
//! chunk 1: 61 C3        ──▶ "a"   (C3 held)
//! chunk 2: A9 62        ──▶ "éb"
//! ```
//!
//! Bytes that can never become valid UTF-8 are replaced with U+FFFD, so bad input is
//! visible downstream instead of silently dropped.

use smallvec::SmallVec;
use std::char::REPLACEMENT_CHARACTER;

/// Longest UTF-8 encoding of a single char.
pub const MAX_UTF8_LEN: usize = 4;

#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: SmallVec<[u8; MAX_UTF8_LEN]>,
}

impl Utf8ChunkDecoder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// `true` while a partial character is held from the previous chunk.
    #[must_use]
    pub fn has_pending(&self) -> bool { !self.pending.is_empty() }

    /// Decode `bytes`, joined to whatever was held from the previous call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending).into_vec();
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match error.error_len() {
                        Some(invalid_len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &after[invalid_len..];
                        }
                        None => {
                            // Truncated at the end of the chunk. Wait for the rest.
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Give up on a held partial character (the stream ended).
    pub fn flush(&mut self) -> Option<char> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending.clear();
        Some(REPLACEMENT_CHARACTER)
    }
}
