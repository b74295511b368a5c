// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Everything between the terminal device and the subscribers: raw mode, the stdin
//! reader thread, UTF-8 chunk decoding, the [`KeyPipeline`] and the
//! [`TerminalSession`] that drives them.

// Attach.
mod pipeline;
mod raw_mode;
mod stdin_reader_thread;
mod terminal_session;
mod utf8_chunk_decoder;

// Re-export.
pub use pipeline::*;
pub use raw_mode::*;
pub use stdin_reader_thread::*;
pub use terminal_session::*;
pub use utf8_chunk_decoder::*;
