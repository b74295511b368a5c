// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words kitty termios

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap().
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

//! # r3bl_key_input
//!
//! Terminal key input for interactive command line apps. Raw bytes from the
//! controlling terminal go in, a clean stream of [`KeyEvent`]s comes out, offered to
//! subscribers in priority order.
//!
//! ```text
//! stdin ─▶ Utf8ChunkDecoder ─▶ KeyDecoder ─▶ TimedDecoder ─▶ PasteBuffer
//!   ─▶ BackslashReturnBuffer ─▶ FastReturnBuffer ─▶ NonKeyboardFilter ─▶ KeyRegistry
//! ```
//!
//! Terminal input is ambiguous. A lone `ESC` is the Escape key and also the first byte
//! of every arrow key. A pasted newline looks exactly like Enter. Mouse reports and
//! focus changes arrive on the same stream as keys. Each stage of the pipeline
//! resolves one of these ambiguities with a small, bounded wait and never blocks
//! indefinitely.
//!
//! ## Modules
//!
//! | Module             | Role                                                        |
//! |:-------------------|:------------------------------------------------------------|
//! | [`key_event`]      | the [`KeyEvent`] value passed to consumers                  |
//! | [`decoder`]        | resumable escape sequence state machine                     |
//! | [`timeout_governor`] | forces a pending sequence to resolve after a quiet period |
//! | [`buffers`]        | paste, backslash+return and fast return stages              |
//! | [`filter`]         | drops mouse and focus sequences                             |
//! | [`registry`]       | priority ordered subscribers                                |
//! | [`session`]        | raw mode, stdin reader, the pipeline and its async loop     |
//! | [`config`]         | locale, kitty support, timeouts                             |
//! | [`log`]            | optional tracing subscriber setup                           |
//!
//! ## Example
//!
//! ```no_run
//! use r3bl_key_input::{InputConfig, Priority, TerminalSession, key_handler,
//!                      spawn_stdin_reader_thread};
//!
//! # async fn run() -> miette::Result<()> {
//! let config = InputConfig::from_env();
//! let mut session = TerminalSession::new(config);
//! session.registry().subscribe(
//!     key_handler(|key| {
//!         println!("{key}\r");
//!         true
//!     }),
//!     Priority::Normal,
//! );
//!
//! session.activate()?;
//! let stdin_receiver = spawn_stdin_reader_thread(config.debug_logging)?;
//! let exit = session.run(stdin_receiver).await;
//! println!("session ended: {exit:?}");
//! # Ok(())
//! # }
//! ```

// Attach.
pub mod buffers;
pub mod config;
pub mod decoder;
pub mod error;
pub mod filter;
pub mod key_event;
pub mod log;
pub mod registry;
pub mod session;
pub mod timeout_governor;

// Re-export.
pub use buffers::*;
pub use config::*;
pub use decoder::*;
pub use error::*;
pub use filter::*;
pub use key_event::*;
pub use log::*;
pub use registry::*;
pub use session::*;
pub use timeout_governor::*;
