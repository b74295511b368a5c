// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Disambiguation buffers. Each one is a [`KeyStage`] owning its own cursor and
//! deadline, run in a fixed order by the [`crate::KeyPipeline`].

// Attach.
pub mod backslash_return_buffer;
pub mod fast_return_buffer;
pub mod key_stage;
pub mod paste_buffer;

// Re-export.
pub use backslash_return_buffer::*;
pub use fast_return_buffer::*;
pub use key_stage::*;
pub use paste_buffer::*;
