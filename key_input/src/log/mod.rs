// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup for hosts that don't bring their own subscriber.
//!
//! The pipeline only ever emits [`tracing`] events. Hosts that already install a
//! subscriber get them for free. Others can call [`try_initialize_logging_global`] (or
//! the thread local variant in tests) with a [`TracingConfig`].

// Attach.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;
