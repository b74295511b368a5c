// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors surfaced to the host application.
//!
//! Key decoding itself never fails: malformed input becomes an unclassified key. The
//! only fallible operations are the ones that touch the OS (the terminal device and
//! its attributes) or set up logging.
//!
//! | Variant                 | Raised by                                    |
//! |:------------------------|:---------------------------------------------|
//! | [`TerminalFd`]          | no tty on stdin and `/dev/tty` won't open     |
//! | [`TerminalAttributes`]  | `tcgetattr` / `tcsetattr`                    |
//! | [`MutexPoisoned`]       | saved terminal settings lock                 |
//! | [`UnsupportedPlatform`] | raw mode on a non unix target                |
//! | [`InvalidLogFilePath`]  | log file path without a file name            |
//! | [`LogFileCreation`]     | file layer of the tracing setup              |
//! | [`LoggingInit`]         | a global subscriber is already installed     |
//!
//! [`TerminalFd`]: KeyInputError::TerminalFd
//! [`TerminalAttributes`]: KeyInputError::TerminalAttributes
//! [`MutexPoisoned`]: KeyInputError::MutexPoisoned
//! [`UnsupportedPlatform`]: KeyInputError::UnsupportedPlatform
//! [`InvalidLogFilePath`]: KeyInputError::InvalidLogFilePath
//! [`LogFileCreation`]: KeyInputError::LogFileCreation
//! [`LoggingInit`]: KeyInputError::LoggingInit

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum KeyInputError {
    #[error("Failed to get terminal file descriptor")]
    #[diagnostic(
        code(r3bl_key_input::terminal::fd),
        help("Stdin is not a tty and /dev/tty could not be opened. Run from a terminal.")
    )]
    TerminalFd(#[source] std::io::Error),

    #[error("Failed to {operation} terminal attributes")]
    #[diagnostic(code(r3bl_key_input::terminal::attributes))]
    TerminalAttributes {
        /// `"retrieve"` or `"set"`.
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal settings lock poisoned")]
    #[diagnostic(
        code(r3bl_key_input::terminal::mutex_poisoned),
        help("A prior thread panicked while changing terminal settings.")
    )]
    MutexPoisoned,

    #[error("Raw mode is not supported on this platform")]
    #[diagnostic(code(r3bl_key_input::terminal::unsupported_platform))]
    UnsupportedPlatform,

    #[error("Log file path has no file name: '{path}'")]
    #[diagnostic(code(r3bl_key_input::log::invalid_path))]
    InvalidLogFilePath { path: String },

    #[error("Could not create log file: '{path}'")]
    #[diagnostic(
        code(r3bl_key_input::log::file_creation),
        help("Check that the parent folder is writable.")
    )]
    LogFileCreation {
        path: String,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("Could not install the global tracing subscriber")]
    #[diagnostic(
        code(r3bl_key_input::log::init),
        help("Only one global subscriber can be installed per process.")
    )]
    LoggingInit(#[source] tracing_subscriber::util::TryInitError),
}
