// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Configuration for the input pipeline.
//!
//! Everything that depends on the environment (locale, terminal capabilities) is read
//! once, up front, and handed down as plain values. No pipeline stage reads the
//! environment itself, which keeps the stages deterministic under test.

use std::time::Duration;

/// Locale facts that change how characters are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocaleInfo {
    /// Greek keyboards type `π`, `Ω`, `µ` which otherwise look like macOS Option+letter
    /// characters.
    pub greek_locale: bool,
}

impl LocaleInfo {
    pub const GREEK_LANGUAGE_PREFIX: &str = "el";

    /// Read `LANG` and `LC_ALL` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let lang = std::env::var("LANG").ok();
        let lc_all = std::env::var("LC_ALL").ok();
        Self::from_locale_vars(lang.as_deref(), lc_all.as_deref())
    }

    /// Derive locale info from the values of `LANG` and `LC_ALL`.
    #[must_use]
    pub fn from_locale_vars(lang: Option<&str>, lc_all: Option<&str>) -> Self {
        let is_greek = |value: Option<&str>| {
            value.is_some_and(|it| it.starts_with(Self::GREEK_LANGUAGE_PREFIX))
        };
        Self {
            greek_locale: is_greek(lang) || is_greek(lc_all),
        }
    }
}

/// Timeouts for every stage that holds input back. These are tuned against real
/// terminal emulators and can be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputTimeouts {
    /// Quiet period after which a pending escape sequence is forced to resolve.
    pub esc: Duration,
    /// Inactivity period after which an unterminated bracketed paste is discarded.
    pub paste: Duration,
    /// How long a typed `\` is held waiting for a `return`.
    pub backslash_return: Duration,
    /// A `return` arriving within this window of the previous key is a newline.
    pub fast_return: Duration,
}

impl InputTimeouts {
    pub const DEFAULT_ESC: Duration = Duration::from_millis(50);
    pub const DEFAULT_PASTE: Duration = Duration::from_secs(30);
    pub const DEFAULT_BACKSLASH_RETURN: Duration = Duration::from_millis(5);
    pub const DEFAULT_FAST_RETURN: Duration = Duration::from_millis(30);
}

impl Default for InputTimeouts {
    fn default() -> Self {
        Self {
            esc: Self::DEFAULT_ESC,
            paste: Self::DEFAULT_PASTE,
            backslash_return: Self::DEFAULT_BACKSLASH_RETURN,
            fast_return: Self::DEFAULT_FAST_RETURN,
        }
    }
}

/// Everything the [`crate::KeyPipeline`] and [`crate::TerminalSession`] need to know
/// about their environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputConfig {
    /// Set by an external capability detector when the terminal speaks the kitty
    /// keyboard protocol. Disables the fast-return heuristic.
    pub kitty_protocol_supported: bool,
    /// Log every raw chunk and every completed key at `debug` level.
    pub debug_logging: bool,
    pub locale: LocaleInfo,
    pub timeouts: InputTimeouts,
}

impl InputConfig {
    /// Default config with the locale read from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            locale: LocaleInfo::from_env(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_kitty_protocol_supported(self, kitty_protocol_supported: bool) -> Self {
        Self {
            kitty_protocol_supported,
            ..self
        }
    }

    #[must_use]
    pub fn with_debug_logging(self, debug_logging: bool) -> Self {
        Self {
            debug_logging,
            ..self
        }
    }

    #[must_use]
    pub fn with_locale(self, locale: LocaleInfo) -> Self { Self { locale, ..self } }

    #[must_use]
    pub fn with_timeouts(self, timeouts: InputTimeouts) -> Self {
        Self { timeouts, ..self }
    }
}
