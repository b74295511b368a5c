// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios tcgetattr tcsetattr ICANON isatty

//! Raw mode of the controlling terminal.
//!
//! In cooked mode the terminal driver buffers a whole line and interprets keys like
//! Ctrl+C itself. Key by key input needs raw mode. [`TerminalMode`] is the seam used by
//! [`crate::TerminalSession`], so the session lifecycle can be tested without a tty.
//! [`TermiosMode`] is the real implementation on top of [`rustix::termios`].
//!
//! The terminal is looked up on stdin first. If stdin is redirected, `/dev/tty` is used
//! so that `cat file | app` still gets keyboard input.

use crate::KeyInputError;

/// Query and toggle raw mode.
pub trait TerminalMode {
    /// `true` when the terminal is not in canonical (line) mode with echo.
    fn is_raw_mode(&self) -> miette::Result<bool>;

    /// Enter (`true`) or leave (`false`) raw mode.
    fn set_raw_mode(&mut self, enabled: bool) -> miette::Result<()>;
}

/// Raw mode via `tcgetattr` / `tcsetattr`. The attributes found when raw mode is first
/// enabled are saved process wide and put back when it is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermiosMode;

impl TerminalMode for TermiosMode {
    fn is_raw_mode(&self) -> miette::Result<bool> { termios_impl::is_raw_mode() }

    fn set_raw_mode(&mut self, enabled: bool) -> miette::Result<()> {
        if enabled {
            termios_impl::enable_raw_mode()
        } else {
            termios_impl::disable_raw_mode()
        }
    }
}

/// Enables raw mode on construction and restores the previous terminal settings when
/// dropped, including on unwind.
#[derive(Debug)]
pub struct RawModeGuard<M: TerminalMode = TermiosMode> {
    mode: M,
    was_raw: bool,
}

impl RawModeGuard<TermiosMode> {
    /// Raw mode on the real terminal.
    pub fn new() -> miette::Result<Self> { Self::with_mode(TermiosMode) }
}

impl<M: TerminalMode> RawModeGuard<M> {
    pub fn with_mode(mut mode: M) -> miette::Result<Self> {
        let was_raw = mode.is_raw_mode()?;
        if !was_raw {
            mode.set_raw_mode(true)?;
        }
        Ok(Self { mode, was_raw })
    }
}

impl<M: TerminalMode> Drop for RawModeGuard<M> {
    fn drop(&mut self) {
        if !self.was_raw
            && let Err(error) = self.mode.set_raw_mode(false)
        {
            tracing::error!(message = "Failed to restore terminal mode", error = ?error);
        }
    }
}

#[cfg(unix)]
mod termios_impl {
    use super::KeyInputError;
    use rustix::{fd::{AsFd, BorrowedFd},
                 termios::{self, LocalModes, OptionalActions, Termios}};
    use std::{fs::File,
              io,
              sync::{LazyLock, Mutex}};

    const DEV_TTY: &str = "/dev/tty";

    static ORIGINAL_TERMIOS: LazyLock<Mutex<Option<Termios>>> =
        LazyLock::new(|| Mutex::new(None));

    enum TerminalFd {
        Stdin(io::Stdin),
        DevTty(File),
    }

    impl AsFd for TerminalFd {
        fn as_fd(&self) -> BorrowedFd<'_> {
            match self {
                TerminalFd::Stdin(stdin) => stdin.as_fd(),
                TerminalFd::DevTty(file) => file.as_fd(),
            }
        }
    }

    fn get_terminal_fd() -> miette::Result<TerminalFd> {
        let stdin = io::stdin();
        if termios::isatty(&stdin) {
            return Ok(TerminalFd::Stdin(stdin));
        }
        let file = File::options()
            .read(true)
            .write(true)
            .open(DEV_TTY)
            .map_err(KeyInputError::TerminalFd)?;
        Ok(TerminalFd::DevTty(file))
    }

    fn get_attributes(fd: &TerminalFd) -> miette::Result<Termios> {
        let termios =
            termios::tcgetattr(fd).map_err(|errno| KeyInputError::TerminalAttributes {
                operation: "retrieve",
                source: errno.into(),
            })?;
        Ok(termios)
    }

    fn set_attributes(fd: &TerminalFd, termios: &Termios) -> miette::Result<()> {
        termios::tcsetattr(fd, OptionalActions::Now, termios).map_err(|errno| {
            KeyInputError::TerminalAttributes {
                operation: "set",
                source: errno.into(),
            }
        })?;
        Ok(())
    }

    pub fn is_raw_mode() -> miette::Result<bool> {
        let fd = get_terminal_fd()?;
        let termios = get_attributes(&fd)?;
        let cooked = LocalModes::ICANON | LocalModes::ECHO;
        Ok(!termios.local_modes.intersects(cooked))
    }

    pub fn enable_raw_mode() -> miette::Result<()> {
        let fd = get_terminal_fd()?;
        let mut termios = get_attributes(&fd)?;

        {
            let mut original = ORIGINAL_TERMIOS
                .lock()
                .map_err(|_| KeyInputError::MutexPoisoned)?;
            if original.is_none() {
                *original = Some(termios.clone());
            }
        }

        termios.make_raw();
        set_attributes(&fd, &termios)
    }

    pub fn disable_raw_mode() -> miette::Result<()> {
        let original = ORIGINAL_TERMIOS
            .lock()
            .map_err(|_| KeyInputError::MutexPoisoned)?;

        if let Some(ref termios) = *original {
            let fd = get_terminal_fd()?;
            set_attributes(&fd, termios)?;
        }
        Ok(())
    }
}

#[cfg(not(unix))]
mod termios_impl {
    use super::KeyInputError;

    pub fn is_raw_mode() -> miette::Result<bool> {
        Err(KeyInputError::UnsupportedPlatform.into())
    }

    pub fn enable_raw_mode() -> miette::Result<()> {
        Err(KeyInputError::UnsupportedPlatform.into())
    }

    pub fn disable_raw_mode() -> miette::Result<()> {
        Err(KeyInputError::UnsupportedPlatform.into())
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::TerminalMode;
    use std::sync::{Arc, Mutex};

    /// In memory terminal that records every raw mode change.
    #[derive(Debug, Clone, Default)]
    pub struct FakeTerminalMode {
        pub raw: Arc<Mutex<bool>>,
        pub history: Arc<Mutex<Vec<bool>>>,
    }

    impl FakeTerminalMode {
        pub fn starting_raw(raw: bool) -> Self {
            Self {
                raw: Arc::new(Mutex::new(raw)),
                ..Default::default()
            }
        }

        pub fn is_raw(&self) -> bool { *self.raw.lock().unwrap() }

        pub fn history(&self) -> Vec<bool> { self.history.lock().unwrap().clone() }
    }

    impl TerminalMode for FakeTerminalMode {
        fn is_raw_mode(&self) -> miette::Result<bool> { Ok(self.is_raw()) }

        fn set_raw_mode(&mut self, enabled: bool) -> miette::Result<()> {
            *self.raw.lock().unwrap() = enabled;
            self.history.lock().unwrap().push(enabled);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests_raw_mode {
    use super::{test_fixtures::FakeTerminalMode, *};
    use pretty_assertions::assert_eq;

    #[test]
    fn guard_enables_then_restores() {
        let fake = FakeTerminalMode::starting_raw(false);
        {
            let _guard = RawModeGuard::with_mode(fake.clone()).unwrap();
            assert!(fake.is_raw());
        }
        assert!(!fake.is_raw());
        assert_eq!(fake.history(), vec![true, false]);
    }

    #[test]
    fn guard_leaves_already_raw_terminal_alone() {
        let fake = FakeTerminalMode::starting_raw(true);
        drop(RawModeGuard::with_mode(fake.clone()).unwrap());
        assert!(fake.is_raw());
        assert_eq!(fake.history(), Vec::<bool>::new());
    }
}
