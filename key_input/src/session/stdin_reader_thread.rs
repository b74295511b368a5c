// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR

//! Dedicated thread for blocking stdin reads.
//!
//! `tokio::io::stdin()` itself uses a blocking thread pool and can't be cancelled, so
//! the input loop owns a plain OS thread that blocks on `read()` and forwards every
//! chunk over an unbounded channel. The thread never touches pipeline state.
//!
//! ```text
//! ┌──────────────────────┐   StdinReadResult    ┌──────────────────────────┐
//! │ "stdin-reader" thread│ ───────────────────▶ │ TerminalSession::run()   │
//! │ read() blocks        │   unbounded mpsc     │ tokio::select! loop      │
//! └──────────────────────┘                      └──────────────────────────┘
//! ```
//!
//! The thread exits on EOF, on a read error, or when the receiver is dropped (detected
//! on the next send).

use std::io::Read as _;

/// Bytes per `read()` call.
pub const STDIN_READ_BUFFER_SIZE: usize = 256;

pub const STDIN_READER_THREAD_NAME: &str = "stdin-reader";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinReadResult {
    Data(Vec<u8>),
    Eof,
    Error(std::io::ErrorKind),
}

pub type StdinSender = tokio::sync::mpsc::UnboundedSender<StdinReadResult>;

pub type StdinReceiver = tokio::sync::mpsc::UnboundedReceiver<StdinReadResult>;

/// Start the reader thread and return the receiving end of its channel.
///
/// # Errors
///
/// If the OS refuses to create the thread.
pub fn spawn_stdin_reader_thread(debug_logging: bool) -> miette::Result<StdinReceiver> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name(STDIN_READER_THREAD_NAME.into())
        .spawn(move || {
            let stdin = std::io::stdin().lock();
            stdin_reader_loop(stdin, &tx, debug_logging);
        })
        .map_err(|error| miette::miette!("Failed to spawn stdin reader thread: {error}"))?;

    Ok(rx)
}

/// Read from `source` until EOF, error, or a closed channel.
fn stdin_reader_loop(mut source: impl std::io::Read, tx: &StdinSender, debug_logging: bool) {
    let mut buffer = [0u8; STDIN_READ_BUFFER_SIZE];

    loop {
        match source.read(&mut buffer) {
            Ok(0) => {
                debug_logging.then(|| {
                    tracing::debug!(message = "stdin-reader-thread: EOF (0 bytes)");
                });
                drop(tx.send(StdinReadResult::Eof));
                break;
            }
            Ok(n) => {
                debug_logging.then(|| {
                    tracing::debug!(
                        message = "stdin-reader-thread: read bytes",
                        bytes_read = n
                    );
                });
                if tx.send(StdinReadResult::Data(buffer[..n].to_vec())).is_err() {
                    debug_logging.then(|| {
                        tracing::debug!(
                            message = "stdin-reader-thread: receiver dropped, exiting"
                        );
                    });
                    break;
                }
            }
            Err(ref error) if error.kind() == std::io::ErrorKind::Interrupted => {
                // EINTR, retry.
            }
            Err(error) => {
                tracing::error!(message = "stdin-reader-thread: read failed", error = ?error);
                drop(tx.send(StdinReadResult::Error(error.kind())));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests_stdin_reader_thread {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, ErrorKind, Read as _};

    /// Yields `Interrupted` once, then reads from the inner cursor.
    struct InterruptedOnce {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl std::io::Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(ErrorKind::Interrupted.into());
            }
            self.inner.read(buf)
        }
    }

    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(ErrorKind::BrokenPipe.into())
        }
    }

    fn drain(mut rx: StdinReceiver) -> Vec<StdinReadResult> {
        let mut results = vec![];
        while let Ok(result) = rx.try_recv() {
            results.push(result);
        }
        results
    }

    #[test]
    fn data_then_eof() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        stdin_reader_loop(Cursor::new(b"abc".to_vec()), &tx, true);
        assert_eq!(
            drain(rx),
            vec![StdinReadResult::Data(b"abc".to_vec()), StdinReadResult::Eof]
        );
    }

    #[test]
    fn large_input_is_chunked() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let input = vec![b'x'; STDIN_READ_BUFFER_SIZE + 10];
        stdin_reader_loop(Cursor::new(input), &tx, false);

        let results = drain(rx);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            StdinReadResult::Data(vec![b'x'; STDIN_READ_BUFFER_SIZE])
        );
        assert_eq!(results[1], StdinReadResult::Data(vec![b'x'; 10]));
    }

    #[test]
    fn interrupted_read_is_retried() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let source = InterruptedOnce {
            interrupted: false,
            inner: Cursor::new(b"q".to_vec()),
        };
        stdin_reader_loop(source, &tx, false);
        assert_eq!(
            drain(rx),
            vec![StdinReadResult::Data(b"q".to_vec()), StdinReadResult::Eof]
        );
    }

    #[test]
    fn read_error_is_forwarded() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        stdin_reader_loop(Broken, &tx, false);
        assert_eq!(drain(rx), vec![StdinReadResult::Error(ErrorKind::BrokenPipe)]);
    }

    #[test]
    fn stops_when_receiver_dropped() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        // Would loop forever on an endless source if the closed channel were ignored.
        stdin_reader_loop(std::io::repeat(b'z'), &tx, false);
    }
}
