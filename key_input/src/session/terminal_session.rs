// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Owns the terminal while key input is being read.
//!
//! A [`TerminalSession`] ties the pieces together:
//!
//! ```text
//! stdin-reader thread ──bytes──▶ Utf8ChunkDecoder ──text──▶ KeyPipeline ──┬─ Key ──────────▶ SharedKeyRegistry
//!                                                                         └─ PasteTimeout ─▶ notification channel
//! ```
//!
//! # Lifecycle
//!
//! 1. [`TerminalSession::activate`] remembers whether the terminal was already in raw
//!    mode and switches it on if it wasn't.
//! 2. Bytes and timer ticks are fed in, either by hand with
//!    [`TerminalSession::handle_bytes`] / [`TerminalSession::handle_timer`], or by
//!    [`TerminalSession::run`] which does it in a [`tokio::select!`] loop.
//! 3. [`TerminalSession::deactivate`] drops anything still buffered and puts the raw
//!    mode flag back the way it was found.
//!
//! Both transitions are idempotent. Dropping an active session deactivates it.

use crate::{InputConfig, KeyPipeline, PipelineEvent, SharedKeyRegistry, StdinReadResult,
            StdinReceiver, TerminalMode, TermiosMode, Utf8ChunkDecoder};
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};

/// Out of band events for the host, next to the keys themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotification {
    /// A bracketed paste was started but never finished. Its text was discarded.
    PasteTimeout,
}

pub type NotificationSender = mpsc::UnboundedSender<SessionNotification>;

pub type NotificationReceiver = mpsc::UnboundedReceiver<SessionNotification>;

/// Why [`TerminalSession::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    Eof,
    ReadError(std::io::ErrorKind),
    /// The reader thread went away without saying why.
    InputClosed,
    /// A shutdown signal was received, or the session was not active.
    Deactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SessionState {
    #[default]
    Inactive,
    Active {
        /// Raw mode flag found at activation, restored on deactivation.
        was_raw: bool,
    },
}

#[derive(Debug)]
pub struct TerminalSession<M: TerminalMode = TermiosMode> {
    mode: M,
    config: InputConfig,
    state: SessionState,
    utf8_decoder: Utf8ChunkDecoder,
    pipeline: KeyPipeline,
    registry: SharedKeyRegistry,
    notification_sender: Option<NotificationSender>,
    shutdown_sender: broadcast::Sender<()>,
}

impl TerminalSession<TermiosMode> {
    /// Session on the real terminal.
    #[must_use]
    pub fn new(config: InputConfig) -> Self { Self::with_mode(TermiosMode, config) }
}

impl<M: TerminalMode> TerminalSession<M> {
    #[must_use]
    pub fn with_mode(mode: M, config: InputConfig) -> Self {
        let (shutdown_sender, _) = broadcast::channel::<()>(1);
        Self {
            mode,
            config,
            state: SessionState::default(),
            utf8_decoder: Utf8ChunkDecoder::new(),
            pipeline: KeyPipeline::new(&config),
            registry: SharedKeyRegistry::default(),
            notification_sender: None,
            shutdown_sender,
        }
    }

    /// Create the channel that receives [`SessionNotification`]s. Replaces any
    /// previous channel.
    pub fn subscribe_notifications(&mut self) -> NotificationReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.notification_sender = Some(sender);
        receiver
    }

    /// Handle for consumers to subscribe key handlers, at any time.
    #[must_use]
    pub fn registry(&self) -> SharedKeyRegistry { self.registry.clone() }

    /// Sending on this makes a running [`Self::run`] deactivate the session and return.
    #[must_use]
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> { self.shutdown_sender.clone() }

    #[must_use]
    pub fn is_active(&self) -> bool { self.state != SessionState::Inactive }

    #[must_use]
    pub fn config(&self) -> &InputConfig { &self.config }

    /// Take over the terminal. Does nothing if already active.
    ///
    /// # Errors
    ///
    /// If the terminal mode can't be read or changed. The session stays inactive.
    pub fn activate(&mut self) -> miette::Result<()> {
        if self.is_active() {
            return Ok(());
        }

        let was_raw = self.mode.is_raw_mode()?;
        if !was_raw {
            self.mode.set_raw_mode(true)?;
        }
        self.state = SessionState::Active { was_raw };

        tracing::info!(message = "Key input session activated", was_raw = was_raw);
        Ok(())
    }

    /// Give the terminal back. Buffered input is discarded. Does nothing if not
    /// active.
    ///
    /// # Errors
    ///
    /// If the raw mode flag can't be restored. The session is inactive regardless.
    pub fn deactivate(&mut self) -> miette::Result<()> {
        let SessionState::Active { was_raw } = std::mem::take(&mut self.state) else {
            return Ok(());
        };

        self.pipeline.clear();
        self.utf8_decoder = Utf8ChunkDecoder::new();
        if !was_raw {
            self.mode.set_raw_mode(false)?;
        }

        tracing::info!(message = "Key input session deactivated", was_raw = was_raw);
        Ok(())
    }

    /// Feed one chunk read from the terminal. Ignored while inactive.
    pub fn handle_bytes(&mut self, bytes: &[u8], now: Instant) {
        if !self.is_active() {
            return;
        }

        let text = self.utf8_decoder.decode(bytes);
        self.config.debug_logging.then(|| {
            tracing::debug!(message = "Raw input chunk", bytes = ?bytes, text = ?text);
        });
        if text.is_empty() {
            return;
        }

        let events = self.pipeline.feed_chunk(&text, now);
        self.dispatch(events);
    }

    /// Fire the pipeline timers that are due at `now`.
    pub fn handle_timer(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }
        let events = self.pipeline.on_timer(now);
        self.dispatch(events);
    }

    /// The input stream ended: resolve everything held, then stop.
    pub fn handle_eof(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }
        if let Some(replacement) = self.utf8_decoder.flush() {
            let events = self.pipeline.feed_chunk(&replacement.to_string(), now);
            self.dispatch(events);
        }
        let events = self.pipeline.flush(now);
        self.dispatch(events);
    }

    /// When [`Self::handle_timer`] next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> { self.pipeline.next_deadline() }

    /// Drive the session from the stdin reader channel until EOF, a read error, or a
    /// shutdown signal. Timer deadlines are slept on in the same loop, so keys and
    /// timeouts are handled strictly one at a time. The session is deactivated on
    /// every exit path.
    pub async fn run(&mut self, mut receiver: StdinReceiver) -> SessionExit {
        let mut shutdown_receiver = self.shutdown_sender.subscribe();

        let exit = loop {
            if !self.is_active() {
                break SessionExit::Deactivated;
            }
            let deadline = self.next_deadline();

            // Due deadlines resolve before a chunk that arrived at the same time.
            tokio::select! {
                biased;
                () = sleep_until_deadline(deadline) => {
                    self.handle_timer(now());
                }
                maybe_read = receiver.recv() => match maybe_read {
                    Some(StdinReadResult::Data(bytes)) => {
                        self.handle_bytes(&bytes, now());
                    }
                    Some(StdinReadResult::Eof) => {
                        self.handle_eof(now());
                        break SessionExit::Eof;
                    }
                    Some(StdinReadResult::Error(kind)) => {
                        tracing::error!(message = "Stdin read failed", error_kind = ?kind);
                        break SessionExit::ReadError(kind);
                    }
                    None => break SessionExit::InputClosed,
                },
                _ = shutdown_receiver.recv() => {
                    break SessionExit::Deactivated;
                }
            }
        };

        if let Err(error) = self.deactivate() {
            tracing::error!(message = "Failed to deactivate key input session", error = ?error);
        }
        exit
    }

    fn dispatch(&self, events: Vec<PipelineEvent>) {
        for event in events {
            match event {
                PipelineEvent::Key(key) => {
                    self.config.debug_logging.then(|| {
                        tracing::debug!(message = "Key", key = %key, sequence = ?key.sequence);
                    });
                    let consumed = self.registry.broadcast(&key);
                    self.config.debug_logging.then(|| {
                        tracing::debug!(message = "Key broadcast", consumed = consumed);
                    });
                }
                PipelineEvent::PasteTimeout => self.notify(SessionNotification::PasteTimeout),
            }
        }
    }

    fn notify(&self, notification: SessionNotification) {
        let delivered = self
            .notification_sender
            .as_ref()
            .is_some_and(|sender| sender.send(notification).is_ok());
        if !delivered {
            tracing::warn!(message = "Session notification dropped", notification = ?notification);
        }
    }
}

impl<M: TerminalMode> Drop for TerminalSession<M> {
    fn drop(&mut self) {
        if let Err(error) = self.deactivate() {
            tracing::error!(message = "Failed to restore terminal on drop", error = ?error);
        }
    }
}

/// Clock used by [`TerminalSession::run`]. Follows tokio's clock so that deadlines and
/// [`tokio::time::sleep_until`] agree.
fn now() -> Instant { tokio::time::Instant::now().into_std() }

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
