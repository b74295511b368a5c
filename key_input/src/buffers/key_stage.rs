// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::KeyEvent;
use std::{fmt::Debug, time::Instant};

/// What flows between pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Key(KeyEvent),
    /// A bracketed paste never saw its end marker and was discarded. Surfaced to the
    /// host so the UI can hint that the paste was lost.
    PasteTimeout,
}

/// One buffering stage of the [`crate::KeyPipeline`].
///
/// A stage owns its cursor (whatever it is holding back) and exposes at most one
/// deadline. It never sleeps. The pipeline calls [`KeyStage::on_deadline`] once the
/// deadline has passed. Output is appended to `out` in the order it must be seen
/// downstream.
pub trait KeyStage: Debug + Send {
    /// Offer the next key to this stage.
    fn push(&mut self, key: KeyEvent, now: Instant, out: &mut Vec<PipelineEvent>);

    /// When this stage wants to be woken up, if it holds anything.
    fn deadline(&self) -> Option<Instant> { None }

    /// Called once `now >= deadline()`.
    fn on_deadline(&mut self, _now: Instant, _out: &mut Vec<PipelineEvent>) {}

    /// `true` when nothing is held back.
    fn is_idle(&self) -> bool { true }

    /// Drop whatever is held without emitting it.
    fn clear(&mut self) {}
}
