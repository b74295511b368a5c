// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The ordered chain from decoded characters to broadcastable keys.
//!
//! ```text
//! chunk ─▶ TimedDecoder ─▶ PasteBuffer ─▶ BackslashReturnBuffer ─▶ FastReturnBuffer ─▶ NonKeyboardFilter ─▶ out
//!               │               │                  │                       │
//!           esc deadline   paste deadline   backslash deadline        (no deadline)
//! ```
//!
//! The pipeline never sleeps. The owner asks for [`KeyPipeline::next_deadline`], waits
//! until then (or until more input arrives) and calls [`KeyPipeline::on_timer`]. All
//! expired deadlines are fired in chronological order, and whatever a stage releases
//! on its deadline flows through the stages after it, exactly like a pushed key.

use crate::{BackslashReturnBuffer, FastReturnBuffer, InputConfig, KeyEvent, KeyStage,
            NonKeyboardFilter, PasteBuffer, PipelineEvent, TimedDecoder};
use std::time::Instant;

#[derive(Debug)]
pub struct KeyPipeline {
    decoder: TimedDecoder,
    stages: Vec<Box<dyn KeyStage>>,
    /// Arrival time of the latest chunk. Keys released by a timer carry this
    /// timestamp downstream, not the firing time.
    last_input_at: Option<Instant>,
}

/// Who owns an expired deadline. The decoder comes before every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DeadlineOwner {
    Decoder,
    Stage(usize),
}

impl KeyPipeline {
    /// Build the standard stage order for `config`. The fast-return heuristic is left
    /// out when the terminal speaks the kitty keyboard protocol.
    #[must_use]
    pub fn new(config: &InputConfig) -> Self {
        let timeouts = config.timeouts;
        let mut stages: Vec<Box<dyn KeyStage>> = vec![
            Box::new(PasteBuffer::new(timeouts.paste)),
            Box::new(BackslashReturnBuffer::new(timeouts.backslash_return)),
        ];
        if !config.kitty_protocol_supported {
            stages.push(Box::new(FastReturnBuffer::new(timeouts.fast_return)));
        }
        stages.push(Box::new(NonKeyboardFilter));

        Self::with_stages(TimedDecoder::new(config.locale, timeouts.esc), stages)
    }

    /// Custom stage order.
    #[must_use]
    pub fn with_stages(decoder: TimedDecoder, stages: Vec<Box<dyn KeyStage>>) -> Self {
        Self {
            decoder,
            stages,
            last_input_at: None,
        }
    }

    #[must_use]
    pub fn stage_count(&self) -> usize { self.stages.len() }

    /// Decode `chunk` and run every completed key through all stages. Deadlines that
    /// are already due at `now` fire first, so a late chunk never joins a held key.
    pub fn feed_chunk(&mut self, chunk: &str, now: Instant) -> Vec<PipelineEvent> {
        let mut out = self.on_timer(now);
        self.last_input_at = Some(now);

        let keys = self.decoder.feed_chunk(chunk, now);
        if !keys.is_empty() {
            out.extend(self.run_stages_from(
                0,
                keys.into_iter().map(PipelineEvent::Key).collect(),
                now,
            ));
        }
        out
    }

    /// Fire every deadline that is due at `now`, earliest first. Ties go to the
    /// upstream owner.
    pub fn on_timer(&mut self, now: Instant) -> Vec<PipelineEvent> {
        let mut out = vec![];
        let released_at = self.last_input_at.unwrap_or(now).min(now);

        while let Some(owner) = self.earliest_expired(now) {
            match owner {
                DeadlineOwner::Decoder => {
                    if let Some(key) = self.decoder.on_timeout(now) {
                        out.extend(self.run_stages_from(
                            0,
                            vec![PipelineEvent::Key(key)],
                            released_at,
                        ));
                    }
                }
                DeadlineOwner::Stage(index) => {
                    let mut released = vec![];
                    if let Some(stage) = self.stages.get_mut(index) {
                        stage.on_deadline(now, &mut released);
                    }
                    out.extend(self.run_stages_from(index + 1, released, released_at));
                }
            }
        }

        out
    }

    /// Resolve everything held as if the input had gone quiet for good: every pending
    /// deadline is fired in order, however far away it is.
    pub fn flush(&mut self, now: Instant) -> Vec<PipelineEvent> {
        let mut out = vec![];
        while let Some(deadline) = self.next_deadline() {
            out.extend(self.on_timer(deadline.max(now)));
        }
        out
    }

    /// The earliest moment [`Self::on_timer`] has something to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines().map(|(deadline, _)| deadline).min()
    }

    /// `true` when neither the decoder nor any stage holds input back.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.decoder.is_pending() && self.stages.iter().all(|stage| stage.is_idle())
    }

    /// Drop all pending input without emitting anything.
    pub fn clear(&mut self) {
        self.decoder.reset();
        self.last_input_at = None;
        for stage in &mut self.stages {
            stage.clear();
        }
    }

    fn deadlines(&self) -> impl Iterator<Item = (Instant, DeadlineOwner)> + '_ {
        let decoder = self
            .decoder
            .deadline()
            .map(|deadline| (deadline, DeadlineOwner::Decoder));
        let stages = self.stages.iter().enumerate().filter_map(|(index, stage)| {
            stage
                .deadline()
                .map(|deadline| (deadline, DeadlineOwner::Stage(index)))
        });
        decoder.into_iter().chain(stages)
    }

    fn earliest_expired(&self, now: Instant) -> Option<DeadlineOwner> {
        self.deadlines()
            .filter(|(deadline, _)| *deadline <= now)
            .min()
            .map(|(_, owner)| owner)
    }

    /// Each stage sees the full output of the previous one, in order. A stage's output
    /// only depends on the sequence of its input, so running stage by stage is the same
    /// as running key by key.
    fn run_stages_from(
        &mut self,
        first_stage: usize,
        mut events: Vec<PipelineEvent>,
        now: Instant,
    ) -> Vec<PipelineEvent> {
        for stage in self.stages.iter_mut().skip(first_stage) {
            if events.is_empty() {
                break;
            }
            let mut next = Vec::with_capacity(events.len());
            for event in events {
                match event {
                    PipelineEvent::Key(key) => stage.push(key, now, &mut next),
                    signal @ PipelineEvent::PasteTimeout => next.push(signal),
                }
            }
            events = next;
        }
        events
    }

    /// Keys only, for callers that do not care about signals.
    #[must_use]
    pub fn keys_of(events: Vec<PipelineEvent>) -> Vec<KeyEvent> {
        events
            .into_iter()
            .filter_map(|event| match event {
                PipelineEvent::Key(key) => Some(key),
                PipelineEvent::PasteTimeout => None,
            })
            .collect()
    }
}
