// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `\` followed by `return` is a newline.
//!
//! Several terminals (VS Code, some tmux setups) implement shift+enter by sending a
//! backslash immediately followed by a carriage return. A typed `\` is held back for a
//! few milliseconds to see if a `return` follows:
//!
//! | held | next key     | emitted                         |
//! |:-----|:-------------|:--------------------------------|
//! | `\`  | `return`     | `return` marked literal newline |
//! | `\`  | anything else| `\`, then that key              |
//! | `\`  | (timeout)    | `\`                             |

use crate::{KeyEvent, KeyStage, PipelineEvent, key_names};
use std::time::{Duration, Instant};

const BACKSLASH: &str = "\\";

#[derive(Debug)]
pub struct BackslashReturnBuffer {
    held: Option<(KeyEvent, Instant)>,
    timeout: Duration,
}

impl BackslashReturnBuffer {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            held: None,
            timeout,
        }
    }
}

impl KeyStage for BackslashReturnBuffer {
    fn push(&mut self, key: KeyEvent, now: Instant, out: &mut Vec<PipelineEvent>) {
        match self.held.take() {
            Some(_) if key.is_named(key_names::RETURN) => {
                out.push(PipelineEvent::Key(key.into_literal_newline()));
            }
            Some((backslash, _)) => {
                out.push(PipelineEvent::Key(backslash));
                out.push(PipelineEvent::Key(key));
            }
            None if key.sequence == BACKSLASH => {
                self.held = Some((key, now + self.timeout));
            }
            None => out.push(PipelineEvent::Key(key)),
        }
    }

    fn deadline(&self) -> Option<Instant> { self.held.as_ref().map(|(_, deadline)| *deadline) }

    fn on_deadline(&mut self, now: Instant, out: &mut Vec<PipelineEvent>) {
        if self.deadline().is_some_and(|deadline| deadline <= now)
            && let Some((backslash, _)) = self.held.take()
        {
            out.push(PipelineEvent::Key(backslash));
        }
    }

    fn is_idle(&self) -> bool { self.held.is_none() }

    fn clear(&mut self) { self.held = None; }
}
