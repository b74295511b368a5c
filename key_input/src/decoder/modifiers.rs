// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Modifier parameter decoding for CSI and SS3 sequences.
//!
//! ```text
//! ESC [ 1 ; 5 A
//!           │
//!           └── modifier param = 1 + mask, here mask = 4 = Ctrl
//!
//! mask bit │ 0     │ 1   │ 2    │ 3
//! ─────────┼───────┼─────┼──────┼─────────
//! modifier │ Shift │ Alt │ Ctrl │ Command
//! ```

use crate::KeyEvent;

const SHIFT_BIT: u32 = 0b0001;
const ALT_BIT: u32 = 0b0010;
const CTRL_BIT: u32 = 0b0100;
const CMD_BIT: u32 = 0b1000;

/// Decoded modifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub cmd: bool,
}

impl KeyModifiers {
    /// Decode the raw bitmask (already `param - 1`).
    #[must_use]
    pub fn from_mask(mask: u32) -> Self {
        Self {
            shift: mask & SHIFT_BIT != 0,
            alt: mask & ALT_BIT != 0,
            ctrl: mask & CTRL_BIT != 0,
            cmd: mask & CMD_BIT != 0,
        }
    }

    /// Decode the parameter as it appears on the wire. A missing parameter means no
    /// modifiers, as does a malformed `0`.
    #[must_use]
    pub fn from_param(param: Option<u32>) -> Self {
        Self::from_mask(param.unwrap_or(1).saturating_sub(1))
    }

    #[must_use]
    pub fn any(&self) -> bool { self.shift || self.alt || self.ctrl || self.cmd }

    /// Copy the flags onto a key. Flags already set on the key are kept.
    #[must_use]
    pub fn apply_to(self, key: KeyEvent) -> KeyEvent {
        let shift = key.shift || self.shift;
        let alt = key.alt || self.alt;
        let ctrl = key.ctrl || self.ctrl;
        let cmd = key.cmd || self.cmd;
        key.with_shift(shift)
            .with_alt(alt)
            .with_ctrl(ctrl)
            .with_cmd(cmd)
    }
}
