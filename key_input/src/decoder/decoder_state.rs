// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rxvt

//! Resumable escape sequence decoder.
//!
//! [`KeyDecoder`] consumes one [`char`] at a time and yields at most one [`KeyEvent`]
//! per call. It never blocks and never looks ahead: everything it needs to resume on
//! the next character lives in its [`DecoderPhase`] and accumulators. Ambiguous
//! prefixes (a lone `ESC`, `ESC [`, a partial CSI) stay pending until either more
//! input arrives or the caller feeds [`DecoderInput::EndOfInput`], which the
//! [`crate::TimedDecoder`] does when the input stream has been quiet for a while.
//!
//! ```text
//!                ┌───────┐ non-ESC char ──▶ key
//!        ┌──────▶│ Start │
//!        │       └───┬───┘
//!        │           │ ESC
//!        │       ┌───▼────┐ ESC  ┌──────────────┐
//!        │       │ SawEsc ├─────▶│ SawDoubleEsc │
//!        │       └───┬────┘      └──────┬───────┘
//!        │           │ [ / O / ]         │ [ / O / ]
//!        │     ┌─────┴──────────┬────────┴──────┐
//!        │ ┌───▼─────┐     ┌────▼────┐     ┌────▼────┐
//!        │ │ CsiIntro│     │ Ss3Body │     │ OscBody │
//!        │ └─┬──┬──┬─┘     └─────────┘     └─────────┘
//!        │   │  │  └─ < ─▶ SgrMouseBody (absorbed)
//!        │   │  └──── M ─▶ X11MouseBody (absorbed)
//!        │   └─ digits ; ─▶ CsiBody ─ terminator ─▶ key
//!        └──────── every completed or abandoned sequence
//! ```
//!
//! Nothing typed is silently dropped. A sequence that matches no grammar is emitted
//! verbatim as an unclassified key. The only exceptions are mouse reports, which are
//! consumed whole, and OSC payloads other than clipboard reports.

use crate::{KeyEvent, LocaleInfo, key_names,
            decoder::{constants::{BACKSPACE, BEL, CARRIAGE_RETURN, CSI_BRACKET,
                                  CSI_U_TERMINATOR, CTRL_LETTER_MAX, DEL, ESC,
                                  FUNCTION_KEY_TERMINATOR, LINE_FEED,
                                  MODIFY_OTHER_KEYS_PARAM, OSC_BRACKET,
                                  PARAM_SEPARATOR, RXVT_CTRL_TERMINATOR,
                                  RXVT_SHIFT_TERMINATOR, SGR_MOUSE_MARKER,
                                  SGR_MOUSE_PRESS, SGR_MOUSE_RELEASE, SPACE, SS3_O,
                                  ST_BACKSLASH, TAB, X11_MOUSE_MARKER,
                                  X11_MOUSE_PAYLOAD_LEN},
                      key_table::lookup_key_code,
                      modifiers::KeyModifiers,
                      option_letters::option_letter_for,
                      osc::key_from_osc_payload}};
use smallvec::SmallVec;

/// Unicode private use area. Kitty reports functional keys (keypad, media, lock keys)
/// with codepoints in here; they are never text.
const PRIVATE_USE_AREA: std::ops::RangeInclusive<u32> = 0xE000..=0xF8FF;
const SUPPLEMENTARY_PRIVATE_USE_START: u32 = 0xF_0000;

/// One step of input for the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderInput {
    /// The next character from the input stream.
    Char(char),
    /// Synthetic marker meaning "no more input is coming for now". Forces a pending
    /// partial sequence to resolve.
    EndOfInput,
}

/// Where the decoder is inside the current logical keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderPhase {
    #[default]
    Start,
    SawEsc,
    SawDoubleEsc,
    /// After `ESC O`, holding an optional single modifier digit.
    Ss3Body { modifier_param: Option<u32> },
    /// After `ESC [` (or `ESC [ [`), nothing else yet.
    CsiIntro,
    /// Collecting digits and `;` separators.
    CsiBody,
    SgrMouseBody,
    X11MouseBody { remaining: usize },
    OscBody,
    OscSawEsc,
}

/// Normalized CSI code ready for table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CsiCode {
    code: String,
    modifier_param: Option<u32>,
    csi_u_codepoint: Option<u32>,
}

/// The escape sequence state machine. See the [module docs](self).
#[derive(Debug, Default)]
pub struct KeyDecoder {
    phase: DecoderPhase,
    /// Every raw char of the current keystroke.
    sequence: String,
    /// `ESC ESC` prefix seen, which adds alt to the decoded key.
    double_esc: bool,
    /// Introducer used for lookup: `[`, `[[`, or `O`.
    code: String,
    /// CSI parameters and terminator.
    csi_body: String,
    osc_payload: String,
    locale: LocaleInfo,
}

impl KeyDecoder {
    #[must_use]
    pub fn new(locale: LocaleInfo) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn phase(&self) -> DecoderPhase { self.phase }

    /// `true` while a partial sequence is held.
    #[must_use]
    pub fn is_pending(&self) -> bool { self.phase != DecoderPhase::Start }

    /// Drop any partial sequence.
    pub fn reset(&mut self) { *self = Self::new(self.locale); }

    /// Advance by one input step. Returns the key completed by this step, if any.
    pub fn feed(&mut self, input: DecoderInput) -> Option<KeyEvent> {
        use DecoderInput::{Char, EndOfInput};
        use DecoderPhase as P;

        if let Char(ch) = input
            && !matches!(self.phase, P::OscBody | P::OscSawEsc)
        {
            self.sequence.push(ch);
        }

        match (self.phase, input) {
            (P::Start, EndOfInput) => None,
            (P::Start, Char(ESC)) => self.enter(P::SawEsc),
            (P::Start, Char(ch)) => self.finish_char(ch, false),

            // ESC prefix.
            (P::SawEsc, Char(ESC)) => {
                self.double_esc = true;
                self.enter(P::SawDoubleEsc)
            }
            (P::SawEsc | P::SawDoubleEsc, Char(CSI_BRACKET)) => {
                self.code.push(CSI_BRACKET);
                self.enter(P::CsiIntro)
            }
            (P::SawEsc | P::SawDoubleEsc, Char(SS3_O)) => {
                self.code.push(SS3_O);
                self.enter(P::Ss3Body {
                    modifier_param: None,
                })
            }
            (P::SawEsc | P::SawDoubleEsc, Char(OSC_BRACKET)) => self.enter(P::OscBody),
            (P::SawEsc | P::SawDoubleEsc, Char(ch)) => self.finish_char(ch, true),
            (P::SawEsc | P::SawDoubleEsc, EndOfInput) => {
                let sequence = self.take_sequence();
                Some(KeyEvent::new(key_names::ESCAPE, sequence).with_alt(true))
            }

            // SS3: `ESC O [digit] letter`.
            (P::Ss3Body { modifier_param: None }, Char(ch)) if ch.is_ascii_digit() => {
                self.enter(P::Ss3Body {
                    modifier_param: ch.to_digit(10),
                })
            }
            (P::Ss3Body { modifier_param }, Char(ch)) => {
                let mut code = std::mem::take(&mut self.code);
                code.push(ch);
                self.finish_code(&CsiCode {
                    code,
                    modifier_param,
                    csi_u_codepoint: None,
                })
            }
            (P::Ss3Body { .. }, EndOfInput) => self.finish_unclassified(),

            // CSI: `ESC [ [[] params terminator`, or a mouse report.
            (P::CsiIntro, Char(CSI_BRACKET)) if self.code.len() == 1 => {
                self.code.push(CSI_BRACKET);
                None
            }
            (P::CsiIntro, Char(SGR_MOUSE_MARKER)) if self.code.len() == 1 => {
                self.enter(P::SgrMouseBody)
            }
            (P::CsiIntro, Char(X11_MOUSE_MARKER)) if self.code.len() == 1 => {
                self.enter(P::X11MouseBody {
                    remaining: X11_MOUSE_PAYLOAD_LEN,
                })
            }
            (P::CsiIntro | P::CsiBody, Char(ch))
                if ch.is_ascii_digit() || ch == PARAM_SEPARATOR =>
            {
                self.csi_body.push(ch);
                self.enter(P::CsiBody)
            }
            (P::CsiIntro | P::CsiBody, Char(ch)) => {
                self.csi_body.push(ch);
                self.finish_csi()
            }
            (P::CsiIntro | P::CsiBody, EndOfInput) => self.finish_unclassified(),

            // Mouse reports.
            (P::SgrMouseBody, Char(ch)) if ch.is_ascii_digit() || ch == PARAM_SEPARATOR => {
                None
            }
            (P::SgrMouseBody, Char(SGR_MOUSE_PRESS | SGR_MOUSE_RELEASE)) => self.absorb(),
            (P::SgrMouseBody, Char(_) | EndOfInput) => self.finish_unclassified(),
            (P::X11MouseBody { remaining }, Char(_)) => {
                if remaining <= 1 {
                    self.absorb()
                } else {
                    self.enter(P::X11MouseBody {
                        remaining: remaining - 1,
                    })
                }
            }
            (P::X11MouseBody { .. }, EndOfInput) => self.absorb(),

            // OSC: `ESC ] payload (BEL | ESC \)`.
            (P::OscBody, Char(BEL) | EndOfInput)
            | (P::OscSawEsc, Char(ST_BACKSLASH) | EndOfInput) => self.finish_osc(),
            (P::OscBody, Char(ESC)) => self.enter(P::OscSawEsc),
            // Only the last ESC of a run can start the string terminator.
            (P::OscSawEsc, Char(ESC)) => {
                self.osc_payload.push(ESC);
                None
            }
            (P::OscBody, Char(ch)) => {
                self.osc_payload.push(ch);
                None
            }
            (P::OscSawEsc, Char(ch)) => {
                self.osc_payload.push(ESC);
                self.osc_payload.push(ch);
                self.enter(P::OscBody)
            }
        }
    }

    fn enter(&mut self, phase: DecoderPhase) -> Option<KeyEvent> {
        self.phase = phase;
        None
    }

    /// Hand out the raw sequence and return to [`DecoderPhase::Start`].
    fn take_sequence(&mut self) -> String {
        let sequence = std::mem::take(&mut self.sequence);
        self.reset();
        sequence
    }

    fn absorb(&mut self) -> Option<KeyEvent> {
        self.reset();
        None
    }

    fn finish_unclassified(&mut self) -> Option<KeyEvent> {
        Some(KeyEvent::unclassified(self.take_sequence()))
    }

    fn finish_osc(&mut self) -> Option<KeyEvent> {
        let payload = std::mem::take(&mut self.osc_payload);
        self.reset();
        key_from_osc_payload(&payload)
    }

    /// Resolve a single char, optionally ESC prefixed.
    fn finish_char(&mut self, ch: char, escaped: bool) -> Option<KeyEvent> {
        let greek_locale = self.locale.greek_locale;
        let sequence = self.take_sequence();

        let option_letter = if greek_locale { None } else { option_letter_for(ch) };

        let key = match (ch, option_letter) {
            (CARRIAGE_RETURN, _) => {
                KeyEvent::new(key_names::RETURN, sequence).with_alt(escaped)
            }
            (LINE_FEED, _) if escaped => {
                KeyEvent::new(key_names::RETURN, sequence).with_alt(true)
            }
            (TAB, _) => KeyEvent::new(key_names::TAB, sequence).with_alt(escaped),
            (BACKSPACE | DEL, _) => {
                KeyEvent::new(key_names::BACKSPACE, sequence).with_alt(escaped)
            }
            (ESC, _) => KeyEvent::new(key_names::ESCAPE, sequence).with_alt(escaped),
            (SPACE, _) => KeyEvent {
                insertable: !escaped,
                ..KeyEvent::new(key_names::SPACE, sequence).with_alt(escaped)
            },
            _ if !escaped && ch <= CTRL_LETTER_MAX => {
                KeyEvent::new(ctrl_letter_name(ch), sequence).with_ctrl(true)
            }
            _ if ch.is_ascii_alphanumeric() => KeyEvent {
                insertable: !escaped,
                ..KeyEvent::new(ch.to_ascii_lowercase().to_string(), sequence)
                    .with_shift(ch.is_ascii_uppercase())
                    .with_alt(escaped)
            },
            (_, Some(letter)) => KeyEvent::new(letter.to_string(), sequence).with_alt(true),
            _ if escaped => KeyEvent::unclassified(sequence).with_alt(true),
            _ => KeyEvent::insertable_text("", sequence),
        };
        Some(key)
    }

    fn finish_csi(&mut self) -> Option<KeyEvent> {
        let prefix = std::mem::take(&mut self.code);
        match parse_csi_body(&prefix, &self.csi_body) {
            Some(csi_code) => self.finish_code(&csi_code),
            None => self.finish_unclassified(),
        }
    }

    /// Look up a normalized code and build the key.
    fn finish_code(&mut self, csi_code: &CsiCode) -> Option<KeyEvent> {
        let mut modifiers = KeyModifiers::from_param(csi_code.modifier_param);
        modifiers.alt |= self.double_esc;
        let sequence = self.take_sequence();

        if let Some(info) = lookup_key_code(&csi_code.code) {
            let key = modifiers.apply_to(
                KeyEvent::new(info.name, sequence)
                    .with_shift(info.shift)
                    .with_ctrl(info.ctrl),
            );
            let is_plain_space = info.name == key_names::SPACE
                && !key.ctrl
                && !key.alt
                && !key.cmd;
            if is_plain_space {
                return Some(KeyEvent {
                    insertable: true,
                    ..key.with_sequence(" ")
                });
            }
            return Some(key);
        }

        if let Some(ch) = csi_code.csi_u_codepoint.and_then(text_key_codepoint) {
            return Some(csi_u_text_key(ch, modifiers, sequence));
        }

        Some(modifiers.apply_to(KeyEvent::unclassified(sequence)))
    }
}

/// `\x01` is `ctrl+a`, `\x1a` is `ctrl+z`. `\x00` maps to the char before `a`.
fn ctrl_letter_name(ch: char) -> String {
    char::from_u32(u32::from(ch) + u32::from(b'a') - 1)
        .map(String::from)
        .unwrap_or_default()
}

/// Codepoint from a kitty CSI-u report that stands for a printable character.
fn text_key_codepoint(codepoint: u32) -> Option<char> {
    if PRIVATE_USE_AREA.contains(&codepoint) || codepoint >= SUPPLEMENTARY_PRIVATE_USE_START {
        return None;
    }
    char::from_u32(codepoint).filter(|ch| !ch.is_control())
}

/// Kitty reports the unshifted base key plus modifiers. Without ctrl, alt, or command
/// the key is text to insert.
fn csi_u_text_key(ch: char, modifiers: KeyModifiers, sequence: String) -> KeyEvent {
    let name = if ch.is_ascii_alphanumeric() {
        ch.to_ascii_lowercase().to_string()
    } else {
        ch.to_string()
    };
    let key = modifiers.apply_to(KeyEvent::new(name, sequence));
    if key.ctrl || key.alt || key.cmd {
        return key;
    }
    let text = if key.shift {
        ch.to_uppercase().collect::<String>()
    } else {
        ch.to_string()
    };
    KeyEvent {
        insertable: true,
        ..key.with_sequence(text)
    }
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|it| it.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Split a completed CSI body (parameters plus terminator) into a lookup code.
///
/// Two shapes are understood:
/// 1. `<n>[;<m>[;<k>]]` followed by `~ ^ $ u`. The code keeps `n` and the terminator,
///    `m` is the modifier param. `27;<m>;<k>~` (modifyOtherKeys) is rewritten to the
///    CSI-u code `<k>u`.
/// 2. `[<n>][;<m>]` followed by a letter. The code keeps the letter and the last number
///    is the modifier param.
fn parse_csi_body(prefix: &str, body: &str) -> Option<CsiCode> {
    let terminator = body.chars().last()?;
    let params = &body[..body.len() - terminator.len_utf8()];
    let parts: SmallVec<[&str; 3]> = params.split(PARAM_SEPARATOR).collect();

    let is_numeric_terminator = matches!(
        terminator,
        FUNCTION_KEY_TERMINATOR
            | RXVT_CTRL_TERMINATOR
            | RXVT_SHIFT_TERMINATOR
            | CSI_U_TERMINATOR
    );

    if is_numeric_terminator
        && (1..=3).contains(&parts.len())
        && parts.iter().all(|part| parse_number(part).is_some())
    {
        if parts[0] == MODIFY_OTHER_KEYS_PARAM
            && parts.len() == 3
            && terminator == FUNCTION_KEY_TERMINATOR
        {
            return Some(CsiCode {
                code: format!("{prefix}{}{CSI_U_TERMINATOR}", parts[2]),
                modifier_param: parse_number(parts[1]),
                csi_u_codepoint: parse_number(parts[2]),
            });
        }
        return Some(CsiCode {
            code: format!("{prefix}{}{terminator}", parts[0]),
            modifier_param: parts.get(1).and_then(|it| parse_number(it)),
            csi_u_codepoint: (terminator == CSI_U_TERMINATOR)
                .then(|| parse_number(parts[0]))
                .flatten(),
        });
    }

    if terminator.is_ascii_alphabetic() {
        let modifier_param = match parts.as_slice() {
            [""] => None,
            [number] => Some(parse_number(number)?),
            ["", modifier] => Some(parse_number(modifier)?),
            [number, modifier] => {
                parse_number(number)?;
                Some(parse_number(modifier)?)
            }
            _ => return None,
        };
        return Some(CsiCode {
            code: format!("{prefix}{terminator}"),
            modifier_param,
            csi_u_codepoint: None,
        });
    }

    None
}

#[cfg(test)]
mod test_fixtures {
    use super::*;

    /// Feed `input` one char at a time, then optionally the end-of-input marker.
    pub fn decode(decoder: &mut KeyDecoder, input: &str, end_of_input: bool) -> Vec<KeyEvent> {
        let mut keys: Vec<KeyEvent> = input
            .chars()
            .filter_map(|ch| decoder.feed(DecoderInput::Char(ch)))
            .collect();
        if end_of_input {
            keys.extend(decoder.feed(DecoderInput::EndOfInput));
        }
        keys
    }

    /// Decode with a fresh decoder in a non-Greek locale and flush.
    pub fn decode_flushed(input: &str) -> Vec<KeyEvent> {
        decode(&mut KeyDecoder::default(), input, true)
    }

    /// Decode a sequence expected to produce exactly one key.
    pub fn decode_one(input: &str) -> KeyEvent {
        let mut keys = decode_flushed(input);
        assert_eq!(keys.len(), 1, "expected one key for {input:?}, got {keys:?}");
        keys.remove(0)
    }
}



#[cfg(test)]
mod tests_csi_and_ss3 {
    use super::{test_fixtures::decode_one, *};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("\x1b[A", "up")]
    #[test_case("\x1b[D", "left")]
    #[test_case("\x1bOB", "down")]
    #[test_case("\x1b[H", "home")]
    #[test_case("\x1b[4~", "end")]
    #[test_case("\x1b[2~", "insert")]
    #[test_case("\x1b[3~", "delete")]
    #[test_case("\x1b[5~", "pageup")]
    #[test_case("\x1b[[6~", "pagedown")]
    #[test_case("\x1bOP", "f1")]
    #[test_case("\x1b[[E", "f5")]
    #[test_case("\x1b[21~", "f10")]
    #[test_case("\x1b[24~", "f12")]
    fn unmodified_keys(input: &str, name: &str) {
        let key = decode_one(input);
        assert_eq!(key.name, name);
        assert!(!key.has_modifiers());
        assert_eq!(key.sequence, input);
    }

    #[test]
    fn modifier_param_on_letter_form() {
        let key = decode_one("\x1b[1;5A");
        assert_eq!(key.name, "up");
        assert!(key.ctrl);
        assert!(!key.shift);
        assert!(!key.alt);
    }

    #[test]
    fn modifier_param_on_tilde_form() {
        let key = decode_one("\x1b[24;5~");
        assert_eq!(key.name, "f12");
        assert!(key.ctrl);
    }

    #[test]
    fn ss3_modifier_digit() {
        let key = decode_one("\x1bO2P");
        assert_eq!(key.name, "f1");
        assert!(key.shift);
    }

    #[test]
    fn command_bit() {
        let key = decode_one("\x1b[1;9C");
        assert_eq!(key.name, "right");
        assert!(key.cmd);
        assert!(!key.ctrl);
    }

    #[test]
    fn backtab_forces_shift() {
        let key = decode_one("\x1b[Z");
        assert_eq!(key.name, key_names::TAB);
        assert!(key.shift);
    }

    #[test]
    fn rxvt_variants_force_modifiers() {
        let key = decode_one("\x1b[5$");
        assert_eq!(key.name, "pageup");
        assert!(key.shift);

        let key = decode_one("\x1bOd");
        assert_eq!(key.name, "left");
        assert!(key.ctrl);
    }

    #[test]
    fn bracketed_paste_markers() {
        assert_eq!(decode_one("\x1b[200~").name, key_names::PASTE_START);
        assert_eq!(decode_one("\x1b[201~").name, key_names::PASTE_END);
    }

    #[test_case("\x1b[99z" ; "unknown letter code")]
    #[test_case("\x1b[16~" ; "unknown function code")]
    #[test_case("\x1b[1;2;3;4~" ; "too many params")]
    #[test_case("\x1b[I" ; "focus in")]
    fn unknown_sequences_are_unclassified(input: &str) {
        let key = decode_one(input);
        assert_eq!(key.name, "");
        assert!(!key.insertable);
        assert_eq!(key.sequence, input);
    }

    #[test_case("\x1b[" ; "bare csi")]
    #[test_case("\x1b[1;5" ; "csi without terminator")]
    #[test_case("\x1bO" ; "bare ss3")]
    fn partial_sequences_flush_verbatim(input: &str) {
        let key = decode_one(input);
        assert!(key.is_unclassified());
        assert_eq!(key.sequence, input);
    }
}


#[cfg(test)]
mod tests_mouse_and_osc {
    use super::{test_fixtures::{decode, decode_flushed}, *};
    use pretty_assertions::assert_eq;

    #[test]
    fn sgr_mouse_is_absorbed() {
        assert_eq!(decode_flushed("\x1b[<0;10;20M"), vec![]);
        assert_eq!(decode_flushed("\x1b[<0;10;20m"), vec![]);
    }

    #[test]
    fn partial_sgr_mouse_resolves_on_quiet_period() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode(&mut decoder, "\x1b[<35;1", false), vec![]);
        assert_eq!(decoder.phase(), DecoderPhase::SgrMouseBody);

        let keys = decode(&mut decoder, "", true);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].sequence, "\x1b[<35;1");
        assert!(!decoder.is_pending());

        let keys = decode(&mut decoder, "12", true);
        let names: Vec<_> = keys.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, vec!["1", "2"]);
    }

    #[test]
    fn x11_mouse_is_absorbed() {
        assert_eq!(decode_flushed("\x1b[M !!"), vec![]);
        let keys = decode_flushed("\x1b[M !!a");
        assert_eq!(keys, vec![KeyEvent::insertable_text("a", "a")]);
    }

    #[test]
    fn mouse_between_chars_keeps_order() {
        let keys = decode_flushed("a\x1b[<0;1;1Mb");
        let names: Vec<_> = keys.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn osc_52_with_bel() {
        let keys = decode_flushed("\x1b]52;c;aGVsbG8=\x07");
        assert_eq!(keys, vec![KeyEvent::paste("hello")]);
    }

    #[test]
    fn osc_52_with_split_string_terminator() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decode(&mut decoder, "\x1b]52;c;aGk=\x1b", false), vec![]);
        assert_eq!(decode(&mut decoder, "\\", false), vec![KeyEvent::paste("hi")]);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn osc_with_doubled_esc_before_terminator() {
        let mut decoder = KeyDecoder::default();
        let keys = decode(&mut decoder, "\x1b]0;x\x1b\x1b\\abc", false);
        let names: Vec<_> = keys.iter().map(|it| it.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!decoder.is_pending());
    }

    #[test]
    fn other_osc_is_discarded() {
        assert_eq!(decode_flushed("\x1b]0;title\x07x"), vec![KeyEvent::insertable_text("x", "x")]);
    }
}
