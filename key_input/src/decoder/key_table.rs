// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixed lookup table from a normalized CSI/SS3 code to a named key.
//!
//! The decoder reduces every CSI/SS3 sequence to a short *code* before lookup. The
//! code is the introducer (`[` or `O`, and a second `[` for the linux console) plus
//! either the first numeric parameter and the terminator (`[24~`, `[13u`) or the final
//! letter (`[A`, `OP`). Modifier parameters are stripped and decoded separately.
//!
//! | Family                | Examples                                   |
//! |:----------------------|:-------------------------------------------|
//! | xterm / gnome letters | `[A` up, `[H` home, `[P` f1                |
//! | SS3 (application)     | `OA` up, `OP` f1                           |
//! | vt220 `~` keys        | `[2~` insert, `[5~` page up, `[15~` f5     |
//! | linux console         | `[[A` f1, `[[5~` page up                   |
//! | rxvt shift / ctrl     | `[a` shift+up, `[5$` shift+pageup, `Oa`, `[5^` |
//! | kitty CSI-u           | `[13u` return, `[57414u` keypad enter      |
//! | bracketed paste       | `[200~` paste-start, `[201~` paste-end     |

use crate::key_names;

/// Result of a table lookup. Some entries force a modifier that is implied by the
/// sequence itself (rxvt shift/ctrl variants, `CSI Z` backtab).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    pub name: &'static str,
    pub shift: bool,
    pub ctrl: bool,
}

const fn key(name: &'static str) -> KeyInfo {
    KeyInfo {
        name,
        shift: false,
        ctrl: false,
    }
}

const fn shift(name: &'static str) -> KeyInfo {
    KeyInfo {
        name,
        shift: true,
        ctrl: false,
    }
}

const fn ctrl(name: &'static str) -> KeyInfo {
    KeyInfo {
        name,
        shift: false,
        ctrl: true,
    }
}

/// Kitty keypad Enter codepoint.
pub const KITTY_KEYPAD_ENTER: u32 = 57414;

/// Look up a normalized code. Returns [`None`] for codes with no known meaning.
#[rustfmt::skip]
#[must_use]
pub fn lookup_key_code(code: &str) -> Option<KeyInfo> {
    let info = match code {
        // Bracketed paste markers.
        "[200~" => key(key_names::PASTE_START),
        "[201~" => key(key_names::PASTE_END),

        // Linux console.
        "[[A" => key("f1"),
        "[[B" => key("f2"),
        "[[C" => key("f3"),
        "[[D" => key("f4"),
        "[[E" => key("f5"),
        "[[5~" => key("pageup"),
        "[[6~" => key("pagedown"),

        // vt220 style `~` keys.
        "[1~" | "[7~" => key("home"),
        "[2~" => key("insert"),
        "[3~" => key("delete"),
        "[4~" | "[8~" => key("end"),
        "[5~" => key("pageup"),
        "[6~" => key("pagedown"),

        // Function keys. Note the gaps at 16 and 22.
        "[11~" => key("f1"),
        "[12~" => key("f2"),
        "[13~" => key("f3"),
        "[14~" => key("f4"),
        "[15~" => key("f5"),
        "[17~" => key("f6"),
        "[18~" => key("f7"),
        "[19~" => key("f8"),
        "[20~" => key("f9"),
        "[21~" => key("f10"),
        "[23~" => key("f11"),
        "[24~" => key("f12"),

        // xterm / gnome letters.
        "[A" | "OA" => key("up"),
        "[B" | "OB" => key("down"),
        "[C" | "OC" => key("right"),
        "[D" | "OD" => key("left"),
        "[E" | "OE" => key("clear"),
        "[F" | "OF" => key("end"),
        "[H" | "OH" => key("home"),
        "[P" | "OP" => key("f1"),
        "[Q" | "OQ" => key("f2"),
        "[R" | "OR" => key("f3"),
        "[S" | "OS" => key("f4"),

        // Kitty CSI-u.
        "[9u" => key(key_names::TAB),
        "[13u" => key(key_names::RETURN),
        "[27u" => key(key_names::ESCAPE),
        "[32u" => key(key_names::SPACE),
        "[127u" => key(key_names::BACKSPACE),
        "[57414u" => key(key_names::RETURN),

        // rxvt shift variants.
        "[a" => shift("up"),
        "[b" => shift("down"),
        "[c" => shift("right"),
        "[d" => shift("left"),
        "[e" => shift("clear"),
        "[2$" => shift("insert"),
        "[3$" => shift("delete"),
        "[5$" => shift("pageup"),
        "[6$" => shift("pagedown"),
        "[7$" => shift("home"),
        "[8$" => shift("end"),
        "[Z" => shift(key_names::TAB),

        // rxvt ctrl variants.
        "Oa" => ctrl("up"),
        "Ob" => ctrl("down"),
        "Oc" => ctrl("right"),
        "Od" => ctrl("left"),
        "Oe" => ctrl("clear"),
        "[2^" => ctrl("insert"),
        "[3^" => ctrl("delete"),
        "[5^" => ctrl("pageup"),
        "[6^" => ctrl("pagedown"),
        "[7^" => ctrl("home"),
        "[8^" => ctrl("end"),

        _ => return None,
    };
    Some(info)
}
