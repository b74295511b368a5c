// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! ANSI/VT100 input character constants used by the decoder.
//!
//! The decoder consumes already UTF-8 decoded text one [`char`] at a time, so unlike
//! byte oriented parsers these constants are `char`s.
//!
//! # Sequence introducers
//!
//! - `CSI` = `ESC [`
//! - `SS3` = `ESC O`
//! - `OSC` = `ESC ]`, terminated by `BEL` or `ST` (`ESC \`)
//!
//! # Modifier parameter encoding
//!
//! The modifier parameter is `1 + bitmask`:
//! - bit 0 = Shift
//! - bit 1 = Alt
//! - bit 2 = Ctrl
//! - bit 3 = Command / Super

// ==================== ANSI Sequence Components ====================

/// ESC character (27 in decimal, 0x1B in hex)
pub const ESC: char = '\x1b';

/// CSI bracket: `[` (0x5B)
pub const CSI_BRACKET: char = '[';

/// SS3 'O': second char of SS3 sequences (0x4F)
pub const SS3_O: char = 'O';

/// OSC bracket: `]` (0x5D)
pub const OSC_BRACKET: char = ']';

/// Parameter separator: `;` (0x3B)
pub const PARAM_SEPARATOR: char = ';';

/// BEL (0x07), one of the two OSC terminators.
pub const BEL: char = '\x07';

/// Second char of the string terminator `ESC \`.
pub const ST_BACKSLASH: char = '\\';

// ==================== CSI Terminators ====================

/// Function key terminator: `~`
pub const FUNCTION_KEY_TERMINATOR: char = '~';

/// rxvt ctrl variant terminator: `^`
pub const RXVT_CTRL_TERMINATOR: char = '^';

/// rxvt shift variant terminator: `$`
pub const RXVT_SHIFT_TERMINATOR: char = '$';

/// kitty keyboard protocol terminator: `u`
pub const CSI_U_TERMINATOR: char = 'u';

// ==================== modifyOtherKeys ====================

/// `CSI 27 ; modifier ; key ~` first parameter.
pub const MODIFY_OTHER_KEYS_PARAM: &str = "27";

// ==================== Mouse ====================

/// SGR mouse marker right after CSI: `ESC [ <`
pub const SGR_MOUSE_MARKER: char = '<';

/// SGR mouse press terminator.
pub const SGR_MOUSE_PRESS: char = 'M';

/// SGR mouse release terminator.
pub const SGR_MOUSE_RELEASE: char = 'm';

/// X11 (X10 compatible) mouse marker right after CSI: `ESC [ M`
pub const X11_MOUSE_MARKER: char = 'M';

/// X11 mouse reports carry 3 raw payload chars (button, column, row).
///
/// Counted in decoded chars. Coordinates past 95 are sent as bytes above `0x7F` that
/// are not valid UTF-8 on their own, so the chunk decoder turns them into U+FFFD or
/// merges them with the next byte. Such reports may leave stray chars behind. Enable
/// SGR mouse mode (`?1006`) for wide terminals.
pub const X11_MOUSE_PAYLOAD_LEN: usize = 3;

// ==================== Focus ====================

/// Focus gained: `ESC [ I`
pub const FOCUS_IN_SEQUENCE: &str = "\x1b[I";

/// Focus lost: `ESC [ O`
pub const FOCUS_OUT_SEQUENCE: &str = "\x1b[O";

// ==================== Control Characters ====================

/// Carriage return, sent by the Enter key in raw mode.
pub const CARRIAGE_RETURN: char = '\r';

/// Line feed. `ctrl+j` on its own, `alt+return` after ESC.
pub const LINE_FEED: char = '\n';

/// Horizontal tab.
pub const TAB: char = '\t';

/// Backspace as sent by some terminals (also `ctrl+h`).
pub const BACKSPACE: char = '\x08';

/// DEL, the usual backspace key.
pub const DEL: char = '\x7f';

/// Space.
pub const SPACE: char = ' ';

/// Highest control code treated as `ctrl+letter` (`ctrl+z`).
pub const CTRL_LETTER_MAX: char = '\x1a';

// ==================== OSC 52 ====================

/// OSC 52 clipboard report prefix: `52;<selection>;<base64>`
pub const OSC_52_PREFIX: &str = "52;";
