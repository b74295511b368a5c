// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words ligature

//! macOS Option+letter characters.
//!
//! Terminal.app and iTerm2 (without "Option as Meta") send the character the US
//! layout produces for Option+letter instead of an ESC prefix. These are mapped back to
//! `alt+<letter>` so that word navigation bindings like `alt+b` / `alt+f` keep working.
//! The mapping is applied on every platform since a mac user may be connected to a
//! remote Linux host.
//!
//! Greek keyboards produce some of the same codepoints (`π`, `Ω`, `µ`) as legitimate
//! text, so the table is bypassed under a Greek locale. See [`crate::LocaleInfo`].
//!
//! Option+e, Option+i, Option+n, and Option+u are dead keys on the US layout and send
//! nothing on their own, so they have no entry.

/// Map an Option+letter character back to its base letter.
#[must_use]
pub fn option_letter_for(ch: char) -> Option<char> {
    let letter = match ch {
        '\u{00E5}' => 'a', // å
        '\u{222B}' => 'b', // ∫
        '\u{00E7}' => 'c', // ç
        '\u{2202}' => 'd', // ∂
        '\u{0192}' => 'f', // ƒ
        '\u{00A9}' => 'g', // ©
        '\u{02D9}' => 'h', // ˙
        '\u{2206}' => 'j', // ∆
        '\u{02DA}' => 'k', // ˚
        '\u{00AC}' => 'l', // ¬
        '\u{00B5}' => 'm', // µ
        '\u{00F8}' => 'o', // ø
        '\u{03C0}' => 'p', // π
        '\u{0153}' => 'q', // œ
        '\u{00AE}' => 'r', // ®
        '\u{00DF}' => 's', // ß
        '\u{2020}' => 't', // †
        '\u{221A}' => 'v', // √
        '\u{2211}' => 'w', // ∑
        '\u{2248}' => 'x', // ≈
        '\u{00A5}' => 'y', // ¥
        '\u{03A9}' => 'z', // Ω
        _ => return None,
    };
    Some(letter)
}

#[cfg(test)]
mod tests_option_letters {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn word_navigation_letters() {
        assert_eq!(option_letter_for('\u{222B}'), Some('b'));
        assert_eq!(option_letter_for('\u{0192}'), Some('f'));
    }

    #[test]
    fn plain_text_is_not_mapped() {
        assert_eq!(option_letter_for('a'), None);
        assert_eq!(option_letter_for('\u{00E9}'), None);
    }
}
