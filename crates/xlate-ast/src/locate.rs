//! Forward token search over source text.
//!
//! Front ends that do not track byte offsets themselves (and hand-built test
//! trees) use [`Locator`] to recover spans: each lookup finds the next
//! occurrence of a token after the previous match, skipping comments and
//! string literals that do not belong to the token itself.

use std::cell::Cell;
use xlate_common::Span;

pub struct Locator<'a> {
    text: &'a str,
    pos: Cell<usize>,
}

impl<'a> Locator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: Cell::new(0),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn position(&self) -> u32 {
        self.pos.get() as u32
    }

    pub fn reset_to(&self, offset: u32) {
        self.pos.set(offset as usize);
    }

    /// Find the next occurrence of `token` and advance past it.
    pub fn next(&self, token: &str) -> Option<Span> {
        let start = self.find_from(self.pos.get(), token)?;
        let end = start + token.len();
        self.pos.set(end);
        Some(Span::new(start as u32, end as u32))
    }

    /// Find the next occurrence of `token` without advancing.
    pub fn peek(&self, token: &str) -> Option<Span> {
        let start = self.find_from(self.pos.get(), token)?;
        Some(Span::new(start as u32, (start + token.len()) as u32))
    }

    fn find_from(&self, from: usize, token: &str) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let token_is_string = token.starts_with('"') || token.starts_with('\'');
        let mut i = from;

        while i < bytes.len() {
            let rest = &self.text[i..];
            if rest.starts_with(token) && self.on_word_boundary(i, token) {
                return Some(i);
            }
            if rest.starts_with("//") {
                i += rest.find('\n').unwrap_or(rest.len());
                continue;
            }
            if rest.starts_with("/*") {
                i += rest.find("*/").map(|e| e + 2).unwrap_or(rest.len());
                continue;
            }
            if !token_is_string && (bytes[i] == b'"' || bytes[i] == b'\'') {
                i += skip_quoted(rest);
                continue;
            }
            i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
        None
    }

    fn on_word_boundary(&self, start: usize, token: &str) -> bool {
        let bytes = self.text.as_bytes();
        let end = start + token.len();
        let starts_word = token.bytes().next().is_some_and(is_ident_byte);
        let ends_word = token.bytes().last().is_some_and(is_ident_byte);

        let clean_before = !starts_word || start == 0 || !is_ident_byte(bytes[start - 1]);
        let clean_after = !ends_word || end >= bytes.len() || !is_ident_byte(bytes[end]);
        clean_before && clean_after
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Length of the quoted literal at the start of `text`, including both quotes.
fn skip_quoted(text: &str) -> usize {
    let bytes = text.as_bytes();
    let quote = bytes[0];
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}
