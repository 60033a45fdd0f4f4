//! Position-tracking replay over the original source text.
//!
//! The cursor is the only way writers consume source text: tokens are matched
//! (and verified) against what the tree says should be there, everything in
//! between is copied verbatim or skipped. Every consumed span is recorded in
//! a [`Coverage`] ledger unless it was read during a replay.

use crate::error::{Result, TranslateError};
use crate::output::OutputStack;
use xlate_common::Span;

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(u32);

impl Mark {
    pub fn offset(self) -> u32 {
        self.0
    }
}

pub struct Cursor<'s> {
    text: &'s str,
    position: u32,
    tab_width: usize,
    /// Columns added to (or removed from) the indentation of copied lines.
    reindent: isize,
    replay_depth: u32,
    coverage: Coverage,
}

impl<'s> Cursor<'s> {
    pub fn new(text: &'s str, tab_width: usize) -> Self {
        Self {
            text,
            position: 0,
            tab_width: tab_width.max(1),
            reindent: 0,
            replay_depth: 0,
            coverage: Coverage::default(),
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    /// Unconsumed text from the current position.
    pub fn rest(&self) -> &'s str {
        self.text.get(self.position as usize..).unwrap_or("")
    }

    pub fn at_end(&self) -> bool {
        self.position as usize >= self.text.len()
    }

    pub fn looking_at(&self, token: &str) -> bool {
        self.rest().starts_with(token) && self.ends_cleanly(token)
    }

    /// Verify `expected` is next, advance past it, and write `replacement`
    /// (or the token itself).
    pub fn match_and_write(&mut self, out: &mut OutputStack, expected: &str, replacement: Option<&str>) -> Result<()> {
        self.expect(expected)?;
        let start = self.position;
        self.advance_to(start + expected.len() as u32);
        out.write(replacement.unwrap_or(expected));
        Ok(())
    }

    /// Verify `expected` is next and advance past it without writing.
    pub fn match_token(&mut self, expected: &str) -> Result<()> {
        self.expect(expected)?;
        self.advance_to(self.position + expected.len() as u32);
        Ok(())
    }

    /// Copy source text up to (not including) `end` and advance.
    pub fn copy_through(&mut self, out: &mut OutputStack, end: u32) -> Result<()> {
        self.check_forward(end)?;
        let Some(text) = self.text.get(self.position as usize..end as usize) else {
            return Err(TranslateError::Internal(format!(
                "cursor range {}..{} splits a character",
                self.position, end
            )));
        };
        if self.reindent == 0 {
            out.write(text);
        } else {
            self.write_reindented(out, text);
        }
        self.advance_to(end);
        Ok(())
    }

    /// Advance to `end` without copying.
    pub fn skip_through(&mut self, end: u32) -> Result<()> {
        self.check_forward(end)?;
        self.advance_to(end);
        Ok(())
    }

    /// Copy whitespace and comments up to the next token.
    pub fn copy_space_and_comments(&mut self, out: &mut OutputStack) -> Result<()> {
        let end = self.trivia_end(self.position);
        self.copy_through(out, end)
    }

    /// Skip whitespace and comments up to the next token.
    pub fn skip_space_and_comments(&mut self) -> Result<()> {
        let end = self.trivia_end(self.position);
        self.skip_through(end)
    }

    pub fn save(&self) -> Mark {
        Mark(self.position)
    }

    /// Return to a saved position. Output already written stays written.
    pub fn restore(&mut self, mark: Mark) {
        self.position = mark.0.min(self.text.len() as u32);
    }

    /// Jump to an arbitrary offset, forward or backward.
    pub fn seek(&mut self, offset: u32) {
        self.restore(Mark(offset));
    }

    /// Set the indentation shift applied to copied lines; returns the previous shift.
    pub fn set_reindent(&mut self, reindent: isize) -> isize {
        std::mem::replace(&mut self.reindent, reindent)
    }

    pub fn begin_replay(&mut self) {
        self.replay_depth += 1;
    }

    pub fn end_replay(&mut self) {
        self.replay_depth = self.replay_depth.saturating_sub(1);
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn into_coverage(self) -> Coverage {
        self.coverage
    }

    /// Logical column of `offset`, expanding tabs.
    pub fn column_at(&self, offset: u32) -> usize {
        logical_width(self.line_prefix(offset), self.tab_width)
    }

    /// Whether only whitespace precedes `offset` on its line.
    pub fn is_first_on_line(&self, offset: u32) -> bool {
        self.line_prefix(offset).chars().all(|c| c == ' ' || c == '\t')
    }

    /// Text between the start of `offset`'s line and `offset`.
    fn line_prefix(&self, offset: u32) -> &'s str {
        let mut end = (offset as usize).min(self.text.len());
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        let before = &self.text[..end];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        &before[line_start..]
    }

    /// A `/** ... */` comment separated from `offset` only by whitespace.
    pub fn leading_doc_comment(&self, offset: u32) -> Option<Span> {
        let before = self.text.get(..offset as usize)?.trim_end();
        if !before.ends_with("*/") {
            return None;
        }
        let start = before.rfind("/*")?;
        before[start..]
            .starts_with("/**")
            .then(|| Span::new(start as u32, before.len() as u32))
    }

    /// Start of the comments on the lines directly above `offset`, stopping
    /// at code or at a comment that trails code on its own line.
    pub fn leading_comments_start(&self, offset: u32) -> Option<u32> {
        let mut start = None;
        let mut pos = offset as usize;
        loop {
            let before = self.text.get(..pos)?.trim_end();
            if before.ends_with("*/") {
                let Some(open) = before.rfind("/*") else { break };
                if !self.is_first_on_line(open as u32) {
                    break;
                }
                pos = open;
            } else {
                let line_start = before.rfind('\n').map_or(0, |i| i + 1);
                let line = &before[line_start..];
                let body = line.trim_start();
                if !body.starts_with("//") {
                    break;
                }
                pos = line_start + line.len() - body.len();
            }
            start = Some(pos as u32);
        }
        start
    }

    /// A comment after `offset` that ends before the line does, spanning
    /// from `offset` so the spacing before it is kept.
    pub fn trailing_comment(&self, offset: u32) -> Option<Span> {
        let rest = self.text.get(offset as usize..)?;
        let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
        let body = line.trim_start_matches([' ', '\t']);
        let lead = line.len() - body.len();
        let len = if body.starts_with("//") {
            body.trim_end().len()
        } else if body.starts_with("/*") {
            let close = body.find("*/")? + 2;
            body[close..].trim().is_empty().then_some(close)?
        } else {
            return None;
        };
        Some(Span::new(offset, offset + (lead + len) as u32))
    }

    /// End of the whitespace/comment run starting at `from`.
    pub fn trivia_end(&self, from: u32) -> u32 {
        let bytes = self.text.as_bytes();
        let mut i = from as usize;
        while i < bytes.len() {
            let Some(rest) = self.text.get(i..) else { break };
            if bytes[i].is_ascii_whitespace() {
                i += 1;
            } else if rest.starts_with("//") {
                i += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                i += rest.find("*/").map(|e| e + 2).unwrap_or(rest.len());
            } else {
                break;
            }
        }
        i as u32
    }

    fn expect(&self, expected: &str) -> Result<()> {
        if self.looking_at(expected) {
            return Ok(());
        }
        let found: String = self
            .rest()
            .chars()
            .take_while(|c| !c.is_whitespace())
            .take(expected.chars().count().max(16))
            .collect();
        Err(TranslateError::token_mismatch(expected, &found, self.position))
    }

    fn ends_cleanly(&self, token: &str) -> bool {
        let ends_word = token.bytes().last().is_some_and(is_ident_byte);
        let next = self.text.as_bytes().get(self.position as usize + token.len());
        !ends_word || !next.is_some_and(|b| is_ident_byte(*b))
    }

    fn check_forward(&self, end: u32) -> Result<()> {
        if end < self.position || end as usize > self.text.len() {
            return Err(TranslateError::Internal(format!(
                "cursor cannot consume from {} to {}",
                self.position, end
            )));
        }
        Ok(())
    }

    fn advance_to(&mut self, end: u32) {
        if self.replay_depth == 0 {
            self.coverage.record(Span::new(self.position, end));
        }
        self.position = end;
    }

    fn write_reindented(&self, out: &mut OutputStack, text: &str) {
        let lines: Vec<&str> = text.split('\n').collect();
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                out.write(line);
                continue;
            }
            out.write_char('\n');
            let body = line.trim_start_matches([' ', '\t']);
            if body.is_empty() && i != last {
                continue;
            }
            let indent = &line[..line.len() - body.len()];
            let width = logical_width(indent, self.tab_width) as isize + self.reindent;
            out.write_spaces(width.max(0) as usize);
            out.write(body);
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn logical_width(text: &str, tab_width: usize) -> usize {
    text.chars().fold(0, |column, c| match c {
        '\t' => (column / tab_width + 1) * tab_width,
        _ => column + 1,
    })
}

/// Ledger of consumed source spans, in consumption order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    spans: Vec<Span>,
}

impl Coverage {
    pub fn record(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.end == span.start => last.end = span.end,
            _ => self.spans.push(span),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Parts of `range` no recorded span touches.
    pub fn gaps(&self, range: Span) -> Vec<Span> {
        let mut sorted = self.spans.clone();
        sorted.sort_by_key(|s| (s.start, s.end));

        let mut gaps = Vec::new();
        let mut covered_to = range.start;
        for span in sorted {
            if span.start > covered_to && covered_to < range.end {
                gaps.push(Span::new(covered_to, span.start.min(range.end)));
            }
            covered_to = covered_to.max(span.end);
        }
        if covered_to < range.end {
            gaps.push(Span::new(covered_to, range.end));
        }
        gaps
    }

    /// Byte ranges consumed more than once.
    pub fn overlaps(&self) -> Vec<Span> {
        let mut sorted = self.spans.clone();
        sorted.sort_by_key(|s| (s.start, s.end));

        let mut overlaps = Vec::new();
        let mut covered_to = 0;
        for span in sorted {
            if span.start < covered_to {
                overlaps.push(Span::new(span.start, span.end.min(covered_to)));
            }
            covered_to = covered_to.max(span.end);
        }
        overlaps
    }

    /// Whether the ledger covers `range` exactly once with nothing outside it.
    pub fn is_exact(&self, range: Span) -> bool {
        self.gaps(range).is_empty()
            && self.overlaps().is_empty()
            && self.spans.iter().all(|s| s.start >= range.start && s.end <= range.end)
    }
}
