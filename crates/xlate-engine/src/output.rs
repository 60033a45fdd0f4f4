//! Stack of text sinks.
//!
//! Writes go to the top buffer. A writer that needs to inspect or reorder
//! what its children emit pushes a buffer, lets them write, and pops the
//! result as a `String`. Pushes and pops nest; a unit must finish with only
//! the root buffer left.

use crate::error::{Result, TranslateError};

#[derive(Debug)]
pub struct OutputStack {
    buffers: Vec<String>,
}

impl Default for OutputStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputStack {
    pub fn new() -> Self {
        Self {
            buffers: vec![String::new()],
        }
    }

    /// Number of open nested buffers above the root.
    pub fn depth(&self) -> usize {
        self.buffers.len() - 1
    }

    pub fn push(&mut self) {
        self.buffers.push(String::new());
    }

    /// Close the top buffer and return its contents.
    pub fn pop(&mut self) -> Result<String> {
        if self.depth() == 0 {
            return Err(TranslateError::BufferDiscipline(
                "pop with no nested buffer open".to_string(),
            ));
        }
        self.buffers
            .pop()
            .ok_or_else(|| TranslateError::BufferDiscipline("buffer stack is empty".to_string()))
    }

    pub fn write(&mut self, text: &str) {
        if let Some(top) = self.buffers.last_mut() {
            top.push_str(text);
        }
    }

    pub fn write_char(&mut self, c: char) {
        if let Some(top) = self.buffers.last_mut() {
            top.push(c);
        }
    }

    pub fn write_spaces(&mut self, count: usize) {
        if let Some(top) = self.buffers.last_mut() {
            top.extend(std::iter::repeat(' ').take(count));
        }
    }

    /// Contents of the top buffer so far.
    pub fn top(&self) -> &str {
        self.buffers.last().map(String::as_str).unwrap_or("")
    }

    /// Column the next write lands in, looking through enclosing buffers
    /// when the top one has no newline yet.
    pub fn column(&self) -> usize {
        let mut column = 0;
        for buffer in self.buffers.iter().rev() {
            match buffer.rfind('\n') {
                Some(newline) => return column + buffer[newline + 1..].chars().count(),
                None => column += buffer.chars().count(),
            }
        }
        column
    }

    /// Whether only whitespace has been written since the last newline.
    pub fn at_line_start(&self) -> bool {
        for buffer in self.buffers.iter().rev() {
            let tail = match buffer.rfind('\n') {
                Some(newline) => &buffer[newline + 1..],
                None => buffer.as_str(),
            };
            if !tail.chars().all(|c| c == ' ' || c == '\t') {
                return false;
            }
            if buffer.contains('\n') {
                return true;
            }
        }
        true
    }

    /// Consume the stack, failing if a nested buffer is still open.
    pub fn finish(mut self) -> Result<String> {
        if self.depth() != 0 {
            return Err(TranslateError::BufferDiscipline(format!(
                "{} nested buffer(s) still open at end of unit",
                self.depth()
            )));
        }
        Ok(self.buffers.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_captures_children() {
        let mut out = OutputStack::new();
        out.write("head ");
        out.push();
        out.write("body");
        assert_eq!(out.depth(), 1);
        let body = out.pop().unwrap();
        assert_eq!(body, "body");
        out.write("preamble ");
        out.write(&body);
        assert_eq!(out.finish().unwrap(), "head preamble body");
    }

    #[test]
    fn test_pop_of_root_is_an_error() {
        let mut out = OutputStack::new();
        assert!(matches!(out.pop(), Err(TranslateError::BufferDiscipline(_))));
    }

    #[test]
    fn test_finish_with_open_buffer_is_an_error() {
        let mut out = OutputStack::new();
        out.push();
        assert!(matches!(out.finish(), Err(TranslateError::BufferDiscipline(_))));
    }

    #[test]
    fn test_column_spans_buffers() {
        let mut out = OutputStack::new();
        out.write("line\n  ab");
        out.push();
        out.write("cd");
        assert_eq!(out.column(), 6);
        assert!(!out.at_line_start());
        out.write("\n    ");
        assert_eq!(out.column(), 4);
        assert!(out.at_line_start());
    }
}
