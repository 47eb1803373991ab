//! Text sink for the unparser.
//!
//! Tracks the stack of currently open quotes and an indentation depth.
//! Opening a quote whose character already appears N times on the stack
//! writes it 2^N times, and a quote character written as content is doubled
//! once for each enclosing quote that it would otherwise terminate. A string
//! literal nested inside another string literal therefore comes out as
//! `''it''''s''`, and the output stays parseable at every nesting level.
//!
//! Indentation is applied only at the start of a line.

use crate::sql_generator::error::SqlGenError;

/// Out-of-band instructions interleaved with text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Indent,
    Outdent,
    OpenStringLiteral,
    CloseStringLiteral,
    /// Open an identifier delimited by the given opening character
    /// (`"`, `` ` `` or `[`)
    OpenIdentifier(char),
    CloseIdentifier(char),
}

#[derive(Debug, Clone)]
pub struct StackWriter {
    out: String,
    indentation: String,
    depth: usize,
    need_indent: bool,
    quote_stack: Vec<char>,
}

fn closing(open: char) -> char {
    match open {
        '[' => ']',
        other => other,
    }
}

impl StackWriter {
    pub fn new(indentation: &str) -> Self {
        Self {
            out: String::new(),
            indentation: indentation.to_string(),
            depth: 0,
            need_indent: false,
            quote_stack: Vec::new(),
        }
    }

    pub fn directive(&mut self, directive: Directive) -> Result<(), SqlGenError> {
        match directive {
            Directive::Indent => self.depth += 1,
            Directive::Outdent => {
                self.depth = self.depth.checked_sub(1).ok_or_else(|| {
                    SqlGenError::MismatchedQuotes("outdent below zero".to_string())
                })?;
            }
            Directive::OpenStringLiteral => self.push_quote('\''),
            Directive::CloseStringLiteral => self.pop_quote('\'')?,
            Directive::OpenIdentifier(open) => self.push_quote(open),
            Directive::CloseIdentifier(open) => self.pop_quote(open)?,
        }
        Ok(())
    }

    pub fn write_char(&mut self, c: char) {
        match c {
            '\n' => {
                self.out.push(c);
                self.need_indent = true;
            }
            '\r' => self.out.push(c),
            _ => {
                self.indent_if_needed();
                for _ in 0..self.repeat_for(c) {
                    self.out.push(c);
                }
            }
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
        }
    }

    /// Write text with no quote handling, e.g. an already-escaped literal.
    pub fn write_verbatim(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.out.push(c);
                self.need_indent = true;
            } else {
                self.indent_if_needed();
                self.out.push(c);
            }
        }
    }

    pub fn finish(self) -> Result<String, SqlGenError> {
        if !self.quote_stack.is_empty() {
            return Err(SqlGenError::MismatchedQuotes(format!(
                "unclosed quotes at end of output: {:?}",
                self.quote_stack
            )));
        }
        Ok(self.out)
    }

    fn indent_if_needed(&mut self) {
        if self.need_indent {
            for _ in 0..self.depth {
                self.out.push_str(&self.indentation);
            }
            self.need_indent = false;
        }
    }

    /// 2^N, where N counts the open quotes that `c` would terminate.
    fn repeat_for(&self, c: char) -> usize {
        let n = match c {
            '\'' | '"' | '`' | ']' => self
                .quote_stack
                .iter()
                .filter(|open| closing(**open) == c)
                .count(),
            _ => 0,
        };
        1usize << n.min(16)
    }

    fn write_quote(&mut self, q: char, count_of: char) {
        self.indent_if_needed();
        let n = self.quote_stack.iter().filter(|open| **open == count_of).count();
        for _ in 0..(1usize << n.min(16)) {
            self.out.push(q);
        }
    }

    fn push_quote(&mut self, open: char) {
        self.write_quote(open, open);
        self.quote_stack.push(open);
    }

    fn pop_quote(&mut self, open: char) -> Result<(), SqlGenError> {
        match self.quote_stack.pop() {
            Some(top) if top == open => {
                self.write_quote(closing(open), open);
                Ok(())
            }
            other => Err(SqlGenError::MismatchedQuotes(format!(
                "closing {:?} but top of stack is {:?}",
                open, other
            ))),
        }
    }
}
