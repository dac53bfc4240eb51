//! Numbered line reading for statement, query and command sources.

use std::io::{self, BufRead};

use crate::error::{KnowledgeError, Result};

/// One line of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine {
    Text(String),
    /// A line that is not valid UTF-8, lossily decoded for reporting.
    Undecodable(String),
}

impl SourceLine {
    /// The line text, or `InvalidEncoding` for an undecodable line.
    pub fn into_text(self) -> Result<String> {
        match self {
            SourceLine::Text(text) => Ok(text),
            SourceLine::Undecodable(raw) => Err(KnowledgeError::invalid_encoding(raw)),
        }
    }
}

/// Iterator over the lines of a reader, numbered from 1.
///
/// A line that is not valid UTF-8 is yielded as [`SourceLine::Undecodable`]
/// and reading continues with the next line. Only a failing reader yields
/// an `Err`.
#[derive(Debug)]
pub struct SourceLines<R> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> SourceLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = (usize, io::Result<SourceLine>);

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let read = self.reader.read_until(b'\n', &mut self.buffer);
        if matches!(read, Ok(0)) {
            return None;
        }
        self.line_number += 1;

        let line = read.map(|_| {
            if self.buffer.ends_with(b"\n") {
                self.buffer.pop();
                if self.buffer.ends_with(b"\r") {
                    self.buffer.pop();
                }
            }
            match String::from_utf8(std::mem::take(&mut self.buffer)) {
                Ok(text) => SourceLine::Text(text),
                Err(err) => {
                    SourceLine::Undecodable(String::from_utf8_lossy(err.as_bytes()).into_owned())
                }
            }
        });
        Some((self.line_number, line))
    }
}
