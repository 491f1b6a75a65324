use std::fmt;

use thiserror::Error;
use xml::common::Position;
use xml::reader::ErrorKind;

#[derive(Debug, Error)]
pub enum Error {
    /// The byte source could not be obtained.
    #[error("source: {0}")]
    Source(#[from] std::io::Error),
    /// The source was read but could not be turned into XML input.
    #[error("encoding: {0}")]
    Encoding(String),
    #[error("malformed xml: {0}")]
    MalformedXml(#[from] ParseError),
}

/// 1-based position of a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u64,
    pub column: u64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Syntax violation reported by the parsing engine. Always terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", suffix(.location))]
pub struct ParseError {
    pub message: String,
    pub location: Option<Location>,
}

fn suffix(location: &Option<Location>) -> String {
    location.map(|l| format!(" at {l}")).unwrap_or_default()
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, line: u64, column: u64) -> Self {
        self.location = Some(Location { line, column });
        self
    }
}

impl From<xml::reader::Error> for ParseError {
    fn from(value: xml::reader::Error) -> Self {
        // xml-rs positions are 0-based
        let pos = value.position();
        Self::new(value.msg()).at(pos.row + 1, pos.column + 1)
    }
}

impl From<xml::reader::Error> for Error {
    fn from(value: xml::reader::Error) -> Self {
        match value.kind() {
            ErrorKind::Io(e) => Self::Source(std::io::Error::new(e.kind(), e.to_string())),
            ErrorKind::Utf8(e) => Self::Encoding(e.to_string()),
            _ => Self::MalformedXml(value.into()),
        }
    }
}
