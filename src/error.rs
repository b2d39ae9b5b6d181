//! Error taxonomy (spec.md §7).
//!
//! Shape ported from the teacher's `ParseError` in
//! `H1ghBre4k3r-y-lang/src/parser/mod.rs`: a `Display` impl that draws a
//! colored caret under the offending byte, plus a `log::error!` at every
//! construction site so an embedding application's logger sees the same
//! diagnostic the caller gets back as a `Result`.

use std::fmt;

use colored::Colorize;

/// The four error categories from spec.md §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// Malformed specifier, unmatched structural bracket.
    Parse,
    /// Argument type incompatible with the specifier.
    ArgumentShape,
    /// Too few/many arguments, or a positional index out of range.
    Arity,
    /// `%N` outside an iteration scope, or mixed positional/sequential use.
    Scope,
}

#[derive(Debug, Clone)]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub message: String,
    format: String,
    offset: usize,
}

impl FormatError {
    pub fn new(kind: FormatErrorKind, format: &str, offset: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!(target: "tsfmt", "{kind:?} at byte {offset} in \"{format}\": {message}");

        FormatError {
            kind,
            message,
            format: format.to_owned(),
            offset: offset.min(format.len()),
        }
    }

    pub fn parse(format: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::new(FormatErrorKind::Parse, format, offset, message)
    }

    pub fn argument_shape(format: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::new(FormatErrorKind::ArgumentShape, format, offset, message)
    }

    pub fn arity(format: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::new(FormatErrorKind::Arity, format, offset, message)
    }

    pub fn scope(format: &str, offset: usize, message: impl Into<String>) -> Self {
        Self::new(FormatErrorKind::Scope, format, offset, message)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let caret_padding = " ".repeat(self.offset);
        let caret = "^".to_string().red();

        writeln!(f, "{}", self.format)?;
        writeln!(f, "{caret_padding}{caret}")?;
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_lines_up_with_offset() {
        let err = FormatError::parse("%[ %d %}", 6, "mismatched closer");
        let rendered = format!("{err}");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "%[ %d %}");
        // strip ANSI color codes for the length check.
        let bare: String = lines[1].chars().filter(|c| *c == ' ' || *c == '^').collect();
        assert_eq!(bare.find('^'), Some(6));
    }
}
