use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::block::kv::OptionsError;

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// An open-directive line whose identifier fails the token grammar.
    MalformedDirective { line_text: String },
    /// A well-formed identifier with no registry entry.
    UnknownBlockType { id: String },
    /// A block type's own option grammar rejected the region payload.
    InvalidOptions { id: String, source: OptionsError },
    /// End of input inside a structured region.
    UnterminatedBlock { id: String },
}

/// A transpile error with source location information.
/// `line` is 1-based; `span` is the byte range of the offending line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: usize,
    pub span: Range<usize>,
    pub file_id: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, line: usize, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            kind,
            line,
            span,
            file_id,
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let mut notes = Vec::new();
        match &self.kind {
            ErrorKind::MalformedDirective { .. } => {
                notes.push(
                    "a block directive is BLOCK: followed by an identifier \
                     ([A-Za-z][A-Za-z0-9_]*) and nothing else"
                        .to_string(),
                );
            }
            ErrorKind::UnknownBlockType { .. } => {
                notes.push("the identifier has no entry in the block registry".to_string());
            }
            ErrorKind::UnterminatedBlock { .. } => {
                notes.push("expected ENDBLOCK before end of input".to_string());
            }
            ErrorKind::InvalidOptions { .. } => {}
        }

        Diagnostic::new(Severity::Error)
            .with_message(self.to_string())
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(notes)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::MalformedDirective { line_text } => {
                write!(f, "malformed block directive: {}", line_text)
            }
            ErrorKind::UnknownBlockType { id } => {
                write!(f, "unknown block type: {}", id)
            }
            ErrorKind::InvalidOptions { id, source } => {
                write!(f, "invalid options for {} block: {}", id, source)
            }
            ErrorKind::UnterminatedBlock { id } => {
                write!(f, "unterminated block: {}", id)
            }
        }
    }
}

impl std::error::Error for ParseError {}
