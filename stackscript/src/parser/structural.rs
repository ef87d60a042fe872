use std::ops::Range;

use crate::block::{BlockInstance, RawBlock};
use crate::parser::directive::{self, LineKind};
use crate::parser::error::{ErrorKind, ParseError};
use crate::parser::lines::{self, Line};
use crate::registry::Registry;

/// Scan source text into an ordered list of block instances.
pub fn scan_blocks(
    source: &str,
    file_id: usize,
    registry: &Registry,
) -> Result<Vec<BlockInstance>, ParseError> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut state = ScanState {
        lines: lines::split_lines(source),
        pos: 0,
        file_id,
        registry,
    };
    state.run()
}

/// The scanner. `pos` is the index of the next unconsumed line. Each
/// region owns a local accumulator; no state is shared between
/// invocations except the registry reference.
struct ScanState<'a, 'r> {
    lines: Vec<Line<'a>>,
    pos: usize,
    file_id: usize,
    registry: &'r Registry,
}

impl ScanState<'_, '_> {
    fn run(&mut self) -> Result<Vec<BlockInstance>, ParseError> {
        let mut blocks = Vec::new();

        while self.pos < self.lines.len() {
            let trimmed = self.lines[self.pos].text.trim();
            match directive::classify(trimmed) {
                LineKind::Open(id_text) => {
                    blocks.push(self.read_structured_region(id_text)?);
                }
                // A stray close directive outside a region is ordinary
                // raw content, as is everything else.
                LineKind::Close | LineKind::Content => {
                    if let Some(raw) = self.read_raw_segment() {
                        blocks.push(raw);
                    }
                }
            }
        }

        Ok(blocks)
    }

    /// Consume an open directive, its payload, and the close directive.
    /// `id_text` is the text after `BLOCK:` on the current line, not yet
    /// validated.
    fn read_structured_region(&mut self, id_text: &str) -> Result<BlockInstance, ParseError> {
        let open = self.lines[self.pos].clone();
        self.pos += 1;

        if !directive::is_valid_block_id(id_text) {
            return Err(ParseError::new(
                ErrorKind::MalformedDirective {
                    line_text: open.text.trim().to_string(),
                },
                open.number,
                open.span.clone(),
                self.file_id,
            ));
        }

        let Some(mut block) = self.registry.create(id_text) else {
            return Err(ParseError::new(
                ErrorKind::UnknownBlockType {
                    id: id_text.to_string(),
                },
                open.number,
                open.span.clone(),
                self.file_id,
            ));
        };

        // Accumulate trimmed payload lines until the close directive.
        // Directives do not nest: an open-directive-shaped line in here is
        // ordinary payload.
        let mut payload = String::new();
        let mut payload_lines: Vec<(usize, Range<usize>)> = Vec::new();
        let mut close_end = None;

        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            self.pos += 1;

            let trimmed = line.text.trim();
            if directive::classify(trimmed) == LineKind::Close {
                close_end = Some(line.span.end);
                break;
            }
            payload.push_str(trimmed);
            payload.push('\n');
            payload_lines.push((line.number, line.span.clone()));
        }

        let Some(close_end) = close_end else {
            return Err(ParseError::new(
                ErrorKind::UnterminatedBlock {
                    id: id_text.to_string(),
                },
                open.number,
                open.span.clone(),
                self.file_id,
            ));
        };

        if let Err(source) = block.options.read_script(&payload) {
            // Map the payload-relative line back to the source.
            let (number, span) = payload_lines
                .get(source.line.saturating_sub(1))
                .cloned()
                .unwrap_or((open.number, open.span.clone()));
            return Err(ParseError::new(
                ErrorKind::InvalidOptions {
                    id: id_text.to_string(),
                    source,
                },
                number,
                span,
                self.file_id,
            ));
        }

        block.span = open.span.start..close_end;
        Ok(BlockInstance::Structured(block))
    }

    /// Consume a contiguous span of unmarked lines. An open-directive
    /// line terminates the segment but is NOT consumed; the caller
    /// re-processes it as the start of a structured region.
    /// Returns `None` for segments with no visible content.
    fn read_raw_segment(&mut self) -> Option<BlockInstance> {
        let first = &self.lines[self.pos];
        self.pos += 1;

        let start = first.span.start;
        let mut end = first.span.end;
        let mut script = String::from(first.text);
        script.push('\n');

        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            if matches!(directive::classify(line.text.trim()), LineKind::Open(_)) {
                break;
            }
            script.push_str(line.text);
            script.push('\n');
            end = line.span.end;
            self.pos += 1;
        }

        if script.chars().any(|c| !c.is_whitespace()) {
            let mut raw = RawBlock::new(script);
            raw.span = start..end;
            Some(BlockInstance::Raw(raw))
        } else {
            None
        }
    }
}
