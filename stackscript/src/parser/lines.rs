use std::ops::Range;

/// One source line: raw text without its terminator, 1-based number, and
/// the byte span of the text within the source.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub text: &'a str,
    pub number: usize,
    pub span: Range<usize>,
}

/// Split source text into lines on `\n` or `\r\n`. Terminators are not
/// part of any line's text. A trailing terminator yields a final empty
/// line.
pub fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;

    for (index, _) in source.match_indices('\n') {
        let mut end = index;
        if end > start && source.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        lines.push(Line {
            text: &source[start..end],
            number,
            span: start..end,
        });
        start = index + 1;
        number += 1;
    }

    lines.push(Line {
        text: &source[start..],
        number,
        span: start..source.len(),
    });

    lines
}
