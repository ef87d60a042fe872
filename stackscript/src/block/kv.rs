use std::fmt;

/// An error from a block-specific option grammar.
/// `line` is 1-based and relative to the block's payload; the transpile
/// driver maps it back to an absolute source line when attaching context.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsError {
    pub message: String,
    pub line: usize,
}

impl OptionsError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        OptionsError {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OptionsError {}

/// A scanned option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Double-quoted string, escapes resolved.
    Str(String),
    /// Bare remainder of the line.
    Word(String),
    Int(i64),
    Bool(bool),
}

/// One `key = value` line of a block payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: Scalar,
    /// 1-based line within the payload.
    pub line: usize,
}

impl Entry {
    pub fn err(&self, message: impl Into<String>) -> OptionsError {
        OptionsError::new(message, self.line)
    }

    pub fn unknown_key(&self) -> OptionsError {
        self.err(format!("unknown option: {}", self.key))
    }

    /// The value as text. Accepts quoted strings and bare words.
    pub fn str_value(&self) -> Result<&str, OptionsError> {
        match &self.value {
            Scalar::Str(s) | Scalar::Word(s) => Ok(s),
            other => Err(self.err(format!(
                "option {} expects a string, got {:?}",
                self.key, other
            ))),
        }
    }

    pub fn int_value(&self) -> Result<i64, OptionsError> {
        match &self.value {
            Scalar::Int(n) => Ok(*n),
            other => Err(self.err(format!(
                "option {} expects an integer, got {:?}",
                self.key, other
            ))),
        }
    }

    pub fn bool_value(&self) -> Result<bool, OptionsError> {
        match &self.value {
            Scalar::Bool(b) => Ok(*b),
            other => Err(self.err(format!(
                "option {} expects true or false, got {:?}",
                self.key, other
            ))),
        }
    }
}

/// Scan a block payload into `key = value` entries.
/// Blank lines are skipped. Keys are `[A-Za-z0-9_]+` and must be followed
/// by `=`; everything after it is the value.
pub fn parse_entries(payload: &str) -> Result<Vec<Entry>, OptionsError> {
    let mut entries = Vec::new();

    for (index, line) in payload.lines().enumerate() {
        let number = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let key_end = line
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(line.len());
        if key_end == 0 {
            return Err(OptionsError::new(
                format!("expected an option name, got: {}", line),
                number,
            ));
        }
        let key = &line[..key_end];

        let rest = line[key_end..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            return Err(OptionsError::new(
                format!("expected '=' after option {}", key),
                number,
            ));
        };
        let rest = rest.trim();

        let value = parse_scalar(rest, number)?;
        entries.push(Entry {
            key: key.to_string(),
            value,
            line: number,
        });
    }

    Ok(entries)
}

fn parse_scalar(text: &str, line: usize) -> Result<Scalar, OptionsError> {
    if text.starts_with('"') {
        return Ok(Scalar::Str(unquote(text, line)?));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Scalar::Int(n));
    }
    match text {
        "true" => Ok(Scalar::Bool(true)),
        "false" => Ok(Scalar::Bool(false)),
        "" => Err(OptionsError::new("missing option value", line)),
        other => Ok(Scalar::Word(other.to_string())),
    }
}

/// Resolve a double-quoted string literal. The closing quote must be the
/// last character on the line.
fn unquote(text: &str, line: usize) -> Result<String, OptionsError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 1;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                if i + 1 != chars.len() {
                    return Err(OptionsError::new(
                        "unexpected text after closing quote",
                        line,
                    ));
                }
                return Ok(out);
            }
            '\\' => {
                i += 1;
                let escape = chars.get(i).copied().ok_or_else(|| {
                    OptionsError::new("unterminated string escape", line)
                })?;
                match escape {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    other => {
                        return Err(OptionsError::new(
                            format!("unknown string escape: \\{}", other),
                            line,
                        ));
                    }
                }
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Err(OptionsError::new("unterminated string literal", line))
}

/// Quote a string for option output, escaping as `unquote` expects.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
