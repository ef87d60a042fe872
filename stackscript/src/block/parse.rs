use std::fmt;
use std::str::FromStr;

use crate::block::kv::{self, OptionsError};

/// How the Parse block extracts data from its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Substring between a left and right delimiter.
    #[default]
    Between,
    /// First capture group of a regular expression.
    Regex,
    /// Dotted path into a JSON document.
    Json,
}

impl FromStr for ParseMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "Between" => Ok(ParseMode::Between),
            "Regex" => Ok(ParseMode::Regex),
            "Json" => Ok(ParseMode::Json),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseMode::Between => "Between",
            ParseMode::Regex => "Regex",
            ParseMode::Json => "Json",
        };
        f.write_str(name)
    }
}

/// Options for the Parse block: extract a value from a previous block's
/// output into a named variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Name of the variable to read from.
    pub input: String,
    pub mode: ParseMode,
    pub left: String,
    pub right: String,
    pub pattern: String,
    pub json_path: String,
    /// Name of the variable the result is stored under.
    pub output: String,
    /// Capture every match instead of the first one.
    pub recursive: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            input: "source".to_string(),
            mode: ParseMode::default(),
            left: String::new(),
            right: String::new(),
            pattern: String::new(),
            json_path: String::new(),
            output: "parsed".to_string(),
            recursive: false,
        }
    }
}

impl ParseOptions {
    pub fn read_script(&mut self, payload: &str) -> Result<(), OptionsError> {
        for entry in kv::parse_entries(payload)? {
            match entry.key.as_str() {
                "input" => self.input = entry.str_value()?.to_string(),
                "mode" => {
                    let text = entry.str_value()?;
                    self.mode = text
                        .parse()
                        .map_err(|_| entry.err(format!("unknown parse mode: {}", text)))?;
                }
                "left" => self.left = entry.str_value()?.to_string(),
                "right" => self.right = entry.str_value()?.to_string(),
                "pattern" => self.pattern = entry.str_value()?.to_string(),
                "json_path" => self.json_path = entry.str_value()?.to_string(),
                "output" => self.output = entry.str_value()?.to_string(),
                "recursive" => self.recursive = entry.bool_value()?,
                _ => return Err(entry.unknown_key()),
            }
        }
        Ok(())
    }

    pub fn write_script(&self, out: &mut String) {
        out.push_str(&format!("input = {}\n", kv::quote(&self.input)));
        out.push_str(&format!("mode = {}\n", self.mode));
        // Delimiter fields are written regardless of mode; rewriting a
        // stack must not lose state.
        out.push_str(&format!("left = {}\n", kv::quote(&self.left)));
        out.push_str(&format!("right = {}\n", kv::quote(&self.right)));
        out.push_str(&format!("pattern = {}\n", kv::quote(&self.pattern)));
        out.push_str(&format!("json_path = {}\n", kv::quote(&self.json_path)));
        out.push_str(&format!("output = {}\n", kv::quote(&self.output)));
        out.push_str(&format!("recursive = {}\n", self.recursive));
    }
}
