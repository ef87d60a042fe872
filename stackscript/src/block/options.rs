use crate::block::http_request::HttpRequestOptions;
use crate::block::key_check::KeyCheckOptions;
use crate::block::kv::OptionsError;
use crate::block::parse::ParseOptions;
use crate::block::script::ScriptOptions;

/// The typed option set of a structured block, one variant per block type.
/// Every variant knows how to populate itself from the textual payload
/// between its directives and how to write itself back out.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOptions {
    HttpRequest(HttpRequestOptions),
    Parse(ParseOptions),
    KeyCheck(KeyCheckOptions),
    Script(ScriptOptions),
}

impl BlockOptions {
    /// Populate the options in place from a region payload.
    /// The payload is every line strictly between the directives, trimmed,
    /// each followed by `\n`, in source order.
    pub fn read_script(&mut self, payload: &str) -> Result<(), OptionsError> {
        match self {
            BlockOptions::HttpRequest(options) => options.read_script(payload),
            BlockOptions::Parse(options) => options.read_script(payload),
            BlockOptions::KeyCheck(options) => options.read_script(payload),
            BlockOptions::Script(options) => options.read_script(payload),
        }
    }

    /// Write the option lines back out (the inverse of `read_script`,
    /// modulo canonical ordering and quoting).
    pub fn write_script(&self, out: &mut String) {
        match self {
            BlockOptions::HttpRequest(options) => options.write_script(out),
            BlockOptions::Parse(options) => options.write_script(out),
            BlockOptions::KeyCheck(options) => options.write_script(out),
            BlockOptions::Script(options) => options.write_script(out),
        }
    }
}
