use crate::block::BlockInstance;
use crate::parser::directive::{CLOSE_TOKEN, OPEN_TOKEN};

/// Serialize block instances back to script text, the inverse of
/// transpilation. Option lines come out in canonical order and quoting,
/// indented under their directives; raw blocks come out verbatim.
pub fn write_stack(blocks: &[BlockInstance]) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            BlockInstance::Raw(raw) => {
                out.push_str(&raw.script);
                if !raw.script.ends_with('\n') {
                    out.push('\n');
                }
            }
            BlockInstance::Structured(block) => {
                out.push_str(OPEN_TOKEN);
                out.push_str(block.id());
                out.push('\n');

                let mut body = String::new();
                block.options.write_script(&mut body);
                for line in body.lines() {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }

                out.push_str(CLOSE_TOKEN);
                out.push('\n');
            }
        }
    }

    out
}
