use crate::block::kv::OptionsError;

/// Options for the Script block: an inline scriptlet kept exactly as
/// written. Unlike the other block types there is no option grammar: the
/// whole payload is the code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptOptions {
    pub code: String,
}

impl ScriptOptions {
    pub fn read_script(&mut self, payload: &str) -> Result<(), OptionsError> {
        self.code = payload.to_string();
        Ok(())
    }

    pub fn write_script(&self, out: &mut String) {
        out.push_str(&self.code);
    }
}
