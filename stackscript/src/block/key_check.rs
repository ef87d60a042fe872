use crate::block::kv::{self, OptionsError};

/// Options for the KeyCheck block: classify a pipeline result by searching
/// for marker strings. Keys are checked in the order they were written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyCheckOptions {
    pub success_keys: Vec<String>,
    pub failure_keys: Vec<String>,
    pub ban_keys: Vec<String>,
}

impl KeyCheckOptions {
    pub fn read_script(&mut self, payload: &str) -> Result<(), OptionsError> {
        for entry in kv::parse_entries(payload)? {
            match entry.key.as_str() {
                "success" => self.success_keys.push(entry.str_value()?.to_string()),
                "failure" => self.failure_keys.push(entry.str_value()?.to_string()),
                "ban" => self.ban_keys.push(entry.str_value()?.to_string()),
                _ => return Err(entry.unknown_key()),
            }
        }
        Ok(())
    }

    pub fn write_script(&self, out: &mut String) {
        for key in &self.success_keys {
            out.push_str(&format!("success = {}\n", kv::quote(key)));
        }
        for key in &self.failure_keys {
            out.push_str(&format!("failure = {}\n", kv::quote(key)));
        }
        for key in &self.ban_keys {
            out.push_str(&format!("ban = {}\n", kv::quote(key)));
        }
    }
}
