use std::collections::HashMap;

use crate::block::StructuredBlock;
use crate::block::http_request::HttpRequestOptions;
use crate::block::key_check::KeyCheckOptions;
use crate::block::options::BlockOptions;
use crate::block::parse::ParseOptions;
use crate::block::script::ScriptOptions;

/// Constructs the default-initialized options for one block type.
pub type OptionsBuilder = fn() -> BlockOptions;

/// Registry of all block types known to the host, indexed by identifier.
/// Populated once at startup and only read afterwards; concurrent
/// transpile invocations share it by reference.
pub struct Registry {
    entries: HashMap<String, OptionsBuilder>,
}

impl Registry {
    pub fn empty() -> Self {
        Registry {
            entries: HashMap::new(),
        }
    }

    /// The standard block library.
    pub fn standard() -> Self {
        let mut registry = Registry::empty();
        registry.register("HttpRequest", || {
            BlockOptions::HttpRequest(HttpRequestOptions::default())
        });
        registry.register("Parse", || BlockOptions::Parse(ParseOptions::default()));
        registry.register("KeyCheck", || {
            BlockOptions::KeyCheck(KeyCheckOptions::default())
        });
        registry.register("Script", || BlockOptions::Script(ScriptOptions::default()));
        registry
    }

    /// Map an identifier to a block-type constructor. Registering an
    /// identifier twice replaces the earlier entry.
    pub fn register(&mut self, id: impl Into<String>, build: OptionsBuilder) {
        self.entries.insert(id.into(), build);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Construct a fresh structured block tagged with `id`, with its
    /// options default-initialized. Consumes no payload text; population
    /// happens separately through `BlockOptions::read_script`.
    pub fn create(&self, id: &str) -> Option<StructuredBlock> {
        self.entries
            .get(id)
            .map(|build| StructuredBlock::new(id, build()))
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
