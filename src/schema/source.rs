use crate::key::{Key, KeyId};
use crate::value::Document;
use ahash::AHashMap;
use serde_json::Value as JsonValue;

/// Something a constructor can pull raw key values from.
pub trait ValueSource {
    /// The raw value for `key`, or `None` if the source has none.
    fn value(&self, key: &Key) -> Option<&JsonValue>;
}

/// Looks keys up in a document under any of their names.
pub struct DocumentSource<'d>(pub &'d Document);

impl ValueSource for DocumentSource<'_> {
    fn value(&self, key: &Key) -> Option<&JsonValue> {
        key.lookup(self.0).map(|(_, raw)| raw)
    }
}

/// Raw values keyed by key identity.
#[derive(Debug, Clone, Default)]
pub struct ComponentValueMap {
    values: AHashMap<KeyId, JsonValue>,
}

impl ComponentValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs positional arguments with the keys of a constructor, in order.
    /// Surplus arguments or keys are left unpaired.
    pub fn from_positional(keys: &[&Key], args: Vec<JsonValue>) -> Self {
        let values = keys.iter().map(|k| k.id()).zip(args).collect();
        Self { values }
    }

    pub fn with(mut self, key: &Key, value: JsonValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &Key, value: JsonValue) -> Option<JsonValue> {
        self.values.insert(key.id(), value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueSource for ComponentValueMap {
    fn value(&self, key: &Key) -> Option<&JsonValue> {
        self.values.get(&key.id())
    }
}
