//! Serializable schema definitions.
//!
//! Content packs describe recipe types as data: each type lists its keys by
//! component name, plus any custom constructors. The definitions are turned
//! into [`Schema`]s through a [`ComponentRegistry`].
//!
//! ```json
//! {
//!   "smelting": {
//!     "keys": [
//!       { "name": "result", "component": "output_item" },
//!       { "name": "ingredient", "component": "input_item" },
//!       { "name": "xp", "component": "float", "optional": 0.0, "alt": ["experience"] }
//!     ]
//!   }
//! }
//! ```

use crate::component::{ComponentRegistry, ReadContext};
use crate::error::SchemaDefinitionError;
use crate::key::Key;
use crate::record::RecordFactory;
use crate::schema::{DefaultFactory, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;

/// Definitions by recipe type id.
pub type SchemaDefinitions = BTreeMap<String, SchemaDefinition>;

/// Loads schema definitions from a JSON file.
pub fn definitions_from_file(path: &str) -> Result<SchemaDefinitions, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let definitions = serde_json::from_str(&content)?;
    Ok(definitions)
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SchemaDefinition {
    pub keys: Vec<KeyDefinition>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDefinition>,
    /// Name of the record factory; `basic` when absent.
    #[serde(default)]
    pub factory: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KeyDefinition {
    pub name: String,
    /// Registered component name, with `[]` for arrays.
    pub component: String,
    #[serde(default)]
    pub alt: Vec<String>,
    /// Constant default, read through the key's component.
    #[serde(default)]
    pub optional: Option<JsonValue>,
    /// Optional with a `null` default.
    #[serde(default)]
    pub default_optional: bool,
    #[serde(default)]
    pub exclude: bool,
    /// Builder names; an empty list disables builders.
    #[serde(default)]
    pub functions: Option<Vec<String>>,
    #[serde(default)]
    pub allow_empty: bool,
    #[serde(default)]
    pub always_write: bool,
}

/// A custom constructor, listing its keys by name in argument order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConstructorDefinition {
    pub keys: Vec<String>,
}

/// Conversion of a definition into a live schema.
pub trait IntoSchema {
    fn into_schema(self, components: &ComponentRegistry) -> Result<Schema, SchemaDefinitionError>;
}

impl KeyDefinition {
    pub fn into_key(self, components: &ComponentRegistry) -> Result<Key, SchemaDefinitionError> {
        let component = components.get(&self.component).ok_or_else(|| {
            SchemaDefinitionError::UnknownComponent {
                key: self.name.clone(),
                component: self.component.clone(),
            }
        })?;

        let mut key = Key::new(&self.name, component.clone()).alts(self.alt.iter().map(String::as_str));

        if let Some(raw) = &self.optional {
            // Defaults may legitimately be empty, e.g. "no secondary output".
            let value = component
                .read(raw, &ReadContext::allowing_empty(true))
                .map_err(|e| SchemaDefinitionError::InvalidDefault {
                    key: self.name.clone(),
                    reason: e.to_string(),
                })?;
            key = key.optional(value);
        } else if self.default_optional {
            key = key.default_optional();
        }

        if self.exclude {
            key = key.exclude();
        }
        match &self.functions {
            Some(names) if names.is_empty() => key = key.no_functions(),
            Some(names) => key = key.function_names(names.iter().map(String::as_str)),
            None => {}
        }
        if self.allow_empty {
            key = key.allow_empty();
        }
        if self.always_write {
            key = key.always_write();
        }
        Ok(key)
    }
}

impl IntoSchema for SchemaDefinition {
    fn into_schema(self, components: &ComponentRegistry) -> Result<Schema, SchemaDefinitionError> {
        let keys = self
            .keys
            .into_iter()
            .map(|k| k.into_key(components))
            .collect::<Result<Vec<_>, _>>()?;

        let factory = RecordFactory::new(self.factory.as_deref().unwrap_or(RecordFactory::BASIC));
        let mut schema = Schema::with_factory(factory, keys.iter().cloned())?;

        for constructor in &self.constructors {
            let bound = constructor
                .keys
                .iter()
                .map(|name| {
                    keys.iter()
                        .find(|k| k.name() == name)
                        .ok_or_else(|| SchemaDefinitionError::UnknownConstructorKey(name.clone()))
                })
                .collect::<Result<Vec<&Key>, _>>()?;
            schema.constructor(&bound, DefaultFactory)?;
        }
        Ok(schema)
    }
}
