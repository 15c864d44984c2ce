//! Common test utilities for building schemas and documents.
use hinagata::prelude::*;
use std::sync::Arc;

/// Keys of the smelting fixture schema.
///
/// `result` and `ingredient` are required; `xp` (alias `experience`,
/// default 0.0) and `time` (alias `cookingtime`, default 200) are optional.
#[allow(dead_code)]
pub struct SmeltingKeys {
    pub result: Key,
    pub ingredient: Key,
    pub xp: Key,
    pub time: Key,
}

#[allow(dead_code)]
pub fn smelting_keys() -> SmeltingKeys {
    SmeltingKeys {
        result: Key::new("result", output_item()),
        ingredient: Key::new("ingredient", input_item()),
        xp: Key::new("xp", float_component())
            .alt("experience")
            .optional(Value::Float(0.0)),
        time: Key::new("time", int_component())
            .alt("cookingtime")
            .optional(Value::Int(200)),
    }
}

#[allow(dead_code)]
pub fn smelting_schema_from(keys: &SmeltingKeys) -> Schema {
    Schema::new([
        keys.result.clone(),
        keys.ingredient.clone(),
        keys.xp.clone(),
        keys.time.clone(),
    ])
    .expect("smelting schema is valid")
}

/// The smelting fixture schema, shared and ready to use.
#[allow(dead_code)]
pub fn smelting_schema() -> (Arc<Schema>, SmeltingKeys) {
    let keys = smelting_keys();
    let schema = Arc::new(smelting_schema_from(&keys));
    (schema, keys)
}

/// Converts a `json!` object into a document.
#[allow(dead_code)]
pub fn doc(value: serde_json::Value) -> Document {
    value
        .as_object()
        .cloned()
        .expect("document must be a JSON object")
}

/// A valid smelting document using the `experience` alias.
#[allow(dead_code)]
pub fn smelting_document() -> Document {
    doc(serde_json::json!({
        "type": "minecraft:smelting",
        "result": "minecraft:iron_ingot",
        "ingredient": "#forge:ores/iron",
        "experience": 0.7,
        "group": "iron"
    }))
}

/// Schema definitions in the on-disk JSON format.
#[allow(dead_code)]
pub const SCHEMAS_JSON: &str = r#"{
    "minecraft:smelting": {
        "keys": [
            { "name": "result", "component": "output_item" },
            { "name": "ingredient", "component": "input_item" },
            { "name": "xp", "component": "float", "optional": 0.0, "alt": ["experience"] },
            { "name": "time", "component": "int", "optional": 200, "alt": ["cookingtime"], "exclude": true }
        ]
    },
    "minecraft:shapeless": {
        "keys": [
            { "name": "result", "component": "output_item" },
            { "name": "ingredients", "component": "input_item[]" }
        ],
        "constructors": [
            { "keys": ["ingredients", "result"] }
        ]
    },
    "create:broken": {
        "keys": [
            { "name": "fluid", "component": "fluid_stack" }
        ]
    }
}"#;
