//! # Hinagata - Recipe Schema Engine
//!
//! **Hinagata** declares the shape of a family of recipe records once and then
//! produces valid instances of that shape in three ways: by parsing loose JSON
//! documents, by binding a list of positional arguments, and by programmatic
//! construction. Required/optional semantics, aliases and serialization behave
//! the same on every path.
//!
//! ## Building Blocks
//!
//! 1.  **Component**: a typed codec for one field (`int`, `input_item`, ...).
//!     Components compose into optional and array forms.
//! 2.  **Key**: a named field bound to a component, with aliases, an optional
//!     default, and builder metadata.
//! 3.  **Schema**: an ordered, validated set of keys. It parses documents and
//!     derives one constructor per supported argument count.
//! 4.  **Record**: one recipe conforming to a schema.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hinagata::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     // 1. Declare the keys, required ones first.
//!     let result = Key::new("result", output_item());
//!     let ingredient = Key::new("ingredient", input_item());
//!     let xp = Key::new("xp", float_component())
//!         .alt("experience")
//!         .optional(Value::Float(0.0));
//!
//!     // 2. Build the schema. Declaration errors surface here, not later.
//!     let schema = Arc::new(Schema::new([result.clone(), ingredient, xp.clone()])?);
//!
//!     // 3a. Parse a document...
//!     let document = json!({
//!         "type": "minecraft:smelting",
//!         "result": "minecraft:iron_ingot",
//!         "ingredient": "#forge:ores/iron",
//!         "experience": 0.7
//!     });
//!     let Some(document) = document.as_object().cloned() else {
//!         return Ok(());
//!     };
//!     let mut parsed = schema.parse_document("minecraft:smelting", None, document)?;
//!     println!("xp = {}", parsed.get(&xp)?);
//!
//!     // 3b. ...or build one from positional arguments.
//!     let mut built = schema.construct(
//!         "minecraft:smelting",
//!         vec![json!("minecraft:gold_ingot"), json!("minecraft:raw_gold")],
//!     )?;
//!     println!("result = {}", built.get(&result)?);
//!
//!     // 4. Serialize. Unset optional keys are left out.
//!     println!("{}", serde_json::to_string_pretty(&built.to_document())?);
//!     Ok(())
//! }
//! ```

pub mod component;
pub mod definition;
pub mod error;
pub mod key;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod schema;
pub mod settings;
pub mod value;
