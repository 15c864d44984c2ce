//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the hinagata crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use hinagata::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let definitions = definitions_from_file("path/to/schemas.json")?;
//! let (registry, errors) =
//!     SchemaRegistry::from_definitions(definitions, &ComponentRegistry::new(), Settings::default());
//! assert!(errors.is_empty());
//!
//! let recipes: Vec<Document> =
//!     serde_json::from_str(&std::fs::read_to_string("path/to/recipes.json")?)?;
//! let report = registry.load(recipes.into_iter().map(|doc| (None, doc)));
//! println!("{} loaded, {} failed", report.records.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```

// Components
pub use crate::component::{
    Component, ComponentExt, ComponentRef, ComponentRegistry, ComponentRole, ReadContext,
    bool_component, float_component, id_component, input_item, int_component, output_item,
    string_component,
};

// Keys, schemas and records
pub use crate::key::{DefaultValue, Key, KeyId};
pub use crate::record::{Record, RecordFactory, RecordState};
pub use crate::schema::{
    BindContext, ComponentValueMap, Constructor, ConstructorFactory, ConstructorTable,
    DefaultFactory, DocumentSource, Schema, SupplementedFactory, ValueSource,
};

// Values
pub use crate::value::{Document, Ingredient, InputItem, OutputItem, ResourceId, Value};

// Loading
pub use crate::definition::{IntoSchema, SchemaDefinition, definitions_from_file};
pub use crate::registry::{LoadReport, SchemaRegistry};
pub use crate::settings::Settings;

// Error types
pub use crate::error::{
    ComponentError, ComponentReadError, ConstructorArityError, MissingRequiredKeyError,
    RecordError, SchemaDefinitionError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
