use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors raised while declaring a schema. These are fatal to the registration
/// of the offending schema only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDefinitionError {
    #[error("Duplicate key '{0}'")]
    DuplicateKey(String),

    #[error("Required key '{key}' must be declared ahead of optional key '{optional}'")]
    RequiredAfterOptional { key: String, optional: String },

    #[error("Constructor with {0} arguments already exists")]
    DuplicateConstructor(usize),

    #[error("Key '{0}' is excluded from auto-constructors but has no default value")]
    ExcludedWithoutDefault(String),

    #[error("Schema is sealed, cannot {0}")]
    Sealed(&'static str),

    #[error("Constructor references key '{0}', which is not part of this schema")]
    UnknownConstructorKey(String),

    #[error("Constructor binds key '{0}' more than once")]
    RepeatedConstructorKey(String),

    #[error("Key '{key}' uses an unregistered component type '{component}'")]
    UnknownComponent { key: String, component: String },

    #[error("Invalid default value for key '{key}': {reason}")]
    InvalidDefault { key: String, reason: String },

    #[error("Recipe type '{0}' is already registered")]
    DuplicateType(String),
}

/// Errors a component reports while converting a loose value into a typed one.
/// They carry no key information; the schema pipeline wraps them into a
/// [`ComponentReadError`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("expected {expected}, but found '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: JsonValue,
    },

    #[error("'{0}' is empty")]
    Empty(JsonValue),

    #[error("{0}")]
    Invalid(String),

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ComponentError>,
    },
}

/// A single key's raw input could not be converted to its typed value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid value for key '{key}': {reason} (input: {raw})")]
pub struct ComponentReadError {
    pub key: String,
    pub raw: JsonValue,
    pub reason: ComponentError,
}

/// A required key had no value under any of its names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required key '{key}'")]
pub struct MissingRequiredKeyError {
    pub key: String,
}

/// No constructor exists for the supplied number of positional arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No constructor accepts {received} arguments (expected between {min} and {max})")]
pub struct ConstructorArityError {
    pub received: usize,
    pub min: usize,
    pub max: usize,
}

/// Errors scoped to a single record. A loader can skip the offending record
/// and keep going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error(transparent)]
    ComponentRead(#[from] ComponentReadError),

    #[error(transparent)]
    MissingRequiredKey(#[from] MissingRequiredKeyError),

    #[error(transparent)]
    ConstructorArity(#[from] ConstructorArityError),

    #[error("Recipe type '{0}' is not registered")]
    UnknownType(String),

    #[error("Document has no 'type' discriminator")]
    MissingType,

    #[error("Key '{0}' does not belong to this record's schema")]
    UnknownKey(String),

    #[error("Required key '{0}' was read before being set")]
    UnsetRequired(String),

    #[error("Record is finalized and can no longer be modified")]
    Finalized,
}
