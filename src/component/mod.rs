use crate::error::ComponentError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

pub mod builtin;
pub mod registry;
mod wrappers;

pub use builtin::*;
pub use registry::ComponentRegistry;
pub use wrappers::{ArrayComponent, OptionalComponent};

/// What part a component's value plays in a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    Input,
    Output,
    Other,
}

/// Per-read options supplied by the key being read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadContext {
    pub allow_empty: bool,
}

impl ReadContext {
    pub fn allowing_empty(allow_empty: bool) -> Self {
        Self { allow_empty }
    }
}

/// Typed codec for one field's value.
///
/// `read` converts a loose JSON value into a [`Value`] and `write` converts it
/// back. Writing returns `None` to omit the value from the output document.
/// For every non-empty value `v` that `read` accepts, `read(write(v))` yields a
/// value equal to `v`.
pub trait Component: Send + Sync + fmt::Debug {
    /// Name used by the [`ComponentRegistry`] and in key descriptions.
    fn component_type(&self) -> &str;

    fn role(&self) -> ComponentRole {
        ComponentRole::Other
    }

    fn read(&self, raw: &JsonValue, cx: &ReadContext) -> Result<Value, ComponentError>;

    fn write(&self, value: &Value) -> Option<JsonValue>;

    /// Writes `value` as an element of a list. Unlike [`write`](Component::write)
    /// this must not omit empty values, since dropping one would shift every
    /// element after it.
    fn write_element(&self, value: &Value) -> Option<JsonValue> {
        self.write(value)
    }

    /// Whether `value` counts as "empty" (e.g. an air item or a blank string).
    fn is_empty(&self, _value: &Value) -> bool {
        false
    }

    /// The fallback used when no input is present, if this component has one.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Reads `raw` and rejects empty results unless the context allows them.
    fn read_checked(&self, raw: &JsonValue, cx: &ReadContext) -> Result<Value, ComponentError> {
        let value = self.read(raw, cx)?;
        if !cx.allow_empty && self.is_empty(&value) {
            return Err(ComponentError::Empty(raw.clone()));
        }
        Ok(value)
    }
}

/// Shared handle to a component. Components are stateless, so one instance is
/// reused by every key and schema that needs it.
pub type ComponentRef = Arc<dyn Component>;

/// Composition helpers available on every [`ComponentRef`].
pub trait ComponentExt {
    /// Wraps the component so that a missing or `null` input yields `default`.
    fn optional(&self, default: Value) -> ComponentRef;

    /// Lifts the component over an ordered list of values.
    fn as_array(&self) -> ComponentRef;
}

impl ComponentExt for ComponentRef {
    fn optional(&self, default: Value) -> ComponentRef {
        Arc::new(OptionalComponent::new(self.clone(), default))
    }

    fn as_array(&self) -> ComponentRef {
        Arc::new(ArrayComponent::new(self.clone()))
    }
}

/// Builds a type mismatch error for `found`.
pub(crate) fn mismatch(expected: &'static str, found: &JsonValue) -> ComponentError {
    ComponentError::TypeMismatch {
        expected,
        found: found.clone(),
    }
}
