use super::{Component, ComponentRef, ComponentRole, ReadContext};
use crate::error::ComponentError;
use crate::value::Value;
use serde_json::Value as JsonValue;

/// Falls back to a default value when the input is `null`.
///
/// The default itself is always accepted, even when the base component would
/// consider it empty (e.g. an optional input defaulting to no item).
#[derive(Debug)]
pub struct OptionalComponent {
    base: ComponentRef,
    default: Value,
}

impl OptionalComponent {
    pub fn new(base: ComponentRef, default: Value) -> Self {
        Self { base, default }
    }

    pub fn base(&self) -> &ComponentRef {
        &self.base
    }
}

impl Component for OptionalComponent {
    fn component_type(&self) -> &str {
        self.base.component_type()
    }

    fn role(&self) -> ComponentRole {
        self.base.role()
    }

    fn read(&self, raw: &JsonValue, cx: &ReadContext) -> Result<Value, ComponentError> {
        if raw.is_null() {
            return Ok(self.default.clone());
        }
        self.base.read(raw, cx)
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        self.base.write(value)
    }

    fn write_element(&self, value: &Value) -> Option<JsonValue> {
        self.base.write_element(value)
    }

    fn is_empty(&self, value: &Value) -> bool {
        *value != self.default && self.base.is_empty(value)
    }

    fn default_value(&self) -> Option<Value> {
        Some(self.default.clone())
    }
}

/// Lifts a single-value component over an ordered list.
///
/// A lone non-array input is read as a one-element list. Every element goes
/// through the base component's checked read, and the first failing element
/// fails the whole read. Writing keeps every element in place, empty ones
/// included.
#[derive(Debug)]
pub struct ArrayComponent {
    base: ComponentRef,
    name: String,
}

impl ArrayComponent {
    pub fn new(base: ComponentRef) -> Self {
        let name = format!("{}[]", base.component_type());
        Self { base, name }
    }

    pub fn base(&self) -> &ComponentRef {
        &self.base
    }
}

impl Component for ArrayComponent {
    fn component_type(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ComponentRole {
        self.base.role()
    }

    fn read(&self, raw: &JsonValue, cx: &ReadContext) -> Result<Value, ComponentError> {
        let elements = match raw {
            JsonValue::Array(elements) => elements.as_slice(),
            single => std::slice::from_ref(single),
        };

        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                self.base
                    .read_checked(element, cx)
                    .map_err(|e| ComponentError::Element {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        let items = value.as_list()?;
        items
            .iter()
            .map(|v| self.base.write_element(v))
            .collect::<Option<Vec<_>>>()
            .map(JsonValue::Array)
    }

    fn is_empty(&self, value: &Value) -> bool {
        value.as_list().is_none_or(|items| items.is_empty())
    }
}
