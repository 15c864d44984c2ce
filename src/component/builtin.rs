use super::{Component, ComponentRef, ComponentRole, ReadContext, mismatch};
use crate::error::ComponentError;
use crate::value::{Ingredient, InputItem, OutputItem, ResourceId, Value};
use ahash::AHashMap;
use serde_json::{Map, Value as JsonValue, json};
use std::sync::Arc;

/// Defines the built-in component structs, a constructor function for each,
/// and the function that registers all of them by name.
macro_rules! define_builtin_components {
    ( $( ($struct_name:ident, $ctor:ident, $name:expr, $role:expr) ),* $(,)? ) => {
        $(
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $struct_name;

            impl $struct_name {
                pub const NAME: &'static str = $name;
                pub const ROLE: ComponentRole = $role;
            }

            pub fn $ctor() -> ComponentRef {
                Arc::new($struct_name)
            }
        )*

        pub(super) fn register_builtin_components(registry: &mut AHashMap<String, ComponentRef>) {
            $( registry.insert($name.to_string(), $ctor()); )*
        }
    };
}

define_builtin_components! {
    (BoolComponent, bool_component, "bool", ComponentRole::Other),
    (IntComponent, int_component, "int", ComponentRole::Other),
    (FloatComponent, float_component, "float", ComponentRole::Other),
    (StringComponent, string_component, "string", ComponentRole::Other),
    (IdComponent, id_component, "id", ComponentRole::Other),
    (InputItemComponent, input_item, "input_item", ComponentRole::Input),
    (OutputItemComponent, output_item, "output_item", ComponentRole::Output),
}

impl Component for BoolComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        raw.as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch("a boolean", raw))
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        value.as_bool().map(JsonValue::Bool)
    }
}

impl Component for IntComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        if let Some(i) = raw.as_i64() {
            return Ok(Value::Int(i));
        }
        // Whole floats such as `2.0` are accepted as integers. `i64::MAX as f64`
        // rounds up to 2^63, which is already out of range.
        match raw.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(Value::Int(f as i64))
            }
            _ => Err(mismatch("an integer", raw)),
        }
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        value.as_int().map(|i| json!(i))
    }
}

impl Component for FloatComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        raw.as_f64()
            .map(Value::Float)
            .ok_or_else(|| mismatch("a number", raw))
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        value.as_float().map(|f| json!(f))
    }
}

impl Component for StringComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        raw.as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| mismatch("a string", raw))
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        value.as_str().map(|s| JsonValue::String(s.to_string()))
    }

    fn is_empty(&self, value: &Value) -> bool {
        value.as_str().is_none_or(str::is_empty)
    }
}

impl Component for IdComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        let s = raw.as_str().ok_or_else(|| mismatch("an identifier", raw))?;
        Ok(Value::Id(ResourceId::parse(s)?))
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        match value {
            Value::Id(id) => Some(JsonValue::String(id.to_string())),
            _ => None,
        }
    }
}

impl Component for InputItemComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn role(&self) -> ComponentRole {
        Self::ROLE
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        let input = match raw {
            JsonValue::String(s) if s.trim().is_empty() => InputItem::empty(),
            JsonValue::String(s) => InputItem::parse(s)?,
            JsonValue::Object(obj) => {
                let ingredient = match (obj.get("item"), obj.get("tag")) {
                    (Some(item), None) => Ingredient::Item(read_id(item)?),
                    (None, Some(tag)) => Ingredient::Tag(read_id(tag)?),
                    _ => {
                        return Err(ComponentError::Invalid(
                            "an ingredient needs exactly one of 'item' or 'tag'".to_string(),
                        ));
                    }
                };
                InputItem::new(ingredient, read_count(obj)?)
            }
            other => return Err(mismatch("an ingredient", other)),
        };
        Ok(Value::Input(input))
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        match value {
            Value::Input(input) if input.is_empty() => None,
            _ => self.write_element(value),
        }
    }

    fn write_element(&self, value: &Value) -> Option<JsonValue> {
        let Value::Input(input) = value else {
            return None;
        };

        let mut json = Map::new();
        match &input.ingredient {
            Ingredient::Item(id) => json.insert("item".into(), id.to_string().into()),
            Ingredient::Tag(id) => json.insert("tag".into(), id.to_string().into()),
        };
        if input.count != 1 {
            json.insert("count".into(), input.count.into());
        }
        Some(JsonValue::Object(json))
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::Input(input) => input.is_empty(),
            _ => true,
        }
    }
}

impl Component for OutputItemComponent {
    fn component_type(&self) -> &str {
        Self::NAME
    }

    fn role(&self) -> ComponentRole {
        Self::ROLE
    }

    fn read(&self, raw: &JsonValue, _cx: &ReadContext) -> Result<Value, ComponentError> {
        let output = match raw {
            JsonValue::String(s) if s.trim().is_empty() => OutputItem::empty(),
            JsonValue::String(s) => OutputItem::parse(s)?,
            JsonValue::Object(obj) => {
                let item = obj
                    .get("item")
                    .ok_or_else(|| ComponentError::Invalid("a result needs an 'item'".to_string()))
                    .and_then(read_id)?;
                let mut output = OutputItem::new(item, read_count(obj)?);
                if let Some(nbt) = obj.get("nbt") {
                    let nbt = nbt.as_str().ok_or_else(|| mismatch("an NBT string", nbt))?;
                    output = output.with_nbt(nbt);
                }
                if let Some(chance) = obj.get("chance") {
                    let chance = chance.as_f64().ok_or_else(|| mismatch("a chance", chance))?;
                    if !(0.0..=1.0).contains(&chance) {
                        return Err(ComponentError::Invalid(format!(
                            "chance {} is outside of 0..1",
                            chance
                        )));
                    }
                    output = output.with_chance(chance);
                }
                output
            }
            other => return Err(mismatch("a result item", other)),
        };
        Ok(Value::Output(output))
    }

    fn write(&self, value: &Value) -> Option<JsonValue> {
        match value {
            Value::Output(output) if output.is_empty() => None,
            _ => self.write_element(value),
        }
    }

    fn write_element(&self, value: &Value) -> Option<JsonValue> {
        let Value::Output(output) = value else {
            return None;
        };

        let mut json = Map::new();
        json.insert("item".into(), output.item.to_string().into());
        json.insert("count".into(), output.count.into());
        if let Some(nbt) = &output.nbt {
            json.insert("nbt".into(), nbt.clone().into());
        }
        if let Some(chance) = output.chance {
            json.insert("chance".into(), json!(chance));
        }
        Some(JsonValue::Object(json))
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::Output(output) => output.is_empty(),
            _ => true,
        }
    }
}

fn read_id(raw: &JsonValue) -> Result<ResourceId, ComponentError> {
    let s = raw.as_str().ok_or_else(|| mismatch("an identifier", raw))?;
    ResourceId::parse(s)
}

fn read_count(obj: &Map<String, JsonValue>) -> Result<u32, ComponentError> {
    match obj.get("count") {
        None => Ok(1),
        Some(count) => count
            .as_u64()
            .and_then(|c| u32::try_from(c).ok())
            .ok_or_else(|| mismatch("a non-negative count", count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_accepts_whole_floats_only() {
        let cx = ReadContext::default();
        assert_eq!(IntComponent.read(&json!(2.0), &cx), Ok(Value::Int(2)));
        assert!(IntComponent.read(&json!(2.5), &cx).is_err());
        assert!(IntComponent.read(&json!("2"), &cx).is_err());
    }

    #[test]
    fn int_rejects_out_of_range_numbers() {
        let cx = ReadContext::default();
        let too_big: JsonValue = serde_json::from_str("9223372036854775808").unwrap();
        assert!(matches!(
            IntComponent.read(&too_big, &cx),
            Err(ComponentError::TypeMismatch { .. })
        ));
        assert!(IntComponent.read(&json!(1e19), &cx).is_err());
        assert_eq!(
            IntComponent.read(&json!(i64::MAX), &cx),
            Ok(Value::Int(i64::MAX))
        );
        assert_eq!(
            IntComponent.read(&json!(-9223372036854775808.0), &cx),
            Ok(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn input_object_requires_single_source() {
        let cx = ReadContext::default();
        let both = json!({"item": "minecraft:stone", "tag": "forge:stone"});
        assert!(InputItemComponent.read(&both, &cx).is_err());
        let tag = json!({"tag": "forge:stone", "count": 4});
        assert_eq!(
            InputItemComponent.read(&tag, &cx).unwrap().to_string(),
            "4x #forge:stone"
        );
    }
}
