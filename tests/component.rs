//! Tests for component codecs and their composition.
use hinagata::prelude::*;
use proptest::prelude::*;
use serde_json::json;

fn cx() -> ReadContext {
    ReadContext::default()
}

#[test]
fn test_string_rejects_empty_unless_allowed() {
    let component = string_component();
    assert_eq!(
        component.read_checked(&json!(""), &cx()),
        Err(ComponentError::Empty(json!("")))
    );
    assert_eq!(
        component.read_checked(&json!(""), &ReadContext::allowing_empty(true)),
        Ok(Value::String(String::new()))
    );
}

#[test]
fn test_input_item_shapes() {
    let component = input_item();

    let item = component.read_checked(&json!("minecraft:stone"), &cx()).unwrap();
    assert_eq!(item.to_string(), "minecraft:stone");

    let tag = component.read_checked(&json!("#forge:ingots"), &cx()).unwrap();
    assert_eq!(tag.to_string(), "#forge:ingots");

    let counted = component
        .read_checked(&json!({"item": "stone", "count": 3}), &cx())
        .unwrap();
    assert_eq!(counted.to_string(), "3x minecraft:stone");

    assert!(matches!(
        component.read_checked(&json!(12), &cx()),
        Err(ComponentError::TypeMismatch { .. })
    ));
}

#[test]
fn test_air_is_empty_input() {
    let component = input_item();
    assert_eq!(
        component.read_checked(&json!("minecraft:air"), &cx()),
        Err(ComponentError::Empty(json!("minecraft:air")))
    );
    assert!(
        component
            .read_checked(&json!("minecraft:air"), &ReadContext::allowing_empty(true))
            .is_ok()
    );
}

#[test]
fn test_output_item_write_shape() {
    let output = OutputItem::new(ResourceId::parse("create:brass_ingot").unwrap(), 2)
        .with_chance(0.25)
        .with_nbt("{Damage:0}");
    let written = output_item().write(&Value::Output(output)).unwrap();
    assert_eq!(
        written,
        json!({"item": "create:brass_ingot", "count": 2, "nbt": "{Damage:0}", "chance": 0.25})
    );

    assert_eq!(output_item().write(&Value::Output(OutputItem::empty())), None);
}

#[test]
fn test_output_chance_must_be_a_probability() {
    let result = output_item().read(&json!({"item": "stone", "chance": 1.5}), &cx());
    assert!(matches!(result, Err(ComponentError::Invalid(_))));
}

#[test]
fn test_array_preserves_order() {
    let component = input_item().as_array();
    assert_eq!(component.component_type(), "input_item[]");
    assert_eq!(component.role(), ComponentRole::Input);

    let value = component
        .read_checked(
            &json!(["minecraft:stone", "#forge:ingots", "3x minecraft:dirt"]),
            &cx(),
        )
        .unwrap();
    let rendered: Vec<String> = value.as_list().unwrap().iter().map(|v| v.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["minecraft:stone", "#forge:ingots", "3x minecraft:dirt"]
    );
}

#[test]
fn test_array_fails_on_bad_element() {
    let component = input_item().as_array();

    match component.read_checked(&json!(["minecraft:stone", 5]), &cx()) {
        Err(ComponentError::Element { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(*source, ComponentError::TypeMismatch { .. }));
        }
        other => panic!("Expected element error, got {:?}", other),
    }

    match component.read_checked(&json!(["minecraft:stone", "minecraft:air"]), &cx()) {
        Err(ComponentError::Element { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(*source, ComponentError::Empty(_)));
        }
        other => panic!("Expected element error, got {:?}", other),
    }
}

#[test]
fn test_array_emptiness_and_single_values() {
    let component = int_component().as_array();
    assert_eq!(
        component.read_checked(&json!([]), &cx()),
        Err(ComponentError::Empty(json!([])))
    );
    assert_eq!(
        component.read_checked(&json!(4), &cx()),
        Ok(Value::List(vec![Value::Int(4)]))
    );
}

#[test]
fn test_array_write_keeps_empty_elements_in_place() {
    let component = input_item().as_array();
    let lenient = ReadContext::allowing_empty(true);

    let value = component
        .read_checked(&json!(["minecraft:stone", "minecraft:air", "#forge:ingots"]), &lenient)
        .unwrap();
    let written = component.write(&value).unwrap();
    assert_eq!(written.as_array().map(Vec::len), Some(3));
    assert_eq!(component.read_checked(&written, &lenient), Ok(value));

    // The element writer never omits, but a lone empty value still does.
    assert_eq!(input_item().write(&Value::Input(InputItem::empty())), None);
    assert!(input_item()
        .write_element(&Value::Input(InputItem::empty()))
        .is_some());
}

#[test]
fn test_optional_wrapper_falls_back_to_default() {
    let component = input_item().optional(Value::Input(InputItem::empty()));
    assert_eq!(
        component.read_checked(&serde_json::Value::Null, &cx()),
        Ok(Value::Input(InputItem::empty()))
    );
    // Only the default itself may be empty.
    assert!(component.read_checked(&json!("minecraft:air"), &cx()).is_err());
    assert!(component.read_checked(&json!("minecraft:stone"), &cx()).is_ok());
    assert_eq!(
        component.default_value(),
        Some(Value::Input(InputItem::empty()))
    );

    let key = Key::new("secondary", component);
    assert!(key.is_optional());
}

#[test]
fn test_registry_lookup_matches_constructors() {
    let registry = ComponentRegistry::new();
    for name in ["bool", "int", "float", "string", "id", "input_item", "output_item"] {
        assert!(registry.contains(name), "missing builtin {}", name);
    }
    assert_eq!(
        registry.get("output_item").unwrap().role(),
        ComponentRole::Output
    );
}

fn resource_id() -> impl Strategy<Value = ResourceId> {
    ("[a-z][a-z0-9_]{0,7}", "[a-z][a-z0-9_/]{0,11}")
        .prop_map(|(namespace, path)| ResourceId::new(&format!("x{}", namespace), &path).unwrap())
}

proptest! {
    #[test]
    fn prop_output_item_round_trips(
        item in resource_id(),
        count in 1u32..=64,
        chance in proptest::option::of(0.0f64..=1.0),
        nbt in proptest::option::of("[a-zA-Z:{}0-9]{1,16}"),
    ) {
        let mut output = OutputItem::new(item, count);
        output.chance = chance;
        output.nbt = nbt;
        let value = Value::Output(output);

        let component = output_item();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }

    #[test]
    fn prop_input_item_round_trips(id in resource_id(), is_tag in any::<bool>(), count in 1u32..=64) {
        let ingredient = if is_tag { Ingredient::Tag(id) } else { Ingredient::Item(id) };
        let value = Value::Input(InputItem::new(ingredient, count));

        let component = input_item();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }

    #[test]
    fn prop_bool_round_trips(b in any::<bool>()) {
        let value = Value::Bool(b);
        let component = bool_component();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }

    #[test]
    fn prop_float_round_trips(f in -1.0e12f64..1.0e12) {
        let value = Value::Float(f);
        let component = float_component();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }

    #[test]
    fn prop_string_round_trips(s in "\\PC{1,24}") {
        let value = Value::String(s);
        let component = string_component();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }

    #[test]
    fn prop_id_round_trips(id in resource_id()) {
        let value = Value::Id(id);
        let component = id_component();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }

    #[test]
    fn prop_item_arrays_keep_length(
        items in proptest::collection::vec((resource_id(), any::<bool>()), 1..6),
    ) {
        let value = Value::List(
            items
                .into_iter()
                .map(|(id, air)| {
                    let id = if air { ResourceId::air() } else { id };
                    Value::Input(InputItem::item(id))
                })
                .collect(),
        );

        let component = input_item().as_array();
        let cx = ReadContext::allowing_empty(true);
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &cx), Ok(value));
    }

    #[test]
    fn prop_scalar_arrays_round_trip(values in proptest::collection::vec(any::<i64>(), 1..8)) {
        let value = Value::List(values.into_iter().map(Value::Int).collect());

        let component = int_component().as_array();
        let written = component.write(&value).unwrap();
        prop_assert_eq!(component.read_checked(&written, &ReadContext::default()), Ok(value));
    }
}
