//! Tests for parsing documents into records and writing them back out.
mod common;
use common::*;
use hinagata::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn iron_id() -> Option<ResourceId> {
    Some(ResourceId::parse("minecraft:iron_ingot_from_smelting").unwrap())
}

#[test]
fn test_parse_reads_every_present_key() {
    let (schema, keys) = smelting_schema();
    let mut record = schema
        .parse_document("minecraft:smelting", iron_id(), smelting_document())
        .unwrap();

    assert_eq!(record.state(), RecordState::Populated);
    assert!(!record.is_new());
    assert_eq!(record.type_id(), "minecraft:smelting");
    assert_eq!(record.get(&keys.result).unwrap().to_string(), "minecraft:iron_ingot");
    assert_eq!(record.get(&keys.ingredient).unwrap().to_string(), "#forge:ores/iron");
    assert_eq!(record.get(&keys.xp).unwrap(), &Value::Float(0.7));
    assert!(record.is_set(&keys.xp));
}

#[test]
fn test_missing_required_key_fails_the_parse() {
    let (schema, _) = smelting_schema();
    let document = doc(json!({
        "type": "minecraft:smelting",
        "ingredient": "minecraft:iron_ore"
    }));

    let err = schema
        .parse_document("minecraft:smelting", None, document)
        .unwrap_err();
    assert_eq!(
        err,
        RecordError::MissingRequiredKey(MissingRequiredKeyError {
            key: "result".to_string()
        })
    );
    assert_eq!(err.to_string(), "Missing required key 'result'");
}

#[test]
fn test_alias_is_read_and_primary_name_wins() {
    let count = Key::new("count", int_component()).alt("amount");
    let schema = Arc::new(Schema::new([count.clone()]).unwrap());

    let mut aliased = schema
        .parse_document("test:counted", None, doc(json!({"amount": 3})))
        .unwrap();
    assert_eq!(aliased.get(&count).unwrap(), &Value::Int(3));

    let mut both = schema
        .parse_document("test:counted", None, doc(json!({"amount": 2, "count": 1})))
        .unwrap();
    assert_eq!(both.get(&count).unwrap(), &Value::Int(1));
}

#[test]
fn test_missing_optional_key_resolves_to_default_without_being_set() {
    let (schema, keys) = smelting_schema();
    let mut record = schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();

    assert!(!record.is_set(&keys.time));
    assert_eq!(record.peek(&keys.time), None);
    assert_eq!(record.get(&keys.time).unwrap(), &Value::Int(200));
    assert_eq!(record.peek(&keys.time), Some(&Value::Int(200)));
    assert!(!record.is_set(&keys.time));

    let document = record.to_document();
    assert!(!document.contains_key("time"));
    assert!(!document.contains_key("cookingtime"));
}

#[test]
fn test_always_write_default_is_serialized() {
    let mut keys = smelting_keys();
    keys.time = keys.time.always_write();
    let schema = Arc::new(smelting_schema_from(&keys));

    let record = schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();
    assert!(record.is_set(&keys.time));
    assert_eq!(record.to_document().get("time"), Some(&json!(200)));
}

#[test]
fn test_computed_default_is_resolved_once_per_record() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let group = Key::new("group", string_component()).optional_with(move |type_id| {
        counter.fetch_add(1, Ordering::SeqCst);
        Value::String(type_id.to_string())
    });
    let schema = Arc::new(Schema::new([group.clone()]).unwrap());

    let mut first = schema.parse_document("test:grouped", None, Document::new()).unwrap();
    assert_eq!(first.get(&group).unwrap(), &Value::String("test:grouped".to_string()));
    assert_eq!(first.get(&group).unwrap(), &Value::String("test:grouped".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let mut second = schema.parse_document("test:other", None, Document::new()).unwrap();
    assert_eq!(second.get(&group).unwrap(), &Value::String("test:other".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_component_failure_names_key_and_input() {
    let (schema, _) = smelting_schema();
    let mut document = smelting_document();
    document.insert("experience".to_string(), json!("lots"));

    match schema.parse_document("minecraft:smelting", None, document) {
        Err(RecordError::ComponentRead(err)) => {
            assert_eq!(err.key, "xp");
            assert_eq!(err.raw, json!("lots"));
            assert!(matches!(err.reason, ComponentError::TypeMismatch { .. }));
        }
        other => panic!("Expected a component read error, got {:?}", other),
    }
}

#[test]
fn test_empty_value_is_rejected_unless_allowed() {
    let (schema, _) = smelting_schema();
    let mut document = smelting_document();
    document.insert("result".to_string(), json!("minecraft:air"));
    assert!(matches!(
        schema.parse_document("minecraft:smelting", None, document.clone()),
        Err(RecordError::ComponentRead(_))
    ));

    let mut keys = smelting_keys();
    keys.result = keys.result.allow_empty();
    let lenient = Arc::new(smelting_schema_from(&keys));
    let record = lenient
        .parse_document("minecraft:smelting", None, document)
        .unwrap();
    // The empty result is omitted on output.
    assert!(!record.to_document().contains_key("result"));
}

#[test]
fn test_to_document_normalizes_aliases_and_keeps_unknown_properties() {
    let (schema, _) = smelting_schema();
    let record = schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();

    let expected = doc(json!({
        "type": "minecraft:smelting",
        "result": {"item": "minecraft:iron_ingot", "count": 1},
        "ingredient": {"tag": "forge:ores/iron"},
        "xp": 0.7,
        "group": "iron"
    }));
    assert_eq!(record.to_document(), expected);
    assert!(record.document().contains_key("experience"));
}

#[test]
fn test_written_document_parses_back_to_same_values() {
    let (schema, keys) = smelting_schema();
    let mut record = schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();
    record
        .read_and_set(&keys.time, &json!(100))
        .unwrap();

    let mut reparsed = schema
        .parse_document("minecraft:smelting", None, record.to_document())
        .unwrap();
    for key in [&keys.result, &keys.ingredient, &keys.xp, &keys.time] {
        assert_eq!(record.get(key).unwrap(), reparsed.get(key).unwrap(), "{}", key);
    }
}

#[test]
fn test_debug_copy_is_kept_only_for_identified_records() {
    let (schema, _) = smelting_schema();
    let debug = Settings::default().with_debug_info(true);

    let record = schema
        .parse_document_with(&debug, "minecraft:smelting", iron_id(), smelting_document())
        .unwrap();
    assert_eq!(record.original_document(), Some(&smelting_document()));

    let anonymous = schema
        .parse_document_with(&debug, "minecraft:smelting", None, smelting_document())
        .unwrap();
    assert_eq!(anonymous.original_document(), None);

    let quiet = Settings::default().with_debug_info(false);
    let record = schema
        .parse_document_with(&quiet, "minecraft:smelting", iron_id(), smelting_document())
        .unwrap();
    assert_eq!(record.original_document(), None);
}

#[test]
fn test_finalized_record_rejects_writes() {
    let (schema, keys) = smelting_schema();
    let mut record = schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();

    record.set(&keys.xp, Value::Float(1.0)).unwrap();
    record.finalize();
    assert_eq!(record.state(), RecordState::Finalized);
    assert_eq!(
        record.set(&keys.xp, Value::Float(2.0)),
        Err(RecordError::Finalized)
    );
    assert_eq!(record.get(&keys.xp).unwrap(), &Value::Float(1.0));
}

#[test]
fn test_foreign_key_is_rejected() {
    let (schema, _) = smelting_schema();
    let mut record = schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();

    let foreign = Key::new("xp", float_component()).optional(Value::Float(0.0));
    assert_eq!(
        record.get(&foreign),
        Err(RecordError::UnknownKey("xp".to_string()))
    );
    assert!(!record.is_set(&foreign));
    assert_eq!(record.peek(&foreign), None);
}

#[test]
fn test_reading_unset_required_key_in_init_hook_fails() {
    let keys = smelting_keys();
    let observed = Arc::new(Mutex::new(None));

    let result_key = keys.result.clone();
    let sink = Arc::clone(&observed);
    let factory = RecordFactory::new("observed").with_init(move |record| {
        assert_eq!(record.state(), RecordState::Initializing);
        let outcome = record.get(&result_key).cloned();
        *sink.lock().unwrap() = Some(outcome);
    });

    let schema = Arc::new(
        Schema::with_factory(
            factory,
            [
                keys.result.clone(),
                keys.ingredient.clone(),
                keys.xp.clone(),
                keys.time.clone(),
            ],
        )
        .unwrap(),
    );
    assert_eq!(schema.factory().name(), "observed");

    schema
        .parse_document("minecraft:smelting", None, smelting_document())
        .unwrap();
    assert_eq!(
        observed.lock().unwrap().take(),
        Some(Err(RecordError::UnsetRequired("result".to_string())))
    );
}

#[test]
fn test_display_shows_resolved_values() {
    let (schema, keys) = smelting_schema();
    let mut record = schema
        .parse_document("minecraft:smelting", iron_id(), smelting_document())
        .unwrap();
    assert_eq!(
        record.to_string(),
        "minecraft:smelting[minecraft:iron_ingot_from_smelting](result: minecraft:iron_ingot, \
         ingredient: #forge:ores/iron, xp: 0.7)"
    );

    record.get(&keys.time).unwrap();
    assert!(record.to_string().ends_with("xp: 0.7, time: 200)"));
}
