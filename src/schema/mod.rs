use crate::error::{MissingRequiredKeyError, RecordError, SchemaDefinitionError};
use crate::key::{Key, KeyId};
use crate::record::{Record, RecordFactory};
use crate::settings::Settings;
use crate::value::{Document, ResourceId};
use ahash::AHashMap;
use itertools::Itertools;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::{Arc, OnceLock};

mod constructor;
mod source;

pub use constructor::*;
pub use source::*;

/// An ordered, validated set of keys describing one recipe shape.
///
/// Every key gets a stable slot index when it is added; records store their
/// values by slot. Required keys (without a default) always come before
/// optional ones, and primary names are unique.
///
/// A schema starts out *building*: keys and custom constructors may still be
/// added. The first call to [`constructors`](Schema::constructors), or the
/// first parse or construction, computes the constructor table exactly once
/// and seals the schema. After that every mutation fails with
/// [`SchemaDefinitionError::Sealed`].
pub struct Schema {
    factory: RecordFactory,
    keys: Vec<Key>,
    slots: AHashMap<KeyId, usize>,
    names: AHashMap<String, usize>,
    required: usize,
    custom: ConstructorTable,
    table: OnceLock<ConstructorTable>,
}

impl Schema {
    /// Creates a schema producing basic records.
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Result<Self, SchemaDefinitionError> {
        Self::with_factory(RecordFactory::default(), keys)
    }

    pub fn with_factory(
        factory: RecordFactory,
        keys: impl IntoIterator<Item = Key>,
    ) -> Result<Self, SchemaDefinitionError> {
        let mut schema = Self {
            factory,
            keys: Vec::new(),
            slots: AHashMap::new(),
            names: AHashMap::new(),
            required: 0,
            custom: ConstructorTable::default(),
            table: OnceLock::new(),
        };
        for key in keys {
            schema.push_key(key)?;
        }
        Ok(schema)
    }

    /// Appends a key to a schema that is still being built.
    pub fn add_key(&mut self, key: Key) -> Result<&mut Self, SchemaDefinitionError> {
        self.ensure_building("add a key")?;
        self.push_key(key)?;
        Ok(self)
    }

    fn push_key(&mut self, key: Key) -> Result<(), SchemaDefinitionError> {
        if self.names.contains_key(key.name()) {
            return Err(SchemaDefinitionError::DuplicateKey(key.name().to_string()));
        }
        if key.is_excluded() && !key.is_optional() {
            return Err(SchemaDefinitionError::ExcludedWithoutDefault(
                key.name().to_string(),
            ));
        }
        if !key.is_optional() {
            if let Some(optional) = self.keys.iter().find(|k| k.is_optional()) {
                return Err(SchemaDefinitionError::RequiredAfterOptional {
                    key: key.name().to_string(),
                    optional: optional.name().to_string(),
                });
            }
            self.required += 1;
        }

        let slot = self.keys.len();
        self.slots.insert(key.id(), slot);
        self.names.insert(key.name().to_string(), slot);
        self.keys.push(key);
        Ok(())
    }

    /// Registers a custom constructor over `keys`. Its arity is the number of
    /// keys, and it takes precedence over the generated constructor of that
    /// arity. Only one custom constructor may exist per arity, and it may bind
    /// each key only once.
    pub fn constructor<F>(
        &mut self,
        keys: &[&Key],
        factory: F,
    ) -> Result<&mut Self, SchemaDefinitionError>
    where
        F: ConstructorFactory + 'static,
    {
        self.ensure_building("register a constructor")?;

        let slots = keys
            .iter()
            .map(|key| {
                self.slot_of(key.id())
                    .ok_or_else(|| SchemaDefinitionError::UnknownConstructorKey(key.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (i, slot) in slots.iter().enumerate() {
            if slots[..i].contains(slot) {
                return Err(SchemaDefinitionError::RepeatedConstructorKey(
                    self.keys[*slot].name().to_string(),
                ));
            }
        }

        if self.custom.contains(slots.len()) {
            return Err(SchemaDefinitionError::DuplicateConstructor(slots.len()));
        }
        self.custom
            .insert(Constructor::new(slots, Arc::new(factory), true));
        Ok(self)
    }

    fn ensure_building(&self, operation: &'static str) -> Result<(), SchemaDefinitionError> {
        if self.is_sealed() {
            Err(SchemaDefinitionError::Sealed(operation))
        } else {
            Ok(())
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.table.get().is_some()
    }

    /// The constructor table, computed on first access. Accessing it seals
    /// the schema.
    ///
    /// Custom constructors are kept as registered. Every other arity from the
    /// number of required keys up to the number of keys included in
    /// auto-constructors gets a generated constructor binding that many keys,
    /// required ones first, in declaration order. A schema without keys has no
    /// constructors.
    pub fn constructors(&self) -> &ConstructorTable {
        self.table.get_or_init(|| self.generate_constructors())
    }

    fn generate_constructors(&self) -> ConstructorTable {
        let mut table = self.custom.clone();
        if self.keys.is_empty() {
            return table;
        }

        log::info!("Generating constructors for {}", self);

        let auto_slots: Vec<usize> = self
            .keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.include_in_auto_constructors())
            .map(|(slot, _)| slot)
            .collect();

        for arity in self.required..=auto_slots.len() {
            if table.contains(arity) {
                log::debug!("> {} (custom)", arity);
                continue;
            }
            log::debug!("> {}", arity);
            table.insert(Constructor::new(
                auto_slots[..arity].to_vec(),
                Arc::new(DefaultFactory),
                false,
            ));
        }
        table
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// The key with the given primary name or alias.
    pub fn key(&self, name: &str) -> Option<&Key> {
        match self.names.get(name) {
            Some(&slot) => Some(&self.keys[slot]),
            None => self.keys.iter().find(|k| k.names().iter().any(|n| n == name)),
        }
    }

    pub fn slot_of(&self, id: KeyId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Number of required keys, which is also the smallest generated arity.
    pub fn min_required_arguments(&self) -> usize {
        self.required
    }

    pub fn factory(&self) -> &RecordFactory {
        &self.factory
    }

    /// Parses `document` into a record using default settings.
    pub fn parse_document(
        self: &Arc<Self>,
        type_id: &str,
        id: Option<ResourceId>,
        document: Document,
    ) -> Result<Record, RecordError> {
        self.parse_document_with(&Settings::default(), type_id, id, document)
    }

    /// Parses `document` into a record.
    ///
    /// Each key takes its value from the first of its names present in the
    /// document. Missing required keys fail the parse; missing optional keys
    /// stay unset and resolve to their default on first access. With
    /// `debug_info` set, records that have an id keep a copy of the untouched
    /// document.
    pub fn parse_document_with(
        self: &Arc<Self>,
        settings: &Settings,
        type_id: &str,
        id: Option<ResourceId>,
        document: Document,
    ) -> Result<Record, RecordError> {
        self.constructors();

        let original = (settings.debug_info && id.is_some()).then(|| document.clone());
        let mut record = self
            .factory
            .create(Arc::clone(self), type_id, id, document, false);
        record.set_original_document(original);

        let source = record.document().clone();
        let cx = BindContext {
            schema: self,
            type_id,
            settings,
        };
        let keys: Vec<&Key> = self.keys.iter().collect();
        DefaultFactory.bind(&cx, &mut record, &keys, &DocumentSource(&source))?;

        record.mark_populated();
        log::trace!("Parsed {} record {:?}", type_id, record.id());
        Ok(record)
    }

    /// Builds a new record from positional arguments using default settings.
    pub fn construct(
        self: &Arc<Self>,
        type_id: &str,
        args: Vec<JsonValue>,
    ) -> Result<Record, RecordError> {
        self.construct_with(&Settings::default(), type_id, args)
    }

    /// Builds a new record from positional arguments. The number of arguments
    /// selects the constructor.
    pub fn construct_with(
        self: &Arc<Self>,
        settings: &Settings,
        type_id: &str,
        args: Vec<JsonValue>,
    ) -> Result<Record, RecordError> {
        let constructor = self.constructors().select(args.len())?;
        let source = ComponentValueMap::from_positional(&constructor.keys(self), args);
        self.build_record(settings, type_id, |cx, record| {
            constructor.bind(cx, record, &source)
        })
    }

    /// Builds a new record from any value source, binding every key.
    pub fn construct_from(
        self: &Arc<Self>,
        settings: &Settings,
        type_id: &str,
        source: &dyn ValueSource,
    ) -> Result<Record, RecordError> {
        self.constructors();
        self.build_record(settings, type_id, |cx, record| {
            let keys: Vec<&Key> = self.keys.iter().collect();
            DefaultFactory.bind(cx, record, &keys, source)
        })
    }

    fn build_record<F>(
        self: &Arc<Self>,
        settings: &Settings,
        type_id: &str,
        bind: F,
    ) -> Result<Record, RecordError>
    where
        F: FnOnce(&BindContext<'_>, &mut Record) -> Result<(), RecordError>,
    {
        let mut document = Document::new();
        document.insert("type".to_string(), JsonValue::String(type_id.to_string()));
        let mut record = self
            .factory
            .create(Arc::clone(self), type_id, None, document, true);

        let cx = BindContext {
            schema: self,
            type_id,
            settings,
        };
        bind(&cx, &mut record)?;
        self.verify_required(&record)?;

        record.mark_populated();
        Ok(record)
    }

    /// Custom factories may skip keys; every required key must still be set.
    fn verify_required(&self, record: &Record) -> Result<(), MissingRequiredKeyError> {
        match self
            .keys
            .iter()
            .find(|key| !key.is_optional() && !record.is_set(key))
        {
            Some(key) => Err(MissingRequiredKeyError {
                key: key.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.factory.name(), self.keys.iter().join(", "))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("factory", &self.factory.name())
            .field("keys", &self.keys)
            .field("required", &self.required)
            .field("sealed", &self.is_sealed())
            .finish()
    }
}
