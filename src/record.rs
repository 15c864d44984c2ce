use crate::error::RecordError;
use crate::key::Key;
use crate::schema::Schema;
use crate::value::{Document, ResourceId, Value};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Where a record is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Allocated; type, id and document attached, keys not yet assigned.
    Initializing,
    /// Every required key has been assigned.
    Populated,
    /// Handed off; values can no longer change.
    Finalized,
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Unset,
    /// A default resolved on first access. Not serialized.
    Resolved(Value),
    /// Explicitly assigned, or an always-write default. Serialized.
    Written(Value),
}

impl Slot {
    fn value(&self) -> Option<&Value> {
        match self {
            Slot::Unset => None,
            Slot::Resolved(value) | Slot::Written(value) => Some(value),
        }
    }
}

/// One recipe conforming to a [`Schema`].
///
/// Values live in a table with one slot per schema key and are addressed by
/// key identity, not by name.
#[derive(Debug)]
pub struct Record {
    schema: Arc<Schema>,
    type_id: String,
    id: Option<ResourceId>,
    document: Document,
    original_document: Option<Document>,
    slots: Vec<Slot>,
    state: RecordState,
    newly_created: bool,
}

impl Record {
    fn allocate(
        schema: Arc<Schema>,
        type_id: &str,
        id: Option<ResourceId>,
        document: Document,
        newly_created: bool,
    ) -> Self {
        let slots = vec![Slot::Unset; schema.keys().len()];
        Self {
            schema,
            type_id: type_id.to_string(),
            id,
            document,
            original_document: None,
            slots,
            state: RecordState::Initializing,
            newly_created,
        }
    }

    /// Stores the defaults of always-write keys up front.
    fn write_always_defaults(&mut self) {
        for (slot, key) in self.schema.keys().iter().enumerate() {
            if !key.is_always_write() {
                continue;
            }
            if let Some(default) = key.default_value() {
                self.slots[slot] = Slot::Written(default.resolve(&self.type_id));
            }
        }
    }

    pub(crate) fn set_original_document(&mut self, original: Option<Document>) {
        self.original_document = original;
    }

    pub(crate) fn mark_populated(&mut self) {
        self.state = RecordState::Populated;
    }

    fn slot_of(&self, key: &Key) -> Result<usize, RecordError> {
        self.schema
            .slot_of(key.id())
            .ok_or_else(|| RecordError::UnknownKey(key.name().to_string()))
    }

    /// The value of `key`: the stored value if there is one, otherwise the
    /// key's default, which is resolved once and cached.
    ///
    /// Reading an unset required key is a bug in the caller, since parsing and
    /// construction guarantee that required keys are set.
    pub fn get(&mut self, key: &Key) -> Result<&Value, RecordError> {
        let slot = self.slot_of(key)?;
        let schema_key = &self.schema.keys()[slot];

        if self.slots[slot] == Slot::Unset {
            let default = schema_key
                .default_value()
                .ok_or_else(|| RecordError::UnsetRequired(schema_key.name().to_string()))?;
            self.slots[slot] = Slot::Resolved(default.resolve(&self.type_id));
        }

        self.slots[slot]
            .value()
            .ok_or_else(|| RecordError::UnsetRequired(key.name().to_string()))
    }

    /// The stored or already-resolved value of `key`, without resolving
    /// defaults.
    pub fn peek(&self, key: &Key) -> Option<&Value> {
        let slot = self.schema.slot_of(key.id())?;
        self.slots[slot].value()
    }

    pub fn set(&mut self, key: &Key, value: Value) -> Result<(), RecordError> {
        if self.state == RecordState::Finalized {
            return Err(RecordError::Finalized);
        }
        let slot = self.slot_of(key)?;
        self.slots[slot] = Slot::Written(value);
        Ok(())
    }

    /// Reads `raw` through the key's component and stores the result.
    pub fn read_and_set(&mut self, key: &Key, raw: &JsonValue) -> Result<(), RecordError> {
        let slot = self.slot_of(key)?;
        let value = self.schema.keys()[slot].read(raw)?;
        self.set(key, value)
    }

    /// Whether `key` holds an explicitly written value, as opposed to being
    /// unset or holding a lazily resolved default.
    pub fn is_set(&self, key: &Key) -> bool {
        self.schema
            .slot_of(key.id())
            .is_some_and(|slot| matches!(self.slots[slot], Slot::Written(_)))
    }

    pub fn finalize(&mut self) {
        self.state = RecordState::Finalized;
    }

    /// Serializes the record.
    ///
    /// Starts from the source document, so properties no key claims survive.
    /// Every written key is stored under its primary name and its aliases are
    /// removed; keys whose component omits the value are removed entirely.
    pub fn to_document(&self) -> Document {
        let mut document = self.document.clone();
        document.insert("type".to_string(), JsonValue::String(self.type_id.clone()));

        for (key, slot) in self.schema.keys().iter().zip(&self.slots) {
            let Slot::Written(value) = slot else {
                continue;
            };
            for alias in &key.names()[1..] {
                document.remove(alias);
            }
            match key.write(value) {
                Some(json) => {
                    document.insert(key.name().to_string(), json);
                }
                None => {
                    document.remove(key.name());
                }
            }
        }
        document
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// The document this record was parsed from, or a stub holding only the
    /// type for constructed records.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The untouched source document, kept only in debug mode.
    pub fn original_document(&self) -> Option<&Document> {
        self.original_document.as_ref()
    }

    /// Whether the record was constructed rather than parsed.
    pub fn is_new(&self) -> bool {
        self.newly_created
    }

    pub fn state(&self) -> RecordState {
        self.state
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_id)?;
        if let Some(id) = &self.id {
            write!(f, "[{}]", id)?;
        }
        write!(f, "(")?;
        let mut first = true;
        for (key, slot) in self.schema.keys().iter().zip(&self.slots) {
            if let Some(value) = slot.value() {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key.name(), value)?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

/// Runs after a record is allocated and before its keys are assigned.
pub type RecordInit = Arc<dyn Fn(&mut Record) + Send + Sync>;

/// Allocates records for a schema.
#[derive(Clone)]
pub struct RecordFactory {
    name: String,
    init: Option<RecordInit>,
}

impl RecordFactory {
    pub const BASIC: &'static str = "basic";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            init: None,
        }
    }

    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&mut Record) + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn create(
        &self,
        schema: Arc<Schema>,
        type_id: &str,
        id: Option<ResourceId>,
        document: Document,
        newly_created: bool,
    ) -> Record {
        let mut record = Record::allocate(schema, type_id, id, document, newly_created);
        record.write_always_defaults();
        if let Some(init) = &self.init {
            init(&mut record);
        }
        record
    }
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self::new(Self::BASIC)
    }
}

impl fmt::Debug for RecordFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFactory")
            .field("name", &self.name)
            .field("init", &self.init.is_some())
            .finish()
    }
}
