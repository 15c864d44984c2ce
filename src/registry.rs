use crate::component::ComponentRegistry;
use crate::definition::{IntoSchema, SchemaDefinitions};
use crate::error::{RecordError, SchemaDefinitionError};
use crate::record::Record;
use crate::schema::Schema;
use crate::settings::Settings;
use crate::value::{Document, ResourceId};
use ahash::AHashMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A record that could not be loaded, and why.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    /// Position of the document in the loaded batch.
    pub index: usize,
    pub id: Option<ResourceId>,
    pub error: RecordError,
}

/// Outcome of a bulk load: every record that loaded, and every one that did
/// not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolves recipe type discriminators to schemas.
pub struct SchemaRegistry {
    types: AHashMap<String, Arc<Schema>>,
    settings: Settings,
}

impl SchemaRegistry {
    pub fn new(settings: Settings) -> Self {
        Self {
            types: AHashMap::new(),
            settings,
        }
    }

    /// Builds a registry from serialized schema definitions. An invalid
    /// definition aborts only its own registration; its error is returned
    /// alongside the registry, which keeps every other type.
    pub fn from_definitions(
        definitions: SchemaDefinitions,
        components: &ComponentRegistry,
        settings: Settings,
    ) -> (Self, Vec<(String, SchemaDefinitionError)>) {
        let mut registry = Self::new(settings);
        let mut errors = Vec::new();

        for (type_id, definition) in definitions {
            let result = definition
                .into_schema(components)
                .and_then(|schema| registry.register(&type_id, schema).map(|_| ()));
            if let Err(e) = result {
                log::error!("Failed to register recipe type '{}': {}", type_id, e);
                errors.push((type_id, e));
            }
        }
        (registry, errors)
    }

    pub fn register(
        &mut self,
        type_id: &str,
        schema: Schema,
    ) -> Result<Arc<Schema>, SchemaDefinitionError> {
        self.register_shared(type_id, Arc::new(schema))
    }

    /// Registers a schema that may also be used under other type ids.
    pub fn register_shared(
        &mut self,
        type_id: &str,
        schema: Arc<Schema>,
    ) -> Result<Arc<Schema>, SchemaDefinitionError> {
        if self.types.contains_key(type_id) {
            return Err(SchemaDefinitionError::DuplicateType(type_id.to_string()));
        }
        log::info!("Registered recipe type '{}' as {}", type_id, schema);
        self.types.insert(type_id.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, type_id: &str) -> Option<&Arc<Schema>> {
        self.types.get(type_id)
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn resolve(&self, type_id: &str) -> Result<&Arc<Schema>, RecordError> {
        self.get(type_id)
            .ok_or_else(|| RecordError::UnknownType(type_id.to_string()))
    }

    /// Parses a document, picking the schema from its `type` property.
    pub fn parse(&self, id: Option<ResourceId>, document: Document) -> Result<Record, RecordError> {
        let type_id = document
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or(RecordError::MissingType)?
            .to_string();
        self.resolve(&type_id)?
            .parse_document_with(&self.settings, &type_id, id, document)
    }

    /// Builds a record of `type_id` from positional arguments.
    pub fn construct(&self, type_id: &str, args: Vec<JsonValue>) -> Result<Record, RecordError> {
        self.resolve(type_id)?
            .construct_with(&self.settings, type_id, args)
    }

    /// Parses a batch of documents. Malformed records are logged and skipped
    /// unless `fail_fast` is set, in which case loading stops at the first one.
    pub fn load<I>(&self, documents: I) -> LoadReport
    where
        I: IntoIterator<Item = (Option<ResourceId>, Document)>,
    {
        let mut report = LoadReport::default();

        for (index, (id, document)) in documents.into_iter().enumerate() {
            match self.parse(id.clone(), document) {
                Ok(record) => report.records.push(record),
                Err(error) => {
                    match &id {
                        Some(id) => log::warn!("Skipping recipe '{}': {}", id, error),
                        None => log::warn!("Skipping recipe #{}: {}", index, error),
                    }
                    report.failures.push(LoadFailure { index, id, error });
                    if self.settings.fail_fast {
                        break;
                    }
                }
            }
        }

        log::info!(
            "Loaded {} recipes, {} failed",
            report.records.len(),
            report.failures.len()
        );
        report
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
