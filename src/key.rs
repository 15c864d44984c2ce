use crate::component::{ComponentRef, ComponentRole, ReadContext};
use crate::error::ComponentReadError;
use crate::value::{Document, Value};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a key. Two keys may share a name across schemas, but never an
/// id; clones of a key keep the id of the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u64);

impl KeyId {
    fn next() -> Self {
        Self(NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Produces a default for one record; receives the record's type id.
pub type ComputedDefault = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// How an optional key obtains its value when none was supplied.
#[derive(Clone)]
pub enum DefaultValue {
    /// The same value for every record.
    Constant(Value),
    /// Computed once per record, on first access.
    Computed(ComputedDefault),
    /// Resolves to `null`; the value is expected to be filled in elsewhere.
    Deferred,
}

impl DefaultValue {
    pub fn resolve(&self, type_id: &str) -> Value {
        match self {
            DefaultValue::Constant(value) => value.clone(),
            DefaultValue::Computed(compute) => compute(type_id),
            DefaultValue::Deferred => Value::Null,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            DefaultValue::Computed(_) => f.write_str("Computed(..)"),
            DefaultValue::Deferred => f.write_str("Deferred"),
        }
    }
}

/// A named, typed field of a recipe schema.
///
/// A key binds a [`Component`](crate::component::Component) to the names it
/// may appear under in a document. The first name is the primary one and is
/// used when serializing; the rest are aliases accepted when parsing, tried in
/// the order they were added.
///
/// Keys are configured through by-value builder methods before being handed
/// to a [`Schema`](crate::schema::Schema). The schema keeps its own copy, so a
/// key can no longer change once it is part of a schema.
///
/// A key with a default is *optional*: it may be missing from documents and is
/// not serialized unless it was explicitly set, or is marked
/// [`always_write`](Key::always_write).
#[derive(Clone)]
pub struct Key {
    id: KeyId,
    component: ComponentRef,
    names: Vec<String>,
    default: Option<DefaultValue>,
    excluded: bool,
    function_names: Option<Vec<String>>,
    allow_empty: bool,
    always_write: bool,
}

impl Key {
    /// Creates a required key. If `component` is an optional wrapper, its
    /// default becomes the key's constant default.
    pub fn new(name: &str, component: ComponentRef) -> Self {
        let default = component.default_value().map(DefaultValue::Constant);
        Self {
            id: KeyId::next(),
            component,
            names: vec![name.to_string()],
            default,
            excluded: false,
            function_names: None,
            allow_empty: false,
            always_write: false,
        }
    }

    /// Adds an alternate name this key may be found under.
    pub fn alt(mut self, name: &str) -> Self {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
        self
    }

    /// Adds several alternate names, skipping ones already present.
    pub fn alts<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().fold(self, Key::alt)
    }

    /// Makes the key optional with a constant default shared by every record.
    pub fn optional(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Constant(value));
        self
    }

    /// Makes the key optional with a default computed per record.
    pub fn optional_with<F>(mut self, compute: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(compute)));
        self
    }

    /// Makes the key optional with a `null` default.
    pub fn default_optional(mut self) -> Self {
        self.default = Some(DefaultValue::Deferred);
        self
    }

    /// Leaves the key out of auto-generated constructors. The key must also be
    /// optional; schemas reject excluded keys without a default.
    pub fn exclude(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Disables builder method generation for this key.
    pub fn no_functions(mut self) -> Self {
        self.function_names = Some(Vec::new());
        self
    }

    /// Sets the builder method names; the first one is the preferred name.
    pub fn function_names<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.function_names = Some(names.into_iter().map(str::to_string).collect());
        self
    }

    /// Accepts values the component would otherwise reject as empty.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Always stores and serializes this key, even when it holds its default.
    pub fn always_write(mut self) -> Self {
        self.always_write = true;
        self
    }

    /// Identity used by schemas and records to address this key.
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// The primary name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// The primary name followed by every alias, in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    /// Whether the key holds an input, an output or anything else.
    pub fn role(&self) -> ComponentRole {
        self.component.role()
    }

    /// A key is optional exactly when it has a default.
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Required keys are always included; optional ones unless excluded.
    pub fn include_in_auto_constructors(&self) -> bool {
        self.default.is_none() || !self.excluded
    }

    /// `None` means the builder name is derived from the primary name.
    pub fn function_names_list(&self) -> Option<&[String]> {
        self.function_names.as_deref()
    }

    /// The builder name documentation should recommend, or `None` when
    /// builder generation is disabled.
    pub fn preferred_builder_name(&self) -> Option<&str> {
        match &self.function_names {
            None => Some(self.name()),
            Some(names) => names.first().map(String::as_str),
        }
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn is_always_write(&self) -> bool {
        self.always_write
    }

    /// Finds this key's raw value in `document`. The first name present wins.
    pub fn lookup<'d>(&self, document: &'d Document) -> Option<(&str, &'d JsonValue)> {
        self.names
            .iter()
            .find_map(|name| document.get(name).map(|raw| (name.as_str(), raw)))
    }

    /// Runs the component read, with this key's empty handling.
    pub fn read(&self, raw: &JsonValue) -> Result<Value, ComponentReadError> {
        self.component
            .read_checked(raw, &ReadContext::allowing_empty(self.allow_empty))
            .map_err(|reason| ComponentReadError {
                key: self.name().to_string(),
                raw: raw.clone(),
                reason,
            })
    }

    /// Runs the component write; `None` means the key is left out.
    pub fn write(&self, value: &Value) -> Option<JsonValue> {
        self.component.write(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if self.is_optional() {
            write!(f, "?")?;
        }
        write!(f, ":{}", self.component.component_type())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.id)
            .field("names", &self.names)
            .field("component", &self.component.component_type())
            .field("default", &self.default)
            .field("excluded", &self.excluded)
            .field("function_names", &self.function_names)
            .field("allow_empty", &self.allow_empty)
            .field("always_write", &self.always_write)
            .finish()
    }
}
