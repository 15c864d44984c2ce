use super::Schema;
use super::source::ValueSource;
use crate::error::{ConstructorArityError, MissingRequiredKeyError, RecordError};
use crate::key::Key;
use crate::record::Record;
use crate::settings::Settings;
use crate::value::Value;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Everything a factory may need besides the record and its value source.
pub struct BindContext<'a> {
    pub schema: &'a Schema,
    pub type_id: &'a str,
    pub settings: &'a Settings,
}

/// Binds values from a source onto a record under construction.
pub trait ConstructorFactory: Send + Sync {
    fn bind(
        &self,
        cx: &BindContext<'_>,
        record: &mut Record,
        keys: &[&Key],
        source: &dyn ValueSource,
    ) -> Result<(), RecordError>;
}

/// Reads every bound key from the source through its component.
///
/// A key the source has no value for is left unset when optional and is a
/// [`MissingRequiredKeyError`] otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFactory;

impl ConstructorFactory for DefaultFactory {
    fn bind(
        &self,
        _cx: &BindContext<'_>,
        record: &mut Record,
        keys: &[&Key],
        source: &dyn ValueSource,
    ) -> Result<(), RecordError> {
        for key in keys {
            match source.value(key) {
                Some(raw) => record.read_and_set(key, raw)?,
                None if key.is_optional() => {}
                None => {
                    return Err(MissingRequiredKeyError {
                        key: key.name().to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// Supplies a value for a key that a constructor does not bind.
pub type ValueSupplier = Arc<dyn Fn(&Record, &Key) -> Option<Value> + Send + Sync>;

/// Binds like [`DefaultFactory`], then asks a supplier for every schema key
/// outside the bound list and stores whatever it returns.
#[derive(Clone)]
pub struct SupplementedFactory {
    supplier: ValueSupplier,
}

impl SupplementedFactory {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn(&Record, &Key) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            supplier: Arc::new(supplier),
        }
    }
}

impl ConstructorFactory for SupplementedFactory {
    fn bind(
        &self,
        cx: &BindContext<'_>,
        record: &mut Record,
        keys: &[&Key],
        source: &dyn ValueSource,
    ) -> Result<(), RecordError> {
        DefaultFactory.bind(cx, record, keys, source)?;

        for key in cx.schema.keys() {
            if keys.iter().any(|k| k.id() == key.id()) {
                continue;
            }
            if let Some(value) = (self.supplier)(record, key) {
                record.set(key, value)?;
            }
        }
        Ok(())
    }
}

/// An arity-specific binding of positional values onto schema keys.
#[derive(Clone)]
pub struct Constructor {
    slots: Vec<usize>,
    factory: Arc<dyn ConstructorFactory>,
    custom: bool,
}

impl Constructor {
    pub(super) fn new(slots: Vec<usize>, factory: Arc<dyn ConstructorFactory>, custom: bool) -> Self {
        Self {
            slots,
            factory,
            custom,
        }
    }

    /// Number of positional arguments this constructor takes.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Whether this constructor was registered explicitly rather than generated.
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Slot indices of the bound keys, in argument order.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn keys<'s>(&self, schema: &'s Schema) -> Vec<&'s Key> {
        self.slots.iter().map(|&slot| &schema.keys()[slot]).collect()
    }

    pub fn bind(
        &self,
        cx: &BindContext<'_>,
        record: &mut Record,
        source: &dyn ValueSource,
    ) -> Result<(), RecordError> {
        let keys = self.keys(cx.schema);
        self.factory.bind(cx, record, &keys, source)
    }

    /// Renders the signature, e.g. `(result:output_item, xp?:float)`.
    pub fn describe(&self, schema: &Schema) -> String {
        format!("({})", self.keys(schema).iter().join(", "))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("slots", &self.slots)
            .field("custom", &self.custom)
            .finish()
    }
}

/// Constructors of one schema, indexed by arity.
#[derive(Debug, Clone, Default)]
pub struct ConstructorTable {
    by_arity: BTreeMap<usize, Constructor>,
}

impl ConstructorTable {
    pub(super) fn insert(&mut self, constructor: Constructor) {
        self.by_arity.insert(constructor.arity(), constructor);
    }

    pub(super) fn contains(&self, arity: usize) -> bool {
        self.by_arity.contains_key(&arity)
    }

    pub fn get(&self, arity: usize) -> Option<&Constructor> {
        self.by_arity.get(&arity)
    }

    /// Picks the constructor for exactly `arity` arguments.
    pub fn select(&self, arity: usize) -> Result<&Constructor, ConstructorArityError> {
        self.get(arity).ok_or(ConstructorArityError {
            received: arity,
            min: self.min_arity().unwrap_or(0),
            max: self.max_arity().unwrap_or(0),
        })
    }

    pub fn min_arity(&self) -> Option<usize> {
        self.by_arity.keys().next().copied()
    }

    pub fn max_arity(&self) -> Option<usize> {
        self.by_arity.keys().next_back().copied()
    }

    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_arity.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Constructor)> {
        self.by_arity.iter().map(|(arity, c)| (*arity, c))
    }

    pub fn len(&self) -> usize {
        self.by_arity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_arity.is_empty()
    }
}
