use super::builtin::register_builtin_components;
use super::{ComponentExt, ComponentRef};
use ahash::AHashMap;

/// Dispatch table from component type names to components.
///
/// Populated once at startup with the built-in components; content packs may
/// register more. A `[]` suffix on a lookup resolves to the array form of the
/// named component.
pub struct ComponentRegistry {
    components: AHashMap<String, ComponentRef>,
}

impl ComponentRegistry {
    /// A registry holding only the built-in components.
    pub fn new() -> Self {
        let mut components = AHashMap::new();
        register_builtin_components(&mut components);
        Self { components }
    }

    /// A registry with no components at all.
    pub fn empty() -> Self {
        Self {
            components: AHashMap::new(),
        }
    }

    pub fn with_component(mut self, name: &str, component: ComponentRef) -> Self {
        self.register(name, component);
        self
    }

    /// Registers `component` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, component: ComponentRef) {
        if self
            .components
            .insert(name.to_string(), component)
            .is_some()
        {
            log::debug!("Component type '{}' was re-registered", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<ComponentRef> {
        match name.strip_suffix("[]") {
            Some(base) => self.get(base).map(|c| c.as_array()),
            None => self.components.get(name).cloned(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
