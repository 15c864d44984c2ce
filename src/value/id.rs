use crate::error::ComponentError;
use std::fmt;
use std::str::FromStr;

/// Namespace assumed when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced identifier of the form `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    pub fn new(namespace: &str, path: &str) -> Result<Self, ComponentError> {
        if namespace.is_empty() || !namespace.chars().all(is_namespace_char) {
            return Err(ComponentError::Invalid(format!(
                "'{}' is not a valid namespace",
                namespace
            )));
        }
        if path.is_empty() || !path.chars().all(is_path_char) {
            return Err(ComponentError::Invalid(format!(
                "'{}' is not a valid path",
                path
            )));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Parses `namespace:path`, falling back to [`DEFAULT_NAMESPACE`] when the
    /// separator is missing.
    pub fn parse(s: &str) -> Result<Self, ComponentError> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn air() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: "air".to_string(),
        }
    }

    /// `minecraft:air` stands for "no item" wherever an item is expected.
    pub fn is_air(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE && self.path == "air"
    }
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl FromStr for ResourceId {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_namespace() {
        let id = ResourceId::parse("stone").unwrap();
        assert_eq!(id.namespace(), "minecraft");
        assert_eq!(id.path(), "stone");
        assert_eq!(id.to_string(), "minecraft:stone");
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        assert!(ResourceId::parse("Minecraft:stone").is_err());
        assert!(ResourceId::parse("create:").is_err());
        assert!(ResourceId::parse("create:crushed ore").is_err());
        assert!(ResourceId::parse("create:crushing/raw_iron").is_ok());
    }

    #[test]
    fn air_detection() {
        assert!(ResourceId::parse("air").unwrap().is_air());
        assert!(!ResourceId::parse("create:air").unwrap().is_air());
    }
}
