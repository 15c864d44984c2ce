use super::ResourceId;
use crate::error::ComponentError;
use std::fmt;

/// What an input slot matches: a single item or every item in a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ingredient {
    Item(ResourceId),
    Tag(ResourceId),
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ingredient::Item(id) => write!(f, "{}", id),
            Ingredient::Tag(id) => write!(f, "#{}", id),
        }
    }
}

/// A recipe input: an ingredient and how many of it are consumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputItem {
    pub ingredient: Ingredient,
    pub count: u32,
}

impl InputItem {
    pub fn new(ingredient: Ingredient, count: u32) -> Self {
        Self { ingredient, count }
    }

    pub fn item(id: ResourceId) -> Self {
        Self::new(Ingredient::Item(id), 1)
    }

    pub fn tag(id: ResourceId) -> Self {
        Self::new(Ingredient::Tag(id), 1)
    }

    /// The input that matches nothing.
    pub fn empty() -> Self {
        Self::new(Ingredient::Item(ResourceId::air()), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || matches!(&self.ingredient, Ingredient::Item(id) if id.is_air())
    }

    /// Parses the shorthand forms `id`, `#tag` and `Nx id`.
    pub fn parse(s: &str) -> Result<Self, ComponentError> {
        let (count, rest) = split_count(s.trim())?;
        let ingredient = match rest.strip_prefix('#') {
            Some(tag) => Ingredient::Tag(ResourceId::parse(tag)?),
            None => Ingredient::Item(ResourceId::parse(rest)?),
        };
        Ok(Self::new(ingredient, count))
    }
}

impl fmt::Display for InputItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}", self.ingredient)
        } else {
            write!(f, "{}x {}", self.count, self.ingredient)
        }
    }
}

/// A recipe result: an item stack with an optional roll chance and NBT data.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub item: ResourceId,
    pub count: u32,
    pub chance: Option<f64>,
    pub nbt: Option<String>,
}

impl OutputItem {
    pub fn new(item: ResourceId, count: u32) -> Self {
        Self {
            item,
            count,
            chance: None,
            nbt: None,
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn with_nbt(mut self, nbt: impl Into<String>) -> Self {
        self.nbt = Some(nbt.into());
        self
    }

    pub fn empty() -> Self {
        Self::new(ResourceId::air(), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item.is_air()
    }

    pub fn has_chance(&self) -> bool {
        self.chance.is_some()
    }

    /// Parses the shorthand forms `id` and `Nx id`.
    pub fn parse(s: &str) -> Result<Self, ComponentError> {
        let (count, rest) = split_count(s.trim())?;
        if rest.starts_with('#') {
            return Err(ComponentError::Invalid(format!(
                "tag '{}' cannot be used as a result",
                rest
            )));
        }
        Ok(Self::new(ResourceId::parse(rest)?, count))
    }
}

impl fmt::Display for OutputItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 1 {
            write!(f, "{}x ", self.count)?;
        }
        write!(f, "{}", self.item)?;
        if let Some(chance) = self.chance {
            write!(f, " ({}%)", chance * 100.0)?;
        }
        Ok(())
    }
}

/// Splits a leading `Nx ` count prefix off an item string.
fn split_count(s: &str) -> Result<(u32, &str), ComponentError> {
    if let Some((head, rest)) = s.split_once(' ') {
        if let Some(digits) = head.strip_suffix('x') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                let count = digits.parse::<u32>().map_err(|e| {
                    ComponentError::Invalid(format!("invalid count '{}': {}", digits, e))
                })?;
                return Ok((count, rest.trim_start()));
            }
        }
    }
    Ok((1, s))
}
