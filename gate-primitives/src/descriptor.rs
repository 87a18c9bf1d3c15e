//! Tool descriptors shared between registries, filters, and reports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Identifier length accepted by the strictest downstream clients.
pub const DEFAULT_MAX_NAME_LEN: usize = 64;

/// Returns the length of a tool name in Unicode scalar values.
#[must_use]
pub fn name_len(name: &str) -> usize {
    name.chars().count()
}

/// Describes one named tool advertised by a registry.
///
/// Everything besides `name`, `category`, and `description` is carried as
/// opaque metadata and round-trips untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl ToolDescriptor {
    /// Creates a descriptor for the supplied tool name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let descriptor = Self {
            name: name.into(),
            category: None,
            description: None,
            metadata: Map::new(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches an opaque metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Checks invariants that deserialization cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDescriptor`] if the name is blank or the
    /// category is present but blank.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidDescriptor {
                reason: "tool name cannot be empty".into(),
            });
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| category.trim().is_empty())
        {
            return Err(Error::InvalidDescriptor {
                reason: format!("tool `{}` has an empty category", self.name),
            });
        }
        Ok(())
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional category label.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the opaque metadata map.
    #[must_use]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Length of the name as counted by downstream identifier limits.
    #[must_use]
    pub fn name_len(&self) -> usize {
        name_len(&self.name)
    }

    /// Fills in the category when none was declared.
    #[must_use]
    pub fn or_category(mut self, category: impl Into<String>) -> Self {
        if self.category.is_none() {
            self.category = Some(category.into());
        }
        self
    }
}
