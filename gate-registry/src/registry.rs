//! In-memory tool catalog that preserves registration order.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use gate_primitives::{CategoryScope, ToolDescriptor};
use thiserror::Error;

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Read-only view over a set of advertised tools.
///
/// Implementations must return descriptors in their native order and must not
/// mutate state while answering.
pub trait ToolSource: Send + Sync {
    /// Lists the descriptors admitted by `scope`.
    fn list_tools(&self, scope: &CategoryScope) -> Vec<ToolDescriptor>;

    /// Lists every descriptor.
    fn all_tools(&self) -> Vec<ToolDescriptor> {
        self.list_tools(&CategoryScope::all())
    }
}

#[derive(Default)]
struct Catalog {
    order: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

/// Registry that stores tool descriptors keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    inner: RwLock<Catalog>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().expect("tool registry poisoned");
        let names: Vec<_> = inner.order.iter().map(ToolDescriptor::name).collect();
        f.debug_struct("ToolRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from descriptors, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`ToolRegistry::register`].
    pub fn from_descriptors<I>(descriptors: I) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = ToolDescriptor>,
    {
        let registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Appends a descriptor to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidDescriptor`] if the descriptor fails
    /// validation, or [`RegistryError::DuplicateTool`] if the name is already
    /// present.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register(&self, descriptor: ToolDescriptor) -> RegistryResult<()> {
        descriptor.validate()?;

        let mut inner = self.inner.write().expect("tool registry poisoned");
        let name = descriptor.name().to_owned();
        if inner.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool { name });
        }

        let position = inner.order.len();
        inner.order.push(descriptor);
        inner.index.insert(name, position);
        Ok(())
    }

    /// Returns the descriptor matching the supplied name.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ToolDescriptor> {
        let inner = self.inner.read().expect("tool registry poisoned");
        let position = *inner.index.get(name)?;
        inner.order.get(position).cloned()
    }

    /// Returns `true` if a tool with this exact name is registered.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .expect("tool registry poisoned")
            .index
            .contains_key(name)
    }

    /// Number of registered tools.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("tool registry poisoned").order.len()
    }

    /// Returns `true` when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToolSource for ToolRegistry {
    fn list_tools(&self, scope: &CategoryScope) -> Vec<ToolDescriptor> {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner
            .order
            .iter()
            .filter(|descriptor| scope.admits(descriptor))
            .cloned()
            .collect()
    }
}

/// Errors produced while building or loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Descriptor failed validation.
    #[error(transparent)]
    InvalidDescriptor(#[from] gate_primitives::Error),

    /// Tool name collided with an existing registration.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },

    /// Catalog path could not be read.
    #[error("failed to read tool catalog `{}`: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Catalog file did not contain a JSON array of descriptors.
    #[error("failed to parse tool catalog `{}`: {source}", path.display())]
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
