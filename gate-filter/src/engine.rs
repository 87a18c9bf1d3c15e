//! Filter engine and the reloadable allow-list handle.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use gate_primitives::{CategoryScope, ToolDescriptor};
use gate_registry::ToolSource;
use tracing::{debug, info};

use crate::allowlist::AllowListState;
use crate::error::AllowListResult;

/// Keeps the descriptors permitted by `state`, in their original order.
///
/// [`AllowListState::NoFilter`] returns the input unchanged. Duplicate names
/// are evaluated independently and are not collapsed.
#[must_use]
pub fn apply(tools: &[ToolDescriptor], state: &AllowListState) -> Vec<ToolDescriptor> {
    match state {
        AllowListState::NoFilter => tools.to_vec(),
        AllowListState::Filter(allow_list) => tools
            .iter()
            .filter(|tool| allow_list.contains(tool.name()))
            .cloned()
            .collect(),
    }
}

/// Shared, swappable allow-list state.
///
/// Readers take an [`Arc`] snapshot and never observe a partially updated
/// list; reloads replace the whole state.
#[derive(Debug)]
pub struct AllowListHandle {
    origin: Option<PathBuf>,
    current: RwLock<Arc<AllowListState>>,
}

impl AllowListHandle {
    /// Loads the initial state from an optional allow-list path.
    ///
    /// # Errors
    ///
    /// Propagates load failures from [`AllowListState::from_source`].
    pub fn load(origin: Option<PathBuf>) -> AllowListResult<Self> {
        let state = AllowListState::from_source(origin.as_deref())?;
        Ok(Self {
            origin,
            current: RwLock::new(Arc::new(state)),
        })
    }

    /// Wraps an already-built state that has no backing file.
    #[must_use]
    pub fn fixed(state: AllowListState) -> Self {
        Self {
            origin: None,
            current: RwLock::new(Arc::new(state)),
        }
    }

    /// Path the state is reloaded from, if any.
    #[must_use]
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Returns the state currently in effect.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock has been poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AllowListState> {
        let guard = self.current.read().expect("allow-list state poisoned");
        Arc::clone(&*guard)
    }

    /// Swaps in `state` and returns the previous one.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock has been poisoned.
    pub fn replace(&self, state: AllowListState) -> Arc<AllowListState> {
        let mut guard = self.current.write().expect("allow-list state poisoned");
        std::mem::replace(&mut *guard, Arc::new(state))
    }

    /// Re-reads the origin file and swaps the result in.
    ///
    /// Without an origin this is a no-op returning the current state. On
    /// failure the previous state stays active.
    ///
    /// # Errors
    ///
    /// Propagates load failures from [`AllowListState::from_source`].
    pub fn reload(&self) -> AllowListResult<Arc<AllowListState>> {
        let Some(origin) = self.origin.as_deref() else {
            debug!("reload requested without an allow-list file");
            return Ok(self.snapshot());
        };

        let state = Arc::new(AllowListState::from_source(Some(origin))?);
        {
            let mut guard = self.current.write().expect("allow-list state poisoned");
            *guard = Arc::clone(&state);
        }
        info!(path = %origin.display(), "allow-list reloaded");
        Ok(state)
    }
}

/// A [`ToolSource`] decorator advertising only permitted tools.
pub struct FilteredRegistry<S> {
    source: S,
    allow_list: Arc<AllowListHandle>,
}

impl<S: ToolSource> FilteredRegistry<S> {
    /// Wraps `source` with the given allow-list handle.
    pub fn new(source: S, allow_list: Arc<AllowListHandle>) -> Self {
        Self { source, allow_list }
    }

    /// Returns the unfiltered source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the shared allow-list handle.
    pub fn allow_list(&self) -> &Arc<AllowListHandle> {
        &self.allow_list
    }
}

impl<S: ToolSource> ToolSource for FilteredRegistry<S> {
    fn list_tools(&self, scope: &CategoryScope) -> Vec<ToolDescriptor> {
        let state = self.allow_list.snapshot();
        let tools = self.source.list_tools(scope);
        let total = tools.len();
        let advertised = apply(&tools, &state);
        debug!(total, advertised = advertised.len(), "filtered tool listing");
        advertised
    }
}
