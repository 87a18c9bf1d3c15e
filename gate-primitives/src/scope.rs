//! Category scoping shared by registry queries and listing reports.

use crate::ToolDescriptor;

/// Optional exact-match category predicate.
///
/// An unscoped value admits every descriptor, including those without a
/// category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryScope(Option<String>);

impl CategoryScope {
    /// Scope admitting every descriptor.
    #[must_use]
    pub const fn all() -> Self {
        Self(None)
    }

    /// Scope admitting only descriptors whose category equals `category`.
    #[must_use]
    pub fn only(category: impl Into<String>) -> Self {
        Self(Some(category.into()))
    }

    /// Returns the scoped category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns `true` when `descriptor` falls inside the scope.
    #[must_use]
    pub fn admits(&self, descriptor: &ToolDescriptor) -> bool {
        self.0
            .as_deref()
            .is_none_or(|expected| descriptor.category() == Some(expected))
    }
}

impl From<Option<String>> for CategoryScope {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_match_is_exact() {
        let tool = ToolDescriptor::new("x").unwrap().with_category("literature");
        let untagged = ToolDescriptor::new("y").unwrap();

        assert!(CategoryScope::all().admits(&tool));
        assert!(CategoryScope::all().admits(&untagged));
        assert!(CategoryScope::only("literature").admits(&tool));
        assert!(!CategoryScope::only("Literature").admits(&tool));
        assert!(!CategoryScope::only("literature").admits(&untagged));
    }
}
