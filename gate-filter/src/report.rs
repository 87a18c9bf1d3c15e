//! Operator reports: tool listings, allow-list validation, and name-length
//! checks against a downstream identifier limit.
//!
//! Reports only read from a [`ToolSource`]. Findings are advisory and never
//! turn into errors.

use std::collections::HashSet;
use std::fmt;

use gate_primitives::{CategoryScope, ToolDescriptor, name_len};
use gate_registry::ToolSource;
use serde::Serialize;
use tracing::warn;

use crate::allowlist::AllowList;

/// One row of a tool listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Tool name.
    pub name: String,
    /// Category label, if the tool declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Name length in characters.
    pub name_len: usize,
    /// Whether the name is longer than the configured limit.
    pub exceeds_limit: bool,
}

impl ListingEntry {
    fn from_descriptor(descriptor: &ToolDescriptor, max_name_len: usize) -> Self {
        let name_len = descriptor.name_len();
        Self {
            name: descriptor.name().to_owned(),
            category: descriptor.category().map(str::to_owned),
            name_len,
            exceeds_limit: name_len > max_name_len,
        }
    }
}

/// Enumeration of tools, optionally scoped to one category.
#[derive(Clone, Debug, Serialize)]
pub struct Listing {
    /// Category the listing was scoped to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Limit used to flag long names.
    pub max_name_len: usize,
    /// Rows in source order.
    pub tools: Vec<ListingEntry>,
}

impl Listing {
    /// Number of rows over the limit.
    #[must_use]
    pub fn over_limit(&self) -> usize {
        self.tools.iter().filter(|entry| entry.exceeds_limit).count()
    }
}

/// Lists the tools admitted by `scope` in source order.
pub fn list_tools<S>(source: &S, scope: &CategoryScope, max_name_len: usize) -> Listing
where
    S: ToolSource + ?Sized,
{
    let tools = source
        .list_tools(scope)
        .iter()
        .map(|descriptor| ListingEntry::from_descriptor(descriptor, max_name_len))
        .collect();
    Listing {
        category: scope.category().map(str::to_owned),
        max_name_len,
        tools,
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .tools
            .iter()
            .map(|entry| entry.name_len)
            .chain(std::iter::once("NAME".len()))
            .max()
            .unwrap_or_default();
        let category_width = self
            .tools
            .iter()
            .filter_map(|entry| entry.category.as_deref().map(name_len))
            .chain(std::iter::once("CATEGORY".len()))
            .max()
            .unwrap_or_default();

        writeln!(f, "{:<name_width$}  {:<category_width$}  LEN", "NAME", "CATEGORY")?;
        for entry in &self.tools {
            let marker = if entry.exceeds_limit { "  !" } else { "" };
            writeln!(
                f,
                "{:<name_width$}  {:<category_width$}  {:>3}{marker}",
                entry.name,
                entry.category.as_deref().unwrap_or("-"),
                entry.name_len,
            )?;
        }
        write!(
            f,
            "{} tools, {} over the {}-character limit",
            self.tools.len(),
            self.over_limit(),
            self.max_name_len
        )?;
        if let Some(category) = &self.category {
            write!(f, " (category `{category}`)")?;
        }
        Ok(())
    }
}

/// Validation outcome for one allow-list entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryCheck {
    /// Entry as written in the allow-list.
    pub name: String,
    /// Whether the registry advertises a tool with this exact name.
    pub found: bool,
    /// Name length in characters.
    pub name_len: usize,
    /// Whether the name is longer than the configured limit.
    pub exceeds_limit: bool,
}

/// Per-entry validation of an allow-list against a registry.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationReport {
    /// Limit used to flag long names.
    pub max_name_len: usize,
    /// One check per allow-list entry, in lexical order.
    pub entries: Vec<EntryCheck>,
}

impl ValidationReport {
    /// Entries that no registry tool matches.
    pub fn missing(&self) -> impl Iterator<Item = &EntryCheck> {
        self.entries.iter().filter(|entry| !entry.found)
    }

    /// Entries longer than the limit.
    pub fn too_long(&self) -> impl Iterator<Item = &EntryCheck> {
        self.entries.iter().filter(|entry| entry.exceeds_limit)
    }

    /// Returns `true` if any entry produced a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| !entry.found || entry.exceeds_limit)
    }
}

/// Checks every allow-list entry for registry presence and name length.
///
/// Each finding is logged at `warn` level.
pub fn validate<S>(allow_list: &AllowList, source: &S, max_name_len: usize) -> ValidationReport
where
    S: ToolSource + ?Sized,
{
    let known: HashSet<String> = source
        .all_tools()
        .into_iter()
        .map(|descriptor| descriptor.name().to_owned())
        .collect();

    let entries = allow_list
        .iter()
        .map(|name| {
            let length = name_len(name);
            let check = EntryCheck {
                name: name.to_owned(),
                found: known.contains(name),
                name_len: length,
                exceeds_limit: length > max_name_len,
            };
            if !check.found {
                warn!(tool = name, "allow-list entry not found in registry");
            }
            if check.exceeds_limit {
                warn!(tool = name, length, max_name_len, "allow-list entry exceeds name limit");
            }
            check
        })
        .collect();

    ValidationReport {
        max_name_len,
        entries,
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let presence = if entry.found { "found" } else { "missing" };
            let length = if entry.exceeds_limit { "too long" } else { "ok" };
            writeln!(
                f,
                "{:<7}  {:<8}  {:>3}  {}",
                presence, length, entry.name_len, entry.name
            )?;
        }
        write!(
            f,
            "{} entries, {} missing, {} over the {}-character limit",
            self.entries.len(),
            self.missing().count(),
            self.too_long().count(),
            self.max_name_len
        )
    }
}

/// Split of registry names by the length limit.
#[derive(Clone, Debug, Serialize)]
pub struct LengthCheck {
    /// Limit applied.
    pub max_name_len: usize,
    /// Names within the limit, in source order.
    pub valid: Vec<String>,
    /// Names over the limit, sorted.
    pub invalid: Vec<String>,
}

impl LengthCheck {
    /// Returns `true` when no name exceeds the limit.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Scans every tool name in `source` against `max_name_len`.
pub fn check_name_lengths<S>(source: &S, max_name_len: usize) -> LengthCheck
where
    S: ToolSource + ?Sized,
{
    let (valid, mut invalid): (Vec<_>, Vec<_>) = source
        .all_tools()
        .into_iter()
        .map(|descriptor| descriptor.name().to_owned())
        .partition(|name| name_len(name) <= max_name_len);
    invalid.sort();

    LengthCheck {
        max_name_len,
        valid,
        invalid,
    }
}

impl fmt::Display for LengthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Max allowed length: {}", self.max_name_len)?;
        writeln!(
            f,
            "Total tools scanned: {}",
            self.valid.len() + self.invalid.len()
        )?;
        writeln!(f, "Valid (<={}): {}", self.max_name_len, self.valid.len())?;
        write!(f, "Invalid (>{}): {}", self.max_name_len, self.invalid.len())?;
        if !self.invalid.is_empty() {
            write!(f, "\n\nInvalid tool names:")?;
            for name in &self.invalid {
                write!(f, "\n  - {name} ({} chars)", name_len(name))?;
            }
        }
        Ok(())
    }
}
