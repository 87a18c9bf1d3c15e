//! Allow-list parsing and loading.
//!
//! File format: UTF-8 text, one tool name per line. Lines are trimmed; blank
//! lines and lines whose first non-blank character is `#` are skipped. There
//! is no inline comment syntax, so a `#` after a name stays part of the name.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{AllowListError, AllowListResult};

const COMMENT_MARKER: char = '#';

/// Immutable set of permitted tool names loaded from one source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: BTreeSet<String>,
}

/// Builds an [`AllowList`] from raw lines without touching the filesystem.
pub fn parse_lines<I, S>(lines: I) -> AllowList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let entries = lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                None
            } else {
                Some(line.to_owned())
            }
        })
        .collect();
    AllowList { entries }
}

impl AllowList {
    /// Parses allow-list text. `\n`, `\r\n`, and bare `\r` all end a line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        parse_lines(text.split(['\r', '\n']))
    }

    /// Reads and parses the allow-list file at `path`.
    ///
    /// A file without any tool names is valid but hides every tool; it is
    /// logged as a warning naming the path.
    ///
    /// # Errors
    ///
    /// Returns [`AllowListError::NotFound`] when the path does not exist and
    /// [`AllowListError::Unreadable`] for any other read failure, including
    /// permission errors and invalid UTF-8.
    pub fn load(path: impl AsRef<Path>) -> AllowListResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AllowListError::NotFound {
                path: path.to_path_buf(),
            },
            _ => AllowListError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let allow_list = Self::parse(&text);
        info!(path = %path.display(), entries = allow_list.len(), "allow-list loaded");
        if allow_list.is_empty() {
            warn!(
                path = %path.display(),
                "allow-list has no tool names; every tool will be hidden"
            );
        }
        Ok(allow_list)
    }

    /// Returns `true` if `name` is permitted. Matching is exact and
    /// case-sensitive.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the list permits nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Whether a filter is configured, and if so which names it permits.
///
/// `Filter` with an empty list hides every tool; it is never treated as
/// `NoFilter`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AllowListState {
    /// No allow-list was supplied; every tool passes.
    #[default]
    NoFilter,
    /// Only names in the list pass.
    Filter(AllowList),
}

impl AllowListState {
    /// Resolves the state for an optional allow-list path.
    ///
    /// `None` yields [`AllowListState::NoFilter`]. A supplied path that fails
    /// to load is an error, never a fallback to `NoFilter`. An empty list is
    /// accepted; [`AllowList::load`] logs it as a warning.
    ///
    /// # Errors
    ///
    /// Propagates [`AllowList::load`] failures.
    pub fn from_source(path: Option<&Path>) -> AllowListResult<Self> {
        let Some(path) = path else {
            info!("no allow-list configured; advertising every tool");
            return Ok(Self::NoFilter);
        };

        Ok(Self::Filter(AllowList::load(path)?))
    }

    /// Returns `true` if a tool named `name` passes this state.
    #[must_use]
    pub fn permits(&self, name: &str) -> bool {
        match self {
            Self::NoFilter => true,
            Self::Filter(allow_list) => allow_list.contains(name),
        }
    }

    /// Returns the configured list, if any.
    #[must_use]
    pub fn allow_list(&self) -> Option<&AllowList> {
        match self {
            Self::NoFilter => None,
            Self::Filter(allow_list) => Some(allow_list),
        }
    }

    /// Returns `true` for [`AllowListState::Filter`], empty or not.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Filter(_))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    const LITERATURE: &str = "# Literature search tools\n\
                              ArXiv_search_papers\n\
                              SemanticScholar_search_papers\n\
                              PubMed_search_articles\n";

    #[test]
    fn parses_literature_example() {
        let list = AllowList::parse(LITERATURE);
        let names: Vec<_> = list.iter().collect();
        assert_eq!(
            names,
            [
                "ArXiv_search_papers",
                "PubMed_search_articles",
                "SemanticScholar_search_papers",
            ]
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_lines(["  Name  "]), parse_lines(["Name"]));
        assert!(parse_lines(["\tName\t"]).contains("Name"));
    }

    #[test]
    fn comments_and_blanks_yield_empty_list() {
        let list = AllowList::parse("# header\n\n   \n   # indented comment\n");
        assert!(list.is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let list = parse_lines(["a", "b", " a", "a "]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn inline_hash_is_kept_verbatim() {
        let list = AllowList::parse("tool_a # trailing note\n");
        assert!(list.contains("tool_a # trailing note"));
        assert!(!list.contains("tool_a"));
    }

    #[test]
    fn all_line_endings_split() {
        let list = AllowList::parse("one\r\ntwo\rthree\nfour");
        assert_eq!(list.len(), 4);
        assert!(list.contains("two"));
        assert!(list.contains("four"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let list = parse_lines(["PubMed_search_articles"]);
        assert!(!list.contains("pubmed_search_articles"));
    }

    #[test]
    fn missing_file_is_not_found_with_path() {
        let err = AllowList::load("/no/such/file.txt").expect_err("missing file");
        assert!(matches!(&err, AllowListError::NotFound { .. }));
        assert_eq!(err.path(), Path::new("/no/such/file.txt"));
        assert!(err.to_string().contains("/no/such/file.txt"));
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = AllowList::load(dir.path()).expect_err("directory is not a file");
        assert!(matches!(err, AllowListError::Unreadable { .. }));
    }

    #[test]
    fn invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.txt");
        fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();

        let err = AllowList::load(&path).expect_err("invalid utf-8");
        assert!(matches!(err, AllowListError::Unreadable { .. }));
    }

    #[test]
    fn empty_file_is_configured_but_restrictive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.txt");
        fs::write(&path, "# nothing enabled yet\n\n").unwrap();

        let state = AllowListState::from_source(Some(&path)).unwrap();
        assert!(state.is_configured());
        assert!(state.allow_list().is_some_and(AllowList::is_empty));
        assert!(!state.permits("anything"));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logs_while<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        let value = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (value, logs)
    }

    #[test]
    fn empty_file_warns_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.txt");
        fs::write(&path, "# nothing enabled yet\n").unwrap();

        let (state, logs) = logs_while(|| AllowListState::from_source(Some(&path)));
        assert!(state.unwrap().is_configured());
        let warning = logs
            .lines()
            .find(|line| line.contains("WARN"))
            .expect("empty allow-list warning");
        assert!(warning.contains("every tool will be hidden"));
        assert!(warning.contains("tools.txt"));
    }

    #[test]
    fn non_empty_file_does_not_warn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.txt");
        fs::write(&path, "ArXiv_search_papers\n").unwrap();

        let (list, logs) = logs_while(|| AllowList::load(&path));
        assert_eq!(list.unwrap().len(), 1);
        assert!(!logs.contains("WARN"));
    }

    #[test]
    fn absent_source_is_identity() {
        let state = AllowListState::from_source(None).unwrap();
        assert_eq!(state, AllowListState::NoFilter);
        assert!(state.permits("anything"));
    }

    #[test]
    fn supplied_but_missing_source_never_fails_open() {
        let err = AllowListState::from_source(Some(Path::new("/no/such/file.txt")))
            .expect_err("must not fall back to NoFilter");
        assert!(matches!(err, AllowListError::NotFound { .. }));
    }
}
