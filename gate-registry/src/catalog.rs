//! JSON catalog loading.
//!
//! A catalog is either a single file holding a JSON array of descriptors or a
//! directory of such files. In the directory form each file stands for one
//! category: descriptors that do not declare a category inherit the file stem.

use std::fs;
use std::path::{Path, PathBuf};

use gate_primitives::ToolDescriptor;
use tracing::{debug, info};

use crate::registry::{RegistryError, RegistryResult, ToolRegistry};

/// Loads a catalog file or directory into a new registry.
///
/// Directory entries are read in file-name order so the resulting registry
/// order is stable across platforms.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] or [`RegistryError::Parse`] naming the
/// failing path, and propagates duplicate or invalid descriptors.
pub fn load_catalog(path: impl AsRef<Path>) -> RegistryResult<ToolRegistry> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;

    let registry = ToolRegistry::new();
    if metadata.is_dir() {
        for file in catalog_files(path)? {
            let category = file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
            for descriptor in read_descriptors(&file)? {
                let descriptor = match &category {
                    Some(category) => descriptor.or_category(category.clone()),
                    None => descriptor,
                };
                registry.register(descriptor)?;
            }
        }
    } else {
        for descriptor in read_descriptors(path)? {
            registry.register(descriptor)?;
        }
    }

    info!(path = %path.display(), tools = registry.len(), "tool catalog loaded");
    Ok(registry)
}

fn catalog_files(dir: &Path) -> RegistryResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| io_error(dir, source))? {
        let entry = entry.map_err(|source| io_error(dir, source))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_descriptors(path: &Path) -> RegistryResult<Vec<ToolDescriptor>> {
    let data = fs::read(path).map_err(|source| io_error(path, source))?;
    let descriptors: Vec<ToolDescriptor> =
        serde_json::from_slice(&data).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), count = descriptors.len(), "read catalog file");
    Ok(descriptors)
}

fn io_error(path: &Path, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolSource;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn single_file_keeps_declared_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tools.json",
            r#"[
                {"name": "ArXiv_search_papers", "category": "literature"},
                {"name": "Other_tool", "type": "Local"}
            ]"#,
        );

        let registry = load_catalog(&path).unwrap();
        let tools = registry.all_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].category(), Some("literature"));
        assert_eq!(tools[1].category(), None);
    }

    #[test]
    fn directory_files_load_in_name_order_with_stem_categories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "safety.json", r#"[{"name": "FAERS_count"}]"#);
        write(
            dir.path(),
            "literature.json",
            r#"[{"name": "PubMed_search_articles"}, {"name": "Tagged", "category": "custom"}]"#,
        );
        write(dir.path(), "notes.txt", "ignored");

        let registry = load_catalog(dir.path()).unwrap();
        let tools = registry.all_tools();
        let summary: Vec<_> = tools
            .iter()
            .map(|t| (t.name(), t.category().unwrap_or_default()))
            .collect();
        assert_eq!(
            summary,
            [
                ("PubMed_search_articles", "literature"),
                ("Tagged", "custom"),
                ("FAERS_count", "safety"),
            ]
        );
    }

    #[test]
    fn malformed_catalog_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "broken.json", "{\"name\": \"not-an-array\"}");

        let err = load_catalog(&path).expect_err("object is not a catalog");
        assert!(matches!(&err, RegistryError::Parse { path: p, .. } if p == &path));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_catalog_is_io_error() {
        let err = load_catalog("/no/such/catalog.json").expect_err("missing path");
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn duplicate_across_files_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"[{"name": "dup"}]"#);
        write(dir.path(), "b.json", r#"[{"name": "dup"}]"#);

        let err = load_catalog(dir.path()).expect_err("duplicate");
        assert!(matches!(err, RegistryError::DuplicateTool { name } if name == "dup"));
    }
}
