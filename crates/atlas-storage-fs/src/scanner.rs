//! Content file discovery by directory listing.
//!
//! The Scanner only identifies files that could form entities, returning
//! lightweight [`SourceFile`] references. Content is read later, on demand.

use std::fs;
use std::io;
use std::path::Path;

use atlas_storage::SourceFile;

/// Discovers markdown files in a single locale directory.
///
/// Locale directories are flat: subdirectories are ignored, as are hidden
/// files and anything without a `.md` extension.
pub(crate) struct Scanner;

impl Scanner {
    /// List markdown files in `dir`, in directory enumeration order.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if `dir` cannot be read, including
    /// [`io::ErrorKind::NotFound`] when it does not exist.
    pub fn scan(dir: &Path) -> io::Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory entry, skipping");
                    continue;
                }
            };

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }

            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(name) = file_name_to_slug(&file_name) else {
                continue;
            };

            files.push(SourceFile {
                name: name.to_owned(),
                path: entry.path(),
            });
        }

        Ok(files)
    }
}

/// Convert a file name to its slug.
///
/// Returns `None` for hidden files, non-markdown files and a bare `.md`.
///
/// Examples:
/// - `intro.md` -> `Some("intro")`
/// - `getting-started.md` -> `Some("getting-started")`
/// - `.draft.md` -> `None`
/// - `logo.png` -> `None`
pub(crate) fn file_name_to_slug(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') {
        return None;
    }
    file_name.strip_suffix(".md").filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn sorted_names(files: &[SourceFile]) -> Vec<&str> {
        let mut names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_file_name_to_slug() {
        assert_eq!(file_name_to_slug("intro.md"), Some("intro"));
        assert_eq!(
            file_name_to_slug("getting-started.md"),
            Some("getting-started")
        );
        assert_eq!(file_name_to_slug("v1.2.md"), Some("v1.2"));
        assert_eq!(file_name_to_slug(".draft.md"), None);
        assert_eq!(file_name_to_slug("logo.png"), None);
        assert_eq!(file_name_to_slug("README"), None);
    }

    #[test]
    fn test_scan_finds_md_files() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("intro.md"), "# Intro").unwrap();
        fs::write(temp_dir.path().join("quickstart.md"), "# Quickstart").unwrap();

        let files = Scanner::scan(temp_dir.path()).unwrap();

        assert_eq!(sorted_names(&files), vec!["intro", "quickstart"]);
        let intro = files.iter().find(|f| f.name == "intro").unwrap();
        assert!(intro.path.ends_with("intro.md"));
    }

    #[test]
    fn test_scan_skips_hidden_and_other_files() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join(".hidden.md"), "# Hidden").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "text").unwrap();
        fs::write(temp_dir.path().join("visible.md"), "# Visible").unwrap();

        let files = Scanner::scan(temp_dir.path()).unwrap();

        assert_eq!(sorted_names(&files), vec!["visible"]);
    }

    #[test]
    fn test_scan_ignores_subdirectories() {
        let temp_dir = create_test_dir();
        let nested = temp_dir.path().join("nested.md");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("inner.md"), "# Inner").unwrap();
        fs::write(temp_dir.path().join("top.md"), "# Top").unwrap();

        let files = Scanner::scan(temp_dir.path()).unwrap();

        assert_eq!(sorted_names(&files), vec!["top"]);
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = create_test_dir();

        let files = Scanner::scan(temp_dir.path()).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_missing_dir() {
        let temp_dir = create_test_dir();

        let err = Scanner::scan(&temp_dir.path().join("missing")).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
