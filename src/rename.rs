//! Strip download prefixes from session file names
//!
//! Files such as `Course 101 - Ses1.1sum.pdf` are renamed to `Ses1.1sum.pdf`
//! so the merge step can find them.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::session::find_session_name;

/// A single planned or performed rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Canonical name for `name`, or `None` when it should be left alone
///
/// Only names containing `Ses` and ending in `.pdf` are considered. The new
/// name is everything from the first session token onwards.
pub fn canonical_name(name: &str) -> Option<&str> {
    if !name.ends_with(".pdf") || !name.contains("Ses") {
        return None;
    }

    let (offset, _) = find_session_name(name)?;
    (offset > 0).then(|| &name[offset..])
}

/// List the renames that [`rename_sessions`] would perform in `dir`
pub fn plan_renames(dir: &Path) -> Result<Vec<Rename>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();

    Ok(names
        .iter()
        .filter_map(|name| {
            canonical_name(name).map(|target| Rename {
                from: dir.join(name),
                to: dir.join(target),
            })
        })
        .collect())
}

/// Rename every prefixed session file in `dir` in place
///
/// A rename whose target already exists is skipped with a warning rather than
/// overwriting the existing file. Returns the renames actually performed.
pub fn rename_sessions(dir: &Path) -> Result<Vec<Rename>> {
    let mut done = Vec::new();

    for rename in plan_renames(dir)? {
        if rename.to.exists() {
            warn!(
                from = %rename.from.display(),
                to = %rename.to.display(),
                "target already exists, skipping"
            );
            continue;
        }

        fs::rename(&rename.from, &rename.to)?;
        info!(from = %rename.from.display(), to = %rename.to.display(), "renamed");
        done.push(rename);
    }

    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("Course - Ses1.1sum.pdf"), Some("Ses1.1sum.pdf"));
        assert_eq!(canonical_name("x_Ses2.10prob.pdf"), Some("Ses2.10prob.pdf"));
    }

    #[test]
    fn test_canonical_name_leaves_others_alone() {
        assert_eq!(canonical_name("Ses1.1sum.pdf"), None);
        assert_eq!(canonical_name("Course - Ses1.1sum.PDF"), None);
        assert_eq!(canonical_name("Course - ses1.1sum.pdf"), None);
        assert_eq!(canonical_name("Session notes.pdf"), None);
        assert_eq!(canonical_name("Course - Ses1.1summary.pdf"), None);
    }

    #[test]
    fn test_rename_sessions_in_place() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A - Ses1.1sum.pdf"), b"a").unwrap();
        fs::write(dir.path().join("Ses1.2prob.pdf"), b"b").unwrap();
        fs::write(dir.path().join("notes.txt"), b"c").unwrap();

        let done = rename_sessions(dir.path()).unwrap();
        assert_eq!(done.len(), 1);
        assert!(dir.path().join("Ses1.1sum.pdf").exists());
        assert!(!dir.path().join("A - Ses1.1sum.pdf").exists());
        assert!(dir.path().join("Ses1.2prob.pdf").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_rename_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Ses1.1sum.pdf"), b"original").unwrap();
        fs::write(dir.path().join("copy Ses1.1sum.pdf"), b"copy").unwrap();

        let done = rename_sessions(dir.path()).unwrap();
        assert!(done.is_empty());
        assert_eq!(fs::read(dir.path().join("Ses1.1sum.pdf")).unwrap(), b"original");
        assert!(dir.path().join("copy Ses1.1sum.pdf").exists());
    }

    #[test]
    fn test_plan_renames_touches_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("B Ses3.1prob.pdf"), b"b").unwrap();

        let plan = plan_renames(dir.path()).unwrap();
        assert_eq!(
            plan,
            vec![Rename {
                from: dir.path().join("B Ses3.1prob.pdf"),
                to: dir.path().join("Ses3.1prob.pdf"),
            }]
        );
        assert!(dir.path().join("B Ses3.1prob.pdf").exists());
    }
}
