//! Session discovery across the summary and problem directories

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::session::{parse_session_filename, DocumentKind, SessionId};

/// Documents available for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEntry {
    pub summary: Option<PathBuf>,
    pub problem: Option<PathBuf>,
}

impl SessionEntry {
    pub fn get(&self, kind: DocumentKind) -> Option<&Path> {
        match kind {
            DocumentKind::Summary => self.summary.as_deref(),
            DocumentKind::Problem => self.problem.as_deref(),
        }
    }

    fn slot_mut(&mut self, kind: DocumentKind) -> &mut Option<PathBuf> {
        match kind {
            DocumentKind::Summary => &mut self.summary,
            DocumentKind::Problem => &mut self.problem,
        }
    }
}

/// Sessions keyed by id; iteration order is merge order
pub type SessionMap = BTreeMap<SessionId, SessionEntry>;

/// Scan both input directories and build the session table
///
/// Missing directories contribute nothing. Fails with [`Error::NoSessions`]
/// when neither directory holds a recognised session file.
pub fn collect_sessions(summary_dir: &Path, problem_dir: &Path) -> Result<SessionMap> {
    let mut sessions = SessionMap::new();

    collect_dir(summary_dir, &mut sessions)?;
    collect_dir(problem_dir, &mut sessions)?;

    if sessions.is_empty() {
        return Err(Error::NoSessions {
            summary_dir: summary_dir.to_path_buf(),
            problem_dir: problem_dir.to_path_buf(),
        });
    }

    Ok(sessions)
}

/// Add every session file found in `dir` to `sessions`
///
/// Entries are visited in file name order. A second file for an already
/// known `(session, kind)` pair is ignored with a warning.
pub fn collect_dir(dir: &Path, sessions: &mut SessionMap) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "directory missing, treating as empty");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();

    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(file) = parse_session_filename(name) else {
            debug!(file = %path.display(), "not a session file, ignoring");
            continue;
        };

        let slot = sessions.entry(file.id).or_default().slot_mut(file.kind);
        if let Some(existing) = slot.as_deref() {
            warn!(
                session = %file.id,
                kind = %file.kind,
                kept = %existing.display(),
                ignored = %path.display(),
                "duplicate session document"
            );
            continue;
        }
        *slot = Some(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"%PDF-1.5\n").unwrap();
    }

    #[test]
    fn test_collect_pairs_summary_and_problem() {
        let sums = TempDir::new().unwrap();
        let probs = TempDir::new().unwrap();
        touch(sums.path(), "Ses1.1sum.pdf");
        touch(probs.path(), "Ses1.1prob.pdf");
        touch(probs.path(), "Ses1.2prob.pdf");
        touch(sums.path(), "readme.txt");

        let sessions = collect_sessions(sums.path(), probs.path()).unwrap();
        assert_eq!(sessions.len(), 2);

        let first = &sessions[&SessionId::new(1, 1)];
        assert_eq!(first.summary, Some(sums.path().join("Ses1.1sum.pdf")));
        assert_eq!(first.problem, Some(probs.path().join("Ses1.1prob.pdf")));

        let second = &sessions[&SessionId::new(1, 2)];
        assert_eq!(second.summary, None);
        assert!(second.get(DocumentKind::Problem).is_some());
    }

    #[test]
    fn test_collect_missing_directories_is_no_sessions() {
        let root = TempDir::new().unwrap();
        let err = collect_sessions(&root.path().join("a"), &root.path().join("b")).unwrap_err();
        assert!(matches!(err, Error::NoSessions { .. }));
    }

    #[test]
    fn test_collect_one_missing_directory_is_fine() {
        let probs = TempDir::new().unwrap();
        touch(probs.path(), "Ses3.1prob.pdf");

        let sessions = collect_sessions(&probs.path().join("nope"), probs.path()).unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_collect_orders_numerically() {
        let sums = TempDir::new().unwrap();
        for name in ["Ses1.10sum.pdf", "Ses1.2sum.pdf", "Ses2.1sum.pdf", "Ses1.9sum.pdf"] {
            touch(sums.path(), name);
        }

        let sessions = collect_sessions(sums.path(), &sums.path().join("none")).unwrap();
        let order: Vec<String> = sessions.keys().map(|id| id.to_string()).collect();
        assert_eq!(order, ["1.2", "1.9", "1.10", "2.1"]);
    }

    #[test]
    fn test_collect_keeps_first_duplicate() {
        let sums = TempDir::new().unwrap();
        let probs = TempDir::new().unwrap();
        touch(sums.path(), "Ses1.1sum.pdf");
        touch(probs.path(), "Ses1.1sum.pdf");

        let sessions = collect_sessions(sums.path(), probs.path()).unwrap();
        assert_eq!(
            sessions[&SessionId::new(1, 1)].summary,
            Some(sums.path().join("Ses1.1sum.pdf"))
        );
    }

    #[test]
    fn test_collect_skips_directories() {
        let sums = TempDir::new().unwrap();
        fs::create_dir(sums.path().join("Ses1.1sum.pdf")).unwrap();
        touch(sums.path(), "Ses1.2sum.pdf");

        let sessions = collect_sessions(sums.path(), &sums.path().join("none")).unwrap();
        assert_eq!(sessions.keys().copied().collect::<Vec<_>>(), [SessionId::new(1, 2)]);
    }
}
