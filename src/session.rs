//! Session file name parsing
//!
//! Session documents follow a fixed naming convention:
//!
//! - `Ses1.1sum.pdf` → summary document of session 1.1
//! - `Ses2.10prob.pdf` → problem set of session 2.10
//!
//! The prefix, kind and extension are matched case-insensitively when
//! collecting sessions (`ses1.1SUM.PDF` is accepted). The rename utility uses
//! the case-sensitive [`find_session_name`] scanner instead.

use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};

/// Numeric session identifier such as `1.10`
///
/// Ordering compares the major component first and then the minor component,
/// both as integers, so `1.9` sorts before `1.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId {
    pub major: u32,
    pub minor: u32,
}

impl SessionId {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSessionId(s.to_string());

        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        if !is_digits(major) || !is_digits(minor) {
            return Err(invalid());
        }

        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

/// Role of a source document within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKind {
    /// Lecture summary (`sum`)
    Summary,
    /// Problem set (`prob`)
    Problem,
}

impl DocumentKind {
    /// File name suffix used for this kind
    pub fn suffix(&self) -> &'static str {
        match self {
            DocumentKind::Summary => "sum",
            DocumentKind::Problem => "prob",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Summary => f.write_str("summary"),
            DocumentKind::Problem => f.write_str("problem"),
        }
    }
}

/// A recognised session document name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFile {
    pub id: SessionId,
    pub kind: DocumentKind,
}

/// Parse a file name of the exact form `Ses<N>.<M><sum|prob>.pdf`
///
/// Returns `None` for anything else, including names with extra text before
/// or after the session token.
pub fn parse_session_filename(name: &str) -> Option<SessionFile> {
    match scan_token(name, true) {
        Some((file, len)) if len == name.len() => Some(file),
        _ => None,
    }
}

/// Find the first case-sensitive session token inside a file name
///
/// Returns the byte offset where the token starts together with the parsed
/// token. `"Lecture - Ses1.1sum.pdf"` yields offset 10.
pub fn find_session_name(name: &str) -> Option<(usize, SessionFile)> {
    name.char_indices()
        .map(|(offset, _)| offset)
        .find_map(|offset| scan_token(&name[offset..], false).map(|(file, _)| (offset, file)))
}

/// Match a session token at the start of `input`, returning its byte length
fn scan_token(input: &str, ignore_case: bool) -> Option<(SessionFile, usize)> {
    let mut rest = strip_literal(input, "Ses", ignore_case)?;

    let (major, after_major) = take_number(rest)?;
    rest = after_major.strip_prefix('.')?;
    let (minor, after_minor) = take_number(rest)?;
    rest = after_minor;

    let kind = [DocumentKind::Summary, DocumentKind::Problem]
        .into_iter()
        .find(|kind| strip_literal(rest, kind.suffix(), ignore_case).is_some())?;
    rest = strip_literal(rest, kind.suffix(), ignore_case)?;
    rest = strip_literal(rest, ".pdf", ignore_case)?;

    let file = SessionFile {
        id: SessionId::new(major, minor),
        kind,
    };
    Some((file, input.len() - rest.len()))
}

fn strip_literal<'a>(input: &'a str, literal: &str, ignore_case: bool) -> Option<&'a str> {
    let head = input.get(..literal.len())?;
    let matches = if ignore_case {
        head.eq_ignore_ascii_case(literal)
    } else {
        head == literal
    };
    matches.then(|| &input[literal.len()..])
}

/// Take a run of ASCII digits and parse it; overflow is a non-match
fn take_number(input: &str) -> Option<(u32, &str)> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    let value = input[..end].parse().ok()?;
    Some((value, &input[end..]))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
