//! Session Booklet Library
//!
//! Merges per-session lecture summaries and problem sets into one PDF meant
//! for duplex printing. This library provides functionality to:
//! - Recognise `Ses<N.M><sum|prob>.pdf` file names
//! - Collect sessions from a summary and a problem directory
//! - Merge sessions in numeric order, dropping each document's last page
//! - Pad every session to an even page count with a marked filler page
//! - Strip download prefixes from session file names
//!
//! # Example
//!
//! ```no_run
//! use session_booklet::pdf::{build_booklet, MergeOptions};
//!
//! let summary = build_booklet(&MergeOptions::default()).expect("Failed to build booklet");
//! println!("Merged {} pages into {}", summary.page_count, summary.output_path.display());
//! ```

pub mod collect;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod rename;
pub mod session;

// Re-export commonly used items
pub use error::{Error, Result};
pub use session::{DocumentKind, SessionFile, SessionId};
