//! PDF manipulation module

pub mod create;
pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use create::{create_filler_page, create_filler_page_with, FillerOptions};
pub use merge::{
    build_booklet, merge_sessions, write_booklet, BookletSummary, MergeOptions, MergedBooklet,
    PageCollection, SessionReport,
};
pub use metadata::{count_pages, extract_metadata, first_page_size, load_document, page_size, PdfMetadata};
