//! Session merging using lopdf
//!
//! Pages from every source document are renumbered into one object space and
//! hung under a fresh page tree, following the lopdf merge example:
//! https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{info, warn};

use crate::collect::{collect_sessions, SessionEntry, SessionMap};
use crate::error::Result;
use crate::layout::PageSize;
use crate::pdf::create::create_filler_page;
use crate::pdf::metadata::{first_page_size, inherited_attribute, load_document, page_ids, INHERITABLE_KEYS};
use crate::session::SessionId;

/// Default directory holding the lecture summaries
pub const DEFAULT_SUMMARY_DIR: &str = "lecturenotes";
/// Default directory holding the problem sets
pub const DEFAULT_PROBLEM_DIR: &str = "problemsets";
/// Default output file
pub const DEFAULT_OUTPUT: &str = "merged.pdf";

/// Options for building a booklet
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Directory scanned for `Ses<N.M>sum.pdf` files
    pub summary_dir: PathBuf,
    /// Directory scanned for `Ses<N.M>prob.pdf` files
    pub problem_dir: PathBuf,
    /// Output PDF file path, overwritten if present
    pub output_path: PathBuf,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            summary_dir: PathBuf::from(DEFAULT_SUMMARY_DIR),
            problem_dir: PathBuf::from(DEFAULT_PROBLEM_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Ordered, append-only collection of pages destined for the output file
#[derive(Debug, Default)]
pub struct PageCollection {
    objects: BTreeMap<ObjectId, Object>,
    page_ids: Vec<ObjectId>,
    max_id: u32,
}

impl PageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages collected so far
    pub fn len(&self) -> usize {
        self.page_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page_ids.is_empty()
    }

    /// Append the first `count` pages of `doc`, returning how many were taken
    pub fn append_pages(&mut self, mut doc: Document, count: usize) -> usize {
        let selected: Vec<ObjectId> = page_ids(&doc).into_iter().take(count).collect();

        // Pages are re-parented later, so inherited attributes must live on the page
        flatten_inherited_attributes(&mut doc, &selected);

        doc.renumber_objects_with(self.max_id + 1);
        self.max_id = doc.max_id;

        // Renumbering keeps page order, so the leading pages are still the selected ones
        let renumbered: Vec<ObjectId> = page_ids(&doc).into_iter().take(selected.len()).collect();

        self.page_ids.extend(&renumbered);
        self.objects.extend(doc.objects);

        renumbered.len()
    }

    /// Append every page except the trailing one
    pub fn append_all_but_last(&mut self, doc: Document) -> usize {
        let keep = doc.get_pages().len().saturating_sub(1);
        self.append_pages(doc, keep)
    }

    /// Build a standalone document with a single flat page tree
    pub fn into_document(self) -> Document {
        let mut doc = Document::with_version("1.5");

        doc.objects.extend(self.objects);

        // new_object_id() must not collide with the imported objects
        doc.max_id = self.max_id;

        let pages_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages.set("Kids", Object::Array(kids));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));

        doc.objects.insert(pages_id, Object::Dictionary(pages));
        doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        for &page_id in &self.page_ids {
            if let Ok(page) = doc.get_dictionary_mut(page_id) {
                page.set("Parent", Object::Reference(pages_id));
            }
        }

        doc
    }
}

/// Copy MediaBox, CropBox, Resources and Rotate down onto each page
fn flatten_inherited_attributes(doc: &mut Document, pages: &[ObjectId]) {
    for &page_id in pages {
        let inherited: Vec<(&[u8], Object)> = INHERITABLE_KEYS
            .iter()
            .filter(|key| {
                doc.get_dictionary(page_id)
                    .map(|page| !page.has(key))
                    .unwrap_or(false)
            })
            .filter_map(|key| inherited_attribute(doc, page_id, key).map(|value| (*key, value)))
            .collect();

        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            for (key, value) in inherited {
                page.set(key.to_vec(), value);
            }
        }
    }
}

/// What happened to one session during a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub id: SessionId,
    /// Pages taken from the summary, `None` when the session was skipped
    pub summary_pages: Option<usize>,
    /// Pages taken from the problem set, `None` when it was absent
    pub problem_pages: Option<usize>,
    /// Whether a filler page was appended
    pub filler_added: bool,
}

impl SessionReport {
    fn skipped(id: SessionId) -> Self {
        Self {
            id,
            summary_pages: None,
            problem_pages: None,
            filler_added: false,
        }
    }

    /// Sessions without a summary contribute nothing
    pub fn is_skipped(&self) -> bool {
        self.summary_pages.is_none()
    }

    /// Pages this session occupies in the output, filler included
    pub fn total_pages(&self) -> usize {
        self.summary_pages.unwrap_or(0)
            + self.problem_pages.unwrap_or(0)
            + usize::from(self.filler_added)
    }
}

/// Result of merging all sessions, not yet written anywhere
#[derive(Debug)]
pub struct MergedBooklet {
    pub pages: PageCollection,
    pub reports: Vec<SessionReport>,
}

/// Summary of a completed booklet build
#[derive(Debug, Clone)]
pub struct BookletSummary {
    pub reports: Vec<SessionReport>,
    pub page_count: usize,
    pub output_path: PathBuf,
}

/// Merge every session in ascending id order
///
/// For each session the summary (minus its last page) is appended, then the
/// problem set (minus its last page) if present. A session whose appended page
/// count is odd gets one filler page sized like its first source page. Any
/// unreadable source aborts the whole merge.
pub fn merge_sessions(sessions: &SessionMap) -> Result<MergedBooklet> {
    let mut pages = PageCollection::new();
    let mut reports = Vec::with_capacity(sessions.len());

    for (&id, entry) in sessions {
        reports.push(merge_session(&mut pages, id, entry)?);
    }

    Ok(MergedBooklet { pages, reports })
}

fn merge_session(pages: &mut PageCollection, id: SessionId, entry: &SessionEntry) -> Result<SessionReport> {
    let Some(summary_path) = entry.summary.as_deref() else {
        warn!(session = %id, "summary missing, skipping session");
        return Ok(SessionReport::skipped(id));
    };

    let summary = load_document(summary_path)?;
    let mut reference_size = first_page_size(&summary)?;
    let summary_pages = pages.append_all_but_last(summary);
    info!(session = %id, file = %summary_path.display(), pages = summary_pages, "added summary");

    let problem_pages = match entry.problem.as_deref() {
        Some(problem_path) => {
            let problem = load_document(problem_path)?;
            if reference_size.is_none() {
                reference_size = first_page_size(&problem)?;
            }
            let taken = pages.append_all_but_last(problem);
            info!(session = %id, file = %problem_path.display(), pages = taken, "added problem set");
            Some(taken)
        }
        None => {
            warn!(session = %id, "problem set missing");
            None
        }
    };

    let appended = summary_pages + problem_pages.unwrap_or(0);
    let filler_added = appended % 2 == 1;
    if filler_added {
        let size = reference_size.unwrap_or_else(PageSize::a4);
        pages.append_pages(create_filler_page(size), 1);
        info!(session = %id, width = size.width, height = size.height, "added filler page");
    }

    Ok(SessionReport {
        id,
        summary_pages: Some(summary_pages),
        problem_pages,
        filler_added,
    })
}

/// Write the collected pages to `output_path`, replacing any existing file
///
/// The document is serialised in memory first so a failure leaves no partial
/// output behind.
pub fn write_booklet(pages: PageCollection, output_path: &Path) -> Result<usize> {
    let page_count = pages.len();

    let mut doc = pages.into_document();
    doc.prune_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    fs::write(output_path, buffer)?;

    Ok(page_count)
}

/// Collect, merge and write in one go
///
/// # Example
///
/// ```no_run
/// use session_booklet::pdf::{build_booklet, MergeOptions};
///
/// let summary = build_booklet(&MergeOptions::default()).expect("Failed to build booklet");
/// println!("{} pages", summary.page_count);
/// ```
pub fn build_booklet(options: &MergeOptions) -> Result<BookletSummary> {
    let sessions = collect_sessions(&options.summary_dir, &options.problem_dir)?;
    let MergedBooklet { pages, reports } = merge_sessions(&sessions)?;
    let page_count = write_booklet(pages, &options.output_path)?;

    Ok(BookletSummary {
        reports,
        page_count,
        output_path: options.output_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Document whose pages inherit MediaBox and Resources from the Pages node
    fn inheriting_doc(pages: usize) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                }))
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
                "Resources" => Dictionary::new(),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_merge_options_default_paths() {
        let options = MergeOptions::default();
        assert_eq!(options.summary_dir, Path::new("lecturenotes"));
        assert_eq!(options.problem_dir, Path::new("problemsets"));
        assert_eq!(options.output_path, Path::new("merged.pdf"));
    }

    #[test]
    fn test_append_all_but_last_drops_one_page() {
        let mut pages = PageCollection::new();
        assert_eq!(pages.append_all_but_last(inheriting_doc(3)), 2);
        assert_eq!(pages.append_all_but_last(inheriting_doc(1)), 0);
        assert_eq!(pages.append_all_but_last(inheriting_doc(0)), 0);
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_into_document_keeps_inherited_geometry() {
        let mut pages = PageCollection::new();
        pages.append_pages(inheriting_doc(2), 2);
        pages.append_pages(create_filler_page(PageSize::a4()), 1);

        let doc = pages.into_document();
        let ids = page_ids(&doc);
        assert_eq!(ids.len(), 3);
        assert_eq!(first_page_size(&doc).unwrap(), Some(PageSize::letter()));

        let first = doc.get_dictionary(ids[0]).unwrap();
        assert!(first.has(b"Resources"));
        assert!(first.has(b"MediaBox"));
    }

    #[test]
    fn test_into_document_has_no_id_collisions() {
        let mut pages = PageCollection::new();
        pages.append_pages(inheriting_doc(2), 2);
        pages.append_pages(inheriting_doc(2), 2);

        let doc = pages.into_document();
        let ids = page_ids(&doc);
        assert_eq!(ids.len(), 4);

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_report_totals() {
        let report = SessionReport {
            id: SessionId::new(1, 1),
            summary_pages: Some(3),
            problem_pages: Some(2),
            filler_added: true,
        };
        assert_eq!(report.total_pages(), 6);
        assert!(!report.is_skipped());
        assert!(SessionReport::skipped(SessionId::new(1, 2)).is_skipped());
    }
}
