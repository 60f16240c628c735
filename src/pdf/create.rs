//! Filler page creation using lopdf

use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use crate::layout::PageSize;

/// Options for the visible mark drawn on a filler page
#[derive(Debug, Clone)]
pub struct FillerOptions {
    /// Text drawn on the page
    pub mark: String,
    /// Font size in points
    pub font_size: f32,
    /// Horizontal position from the left edge, in points
    pub x: f32,
    /// Vertical position from the bottom edge, in points
    pub y: f32,
}

impl Default for FillerOptions {
    fn default() -> Self {
        Self {
            mark: ".".to_string(),
            font_size: 8.0,
            x: 20.0,
            y: 20.0,
        }
    }
}

/// Create a one-page document carrying a small visible mark
///
/// The page is never truly blank, so printers and duplexing drivers do not
/// drop it. Degenerate sizes fall back to A4.
pub fn create_filler_page(size: PageSize) -> Document {
    create_filler_page_with(size, &FillerOptions::default())
}

/// Create a filler page with a custom mark
pub fn create_filler_page_with(size: PageSize, options: &FillerOptions) -> Document {
    let size = if size.is_degenerate() { PageSize::a4() } else { size };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    // Helvetica is one of the 14 standard fonts, no embedding needed
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let content = format!(
        "BT\n/F1 {} Tf\n0 0 0 rg\n{} {} Td\n({}) Tj\nET\n",
        options.font_size,
        options.x,
        options.y,
        escape_pdf_string(&options.mark),
    );
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::from(size.width),
            Object::from(size.height),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Escape special characters for a PDF literal string
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::metadata::first_page_size;

    #[test]
    fn test_filler_has_one_page_of_requested_size() {
        let doc = create_filler_page(PageSize::letter());
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(first_page_size(&doc).unwrap(), Some(PageSize::letter()));
    }

    #[test]
    fn test_filler_is_not_blank() {
        let doc = create_filler_page(PageSize::a4());
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap();
        assert!(content.contains("(.) Tj"));
        assert!(content.contains("/F1 8 Tf"));
    }

    #[test]
    fn test_degenerate_size_falls_back_to_a4() {
        let doc = create_filler_page(PageSize::new(0.0, 0.0));
        assert_eq!(first_page_size(&doc).unwrap(), Some(PageSize::a4()));
    }

    #[test]
    fn test_custom_mark_is_escaped() {
        let options = FillerOptions {
            mark: "(blank)".to_string(),
            ..Default::default()
        };
        let doc = create_filler_page_with(PageSize::a4(), &options);
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap();
        assert!(content.contains("(\\(blank\\)) Tj"));
    }
}
