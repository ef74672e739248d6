//! PDF report rendering
//!
//! Lays out wrapped lines one per cell on A4 pages using the standard
//! Helvetica font, and writes the result under the output directory with a
//! per-request file name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use uuid::Uuid;

use super::wrap::{wrap_text, DEFAULT_WRAP_WIDTH};

/// A4 in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
/// ~10mm
const MARGIN: i64 = 28;
const FONT_SIZE: i64 = 12;
/// One cell per wrapped line, ~10mm tall
const LINE_HEIGHT: i64 = 28;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Turns extracted text into a report file
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render `text` and return the path of the written file
    async fn render(&self, text: &str) -> Result<PathBuf, RenderError>;
}

/// Writes reports as PDF files into a directory
#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    output_dir: PathBuf,
    wrap_width: usize,
}

impl PdfReportRenderer {
    /// Create a renderer, creating the output directory if needed
    pub fn create(output_dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            wrap_width: DEFAULT_WRAP_WIDTH,
        })
    }

    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn report_path(&self) -> PathBuf {
        self.output_dir.join(format!("report-{}.pdf", Uuid::new_v4()))
    }
}

#[async_trait]
impl ReportRenderer for PdfReportRenderer {
    async fn render(&self, text: &str) -> Result<PathBuf, RenderError> {
        let lines = wrap_text(text, self.wrap_width);
        let path = self.report_path();
        let target = path.clone();

        tokio::task::spawn_blocking(move || -> Result<(), RenderError> {
            let bytes = build_report(&lines)?;
            std::fs::write(&target, bytes)?;
            Ok(())
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;

        tracing::debug!(output_file = %path.display(), "Report written");
        Ok(path)
    }
}

/// Number of lines that fit on one page
pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize
}

/// Build a complete PDF from pre-wrapped lines. An empty slice still
/// produces one blank page.
pub fn build_report(lines: &[String]) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let per_page = lines_per_page();
    let mut page_ids: Vec<ObjectId> = Vec::new();

    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![lines]
    } else {
        lines.chunks(per_page).collect()
    };

    for page_lines in pages {
        let content = page_content(page_lines);
        let encoded = content.encode().map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
        "Count" => Object::Integer(page_ids.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
        ),
        Operation::new("TL", vec![Object::Integer(LINE_HEIGHT)]),
        Operation::new(
            "Td",
            vec![
                Object::Integer(MARGIN),
                Object::Integer(PAGE_HEIGHT - MARGIN - FONT_SIZE),
            ],
        ),
    ];

    for line in lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(line), StringFormat::Literal)],
        ));
        operations.push(Operation::new("T*", vec![]));
    }

    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Latin-1 subset of WinAnsi; anything else becomes '?'
fn to_win_ansi(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| if (c as u32) < 0x100 { c as u32 as u8 } else { b'?' })
        .collect()
}
