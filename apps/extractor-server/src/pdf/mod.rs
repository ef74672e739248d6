//! PDF module
//!
//! Both ends of the pipeline that touch PDF bytes: text extraction from the
//! upload and rendering of the report.

pub mod report;
pub mod text;
pub mod wrap;

pub use report::{PdfReportRenderer, RenderError, ReportRenderer};
pub use text::{ExtractionError, PdfTextExtractor, TextExtractor};
pub use wrap::{wrap_line, wrap_text, DEFAULT_WRAP_WIDTH};
