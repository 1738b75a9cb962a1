//! # xbrldok-ooxml
//!
//! DOCX access for xbrldok.
//!
//! This crate provides functionality to:
//! - Open DOCX packages read-only
//! - Extract tagged content controls (`w:sdt`) as raw facts
//! - Build DOCX packages with tagged content controls (sample reports and
//!   test fixtures)
//!
//! ## Example: Extracting Raw Facts
//!
//! ```no_run
//! use std::path::Path;
//! use xbrldok_ooxml::ContentControlExtractor;
//!
//! let batch = ContentControlExtractor::new().extract(Path::new("report.docx"))?;
//! for fact in batch.values() {
//!     println!("#{} {} = {}", fact.position, fact.fact_id, fact.raw_text);
//! }
//! # Ok::<(), xbrldok_core::Error>(())
//! ```

pub mod archive;
pub mod builder;
pub mod content_control;
pub mod error;

pub use archive::{read_document_part, read_part, DocxArchive, DOCUMENT_PART};
pub use builder::{esg_sample, ReportBuilder, ESG_SAMPLE_VALUES};
pub use content_control::{
    parse_content_controls, to_raw_facts, ContentControl, ContentControlExtractor,
};
pub use error::{OoxmlError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
