//! Extraction Tests
//!
//! Runs the content-control extractor over packages written to disk.

use std::fs;
use std::io::{Cursor, Write};

use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;
use xbrldok_core::ErrorKind;
use xbrldok_ooxml::{esg_sample, ContentControlExtractor, DocxArchive, ReportBuilder, ESG_SAMPLE_VALUES};

// =============================================================================
// Package errors
// =============================================================================

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.docx");
    let err = ContentControlExtractor::new().extract(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.key().ends_with("missing.docx"));
}

#[test]
fn test_not_a_package_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    fs::write(&path, "This is a plain text file renamed to .docx").unwrap();

    let err = ContentControlExtractor::new().extract(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_missing_document_part_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    let mut archive = DocxArchive::new();
    archive.set_string("[Content_Types].xml", "<Types/>");
    archive.write_to_file(&path).unwrap();

    let err = ContentControlExtractor::new().extract(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("word/document.xml"));
}

#[test]
fn test_malformed_body_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    let mut archive = DocxArchive::new();
    archive.set_string(
        "word/document.xml",
        "<w:document xmlns:w=\"urn:w\"><w:body><w:sdt></w:body></w:document>",
    );
    archive.write_to_file(&path).unwrap();

    let err = ContentControlExtractor::new().extract(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

/// A stored (uncompressed) package whose image bytes can be damaged in place
fn package_with_image(document: &[u8], image: &[u8]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, data) in [("word/document.xml", document), ("word/media/image1.png", image)] {
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_corrupt_unrelated_part_is_not_read() {
    let document = ReportBuilder::new()
        .field("Revenue:", "revenue_2025", "1 234,56")
        .to_bytes()
        .unwrap();
    let xml = xbrldok_ooxml::read_part(Cursor::new(&document), "word/document.xml").unwrap();

    let image = b"PNG-IMAGE-DATA-PNG-IMAGE-DATA";
    let mut bytes = package_with_image(&xml, image);
    let offset = bytes.windows(image.len()).position(|w| w == image).unwrap();
    bytes[offset + 4] ^= 0xff;

    // The damaged image fails its checksum when the whole package is unpacked
    let err = DocxArchive::from_reader(Cursor::new(&bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let batch = ContentControlExtractor::new().extract_bytes(&bytes).unwrap();
    assert_eq!(batch.ok_count(), 1);
    assert_eq!(batch.values().next().unwrap().raw_text, "1 234,56");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    fs::write(&path, &bytes).unwrap();
    let batch = ContentControlExtractor::new().extract(&path).unwrap();
    assert_eq!(batch.ok_count(), 1);
}

#[test]
fn test_corrupt_document_part_is_format_error() {
    let body = b"<w:document xmlns:w=\"urn:w\"><w:body/></w:document>";
    let mut bytes = package_with_image(body, b"PNG");
    let offset = bytes.windows(body.len()).position(|w| w == body).unwrap();
    bytes[offset + 3] ^= 0xff;

    let err = ContentControlExtractor::new().extract_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

// =============================================================================
// Sample report
// =============================================================================

#[test]
fn test_esg_sample_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    esg_sample().write_to_file(&path).unwrap();

    let before = fs::read(&path).unwrap();
    let batch = ContentControlExtractor::new().extract(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), before, "source must not change");

    assert_eq!(batch.ok_count(), 11);
    assert_eq!(batch.skipped_count(), 0);
    let facts: Vec<(&str, &str, usize)> = batch
        .values()
        .map(|f| (f.fact_id.as_str(), f.raw_text.as_str(), f.position))
        .collect();
    for (i, (tag, value)) in ESG_SAMPLE_VALUES.iter().enumerate() {
        assert_eq!(facts[i], (*tag, *value, i + 1));
    }
}

// =============================================================================
// Layout variations
// =============================================================================

#[test]
fn test_fragmented_runs_and_tables() {
    let bytes = ReportBuilder::new()
        .field_runs("Revenue 2025 (EUR):", "revenue_2025", &["1 234", " 567", ",89"])
        .untagged("editor note")
        .table(&[
            ("Employees 2025", "employees_2025", "250"),
            ("Employees 2024", "employees_2024", "235"),
        ])
        .to_bytes()
        .unwrap();

    let batch = ContentControlExtractor::new().extract_bytes(&bytes).unwrap();
    let facts: Vec<(&str, &str, usize)> = batch
        .values()
        .map(|f| (f.fact_id.as_str(), f.raw_text.as_str(), f.position))
        .collect();
    assert_eq!(
        facts,
        vec![
            ("revenue_2025", "1 234 567,89", 1),
            ("employees_2025", "250", 3),
            ("employees_2024", "235", 4),
        ]
    );
    assert_eq!(batch.skipped().next(), Some(("#2", "content control has no tag")));
}

#[test]
fn test_document_without_controls() {
    let bytes = ReportBuilder::new()
        .heading("Empty report", 1)
        .to_bytes()
        .unwrap();
    let batch = ContentControlExtractor::new().extract_bytes(&bytes).unwrap();
    assert!(batch.is_empty());
}
