//! Content-control document builder
//!
//! Generates minimal but complete DOCX packages whose values sit in tagged
//! content controls. Used by `xbrldok sample` and as the fixture factory of
//! the test suites.
//!
//! ```
//! use xbrldok_ooxml::builder::ReportBuilder;
//! use xbrldok_ooxml::ContentControlExtractor;
//!
//! let bytes = ReportBuilder::new()
//!     .heading("Economic Performance", 2)
//!     .field("Revenue 2025 (EUR):", "revenue_2025", "1 234 567,89")
//!     .to_bytes()?;
//!
//! let facts = ContentControlExtractor::new().extract_bytes(&bytes)?;
//! assert_eq!(facts.ok_count(), 1);
//! # Ok::<(), xbrldok_ooxml::OoxmlError>(())
//! ```

use std::path::Path;

use crate::archive::{DocxArchive, DOCUMENT_PART};
use crate::error::Result;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:pPr><w:outlineLvl w:val="1"/></w:pPr></w:style>
</w:styles>"#;

#[derive(Debug, Clone)]
enum Block {
    Heading { text: String, level: u8 },
    Label(String),
    Control { tag: Option<String>, runs: Vec<String> },
    Table(Vec<TableRow>),
}

#[derive(Debug, Clone)]
struct TableRow {
    label: String,
    tag: String,
    value: String,
}

/// Builder for a report whose values live in content controls
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    blocks: Vec<Block>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a heading paragraph (`Heading1`, `Heading2`, ...)
    pub fn heading(mut self, text: impl Into<String>, level: u8) -> Self {
        self.blocks.push(Block::Heading {
            text: text.into(),
            level,
        });
        self
    }

    /// Add a bold label followed by a block-level tagged control
    pub fn field(self, label: impl Into<String>, tag: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        self.field_runs(label, tag, &[value.as_str()])
    }

    /// Like [`field`](Self::field), with the value split over several runs
    pub fn field_runs(mut self, label: impl Into<String>, tag: impl Into<String>, runs: &[&str]) -> Self {
        self.blocks.push(Block::Label(label.into()));
        self.blocks.push(Block::Control {
            tag: Some(tag.into()),
            runs: runs.iter().map(|r| r.to_string()).collect(),
        });
        self
    }

    /// Add a control without a tag
    pub fn untagged(mut self, value: impl Into<String>) -> Self {
        self.blocks.push(Block::Control {
            tag: None,
            runs: vec![value.into()],
        });
        self
    }

    /// Add a two-column table whose value cells are tagged controls
    pub fn table(mut self, rows: &[(&str, &str, &str)]) -> Self {
        self.blocks.push(Block::Table(
            rows.iter()
                .map(|(label, tag, value)| TableRow {
                    label: label.to_string(),
                    tag: tag.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        ));
        self
    }

    /// Render `word/document.xml`
    pub fn document_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<w:document xmlns:w="{}">"#, W_NS));
        xml.push_str("\n  <w:body>\n");

        let mut id = 0u32;
        for block in &self.blocks {
            match block {
                Block::Heading { text, level } => {
                    xml.push_str(&format!(
                        "    <w:p><w:pPr><w:pStyle w:val=\"Heading{}\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>\n",
                        level,
                        escape_xml(text)
                    ));
                }
                Block::Label(text) => {
                    xml.push_str(&format!(
                        "    <w:p><w:pPr><w:spacing w:after=\"200\"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>{}</w:t></w:r></w:p>\n",
                        escape_xml(text)
                    ));
                }
                Block::Control { tag, runs } => {
                    id += 1;
                    xml.push_str("    ");
                    xml.push_str(&sdt_open(tag.as_deref(), id));
                    xml.push_str("<w:p>");
                    for run in runs {
                        xml.push_str(&text_run(run));
                    }
                    xml.push_str("</w:p></w:sdtContent></w:sdt>\n");
                }
                Block::Table(rows) => {
                    xml.push_str("    <w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>\n");
                    for row in rows {
                        id += 1;
                        xml.push_str(&format!(
                            "      <w:tr><w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc><w:tc><w:p>{}{}</w:sdtContent></w:sdt></w:p></w:tc></w:tr>\n",
                            escape_xml(&row.label),
                            sdt_open(Some(&row.tag), id),
                            text_run(&row.value)
                        ));
                    }
                    xml.push_str("    </w:tbl>\n");
                }
            }
        }

        xml.push_str("    <w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/></w:sectPr>\n");
        xml.push_str("  </w:body>\n</w:document>\n");
        xml
    }

    /// Assemble the package
    pub fn to_archive(&self) -> DocxArchive {
        let mut archive = DocxArchive::new();
        archive.set_string("[Content_Types].xml", CONTENT_TYPES);
        archive.set_string("_rels/.rels", PACKAGE_RELS);
        archive.set_string("word/_rels/document.xml.rels", DOCUMENT_RELS);
        archive.set_string("word/styles.xml", STYLES);
        archive.set_string(DOCUMENT_PART, self.document_xml());
        archive
    }

    /// Package bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_archive().to_bytes()
    }

    /// Write the package to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_archive().write_to_file(path)
    }
}

fn sdt_open(tag: Option<&str>, id: u32) -> String {
    let tag = tag
        .map(|t| format!("<w:tag w:val=\"{}\"/>", escape_xml(t)))
        .unwrap_or_default();
    format!(
        "<w:sdt><w:sdtPr>{}<w:id w:val=\"{}\"/><w:text/></w:sdtPr><w:sdtContent>",
        tag, id
    )
}

fn text_run(text: &str) -> String {
    format!(
        "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape_xml(text)
    )
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Values of the ESG sample report, in document order
pub const ESG_SAMPLE_VALUES: [(&str, &str); 11] = [
    ("company_name", "Test Company LLC"),
    ("report_date", "31.12.2025"),
    ("revenue_2025", "1 234 567,89"),
    ("revenue_2024", "987 654,32"),
    ("operating_costs_2025", "876 543,21"),
    ("net_profit_2025", "358 024,68"),
    ("employees_2025", "250"),
    ("employees_2024", "235"),
    ("employees_female_2025", "127"),
    ("energy_consumption_2025", "12 345,67"),
    ("co2_emissions_2025", "1 234,56"),
];

/// The ESG sustainability sample report with eleven tagged values
pub fn esg_sample() -> ReportBuilder {
    let [company, date, revenue, revenue_prev, costs, profit, staff, staff_prev, female, energy, co2] =
        ESG_SAMPLE_VALUES;

    ReportBuilder::new()
        .heading("ESG Sustainability Report 2025", 1)
        .heading("Company Information", 2)
        .field("Company Name:", company.0, company.1)
        .field("Report Date:", date.0, date.1)
        .heading("Economic Performance", 2)
        .field("Revenue 2025 (EUR):", revenue.0, revenue.1)
        .field("Revenue 2024 (EUR):", revenue_prev.0, revenue_prev.1)
        .field("Operating Costs 2025 (EUR):", costs.0, costs.1)
        .field("Net Profit 2025 (EUR):", profit.0, profit.1)
        .heading("Social Indicators", 2)
        .field("Total Employees (end of 2025):", staff.0, staff.1)
        .field("Total Employees (end of 2024):", staff_prev.0, staff_prev.1)
        .field("Female Employees (end of 2025):", female.0, female.1)
        .heading("Environmental Indicators", 2)
        .field("Energy Consumption 2025 (GJ):", energy.0, energy.1)
        .field("CO2 Emissions 2025 (tonnes):", co2.0, co2.1)
}
