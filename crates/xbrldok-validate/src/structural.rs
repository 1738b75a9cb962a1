//! Structural check of an instance without a taxonomy-aware processor
//!
//! Confirms the file is well-formed XML with an `xbrli:xbrl` root and counts
//! contexts, units and elements by namespace rather than by prefix.

use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::{debug, info};

use crate::error::{Result, ValidateError};
use crate::validator::{Expected, InstanceValidator, StructureCounts, ValidationReport};

/// XBRL 2.1 instance namespace
pub const XBRLI_NAMESPACE: &str = "http://www.xbrl.org/2003/instance";

/// Well-formedness and count check used when no processor is available
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    pub fn new() -> Self {
        Self
    }
}

impl InstanceValidator for StructuralValidator {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn validate(&self, path: &Path, expected: &Expected) -> Result<ValidationReport> {
        let label = path.display().to_string();
        let xml = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::InvalidData {
                ValidateError::Malformed {
                    path: label.clone(),
                    message: "not valid UTF-8".to_string(),
                }
            } else {
                ValidateError::Io {
                    path: label.clone(),
                    source,
                }
            }
        })?;

        let scan = scan(&xml).map_err(|message| ValidateError::Malformed {
            path: label.clone(),
            message,
        })?;

        let mut report = ValidationReport::new(self.name(), path);
        report.basic_only = true;
        report.counts = Some(scan.counts);

        if !scan.xbrl_root {
            report.errors.push("root element is not xbrli:xbrl".to_string());
        }
        check_count(&mut report, "context", expected.contexts, scan.counts.contexts);
        check_count(&mut report, "unit", expected.units, scan.counts.units);

        report.info.push(format!(
            "well-formed XML, {} namespace bindings on root",
            scan.root_namespaces
        ));
        report
            .info
            .push("basic check only; run an XBRL processor for full validation".to_string());
        report.passed = report.errors.is_empty();

        debug!(
            "Scanned {}: {} elements, {} contexts, {} units",
            label, scan.counts.elements, scan.counts.contexts, scan.counts.units
        );
        info!("{}: {}", self.name(), report.status());
        Ok(report)
    }
}

fn check_count(report: &mut ValidationReport, what: &str, expected: Option<usize>, found: usize) {
    if let Some(expected) = expected {
        if expected != found {
            report
                .errors
                .push(format!("expected {} {}s, found {}", expected, what, found));
        }
    }
}

struct Scan {
    counts: StructureCounts,
    xbrl_root: bool,
    root_namespaces: usize,
}

fn scan(xml: &str) -> std::result::Result<Scan, String> {
    let mut reader = NsReader::from_str(xml);
    let mut counts = StructureCounts::default();
    let mut xbrl_root = false;
    let mut root_namespaces = 0;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
        let start = match &event {
            Event::Start(e) | Event::Empty(e) => Some(e),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                None
            }
            Event::Eof => break,
            _ => None,
        };
        let Some(start) = start else { continue };

        if depth == 0 {
            if seen_root {
                return Err("more than one root element".to_string());
            }
            seen_root = true;
            xbrl_root = is_xbrli(&ns) && start.local_name().as_ref() == b"xbrl";
            root_namespaces = start
                .attributes()
                .flatten()
                .filter(|a| {
                    let key = a.key.as_ref();
                    key == b"xmlns" || key.starts_with(b"xmlns:")
                })
                .count();
        }

        counts.elements += 1;
        if is_xbrli(&ns) {
            match start.local_name().as_ref() {
                b"context" => counts.contexts += 1,
                b"unit" => counts.units += 1,
                _ => {}
            }
        }
        if matches!(event, Event::Start(_)) {
            depth += 1;
        }
    }

    if !seen_root {
        return Err("no root element".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document".to_string());
    }
    Ok(Scan {
        counts,
        xbrl_root,
        root_namespaces,
    })
}

fn is_xbrli(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == XBRLI_NAMESPACE.as_bytes())
}
