//! Intermediate JSON artifacts
//!
//! Stages hand over their results as pretty-printed JSON arrays
//! (`raw_facts.json`, `canonical_facts.json`). Every file the pipeline
//! produces is written atomically: the content goes to a temporary file in
//! the target directory which is then renamed over the target, so a failed
//! run never leaves a truncated artifact behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{CanonicalFact, RawFact};

/// Write bytes to `path` atomically, creating parent directories
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    tmp.write_all(contents).map_err(|e| Error::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(path, e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Serialize a value as pretty JSON and write it atomically
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(value)
        .map_err(|e| Error::format(path.display().to_string(), e))?;
    json.push(b'\n');
    atomic_write(path, &json)
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::format(path.display().to_string(), e))
}

/// Write `raw_facts.json`
pub fn write_raw_facts(path: &Path, facts: &[RawFact]) -> Result<()> {
    write_json(path, facts)
}

/// Read `raw_facts.json`
pub fn read_raw_facts(path: &Path) -> Result<Vec<RawFact>> {
    read_json(path)
}

/// Write `canonical_facts.json`
pub fn write_canonical_facts(path: &Path, facts: &[CanonicalFact]) -> Result<()> {
    write_json(path, facts)
}

/// Read `canonical_facts.json`
pub fn read_canonical_facts(path: &Path) -> Result<Vec<CanonicalFact>> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_raw_facts_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/raw_facts.json");
        let facts = vec![
            RawFact::new("company_name", "Test Company LLC", 1),
            RawFact::new("revenue_2025", "1 234 567,89", 3),
        ];
        write_raw_facts(&path, &facts).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"factId\": \"company_name\""));
        assert!(text.ends_with("]\n"));
        assert_eq!(read_raw_facts(&path).unwrap(), facts);
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instance.xml");
        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_raw_facts(&dir.path().join("raw_facts.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_read_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("canonical_facts.json");
        fs::write(&path, "[{\"factId\": ").unwrap();
        let err = read_canonical_facts(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
