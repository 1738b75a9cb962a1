//! Taxonomy entry point and namespace bindings

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, LookupTarget, Result};
use crate::lexical::is_ncname;

/// Namespaces every instance declares, bound unless the file overrides them
pub const STANDARD_NAMESPACES: [(&str, &str); 4] = [
    ("xbrli", "http://www.xbrl.org/2003/instance"),
    ("link", "http://www.xbrl.org/2003/linkbase"),
    ("xlink", "http://www.w3.org/1999/xlink"),
    ("iso4217", "http://www.xbrl.org/2003/iso4217"),
];

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    entrypoint: EntryPointSection,
    #[serde(default)]
    namespaces: toml::map::Map<String, toml::Value>,
    #[serde(default)]
    taxonomy: TaxonomySection,
}

#[derive(Debug, Deserialize)]
struct EntryPointSection {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct TaxonomySection {
    #[serde(default)]
    default_prefix: Option<String>,
}

/// Schema entry point plus prefix → namespace URI bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    entrypoint: String,
    namespaces: Vec<(String, String)>,
    default_prefix: Option<String>,
}

impl Taxonomy {
    /// Create bindings; the standard namespaces are added when absent
    pub fn new(
        entrypoint: impl Into<String>,
        namespaces: Vec<(String, String)>,
        default_prefix: Option<String>,
    ) -> Result<Self> {
        let entrypoint = entrypoint.into();
        if entrypoint.trim().is_empty() {
            return Err(Error::config("entrypoint.href", "schema reference is empty"));
        }

        let mut bound: Vec<(String, String)> = Vec::with_capacity(namespaces.len() + 4);
        for (prefix, uri) in namespaces {
            if !is_ncname(&prefix) {
                return Err(Error::config(&prefix, "namespace prefix is not a valid NCName"));
            }
            if uri.trim().is_empty() {
                return Err(Error::config(&prefix, "namespace URI is empty"));
            }
            if bound.iter().any(|(p, _)| *p == prefix) {
                return Err(Error::config(&prefix, "namespace prefix bound twice"));
            }
            bound.push((prefix, uri));
        }
        for (prefix, uri) in STANDARD_NAMESPACES {
            if !bound.iter().any(|(p, _)| p == prefix) {
                debug!("Binding standard namespace {} = {}", prefix, uri);
                bound.push((prefix.to_string(), uri.to_string()));
            }
        }

        if let Some(prefix) = &default_prefix {
            if !bound.iter().any(|(p, _)| p == prefix) {
                return Err(Error::config(
                    "taxonomy.default_prefix",
                    format!("default prefix '{}' has no namespace binding", prefix),
                ));
            }
        }

        Ok(Self {
            entrypoint,
            namespaces: bound,
            default_prefix,
        })
    }

    /// Parse `taxonomy/entrypoints.toml`
    ///
    /// ```toml
    /// [entrypoint]
    /// href = "https://example.org/gri-2025.xsd"
    ///
    /// [namespaces]
    /// gri = "https://example.org/gri"
    ///
    /// [taxonomy]
    /// default_prefix = "gri"
    /// ```
    pub fn from_toml_str(source: &str, label: &str) -> Result<Self> {
        let file: TaxonomyFile = toml::from_str(source).map_err(|e| Error::format(label, e.message()))?;

        let mut namespaces = Vec::with_capacity(file.namespaces.len());
        for (prefix, value) in file.namespaces {
            match value {
                toml::Value::String(uri) => namespaces.push((prefix, uri)),
                _ => return Err(Error::config(&prefix, "namespace URI must be a string")),
            }
        }

        Self::new(file.entrypoint.href, namespaces, file.taxonomy.default_prefix)
    }

    /// `xlink:href` of the instance's schemaRef
    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    /// All bindings, configured ones first, in declaration order
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    /// URI bound to a prefix
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Prefix used for concepts written without one
    pub fn default_prefix(&self) -> Option<&str> {
        self.default_prefix.as_deref()
    }

    /// Resolve a concept prefix, falling back to the default prefix
    ///
    /// Returns the effective `(prefix, uri)`.
    pub fn resolve<'a>(&'a self, prefix: Option<&'a str>) -> Result<(&'a str, &'a str)> {
        let prefix = match prefix.or(self.default_prefix.as_deref()) {
            Some(prefix) => prefix,
            None => return Err(Error::lookup(LookupTarget::Prefix, "(none)")),
        };
        self.namespace(prefix)
            .map(|uri| (prefix, uri))
            .ok_or_else(|| Error::lookup(LookupTarget::Prefix, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TAXONOMY: &str = r#"
[entrypoint]
href = "https://example.org/gri-2025.xsd"

[namespaces]
gri = "https://example.org/gri"
esrs = "https://example.org/esrs"

[taxonomy]
default_prefix = "gri"
"#;

    #[test]
    fn test_parse_taxonomy() {
        let taxonomy = Taxonomy::from_toml_str(TAXONOMY, "entrypoints.toml").unwrap();
        assert_eq!(taxonomy.entrypoint(), "https://example.org/gri-2025.xsd");
        assert_eq!(taxonomy.default_prefix(), Some("gri"));
        let prefixes: Vec<&str> = taxonomy.namespaces().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            prefixes,
            vec!["gri", "esrs", "xbrli", "link", "xlink", "iso4217"]
        );
    }

    #[test]
    fn test_configured_standard_namespace_kept() {
        let taxonomy = Taxonomy::new(
            "schema.xsd",
            vec![("xbrli".to_string(), "urn:custom".to_string())],
            None,
        )
        .unwrap();
        assert_eq!(taxonomy.namespace("xbrli"), Some("urn:custom"));
        assert_eq!(taxonomy.namespaces().len(), 4);
    }

    #[test]
    fn test_resolve_prefix() {
        let taxonomy = Taxonomy::from_toml_str(TAXONOMY, "entrypoints.toml").unwrap();
        assert_eq!(
            taxonomy.resolve(Some("esrs")).unwrap(),
            ("esrs", "https://example.org/esrs")
        );
        assert_eq!(
            taxonomy.resolve(None).unwrap(),
            ("gri", "https://example.org/gri")
        );

        let err = taxonomy.resolve(Some("ifrs")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.key(), "ifrs");
    }

    #[test]
    fn test_resolve_without_default_prefix() {
        let taxonomy = Taxonomy::new("schema.xsd", Vec::new(), None).unwrap();
        assert!(taxonomy.resolve(None).is_err());
    }

    #[test]
    fn test_unbound_default_prefix_is_config_error() {
        let err = Taxonomy::new("schema.xsd", Vec::new(), Some("gri".to_string())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_missing_entrypoint_is_format_error() {
        let err = Taxonomy::from_toml_str("[namespaces]\ngri = \"x\"\n", "entrypoints.toml")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
