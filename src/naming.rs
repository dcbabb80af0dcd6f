//! Naming rules that map CIViC payload tags to record class names and REST endpoints.
//!
//! Payload field names and type tags are lowercase and underscore separated (`evidence_items`,
//! `variant_aliases`). Class names are the capitalized concatenation (`Evidence`,
//! `VariantAliase`). The irregular cases live in [`NamingTables`], which is immutable once built
//! and owned by the [`crate::registry::TypeRegistry`].
use heck::ToUpperCamelCase;
use std::collections::{BTreeMap, BTreeSet};

/// Tags whose plural form is the tag itself.
pub const UNMARKED_PLURALS: &[&str] = &["evidence"];

/// Tags that name a different concept than their spelling suggests.
pub const TAG_REMAPPING: &[(&str, &str)] = &[
    ("evidence_items", "evidence"),
    ("evidence_item", "evidence"),
];

/// Endpoints that do not follow the pluralization rule.
pub const ENDPOINT_REMAPPING: &[(&str, &str)] = &[("evidence", "evidence_items")];

const PLURAL_MARKER: char = 's';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTables {
    unmarked_plurals: BTreeSet<String>,
    tag_remapping: BTreeMap<String, String>,
    endpoint_remapping: BTreeMap<String, String>,
}

impl Default for NamingTables {
    fn default() -> Self {
        NamingTables::new(UNMARKED_PLURALS, TAG_REMAPPING, ENDPOINT_REMAPPING)
    }
}

impl NamingTables {
    pub fn new(
        unmarked_plurals: &[&str],
        tag_remapping: &[(&str, &str)],
        endpoint_remapping: &[(&str, &str)],
    ) -> Self {
        NamingTables {
            unmarked_plurals: unmarked_plurals.iter().map(|s| s.to_string()).collect(),
            tag_remapping: tag_remapping
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            endpoint_remapping: endpoint_remapping
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn pluralize(&self, tag: &str) -> String {
        if self.unmarked_plurals.contains(tag) || tag.ends_with(PLURAL_MARKER) {
            tag.to_string()
        } else {
            format!("{tag}{PLURAL_MARKER}")
        }
    }

    /// Strips every trailing plural marker from a list-field name, e.g. `variants` -> `variant`.
    pub fn singularize<'a>(&self, field: &'a str) -> &'a str {
        field.trim_end_matches(PLURAL_MARKER)
    }

    pub fn to_class_name(&self, tag: &str) -> String {
        let tag = self
            .tag_remapping
            .get(tag)
            .map(String::as_str)
            .unwrap_or(tag);
        tag.to_upper_camel_case()
    }

    /// The REST collection segment for a record type tag: `gene` -> `genes`,
    /// `evidence` -> `evidence_items`.
    pub fn endpoint_for(&self, record_type: &str) -> String {
        let plural = self.pluralize(&record_type.to_lowercase());
        match self.endpoint_remapping.get(&plural) {
            Some(endpoint) => endpoint.clone(),
            None => plural,
        }
    }
}
