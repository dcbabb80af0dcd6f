// Type registry for nested record construction
//
// Resolves a payload field name or type tag to the record kind responsible for building it. The
// table is closed: it is populated once from `RecordKind::all()` and never mutated. Unknown class
// names resolve to the generic `Attribute` kind.

use crate::{naming::NamingTables, schema::RecordKind};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Global registry with the built-in naming tables
pub static REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::create);

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    naming: NamingTables,
    kinds: BTreeMap<&'static str, RecordKind>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::create()
    }
}

impl TypeRegistry {
    /// Create registry with the built-in naming tables
    pub fn create() -> Self {
        TypeRegistry::with_tables(NamingTables::default())
    }

    pub fn with_tables(naming: NamingTables) -> Self {
        let kinds = RecordKind::all()
            .iter()
            .map(|kind| (kind.class_name(), *kind))
            .collect();
        TypeRegistry { naming, kinds }
    }

    pub fn naming(&self) -> &NamingTables {
        &self.naming
    }

    /// Look up a kind by class name, falling back to [`RecordKind::Attribute`].
    pub fn kind_for_class(&self, class_name: &str) -> RecordKind {
        match self.kinds.get(class_name) {
            Some(kind) => *kind,
            None => {
                tracing::trace!(
                    "[TypeRegistry::kind_for_class] No record kind for {}, using Attribute",
                    class_name
                );
                RecordKind::Attribute
            }
        }
    }

    /// Resolve a type tag such as `gene` or `evidence_items`.
    pub fn kind_for_tag(&self, tag: &str) -> RecordKind {
        self.kind_for_class(&self.naming.to_class_name(tag))
    }

    /// Resolve the element kind of a list-valued complex field, e.g. `variants` -> Variant.
    pub fn kind_for_list_field(&self, field: &str) -> RecordKind {
        self.kind_for_tag(self.naming.singularize(field))
    }

    pub fn list_kinds(&self) -> Vec<(&'static str, RecordKind)> {
        self.kinds.iter().map(|(k, v)| (*k, *v)).collect()
    }
}
