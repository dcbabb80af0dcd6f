// Record schemas for CIViC record kinds
//
// Each kind declares two disjoint field sets. Simple fields hold scalars; complex fields hold a
// nested record or an ordered list of nested records. The base fields `type` and `id` are part of
// every fetchable kind and are always required, even for partial records.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fields every fetchable record must carry, in construction order.
pub const BASE_FIELDS: &[&str] = &["type", "id"];

/// The closed set of record kinds the object model knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Variant,
    Gene,
    Evidence,
    Assertion,
    Attribute,
    Drug,
    Disease,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub simple_fields: &'static [&'static str],
    pub complex_fields: &'static [&'static str],
}

const VARIANT: RecordSchema = RecordSchema {
    simple_fields: &[
        "type",
        "id",
        "allele_registry_id",
        "civic_actionability_score",
        "description",
        "entrez_id",
        "entrez_name",
        "gene_id",
        "name",
    ],
    complex_fields: &[
        "assertions",
        "clinvar_entries",
        "coordinates",
        "errors",
        "evidence_items",
        "hgvs_expressions",
        "lifecycle_actions",
        "provisional_values",
        "sources",
        "variant_aliases",
        "variant_groups",
        "variant_types",
    ],
};

const GENE: RecordSchema = RecordSchema {
    simple_fields: &["type", "id", "description", "entrez_id", "name"],
    complex_fields: &[
        "aliases",
        "errors",
        "lifecycle_actions",
        "provisional_values",
        "sources",
        "variants",
    ],
};

const EVIDENCE: RecordSchema = RecordSchema {
    simple_fields: &[
        "type",
        "id",
        "clinical_significance",
        "description",
        "drug_interaction_type",
        "evidence_direction",
        "evidence_level",
        "evidence_type",
        "gene_id",
        "name",
        "open_change_count",
        "rating",
        "status",
        "variant_id",
        "variant_origin",
    ],
    complex_fields: &[
        "assertions",
        "disease",
        "drugs",
        "errors",
        "fields_with_pending_changes",
        "lifecycle_actions",
        "phenotypes",
        "source",
    ],
};

const ASSERTION: RecordSchema = RecordSchema {
    simple_fields: &[
        "type",
        "id",
        "allele_registry_id",
        "amp_level",
        "clinical_significance",
        "description",
        "drug_interaction_type",
        "evidence_direction",
        "evidence_item_count",
        "evidence_type",
        "fda_companion_test",
        "fda_regulatory_approval",
        "name",
        "nccn_guideline",
        "nccn_guideline_version",
        "open_change_count",
        "pending_evidence_count",
        "status",
        "summary",
        "variant_origin",
    ],
    complex_fields: &[
        "acmg_codes",
        "disease",
        "drugs",
        "evidence_items",
        "gene",
        "lifecycle_actions",
        "phenotypes",
        "variant",
    ],
};

const ATTRIBUTE: RecordSchema = RecordSchema {
    simple_fields: &["type"],
    complex_fields: &[],
};

const DRUG: RecordSchema = RecordSchema {
    simple_fields: &["type", "id", "pubchem_id"],
    complex_fields: &[],
};

const DISEASE: RecordSchema = RecordSchema {
    simple_fields: &["type", "id", "display_name", "doid", "url"],
    complex_fields: &[],
};

impl RecordKind {
    pub fn all() -> &'static [RecordKind] {
        &[
            RecordKind::Variant,
            RecordKind::Gene,
            RecordKind::Evidence,
            RecordKind::Assertion,
            RecordKind::Attribute,
            RecordKind::Drug,
            RecordKind::Disease,
        ]
    }

    pub fn schema(&self) -> &'static RecordSchema {
        match self {
            RecordKind::Variant => &VARIANT,
            RecordKind::Gene => &GENE,
            RecordKind::Evidence => &EVIDENCE,
            RecordKind::Assertion => &ASSERTION,
            RecordKind::Attribute => &ATTRIBUTE,
            RecordKind::Drug => &DRUG,
            RecordKind::Disease => &DISEASE,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            RecordKind::Variant => "Variant",
            RecordKind::Gene => "Gene",
            RecordKind::Evidence => "Evidence",
            RecordKind::Assertion => "Assertion",
            RecordKind::Attribute => "Attribute",
            RecordKind::Drug => "Drug",
            RecordKind::Disease => "Disease",
        }
    }

    /// The `type` tag the REST service uses for records of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::Variant => "variant",
            RecordKind::Gene => "gene",
            RecordKind::Evidence => "evidence",
            RecordKind::Assertion => "assertion",
            RecordKind::Attribute => "attribute",
            RecordKind::Drug => "drug",
            RecordKind::Disease => "disease",
        }
    }

    /// Leaf kinds are terminal nested objects. They are never fetched by id, so they are always
    /// built complete.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            RecordKind::Attribute | RecordKind::Drug | RecordKind::Disease
        )
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

impl RecordSchema {
    pub fn is_simple(&self, field: &str) -> bool {
        self.simple_fields.contains(&field)
    }

    pub fn is_complex(&self, field: &str) -> bool {
        self.complex_fields.contains(&field)
    }

    pub fn declares(&self, field: &str) -> bool {
        self.is_simple(field) || self.is_complex(field)
    }

    /// Whether a field must be present even when partial construction is allowed.
    pub fn is_mandatory(field: &str) -> bool {
        BASE_FIELDS.contains(&field)
    }

    /// Simple fields with the base fields first, then the rest in declaration order.
    pub fn simple_fields_in_order(&self) -> impl Iterator<Item = &'static str> + '_ {
        let base = BASE_FIELDS
            .iter()
            .copied()
            .filter(|f| self.is_simple(f));
        let rest = self
            .simple_fields
            .iter()
            .copied()
            .filter(|f| !Self::is_mandatory(f));
        base.chain(rest)
    }
}
