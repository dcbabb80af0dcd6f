//! [crate::record] holds the typed object graph built from CIViC JSON payloads.
//!
//! A [`Record`] is built from an untyped field map by a [`RecordBuilder`]. Payloads returned by
//! the REST service are frequently partial: a gene embeds only `{id, name, type}` stubs for its
//! variants. Stubs are built with `partial = true`, and every declared field absent from the
//! payload is remembered in the record's missing-field set.
//!
//! All field reads go through [`Record::get`] (or [`Record::nested_mut`] for descending into
//! nested records). When the requested field is missing, the record is promoted first: the full
//! record is fetched by `(type, id)` from a [`RemoteFetcher`] and the node is rebuilt with
//! `partial = false`, replacing all of its values at once.
//!
//! ```rust,no_run
//! use civic_core::{fetch::HttpFetcher, record::Record, schema::RecordKind, config::ClientConfig};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), civic_core::CivicError> {
//! let fetcher = HttpFetcher::new(&ClientConfig::default())?;
//! let mut gene = Record::from_value(
//!     RecordKind::Gene,
//!     json!({"id": 5, "type": "gene", "name": "BRAF"}),
//!     true,
//! )?;
//! assert!(gene.is_partial());
//! // Triggers GET {api}/genes/5, then returns the variant stubs.
//! let variants = gene.get("variants", &fetcher)?;
//! # let _ = variants;
//! # Ok(())
//! # }
//! ```
use crate::{
    error::{CivicError, Result},
    fetch::RemoteFetcher,
    registry::REGISTRY,
    schema::{RecordKind, RecordSchema},
};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
};

/// An untyped JSON object as returned by the REST service.
pub type Payload = Map<String, Value>;

/// One entry of a list-valued complex field.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Record(Record),
    /// A list entry that was not a JSON object (e.g. gene aliases are bare strings). It is kept
    /// as-is instead of failing construction.
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComplexValue {
    One(Box<Record>),
    Many(Vec<Element>),
    Null,
    Raw(Value),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Simple(&'a Value),
    Complex(&'a ComplexValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: RecordKind,
    record_type: String,
    simple_values: BTreeMap<String, Value>,
    complex_values: BTreeMap<String, ComplexValue>,
    extra_values: BTreeMap<String, Value>,
    missing_fields: BTreeSet<String>,
}

/// Two-phase construction of a [`Record`]: every field is collected into fresh buffers, then the
/// record is produced in one step, so a failed build never leaves a half-populated node behind.
#[derive(Debug, Clone)]
pub struct RecordBuilder<'a> {
    kind: RecordKind,
    partial: bool,
    prior: Option<&'a Record>,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(kind: RecordKind) -> Self {
        RecordBuilder {
            kind,
            partial: false,
            prior: None,
        }
    }

    /// Allow declared fields to be absent. Ignored for leaf kinds, which are always complete.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Rebuild over an existing record. Simple fields absent from the new payload keep the
    /// value they held in `prior`.
    pub fn prior(mut self, prior: &'a Record) -> Self {
        self.prior = Some(prior);
        self
    }

    pub fn build(self, mut payload: Payload) -> Result<Record> {
        let schema = self.kind.schema();
        let partial = self.partial && !self.kind.is_leaf();
        let type_hint = payload
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.prior.map(|p| p.record_type.clone()))
            .unwrap_or_else(|| self.kind.tag().to_string());

        let mut simple_values = BTreeMap::new();
        let mut missing_fields = BTreeSet::new();
        for field in schema.simple_fields_in_order() {
            if let Some(value) = payload.remove(field) {
                simple_values.insert(field.to_string(), value);
            } else if let Some(value) = self.prior.and_then(|p| p.simple_values.get(field)) {
                simple_values.insert(field.to_string(), value.clone());
            } else if partial && !RecordSchema::is_mandatory(field) {
                missing_fields.insert(field.to_string());
            } else {
                return Err(CivicError::missing_field(field, &type_hint));
            }
        }

        let record_type = match simple_values.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            other => {
                return Err(CivicError::MalformedPayload(format!(
                    "{} record has a non-string type: {other:?}",
                    self.kind
                )))
            }
        };

        let mut complex_values = BTreeMap::new();
        for field in schema.complex_fields {
            let Some(value) = payload.remove(*field) else {
                if partial {
                    missing_fields.insert(field.to_string());
                    continue;
                }
                return Err(CivicError::missing_field(field, &record_type));
            };
            complex_values.insert(field.to_string(), build_complex(field, value)?);
        }

        let extra_values = if self.kind.is_leaf() {
            payload.into_iter().collect()
        } else {
            if !payload.is_empty() {
                tracing::trace!(
                    "[RecordBuilder::build] ignoring {} undeclared fields of {}",
                    payload.len(),
                    record_type
                );
            }
            BTreeMap::new()
        };

        let record = Record {
            kind: self.kind,
            record_type,
            simple_values,
            complex_values,
            extra_values,
            missing_fields,
        };
        tracing::debug!(
            "[RecordBuilder::build] built {} (partial: {}, missing: {})",
            record,
            record.is_partial(),
            record.missing_fields.len()
        );
        Ok(record)
    }
}

fn build_complex(field: &str, value: Value) -> Result<ComplexValue> {
    match value {
        Value::Array(items) => {
            let kind = REGISTRY.kind_for_list_field(field);
            let tag = REGISTRY.naming().singularize(field);
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => build_nested(kind, tag, map).map(Element::Record),
                    raw => {
                        tracing::warn!(
                            "[RecordBuilder::build] {} element is not an object, keeping raw value {}",
                            field,
                            raw
                        );
                        Ok(Element::Raw(raw))
                    }
                })
                .collect::<Result<Vec<_>>>()
                .map(ComplexValue::Many)
        }
        Value::Object(map) => build_nested(REGISTRY.kind_for_tag(field), field, map)
            .map(|record| ComplexValue::One(Box::new(record))),
        Value::Null => Ok(ComplexValue::Null),
        raw => {
            tracing::warn!(
                "[RecordBuilder::build] {} is neither an object nor a list, keeping raw value {}",
                field,
                raw
            );
            Ok(ComplexValue::Raw(raw))
        }
    }
}

fn build_nested(kind: RecordKind, default_tag: &str, mut map: Payload) -> Result<Record> {
    map.entry("type")
        .or_insert_with(|| Value::String(default_tag.to_string()));
    RecordBuilder::new(kind).partial(true).build(map)
}

impl Record {
    pub fn from_payload(kind: RecordKind, payload: Payload, partial: bool) -> Result<Record> {
        RecordBuilder::new(kind).partial(partial).build(payload)
    }

    pub fn from_value(kind: RecordKind, value: Value, partial: bool) -> Result<Record> {
        match value {
            Value::Object(payload) => Record::from_payload(kind, payload, partial),
            other => Err(CivicError::MalformedPayload(format!(
                "expected a JSON object for {kind}, got {other}"
            ))),
        }
    }

    /// Build a record whose kind is resolved from a type tag. The tag is used as the payload's
    /// `type` when the payload does not carry one.
    pub fn build(tag: &str, mut payload: Payload, partial: bool) -> Result<Record> {
        let kind = REGISTRY.kind_for_tag(tag);
        payload
            .entry("type")
            .or_insert_with(|| Value::String(tag.to_string()));
        Record::from_payload(kind, payload, partial)
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn id(&self) -> Option<i64> {
        self.simple_values.get("id").and_then(Value::as_i64)
    }

    pub fn is_partial(&self) -> bool {
        !self.missing_fields.is_empty()
    }

    pub fn missing_fields(&self) -> &BTreeSet<String> {
        &self.missing_fields
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.missing_fields.contains(field)
    }

    /// Read a field, promoting the record first if the field is missing.
    pub fn get<F>(&mut self, field: &str, fetcher: &F) -> Result<FieldRef<'_>>
    where
        F: RemoteFetcher + ?Sized,
    {
        self.resolve(field, fetcher)?;
        if let Some(value) = self.simple_values.get(field) {
            return Ok(FieldRef::Simple(value));
        }
        if let Some(value) = self.complex_values.get(field) {
            return Ok(FieldRef::Complex(value));
        }
        if let Some(value) = self.extra_values.get(field) {
            return Ok(FieldRef::Simple(value));
        }
        Err(self.unknown_field(field))
    }

    /// Mutable access to a complex field, so nested stubs can in turn be resolved.
    pub fn nested_mut<F>(&mut self, field: &str, fetcher: &F) -> Result<&mut ComplexValue>
    where
        F: RemoteFetcher + ?Sized,
    {
        self.resolve(field, fetcher)?;
        match self.complex_values.get_mut(field) {
            Some(value) => Ok(value),
            None => Err(CivicError::UnknownField {
                field: field.to_string(),
                record_type: self.record_type.clone(),
            }),
        }
    }

    fn resolve<F>(&mut self, field: &str, fetcher: &F) -> Result<()>
    where
        F: RemoteFetcher + ?Sized,
    {
        if self.missing_fields.contains(field) {
            tracing::debug!("[Record::get] {} is missing {}, promoting", self, field);
            self.refresh(fetcher)?;
        }
        Ok(())
    }

    fn unknown_field(&self, field: &str) -> CivicError {
        CivicError::UnknownField {
            field: field.to_string(),
            record_type: self.record_type.clone(),
        }
    }

    /// Re-fetch this record by `(type, id)` and rebuild it complete. On failure the record is
    /// left untouched.
    pub fn refresh<F>(&mut self, fetcher: &F) -> Result<bool>
    where
        F: RemoteFetcher + ?Sized,
    {
        if self.kind.is_leaf() {
            return Err(CivicError::NotFetchable(self.record_type.clone()));
        }
        let id = self
            .id()
            .ok_or_else(|| CivicError::NotFetchable(format!("{} without an integer id", self)))?;
        tracing::info!("[Record::refresh] fetching {} {}", self.record_type, id);
        let payload = fetcher.fetch(&self.record_type, id)?;
        let rebuilt = RecordBuilder::new(self.kind)
            .prior(self)
            .partial(false)
            .build(payload)?;
        *self = rebuilt;
        Ok(true)
    }

    /// Rebuild from a caller-supplied payload. Returns whether the record is complete afterwards.
    pub fn update_with(&mut self, payload: Payload, allow_partial: bool) -> Result<bool> {
        let rebuilt = RecordBuilder::new(self.kind)
            .prior(self)
            .partial(allow_partial)
            .build(payload)?;
        *self = rebuilt;
        Ok(!self.is_partial())
    }

    /// The record as a JSON object. Missing fields are omitted.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in self.simple_values.iter().chain(self.extra_values.iter()) {
            map.insert(k.clone(), v.clone());
        }
        for (k, v) in self.complex_values.iter() {
            map.insert(k.clone(), v.to_value());
        }
        Value::Object(map)
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.kind.is_leaf() {
            return write!(f, "<CIViC Attribute {}>", self.record_type);
        }
        match self.id() {
            Some(id) => write!(f, "<CIViC {} {}>", self.record_type, id),
            None => write!(f, "<CIViC {}>", self.record_type),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl ComplexValue {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            ComplexValue::One(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            ComplexValue::One(record) => Some(record),
            _ => None,
        }
    }

    pub fn elements(&self) -> &[Element] {
        match self {
            ComplexValue::Many(elements) => elements,
            _ => &[],
        }
    }

    /// The typed records of a list-valued field, skipping raw pass-through entries.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.elements().iter().filter_map(|e| match e {
            Element::Record(record) => Some(record),
            Element::Raw(_) => None,
        })
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut Record> {
        let elements: &mut [Element] = match self {
            ComplexValue::Many(elements) => elements,
            _ => &mut [],
        };
        elements.iter_mut().filter_map(|e| match e {
            Element::Record(record) => Some(record),
            Element::Raw(_) => None,
        })
    }

    pub fn to_value(&self) -> Value {
        match self {
            ComplexValue::One(record) => record.to_value(),
            ComplexValue::Many(elements) => Value::Array(
                elements
                    .iter()
                    .map(|e| match e {
                        Element::Record(record) => record.to_value(),
                        Element::Raw(raw) => raw.clone(),
                    })
                    .collect(),
            ),
            ComplexValue::Null => Value::Null,
            ComplexValue::Raw(raw) => raw.clone(),
        }
    }
}

impl<'a> FieldRef<'a> {
    pub fn as_simple(&self) -> Option<&'a Value> {
        match *self {
            FieldRef::Simple(value) => Some(value),
            FieldRef::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&'a ComplexValue> {
        match *self {
            FieldRef::Simple(_) => None,
            FieldRef::Complex(value) => Some(value),
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.as_simple().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_simple().and_then(Value::as_i64)
    }

    pub fn to_value(&self) -> Value {
        match self {
            FieldRef::Simple(value) => (*value).clone(),
            FieldRef::Complex(value) => value.to_value(),
        }
    }
}
