//! Plain key/value renderings of entities for transport.
//!
//! Every entity renders its own columns. Relations are inlined only when the
//! caller names them in an [`Include`] and they have been loaded.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

pub type Mapping = Map<String, Value>;

/// A set of dotted relation paths such as `trips.activities.categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Include {
    paths: BTreeSet<String>,
}

impl Include {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut include = Self::default();
        for path in paths {
            include.add(path.as_ref());
        }
        include
    }

    /// Adds `path` along with every prefix of it.
    pub fn add(&mut self, path: &str) {
        let mut prefix = String::new();
        for segment in path.split('.').map(str::trim).filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            self.paths.insert(prefix.clone());
        }
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.paths.contains(relation)
    }

    /// The include set seen from inside `relation`.
    pub fn nested(&self, relation: &str) -> Include {
        let prefix = format!("{relation}.");
        let paths = self
            .paths
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(str::to_string)
            .collect();
        Include { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Relation names named directly at this level.
    pub fn top_level(&self) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .filter(|path| !path.contains('.'))
            .map(String::as_str)
    }
}

/// An include path naming a relation the entity does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relation: {0}")]
pub struct UnknownRelation(pub String);

impl UnknownRelation {
    fn under(self, relation: &str) -> Self {
        UnknownRelation(format!("{relation}.{}", self.0))
    }
}

pub trait ToMapping: Sized {
    /// Relation names this entity can inline.
    const RELATIONS: &'static [&'static str];

    fn to_mapping(&self, include: &Include) -> Mapping;

    /// Checks the paths below `relation`. Relations without relations of
    /// their own accept nothing further.
    fn check_relation(relation: &str, nested: &Include) -> Result<(), UnknownRelation> {
        let _ = relation;
        leaf(nested)
    }

    /// Rejects any include path that does not follow declared relations.
    fn check_include(include: &Include) -> Result<(), UnknownRelation> {
        for relation in include.top_level() {
            if !Self::RELATIONS.iter().any(|known| *known == relation) {
                return Err(UnknownRelation(relation.to_string()));
            }
            Self::check_relation(relation, &include.nested(relation))
                .map_err(|err| err.under(relation))?;
        }
        Ok(())
    }

    /// Like [`ToMapping::to_mapping`], but fails on misspelled include paths
    /// instead of ignoring them.
    fn to_checked_mapping(&self, include: &Include) -> Result<Mapping, UnknownRelation> {
        Self::check_include(include)?;
        Ok(self.to_mapping(include))
    }

    fn to_value(&self, include: &Include) -> Value {
        Value::Object(self.to_mapping(include))
    }
}

/// Accepts only an empty nested include.
pub(crate) fn leaf(nested: &Include) -> Result<(), UnknownRelation> {
    match nested.top_level().next() {
        Some(relation) => Err(UnknownRelation(relation.to_string())),
        None => Ok(()),
    }
}

pub(crate) fn timestamp(ts: &DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub(crate) fn optional_text(value: &Option<String>) -> Value {
    value
        .as_ref()
        .map(|text| Value::String(text.clone()))
        .unwrap_or(Value::Null)
}

pub(crate) fn list<T: ToMapping>(items: &[T], include: &Include) -> Value {
    Value::Array(items.iter().map(|item| item.to_value(include)).collect())
}
