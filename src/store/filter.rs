//! Query filters evaluated against documents
//!
//! Filters are conjunctions of equality and membership conditions. That is
//! the whole query language: result ordering is always applied client-side
//! after retrieval, never requested from the store, so no filter/order
//! combination can ever demand a composite index from the backend.

use serde_json::Value;

use super::Document;

/// A single field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given value. An absent field matches `null`.
    Eq(String, Value),
    /// Field equals one of the given values.
    In(String, Vec<Value>),
}

impl Condition {
    pub fn matches(&self, fields: &Document) -> bool {
        match self {
            Condition::Eq(field, expected) => match fields.get(field) {
                Some(actual) => actual == expected,
                None => expected.is_null(),
            },
            Condition::In(field, allowed) => fields
                .get(field)
                .map_or(false, |actual| allowed.contains(actual)),
        }
    }
}

/// Conjunction of [`Condition`]s. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Filter matching the whole collection.
    pub fn all() -> Self {
        Filter::default()
    }

    pub fn new() -> Self {
        Filter::default()
    }

    /// Require `field == value`.
    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field.into(), value.into()));
        self
    }

    /// Require `field` to equal one of `values`.
    pub fn field_in<V: Into<Value>>(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In(
            field.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn matches(&self, fields: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(fields))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}
