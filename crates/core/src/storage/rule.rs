//! Field-equality rules used to select records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::Document;

/// A single `field == value` condition.
///
/// `field` may be a dotted path into nested objects (e.g. `"course.subject"`).
/// A path segment applied to an array is applied to each of its elements,
/// so `"classes.name"` reaches the name of every joined class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

/// A conjunction of field conditions over the JSON form of a record.
///
/// A condition on an array field holds when any element matches. A
/// condition holds against a joined record when the record's `id` equals
/// the value, so rules written against ids keep working after population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    conditions: Vec<Condition>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `field == value` condition.
    pub fn field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true if the record satisfies every condition.
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|condition| {
            lookup(record, &condition.field)
                .into_iter()
                .any(|actual| value_matches(actual, &condition.value))
        })
    }

    /// Returns true if the document satisfies every condition.
    pub fn matches_document(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| {
            let actual = match condition.field.split_once('.') {
                Some((head, rest)) => document
                    .get(head)
                    .map_or_else(Vec::new, |value| lookup(value, rest)),
                None => document.get(&condition.field).into_iter().collect(),
            };
            actual
                .into_iter()
                .any(|actual| value_matches(actual, &condition.value))
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} == {}", condition.field, condition.value)?;
        }
        f.write_str("}")
    }
}

/// Returns the records that satisfy `rule`, in their original order.
///
/// Records that cannot be represented as JSON never match.
pub fn filter_by_rule<T>(records: &[T], rule: &Rule) -> Vec<T>
where
    T: Serialize + Clone,
{
    records
        .iter()
        .filter(|record| serde_json::to_value(record).is_ok_and(|value| rule.matches(&value)))
        .cloned()
        .collect()
}

/// Collects every value reachable through `path`, stepping into each
/// element of the arrays met on the way.
fn lookup<'a>(record: &'a Value, path: &str) -> Vec<&'a Value> {
    path.split('.').fold(vec![record], |current, segment| {
        current
            .into_iter()
            .flat_map(|value| match value {
                Value::Array(items) => items.iter().filter_map(|item| item.get(segment)).collect(),
                other => other.get(segment).into_iter().collect::<Vec<_>>(),
            })
            .collect()
    })
}

fn value_matches(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) if !expected.is_array() => {
            items.iter().any(|item| element_matches(item, expected))
        }
        _ => element_matches(actual, expected),
    }
}

fn element_matches(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match actual {
        Value::Object(record) if !expected.is_object() => record.get("id") == Some(expected),
        _ => false,
    }
}
