//! Dynamic record instances assembled by the constructor.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{ConstructError, FromValue, Value};

/// An ordered set of named field values belonging to one schema.
///
/// Field order follows declaration order, so iteration and serialization are
/// deterministic.
///
/// # Examples
///
/// ```
/// use ortho_args::{Record, Value};
///
/// let mut record = Record::new("Job");
/// record.insert("name", Value::Str("job1".into()));
/// let name: String = record.take("name")?;
/// assert_eq!(name, "job1");
/// # Ok::<(), ortho_args::ConstructError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    name: String,
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates an empty record for the schema called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Name of the schema this record was built from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `value` under `field`, returning any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Borrows the value stored for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Removes `field` and converts it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::MissingRequiredField`] when the field is not
    /// present and [`ConstructError::TypeMismatch`] when the stored value
    /// cannot be converted. Nested failures report the dotted field path.
    pub fn take<T: FromValue>(&mut self, field: &str) -> Result<T, ConstructError> {
        let value = self
            .fields
            .shift_remove(field)
            .ok_or_else(|| ConstructError::MissingRequiredField {
                field: field.to_owned(),
            })?;
        T::from_value(value).map_err(|err| err.at_field(field))
    }

    /// Iterates over `(field, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no fields are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.name)?;
        for (i, (field, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {field}: {value}")?;
        }
        f.write_str(" }")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let mut record = Record::new("Job");
        record.insert("name", Value::Str("job1".to_owned()));
        record.insert("retries", Value::Int(3));
        record
    }

    #[test]
    fn take_converts_and_removes() {
        let mut record = sample();
        let retries: i32 = record.take("retries").expect("retries");
        assert_eq!(retries, 3);
        assert!(record.get("retries").is_none());
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn take_reports_missing_field() {
        let mut record = sample();
        let err = record.take::<String>("absent").expect_err("missing field");
        assert_eq!(
            err,
            ConstructError::MissingRequiredField {
                field: "absent".to_owned()
            }
        );
    }

    #[test]
    fn take_reports_mismatch_with_field_name() {
        let mut record = sample();
        let err = record.take::<bool>("name").expect_err("mismatch");
        assert!(
            matches!(&err, ConstructError::TypeMismatch { field, .. } if field == "name"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn serializes_in_declaration_order() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert_eq!(json, r#"{"name":"job1","retries":3}"#);
    }

    #[test]
    fn display_lists_fields() {
        assert_eq!(sample().to_string(), "Job { name: job1, retries: 3 }");
    }
}
