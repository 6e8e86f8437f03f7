//! User-defined field (UDF) model.
//!
//! The external schema stores UDFs generically: one row shape serves
//! several unrelated owning entity kinds. Entity-level storage
//! (`entityudfstorage` / `entity_udf_view`) disambiguates the owner by a
//! numeric class id; sample/artifact/process UDFs live in per-entity views
//! keyed by the owner id alone. Values arrive as text with a declared type
//! and are coerced explicitly at read time.

use serde::Serialize;
use std::collections::BTreeMap;
use tokio_postgres::Row;

/// Owning-entity class for the polymorphic entity UDF storage.
///
/// The numeric values are a fixed external convention of the LIMS server,
/// not something this crate controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UdfOwnerClass {
    Project,
    Container,
}

impl UdfOwnerClass {
    /// The `attachtoclassid` value for this owner kind.
    pub fn class_id(self) -> i32 {
        match self {
            UdfOwnerClass::Project => 83,
            UdfOwnerClass::Container => 27,
        }
    }
}

/// A typed UDF value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UdfValue {
    Text(String),
    Numeric(f64),
    Toggle(bool),
}

impl UdfValue {
    /// Coerce a raw `(udftype, udfvalue)` pair.
    ///
    /// Returns `None` for absent or empty values (the external views carry
    /// such rows; they are skipped, matching the server's own presentation)
    /// and for numeric values that do not parse.
    pub fn coerce(udf_type: Option<&str>, udf_value: Option<&str>) -> Option<UdfValue> {
        let value = udf_value.filter(|v| !v.is_empty())?;
        match udf_type {
            Some("Numeric") => value.parse::<f64>().ok().map(UdfValue::Numeric),
            // The LIMS serializes booleans as the literal strings
            // "True" / "False"; anything else counts as false.
            Some("Boolean") => Some(UdfValue::Toggle(value == "True")),
            _ => Some(UdfValue::Text(value.to_string())),
        }
    }
}

/// One key/value row as read from any of the `*_udf_view` views.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UdfField {
    pub udt_name: Option<String>,
    pub udf_name: Option<String>,
    pub udf_type: Option<String>,
    pub udf_value: Option<String>,
    pub udf_unit_label: Option<String>,
}

impl UdfField {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            udt_name: row.try_get("udtname")?,
            udf_name: row.try_get("udfname")?,
            udf_type: row.try_get("udftype")?,
            udf_value: row.try_get("udfvalue")?,
            udf_unit_label: row.try_get("udfunitlabel")?,
        })
    }

    /// The coerced value, or `None` when the row carries no usable value.
    pub fn value(&self) -> Option<UdfValue> {
        UdfValue::coerce(self.udf_type.as_deref(), self.udf_value.as_deref())
    }
}

/// Build a name -> typed-value map from UDF rows, skipping rows without a
/// name or usable value. Later rows win on duplicate names.
pub fn udf_map<'a, I>(fields: I) -> BTreeMap<String, UdfValue>
where
    I: IntoIterator<Item = &'a UdfField>,
{
    let mut map = BTreeMap::new();
    for field in fields {
        let Some(name) = field.udf_name.as_deref() else {
            continue;
        };
        if let Some(value) = field.value() {
            map.insert(name.to_string(), value);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, udf_type: &str, value: &str) -> UdfField {
        UdfField {
            udt_name: None,
            udf_name: Some(name.to_string()),
            udf_type: Some(udf_type.to_string()),
            udf_value: Some(value.to_string()),
            udf_unit_label: None,
        }
    }

    #[test]
    fn owner_class_ids_match_external_convention() {
        assert_eq!(UdfOwnerClass::Project.class_id(), 83);
        assert_eq!(UdfOwnerClass::Container.class_id(), 27);
    }

    #[test]
    fn coerces_numeric_boolean_and_text() {
        assert_eq!(
            UdfValue::coerce(Some("Numeric"), Some("12.5")),
            Some(UdfValue::Numeric(12.5))
        );
        assert_eq!(
            UdfValue::coerce(Some("Boolean"), Some("True")),
            Some(UdfValue::Toggle(true))
        );
        assert_eq!(
            UdfValue::coerce(Some("Boolean"), Some("False")),
            Some(UdfValue::Toggle(false))
        );
        assert_eq!(
            UdfValue::coerce(Some("String"), Some("RNA-seq")),
            Some(UdfValue::Text("RNA-seq".to_string()))
        );
    }

    #[test]
    fn empty_and_missing_values_are_skipped() {
        assert_eq!(UdfValue::coerce(Some("String"), Some("")), None);
        assert_eq!(UdfValue::coerce(Some("Numeric"), None), None);
        assert_eq!(UdfValue::coerce(Some("Numeric"), Some("not a number")), None);
    }

    #[test]
    fn udf_map_skips_unusable_rows_and_keeps_last_duplicate() {
        let rows = vec![
            field("Library prep", "String", "TruSeq"),
            field("Reads", "Numeric", "300"),
            UdfField {
                udf_name: Some("Empty".to_string()),
                udf_value: Some(String::new()),
                ..Default::default()
            },
            UdfField::default(),
            field("Library prep", "String", "Nextera"),
        ];
        let map = udf_map(&rows);
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("Library prep"),
            Some(&UdfValue::Text("Nextera".to_string()))
        );
        assert_eq!(map.get("Reads"), Some(&UdfValue::Numeric(300.0)));
    }
}
