use std::collections::BTreeMap;

use crate::record::{AttrValue, Record};

/// Flattened attributes of one record, keyed by attribute name.
pub type FieldMap = BTreeMap<String, AttrValue>;

/// Flatten a record's attributes into a [`FieldMap`].
///
/// Attributes are visited in call order, so on duplicate keys the last
/// one wins. The record is left untouched.
pub fn extract(record: &Record) -> FieldMap {
    let mut fields = FieldMap::new();
    for attr in &record.attributes {
        fields.insert(attr.key.clone(), attr.value.clone());
    }
    fields
}
