//! Normalized extraction records

use crate::field::{CoreField, FieldValue};
use crate::tag::is_valid_key;
use std::collections::{BTreeMap, HashSet};

/// Validated extraction output
///
/// Holds the core fields keyed by [`CoreField`] (so they always iterate in
/// canonical order) and a side list of extended fields kept in insertion
/// order. The number of extended fields never exceeds the cap given at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    core: BTreeMap<CoreField, FieldValue>,
    extended: Vec<(String, FieldValue)>,
    max_extended: usize,
}

impl NormalizedRecord {
    /// Create an empty record accepting at most `max_extended` extended fields
    pub fn new(max_extended: usize) -> Self {
        Self {
            core: BTreeMap::new(),
            extended: Vec::new(),
            max_extended,
        }
    }

    /// Set a core field
    ///
    /// Empty values are ignored so that absent fields stay absent.
    pub fn set_core(&mut self, field: CoreField, value: FieldValue) {
        if value.is_empty() {
            return;
        }
        self.core.insert(field, value);
    }

    /// Try to add an extended field
    ///
    /// Returns `false` without modifying the record when the cap is reached,
    /// the key is not a valid tag key (see [`is_valid_key`]), the key names a
    /// core field, the key is already present, or `values` is empty.
    pub fn push_extended(&mut self, key: impl Into<String>, values: Vec<String>) -> bool {
        let key = key.into();
        if values.is_empty()
            || self.extended.len() >= self.max_extended
            || !is_valid_key(&key)
            || CoreField::parse(&key).is_some()
            || self.extended.iter().any(|(existing, _)| *existing == key)
        {
            return false;
        }
        self.extended.push((key, FieldValue::List(values)));
        true
    }

    /// Get a core field value
    pub fn get(&self, field: CoreField) -> Option<&FieldValue> {
        self.core.get(&field)
    }

    /// Get an extended field by key
    pub fn get_extended(&self, key: &str) -> Option<&FieldValue> {
        self.extended
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Extended field keys in insertion order
    pub fn extended_keys(&self) -> impl Iterator<Item = &str> {
        self.extended.iter().map(|(key, _)| key.as_str())
    }

    /// Number of extended fields
    pub fn extended_len(&self) -> usize {
        self.extended.len()
    }

    /// Whether the record holds no field at all
    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.extended.is_empty()
    }

    /// All fields in output order: core fields first, then extended fields
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.core
            .iter()
            .map(|(field, value)| (field.as_str(), value))
            .chain(self.extended.iter().map(|(key, value)| (key.as_str(), value)))
    }

    /// Candidate tag strings (`field:value`), duplicate-free, in output order
    pub fn tag_strings(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for (key, value) in self.fields() {
            for item in value.values() {
                let tag = format!("{}:{}", key, item);
                if seen.insert(tag.clone()) {
                    tags.push(tag);
                }
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_record() {
        let record = NormalizedRecord::new(3);
        assert!(record.is_empty());
        assert!(record.tag_strings().is_empty());
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let mut record = NormalizedRecord::new(3);
        record.set_core(CoreField::Task, FieldValue::List(vec![]));
        record.set_core(CoreField::Institution, FieldValue::Scalar(String::new()));
        assert!(!record.push_extended("dataset", vec![]));
        assert!(record.is_empty());
    }

    #[test]
    fn test_fields_in_canonical_order() {
        let mut record = NormalizedRecord::new(3);
        record.set_core(CoreField::Task, list(&["locomotion"]));
        record.set_core(CoreField::Institution, FieldValue::Scalar("MIT".to_string()));
        record.push_extended("simulator", vec!["Isaac Gym".to_string()]);
        record.push_extended("dataset", vec!["AMASS".to_string()]);

        let keys: Vec<_> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["institution", "task", "simulator", "dataset"]);
    }

    #[test]
    fn test_extended_cap() {
        let mut record = NormalizedRecord::new(2);
        assert!(record.push_extended("a", vec!["1".to_string()]));
        assert!(record.push_extended("b", vec!["2".to_string()]));
        assert!(!record.push_extended("c", vec!["3".to_string()]));
        assert_eq!(record.extended_keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_extended_rejects_core_and_duplicate_keys() {
        let mut record = NormalizedRecord::new(3);
        assert!(!record.push_extended("task", vec!["x".to_string()]));
        assert!(record.push_extended("dataset", vec!["x".to_string()]));
        assert!(!record.push_extended("dataset", vec!["y".to_string()]));
        assert_eq!(record.extended_len(), 1);
    }

    #[test]
    fn test_extended_rejects_malformed_keys() {
        let mut record = NormalizedRecord::new(5);
        for key in ["", "a:b", "x\n---\ny", "Robot Platform", "sim2real"] {
            assert!(!record.push_extended(key, vec!["v".to_string()]), "{:?} accepted", key);
        }
        assert!(record.is_empty());
        assert!(record.push_extended("robot_platform", vec!["v".to_string()]));
    }

    #[test]
    fn test_tag_strings() {
        let mut record = NormalizedRecord::new(3);
        record.set_core(CoreField::Institution, FieldValue::Scalar("CMU".to_string()));
        record.set_core(CoreField::RobotType, list(&["humanoid", "bipedal"]));
        record.push_extended("simulator", vec!["MuJoCo".to_string()]);

        assert_eq!(
            record.tag_strings(),
            vec![
                "institution:CMU",
                "robot_type:humanoid",
                "robot_type:bipedal",
                "simulator:MuJoCo",
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_extended_never_exceeds_cap(
            cap in 0usize..6,
            keys in proptest::collection::vec("[a-z_]{1,8}", 0..12),
        ) {
            let mut record = NormalizedRecord::new(cap);
            for key in keys {
                record.push_extended(key, vec!["v".to_string()]);
            }
            prop_assert!(record.extended_len() <= cap);
        }

        #[test]
        fn prop_tag_strings_are_unique(values in proptest::collection::vec("[a-c]{1,2}", 0..10)) {
            let mut record = NormalizedRecord::new(3);
            record.set_core(CoreField::Task, FieldValue::List(values.clone()));
            record.push_extended("dataset", values);
            let tags = record.tag_strings();
            let unique: HashSet<_> = tags.iter().collect();
            prop_assert_eq!(unique.len(), tags.len());
        }
    }
}
