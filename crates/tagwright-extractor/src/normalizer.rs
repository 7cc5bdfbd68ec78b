//! Shape raw extraction results into normalized records

use crate::institution::canonicalize_institution;
use crate::parser::ExtractionResult;
use serde_json::Value;
use std::collections::HashSet;
use tagwright_domain::tag::is_valid_key;
use tagwright_domain::{CoreField, FieldValue, NormalizedRecord};
use tracing::debug;

/// Validates raw extraction output against the fixed field schema
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    max_extended: usize,
}

impl Normalizer {
    /// Create a normalizer keeping at most `max_extended` extended fields
    pub fn new(max_extended: usize) -> Self {
        Self { max_extended }
    }

    /// Normalize a raw extraction result
    ///
    /// Core fields are shaped to scalars or deduplicated lists and absent
    /// values are dropped; a scalar field given as a list keeps its items
    /// joined with `,`. Extended keys are lowercased with spaces and hyphens
    /// turned into underscores, and keys that still fall outside the tag key
    /// grammar are dropped. Extended fields are taken in the raw result's key
    /// order until the cap is reached; dropped keys and keys whose value is
    /// empty do not use up a slot.
    pub fn normalize(&self, raw: &ExtractionResult) -> NormalizedRecord {
        let mut record = NormalizedRecord::new(self.max_extended);

        for field in CoreField::ALL {
            let Some(value) = raw.get(field.as_str()) else {
                continue;
            };
            if field.is_scalar() {
                let mut parts = list_values(value);
                if field == CoreField::Institution {
                    parts = dedup(parts.iter().map(|part| canonicalize_institution(part)));
                }
                record.set_core(field, FieldValue::Scalar(parts.join(",")));
            } else {
                record.set_core(field, FieldValue::List(list_values(value)));
            }
        }

        for (key, value) in raw {
            if CoreField::parse(key).is_some() {
                continue;
            }
            if record.extended_len() >= self.max_extended {
                debug!("Extended field cap reached, dropping {}", key);
                break;
            }
            let canonical = canonical_key(key);
            if !is_valid_key(&canonical) {
                debug!("Dropping extended field with unusable key {:?}", key);
                continue;
            }
            record.push_extended(canonical, list_values(value));
        }

        record
    }
}

/// Lowercase a model-chosen key and turn runs of spaces and hyphens into `_`
fn canonical_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Text of a JSON value; null is empty, containers are compact JSON
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Single-line text of a JSON value, whitespace runs collapsed to one space
fn scalar_text(value: &Value) -> String {
    stringify(value).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, non-empty, duplicate-free strings in their original order
fn list_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => dedup(items.iter().map(scalar_text)),
        other => dedup([scalar_text(other)]),
    }
}

fn dedup(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> ExtractionResult {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_core_fields_shaped() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "institution": "  Carnegie Mellon University ",
            "research_type": "RL",
            "task": "locomotion",
            "robot_type": ["humanoid", " humanoid ", "", "bipedal"],
        })));

        assert_eq!(
            record.get(CoreField::Institution),
            Some(&FieldValue::Scalar("CMU".to_string()))
        );
        assert_eq!(
            record.get(CoreField::ResearchType),
            Some(&FieldValue::Scalar("RL".to_string()))
        );
        assert_eq!(record.get(CoreField::Task), Some(&list(&["locomotion"])));
        assert_eq!(record.get(CoreField::RobotType), Some(&list(&["humanoid", "bipedal"])));
    }

    #[test]
    fn test_empty_values_omitted() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "institution": "   ",
            "research_type": null,
            "task": [],
            "method_name": [null, ""],
        })));
        assert!(record.is_empty());
    }

    #[test]
    fn test_non_string_values_stringified() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "research_type": 7,
            "task": [true, 2.5, ["nested"], {"k": "v"}],
        })));
        assert_eq!(
            record.get(CoreField::ResearchType),
            Some(&FieldValue::Scalar("7".to_string()))
        );
        assert_eq!(
            record.get(CoreField::Task),
            Some(&list(&["true", "2.5", r#"["nested"]"#, r#"{"k":"v"}"#]))
        );
    }

    #[test]
    fn test_extended_fields_capped_in_order() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "dataset": ["AMASS"],
            "task": ["walking"],
            "benchmark": "D4RL",
            "simulator": ["Isaac Gym"],
            "hardware": ["Jetson"],
            "sensors": ["lidar"],
        })));
        assert_eq!(
            record.extended_keys().collect::<Vec<_>>(),
            vec!["dataset", "benchmark", "simulator"]
        );
        assert_eq!(record.get_extended("benchmark"), Some(&list(&["D4RL"])));
        assert_eq!(record.get(CoreField::Task), Some(&list(&["walking"])));
    }

    #[test]
    fn test_empty_extended_does_not_use_slot() {
        let record = Normalizer::new(1).normalize(&raw(json!({
            "dataset": [],
            "pretrain": null,
            "simulator": ["MuJoCo"],
        })));
        assert_eq!(record.extended_keys().collect::<Vec<_>>(), vec!["simulator"]);
    }

    #[test]
    fn test_zero_extended_cap() {
        let record = Normalizer::new(0).normalize(&raw(json!({"dataset": ["AMASS"]})));
        assert!(record.is_empty());
    }

    #[test]
    fn test_malformed_extended_keys_dropped() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "": ["blank"],
            "a:b": ["colon"],
            "x\n---\ny": ["delimiter"],
            "sim2real": ["yes"],
            "Robot Platform": ["Unitree G1"],
            "Motion-Capture": ["Vicon"],
        })));
        assert_eq!(
            record.extended_keys().collect::<Vec<_>>(),
            vec!["x_y", "robot_platform", "motion_capture"]
        );
        assert_eq!(
            record.tag_strings(),
            vec!["x_y:delimiter", "robot_platform:Unitree G1", "motion_capture:Vicon"]
        );
    }

    #[test]
    fn test_normalized_block_is_stable() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "note\n---\ntail": ["v"],
            "task": ["stair\nclimbing"],
            "dataset": ["C:\\data\\: raw"],
        })));
        let content = crate::annotation::render_content(&record);
        let once = crate::annotation::upsert("user text", &content);
        let twice = crate::annotation::upsert(&once, &content);
        assert_eq!(once, twice);

        let fields = crate::annotation::read_fields(&once);
        let expected: Vec<(String, FieldValue)> = record
            .fields()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        assert_eq!(fields, expected);
    }

    #[test]
    fn test_scalar_field_given_as_list() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "institution": ["Stanford University", " MIT ", "", "Massachusetts Institute of Technology"],
            "research_type": ["control", "RL"],
        })));
        assert_eq!(
            record.get(CoreField::Institution),
            Some(&FieldValue::Scalar("Stanford,MIT".to_string()))
        );
        assert_eq!(
            record.get(CoreField::ResearchType),
            Some(&FieldValue::Scalar("control,RL".to_string()))
        );
        assert_eq!(record.tag_strings()[0], "institution:Stanford,MIT");
    }

    #[test]
    fn test_whitespace_collapsed_in_values() {
        let record = Normalizer::new(3).normalize(&raw(json!({
            "institution": "Carnegie\tMellon\n University",
            "task": ["loco-\nmanipulation", "ladder   climbing"],
        })));
        assert_eq!(
            record.get(CoreField::Institution),
            Some(&FieldValue::Scalar("CMU".to_string()))
        );
        assert_eq!(
            record.get(CoreField::Task),
            Some(&list(&["loco- manipulation", "ladder climbing"]))
        );
        assert!(record.tag_strings().iter().all(|tag| !tag.contains('\n')));
    }
}
