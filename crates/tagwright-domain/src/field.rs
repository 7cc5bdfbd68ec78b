//! Metadata fields and their value shapes

/// Fixed, always-recognized metadata field
///
/// Declaration order is the canonical output order: tags, annotation blocks
/// and vocabulary guides all list core fields in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoreField {
    /// Affiliated institution (scalar)
    Institution,

    /// Method names, acronym first
    MethodName,

    /// Main technical contents
    ResearchContent,

    /// Categorical research type (scalar)
    ResearchType,

    /// Robot platform names
    RobotName,

    /// Robot categories
    RobotType,

    /// Tasks addressed
    Task,
}

impl CoreField {
    /// All core fields in canonical order
    pub const ALL: [CoreField; 7] = [
        CoreField::Institution,
        CoreField::MethodName,
        CoreField::ResearchContent,
        CoreField::ResearchType,
        CoreField::RobotName,
        CoreField::RobotType,
        CoreField::Task,
    ];

    /// Get the field key as it appears in tags and model output
    pub fn as_str(&self) -> &'static str {
        match self {
            CoreField::Institution => "institution",
            CoreField::MethodName => "method_name",
            CoreField::ResearchContent => "research_content",
            CoreField::ResearchType => "research_type",
            CoreField::RobotName => "robot_name",
            CoreField::RobotType => "robot_type",
            CoreField::Task => "task",
        }
    }

    /// Parse a core field from its key
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == s)
    }

    /// Whether the field holds a single value rather than a list
    pub fn is_scalar(&self) -> bool {
        matches!(self, CoreField::Institution | CoreField::ResearchType)
    }
}

impl std::fmt::Display for CoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoreField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Not a core field: {}", s))
    }
}

/// Value held by a normalized field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single trimmed, non-empty value
    Scalar(String),

    /// Ordered, duplicate-free list of trimmed, non-empty values
    List(Vec<String>),
}

impl FieldValue {
    /// Iterate over the contained values (one for a scalar)
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            FieldValue::Scalar(value) => std::slice::from_ref(value),
            FieldValue::List(values) => values,
        };
        slice.iter().map(String::as_str)
    }

    /// Whether there is nothing to write
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(value) => value.is_empty(),
            FieldValue::List(values) => values.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_field_round_trip() {
        for field in CoreField::ALL {
            assert_eq!(CoreField::parse(field.as_str()), Some(field));
        }
        assert_eq!(CoreField::parse("dataset"), None);
        assert!("Task".parse::<CoreField>().is_err());
    }

    #[test]
    fn test_canonical_order_matches_ord() {
        let mut sorted = CoreField::ALL;
        sorted.sort();
        assert_eq!(sorted, CoreField::ALL);
    }

    #[test]
    fn test_scalar_fields() {
        let scalars: Vec<_> = CoreField::ALL.iter().filter(|f| f.is_scalar()).collect();
        assert_eq!(scalars, vec![&CoreField::Institution, &CoreField::ResearchType]);
    }

    #[test]
    fn test_field_value_iteration() {
        let scalar = FieldValue::Scalar("MIT".to_string());
        assert_eq!(scalar.values().collect::<Vec<_>>(), vec!["MIT"]);

        let list = FieldValue::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(list.values().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(FieldValue::List(vec![]).is_empty());
    }
}
