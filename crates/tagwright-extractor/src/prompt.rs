//! Prompt construction for the two extraction stages

use crate::guide::VocabularyGuide;
use tagwright_llm::ChatMessage;

const SUMMARY_INSTRUCTIONS: &str = "You are an assistant that distills robotics paper context into a concise bullet summary for information extraction.
Rules:
- Output plain English text, 6-12 short bullets, no JSON, no numbering.
- Keep only facts likely present in the paper: institutions, methods, robot platforms, tasks, datasets, etc.
- Avoid speculation; if unknown, omit.
- Max ~200 words.";

const EXTRACTION_FIELDS: &str = "IMPORTANT: Your entire response MUST be ONLY valid JSON (no code fences, no commentary).
You extract structured research metadata for robotics papers.

Fields:
- institution: string (CN universities keep Chinese; top global universities use abbreviations like MIT/CMU/UC Berkeley/Stanford/etc.; others keep original full/short name)
- method_name: array of short names; if a variant, use \"XXX-like\". Prefer common acronym first, optionally full name in parentheses.
- research_content: array of main technical contents (e.g., \"GAN\", \"teacher student framework\"), short phrases (<=3 words).
- research_type: string (e.g., \"algorithm\", \"control\", \"planning\", \"model\", \"RL\", \"vision\").
- robot_name: array of platform names exactly as used (e.g., \"Unitree G1\", \"Atlas\", \"Digit\").
- robot_type: array of categories (e.g., \"humanoid\", \"animated humanoid\", \"bipedal\", \"quadruped\", \"manipulator\").
- task: array of tasks (e.g., \"locomotion\", \"loco-manipulation\", \"ladder climbing\", \"parkour\").";

const EXTRACTION_RULES: &str = "Rules:
- If a field is unknown, OMIT it entirely (do not guess; do not put null/unknown).
- Keep phrases concise (<=3 words) and in English, EXCEPT \"institution\" rule above.
- Do not include punctuation in values except hyphen inside a method like \"ASE-like\".
- IMPORTANT: When choosing values for method_name/research_content/research_type/robot_name/robot_type/task and any extended keys,
  you MUST prefer and reuse existing tags provided below if semantically equivalent, and prefer the highest-frequency variant.";

/// Marker closing every summarize request
pub const SUMMARY_REQUEST: &str = "Summarize now.";

/// Marker closing every extract request
pub const EXTRACTION_REQUEST: &str =
    "Now output ONLY the JSON object with the above fields that are present.";

/// Build the stage-1 (summarize) messages for a document context
pub fn summarize_messages(context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_INSTRUCTIONS),
        ChatMessage::user(format!("Context:\n{}\n\n{}", context, SUMMARY_REQUEST)),
    ]
}

/// Build the stage-2 (extract) messages for a stage-1 summary
///
/// The guide is left out entirely when empty.
pub fn extract_messages(
    summary: &str,
    guide: &VocabularyGuide,
    max_extended: usize,
) -> Vec<ChatMessage> {
    let system = format!(
        "{}\n\n{}\n\n{}",
        EXTRACTION_FIELDS,
        extended_field_instructions(max_extended),
        EXTRACTION_RULES
    );

    let mut user = format!("Summary:\n{}\n\n", summary);
    if !guide.is_empty() {
        user.push_str(guide.as_str());
        user.push_str("\n\n");
    }
    user.push_str(EXTRACTION_REQUEST);

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

fn extended_field_instructions(max_extended: usize) -> String {
    if max_extended == 0 {
        return "Do not output any field other than the ones listed above.".to_string();
    }
    format!(
        "Extended fields (optional, max {}) if clearly present:
- dataset, benchmark, sim_to_real, hardware, sensors, simulator, pretrain, etc.
Use lowercase snake_case for extended field names.",
        max_extended
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::vocabulary::FieldFrequencyTable;
    use tagwright_llm::Role;

    #[test]
    fn test_summarize_messages() {
        let messages = summarize_messages("Title: Walking Robots");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("6-12 short bullets"));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "Context:\nTitle: Walking Robots\n\nSummarize now."
        );
    }

    #[test]
    fn test_extract_messages_without_guide() {
        let messages = extract_messages("- a humanoid", &VocabularyGuide::default(), 3);
        assert!(messages[0].content.starts_with("IMPORTANT: Your entire response MUST be ONLY valid JSON"));
        assert!(messages[0].content.contains("max 3"));
        assert_eq!(
            messages[1].content,
            format!("Summary:\n- a humanoid\n\n{}", EXTRACTION_REQUEST)
        );
    }

    #[test]
    fn test_extract_messages_include_guide() {
        let table = FieldFrequencyTable::from_tags(["task:locomotion"]);
        let guide = VocabularyGuide::render(&table, &ExtractorConfig::default());
        let messages = extract_messages("- walking", &guide, 3);

        let user = &messages[1].content;
        assert!(user.contains("Existing task tags:\n- locomotion (1)"));
        assert!(user.find("Summary:").unwrap() < user.find("Existing task tags:").unwrap());
        assert!(user.ends_with(EXTRACTION_REQUEST));
    }

    #[test]
    fn test_no_extended_fields_allowed() {
        let messages = extract_messages("x", &VocabularyGuide::default(), 0);
        assert!(!messages[0].content.contains("Extended fields"));
    }
}
