use crate::models::EntitySet;

use super::EnhancementError;

/// Sentinel string meaning "no entities in this category".
const SENTINEL: &str = "None";

/// Parse an AI response into a sanitized [`EntitySet`].
///
/// The envelope is lenient (a fenced ```json block or a bare object), but
/// the body is strict: exactly the eight categories, each a list of
/// strings. Sentinel entries are stripped here, at the trust boundary, so
/// downstream merging never sees a literal "None".
pub fn parse_enhancement_response(response: &str) -> Result<EntitySet, EnhancementError> {
    let json_str = extract_json_object(response)?;

    let mut entities: EntitySet = serde_json::from_str(json_str)
        .map_err(|e| EnhancementError::SchemaMismatch(e.to_string()))?;

    strip_sentinels(&mut entities);
    Ok(entities)
}

/// Locate the JSON object within the response text.
fn extract_json_object(response: &str) -> Result<&str, EnhancementError> {
    // Fenced block takes priority
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        let fence_end = response[content_start..]
            .find("```")
            .ok_or_else(|| EnhancementError::MalformedResponse("Unclosed JSON block".into()))?;
        return Ok(response[content_start..content_start + fence_end].trim());
    }

    // Otherwise the outermost braces
    let start = response
        .find('{')
        .ok_or_else(|| EnhancementError::MalformedResponse("No JSON object found".into()))?;
    let end = response
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| EnhancementError::MalformedResponse("Unterminated JSON object".into()))?;

    Ok(response[start..=end].trim())
}

/// Remove sentinel entries ("None", any casing, surrounding whitespace)
/// from every category, and drop entries that are empty after trimming.
fn strip_sentinels(entities: &mut EntitySet) {
    for list in [
        &mut entities.names,
        &mut entities.ages,
        &mut entities.dates,
        &mut entities.medications,
        &mut entities.symptoms,
        &mut entities.vitals,
        &mut entities.addresses,
        &mut entities.phone_numbers,
    ] {
        list.retain(|entry| {
            let trimmed = entry.trim();
            !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(SENTINEL)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response(medications: &str, symptoms: &str) -> String {
        format!(
            r#"{{
                "names": ["Jane Doe"],
                "ages": ["52"],
                "dates": ["2026-01-15"],
                "medications": {medications},
                "symptoms": {symptoms},
                "vitals": ["None"],
                "addresses": ["None"],
                "phoneNumbers": ["None"]
            }}"#
        )
    }

    #[test]
    fn parses_bare_object() {
        let entities =
            parse_enhancement_response(&full_response(r#"["Metformin 500mg"]"#, r#"["None"]"#))
                .unwrap();
        assert_eq!(entities.medications, vec!["Metformin 500mg"]);
        assert_eq!(entities.names, vec!["Jane Doe"]);
    }

    #[test]
    fn parses_fenced_block_with_surrounding_prose() {
        let response = format!(
            "Here is the extraction:\n```json\n{}\n```\nDone.",
            full_response(r#"["Metformin 500mg"]"#, r#"["fatigue"]"#)
        );
        let entities = parse_enhancement_response(&response).unwrap();
        assert_eq!(entities.symptoms, vec!["fatigue"]);
    }

    #[test]
    fn sentinel_entries_filtered_to_empty() {
        let entities =
            parse_enhancement_response(&full_response(r#"["None"]"#, r#"["none", " NONE "]"#))
                .unwrap();
        assert!(entities.medications.is_empty());
        assert!(entities.symptoms.is_empty());
        assert!(entities.vitals.is_empty());
    }

    #[test]
    fn sentinel_not_mistaken_for_entity_value() {
        // "None" mixed with real entries is still filtered
        let entities = parse_enhancement_response(&full_response(
            r#"["None", "Paracetamol 500mg"]"#,
            r#"["None"]"#,
        ))
        .unwrap();
        assert_eq!(entities.medications, vec!["Paracetamol 500mg"]);
    }

    #[test]
    fn missing_category_is_schema_mismatch() {
        let result = parse_enhancement_response(r#"{"names": ["A"]}"#);
        assert!(matches!(result, Err(EnhancementError::SchemaMismatch(_))));
    }

    #[test]
    fn extra_category_is_schema_mismatch() {
        let json = full_response("[]", "[]").replacen(
            r#""phoneNumbers": ["None"]"#,
            r#""phoneNumbers": ["None"], "extras": []"#,
            1,
        );
        let result = parse_enhancement_response(&json);
        assert!(matches!(result, Err(EnhancementError::SchemaMismatch(_))));
    }

    #[test]
    fn non_string_entries_are_schema_mismatch() {
        let json = full_response("[42]", "[]");
        assert!(matches!(
            parse_enhancement_response(&json),
            Err(EnhancementError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn no_json_at_all_is_malformed() {
        assert!(matches!(
            parse_enhancement_response("plain prose, no JSON"),
            Err(EnhancementError::MalformedResponse(_))
        ));
    }

    #[test]
    fn unclosed_fence_is_malformed() {
        assert!(matches!(
            parse_enhancement_response("```json\n{\"names\": []}"),
            Err(EnhancementError::MalformedResponse(_))
        ));
    }
}
