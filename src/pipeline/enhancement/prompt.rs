//! Prompt construction for the entity-enhancement call.

pub const ENHANCEMENT_SYSTEM_PROMPT: &str = "You are a medical document entity extractor. \
Respond with a single JSON object and nothing else. The object must have exactly these keys: \
names, ages, dates, medications, symptoms, vitals, addresses, phoneNumbers. \
Each key maps to a list of strings. If a category has no entities, return [\"None\"].";

/// Build the per-document prompt: the raw text plus the baseline findings
/// as context, so the model extends rather than restarts the extraction.
pub fn build_enhancement_prompt(raw_text: &str, baseline_json: &str) -> String {
    format!(
        "Extract all medical entities from the document below.\n\
         \n\
         A deterministic first pass already found:\n{baseline_json}\n\
         \n\
         Review the full text and return the complete categorized entity set \
         as a JSON object with the keys names, ages, dates, medications, symptoms, \
         vitals, addresses, phoneNumbers. Use [\"None\"] for empty categories.\n\
         \n\
         Document text:\n---\n{raw_text}\n---"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_and_baseline() {
        let prompt = build_enhancement_prompt("Metformin 500mg", "{\"medications\":[]}");
        assert!(prompt.contains("Metformin 500mg"));
        assert!(prompt.contains("{\"medications\":[]}"));
        assert!(prompt.contains("phoneNumbers"));
    }

    #[test]
    fn system_prompt_names_all_categories() {
        for key in [
            "names", "ages", "dates", "medications", "symptoms", "vitals", "addresses",
            "phoneNumbers",
        ] {
            assert!(ENHANCEMENT_SYSTEM_PROMPT.contains(key), "missing {key}");
        }
    }
}
