//! Digitized-stage output formatting.
//!
//! Produces the human-readable structured text persisted alongside the
//! raw extraction once a document reaches `digitized`.

use crate::models::enums::DocumentType;
use crate::models::EntitySet;

/// Render the finalized structured text for a document.
pub fn format_document(
    doc_type: DocumentType,
    patient_name: &str,
    raw_text: &str,
    entities: &EntitySet,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {} — {}\n", title_for(doc_type), patient_name));

    for (category, list) in entities.categories() {
        if list.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {}\n", heading_for(category)));
        for entry in list {
            out.push_str(&format!("- {entry}\n"));
        }
    }

    out.push_str("\n## Source Text\n");
    out.push_str(raw_text.trim());
    out.push('\n');

    out
}

fn title_for(doc_type: DocumentType) -> &'static str {
    match doc_type {
        DocumentType::CaseHistory => "Case History",
        DocumentType::ConsultationNotes => "Consultation Notes",
        DocumentType::Prescription => "Prescription",
        DocumentType::Other => "Document",
    }
}

fn heading_for(category: &str) -> String {
    match category {
        "phone_numbers" => "Phone Numbers".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_title_and_sections() {
        let entities = EntitySet {
            medications: vec!["Metformin 500mg".into()],
            vitals: vec!["BP: 120/80".into()],
            ..Default::default()
        };
        let text = format_document(
            DocumentType::Prescription,
            "Jane Doe",
            "Metformin 500mg. BP: 120/80.",
            &entities,
        );

        assert!(text.starts_with("# Prescription — Jane Doe"));
        assert!(text.contains("## Medications\n- Metformin 500mg"));
        assert!(text.contains("## Vitals\n- BP: 120/80"));
        assert!(text.contains("## Source Text"));
    }

    #[test]
    fn empty_categories_omitted() {
        let text = format_document(
            DocumentType::Other,
            "Jane Doe",
            "nothing here",
            &EntitySet::default(),
        );
        assert!(!text.contains("## Medications"));
        assert!(!text.contains("## Symptoms"));
        assert!(text.contains("## Source Text"));
    }

    #[test]
    fn phone_numbers_heading_is_human_readable() {
        let entities = EntitySet {
            phone_numbers: vec!["(555) 123-4567".into()],
            ..Default::default()
        };
        let text = format_document(DocumentType::CaseHistory, "J", "t", &entities);
        assert!(text.contains("## Phone Numbers"));
    }
}
