use regex::Regex;

use crate::models::EntitySet;

use super::types::BaselineExtractor;

/// Deterministic, regex-driven baseline extractor.
///
/// Deliberately conservative: it only surfaces patterns it can match with
/// high precision (dosages, dated values, vitals readings, titled names).
/// The AI enhancement pass fills in what the patterns miss.
pub struct RegexBaselineExtractor {
    names: Vec<Regex>,
    ages: Vec<Regex>,
    dates: Vec<Regex>,
    medications: Vec<Regex>,
    symptoms: Vec<Regex>,
    vitals: Vec<Regex>,
    addresses: Vec<Regex>,
    phone_numbers: Vec<Regex>,
}

impl RegexBaselineExtractor {
    pub fn new() -> Self {
        let rx = |pattern: &str| Regex::new(pattern).expect("invalid baseline pattern");

        Self {
            names: vec![
                rx(r"\b(?:Dr|Mr|Mrs|Ms)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?"),
                rx(r"(?i)patient(?:\s+name)?\s*[:\-]\s*([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)"),
            ],
            ages: vec![
                rx(r"(?i)\bage[d]?\s*[:\s]\s*(\d{1,3})\b"),
                rx(r"(?i)\b(\d{1,3})[-\s](?:years?[-\s]old|y/?o)\b"),
            ],
            dates: vec![
                rx(r"\b\d{4}-\d{2}-\d{2}\b"),
                rx(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
            ],
            medications: vec![rx(
                r"(?i)\b[A-Za-z][a-zA-Z]{2,}\s+\d+(?:\.\d+)?\s?(?:mg|mcg|g|ml|units?)\b",
            )],
            symptoms: vec![rx(
                r"(?i)(?:complain(?:s|ed)?\s+of|presents?\s+with|reports?)\s+([a-z][a-z\s,]{2,60}?)(?:\.|;|$)",
            )],
            vitals: vec![
                rx(r"(?i)\b(?:BP|blood\s+pressure)\s*[:\s]\s*\d{2,3}\s*/\s*\d{2,3}\b"),
                rx(r"(?i)\b(?:HR|pulse|heart\s+rate)\s*[:\s]\s*\d{2,3}\b"),
                rx(r"(?i)\b(?:temp(?:erature)?)\s*[:\s]\s*\d{2,3}(?:\.\d)?\s*°?\s*[CF]?\b"),
                rx(r"(?i)\bSpO2\s*[:\s]\s*\d{2,3}\s*%"),
            ],
            addresses: vec![rx(
                r"\b\d+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\s+(?:Street|St|Avenue|Ave|Road|Rd|Lane|Ln|Drive|Dr|Boulevard|Blvd)\b",
            )],
            phone_numbers: vec![rx(
                r"\b(?:\+?\d{1,2}[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]\d{3}[\s.-]?\d{4}\b",
            )],
        }
    }

    fn matches(patterns: &[Regex], text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for pattern in patterns {
            for caps in pattern.captures_iter(text) {
                // Prefer the first capture group when the pattern has one
                let m = caps
                    .get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                if !m.is_empty() && !found.contains(&m) {
                    found.push(m);
                }
            }
        }
        found
    }
}

impl Default for RegexBaselineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselineExtractor for RegexBaselineExtractor {
    fn extract(&self, text: &str) -> EntitySet {
        EntitySet {
            names: Self::matches(&self.names, text),
            ages: Self::matches(&self.ages, text),
            dates: Self::matches(&self.dates, text),
            medications: Self::matches(&self.medications, text),
            symptoms: Self::matches(&self.symptoms, text),
            vitals: Self::matches(&self.vitals, text),
            addresses: Self::matches(&self.addresses, text),
            phone_numbers: Self::matches(&self.phone_numbers, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> EntitySet {
        RegexBaselineExtractor::new().extract(text)
    }

    #[test]
    fn extracts_medication_dosages() {
        let set = extract("Prescribed Metformin 500mg twice daily and Lisinopril 10 mg.");
        assert_eq!(set.medications.len(), 2);
        assert!(set.medications[0].to_lowercase().contains("metformin"));
    }

    #[test]
    fn extracts_iso_and_slashed_dates() {
        let set = extract("Seen on 2026-01-15, follow up 3/4/2026.");
        assert_eq!(set.dates, vec!["2026-01-15", "3/4/2026"]);
    }

    #[test]
    fn extracts_vitals() {
        let set = extract("BP: 120/80, HR: 72, Temp: 37.2 C, SpO2: 98%");
        assert_eq!(set.vitals.len(), 4);
    }

    #[test]
    fn blood_pressure_not_mistaken_for_date() {
        let set = extract("BP: 120/80 recorded.");
        assert!(set.dates.is_empty());
        assert_eq!(set.vitals.len(), 1);
    }

    #[test]
    fn extracts_titled_and_labelled_names() {
        let set = extract("Patient: Jane Doe, referred by Dr. Chen.");
        assert!(set.names.iter().any(|n| n.contains("Jane Doe")));
        assert!(set.names.iter().any(|n| n.contains("Dr")));
    }

    #[test]
    fn extracts_age_forms() {
        let set = extract("Jane Doe, aged 52, presents with fatigue. Brother is 48 years old.");
        assert_eq!(set.ages, vec!["52", "48"]);
    }

    #[test]
    fn extracts_symptoms_clause() {
        let set = extract("Patient presents with fatigue and dizziness. Exam normal.");
        assert_eq!(set.symptoms.len(), 1);
        assert!(set.symptoms[0].contains("fatigue"));
    }

    #[test]
    fn extracts_phone_and_address() {
        let set = extract("Contact: (555) 123-4567, 42 Maple Street.");
        assert_eq!(set.phone_numbers.len(), 1);
        assert_eq!(set.addresses, vec!["42 Maple Street"]);
    }

    #[test]
    fn deterministic_and_deduplicated() {
        let text = "Metformin 500mg. Metformin 500mg again.";
        let a = extract(text);
        let b = extract(text);
        assert_eq!(a, b);
        assert_eq!(a.medications.len(), 1);
    }

    #[test]
    fn plain_prose_yields_empty_set() {
        let set = extract("General wellness discussion, nothing specific noted.");
        assert!(set.is_empty());
    }
}
