use serde::{Deserialize, Serialize};

/// Number of entity categories in an [`EntitySet`].
pub const CATEGORY_COUNT: usize = 8;

/// Categorized entities extracted from one document.
///
/// This is both the stored extraction payload and the AI enhancement
/// response contract: exactly these eight keys, each a list of strings.
/// `deny_unknown_fields` keeps the AI boundary strict — a response with
/// extra or missing keys fails to parse and falls back to the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct EntitySet {
    pub names: Vec<String>,
    pub ages: Vec<String>,
    pub dates: Vec<String>,
    pub medications: Vec<String>,
    pub symptoms: Vec<String>,
    pub vitals: Vec<String>,
    pub addresses: Vec<String>,
    #[serde(rename = "phoneNumbers")]
    pub phone_numbers: Vec<String>,
}

impl EntitySet {
    /// All categories as ordered (name, list) pairs.
    pub fn categories(&self) -> [(&'static str, &Vec<String>); CATEGORY_COUNT] {
        [
            ("names", &self.names),
            ("ages", &self.ages),
            ("dates", &self.dates),
            ("medications", &self.medications),
            ("symptoms", &self.symptoms),
            ("vitals", &self.vitals),
            ("addresses", &self.addresses),
            ("phone_numbers", &self.phone_numbers),
        ]
    }

    /// Total entities across all categories.
    pub fn total_entities(&self) -> usize {
        self.categories().iter().map(|(_, list)| list.len()).sum()
    }

    /// Fraction of categories holding at least one entity, in [0, 1].
    pub fn completeness(&self) -> f32 {
        let filled = self
            .categories()
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .count();
        filled as f32 / CATEGORY_COUNT as f32
    }

    pub fn is_empty(&self) -> bool {
        self.total_entities() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_zero_completeness() {
        let set = EntitySet::default();
        assert!(set.is_empty());
        assert_eq!(set.total_entities(), 0);
        assert_eq!(set.completeness(), 0.0);
    }

    #[test]
    fn completeness_counts_non_empty_categories() {
        let set = EntitySet {
            names: vec!["Jane Doe".into()],
            medications: vec!["Metformin 500mg".into(), "Lisinopril 10mg".into()],
            ..Default::default()
        };
        assert_eq!(set.total_entities(), 3);
        assert!((set.completeness() - 2.0 / 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn full_set_has_completeness_one() {
        let set = EntitySet {
            names: vec!["a".into()],
            ages: vec!["b".into()],
            dates: vec!["c".into()],
            medications: vec!["d".into()],
            symptoms: vec!["e".into()],
            vitals: vec!["f".into()],
            addresses: vec!["g".into()],
            phone_numbers: vec!["h".into()],
        };
        assert!((set.completeness() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn phone_numbers_serializes_camel_case() {
        let set = EntitySet {
            phone_numbers: vec!["555-0100".into()],
            ..Default::default()
        };
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains("\"phoneNumbers\""));
        assert!(!json.contains("phone_numbers"));
    }

    #[test]
    fn unknown_keys_rejected() {
        let json = r#"{
            "names": [], "ages": [], "dates": [], "medications": [],
            "symptoms": [], "vitals": [], "addresses": [], "phoneNumbers": [],
            "extra": []
        }"#;
        assert!(serde_json::from_str::<EntitySet>(json).is_err());
    }

    #[test]
    fn missing_keys_rejected() {
        let json = r#"{"names": ["A"]}"#;
        assert!(serde_json::from_str::<EntitySet>(json).is_err());
    }
}
