use crate::models::EntitySet;
use crate::pipeline::confidence::AI_CONFIDENCE;

use super::client::AiClient;
use super::parser::parse_enhancement_response;
use super::prompt::{build_enhancement_prompt, ENHANCEMENT_SYSTEM_PROMPT};

/// Result of the merge pass: the combined entity set plus the AI
/// confidence contribution (absent when enhancement did not run or
/// failed).
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub entities: EntitySet,
    pub ai_confidence: Option<u8>,
}

impl MergeOutcome {
    pub fn ai_enhanced(&self) -> bool {
        self.ai_confidence.is_some()
    }
}

/// Combines the baseline extraction with an optional AI enhancement pass.
///
/// Constructed with an optional client; without one, merging is the
/// identity on the baseline. AI failures of any kind (unreachable,
/// timeout, malformed or off-schema response) degrade silently to the
/// baseline — they are logged but never surfaced as a document error.
pub struct EntityMerger {
    ai: Option<Box<dyn AiClient + Send + Sync>>,
}

impl EntityMerger {
    pub fn new(ai: Option<Box<dyn AiClient + Send + Sync>>) -> Self {
        Self { ai }
    }

    /// Baseline-only merger.
    pub fn baseline_only() -> Self {
        Self { ai: None }
    }

    pub fn merge(&self, raw_text: &str, baseline: &EntitySet) -> MergeOutcome {
        let Some(ai) = &self.ai else {
            return MergeOutcome {
                entities: baseline.clone(),
                ai_confidence: None,
            };
        };

        let baseline_json = serde_json::to_string(baseline).unwrap_or_else(|_| "{}".into());
        let prompt = build_enhancement_prompt(raw_text, &baseline_json);

        let enhanced = ai
            .enhance(&prompt, ENHANCEMENT_SYSTEM_PROMPT)
            .and_then(|response| parse_enhancement_response(&response));

        match enhanced {
            Ok(ai_entities) => MergeOutcome {
                entities: merge_entity_sets(baseline, &ai_entities),
                ai_confidence: Some(AI_CONFIDENCE),
            },
            Err(e) => {
                tracing::warn!(error = %e, "AI enhancement failed, falling back to baseline");
                MergeOutcome {
                    entities: baseline.clone(),
                    ai_confidence: None,
                }
            }
        }
    }
}

/// Field-by-field merge policy: an empty baseline category is replaced by
/// the AI output; when both sides are non-empty the result is the ordered
/// union (baseline entries first, AI additions appended, trimmed
/// exact-match dedup).
pub fn merge_entity_sets(baseline: &EntitySet, ai: &EntitySet) -> EntitySet {
    EntitySet {
        names: merge_category(&baseline.names, &ai.names),
        ages: merge_category(&baseline.ages, &ai.ages),
        dates: merge_category(&baseline.dates, &ai.dates),
        medications: merge_category(&baseline.medications, &ai.medications),
        symptoms: merge_category(&baseline.symptoms, &ai.symptoms),
        vitals: merge_category(&baseline.vitals, &ai.vitals),
        addresses: merge_category(&baseline.addresses, &ai.addresses),
        phone_numbers: merge_category(&baseline.phone_numbers, &ai.phone_numbers),
    }
}

fn merge_category(baseline: &[String], ai: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = baseline.iter().map(|s| s.trim().to_string()).collect();
    for entry in ai {
        let trimmed = entry.trim();
        if !trimmed.is_empty() && !merged.iter().any(|m| m == trimmed) {
            merged.push(trimmed.to_string());
        }
    }
    merged
}
