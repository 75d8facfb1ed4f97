//! Aggregate confidence scoring.
//!
//! One 0–100 score per document. When AI enhancement succeeded its fixed
//! confidence dominates; otherwise the score degrades toward the raw OCR
//! confidence. Field completeness discounts the base by up to 15%:
//!
//! ```text
//! base  = 95                    (AI enhanced)
//!       | ocr_confidence * 100  (baseline only)
//! score = round(base * (0.85 + 0.15 * completeness))
//! ```
//!
//! The weighting keeps the score monotone non-decreasing in completeness
//! at fixed OCR/AI inputs, and a fully complete AI-enhanced extraction
//! reports exactly 95.

/// Fixed confidence contribution of a successful AI enhancement pass.
pub const AI_CONFIDENCE: u8 = 95;

/// Weight of the completeness discount.
const COMPLETENESS_WEIGHT: f32 = 0.15;

/// Compute the aggregate confidence score.
///
/// `ocr_confidence` and `completeness` are fractions in [0, 1]; inputs
/// outside that range are clamped. Result is an integer in [0, 100].
pub fn score_confidence(ocr_confidence: f32, ai_enhanced: bool, completeness: f32) -> u8 {
    let ocr = ocr_confidence.clamp(0.0, 1.0);
    let completeness = completeness.clamp(0.0, 1.0);

    let base = if ai_enhanced {
        AI_CONFIDENCE as f32
    } else {
        ocr * 100.0
    };

    let score = base * (1.0 - COMPLETENESS_WEIGHT + COMPLETENESS_WEIGHT * completeness);
    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_enhanced_full_completeness_is_exactly_95() {
        assert_eq!(score_confidence(0.3, true, 1.0), 95);
    }

    #[test]
    fn ai_enhanced_dominates_poor_ocr() {
        // Even with terrible OCR, AI success keeps the score near 95
        let score = score_confidence(0.1, true, 0.5);
        assert!(score >= 80, "got {score}");
    }

    #[test]
    fn baseline_only_tracks_ocr_confidence() {
        assert_eq!(score_confidence(0.8, false, 1.0), 80);
        assert_eq!(score_confidence(0.0, false, 1.0), 0);
    }

    #[test]
    fn more_complete_never_scores_lower() {
        for ai in [false, true] {
            for ocr in [0.0, 0.4, 0.8, 1.0] {
                let mut last = 0;
                for step in 0..=8 {
                    let completeness = step as f32 / 8.0;
                    let score = score_confidence(ocr, ai, completeness);
                    assert!(
                        score >= last,
                        "score decreased at ocr={ocr} ai={ai} completeness={completeness}"
                    );
                    last = score;
                }
            }
        }
    }

    #[test]
    fn output_always_in_range() {
        for (ocr, ai, completeness) in [
            (-1.0, false, -1.0),
            (2.0, false, 2.0),
            (1.0, true, 1.0),
            (0.0, true, 0.0),
        ] {
            let score = score_confidence(ocr, ai, completeness);
            assert!(score <= 100);
        }
    }

    #[test]
    fn out_of_range_inputs_clamped() {
        assert_eq!(score_confidence(5.0, false, 1.0), 100);
        assert_eq!(score_confidence(-5.0, false, 1.0), 0);
    }
}
