//! Free-text condition detection.
//!
//! Every registry row is scored as `matched patterns x PATTERN_WEIGHT`. The strictly highest
//! score wins, ties go to the earlier row, and nothing is selected below `MIN_DETECTION_SCORE`.

use serde::Serialize;

use crate::constants::{MIN_DETECTION_SCORE, PATTERN_WEIGHT};
use crate::registry::{self, ConditionDefinition, ConditionId};

#[derive(Clone, Copy, Debug)]
pub struct DetectionResult {
    pub condition: &'static ConditionDefinition,
    pub score: u32,
}

impl PartialEq for DetectionResult {
    fn eq(&self, other: &Self) -> bool {
        self.condition.id == other.condition.id && self.score == other.score
    }
}

impl Eq for DetectionResult {}

/// Per-condition score, in registry order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ConditionScore {
    pub id: ConditionId,
    pub score: u32,
}

pub fn scores(text: &str) -> Vec<ConditionScore> {
    registry::registry()
        .iter()
        .map(|condition| ConditionScore {
            id: condition.id,
            score: condition.matches(text) * PATTERN_WEIGHT,
        })
        .collect()
}

/// Selects the best-matching condition for `text`, if any clears the threshold.
pub fn detect(text: &str) -> Option<DetectionResult> {
    let mut best: Option<DetectionResult> = None;

    for condition in registry::registry() {
        let score = condition.matches(text) * PATTERN_WEIGHT;
        if score > best.map_or(0, |b| b.score) {
            best = Some(DetectionResult { condition, score });
        }
    }

    match best {
        Some(result) if result.score >= MIN_DETECTION_SCORE => {
            tracing::debug!(
                condition = %result.condition.id,
                score = result.score,
                "condition detected"
            );
            Some(result)
        }
        _ => {
            tracing::debug!("no condition cleared the detection threshold");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plantar_fasciitis_outscores_injection() {
        let result = detect(
            "52 yo female, 4 months left heel pain, first step pain, failed stretching and OTC inserts, gave injection #2 today",
        )
        .unwrap();
        assert_eq!(result.condition.id, ConditionId::PlantarFasciitis);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn test_diabetic_exam_outscores_separate_injection() {
        let result = detect(
            "diabetic foot exam today, also injected left heel for separate plantar fasciitis",
        )
        .unwrap();
        assert_eq!(result.condition.id, ConditionId::DiabeticFoot);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn test_achilles_request_for_cortisone() {
        let result =
            detect("Achilles tendinopathy, chronic, patient asking about cortisone shot").unwrap();
        assert_eq!(result.condition.id, ConditionId::Achilles);
    }

    #[test]
    fn test_no_keywords_detects_nothing() {
        assert!(detect("patient doing fine, see you next year").is_none());
        assert!(detect("").is_none());
        assert!(scores("patient doing fine").iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_ties_resolve_to_first_registered() {
        // one plantar fasciitis pattern and one injection pattern
        let result = detect("windlass, steroid").unwrap();
        assert_eq!(result.score, 10);
        assert_eq!(result.condition.id, ConditionId::PlantarFasciitis);

        // one hallux valgus pattern and one achilles pattern
        let result = detect("bunion and heel cord").unwrap();
        assert_eq!(result.condition.id, ConditionId::HalluxValgus);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let text = "ulcer 2 x 3 cm, wagner 2, diabetic";
        assert_eq!(detect(text), detect(text));
        assert_eq!(detect(text).unwrap().condition.id, ConditionId::WoundCare);
    }

    #[test]
    fn test_scores_follow_registry_order() {
        let scores = scores("bunion");
        assert_eq!(scores.len(), registry::registry().len());
        assert_eq!(scores[0].id, ConditionId::PlantarFasciitis);
        assert_eq!(
            scores.iter().find(|s| s.id == ConditionId::HalluxValgus).unwrap().score,
            10
        );
    }
}
