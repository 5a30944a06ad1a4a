use mdm_types::Laterality;
use regex::Regex;

use super::cues::{self, any_match, first_capture, ModalityCues};
use super::{ClinicalCues, Contracture, Finding, ParsedFacts, Values, WoundDimensions};

/// Resolution of one procedure modality. At most one of these holds per extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Performed,
    Declined,
    Planned,
    NotDiscussed,
}

/// Explicit refusal wins over completion language ("declined injection today"), completion wins
/// over a negation elsewhere in the note ("no relief after injection #1, injection #2 given"),
/// and any negation wins over futurity. A completion phrase that is itself negated ("no
/// injection today", "did not give injection") is not a completion.
fn resolve(cues: &ModalityCues, text: &str) -> Status {
    if !cues.mentioned.is_match(text) {
        Status::NotDiscussed
    } else if any_match(&cues.refused, text) {
        Status::Declined
    } else if performed(&cues.performed, text) {
        Status::Performed
    } else if any_match(&cues.negated, text) {
        Status::Declined
    } else if any_match(&cues.proposed, text) {
        Status::Planned
    } else {
        Status::NotDiscussed
    }
}

fn performed(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| {
        re.find_iter(text).any(|m| {
            !cues::NEGATION_WORD.is_match(m.as_str())
                && !cues::NEGATION_LEAD.is_match(&text[..m.start()])
        })
    })
}

/// Derives the structured facts for `text`.
///
/// Total over any input, including the empty string: a missing cue yields `false` or `None`,
/// never an error.
pub fn extract(text: &str) -> ParsedFacts {
    let mut facts = ParsedFacts::from_raw(text);

    for (flag, patterns) in cues::CONTRAINDICATION_CUES.iter() {
        if any_match(patterns, text) {
            facts.contraindications.set(*flag);
        }
    }

    for (flag, patterns) in cues::PROCEDURE_CUES.iter() {
        if any_match(patterns, text) {
            facts.procedures.set(*flag);
        }
    }

    for (flag, patterns) in cues::PLANNED_CUES.iter() {
        if any_match(patterns, text) {
            facts.planned.set(*flag);
        }
    }
    if facts.procedures.dispense_orthotics || facts.procedures.casting {
        facts.planned.orthotics = false;
    }

    match resolve(&cues::INJECTION_STATUS, text) {
        Status::Performed => facts.procedures.injection = true,
        Status::Declined => facts.declined.injection = true,
        Status::Planned => facts.planned.injection = true,
        Status::NotDiscussed => {}
    }
    let epat = resolve(&cues::EPAT_STATUS, text);
    match epat {
        Status::Performed => facts.procedures.epat = true,
        Status::Declined => facts.declined.epat = true,
        Status::Planned => facts.planned.epat = true,
        Status::NotDiscussed => {}
    }
    match resolve(&cues::SURGERY_STATUS, text) {
        Status::Declined => facts.declined.surgery = true,
        Status::Planned => facts.planned.surgery = true,
        Status::Performed | Status::NotDiscussed => {}
    }

    for (flag, patterns) in cues::FINDING_CUES.iter() {
        if any_match(patterns, text) {
            facts.findings.set(*flag);
        }
    }
    for (flag, patterns) in cues::NEGATED_FINDING_CUES.iter() {
        if any_match(patterns, text) {
            facts.findings.clear(*flag);
        }
    }
    if facts.findings.chronic {
        facts.findings.clear(Finding::Acute);
    }

    facts.values = extract_values(text, epat != Status::NotDiscussed);
    facts.laterality = laterality(text);
    facts.separate_problem = any_match(&cues::SEPARATE_PROBLEM, text);
    facts.is_diabetic_exam = any_match(&cues::DIABETIC_EXAM, text);
    facts.cues = clinical_cues(text);

    facts
}

/// Bilateral always wins; otherwise left is checked before right.
fn laterality(text: &str) -> Option<Laterality> {
    if cues::BILATERAL.is_match(text) {
        Some(Laterality::Bilateral)
    } else if cues::LEFT.is_match(text) {
        Some(Laterality::Left)
    } else if cues::RIGHT.is_match(text) {
        Some(Laterality::Right)
    } else {
        None
    }
}

fn extract_values(text: &str, epat_mentioned: bool) -> Values {
    let mut values = Values::default();

    if let Some(number) = first_capture(&cues::INJECTION_NUMBER, text) {
        values.injection_number = ordinal_number(&number);
    }
    if epat_mentioned {
        if let Some(session) = first_capture(&cues::EPAT_SESSION, text) {
            values.epat_session = ordinal_number(&session);
        }
    }

    values.duration = cues::DURATION.find(text).map(|m| m.as_str().to_string());
    values.wound = cues::WOUND_DIMENSIONS
        .find(text)
        .and_then(|m| WoundDimensions::parse(m.as_str()));
    values.a1c = first_capture(&cues::A1C, text);
    values.hva = first_capture(&cues::HVA, text);
    values.ima = first_capture(&cues::IMA, text);
    values.wagner = first_capture(&cues::WAGNER, text);
    values.grade = first_capture(&cues::COUGHLIN_GRADE, text).map(|g| g.to_uppercase());
    values.rom = first_capture(&cues::ROM, text);
    values.nail_count = first_capture(&cues::NAIL_COUNT, text);

    values
}

/// Normalises "2", "second" and "Second" to "2".
fn ordinal_number(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "first" => "1".into(),
        "second" => "2".into(),
        "third" => "3".into(),
        "fourth" => "4".into(),
        "fifth" => "5".into(),
        "sixth" => "6".into(),
        other => other.to_string(),
    }
}

fn labels(table: &[(&'static str, Vec<Regex>)], text: &str) -> Vec<String> {
    table
        .iter()
        .filter(|(_, patterns)| any_match(patterns, text))
        .map(|(label, _)| (*label).to_string())
        .collect()
}

fn clinical_cues(text: &str) -> ClinicalCues {
    let tendon_location = if any_match(&cues::NON_INSERTIONAL, text) {
        Some("non-insertional".to_string())
    } else if any_match(&cues::INSERTIONAL, text) {
        Some("insertional".to_string())
    } else {
        None
    };

    let contracture = if any_match(&cues::RIGID, text) {
        Some(Contracture::Rigid)
    } else if any_match(&cues::FLEXIBLE, text) {
        Some(Contracture::Flexible)
    } else {
        None
    };

    let mut digits: Vec<&str> = Vec::new();
    for digit in cues::DIGITS
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    {
        if !digits.contains(&digit) {
            digits.push(digit);
        }
    }

    ClinicalCues {
        prior_treatments: labels(&cues::PRIOR_TREATMENTS, text),
        wound_location: labels(&cues::WOUND_LOCATIONS, text).into_iter().next(),
        injection_target: cues::injection_target(text),
        tendon_location,
        deformities: labels(&cues::DEFORMITIES, text),
        biomechanics: labels(&cues::BIOMECHANICS, text),
        digits: (!digits.is_empty()).then(|| digits.join(", ")),
        contracture,
        lesion: any_match(&cues::LESION, text),
        subluxation: any_match(&cues::SUBLUXATION, text),
        surgery_mentioned: cues::SURGERY_STATUS.mentioned.is_match(text),
        escalate: any_match(&cues::ESCALATE, text),
        prior_ulcer: any_match(&cues::PRIOR_ULCER, text),
        prior_amputation: any_match(&cues::PRIOR_AMPUTATION, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::InjectionTarget;

    #[test]
    fn test_performed_injection_with_sequence_and_prior_care() {
        let facts = extract(
            "52 yo female, 4 months left heel pain, first step pain, failed stretching and OTC inserts, gave injection #2 today",
        );

        assert!(facts.procedures.injection);
        assert!(!facts.planned.injection);
        assert!(!facts.declined.injection);
        assert_eq!(facts.values.injection_number, "2");
        assert_eq!(facts.laterality, Some(Laterality::Left));
        assert_eq!(facts.values.duration.as_deref(), Some("4 months"));
        assert!(facts.findings.chronic);
        assert_eq!(
            facts.cues.prior_treatments,
            vec!["stretching".to_string(), "OTC arch supports".to_string()]
        );
    }

    #[test]
    fn test_separate_problem_during_diabetic_exam() {
        let facts = extract(
            "diabetic foot exam today, also injected left heel for separate plantar fasciitis",
        );

        assert!(facts.separate_problem);
        assert!(facts.is_diabetic_exam);
        assert!(facts.procedures.injection);
        assert!(facts.contraindications.diabetic);
        assert_eq!(
            facts.cues.injection_target,
            Some(InjectionTarget::PlantarFascia)
        );
    }

    #[test]
    fn test_patient_request_is_planned_not_performed() {
        let facts = extract("Achilles tendinopathy, chronic, patient asking about cortisone shot");
        assert!(facts.planned.injection);
        assert!(!facts.procedures.injection);
        assert!(facts.findings.chronic);
    }

    #[test]
    fn test_negation_beats_futurity() {
        let facts = extract("will consider injection but patient declines injection at this time");
        assert!(facts.declined.injection);
        assert!(!facts.planned.injection);

        let facts = extract("no injection for now, will discuss at next visit");
        assert!(facts.declined.injection);
        assert!(!facts.planned.injection);
    }

    #[test]
    fn test_negated_completion_is_not_performed() {
        for text in [
            "no injection today",
            "did not give injection, heel pain",
            "left heel pain, didn't give a steroid shot today",
        ] {
            let facts = extract(text);
            assert!(!facts.procedures.injection, "{text}");
            assert!(facts.declined.injection, "{text}");
        }

        let facts = extract("no EPAT today, heel pain improving");
        assert!(!facts.procedures.epat);
        assert!(facts.declined.epat);
    }

    #[test]
    fn test_history_negation_does_not_hide_todays_injection() {
        let facts = extract("no relief after injection #1, injection #2 given today");
        assert!(facts.procedures.injection);
        assert!(!facts.declined.injection);
    }

    #[test]
    fn test_negation_after_the_noun() {
        for text in [
            "injection not recommended at this time",
            "discussed injection, patient not interested",
            "not a candidate for injection given poor skin",
        ] {
            let facts = extract(text);
            assert!(facts.declined.injection, "{text}");
            assert!(!facts.planned.injection, "{text}");
            assert!(!facts.procedures.injection, "{text}");
        }

        let facts = extract("bunion, not a surgical candidate");
        assert!(facts.declined.surgery);
        assert!(facts.cues.surgery_mentioned);
    }

    #[test]
    fn test_refusal_beats_completion_language() {
        let facts = extract("patient declined injection today");
        assert!(facts.declined.injection);
        assert!(!facts.procedures.injection);
    }

    #[test]
    fn test_unrelated_text_yields_empty_facts() {
        let facts = extract("patient doing fine, see you next year");
        assert_eq!(facts.laterality, None);
        assert!(!facts.procedures.injection);
        assert!(!facts.planned.injection);
        assert!(!facts.contraindications.any());
        assert_eq!(facts.values, Values::default());
        assert_eq!(facts.raw_text, "patient doing fine, see you next year");
    }

    #[test]
    fn test_empty_input_is_total() {
        let facts = extract("");
        assert_eq!(facts, ParsedFacts::from_raw(""));
    }

    #[test]
    fn test_laterality_precedence() {
        assert_eq!(
            laterality("bilateral heel pain, left worse than right"),
            Some(Laterality::Bilateral)
        );
        assert_eq!(laterality("left and right"), Some(Laterality::Left));
        assert_eq!(laterality("RT ankle"), Some(Laterality::Right));
        assert_eq!(laterality("heel pain"), None);
        // "leftover" is not a laterality cue
        assert_eq!(laterality("leftover pain"), None);
    }

    #[test]
    fn test_injection_sequence_number() {
        assert_eq!(extract("heel pain").values.injection_number, "1");
        assert_eq!(extract("3rd injection to the heel").values.injection_number, "3");
        assert_eq!(extract("second shot today").values.injection_number, "2");
    }

    #[test]
    fn test_epat_session_counts_as_performed() {
        let facts = extract("EPAT session #3 today, heel pain improving");
        assert!(facts.procedures.epat);
        assert!(!facts.planned.epat);
        assert_eq!(facts.values.epat_session, "3");
        assert!(facts.findings.improved);
    }

    #[test]
    fn test_session_number_ignored_without_epat() {
        let facts = extract("PT session 4, heel pain");
        assert!(!facts.procedures.epat);
        assert_eq!(facts.values.epat_session, "1");
    }

    #[test]
    fn test_chronic_clears_acute() {
        let facts = extract("acute on chronic heel pain");
        assert!(facts.findings.chronic);
        assert!(!facts.findings.acute);
    }

    #[test]
    fn test_negated_infection_is_cleared() {
        let facts = extract("plantar ulcer, no signs of infection");
        assert!(!facts.findings.infection);

        let facts = extract("plantar ulcer with cellulitis");
        assert!(facts.findings.infection);
    }

    #[test]
    fn test_wound_values() {
        let facts = extract("plantar ulcer 2.5 x 1.8 cm, Wagner 2, A1c 7.9, heel");
        let wound = facts.values.wound.unwrap();
        assert_eq!(wound.surface_area(), 4.5);
        assert_eq!(facts.values.wagner.as_deref(), Some("2"));
        assert_eq!(facts.values.a1c.as_deref(), Some("7.9"));
        assert_eq!(facts.cues.wound_location.as_deref(), Some("heel"));
    }

    #[test]
    fn test_contraindication_flags_are_independent() {
        let facts = extract("on eliquis, CKD stage 3, T2DM");
        assert!(facts.contraindications.anticoagulant);
        assert!(facts.contraindications.kidney_issues);
        assert!(facts.contraindications.diabetic);
        assert!(!facts.contraindications.nsaid_allergy);
        assert!(!facts.contraindications.gi_issues);
    }

    #[test]
    fn test_hammertoe_cues() {
        let facts = extract("rigid hammertoe 2nd toe and 3rd toe right foot with corn");
        assert_eq!(facts.cues.digits.as_deref(), Some("2, 3"));
        assert_eq!(facts.cues.contracture, Some(Contracture::Rigid));
        assert!(facts.cues.lesion);
        assert!(facts.findings.deformity);
    }

    #[test]
    fn test_achilles_location_checks_non_insertional_first() {
        let facts = extract("non-insertional achilles tendinopathy");
        assert_eq!(facts.cues.tendon_location.as_deref(), Some("non-insertional"));

        let facts = extract("insertional achilles pain");
        assert_eq!(facts.cues.tendon_location.as_deref(), Some("insertional"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "right bunion, HVA 32 IMA 16, discussed surgery, on warfarin";
        assert_eq!(extract(text), extract(text));
        assert!(extract(text).planned.surgery);
    }
}
