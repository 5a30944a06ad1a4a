use mdm_types::Laterality;

use super::{
    any_discussed, discussion, education, em_billing, follow_up, follow_up_interval, mdm, mdm_brief,
    nsaid_line, side, sign_off, status_narrative, Note,
};
use crate::config::Configuration;
use crate::constants::{HVA_MODERATE_THRESHOLD, HVA_SEVERE_THRESHOLD, IMA_FUSION_THRESHOLD};
use crate::facts::ParsedFacts;

const DIAGNOSIS: &str = "Hallux valgus";
const DIAGNOSIS_CODE: &str = "M20.10";

const EDUCATION: &[&str] = &[
    "Bunions do not resolve without surgery; conservative care targets symptoms",
    "Surgery is considered for pain that limits activity, not for appearance alone",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// `<20°` mild, `20-40°` moderate, `>40°` severe.
    fn from_hva(hva: f64) -> Self {
        if hva > HVA_SEVERE_THRESHOLD {
            Self::Severe
        } else if hva >= HVA_MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Mild
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

/// Procedure narrative keyed by severity, with a wide IMA favouring a first-ray fusion.
fn procedure_choice(severity: Option<Severity>, ima: Option<f64>) -> &'static str {
    let wide_ima = ima.is_some_and(|ima| ima > IMA_FUSION_THRESHOLD);
    match severity {
        _ if wide_ima => {
            "Lapidus (1st TMT arthrodesis) given IMA greater than 15° and first-ray hypermobility"
        }
        Some(Severity::Severe) => "Lapidus (1st TMT arthrodesis) for severe deformity",
        Some(Severity::Moderate) => "Scarf or Austin osteotomy for moderate deformity",
        Some(Severity::Mild) => "Distal chevron osteotomy for mild deformity",
        None => "[procedure] to be selected once radiographic angles are measured",
    }
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let severity = facts.values.hva_degrees().map(Severity::from_hva);
    let severity_label = severity.map_or("[severity]", |s| s.label());
    let hva = facts.values.hva.as_deref().unwrap_or("[X]");
    let ima = facts.values.ima.as_deref().unwrap_or("[X]");

    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "{DIAGNOSIS}, {}, {severity_label}, symptomatic",
        side(laterality)
    ));
    note.section("RADIOGRAPHIC MEASUREMENTS")
        .bullet(format!("HVA: {hva}° (normal <15°)"))
        .bullet(format!("IMA: {ima}° (normal <9°)"));
    note.section("STATUS").line(status_narrative(facts));
    note.section("CONSERVATIVE MANAGEMENT")
        .bullet("Wide toe box footwear")
        .bullet("Bunion padding and toe spacers")
        .bullet(nsaid_line(facts, config))
        .bullet("Custom orthotics if a biomechanical component is present");

    let choice = procedure_choice(severity, facts.values.ima_degrees());
    if any_discussed(facts) {
        discussion(&mut note, facts);
        note.line(format!("Procedure selection reviewed: {choice}."));
    } else if facts.cues.escalate || facts.cues.surgery_mentioned {
        note.section("SURGICAL CONSIDERATION")
            .bullet(if facts.cues.escalate {
                "Patient has failed an adequate trial of conservative care"
            } else {
                "Surgical correction raised at this visit"
            })
            .bullet(format!("Procedure selection based on severity: {choice}"))
            .bullet("Risks, benefits and recovery discussed");
    }

    follow_up(
        &mut note,
        format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
    );
    if any_discussed(facts) {
        mdm_brief(&mut note, facts, config);
    } else {
        mdm(&mut note, facts, DIAGNOSIS, config);
    }
    super::billing(&mut note, config, em_billing(facts, DIAGNOSIS_CODE, DIAGNOSIS));
    education(&mut note, config, EDUCATION);
    sign_off(note, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;
    use crate::facts::extract;

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::from_hva(19.0), Severity::Mild);
        assert_eq!(Severity::from_hva(20.0), Severity::Moderate);
        assert_eq!(Severity::from_hva(40.0), Severity::Moderate);
        assert_eq!(Severity::from_hva(41.0), Severity::Severe);
    }

    #[test]
    fn test_wide_ima_favours_fusion() {
        assert!(procedure_choice(Some(Severity::Moderate), Some(16.0)).starts_with("Lapidus"));
        assert!(procedure_choice(Some(Severity::Moderate), Some(12.0)).starts_with("Scarf"));
        assert!(procedure_choice(Some(Severity::Mild), None).starts_with("Distal chevron"));
    }

    #[test]
    fn test_surgical_discussion_from_command() {
        let parsed = parse_command(".hv r hva32 ima16 +s").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());

        assert!(doc.contains("Hallux valgus, right, moderate, symptomatic"));
        assert!(doc.contains("HVA: 32°"));
        assert!(doc.contains("Discussed surgical intervention"));
        assert!(doc.contains("Lapidus"));
    }

    #[test]
    fn test_unknown_angle_is_a_placeholder() {
        let facts = extract("painful bunion left foot");
        let doc = generate(&facts, facts.laterality, &Configuration::default());

        assert!(doc.contains("Hallux valgus, left, [severity], symptomatic"));
        assert!(doc.contains("HVA: [X]°"));
        assert!(!doc.contains("SURGICAL CONSIDERATION"));
    }

    #[test]
    fn test_bare_surgical_mention_adds_consideration() {
        for text in ["bunion right foot, lapidus", "bunion right foot, surgery"] {
            let facts = extract(text);
            assert!(!facts.planned.surgery, "{text}");
            let doc = generate(&facts, facts.laterality, &Configuration::default());

            assert!(doc.contains("SURGICAL CONSIDERATION:"), "{text}");
            assert!(doc.contains("Surgical correction raised at this visit"), "{text}");
            assert!(doc.contains("MEDICAL DECISION MAKING") || doc.contains("MDM"), "{text}");
        }
    }
}
