use mdm_types::Laterality;

use super::{
    any_discussed, chronicity, conservative_care, diminishing_returns, discussion, duration,
    education, em_billing, epat_follow_up, epat_procedure, follow_up, follow_up_interval,
    indication, injection_procedure, injection_target, mdm, mdm_brief, modifier_25, side, sign_off,
    status_narrative, Note,
};
use crate::config::Configuration;
use crate::constants::EPAT_PLANTAR_FASCIA_CODE;
use crate::facts::{InjectionTarget, Modality, ParsedFacts};

const DIAGNOSIS: &str = "Plantar fasciitis";
const DIAGNOSIS_CODE: &str = "M72.2";

const EDUCATION: &[&str] = &[
    "Plantar fascia anatomy and the contribution of calf tightness",
    "Avoid barefoot walking on hard surfaces",
    "Recovery is typically gradual over 6-12 weeks with consistent home care",
];

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "{DIAGNOSIS}, {}{}",
        side(laterality),
        chronicity(facts)
    ));

    if facts.procedures.injection {
        injection_note(&mut note, facts, laterality, config);
    } else if facts.procedures.epat {
        epat_note(&mut note, facts, laterality, config);
    } else if any_discussed(facts) {
        discussion_note(&mut note, facts, config);
    } else {
        evaluation_note(&mut note, facts, laterality, config);
    }

    education(&mut note, config, EDUCATION);
    sign_off(note, config)
}

fn injection_note(
    note: &mut Note,
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) {
    let target = injection_target(facts, InjectionTarget::PlantarFascia);
    indication(note, facts, &format!("{} heel pain", side(laterality)));
    if let Some(counsel) = diminishing_returns(facts, config) {
        note.line(counsel);
    }
    injection_procedure(note, facts, &target, laterality, config);

    note.section("PLAN")
        .bullet(format!("Continue {}", config.conservative_care.stretching))
        .bullet(format!(
            "Continue {} arch supports and supportive footwear",
            config.conservative_care.arch_support
        ));
    follow_up(
        note,
        format!("Return in {} to assess response.", config.follow_up.post_injection),
    );
    super::billing(
        note,
        config,
        [
            format!("{} {}", target.billing_code(), target.billing_description()),
            format!("{DIAGNOSIS_CODE} {DIAGNOSIS}, {}", side(laterality)),
        ],
    );
    modifier_25(
        note,
        facts,
        &format!(
            "evaluation and management of a separate problem in addition to the {} injection",
            target.label()
        ),
    );
}

fn epat_note(
    note: &mut Note,
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) {
    indication(note, facts, &format!("{} heel pain", side(laterality)));
    epat_procedure(note, facts, "plantar fascia origin", laterality, config);
    note.section("PLAN")
        .bullet(format!("Continue {}", config.conservative_care.stretching))
        .bullet("Continue supportive footwear; avoid high-impact activity between sessions");
    follow_up(note, epat_follow_up(facts, config));
    super::billing(
        note,
        config,
        [
            format!(
                "{EPAT_PLANTAR_FASCIA_CODE} Extracorporeal shock wave, plantar fascia (session #{})",
                facts.values.epat_session
            ),
            format!("{DIAGNOSIS_CODE} {DIAGNOSIS}"),
        ],
    );
    modifier_25(
        note,
        facts,
        "evaluation and management of a separate problem in addition to EPAT treatment",
    );
}

fn discussion_note(note: &mut Note, facts: &ParsedFacts, config: &Configuration) {
    note.section("STATUS").line(status_narrative(facts));
    discussion(note, facts);
    if facts.discussed_only(Modality::Injection) {
        if let Some(counsel) = diminishing_returns(facts, config) {
            note.line(counsel);
        }
    }
    conservative_care(note, facts, config);
    follow_up(
        note,
        format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
    );
    mdm_brief(note, facts, config);
    super::billing(note, config, em_billing(facts, DIAGNOSIS_CODE, DIAGNOSIS));
}

fn evaluation_note(
    note: &mut Note,
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) {
    note.section("SUBJECTIVE").line(format!(
        "Patient presents with {} heel pain x {}. [Document first-step pain and aggravating activities]",
        side(laterality),
        duration(facts)
    ));
    if !facts.cues.prior_treatments.is_empty() {
        note.line(format!(
            "Prior treatment: {}",
            facts.cues.prior_treatments.join(", ")
        ));
    }
    note.section("OBJECTIVE")
        .bullet("Tenderness at the medial calcaneal tubercle: [present/absent]")
        .bullet("Windlass test: [positive/negative]")
        .bullet("Ankle dorsiflexion with knee extended: [degrees]");
    note.section("STATUS").line(status_narrative(facts));
    conservative_care(note, facts, config);

    let mut referrals = Vec::new();
    if facts.planned.physical_therapy {
        referrals.push("Physical therapy referral for plantar fascia and calf flexibility");
    }
    if facts.planned.mri {
        referrals.push("MRI ordered to evaluate for partial plantar fascia tear");
    }
    if facts.planned.orthotics {
        referrals.push("Custom functional orthotics recommended");
    }
    if facts.planned.cam_boot {
        referrals.push("CAM boot for short-term immobilization");
    }
    if !referrals.is_empty() {
        note.section("PLAN").bullets(referrals);
    }

    if facts.cues.escalate || facts.findings.chronic {
        let lead = if facts.findings.chronic {
            "Given the chronic nature and incomplete response to conservative care, escalation options:"
        } else {
            "Given incomplete response to conservative care, escalation options:"
        };
        note.section("ESCALATION")
            .line(lead)
            .bullet("Custom orthotics if OTC inserts failed after 4-6 weeks")
            .bullet("Night splint for the morning pain component")
            .bullet("Corticosteroid injection if 6+ weeks of conservative care have failed")
            .bullet("EPAT/shockwave therapy for recalcitrant cases (12+ weeks)");
    }

    follow_up(
        note,
        format!(
            "Return in {} for reassessment. Patient to contact the office if symptoms worsen.",
            follow_up_interval(facts, config)
        ),
    );
    mdm(note, facts, DIAGNOSIS, config);
    super::billing(note, config, em_billing(facts, DIAGNOSIS_CODE, DIAGNOSIS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command;
    use crate::facts::extract;

    fn draft(text: &str) -> String {
        let facts = extract(text);
        generate(&facts, facts.laterality, &Configuration::default())
    }

    #[test]
    fn test_performed_injection_produces_procedure_note() {
        let doc = draft(
            "52 yo female, 4 months left heel pain, first step pain, failed stretching and OTC inserts, gave injection #2 today",
        );

        assert!(doc.starts_with("ASSESSMENT:\nPlantar fasciitis, left, chronic"));
        assert!(doc.contains("Persistent left heel pain x 4 months"));
        assert!(doc.contains("- Prior corticosteroid injection x1"));
        assert!(doc.contains("This is injection #2 at this site"));
        assert!(doc.contains("PROCEDURE:"));
        assert!(doc.contains("dexamethasone sodium phosphate 4 mg/mL"));
        assert!(doc.contains("20550"));
        assert!(!doc.contains("MEDICAL DECISION MAKING"));
        assert!(!doc.contains("diminishing returns"));
        assert!(!doc.contains("MODIFIER 25"));
    }

    #[test]
    fn test_injection_at_threshold_adds_counseling() {
        let doc = draft("right plantar fasciitis, 3rd injection given today");
        assert!(doc.contains("diminishing returns"));
    }

    #[test]
    fn test_epat_follow_up_phrasing() {
        let doc = draft("plantar fasciitis left, EPAT session #2 today");
        assert!(doc.contains("EPAT session #2 of 5"));
        assert!(doc.contains("Return in 1 week for EPAT session #3."));
        assert!(doc.contains("28890"));

        let doc = draft("plantar fasciitis left, EPAT session #5 today");
        assert!(doc.contains("EPAT series complete"));
    }

    #[test]
    fn test_declined_injection_is_discussed_not_performed() {
        let doc = draft("left plantar fasciitis, patient declined injection");
        assert!(doc.contains("DISCUSSION:"));
        assert!(doc.contains("Patient declined"));
        assert!(doc.contains("MDM:"));
        assert!(!doc.contains("PROCEDURE:"));
    }

    #[test]
    fn test_negated_injection_writes_no_procedure() {
        let doc = draft("left plantar fasciitis, no injection today");
        assert!(!doc.contains("PROCEDURE:"));
        assert!(!doc.contains("Needle:"));
        assert!(!doc.contains("20550"));
        assert!(doc.contains("DISCUSSION:"));
    }

    #[test]
    fn test_command_escalation_note() {
        let parsed = parse_command(".pf left chronic +escalate").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());

        assert!(doc.contains("Plantar fasciitis, left, chronic"));
        assert!(doc.contains("ESCALATION:"));
        assert!(doc.contains("Night splint"));
        assert!(doc.contains("E&M 99214"));
        assert!(doc.ends_with("[Clinician] - draft for clinician review"));
    }

    #[test]
    fn test_anticoagulated_patient_gets_alternative_analgesic() {
        let doc = draft("left heel pain, on eliquis, first step pain");
        assert!(doc.contains("NSAIDs avoided due to anticoagulation"));
        assert!(doc.contains("Risk: Moderate (anticoagulation)"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let text = "bilateral heel pain 6 weeks, improving";
        assert_eq!(draft(text), draft(text));
    }
}
