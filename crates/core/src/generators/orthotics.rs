//! Custom foot orthoses.
//!
//! Three visit types, checked in order: dispensing (fit and education), casting or
//! prescription (medical-necessity narrative), and evaluation only, which defers to an
//! over-the-counter trial.

use mdm_types::Laterality;

use super::{duration, education, em_billing, follow_up, mdm, modifier_25, side, sign_off, Note};
use crate::config::Configuration;
use crate::facts::ParsedFacts;

const DEVICE_CODE: &str = "L3000";
const DEVICE_DESCRIPTION: &str = "Foot insert, removable, molded to patient model, UCB type";
const DIAGNOSIS: &str = "Foot pain with biomechanical dysfunction";

const EDUCATION: &[&str] = &[
    "Custom devices fit best in shoes with a removable insole",
    "Most patients adapt within two weeks; call if pain or blistering persists",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    Dispense,
    Prescription,
    Evaluation,
}

impl Visit {
    fn from_facts(facts: &ParsedFacts) -> Self {
        if facts.procedures.dispense_orthotics {
            Self::Dispense
        } else if facts.procedures.casting || facts.planned.orthotics {
            Self::Prescription
        } else {
            Self::Evaluation
        }
    }
}

fn biomechanical_findings(facts: &ParsedFacts) -> String {
    if facts.cues.biomechanics.is_empty() {
        "[document findings]".to_string()
    } else {
        facts.cues.biomechanics.join(", ")
    }
}

fn device_billing(laterality: Option<Laterality>) -> String {
    let units = match laterality {
        Some(Laterality::Bilateral) => "x2",
        Some(_) => "x1",
        None => "x[units]",
    };
    format!("{DEVICE_CODE} {units} {DEVICE_DESCRIPTION}")
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let mut note = Note::new();

    match Visit::from_facts(facts) {
        Visit::Dispense => {
            note.section("ASSESSMENT")
                .line(format!("Custom functional foot orthoses dispensed, {}", side(laterality)));
            note.section("FIT CHECK")
                .bullet("Devices fit well in the patient's shoes")
                .bullet("Arch contour and heel cup appropriate; no areas of irritation")
                .bullet("Gait observed with devices: [document]");
            note.section("INSTRUCTIONS")
                .bullet("Break-in: wear 1-2 hours on day one, adding 1 hour per day")
                .bullet("Discontinue and call for blistering, new pain or pressure areas")
                .bullet("Transfer between shoes with a removable insole");
            follow_up(&mut note, "Return in 4-6 weeks to assess comfort and response.");
            super::billing(&mut note, config, [device_billing(laterality)]);
            modifier_25(
                &mut note,
                facts,
                "evaluation and management of a separate problem in addition to orthotic dispensing",
            );
        }
        Visit::Prescription => {
            note.section("ASSESSMENT").line(format!(
                "Custom functional foot orthoses medically necessary, {}",
                side(laterality)
            ));
            note.section("MEDICAL NECESSITY")
                .bullet(format!(
                    "OTC arch supports trialed x {} without adequate relief",
                    duration(facts)
                ))
                .bullet(format!("Biomechanical findings: {}", biomechanical_findings(facts)))
                .bullet("Functional deficit: [document ADL/work impact]")
                .bullet("Custom devices required; OTC devices are inadequate for patient-specific biomechanics");
            note.section("DEVICE SPECIFICATIONS")
                .bullet(if facts.procedures.casting {
                    "Casting: foam box impression obtained today"
                } else {
                    "Casting: foam box impression at the next visit"
                })
                .bullet("Type: functional orthosis")
                .bullet("Posting: per biomechanical assessment")
                .bullet("Top cover: per activity level");
            follow_up(&mut note, "Return for dispensing and fit check.");
            super::billing(&mut note, config, [device_billing(laterality)]);
        }
        Visit::Evaluation => {
            note.section("ASSESSMENT")
                .line(format!("{DIAGNOSIS}, {}", side(laterality)));
            note.section("BIOMECHANICAL EXAMINATION")
                .bullet(format!("Findings: {}", biomechanical_findings(facts)))
                .bullet("Gait: [document]");
            note.section("PLAN")
                .bullet(format!(
                    "Trial of OTC arch supports ({}) for 4-6 weeks",
                    config.conservative_care.arch_support
                ))
                .bullet("Supportive footwear")
                .bullet("Custom orthotics to be considered if the OTC trial fails");
            follow_up(&mut note, "Return in 4-6 weeks to assess the OTC trial.");
            mdm(&mut note, facts, DIAGNOSIS, config);
            super::billing(&mut note, config, em_billing(facts, "[ICD-10]", DIAGNOSIS));
        }
    }

    education(&mut note, config, EDUCATION);
    sign_off(note, config)
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
    fn test_dispense_takes_precedence() {
        let parsed = parse_command(".ortho +dispense +cast b").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());

        assert!(doc.contains("orthoses dispensed, bilateral"));
        assert!(doc.contains("FIT CHECK:"));
        assert!(doc.contains("L3000 x2"));
        assert!(!doc.contains("MEDICAL NECESSITY"));
    }

    #[test]
    fn test_casting_note_documents_otc_trial() {
        let doc = draft(
            "pes planus with overpronation, OTC inserts failed x 3 months, casted today for custom orthotics right",
        );

        assert!(doc.contains("medically necessary, right"));
        assert!(doc.contains("OTC arch supports trialed x 3 months"));
        assert!(doc.contains("Biomechanical findings: pes planus, overpronation"));
        assert!(doc.contains("foam box impression obtained today"));
    }

    #[test]
    fn test_missing_trial_duration_is_a_placeholder() {
        let parsed = parse_command(".ortho +prescribe").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());

        assert!(doc.contains("trialed x [duration]"));
        assert!(doc.contains("[document findings]"));
        assert!(doc.contains("x[units]"));
    }

    #[test]
    fn test_evaluation_defers_to_otc_trial() {
        let doc = draft("arch pain left foot, flat feet");

        assert!(doc.contains("Trial of OTC arch supports (Powerstep)"));
        assert!(doc.contains("Findings: pes planus"));
        assert!(doc.contains("MEDICAL DECISION MAKING:"));
    }
}
