//! Corticosteroid injection at any supported target.
//!
//! The anatomic target, approach and CPT code come from the injection target lookup, so this
//! note adapts to whatever structure the text or command names.

use mdm_types::Laterality;

use super::{
    any_discussed, conservative_care, diminishing_returns, discussion, education, em_billing,
    follow_up, follow_up_interval, indication, injection_procedure, injection_target, mdm,
    mdm_brief, modifier_25, side, sign_off, status_narrative, Note,
};
use crate::config::Configuration;
use crate::facts::{InjectionTarget, ParsedFacts};

const EDUCATION: &[&str] = &[
    "Relief typically begins within 3-7 days as the anesthetic wears off",
    "Repeated injections at the same site are limited to protect surrounding tissue",
];

fn target(facts: &ParsedFacts) -> InjectionTarget {
    injection_target(facts, InjectionTarget::Other("[target structure]".into()))
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let target = target(facts);
    let mut note = Note::new();

    if facts.procedures.injection {
        note.section("ASSESSMENT").line(format!(
            "Corticosteroid injection, {}, {}",
            target.label(),
            side(laterality)
        ));
        indication(&mut note, facts, &format!("pain at the {}", target.label()));
        if let Some(counsel) = diminishing_returns(facts, config) {
            note.line(counsel);
        }
        injection_procedure(&mut note, facts, &target, laterality, config);
        follow_up(
            &mut note,
            format!("Return in {} to assess response.", config.follow_up.post_injection),
        );
        super::billing(
            &mut note,
            config,
            [
                format!("{} {}", target.billing_code(), target.billing_description()),
                format!("[J-code] {}, [units]", config.injection.steroid),
            ],
        );
        modifier_25(
            &mut note,
            facts,
            &format!(
                "evaluation and management of a separate problem in addition to the {} injection",
                target.label()
            ),
        );
    } else {
        let diagnosis = format!("Pain at the {}", target.label());
        note.section("ASSESSMENT")
            .line(format!("{diagnosis}, {}", side(laterality)));
        note.section("STATUS").line(status_narrative(facts));
        if any_discussed(facts) {
            discussion(&mut note, facts);
            conservative_care(&mut note, facts, config);
            mdm_brief(&mut note, facts, config);
        } else {
            note.section("INJECTION CANDIDACY")
                .line(format!(
                    "Corticosteroid injection of the {} may be considered if symptoms persist despite conservative care.",
                    target.label()
                ))
                .line(format!("Approach if performed: {}.", target.approach()));
            conservative_care(&mut note, facts, config);
            mdm(&mut note, facts, &diagnosis, config);
        }
        follow_up(
            &mut note,
            format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
        );
        super::billing(&mut note, config, em_billing(facts, "[ICD-10]", &diagnosis));
    }

    education(&mut note, config, EDUCATION);
    sign_off(note, config)
}
