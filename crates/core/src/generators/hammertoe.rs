use mdm_types::Laterality;

use super::{
    any_discussed, discussion, education, em_billing, follow_up, follow_up_interval, mdm, mdm_brief,
    modifier_25, side, sign_off, status_narrative, Note,
};
use crate::config::Configuration;
use crate::facts::{Contracture, ParsedFacts};

const DIAGNOSIS: &str = "Hammertoe deformity";
const DIAGNOSIS_CODE: &str = "M20.40";
const PARING_CODE: &str = "11055";

const EDUCATION: &[&str] = &[
    "Shoes with a deep, wide toe box reduce pressure over the toes",
    "Corns recur while the deformity persists; regular paring is expected",
];

fn contracture_label(contracture: Option<Contracture>) -> &'static str {
    match contracture {
        Some(Contracture::Rigid) => "rigid",
        Some(Contracture::Flexible) => "flexible",
        None => "[flexibility]",
    }
}

/// Surgical options for the contracture type.
fn surgical_options(contracture: Option<Contracture>) -> &'static str {
    match contracture {
        Some(Contracture::Rigid) => "PIPJ arthroplasty or arthrodesis",
        Some(Contracture::Flexible) => "flexor tenotomy or flexor-to-extensor tendon transfer",
        None => "arthroplasty vs arthrodesis vs tendon procedure based on flexibility",
    }
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let digits = facts.cues.digits.as_deref().unwrap_or("[digits]");
    let contracture = facts.cues.contracture;

    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "{DIAGNOSIS}, digit(s) {digits}, {}, {}",
        side(laterality),
        contracture_label(contracture)
    ));
    if facts.cues.lesion {
        note.line("Associated hyperkeratotic lesion (corn) at the dorsal PIPJ.");
    }

    if facts.procedures.debridement {
        note.section("PROCEDURE")
            .line("Verbal consent obtained for paring of the lesion.")
            .bullet(format!("Hyperkeratotic lesion(s) pared with a #15 blade, digit(s) {digits}"))
            .bullet("No bleeding; underlying skin intact")
            .bullet("Protective padding applied")
            .bullet("Patient tolerated the procedure well");
        note.section("PLAN")
            .bullet("Wide, deep toe box footwear")
            .bullet("Silicone toe sleeves or crest pads to offload the lesion");
        follow_up(
            &mut note,
            format!("Return in {} for routine lesion care.", follow_up_interval(facts, config)),
        );
        super::billing(
            &mut note,
            config,
            [
                format!("{PARING_CODE} Paring or cutting of benign hyperkeratotic lesion, single lesion"),
                format!("{DIAGNOSIS_CODE} {DIAGNOSIS}"),
            ],
        );
        modifier_25(
            &mut note,
            facts,
            "evaluation and management of a separate problem in addition to lesion paring",
        );
        education(&mut note, config, EDUCATION);
        return sign_off(note, config);
    }

    note.section("CLINICAL FINDINGS")
        .bullet(format!("Contracture at the PIPJ of digit(s) {digits}"))
        .bullet(match contracture {
            Some(Contracture::Rigid) => "Deformity does not reduce with manual pressure",
            Some(Contracture::Flexible) => "Deformity reduces with manual pressure",
            None => "Reducibility: [reducible / non-reducible]",
        });
    note.section("STATUS").line(status_narrative(facts));

    note.section("TREATMENT")
        .bullet("Wide, deep toe box footwear")
        .bullet(if contracture == Some(Contracture::Flexible) {
            "Hammertoe splint or crest pad to hold the digit in a corrected position"
        } else {
            "Protective padding and silicone sleeves to offload prominences"
        });

    let discussed = any_discussed(facts);
    if discussed {
        discussion(&mut note, facts);
        note.line(format!("Surgical options reviewed: {}.", surgical_options(contracture)));
    } else if contracture == Some(Contracture::Rigid) || facts.cues.escalate {
        note.section("SURGICAL CONSIDERATION")
            .bullet(format!("Options: {}", surgical_options(contracture)))
            .bullet("Indicated if pain or recurrent lesions persist despite accommodation");
    }

    follow_up(
        &mut note,
        format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
    );
    if discussed {
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
    fn test_corn_paring_note() {
        let parsed = parse_command(".ht 2,3 rigid +corn right").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());

        assert!(doc.contains("Hammertoe deformity, digit(s) 2, 3, right, rigid"));
        assert!(doc.contains("PROCEDURE:"));
        assert!(doc.contains("11055"));
        assert!(!doc.contains("MEDICAL DECISION MAKING"));
    }

    #[test]
    fn test_rigid_deformity_lists_arthroplasty() {
        let facts = extract("rigid hammertoe 2nd toe left, painful in shoes");
        let doc = generate(&facts, facts.laterality, &Configuration::default());

        assert!(doc.contains("SURGICAL CONSIDERATION:"));
        assert!(doc.contains("PIPJ arthroplasty or arthrodesis"));
        assert!(doc.contains("does not reduce"));
    }

    #[test]
    fn test_flexible_deformity_gets_splint() {
        let parsed = parse_command(".ht flexible l").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());

        assert!(doc.contains("digit(s) [digits], left, flexible"));
        assert!(doc.contains("Hammertoe splint"));
        assert!(!doc.contains("SURGICAL CONSIDERATION"));
    }

    #[test]
    fn test_unknown_flexibility_placeholder() {
        let doc = generate(&ParsedFacts::default(), None, &Configuration::default());
        assert!(doc.contains("[flexibility]"));
        assert!(doc.contains("[reducible / non-reducible]"));
    }
}
