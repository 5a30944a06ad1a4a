use mdm_types::Laterality;

use super::{
    any_discussed, discussion, education, em_billing, follow_up, follow_up_interval, indication,
    injection_procedure, injection_target, mdm, mdm_brief, modifier_25, nsaid_line, side, sign_off,
    status_narrative, Note,
};
use crate::config::Configuration;
use crate::facts::{InjectionTarget, ParsedFacts};

const DIAGNOSIS: &str = "Hallux rigidus";
const DIAGNOSIS_CODE: &str = "M20.20";

const EDUCATION: &[&str] = &[
    "Hallux rigidus is progressive arthritis of the big toe joint",
    "Stiff-soled shoes limit painful motion at the joint",
];

/// Coughlin grade as a number, accepting arabic or roman numerals.
fn grade_number(grade: &str) -> Option<u8> {
    match grade.to_ascii_uppercase().as_str() {
        "0" => Some(0),
        "1" | "I" => Some(1),
        "2" | "II" => Some(2),
        "3" | "III" => Some(3),
        "4" | "IV" => Some(4),
        _ => None,
    }
}

fn surgical_options(grade: Option<u8>) -> &'static str {
    match grade {
        Some(0..=2) => "Cheilectomy (joint-preserving) for early-stage disease",
        Some(3) => "Cheilectomy with or without Moberg osteotomy vs 1st MTP arthrodesis",
        Some(_) => "1st MTP arthrodesis vs implant arthroplasty for end-stage disease",
        None => "Cheilectomy vs arthrodesis vs implant based on grade",
    }
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let grade = facts.values.grade.as_deref();
    let grade_label = grade.unwrap_or("[grade]");
    let options = surgical_options(grade.and_then(grade_number));

    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "{DIAGNOSIS}, {}, Grade {grade_label} (Coughlin classification)",
        side(laterality)
    ));

    if facts.procedures.injection {
        let target = injection_target(facts, InjectionTarget::FirstMtpJoint);
        indication(&mut note, facts, "1st MTP joint pain");
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
                format!("{DIAGNOSIS_CODE} {DIAGNOSIS}"),
            ],
        );
        modifier_25(
            &mut note,
            facts,
            "evaluation and management of a separate problem in addition to the joint injection",
        );
    } else {
        let rom = facts
            .values
            .rom
            .as_deref()
            .map_or_else(|| "[X]°".to_string(), |r| format!("{r}°"));
        note.section("CLINICAL FINDINGS")
            .bullet(format!("1st MTP dorsiflexion: {rom} (normal 65-75°)"))
            .bullet("Pain with range of motion and direct palpation")
            .bullet("Dorsal osteophyte: [palpable / not palpable]")
            .bullet("Functional impact: [document limitations]");
        note.section("RADIOGRAPHIC FINDINGS")
            .bullet("Joint space narrowing: [document]")
            .bullet("Dorsal osteophytes: [document]");
        note.section("STATUS").line(status_narrative(facts));

        note.section("TREATMENT")
            .bullet("Stiff-soled shoe or rocker-bottom modification")
            .bullet("Activity modification to reduce dorsiflexion demands")
            .bullet(nsaid_line(facts, config))
            .bullet("Consider intra-articular corticosteroid injection for acute flares");

        if any_discussed(facts) {
            discussion(&mut note, facts);
            note.line(format!("Surgical options reviewed: {options}."));
            follow_up(
                &mut note,
                format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
            );
            mdm_brief(&mut note, facts, config);
        } else {
            note.section("IF CONSERVATIVE CARE FAILS (3+ MONTHS)")
                .bullet("Surgical consultation indicated")
                .bullet(format!("Options: {options}"));
            follow_up(
                &mut note,
                format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
            );
            mdm(&mut note, facts, DIAGNOSIS, config);
        }
        super::billing(&mut note, config, em_billing(facts, DIAGNOSIS_CODE, DIAGNOSIS));
    }

    education(&mut note, config, EDUCATION);
    sign_off(note, config)
}
