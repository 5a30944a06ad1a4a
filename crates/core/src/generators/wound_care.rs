use mdm_types::Laterality;

use super::{education, em_billing, mdm, modifier_25, side, sign_off, Note};
use crate::config::Configuration;
use crate::constants::{
    DEBRIDEMENT_ADDITIONAL_CODE, DEBRIDEMENT_AREA_INCREMENT, DEBRIDEMENT_FIRST_CODE,
};
use crate::facts::ParsedFacts;

const DIAGNOSIS: &str = "Diabetic foot ulcer";

const EDUCATION: &[&str] = &[
    "Strict offloading is the most important factor in healing",
    "Keep the dressing clean and dry; change per protocol",
    "Signs of infection that require an urgent call: spreading redness, fever, drainage, odor",
];

/// Units of the add-on debridement code for areas beyond the first increment.
fn additional_units(area: f64) -> u32 {
    if area <= DEBRIDEMENT_AREA_INCREMENT {
        0
    } else {
        ((area - DEBRIDEMENT_AREA_INCREMENT) / DEBRIDEMENT_AREA_INCREMENT).ceil() as u32
    }
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let location = facts.cues.wound_location.as_deref().unwrap_or("[location]");
    let wagner = facts
        .values
        .wagner
        .as_ref()
        .map_or_else(|| "[Wagner grade]".to_string(), |g| format!("Wagner grade {g}"));
    let area = facts.values.wound.map(|w| w.surface_area());

    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "{DIAGNOSIS}, {location}, {}, {wagner}, under active treatment",
        side(laterality)
    ));

    let size = match facts.values.wound {
        Some(wound) => format!("{wound} (SA: {:.1} cm²)", wound.surface_area()),
        None => "[L x W x D] cm".to_string(),
    };
    note.section("WOUND ASSESSMENT")
        .bullet(format!("Size: {size}"))
        .bullet("Wound bed: [% granulation / slough / eschar]")
        .bullet("Edges: [attached / rolled / undermined]")
        .bullet("Periwound: [intact / macerated / erythematous]")
        .bullet("Drainage: [none / serous / purulent], [scant / moderate / copious]")
        .bullet(if facts.findings.infection {
            "Infection signs: present, see infection management"
        } else {
            "Infection signs: [none / local / systemic]"
        });

    if facts.findings.worse {
        note.line("Trajectory: wound is deteriorating since the last visit.");
    } else if facts.findings.unchanged {
        note.line("Trajectory: wound is static with no measurable progress.");
    } else if facts.findings.improved {
        note.line("Trajectory: wound is improving with current care.");
    }

    let mut billing_lines = Vec::new();
    if facts.procedures.debridement {
        note.section("PROCEDURE")
            .line("Risks and benefits of debridement discussed; verbal consent obtained.")
            .bullet("Selective sharp debridement to viable bleeding tissue")
            .bullet("Necrotic and nonviable tissue removed with [instrument]")
            .bullet("Hemostasis achieved with pressure")
            .bullet("Post-debridement dimensions: [document]")
            .bullet("Patient tolerated the procedure well");
        billing_lines.push(format!(
            "{DEBRIDEMENT_FIRST_CODE} Selective debridement, first 20 sq cm or less"
        ));
        let units = area.map_or(0, additional_units);
        if units > 0 {
            billing_lines.push(format!(
                "{DEBRIDEMENT_ADDITIONAL_CODE} x{units} Selective debridement, each additional 20 sq cm"
            ));
        }
    } else {
        let [visit, _] = em_billing(facts, "", DIAGNOSIS);
        billing_lines.push(visit);
    }
    billing_lines.push(format!("[ICD-10 L97.x / E11.621] {DIAGNOSIS}, {location}"));

    if facts.findings.infection {
        note.section("INFECTION MANAGEMENT")
            .bullet("Wound culture obtained after debridement")
            .bullet("Empiric oral antibiotic: [agent, dose, duration], adjust per culture")
            .bullet("Radiographs to evaluate for osteomyelitis")
            .bullet("Low threshold for admission if systemic signs develop");
    }

    if facts.findings.unchanged || facts.findings.worse {
        note.section("ADVANCED MODALITIES")
            .line("Inadequate progress with standard care. Consider:")
            .bullet("Vascular studies (ABI/TBI) and vascular referral")
            .bullet("Negative pressure wound therapy")
            .bullet("Cellular or tissue-based skin substitutes")
            .bullet("Hyperbaric oxygen therapy for qualifying Wagner grade 3+ ulcers");
    }

    note.section("DRESSING")
        .bullet("Primary dressing: [type]")
        .bullet("Secondary dressing: [type]")
        .bullet("Change frequency: per protocol");
    note.section("OFFLOADING").line("[Device] - compliance counseled.");
    if let Some(a1c) = &facts.values.a1c {
        note.section("GLYCEMIC CONTROL")
            .line(format!("Most recent A1c {a1c}%. Coordinate glycemic optimization with PCP."));
    }

    let interval = if facts.findings.infection {
        &config.follow_up.wound_infected
    } else {
        &config.follow_up.wound_routine
    };
    note.section("FOLLOW-UP").line(format!(
        "Return in {interval} for reassessment{}.",
        if facts.procedures.debridement { " and serial debridement as indicated" } else { "" }
    ));

    if !facts.procedures.debridement {
        mdm(&mut note, facts, DIAGNOSIS, config);
    }
    super::billing(&mut note, config, billing_lines);
    modifier_25(
        &mut note,
        facts,
        "evaluation and management of a separate problem in addition to wound debridement",
    );
    education(&mut note, config, EDUCATION);
    sign_off(note, config)
}
