//! Achilles tendinopathy.
//!
//! Corticosteroid injection is never offered for Achilles pathology. Every note states the
//! contraindication, and a patient request for an injection is documented as declined by the
//! clinician rather than discussed as an option.

use mdm_types::Laterality;

use super::{
    discussion_sentence, education, em_billing, epat_follow_up, epat_procedure, follow_up,
    follow_up_interval, indication, mdm, mdm_brief, modifier_25, side, sign_off, status_narrative,
    Note,
};
use crate::config::Configuration;
use crate::constants::EPAT_OTHER_CODE;
use crate::facts::{Modality, ParsedFacts};

const DIAGNOSIS: &str = "Achilles tendinopathy";
const DIAGNOSIS_CODE: &str = "M76.60";

const STEROID_CONTRAINDICATION: &str = "Corticosteroid injection is contraindicated for Achilles \
     tendon pathology due to the risk of tendon rupture and will not be performed.";

const EDUCATION: &[&str] = &[
    "Eccentric loading is the most effective home treatment and takes 12 weeks",
    "Avoid hills, stairs and jumping while symptomatic",
];

/// NSAIDs are limited to short courses because prolonged use may impair tendon healing.
fn short_term_nsaid(facts: &ParsedFacts, config: &Configuration) -> String {
    let care = &config.conservative_care;
    match facts.contraindications.nsaid_contraindication() {
        Some(reason) => format!(
            "NSAIDs avoided due to {}. {} for pain control",
            reason.label(),
            care.nsaid_alternative
        ),
        None => format!(
            "{} short-term only (7-10 days) for acute flares; prolonged use may impair tendon healing",
            care.nsaid
        ),
    }
}

pub fn generate(
    facts: &ParsedFacts,
    laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let location = facts.cues.tendon_location.as_deref().unwrap_or("[location]");

    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "{DIAGNOSIS}, {location}, {}{}",
        side(laterality),
        if facts.findings.chronic { ", chronic" } else { "" }
    ));

    if facts.procedures.epat {
        indication(&mut note, facts, &format!("{location} Achilles pain"));
        epat_procedure(
            &mut note,
            facts,
            &format!("{location} Achilles tendon"),
            laterality,
            config,
        );
        note.section("PLAN")
            .bullet("Continue eccentric strengthening (Alfredson protocol)")
            .bullet(STEROID_CONTRAINDICATION);
        follow_up(&mut note, epat_follow_up(facts, config));
        super::billing(
            &mut note,
            config,
            [
                format!(
                    "{EPAT_OTHER_CODE} Extracorporeal shock wave, musculoskeletal, not otherwise specified (session #{})",
                    facts.values.epat_session
                ),
                format!("{DIAGNOSIS_CODE} {DIAGNOSIS}"),
            ],
        );
        modifier_25(
            &mut note,
            facts,
            "evaluation and management of a separate problem in addition to EPAT treatment",
        );
        education(&mut note, config, EDUCATION);
        return sign_off(note, config);
    }

    note.section("CLINICAL FINDINGS")
        .bullet(format!("Tenderness at the {location} Achilles tendon"))
        .bullet("Thompson test: [negative], ruling out rupture")
        .bullet("Pain with resisted plantarflexion: [present/absent]");
    note.section("STATUS").line(status_narrative(facts));

    let injection_requested = facts.planned.injection
        || facts.declined.injection
        || facts.procedures.injection;
    let discussed = facts.discussed_only(Modality::Epat) || facts.discussed_only(Modality::Surgery);

    if injection_requested || discussed {
        note.section("DISCUSSION");
        if injection_requested {
            note.line(
                "Patient inquired about a corticosteroid injection. It was not offered: \
                 injection near the Achilles tendon carries a risk of rupture.",
            );
        }
        for modality in [Modality::Epat, Modality::Surgery] {
            if facts.discussed_only(modality) {
                note.line(discussion_sentence(facts, modality));
            }
        }
    }

    note.section("TREATMENT")
        .bullet("Eccentric strengthening protocol (Alfredson)")
        .bullet("Heel lift to reduce tendon strain")
        .bullet(format!("Icing: {}", config.conservative_care.icing))
        .bullet("Activity modification: avoid hills and jumping")
        .bullet(short_term_nsaid(facts, config))
        .bullet(STEROID_CONTRAINDICATION);

    if facts.findings.chronic || facts.cues.escalate {
        note.section("CHRONIC / RECALCITRANT")
            .bullet("Physical therapy referral")
            .bullet("MRI to evaluate for partial tear")
            .bullet("EPAT/shockwave therapy consideration")
            .bullet("PRP if refractory");
    }

    follow_up(
        &mut note,
        format!("Return in {} for reassessment.", follow_up_interval(facts, config)),
    );
    if injection_requested || discussed {
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
    use crate::facts::{extract, Contraindication};

    fn draft(text: &str) -> String {
        let facts = extract(text);
        generate(&facts, facts.laterality, &Configuration::default())
    }

    #[test]
    fn test_cortisone_request_is_refused() {
        let doc = draft("Achilles tendinopathy, chronic, patient asking about cortisone shot");

        assert!(doc.contains("contraindicated for Achilles tendon pathology"));
        assert!(doc.contains("It was not offered"));
        assert!(!doc.contains("PROCEDURE:"));
        assert!(!doc.contains("Needle:"));
        assert!(doc.contains("CHRONIC / RECALCITRANT:"));
    }

    #[test]
    fn test_contraindication_stated_without_any_request() {
        let doc = draft("right achilles pain after running");
        assert!(doc.contains("contraindicated for Achilles tendon pathology"));
        assert!(doc.contains("short-term only"));
    }

    #[test]
    fn test_injection_command_still_never_injects() {
        let parsed = parse_command(".at left +inj").unwrap();
        let doc = generate(&parsed.facts, parsed.laterality, &Configuration::default());
        assert!(!doc.contains("PROCEDURE:"));
        assert!(doc.contains("It was not offered"));
    }

    #[test]
    fn test_epat_session_note() {
        let doc = draft("insertional achilles left, EPAT session 2 today");
        assert!(doc.contains("Achilles tendinopathy, insertional, left"));
        assert!(doc.contains("0101T"));
        assert!(doc.contains("contraindicated for Achilles tendon pathology"));
    }

    #[test]
    fn test_nsaid_contraindication_overrides_short_course() {
        let mut facts = ParsedFacts::default();
        facts.contraindications.set(Contraindication::GiIssues);
        let line = short_term_nsaid(&facts, &Configuration::default());
        assert!(line.contains("avoided due to GI history"));
    }
}
