use mdm_types::Laterality;

use super::{
    any_discussed, discussion, education, em_billing, follow_up, follow_up_interval, indication,
    injection_procedure, mdm, mdm_brief, modifier_25, nsaid_line, side, sign_off, status_narrative,
    Note,
};
use crate::config::Configuration;
use crate::facts::{InjectionTarget, ParsedFacts};

const DIAGNOSIS: &str = "Peroneal tendinitis";
const DIAGNOSIS_CODE: &str = "M76.70";

const EDUCATION: &[&str] = &[
    "Lateral ankle bracing reduces load on the peroneal tendons",
    "Balance and proprioception work helps prevent recurrent ankle sprains",
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
        if facts.cues.subluxation { ", with tendon subluxation" } else { "" }
    ));

    if facts.procedures.injection {
        let target = InjectionTarget::PeronealTendonSheath;
        indication(&mut note, facts, "lateral ankle pain along the peroneal tendons");
        injection_procedure(&mut note, facts, &target, laterality, config);
        note.line("Injection placed into the sheath only, avoiding the tendon substance.");
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
            "evaluation and management of a separate problem in addition to the tendon sheath injection",
        );
        education(&mut note, config, EDUCATION);
        return sign_off(note, config);
    }

    note.section("CLINICAL FINDINGS")
        .bullet("Tenderness along the peroneal tendons posterior to the lateral malleolus")
        .bullet("Pain with resisted eversion: [present/absent]")
        .bullet(if facts.cues.subluxation {
            "Tendon subluxation with active eversion and dorsiflexion"
        } else {
            "Tendon stability: [stable / subluxing]"
        });
    note.section("STATUS").line(status_narrative(facts));

    note.section("TREATMENT")
        .bullet("Lateral ankle brace or stirrup brace")
        .bullet("Lateral heel wedge to offload the tendons")
        .bullet(nsaid_line(facts, config))
        .bullet("Physical therapy: eversion strengthening and proprioception")
        .bullet("CAM boot immobilisation for 2-4 weeks if acute and severe");

    if facts.cues.subluxation {
        note.section("SUBLUXATION")
            .bullet("MRI to evaluate the superior peroneal retinaculum and for longitudinal split tear")
            .bullet("Surgical referral for retinacular repair and groove deepening if instability persists");
    } else if facts.findings.chronic || facts.cues.escalate {
        note.section("CHRONIC / RECALCITRANT")
            .bullet("MRI to evaluate for split tear")
            .bullet("Ultrasound-guided tendon sheath injection may be considered")
            .bullet("Surgical consultation if refractory");
    }

    let discussed = any_discussed(facts);
    if discussed {
        discussion(&mut note, facts);
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
