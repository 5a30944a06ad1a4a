//! Diabetic foot examination with risk stratification.

use mdm_types::Laterality;

use super::{em_billing, injection_target, mdm, modifier_25, sign_off, Note};
use crate::config::Configuration;
use crate::facts::{InjectionTarget, ParsedFacts};

const DIAGNOSIS: &str = "Diabetic foot care";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Low,
            1 => Self::Moderate,
            _ => Self::High,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    fn follow_up<'a>(&self, config: &'a Configuration) -> &'a str {
        match self {
            Self::Low => &config.follow_up.diabetic_low_risk,
            Self::Moderate => &config.follow_up.diabetic_moderate_risk,
            Self::High => &config.follow_up.diabetic_high_risk,
        }
    }
}

fn risk_factors(facts: &ParsedFacts) -> Vec<&'static str> {
    [
        (facts.findings.lops, "loss of protective sensation"),
        (facts.findings.pvd, "peripheral vascular disease"),
        (
            facts.findings.deformity || !facts.cues.deformities.is_empty(),
            "foot deformity",
        ),
        (facts.cues.prior_ulcer, "history of ulceration"),
        (facts.cues.prior_amputation, "prior amputation"),
    ]
    .into_iter()
    .filter_map(|(present, label)| present.then_some(label))
    .collect()
}

pub fn generate(
    facts: &ParsedFacts,
    _laterality: Option<Laterality>,
    config: &Configuration,
) -> String {
    let lops = facts.findings.lops;
    let factors = risk_factors(facts);
    let tier = RiskTier::from_count(factors.len());

    let mut note = Note::new();
    note.section("ASSESSMENT").line(format!(
        "Diabetes mellitus with {}, {} risk foot",
        if lops {
            "loss of protective sensation"
        } else {
            "protective sensation intact"
        },
        tier.label()
    ));
    if let Some(a1c) = &facts.values.a1c {
        note.line(format!("Most recent A1c: {a1c}%"));
    }

    note.section("EXAMINATION")
        .bullet(format!(
            "Protective sensation (5.07 monofilament): {}",
            if lops { "diminished/absent" } else { "intact bilaterally" }
        ))
        .bullet(format!(
            "Pedal pulses: {}",
            if facts.findings.pvd { "diminished" } else { "[document DP/PT status]" }
        ))
        .bullet("Skin integrity: [document]")
        .bullet(if facts.procedures.nail_care {
            "Nails: thickened, dystrophic and mycotic, see procedure"
        } else {
            "Nails: [document]"
        });
    if facts.cues.deformities.is_empty() {
        note.bullet(if facts.findings.deformity {
            "Deformities: present, [specify]"
        } else {
            "Deformities: [document]"
        });
    } else {
        note.bullet(format!("Deformities: {}", facts.cues.deformities.join(", ")));
    }
    if facts.cues.prior_ulcer {
        note.bullet("History of ulceration");
    }
    if facts.cues.prior_amputation {
        note.bullet("History of amputation");
    }

    note.section("RISK STRATIFICATION");
    if factors.is_empty() {
        note.line("Low risk: no independent risk factors identified.");
    } else {
        note.line(format!(
            "{} risk: {} risk factor(s) ({}).",
            capitalise(tier.label()),
            factors.len(),
            factors.join(", ")
        ));
    }

    let mut billing_lines = Vec::new();
    if lops {
        billing_lines.push(
            "G0245 Initial evaluation and management of a diabetic patient with LOPS".to_string(),
        );
    } else {
        let [visit, _] = em_billing(facts, "", DIAGNOSIS);
        billing_lines.push(visit);
    }

    if facts.procedures.nail_care || facts.procedures.debridement {
        note.section("PROCEDURES");
        if facts.procedures.nail_care {
            let count = facts.values.nail_count.as_deref().unwrap_or("[number]");
            note.bullet(format!(
                "Debridement of {count} mycotic nails by manual and mechanical means without complication"
            ));
            billing_lines.push(nail_code(facts.values.nail_count.as_deref()));
        }
        if facts.procedures.debridement {
            note.bullet("Paring of [number] hyperkeratotic lesion(s) without bleeding");
            billing_lines.push(
                "11055 / 11056 / 11057 Paring of hyperkeratotic lesions (1 / 2-4 / 5+): [select per count]"
                    .to_string(),
            );
        }
    }

    note.section("EDUCATION")
        .bullet("Daily foot inspection, using a mirror or caregiver as needed")
        .bullet("Properly fitted footwear at all times; avoid barefoot ambulation")
        .bullet("Moisturize dry skin, avoiding the areas between the toes")
        .bullet("Glycemic control reinforced; report any wound, color change or swelling promptly");

    note.section("FOOTWEAR");
    if lops {
        note.line(
            "Patient qualifies for therapeutic footwear (extra-depth shoes with custom inserts) based on loss of protective sensation. Certifying statement to be obtained.",
        );
    } else if facts.planned.diabetic_shoes {
        note.line("Therapeutic footwear requested; eligibility to be assessed.");
    } else {
        note.line("Diabetic shoe evaluation: assess eligibility at future visits.");
    }

    note.section("FOLLOW-UP").line(format!(
        "Return in {} for ongoing diabetic foot surveillance.",
        tier.follow_up(config)
    ));

    mdm(&mut note, facts, DIAGNOSIS, config);
    super::billing(&mut note, config, billing_lines);
    modifier_25(&mut note, facts, &separate_service(facts));
    sign_off(note, config)
}

fn nail_code(count: Option<&str>) -> String {
    match count.and_then(|c| c.parse::<u32>().ok()) {
        Some(n) if n >= 6 => "11721 Debridement of nails, 6 or more".into(),
        Some(_) => "11720 Debridement of nails, 1 to 5".into(),
        None => "11720 / 11721 Debridement of nails (1-5 / 6+): [select per count]".into(),
    }
}

/// Names the separate service so the diabetic evaluation can carry modifier 25.
fn separate_service(facts: &ParsedFacts) -> String {
    if facts.procedures.injection {
        let target =
            injection_target(facts, InjectionTarget::Other("[target structure]".into()));
        format!(
            "corticosteroid injection of the {} for a separate diagnosis, reported separately \
             (CPT {}), in addition to the diabetic foot evaluation",
            target.label(),
            target.billing_code()
        )
    } else {
        "a separate problem was evaluated and managed in addition to the diabetic foot evaluation"
            .to_string()
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{extract, Finding};

    fn draft(text: &str) -> String {
        let facts = extract(text);
        generate(&facts, facts.laterality, &Configuration::default())
    }

    #[test]
    fn test_separate_injection_appends_modifier_25() {
        let doc = draft(
            "diabetic foot exam today, also injected left heel for separate plantar fasciitis",
        );

        assert!(doc.contains("MODIFIER 25:"));
        assert!(doc.contains("corticosteroid injection of the plantar fascia origin"));
        assert!(doc.contains("CPT 20550"));
    }

    #[test]
    fn test_risk_tiers() {
        let mut facts = ParsedFacts::default();
        assert_eq!(RiskTier::from_count(risk_factors(&facts).len()), RiskTier::Low);

        facts.findings.set(Finding::Lops);
        assert_eq!(RiskTier::from_count(risk_factors(&facts).len()), RiskTier::Moderate);

        facts.cues.prior_amputation = true;
        assert_eq!(RiskTier::from_count(risk_factors(&facts).len()), RiskTier::High);
    }

    #[test]
    fn test_lops_drives_billing_footwear_and_interval() {
        let doc = draft("diabetic foot exam, LOPS on monofilament, history of ulcer, A1c 8.1");

        assert!(doc.contains("loss of protective sensation, high risk foot"));
        assert!(doc.contains("G0245"));
        assert!(doc.contains("qualifies for therapeutic footwear"));
        assert!(doc.contains("Return in 2-3 months"));
        assert!(doc.contains("Most recent A1c: 8.1%"));
    }

    #[test]
    fn test_low_risk_exam_uses_em_code() {
        let doc = draft("diabetic foot exam, sensation intact, pulses palpable");

        assert!(doc.contains("protective sensation intact, low risk foot"));
        assert!(!doc.contains("G0245"));
        assert!(doc.contains("99214"));
        assert!(doc.contains("Return in 12 months"));
        assert!(!doc.contains("MODIFIER 25"));
    }

    #[test]
    fn test_nail_debridement_billing_line() {
        let doc = draft("diabetic, 7 mycotic nails debrided today");
        assert!(doc.contains("11721"));

        assert_eq!(nail_code(Some("3")), "11720 Debridement of nails, 1 to 5");
    }
}
