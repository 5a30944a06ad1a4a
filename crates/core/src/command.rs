//! Explicit short-command parsing.
//!
//! Grammar: `<.alias> [modifier]*`, whitespace separated, case-insensitive and order
//! independent. Modifiers set facts directly; nothing is inferred from prose. Unrecognised
//! modifiers are ignored.

use std::sync::LazyLock;

use mdm_types::Laterality;
use regex::Regex;

use crate::constants::COMMAND_MARKER;
use crate::facts::{
    Contracture, Finding, InjectionTarget, ParsedFacts, PlannedAction, Procedure, WoundDimensions,
};
use crate::registry::{self, ConditionDefinition, ConditionId};

static DURATION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:-\d+)?)(d|days?|wks?|weeks?|mos?|months?|yrs?|years?)$")
        .expect("duration token pattern must compile")
});

static DIGIT_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[2-5,]+$").expect("digit list pattern must compile"));

/// A resolved command: the selected condition plus the facts its modifiers state.
#[derive(Clone, Debug)]
pub struct ParsedCommand {
    pub condition: &'static ConditionDefinition,
    pub laterality: Option<Laterality>,
    pub facts: ParsedFacts,
}

/// The first whitespace-delimited token of `line`, if it carries the command marker.
pub fn command_token(line: &str) -> Option<&str> {
    line.split_whitespace()
        .next()
        .filter(|token| token.starts_with(COMMAND_MARKER))
}

/// Parses a command line.
///
/// # Returns
/// `None` when the first token is not a registered alias, so the caller can fall back to
/// alias suggestions.
pub fn parse_command(line: &str) -> Option<ParsedCommand> {
    let lowered = line.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace();
    let alias = tokens.next()?;
    let condition = registry::by_alias(alias)?;

    let mut facts = ParsedFacts::from_raw(line);
    for token in tokens {
        apply_token(token, &mut facts);
    }

    if facts.findings.chronic {
        facts.findings.clear(Finding::Acute);
    }
    if condition.id == ConditionId::Injection
        && !facts.declined.injection
        && !facts.planned.injection
    {
        facts.procedures.injection = true;
    }

    tracing::debug!(condition = %condition.id, "command resolved");
    Some(ParsedCommand {
        condition,
        laterality: facts.laterality,
        facts,
    })
}

fn apply_token(token: &str, facts: &mut ParsedFacts) {
    if let Ok(side) = token.parse::<Laterality>() {
        facts.laterality.get_or_insert(side);
    } else if token.starts_with('+') {
        if !apply_flag(token, facts) {
            tracing::debug!(token, "ignoring unknown flag");
        }
    } else if token == "chronic" {
        facts.findings.set(Finding::Chronic);
    } else if token == "rigid" {
        facts.cues.contracture = Some(Contracture::Rigid);
    } else if token == "flexible" {
        facts.cues.contracture.get_or_insert(Contracture::Flexible);
    } else if token == "heel" {
        facts.cues.wound_location = Some("heel".into());
    } else if matches!(token, "noninsertional" | "non-insertional") {
        facts.cues.tendon_location = Some("non-insertional".into());
    } else if token == "insertional" {
        facts.cues.tendon_location = Some("insertional".into());
    } else if !apply_keyed(token, facts) {
        apply_freeform(token, facts);
    }
}

/// `+flag` tokens. Returns `false` for unknown flags.
fn apply_flag(token: &str, facts: &mut ParsedFacts) -> bool {
    match token {
        "+escalate" | "+e" => facts.cues.escalate = true,
        "+chronic" | "+c" => facts.findings.set(Finding::Chronic),
        "+acute" => facts.findings.set(Finding::Acute),
        "+improved" => facts.findings.set(Finding::Improved),
        "+worse" => facts.findings.set(Finding::Worse),
        "+unchanged" => facts.findings.set(Finding::Unchanged),
        "+infection" | "+infected" => facts.findings.set(Finding::Infection),
        "+lops" => facts.findings.set(Finding::Lops),
        "+pvd" => facts.findings.set(Finding::Pvd),
        "+surgical" | "+s" => facts.planned.surgery = true,
        "+declined-surgery" => facts.declined.surgery = true,
        "+debride" | "+d" => facts.procedures.set(Procedure::Debridement),
        "+nails" => facts.procedures.set(Procedure::NailCare),
        "+strap" => facts.procedures.set(Procedure::Strapping),
        "+cast" => facts.procedures.set(Procedure::Casting),
        "+dispense" => facts.procedures.set(Procedure::DispenseOrthotics),
        "+injection" | "+inj" => facts.procedures.injection = true,
        "+plan-injection" => facts.planned.injection = true,
        "+declined-injection" => facts.declined.injection = true,
        "+epat" => facts.procedures.epat = true,
        "+plan-epat" => facts.planned.epat = true,
        "+declined-epat" => facts.declined.epat = true,
        "+pt" => facts.planned.set(PlannedAction::PhysicalTherapy),
        "+mri" => facts.planned.set(PlannedAction::Mri),
        "+prescribe" => facts.planned.set(PlannedAction::Orthotics),
        "+boot" => facts.planned.set(PlannedAction::CamBoot),
        "+shoes" => facts.planned.set(PlannedAction::DiabeticShoes),
        "+sublux" => facts.cues.subluxation = true,
        "+corn" => {
            facts.cues.lesion = true;
            facts.procedures.set(Procedure::Debridement);
        }
        "+hav" => add_deformity(facts, "HAV"),
        "+hammertoes" => add_deformity(facts, "hammertoes"),
        "+charcot" => add_deformity(facts, "Charcot"),
        "+pes-planus" => add_label(&mut facts.cues.biomechanics, "pes planus"),
        "+overpronation" => add_label(&mut facts.cues.biomechanics, "overpronation"),
        "+cavus" => add_label(&mut facts.cues.biomechanics, "cavus foot"),
        "+equinus" => add_label(&mut facts.cues.biomechanics, "equinus"),
        "+prior-ulcer" => facts.cues.prior_ulcer = true,
        "+amputation" => facts.cues.prior_amputation = true,
        "+separate" | "+25" => facts.separate_problem = true,
        "+exam" => facts.is_diabetic_exam = true,
        "+ac" | "+anticoag" => facts.contraindications.anticoagulant = true,
        "+nsaid-allergy" => facts.contraindications.nsaid_allergy = true,
        "+gi" => facts.contraindications.gi_issues = true,
        "+ckd" => facts.contraindications.kidney_issues = true,
        "+dm" => facts.contraindications.diabetic = true,
        _ => return false,
    }
    true
}

fn add_deformity(facts: &mut ParsedFacts, label: &str) {
    facts.findings.set(Finding::Deformity);
    add_label(&mut facts.cues.deformities, label);
}

fn add_label(labels: &mut Vec<String>, label: &str) {
    if !labels.iter().any(|l| l == label) {
        labels.push(label.to_string());
    }
}

/// Prefix- or suffix-keyed values such as `grade2`, `hva28`, `40deg` and `#2`.
fn apply_keyed(token: &str, facts: &mut ParsedFacts) -> bool {
    let keyed = |prefix: &str| {
        token
            .strip_prefix(prefix)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    if let Some(value) = keyed("grade") {
        facts.values.grade = Some(value.to_uppercase());
    } else if let Some(value) = keyed("wagner") {
        facts.values.wagner = Some(value);
    } else if let Some(value) = keyed("hva") {
        facts.values.hva = Some(value);
    } else if let Some(value) = keyed("ima") {
        facts.values.ima = Some(value);
    } else if let Some(value) = keyed("a1c") {
        facts.values.a1c = Some(value);
    } else if let Some(value) = keyed("session") {
        facts.values.epat_session = value;
    } else if let Some(value) = keyed("nails") {
        facts.values.nail_count = Some(value);
    } else if let Some(value) = keyed("#") {
        facts.values.injection_number = value;
    } else if let Some(value) = token.strip_suffix("deg").filter(|v| !v.is_empty()) {
        facts.values.rom = Some(value.to_string());
    } else {
        return false;
    }
    true
}

fn apply_freeform(token: &str, facts: &mut ParsedFacts) {
    if let Some(caps) = DURATION_TOKEN.captures(token) {
        let unit = match &caps[2] {
            "d" | "day" | "days" => "days",
            "wk" | "wks" | "week" | "weeks" => "weeks",
            "mo" | "mos" | "month" | "months" => "months",
            _ => "years",
        };
        if matches!(unit, "months" | "years") {
            facts.findings.set(Finding::Chronic);
        }
        facts.values.duration = Some(format!("{} {unit}", &caps[1]));
    } else if token.contains('x') && token.chars().any(|c| c.is_ascii_digit()) {
        facts.values.wound = WoundDimensions::parse(token);
    } else if DIGIT_LIST.is_match(token) {
        let digits: Vec<&str> = token.split(',').filter(|d| !d.is_empty()).collect();
        facts.cues.digits = Some(digits.join(", "));
    } else if token.contains('-') && !token.contains("insert") {
        facts.cues.injection_target = Some(InjectionTarget::from_label(&token.replace('-', " ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plantar_fasciitis_command() {
        let parsed = parse_command(".pf left chronic +escalate").unwrap();

        assert_eq!(parsed.condition.id, ConditionId::PlantarFasciitis);
        assert_eq!(parsed.laterality, Some(Laterality::Left));
        assert!(parsed.facts.findings.chronic);
        assert!(parsed.facts.cues.escalate);
        assert!(!parsed.facts.procedures.injection);
        assert_eq!(parsed.facts.raw_text, ".pf left chronic +escalate");
    }

    #[test]
    fn test_unknown_alias_is_absent() {
        assert!(parse_command(".zz left").is_none());
        assert!(parse_command("pf left").is_none());
        assert!(parse_command("").is_none());
    }

    #[test]
    fn test_alias_is_case_insensitive_and_order_independent() {
        let a = parse_command(".HV hva32 R ima16 +s").unwrap();
        let b = parse_command(".hv +s ima16 r hva32").unwrap();

        assert_eq!(a.condition.id, ConditionId::HalluxValgus);
        assert_eq!(a.laterality, Some(Laterality::Right));
        assert_eq!(a.facts.values.hva.as_deref(), Some("32"));
        assert_eq!(a.facts.values.ima.as_deref(), Some("16"));
        assert!(a.facts.planned.surgery);
        assert_eq!(a.facts.values, b.facts.values);
        assert_eq!(a.facts.planned, b.facts.planned);
    }

    #[test]
    fn test_keyed_and_freeform_tokens() {
        let parsed = parse_command(".wc 2.5x1.8 wagner2 heel +infection 3wk").unwrap();
        let wound = parsed.facts.values.wound.unwrap();

        assert_eq!(wound.surface_area(), 4.5);
        assert_eq!(parsed.facts.values.wagner.as_deref(), Some("2"));
        assert_eq!(parsed.facts.cues.wound_location.as_deref(), Some("heel"));
        assert!(parsed.facts.findings.infection);
        assert_eq!(parsed.facts.values.duration.as_deref(), Some("3 weeks"));
    }

    #[test]
    fn test_hammertoe_tokens() {
        let parsed = parse_command(".ht 2,3 rigid +corn b").unwrap();
        assert_eq!(parsed.facts.cues.digits.as_deref(), Some("2, 3"));
        assert_eq!(parsed.facts.cues.contracture, Some(Contracture::Rigid));
        assert!(parsed.facts.cues.lesion);
        assert!(parsed.facts.procedures.debridement);
        assert_eq!(parsed.laterality, Some(Laterality::Bilateral));
    }

    #[test]
    fn test_hyphenated_target_override() {
        let parsed = parse_command(".csi tarsal-tunnel left #2").unwrap();
        assert_eq!(
            parsed.facts.cues.injection_target,
            Some(InjectionTarget::TarsalTunnel)
        );
        assert_eq!(parsed.facts.values.injection_number, "2");
        assert!(parsed.facts.procedures.injection);
    }

    #[test]
    fn test_insertional_location_is_not_a_target() {
        let parsed = parse_command(".at non-insertional 4-6wk").unwrap();
        assert_eq!(
            parsed.facts.cues.tendon_location.as_deref(),
            Some("non-insertional")
        );
        assert_eq!(parsed.facts.values.duration.as_deref(), Some("4-6 weeks"));
        assert!(parsed.facts.cues.injection_target.is_none());
    }

    #[test]
    fn test_injection_command_respects_planned_flag() {
        let parsed = parse_command(".csi +plan-injection").unwrap();
        assert!(parsed.facts.planned.injection);
        assert!(!parsed.facts.procedures.injection);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let parsed = parse_command(".pf +nonsense whatever 40deg").unwrap();
        assert_eq!(parsed.facts.values.rom.as_deref(), Some("40"));
        assert!(!parsed.facts.cues.escalate);
    }

    #[test]
    fn test_first_laterality_token_wins() {
        let parsed = parse_command(".pf right left").unwrap();
        assert_eq!(parsed.laterality, Some(Laterality::Right));
    }

    #[test]
    fn test_command_token() {
        assert_eq!(command_token(".p left"), Some(".p"));
        assert_eq!(command_token("heel pain"), None);
        assert_eq!(command_token("   "), None);
    }
}
