//! Per-condition document generators and the text blocks they share.
//!
//! Every generator follows the same decision tree:
//! 1. a procedure relevant to the condition was performed: procedure note
//! 2. a procedure was only planned or declined: discussion note with an abbreviated MDM
//! 3. otherwise: routine evaluation and plan note with a full MDM block
//!
//! Generators are pure. Anything not derivable from the facts or the configuration is written
//! as a bracketed placeholder for the clinician to complete.

pub mod achilles;
pub mod diabetic_foot;
pub mod hallux_rigidus;
pub mod hallux_valgus;
pub mod hammertoe;
pub mod injection;
pub mod orthotics;
pub mod peroneal;
pub mod plantar_fasciitis;
pub mod wound_care;

use mdm_types::Laterality;

use crate::config::Configuration;
use crate::constants::{
    DURATION_PLACEHOLDER, EM_LOW_COMPLEXITY, EM_MODERATE_COMPLEXITY, EPAT_SERIES_LENGTH,
    LATERALITY_PLACEHOLDER,
};
use crate::facts::{InjectionTarget, Modality, ParsedFacts};

/// Line-oriented document builder.
#[derive(Debug, Default)]
pub(crate) struct Note {
    text: String,
}

impl Note {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts a titled section, separated from the previous one by a blank line.
    pub(crate) fn section(&mut self, title: &str) -> &mut Self {
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(title);
        self.text.push(':');
        self
    }

    pub(crate) fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line.as_ref());
        self
    }

    pub(crate) fn bullet(&mut self, item: impl AsRef<str>) -> &mut Self {
        self.line(format!("- {}", item.as_ref()))
    }

    pub(crate) fn bullets<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.bullet(item);
        }
        self
    }

    pub(crate) fn finish(self) -> String {
        self.text
    }
}

pub(crate) fn side(laterality: Option<Laterality>) -> &'static str {
    laterality.map_or(LATERALITY_PLACEHOLDER, |l| l.as_str())
}

pub(crate) fn duration(facts: &ParsedFacts) -> &str {
    facts.values.duration.as_deref().unwrap_or(DURATION_PLACEHOLDER)
}

/// ", chronic", ", acute" or nothing, for assessment lines.
pub(crate) fn chronicity(facts: &ParsedFacts) -> &'static str {
    if facts.findings.chronic {
        ", chronic"
    } else if facts.findings.acute {
        ", acute"
    } else {
        ""
    }
}

/// Status prose. Worsening outranks a plateau, which outranks improvement.
pub(crate) fn status_narrative(facts: &ParsedFacts) -> &'static str {
    let findings = &facts.findings;
    if findings.worse {
        "Symptoms are worsening despite current treatment. Plan escalated accordingly."
    } else if findings.unchanged {
        "Symptoms are unchanged since the last visit with no meaningful response to current treatment."
    } else if findings.improved {
        "Symptoms are improving with current treatment. Continue the present plan."
    } else {
        "[Document interval status: improved / unchanged / worse]"
    }
}

/// Failed-treatment list for indication narratives, including earlier injections at the site.
pub(crate) fn prior_treatments(facts: &ParsedFacts) -> Vec<String> {
    let mut treatments = facts.cues.prior_treatments.clone();
    let count = facts.values.injection_count();
    if count > 1 {
        treatments.push(format!("Prior corticosteroid injection x{}", count - 1));
    }
    treatments
}

/// Indication narrative with the failed-treatment list.
pub(crate) fn indication(note: &mut Note, facts: &ParsedFacts, complaint: &str) {
    note.section("INDICATION").line(format!(
        "Persistent {complaint} x {} with functional limitation despite conservative care.",
        duration(facts)
    ));
    let treatments = prior_treatments(facts);
    note.line("Failed treatments:");
    if treatments.is_empty() {
        note.bullet("[document prior treatments]");
    } else {
        note.bullets(treatments);
    }
}

/// E&M and diagnosis billing lines for evaluation and discussion notes.
pub(crate) fn em_billing(
    facts: &ParsedFacts,
    diagnosis_code: &str,
    diagnosis: &str,
) -> [String; 2] {
    let level = risk(facts);
    [
        format!(
            "{} Office visit, established patient, {} complexity MDM",
            level.em_code(),
            level.label().to_lowercase()
        ),
        format!("{diagnosis_code} {diagnosis}"),
    ]
}

pub(crate) fn nsaid_line(facts: &ParsedFacts, config: &Configuration) -> String {
    let care = &config.conservative_care;
    match facts.contraindications.nsaid_contraindication() {
        Some(reason) => format!(
            "NSAIDs avoided due to {}. {} for pain control",
            reason.label(),
            care.nsaid_alternative
        ),
        None => format!("{} for anti-inflammatory effect", care.nsaid),
    }
}

/// Stretching, icing, NSAID (or its substitute) and footwear.
pub(crate) fn conservative_care(note: &mut Note, facts: &ParsedFacts, config: &Configuration) {
    let care = &config.conservative_care;
    note.section("CONSERVATIVE CARE")
        .bullet(format!("Stretching: {}", care.stretching))
        .bullet(format!("Icing: {}", care.icing))
        .bullet(nsaid_line(facts, config))
        .bullet(format!(
            "Supportive footwear with {} arch supports; {} recovery sandals for household ambulation",
            care.arch_support, care.recovery_sandal
        ))
        .bullet("Activity modification as tolerated");
}

/// Chronic or worsening problems return sooner.
pub(crate) fn follow_up_interval<'a>(facts: &ParsedFacts, config: &'a Configuration) -> &'a str {
    if facts.findings.chronic || facts.findings.worse {
        &config.follow_up.chronic
    } else {
        &config.follow_up.routine
    }
}

pub(crate) fn follow_up(note: &mut Note, text: impl AsRef<str>) {
    note.section("FOLLOW-UP").line(text);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Risk {
    Low,
    Moderate,
}

impl Risk {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
        }
    }

    pub(crate) fn em_code(&self) -> &'static str {
        match self {
            Self::Low => EM_LOW_COMPLEXITY,
            Self::Moderate => EM_MODERATE_COMPLEXITY,
        }
    }
}

fn risk_factors(facts: &ParsedFacts) -> Vec<String> {
    let mut factors: Vec<String> = facts
        .contraindications
        .present()
        .iter()
        .map(|flag| flag.label().to_string())
        .collect();
    if facts.findings.chronic {
        factors.push("chronic condition".into());
    }
    if facts.findings.worse {
        factors.push("worsening symptoms".into());
    }
    factors
}

/// Moderate when any contraindication is present, the problem is chronic, or it is worsening.
pub(crate) fn risk(facts: &ParsedFacts) -> Risk {
    if risk_factors(facts).is_empty() {
        Risk::Low
    } else {
        Risk::Moderate
    }
}

fn problem_status(facts: &ParsedFacts) -> &'static str {
    match (facts.findings.chronic, facts.findings.worse) {
        (true, true) => "chronic illness with exacerbation",
        (true, false) => "chronic illness, stable",
        (false, true) => "acute problem, worsening",
        (false, false) => "acute, uncomplicated problem",
    }
}

/// Full MDM block for routine evaluation notes.
pub(crate) fn mdm(note: &mut Note, facts: &ParsedFacts, problem: &str, config: &Configuration) {
    let level = risk(facts);
    let factors = risk_factors(facts);

    note.section("MEDICAL DECISION MAKING")
        .bullet(format!("Problem: {problem}, {}", problem_status(facts)))
        .bullet("Data: history, prior treatment and response reviewed");
    if factors.is_empty() {
        note.bullet(format!("Risk: {}", level.label()));
    } else {
        note.bullet(format!("Risk: {} ({})", level.label(), factors.join("; ")));
    }
    if config.documentation.include_billing_codes {
        note.bullet(format!(
            "Complexity: {} - E&M {}",
            level.label(),
            level.em_code()
        ));
    }
}

/// One-line MDM summary for discussion notes.
pub(crate) fn mdm_brief(note: &mut Note, facts: &ParsedFacts, config: &Configuration) {
    let level = risk(facts);
    let line = if config.documentation.include_billing_codes {
        format!(
            "{} risk; treatment options and prescription management discussed. E&M {}",
            level.label(),
            level.em_code()
        )
    } else {
        format!(
            "{} risk; treatment options and prescription management discussed.",
            level.label()
        )
    };
    note.section("MDM").line(line);
}

pub(crate) fn consent(note: &mut Note, config: &Configuration, procedure: &str, risks: &str) {
    note.section("CONSENT");
    if config.documentation.detailed_consent {
        note.line(format!(
            "The nature of the {procedure} was explained. Risks discussed include {risks}. \
             Alternatives including continued conservative care were reviewed. All questions \
             were answered and the patient verbalized understanding. Informed consent was \
             obtained."
        ));
    } else {
        note.line(format!(
            "Risks, benefits and alternatives of the {procedure} discussed; informed consent obtained."
        ));
    }
}

pub(crate) const INJECTION_RISKS: &str = "post-injection flare, infection, skin \
     depigmentation, fat pad atrophy, tendon or fascial rupture and transient elevation of \
     blood glucose";

/// The target from the text or a command override, else `fallback`.
pub(crate) fn injection_target(facts: &ParsedFacts, fallback: InjectionTarget) -> InjectionTarget {
    facts.cues.injection_target.clone().unwrap_or(fallback)
}

/// Consent, procedure narrative and post-procedure instructions for an injection.
pub(crate) fn injection_procedure(
    note: &mut Note,
    facts: &ParsedFacts,
    target: &InjectionTarget,
    laterality: Option<Laterality>,
    config: &Configuration,
) {
    let inj = &config.injection;
    consent(note, config, "corticosteroid injection", INJECTION_RISKS);

    note.section("PROCEDURE")
        .bullet(format!("Site: {}, {}", target.label(), side(laterality)))
        .bullet(format!(
            "This is injection #{} at this site",
            facts.values.injection_number
        ))
        .bullet("Skin prepped with chlorhexidine/alcohol in sterile fashion")
        .bullet(format!(
            "Medication: {} {} mixed with {} {}",
            inj.steroid_volume, inj.steroid, inj.anesthetic_volume, inj.anesthetic
        ))
        .bullet(format!("Needle: {}", inj.needle))
        .bullet(format!("Approach: {}", target.approach()))
        .bullet("Aspiration negative prior to injection; medication infiltrated without resistance")
        .bullet("Sterile bandage applied")
        .bullet("Patient tolerated the procedure well with no immediate complications");

    note.section("POST-PROCEDURE INSTRUCTIONS")
        .bullet("Avoid strenuous activity for 48-72 hours")
        .bullet("Ice as needed for injection site discomfort; a post-injection flare may occur for 24-48 hours")
        .bullet("Call for redness, swelling, warmth, fever or drainage at the injection site");
    if facts.contraindications.diabetic {
        note.bullet(
            "Diabetic patient: monitor blood glucose closely for 3-5 days; transient elevation is expected after corticosteroid injection",
        );
    }
}

/// "Counseled on diminishing returns" once the site count reaches the configured threshold.
pub(crate) fn diminishing_returns(facts: &ParsedFacts, config: &Configuration) -> Option<String> {
    let count = facts.values.injection_count();
    (count >= config.injection.max_per_site).then(|| {
        format!(
            "This is injection #{count} at this site. Patient counseled on diminishing returns and \
             cumulative tissue risk with repeated corticosteroid injections; alternative \
             treatments will be prioritized going forward."
        )
    })
}

/// Consent and treatment narrative for one EPAT session.
pub(crate) fn epat_procedure(
    note: &mut Note,
    facts: &ParsedFacts,
    site: &str,
    laterality: Option<Laterality>,
    config: &Configuration,
) {
    consent(
        note,
        config,
        "EPAT (extracorporeal pulse activation technology) treatment",
        "transient soreness, bruising, skin irritation and a temporary increase in symptoms",
    );
    note.section("PROCEDURE")
        .bullet(format!(
            "EPAT session #{} of {EPAT_SERIES_LENGTH}",
            facts.values.epat_session
        ))
        .bullet(format!("Site: {site}, {}", side(laterality)))
        .bullet("Coupling gel applied over the area of maximal tenderness")
        .bullet("Delivered [pulses] pulses at [pressure] bar, [frequency] Hz")
        .bullet("Patient tolerated the treatment well with no complications")
        .bullet("Avoid NSAIDs and ice for 48 hours after treatment to support the healing response");
}

/// Follow-up text for an EPAT series.
pub(crate) fn epat_follow_up(facts: &ParsedFacts, config: &Configuration) -> String {
    let session = facts.values.epat_count();
    if session < EPAT_SERIES_LENGTH {
        format!(
            "Return in {} for EPAT session #{}.",
            config.follow_up.post_epat,
            session + 1
        )
    } else {
        format!(
            "EPAT series complete ({EPAT_SERIES_LENGTH} sessions). Reassess response in 1 month."
        )
    }
}

/// Discussion paragraphs for every modality that was planned or declined but not performed.
pub(crate) fn discussion(note: &mut Note, facts: &ParsedFacts) {
    note.section("DISCUSSION");
    for modality in [Modality::Injection, Modality::Epat, Modality::Surgery] {
        if !facts.discussed_only(modality) {
            continue;
        }
        note.line(discussion_sentence(facts, modality));
    }
}

pub(crate) fn discussion_sentence(facts: &ParsedFacts, modality: Modality) -> String {
    let declined = match modality {
        Modality::Injection => facts.declined.injection,
        Modality::Epat => facts.declined.epat,
        Modality::Surgery => facts.declined.surgery,
    };
    if declined {
        format!(
            "Discussed {} including risks, benefits and alternatives. Patient declined at this \
             time. The option remains available if symptoms persist. Not performed today.",
            modality.label()
        )
    } else {
        format!(
            "Discussed {} as a treatment option including risks, benefits and alternatives. Not \
             performed today; patient will consider and it may be scheduled at a future visit.",
            modality.label()
        )
    }
}

pub(crate) fn any_discussed(facts: &ParsedFacts) -> bool {
    [Modality::Injection, Modality::Epat, Modality::Surgery]
        .into_iter()
        .any(|m| facts.discussed_only(m))
}

/// Same-day E&M justification, only when a separate problem was addressed.
pub(crate) fn modifier_25(note: &mut Note, facts: &ParsedFacts, separate_service: &str) {
    if !facts.separate_problem {
        return;
    }
    note.section("MODIFIER 25")
        .line(format!(
            "A significant, separately identifiable service was provided on the same date: \
             {separate_service}. The E&M service is documented separately from the procedure \
             and its pre-procedure evaluation and is reported with modifier 25."
        ));
}

/// Billing lines, omitted when billing codes are disabled.
pub(crate) fn billing<I, S>(note: &mut Note, config: &Configuration, lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if config.documentation.include_billing_codes {
        note.section("BILLING").bullets(lines);
    }
}

/// Patient education, only in verbose mode.
pub(crate) fn education(note: &mut Note, config: &Configuration, items: &[&str]) {
    if config.documentation.verbose {
        note.section("PATIENT EDUCATION").bullets(items);
    }
}

pub(crate) fn sign_off(mut note: Note, config: &Configuration) -> String {
    note.section("CLINICIAN")
        .line(format!("{} - draft for clinician review", config.clinician_name));
    note.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{Contraindication, Finding};

    #[test]
    fn test_note_layout() {
        let mut note = Note::new();
        note.section("ASSESSMENT").line("Plantar fasciitis");
        note.section("PLAN").bullet("Stretching").bullet("Icing");

        assert_eq!(
            note.finish(),
            "ASSESSMENT:\nPlantar fasciitis\n\nPLAN:\n- Stretching\n- Icing"
        );
    }

    #[test]
    fn test_risk_escalates_on_contraindication_chronicity_or_worsening() {
        let mut facts = ParsedFacts::default();
        assert_eq!(risk(&facts), Risk::Low);
        assert_eq!(risk(&facts).em_code(), "99213");

        facts.contraindications.set(Contraindication::Anticoagulant);
        assert_eq!(risk(&facts), Risk::Moderate);

        let mut facts = ParsedFacts::default();
        facts.findings.set(Finding::Chronic);
        assert_eq!(risk(&facts).em_code(), "99214");

        let mut facts = ParsedFacts::default();
        facts.findings.set(Finding::Worse);
        assert_eq!(risk(&facts), Risk::Moderate);
    }

    #[test]
    fn test_nsaid_substitution() {
        let config = Configuration::default();
        let mut facts = ParsedFacts::default();
        assert!(nsaid_line(&facts, &config).starts_with("naproxen"));

        facts.contraindications.set(Contraindication::Anticoagulant);
        let line = nsaid_line(&facts, &config);
        assert!(line.contains("avoided due to anticoagulation"));
        assert!(line.contains("acetaminophen"));
    }

    #[test]
    fn test_status_precedence() {
        let mut facts = ParsedFacts::default();
        facts.findings.set(Finding::Improved);
        facts.findings.set(Finding::Unchanged);
        assert!(status_narrative(&facts).contains("unchanged"));

        facts.findings.set(Finding::Worse);
        assert!(status_narrative(&facts).contains("worsening"));
    }

    #[test]
    fn test_epat_follow_up_by_session() {
        let config = Configuration::default();
        let mut facts = ParsedFacts::default();
        facts.values.epat_session = "3".into();
        assert_eq!(
            epat_follow_up(&facts, &config),
            "Return in 1 week for EPAT session #4."
        );

        facts.values.epat_session = "5".into();
        assert!(epat_follow_up(&facts, &config).contains("series complete"));
    }

    #[test]
    fn test_billing_toggle() {
        let mut config = Configuration::default();
        config.documentation.include_billing_codes = false;
        let mut note = Note::new();
        billing(&mut note, &config, ["20550"]);
        assert_eq!(note.finish(), "");
    }

    #[test]
    fn test_modifier_25_requires_separate_problem() {
        let mut facts = ParsedFacts::default();
        let mut note = Note::new();
        modifier_25(&mut note, &facts, "injection");
        assert_eq!(note.finish(), "");

        facts.separate_problem = true;
        let mut note = Note::new();
        modifier_25(&mut note, &facts, "injection");
        assert!(note.finish().starts_with("MODIFIER 25:"));
    }
}
