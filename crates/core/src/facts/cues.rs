//! Lexical cue tables.
//!
//! Each flag maps to a disjunction of case-insensitive patterns. Tables are compiled once on
//! first use and shared by every extraction call.

use std::sync::LazyLock;

use regex::Regex;

use super::{Contraindication, Finding, InjectionTarget, PlannedAction, Procedure};

/// Nouns naming a corticosteroid injection.
const INJECTION_NOUN: &str =
    r"(?:inject\w*|csi|cortisone|corticosteroid|steroid|shots?|kenalog|depo-?medrol|celestone)";

const EPAT_NOUN: &str = r"(?:epat|eswt|shock\s*wave|pulse activation)";

const SURGERY_NOUN: &str =
    r"(?:surg\w*|operat\w*|bunionectomy|lapidus|austin|scarf|chevron|cheilectomy|arthrodesis|fusion|arthroplasty|osteotomy)";

/// Futurity and recommendation language.
const FUTURITY: &str =
    r"(?:will|plan\w*|consider\w*|recommend\w*|discuss\w*|offer\w*|schedul\w*|candidate|interested|ask\w* about|would like|wants?|next visit|options?|may benefit)";

/// Explicit refusal language.
const REFUSAL: &str = r"(?:declin\w*|refus\w*|doesn'?t want|does not want|defer\w*|not interested)";

const NEGATION: &str = r"(?:no|not|never|didn'?t|without)";

/// Words that may sit between a negation and the procedure it negates ("not a candidate for").
/// Outcome words such as "relief" are absent so "no relief after injection #1" stays a history.
const NEGATION_FILLER: &str =
    r"(?:a|an|any|the|further|more|another|additional|repeat|good|candidate|for|to|today|give|given|giving|do|done|have|had|receive|received|get|perform|performed|administer\w*|want|wish|recommend\w*|indicated|at|this|time|steroid|cortisone|corticosteroid)";

/// A completion phrase that itself contains a negation ("did not give injection").
pub(crate) static NEGATION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{NEGATION}\b")).expect("cue pattern must compile")
});

/// Text ending in a negation that governs whatever follows it ("no ", "did not give ").
pub(crate) static NEGATION_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{NEGATION}\s+(?:{NEGATION_FILLER}\s+){{0,4}}$"))
        .expect("cue pattern must compile")
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("cue pattern must compile"))
        .collect()
}

pub(crate) fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

/// First capture group of the first pattern that matches.
pub(crate) fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Status cues for a procedure that may be performed, refused, negated or proposed.
pub(crate) struct ModalityCues {
    /// The procedure noun appears at all; nothing else is consulted otherwise.
    pub mentioned: Regex,
    pub performed: Vec<Regex>,
    pub refused: Vec<Regex>,
    pub negated: Vec<Regex>,
    pub proposed: Vec<Regex>,
}

fn modality(noun: &str, performed: Vec<String>) -> ModalityCues {
    let performed: Vec<&str> = performed.iter().map(String::as_str).collect();
    ModalityCues {
        mentioned: Regex::new(&format!(r"(?i)\b{noun}")).expect("cue pattern must compile"),
        performed: compile(&performed),
        refused: compile(&[
            &format!(r"\b{REFUSAL}\b[^.;\n]{{0,30}}\b{noun}"),
            &format!(r"\b{noun}\s+(?:was\s+|is\s+)?(?:declined|refused|deferred)\b"),
            &format!(r"\b{noun}[^.;\n]{{0,25}}\b(?:patient|pt)\s+(?:declin\w*|refus\w*|defer\w*)"),
            &format!(r"\b{noun}[^.;\n]{{0,40}}\b(?:patient|pt)\s+(?:is\s+)?not\s+interested"),
        ]),
        negated: compile(&[
            &format!(r"\b{NEGATION}\s+(?:{NEGATION_FILLER}\s+){{0,4}}{noun}"),
            &format!(
                r"\b{noun}[^.;\n]{{0,25}}\b(?:not|never)\s+(?:recommended|indicated|warranted|appropriate|needed|interested|a candidate)\b"
            ),
        ]),
        proposed: compile(&[
            &format!(r"\b{FUTURITY}\b[^.;\n]{{0,40}}\b{noun}"),
            &format!(
                r"\b{noun}[^.;\n]{{0,25}}\b(?:recommended|discussed|offered|planned|scheduled|considered|next visit)\b"
            ),
        ]),
    }
}

pub(crate) static INJECTION_STATUS: LazyLock<ModalityCues> = LazyLock::new(|| {
    modality(
        INJECTION_NOUN,
        vec![
            format!(r"\b(?:gave|given|administered|performed|completed|did)\b[^.;\n]{{0,40}}\b{INJECTION_NOUN}"),
            r"\binjected\b".to_string(),
            format!(r"\b{INJECTION_NOUN}\s*(?:#\s*\d+\s*)?(?:today|given|administered|performed|done|completed)\b"),
            format!(r"\b{INJECTION_NOUN}\s+(?:was\s+)?(?:given|administered|performed|done|completed)\b"),
            format!(r"\b{INJECTION_NOUN}\s*#\s*\d+"),
        ],
    )
});

pub(crate) static EPAT_STATUS: LazyLock<ModalityCues> = LazyLock::new(|| {
    modality(
        EPAT_NOUN,
        vec![
            format!(r"\b(?:gave|performed|completed|administered|did|delivered)\b[^.;\n]{{0,40}}\b{EPAT_NOUN}"),
            format!(r"\b{EPAT_NOUN}\s*(?:session\s*)?#\s*\d+"),
            format!(r"\b{EPAT_NOUN}\s+session\s+\d+"),
            format!(r"\b\d+(?:st|nd|rd|th)\s+(?:{EPAT_NOUN}\s+)?session\b"),
            format!(r"\b\d+(?:st|nd|rd|th)\s+{EPAT_NOUN}"),
            format!(r"\b{EPAT_NOUN}\s+(?:was\s+)?(?:today|performed|completed|done|administered)\b"),
        ],
    )
});

pub(crate) static SURGERY_STATUS: LazyLock<ModalityCues> = LazyLock::new(|| {
    let mut cues = modality(SURGERY_NOUN, Vec::new());
    cues.proposed.extend(compile(&[
        r"\bsurg\w*\s+(?:consult\w*|candidate|correction|planning|evaluation|referral|options?)\b",
    ]));
    cues
});

pub(crate) static CONTRAINDICATION_CUES: LazyLock<Vec<(Contraindication, Vec<Regex>)>> =
    LazyLock::new(|| {
        vec![
            (
                Contraindication::Anticoagulant,
                compile(&[
                    r"\banticoag\w*",
                    r"\bblood thinners?\b",
                    r"\b(?:warfarin|coumadin|eliquis|apixaban|xarelto|rivaroxaban|pradaxa|dabigatran|plavix|clopidogrel|lovenox|enoxaparin|heparin)\b",
                    r"\bon ac\b",
                ]),
            ),
            (
                Contraindication::NsaidAllergy,
                compile(&[
                    r"\bnsaids?\s+allerg\w*",
                    r"\ballerg\w*\s+(?:to\s+)?(?:nsaids?|ibuprofen|naproxen|aspirin|motrin|advil|aleve|meloxicam)",
                    r"\b(?:cannot|can't|unable to)\s+take\s+(?:nsaids?|ibuprofen|naproxen|anti-?inflammator\w*)",
                ]),
            ),
            (
                Contraindication::GiIssues,
                compile(&[
                    r"\bgi\s+(?:bleed\w*|issues?|problems?|upset|history)",
                    r"\b(?:peptic|gastric|stomach|duodenal)\s+ulcers?\b",
                    r"\b(?:gerd|gastritis|crohn'?s|colitis)\b",
                ]),
            ),
            (
                Contraindication::KidneyIssues,
                compile(&[
                    r"\bckd\b",
                    r"\besrd\b",
                    r"\bkidney\s+(?:disease|issues?|problems?|failure|insufficiency)",
                    r"\brenal\s+(?:disease|issues?|insufficiency|failure|impairment)",
                    r"\bdialysis\b",
                ]),
            ),
            (
                Contraindication::Diabetic,
                compile(&[
                    r"\bdiabet\w*",
                    r"\bdm\b",
                    r"\bdm\s*(?:1|2|i|ii|type)\b",
                    r"\bt[12]dm\b",
                    r"\b(?:iddm|niddm)\b",
                    r"\ba1c\b",
                    r"\b(?:insulin|metformin)\b",
                ]),
            ),
        ]
    });

pub(crate) static PROCEDURE_CUES: LazyLock<Vec<(Procedure, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            Procedure::Debridement,
            compile(&[
                r"\b(?:callus\w*|corns?|hyperkerato\w*|heloma\w*|lesions?|wound|ulcer|tissue|slough|eschar|necrotic)\b[^.;\n]{0,25}\b(?:debrided|pared)\b",
                r"\b(?:debrided|pared)\b[^.;\n]{0,25}\b(?:callus\w*|corns?|hyperkerato\w*|heloma\w*|lesions?|wound|ulcer|tissue|slough|eschar|necrotic|to bleeding|to viable)",
                r"\b(?:sharp|selective|excisional)(?:ly)?\s+debrid\w*",
                r"\bdebridement\s+(?:was\s+)?(?:performed|done|completed|today)\b",
                r"\b(?:performed|completed)\b[^.;\n]{0,30}\bdebridement\b",
            ]),
        ),
        (
            Procedure::NailCare,
            compile(&[
                r"\bnails?\b[^.;\n]{0,20}\b(?:debrided|trimmed|reduced|cut|clipped)\b",
                r"\b(?:debrided|trimmed|reduced)\b[^.;\n]{0,20}\bnails?\b",
                r"\bnail\s+(?:care|debridement)\b[^.;\n]{0,15}\b(?:performed|today|done|completed)\b",
            ]),
        ),
        (
            Procedure::Strapping,
            compile(&[
                r"\b(?:low[- ]?dye|strapping|taping)\b[^.;\n]{0,20}\b(?:applied|performed|today|done)\b",
                r"\b(?:strapped|taped)\b",
                r"\bapplied\b[^.;\n]{0,20}\b(?:low[- ]?dye|strapping|tape)\b",
            ]),
        ),
        (
            Procedure::Casting,
            compile(&[
                r"\bcasted\b",
                r"\bcast(?:ing|s)?\s+(?:was\s+|were\s+)?(?:taken|obtained|performed|completed|today)\b",
                r"\bfoam box\b",
                r"\bimpressions?\s+(?:were\s+|was\s+)?(?:taken|obtained)\b",
                r"\bscann?ed\b[^.;\n]{0,20}\borthot\w*",
            ]),
        ),
        (
            Procedure::DispenseOrthotics,
            compile(&[
                r"\bdispens\w*\b[^.;\n]{0,30}\borthot\w*",
                r"\borthot\w*\b[^.;\n]{0,15}\b(?:dispensed|fitted|picked up|delivered)\b",
                r"\bpick\w*\s+up\b[^.;\n]{0,20}\borthot\w*",
                r"\bfit check\b",
            ]),
        ),
    ]
});

pub(crate) static PLANNED_CUES: LazyLock<Vec<(PlannedAction, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            PlannedAction::PhysicalTherapy,
            compile(&[
                r"\b(?:refer\w*|start\w*|begin|recommend\w*|will|plan\w*|order\w*|prescri\w*|consider\w*)\b[^.;\n]{0,25}\bphysical therapy\b",
                r"\b(?:physical therapy|pt)\s+(?:referral|consult\w*|eval\w*|order\w*|recommended)\b",
            ]),
        ),
        (
            PlannedAction::Mri,
            compile(&[
                r"\b(?:order\w*|obtain|will|plan\w*|recommend\w*|get|schedul\w*|consider\w*)\b[^.;\n]{0,25}\bmri\b",
                r"\bmri\b[^.;\n]{0,15}\b(?:ordered|recommended|planned|scheduled|to evaluate|to r/o|to rule out)\b",
            ]),
        ),
        (
            PlannedAction::Orthotics,
            compile(&[
                r"\b(?:recommend\w*|will|plan\w*|order\w*|prescri\w*|consider\w*|candidate|needs?)\b[^.;\n]{0,30}\borthot\w*",
                r"\borthot\w*\s+(?:recommended|prescribed|ordered|planned)\b",
            ]),
        ),
        (
            PlannedAction::CamBoot,
            compile(&[r"\bcam\s*(?:boot|walker)\b", r"\b(?:walking|fracture)\s+boot\b"]),
        ),
        (
            PlannedAction::DiabeticShoes,
            compile(&[
                r"\bdiabetic\s+shoes?\b",
                r"\btherapeutic\s+(?:shoes|footwear)\b",
                r"\bextra[- ]depth\s+(?:shoes|footwear)\b",
            ]),
        ),
    ]
});

pub(crate) static FINDING_CUES: LazyLock<Vec<(Finding, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            Finding::Improved,
            compile(&[
                r"\bimprov\w*",
                r"\bbetter\b",
                r"\bresolv\w*",
                r"\bless pain\b",
                r"\bdecreas\w*\s+pain\b",
                r"\bhealing well\b",
                r"\bsmaller\b",
            ]),
        ),
        (
            Finding::Worse,
            compile(&[
                r"\bworse\w*",
                r"\bworsen\w*",
                r"\bincreas\w*\s+pain\b",
                r"\bflare\w*",
                r"\baggravat\w*",
                r"\blarger\b",
                r"\bdeteriorat\w*",
            ]),
        ),
        (
            Finding::Unchanged,
            compile(&[
                r"\bunchanged\b",
                r"\bno\s+(?:change|improvement)\b",
                r"\b(?:about|still|remains?|stays?)\s+the\s+same\b",
                r"\bstatic\b",
                r"\bplateau\w*",
                r"\bstalled\b",
                r"\bnot\s+(?:healing|improving)\b",
            ]),
        ),
        (
            Finding::Chronic,
            compile(&[
                r"\bchronic\w*",
                r"\b\d+\s*(?:months?|mos?)\b",
                r"\bfor\s+\d+\s*(?:years?|yrs?)\b",
                r"\b\d+\s*(?:years?|yrs?)\s+(?:of|ago|history)\b",
                r">\s*6\s*(?:w|wk|wks|weeks)\b",
                r"\bfailed\b",
                r"\bpersistent\b",
                r"\brecalcitrant\b",
                r"\brefractory\b",
                r"\blong[- ]?standing\b",
            ]),
        ),
        (
            Finding::Acute,
            compile(&[
                r"\bacute\w*",
                r"\bsudden\w*",
                r"\b(?:new|recent)\s+onset\b",
                r"\b\d+\s*days?\b",
                r"\byesterday\b",
            ]),
        ),
        (
            Finding::Infection,
            compile(&[
                r"\binfect\w*",
                r"\bcellulitis\b",
                r"\bpurulen\w*",
                r"\bosteomyelitis\b",
                r"\babscess\w*",
                r"\bmalodor\w*",
                r"\bfoul\s+odou?r\b",
            ]),
        ),
        (
            Finding::Lops,
            compile(&[
                r"\blops\b",
                r"\bloss of protective sensation\b",
                r"\b(?:diminished|absent|decreased|reduced)\b[^.;\n]{0,20}\b(?:sensation|protective|monofilament)",
                r"\bneuropath\w*",
                r"\b(?:cannot|can't|unable to)\s+(?:feel|sense)\b",
                r"\binsensate\b",
                r"\bmonofilament\b[^.;\n]{0,15}(?:absent|diminished|decreased|\d+\s*/\s*10)",
            ]),
        ),
        (
            Finding::Pvd,
            compile(&[
                r"\bpvd\b",
                r"\bperipheral\s+(?:arterial|vascular)\s+disease\b",
                r"\b(?:diminished|absent|non-?palpable|weak)\s+(?:pedal\s+)?pulses\b",
                r"\bpulses\b[^.;\n]{0,10}\b(?:non-?palpable|absent|diminished)\b",
                r"\bclaudication\b",
            ]),
        ),
        (
            Finding::Deformity,
            compile(&[
                r"\bhav\b",
                r"\bbunions?\b",
                r"\bhallux valgus\b",
                r"\bhammer\s*toes?\b",
                r"\bclaw\s*toes?\b",
                r"\bcharcot\b",
                r"\bdeformit\w*",
                r"\bprominent\s+met\w*",
            ]),
        ),
    ]
});

/// Phrases that cancel a positive finding ("no signs of infection").
pub(crate) static NEGATED_FINDING_CUES: LazyLock<Vec<(Finding, Vec<Regex>)>> =
    LazyLock::new(|| {
        vec![
            (
                Finding::Improved,
                compile(&[r"\b(?:no|not|without)\s+(?:\w+\s+)?improv\w*"]),
            ),
            (
                Finding::Infection,
                compile(&[
                    r"\b(?:no|without|negative for|denies)\s+(?:\w+\s+){0,3}(?:infect\w*|cellulitis|purulen\w*)",
                ]),
            ),
            (
                Finding::Lops,
                compile(&[
                    r"\b(?:no|denies|without)\s+(?:\w+\s+)?(?:neuropath\w*|lops)\b",
                    r"\bprotective sensation\s+(?:is\s+)?intact\b",
                ]),
            ),
        ]
    });

pub(crate) static SEPARATE_PROBLEM: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\balso has\b",
        r"\bseparate\b",
        r"\bdifferent foot\b",
        r"\bin addition\b",
        r"\bplus patient\b",
        r"\badditionally\b",
        r"\bsecond\s+(?:issue|problem|complaint)\b",
    ])
});

pub(crate) static DIABETIC_EXAM: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bdiabetic\s+foot\s+(?:exam\w*|check|screen\w*|evaluation|care)\b",
        r"\bcomprehensive\s+(?:diabetic\s+)?foot\s+exam\w*",
        r"\bdfe\b",
        r"\bannual\s+foot\s+exam\w*",
        r"\bmonofilament\b",
    ])
});

pub(crate) static BILATERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbilat(?:eral(?:ly)?)?\b").expect("cue pattern must compile")
});
pub(crate) static LEFT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:left|lt)\b").expect("cue pattern must compile"));
pub(crate) static RIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:right|rt)\b").expect("cue pattern must compile"));

pub(crate) static INJECTION_NUMBER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:inject\w*|csi|shot)\s*#\s*(\d+)",
        r"#\s*(\d+)\s+(?:inject\w*|csi|shot)",
        r"\b(\d+)(?:st|nd|rd|th)\s+(?:(?:steroid|cortisone|corticosteroid)\s+)?(?:inject\w*|csi|shot)",
        r"\b(first|second|third|fourth|fifth|sixth)\s+(?:(?:steroid|cortisone|corticosteroid)\s+)?(?:inject\w*|csi|shot)",
    ])
});

pub(crate) static EPAT_SESSION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        &format!(r"\b{EPAT_NOUN}\s*(?:session\s*)?#\s*(\d+)"),
        &format!(r"\b{EPAT_NOUN}\s+session\s+(\d+)"),
        r"\bsession\s*#?\s*(\d+)",
        &format!(r"\b(\d+)(?:st|nd|rd|th)\s+(?:{EPAT_NOUN}\s+)?(?:session|treatment)\b"),
        &format!(r"\b(\d+)(?:st|nd|rd|th)\s+{EPAT_NOUN}"),
        &format!(r"\b(first|second|third|fourth|fifth|sixth)\s+(?:{EPAT_NOUN}\s+)?session\b"),
    ])
});

pub(crate) static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?(?:\s*-\s*\d+)?\s*(?:days?|weeks?|wks?|months?|mos?|years?|yrs?)\b")
        .expect("cue pattern must compile")
});

pub(crate) static WOUND_DIMENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:cm\s*)?[x×]\s*(\d+(?:\.\d+)?)(?:\s*(?:cm\s*)?[x×]\s*(\d+(?:\.\d+)?))?")
        .expect("cue pattern must compile")
});

pub(crate) static A1C: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\b(?:hb)?a1c\s*(?:of|is|was|=|:)?\s*(\d+(?:\.\d+)?)"]));
pub(crate) static HVA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\b(?:hva|hallux valgus angle)\s*(?:of|is|=|:)?\s*(\d+(?:\.\d+)?)"])
});
pub(crate) static IMA: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\b(?:ima|intermetatarsal angle)\s*(?:of|is|=|:)?\s*(\d+(?:\.\d+)?)"])
});
pub(crate) static WAGNER: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\bwagner\s*(?:grade\s*)?(?:=|:)?\s*([0-5])\b"]));
pub(crate) static COUGHLIN_GRADE: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\bgrade\s*(?:=|:)?\s*(iv|iii|ii|i|[0-4])\b"]));
pub(crate) static ROM: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\b(\d+)\s*(?:°|deg\w*)?\s*(?:of\s+)?(?:dorsiflexion|df)\b"])
});
pub(crate) static NAIL_COUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\b(\d+)\s+(?:(?:mycotic|dystrophic|thick\w*)\s+)?(?:toe\s*)?nails?\b"])
});

/// Treatments already tried, each with the cue that reveals it.
pub(crate) static PRIOR_TREATMENTS: LazyLock<Vec<(&'static str, Vec<Regex>)>> =
    LazyLock::new(|| {
        vec![
            ("stretching", compile(&[r"\bstretch\w*"])),
            ("icing", compile(&[r"\bic(?:e|ing)\b"])),
            (
                "NSAIDs",
                compile(&[
                    r"\b(?:nsaids?|aleve|advil|ibuprofen|naproxen|motrin|meloxicam|mobic|celebrex|diclofenac)\b",
                ]),
            ),
            (
                "OTC arch supports",
                compile(&[
                    r"\botc\b",
                    r"\bover[- ]the[- ]counter\b",
                    r"\binserts?\b",
                    r"\barch supports?\b",
                ]),
            ),
            ("custom orthotics", compile(&[r"\bcustom\s+orthot\w*"])),
            ("night splint", compile(&[r"\bnight\s+splints?\b"])),
            ("physical therapy", compile(&[r"\bphysical therapy\b"])),
            (
                "supportive footwear",
                compile(&[r"\bsupportive\s+(?:shoes|footwear)\b", r"\bshoe\s+changes?\b"]),
            ),
            (
                "activity modification",
                compile(&[r"\bactivity modification\b", r"\brest\b"]),
            ),
            (
                "immobilization",
                compile(&[r"\bcam\s*(?:boot|walker)\b", r"\bwalking boot\b", r"\bimmobiliz\w*"]),
            ),
            ("heel lift", compile(&[r"\bheel\s+lifts?\b"])),
        ]
    });

pub(crate) static WOUND_LOCATIONS: LazyLock<Vec<(&'static str, Vec<Regex>)>> =
    LazyLock::new(|| {
        vec![
            (
                "1st MTP plantar",
                compile(&[r"\b1st\s*(?:mtp|met\w*)", r"\bbig\s*toe\b", r"\bhallux\b"]),
            ),
            ("5th metatarsal", compile(&[r"\b5th\s*(?:met\w*|mtp)"])),
            ("heel", compile(&[r"\bheel\b", r"\bcalcan\w*"])),
            ("malleolar", compile(&[r"\bmalleol\w*"])),
            ("dorsal foot", compile(&[r"\bdorsa?l\b", r"\bdorsum\b"])),
        ]
    });

/// Injection targets in lookup precedence order.
static INJECTION_TARGETS: LazyLock<Vec<(InjectionTarget, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            InjectionTarget::PlantarFascia,
            compile(&[r"\bplantar\s*fasc\w*", r"\bmedial\s+calcaneal\s+tubercle\b"]),
        ),
        (
            InjectionTarget::Neuroma,
            compile(&[r"\bneuroma\b", r"\bmorton'?s?\b", r"\binterdigital\s+neuritis\b"]),
        ),
        (
            InjectionTarget::FirstMtpJoint,
            compile(&[r"\b1st\s*mtp\w*", r"\bfirst\s+mtp\w*", r"\bbig\s*toe\s+joint\b"]),
        ),
        (InjectionTarget::AnkleJoint, compile(&[r"\bankle\b"])),
        (
            InjectionTarget::SubtalarJoint,
            compile(&[r"\bsubtalar\b", r"\bstj\b", r"\bsinus\s+tarsi\s+joint\b"]),
        ),
        (InjectionTarget::TarsalTunnel, compile(&[r"\btarsal\s+tunnel\b"])),
        (
            InjectionTarget::RetrocalcanealBursa,
            compile(&[r"\bretrocalc\w*", r"\bbursa\w*"]),
        ),
        (
            InjectionTarget::PeronealTendonSheath,
            compile(&[r"\bperone\w*\s+(?:tendon\s+)?sheath\b"]),
        ),
    ]
});

pub(crate) fn injection_target(text: &str) -> Option<InjectionTarget> {
    INJECTION_TARGETS
        .iter()
        .find(|(_, patterns)| any_match(patterns, text))
        .map(|(target, _)| target.clone())
}

pub(crate) static NON_INSERTIONAL: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\bnon-?\s*insert\w*", r"\bmid-?\s*(?:portion|substance)\b"]));
pub(crate) static INSERTIONAL: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\binsert\w*"]));

pub(crate) static DEFORMITIES: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        ("HAV", compile(&[r"\bhav\b", r"\bbunions?\b", r"\bhallux valgus\b"])),
        ("hammertoes", compile(&[r"\bhammer\s*toes?\b", r"\bclaw\s*toes?\b"])),
        ("Charcot", compile(&[r"\bcharcot\b"])),
    ]
});

pub(crate) static BIOMECHANICS: LazyLock<Vec<(&'static str, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            "pes planus",
            compile(&[r"\bpes\s+planus\b", r"\bflat\s*(?:feet|foot)\b", r"\bflatfoot\b"]),
        ),
        ("overpronation", compile(&[r"\b(?:over)?prona\w*"])),
        ("cavus foot", compile(&[r"\bcavus\b", r"\bhigh\s+arch\w*"])),
        ("forefoot/rearfoot varus", compile(&[r"\bvarus\b"])),
        ("equinus", compile(&[r"\bequinus\b"])),
    ]
});

pub(crate) static DIGITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([2-5])(?:nd|rd|th)?\s*(?:toes?|digits?)\b")
        .expect("cue pattern must compile")
});

pub(crate) static RIGID: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\brigid\w*", r"\bfixed\b", r"\bnon-?\s*reduc\w*"]));
pub(crate) static FLEXIBLE: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\bflexib\w*", r"\breduc(?:ible|es)\b"]));
pub(crate) static LESION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\bcorns?\b", r"\bheloma\w*", r"\blesions?\b", r"\bcallus\w*", r"\bhyperkerato\w*"])
});
pub(crate) static SUBLUXATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\bsublux\w*", r"\bdislocat\w*", r"\bunstable\b", r"\bclicking\b", r"\bpopping\b"])
});
pub(crate) static ESCALATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\bescalat\w*", r"\brecalcitrant\b", r"\brefractory\b", r"\bnext\s+steps?\b"])
});
pub(crate) static PRIOR_ULCER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:history of|h/o|hx of|prior|previous|healed)\s+(?:\w+\s+)?(?:ulcer\w*|dfu|wound)",
    ])
});
pub(crate) static PRIOR_AMPUTATION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"\bamputat\w*", r"\bs/p\s+(?:toe|ray|tma)\b", r"\bray\s+resection\b", r"\btma\b"])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cue_tables_compile() {
        LazyLock::force(&INJECTION_STATUS);
        LazyLock::force(&EPAT_STATUS);
        LazyLock::force(&SURGERY_STATUS);
        assert_eq!(CONTRAINDICATION_CUES.len(), 5);
        assert_eq!(PROCEDURE_CUES.len(), 5);
        assert_eq!(PLANNED_CUES.len(), 5);
        assert_eq!(FINDING_CUES.len(), 9);
        assert!(!NEGATED_FINDING_CUES.is_empty());
        assert!(!PRIOR_TREATMENTS.is_empty());
        assert!(!INJECTION_TARGETS.is_empty());
        LazyLock::force(&DURATION);
        LazyLock::force(&WOUND_DIMENSIONS);
        LazyLock::force(&DIGITS);
    }

    #[test]
    fn test_injection_target_precedence() {
        assert_eq!(
            injection_target("plantar fascia, also ankle pain"),
            Some(InjectionTarget::PlantarFascia)
        );
        assert_eq!(
            injection_target("Morton neuroma 3rd interspace"),
            Some(InjectionTarget::Neuroma)
        );
        assert_eq!(
            injection_target("1st MTP joint arthritis"),
            Some(InjectionTarget::FirstMtpJoint)
        );
        assert_eq!(injection_target("knee pain"), None);
    }

    #[test]
    fn test_first_capture_uses_first_matching_pattern() {
        let text = "Hallux valgus, HVA 32, IMA: 14";
        assert_eq!(first_capture(&HVA, text).as_deref(), Some("32"));
        assert_eq!(first_capture(&IMA, text).as_deref(), Some("14"));
        assert_eq!(first_capture(&WAGNER, text), None);
    }
}
