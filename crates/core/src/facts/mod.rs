//! Structured clinical facts derived from free text.
//!
//! [`extract`] turns a note into a [`ParsedFacts`] record. Every flag is resolved once, by the
//! cue tables in [`cues`], so the document generators only branch on booleans and values and
//! never run their own pattern checks against the raw text.

mod cues;
mod extract;

pub use extract::extract;

use mdm_types::Laterality;
use serde::Serialize;

use crate::constants::DEFAULT_SEQUENCE;

/// Everything the engine knows about one note.
///
/// A pure function of the input text: extracting the same text twice yields equal records.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParsedFacts {
    pub contraindications: Contraindications,
    pub procedures: Procedures,
    pub planned: Planned,
    pub declined: Declined,
    pub findings: Findings,
    pub values: Values,
    pub laterality: Option<Laterality>,
    /// A second, distinct problem was addressed in the same encounter (Modifier 25).
    pub separate_problem: bool,
    pub is_diabetic_exam: bool,
    pub cues: ClinicalCues,
    pub raw_text: String,
}

impl ParsedFacts {
    /// An empty record carrying only the input text, used for explicit commands.
    pub fn from_raw(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// Whether a procedure for `modality` was offered, planned or refused without being done.
    pub fn discussed_only(&self, modality: Modality) -> bool {
        match modality {
            Modality::Injection => {
                !self.procedures.injection && (self.planned.injection || self.declined.injection)
            }
            Modality::Epat => !self.procedures.epat && (self.planned.epat || self.declined.epat),
            Modality::Surgery => self.planned.surgery || self.declined.surgery,
        }
    }
}

/// Procedures whose status is resolved as performed, declined or planned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modality {
    Injection,
    Epat,
    Surgery,
}

impl Modality {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Injection => "corticosteroid injection",
            Self::Epat => "EPAT (extracorporeal pulse activation technology)",
            Self::Surgery => "surgical intervention",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contraindication {
    Anticoagulant,
    NsaidAllergy,
    GiIssues,
    KidneyIssues,
    Diabetic,
}

impl Contraindication {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Anticoagulant => "anticoagulation",
            Self::NsaidAllergy => "NSAID allergy",
            Self::GiIssues => "GI history",
            Self::KidneyIssues => "renal disease",
            Self::Diabetic => "diabetes mellitus",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Contraindications {
    pub anticoagulant: bool,
    pub nsaid_allergy: bool,
    pub gi_issues: bool,
    pub kidney_issues: bool,
    pub diabetic: bool,
}

impl Contraindications {
    pub fn set(&mut self, flag: Contraindication) {
        match flag {
            Contraindication::Anticoagulant => self.anticoagulant = true,
            Contraindication::NsaidAllergy => self.nsaid_allergy = true,
            Contraindication::GiIssues => self.gi_issues = true,
            Contraindication::KidneyIssues => self.kidney_issues = true,
            Contraindication::Diabetic => self.diabetic = true,
        }
    }

    /// Flags that are set, in declaration order.
    pub fn present(&self) -> Vec<Contraindication> {
        [
            (self.anticoagulant, Contraindication::Anticoagulant),
            (self.nsaid_allergy, Contraindication::NsaidAllergy),
            (self.gi_issues, Contraindication::GiIssues),
            (self.kidney_issues, Contraindication::KidneyIssues),
            (self.diabetic, Contraindication::Diabetic),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect()
    }

    pub fn any(&self) -> bool {
        !self.present().is_empty()
    }

    /// The first flag that rules out NSAIDs. Diabetes alone does not.
    pub fn nsaid_contraindication(&self) -> Option<Contraindication> {
        self.present()
            .into_iter()
            .find(|flag| *flag != Contraindication::Diabetic)
    }
}

/// Actions stated as already performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Procedure {
    Debridement,
    NailCare,
    Strapping,
    Casting,
    DispenseOrthotics,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Procedures {
    pub injection: bool,
    pub epat: bool,
    pub debridement: bool,
    pub nail_care: bool,
    pub strapping: bool,
    pub casting: bool,
    pub dispense_orthotics: bool,
}

impl Procedures {
    pub fn set(&mut self, flag: Procedure) {
        match flag {
            Procedure::Debridement => self.debridement = true,
            Procedure::NailCare => self.nail_care = true,
            Procedure::Strapping => self.strapping = true,
            Procedure::Casting => self.casting = true,
            Procedure::DispenseOrthotics => self.dispense_orthotics = true,
        }
    }
}

/// Actions proposed but not yet performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannedAction {
    PhysicalTherapy,
    Mri,
    Orthotics,
    CamBoot,
    DiabeticShoes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Planned {
    pub injection: bool,
    pub epat: bool,
    pub physical_therapy: bool,
    pub mri: bool,
    pub surgery: bool,
    pub orthotics: bool,
    pub cam_boot: bool,
    pub diabetic_shoes: bool,
}

impl Planned {
    pub fn set(&mut self, flag: PlannedAction) {
        match flag {
            PlannedAction::PhysicalTherapy => self.physical_therapy = true,
            PlannedAction::Mri => self.mri = true,
            PlannedAction::Orthotics => self.orthotics = true,
            PlannedAction::CamBoot => self.cam_boot = true,
            PlannedAction::DiabeticShoes => self.diabetic_shoes = true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Declined {
    pub injection: bool,
    pub epat: bool,
    pub surgery: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finding {
    Improved,
    Worse,
    Unchanged,
    Chronic,
    Acute,
    Infection,
    Lops,
    Pvd,
    Deformity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub improved: bool,
    pub worse: bool,
    pub unchanged: bool,
    pub chronic: bool,
    pub acute: bool,
    pub infection: bool,
    pub lops: bool,
    pub pvd: bool,
    pub deformity: bool,
}

impl Findings {
    pub fn set(&mut self, flag: Finding) {
        match flag {
            Finding::Improved => self.improved = true,
            Finding::Worse => self.worse = true,
            Finding::Unchanged => self.unchanged = true,
            Finding::Chronic => self.chronic = true,
            Finding::Acute => self.acute = true,
            Finding::Infection => self.infection = true,
            Finding::Lops => self.lops = true,
            Finding::Pvd => self.pvd = true,
            Finding::Deformity => self.deformity = true,
        }
    }

    pub fn clear(&mut self, flag: Finding) {
        match flag {
            Finding::Improved => self.improved = false,
            Finding::Worse => self.worse = false,
            Finding::Unchanged => self.unchanged = false,
            Finding::Chronic => self.chronic = false,
            Finding::Acute => self.acute = false,
            Finding::Infection => self.infection = false,
            Finding::Lops => self.lops = false,
            Finding::Pvd => self.pvd = false,
            Finding::Deformity => self.deformity = false,
        }
    }
}

/// Wound size in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WoundDimensions {
    pub length: f64,
    pub width: f64,
    pub depth: Option<f64>,
}

impl WoundDimensions {
    /// Parses `L x W [x D]` with `x`, `X` or `×` separators. All parts must be positive.
    pub fn parse(input: &str) -> Option<Self> {
        let parts = input
            .split(['x', 'X', '×'])
            .map(|p| p.trim().trim_end_matches("cm").trim())
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().ok().filter(|v| *v > 0.0))
            .collect::<Option<Vec<f64>>>()?;

        match parts.as_slice() {
            [length, width] => Some(Self {
                length: *length,
                width: *width,
                depth: None,
            }),
            [length, width, depth] => Some(Self {
                length: *length,
                width: *width,
                depth: Some(*depth),
            }),
            _ => None,
        }
    }

    /// Length × width, rounded to one decimal place.
    pub fn surface_area(&self) -> f64 {
        (self.length * self.width * 10.0).round() / 10.0
    }
}

impl std::fmt::Display for WoundDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.length, self.width)?;
        if let Some(depth) = self.depth {
            write!(f, " x {depth}")?;
        }
        f.write_str(" cm")
    }
}

/// Scalars pulled from labelled numbers in the text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Values {
    pub injection_number: String,
    pub epat_session: String,
    pub duration: Option<String>,
    pub wound: Option<WoundDimensions>,
    pub a1c: Option<String>,
    /// Hallux valgus angle in degrees.
    pub hva: Option<String>,
    /// Intermetatarsal angle in degrees.
    pub ima: Option<String>,
    pub wagner: Option<String>,
    /// Hallux rigidus (Coughlin) grade.
    pub grade: Option<String>,
    /// 1st MTP dorsiflexion in degrees.
    pub rom: Option<String>,
    pub nail_count: Option<String>,
}

impl Default for Values {
    fn default() -> Self {
        Self {
            injection_number: DEFAULT_SEQUENCE.into(),
            epat_session: DEFAULT_SEQUENCE.into(),
            duration: None,
            wound: None,
            a1c: None,
            hva: None,
            ima: None,
            wagner: None,
            grade: None,
            rom: None,
            nail_count: None,
        }
    }
}

impl Values {
    pub fn injection_count(&self) -> u32 {
        self.injection_number.parse().unwrap_or(1)
    }

    pub fn epat_count(&self) -> u32 {
        self.epat_session.parse().unwrap_or(1)
    }

    pub fn hva_degrees(&self) -> Option<f64> {
        self.hva.as_deref().and_then(|v| v.parse().ok())
    }

    pub fn ima_degrees(&self) -> Option<f64> {
        self.ima.as_deref().and_then(|v| v.parse().ok())
    }
}

/// Anatomic targets for a corticosteroid injection, each with its approach and CPT code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionTarget {
    PlantarFascia,
    Neuroma,
    FirstMtpJoint,
    AnkleJoint,
    SubtalarJoint,
    TarsalTunnel,
    RetrocalcanealBursa,
    PeronealTendonSheath,
    Other(String),
}

impl InjectionTarget {
    /// Resolves a target from lexical cues; `None` when the text names no known structure.
    pub fn from_text(text: &str) -> Option<Self> {
        cues::injection_target(text)
    }

    /// Resolves an explicit target name, keeping unknown names verbatim.
    pub fn from_label(label: &str) -> Self {
        Self::from_text(label).unwrap_or_else(|| Self::Other(label.trim().to_string()))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::PlantarFascia => "plantar fascia origin",
            Self::Neuroma => "intermetatarsal neuroma",
            Self::FirstMtpJoint => "1st MTP joint",
            Self::AnkleJoint => "ankle joint",
            Self::SubtalarJoint => "subtalar joint",
            Self::TarsalTunnel => "tarsal tunnel",
            Self::RetrocalcanealBursa => "retrocalcaneal bursa",
            Self::PeronealTendonSheath => "peroneal tendon sheath",
            Self::Other(label) => label,
        }
    }

    pub fn approach(&self) -> &'static str {
        match self {
            Self::PlantarFascia => "medial heel approach directed to the medial calcaneal tubercle",
            Self::Neuroma => "dorsal approach into the intermetatarsal space",
            Self::FirstMtpJoint => "dorsomedial approach into the joint space",
            Self::AnkleJoint => "anteromedial approach medial to the tibialis anterior tendon",
            Self::SubtalarJoint => "lateral approach via the sinus tarsi",
            Self::TarsalTunnel => "medial approach posterior to the medial malleolus",
            Self::RetrocalcanealBursa => {
                "lateral approach anterior to the Achilles tendon, avoiding the tendon substance"
            }
            Self::PeronealTendonSheath => "posterolateral approach into the tendon sheath",
            Self::Other(_) => "[approach]",
        }
    }

    pub fn billing_code(&self) -> &'static str {
        match self {
            Self::PlantarFascia | Self::PeronealTendonSheath | Self::Other(_) => "20550",
            Self::Neuroma => "64455",
            Self::FirstMtpJoint => "20600",
            Self::AnkleJoint | Self::SubtalarJoint | Self::RetrocalcanealBursa => "20605",
            Self::TarsalTunnel => "64450",
        }
    }

    pub fn billing_description(&self) -> &'static str {
        match self {
            Self::PlantarFascia | Self::PeronealTendonSheath | Self::Other(_) => {
                "Injection, single tendon sheath or ligament/aponeurosis"
            }
            Self::Neuroma => "Injection, anesthetic/steroid, plantar common digital nerve",
            Self::FirstMtpJoint => "Arthrocentesis, aspiration and/or injection, small joint",
            Self::AnkleJoint | Self::SubtalarJoint | Self::RetrocalcanealBursa => {
                "Arthrocentesis, aspiration and/or injection, intermediate joint or bursa"
            }
            Self::TarsalTunnel => "Injection, anesthetic/steroid, other peripheral nerve",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Contracture {
    Rigid,
    Flexible,
}

/// Condition-specific cues resolved by the extractor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClinicalCues {
    /// Treatments already tried, in the order the cue table lists them.
    pub prior_treatments: Vec<String>,
    pub wound_location: Option<String>,
    pub injection_target: Option<InjectionTarget>,
    /// Achilles pathology location (insertional / non-insertional).
    pub tendon_location: Option<String>,
    pub deformities: Vec<String>,
    pub biomechanics: Vec<String>,
    /// Affected lesser toes, comma separated.
    pub digits: Option<String>,
    pub contracture: Option<Contracture>,
    /// Corn / heloma / hyperkeratotic lesion present.
    pub lesion: bool,
    pub subluxation: bool,
    /// Any surgical term appears, whether or not a plan or refusal goes with it.
    pub surgery_mentioned: bool,
    pub escalate: bool,
    pub prior_ulcer: bool,
    pub prior_amputation: bool,
}
