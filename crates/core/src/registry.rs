//! The condition catalog.
//!
//! A literal, ordered table of condition definitions. Table order is also the detector's
//! tie-break order, so new rows are appended at the end.

use std::sync::LazyLock;

use mdm_types::Laterality;
use regex::Regex;
use serde::Serialize;

use crate::config::Configuration;
use crate::constants::COMMAND_MARKER;
use crate::error::Suggestion;
use crate::facts::ParsedFacts;
use crate::generators;

/// Pure document generator shared by every registry row.
pub type Generator = fn(&ParsedFacts, Option<Laterality>, &Configuration) -> String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionId {
    PlantarFasciitis,
    DiabeticFoot,
    WoundCare,
    Injection,
    HalluxRigidus,
    HalluxValgus,
    Achilles,
    Peroneal,
    Hammertoe,
    Orthotics,
}

impl ConditionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlantarFasciitis => "plantar-fasciitis",
            Self::DiabeticFoot => "diabetic-foot",
            Self::WoundCare => "wound-care",
            Self::Injection => "injection",
            Self::HalluxRigidus => "hallux-rigidus",
            Self::HalluxValgus => "hallux-valgus",
            Self::Achilles => "achilles",
            Self::Peroneal => "peroneal",
            Self::Hammertoe => "hammertoe",
            Self::Orthotics => "orthotics",
        }
    }
}

impl std::fmt::Display for ConditionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One supported condition: metadata, detection patterns and its generator.
#[derive(Debug)]
pub struct ConditionDefinition {
    pub id: ConditionId,
    pub name: &'static str,
    pub billing_code: &'static str,
    /// Short command, including the leading marker (for example `.pf`).
    pub alias: &'static str,
    pub patterns: Vec<Regex>,
    generator: Generator,
}

impl ConditionDefinition {
    /// Number of detection patterns that match `text`.
    pub fn matches(&self, text: &str) -> u32 {
        self.patterns.iter().filter(|re| re.is_match(text)).count() as u32
    }

    /// Runs this condition's document generator.
    pub fn generate(
        &self,
        facts: &ParsedFacts,
        laterality: Option<Laterality>,
        config: &Configuration,
    ) -> String {
        (self.generator)(facts, laterality, config)
    }

    pub fn suggestion(&self) -> Suggestion {
        Suggestion {
            alias: self.alias.to_string(),
            name: self.name.to_string(),
            billing_code: self.billing_code.to_string(),
        }
    }
}

fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("detection pattern must compile"))
        .collect()
}

static REGISTRY: LazyLock<Vec<ConditionDefinition>> = LazyLock::new(|| {
    vec![
        ConditionDefinition {
            id: ConditionId::PlantarFasciitis,
            name: "Plantar Fasciitis",
            billing_code: "M72.2",
            alias: ".pf",
            patterns: patterns(&[
                r"plantar\s*fasc",
                r"heel\s*pain",
                r"first\s*step",
                r"morning.*(heel|pain)",
                r"medial\s*(calcaneal|tubercle)",
                r"windlass",
                r"\bpf\b",
            ]),
            generator: generators::plantar_fasciitis::generate,
        },
        ConditionDefinition {
            id: ConditionId::DiabeticFoot,
            name: "Diabetic Foot Care",
            billing_code: "G0245",
            alias: ".df",
            patterns: patterns(&[
                r"diabet",
                r"\bdm\s*(1|2|type)",
                r"neuropath",
                r"\blops\b",
                r"monofilament",
                r"a1c",
                r"diabetic\s+foot\s+(exam|check|screen|care|evaluation)",
                r"comprehensive\s+foot\s+exam",
            ]),
            generator: generators::diabetic_foot::generate,
        },
        ConditionDefinition {
            id: ConditionId::WoundCare,
            name: "Wound Care/DFU",
            billing_code: "97597",
            alias: ".wc",
            patterns: patterns(&[
                r"ulcer",
                r"wound",
                r"\bdfu",
                r"debride",
                r"granulat",
                r"slough",
                r"eschar",
                r"wagner",
            ]),
            generator: generators::wound_care::generate,
        },
        ConditionDefinition {
            id: ConditionId::Injection,
            name: "Corticosteroid Injection",
            billing_code: "20550",
            alias: ".csi",
            patterns: patterns(&[
                r"inject",
                r"steroid",
                r"cortico",
                r"depo",
                r"kenalog",
                r"dexameth",
                r"celestone",
            ]),
            generator: generators::injection::generate,
        },
        ConditionDefinition {
            id: ConditionId::HalluxRigidus,
            name: "Hallux Rigidus",
            billing_code: "M20.20",
            alias: ".hr",
            patterns: patterns(&[
                r"hallux\s*rigidus",
                r"1st\s*mtp.*(stiff|arthr|limit)",
                r"big\s*toe.*(stiff|arthr)",
                r"dorsal\s*osteophyte",
            ]),
            generator: generators::hallux_rigidus::generate,
        },
        ConditionDefinition {
            id: ConditionId::HalluxValgus,
            name: "Hallux Valgus",
            billing_code: "M20.10",
            alias: ".hv",
            patterns: patterns(&[
                r"hallux\s*valgus",
                r"bunion",
                r"\bhva\s*:?\s*\d",
                r"\bima\s*:?\s*\d",
            ]),
            generator: generators::hallux_valgus::generate,
        },
        ConditionDefinition {
            id: ConditionId::Achilles,
            name: "Achilles Tendinopathy",
            billing_code: "M76.60",
            alias: ".at",
            patterns: patterns(&[
                r"achilles",
                r"tendo.?achilles",
                r"posterior\s*heel",
                r"heel\s*cord",
            ]),
            generator: generators::achilles::generate,
        },
        ConditionDefinition {
            id: ConditionId::Peroneal,
            name: "Peroneal Tendinopathy",
            billing_code: "M76.70",
            alias: ".pt",
            patterns: patterns(&[r"peroneal", r"peroneus", r"lateral\s*ankle.*tendon"]),
            generator: generators::peroneal::generate,
        },
        ConditionDefinition {
            id: ConditionId::Hammertoe,
            name: "Hammertoe",
            billing_code: "M20.40",
            alias: ".ht",
            patterns: patterns(&[
                r"hammer\s*toe",
                r"claw\s*toe",
                r"mallet",
                r"digit.*contract",
                r"pip.*contract",
            ]),
            generator: generators::hammertoe::generate,
        },
        ConditionDefinition {
            id: ConditionId::Orthotics,
            name: "Custom Orthotics",
            billing_code: "L3000",
            alias: ".ortho",
            patterns: patterns(&[
                r"custom\s*orthot",
                r"orthotic",
                r"orthos",
                r"otc.*(fail|inadequate)",
                r"biomech",
                r"arch\s*support",
            ]),
            generator: generators::orthotics::generate,
        },
    ]
});

/// All conditions in registration order.
pub fn registry() -> &'static [ConditionDefinition] {
    REGISTRY.as_slice()
}

/// Exact, case-insensitive alias lookup. The alias must include the leading marker.
pub fn by_alias(alias: &str) -> Option<&'static ConditionDefinition> {
    if !alias.starts_with(COMMAND_MARKER) {
        return None;
    }
    registry()
        .iter()
        .find(|condition| condition.alias.eq_ignore_ascii_case(alias))
}

pub fn by_id(id: ConditionId) -> Option<&'static ConditionDefinition> {
    registry().iter().find(|condition| condition.id == id)
}

/// Conditions whose alias starts with `prefix`, for autocomplete.
///
/// # Arguments
/// * `prefix` - The command token typed so far, including the marker. Case-insensitive.
///
/// # Returns
/// Matching rows in registration order; empty when `prefix` does not start with the marker.
pub fn suggest(prefix: &str) -> Vec<&'static ConditionDefinition> {
    let prefix = prefix.trim().to_lowercase();
    if !prefix.starts_with(COMMAND_MARKER) {
        return Vec::new();
    }
    registry()
        .iter()
        .filter(|condition| condition.alias.starts_with(prefix.as_str()))
        .collect()
}
