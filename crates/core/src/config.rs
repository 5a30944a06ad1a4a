//! Clinician configuration.
//!
//! A `Configuration` is resolved once per session (defaults merged with any persisted
//! overrides) and then passed by reference into every generation call. The engine never reads
//! ambient state and never mutates the configuration it is given.
//!
//! Every field carries a serde default, so a partial preferences document deserializes into a
//! complete configuration with the missing fields taken from [`Configuration::default`].

use serde::{Deserialize, Serialize};

/// Clinician-specific defaults used to parametrise generated text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Name printed in the sign-off line of every draft.
    pub clinician_name: String,
    pub injection: InjectionPreferences,
    pub conservative_care: ConservativeCarePreferences,
    pub follow_up: FollowUpIntervals,
    pub documentation: DocumentationPreferences,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            clinician_name: "[Clinician]".into(),
            injection: InjectionPreferences::default(),
            conservative_care: ConservativeCarePreferences::default(),
            follow_up: FollowUpIntervals::default(),
            documentation: DocumentationPreferences::default(),
        }
    }
}

/// Medication and technique used for corticosteroid injections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionPreferences {
    pub steroid: String,
    pub steroid_volume: String,
    pub anesthetic: String,
    pub anesthetic_volume: String,
    pub needle: String,
    /// Injection count at one site from which diminishing returns are discussed.
    pub max_per_site: u32,
}

impl Default for InjectionPreferences {
    fn default() -> Self {
        Self {
            steroid: "dexamethasone sodium phosphate 4 mg/mL".into(),
            steroid_volume: "1 mL".into(),
            anesthetic: "1% lidocaine plain".into(),
            anesthetic_volume: "1 mL".into(),
            needle: "25-gauge 1.5-inch".into(),
            max_per_site: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConservativeCarePreferences {
    pub nsaid: String,
    /// Analgesic substituted when an NSAID is contraindicated.
    pub nsaid_alternative: String,
    pub stretching: String,
    pub icing: String,
    pub recovery_sandal: String,
    pub arch_support: String,
}

impl Default for ConservativeCarePreferences {
    fn default() -> Self {
        Self {
            nsaid: "naproxen 500 mg BID with food".into(),
            nsaid_alternative: "acetaminophen 500-1000 mg q6h PRN (max 3 g/day)".into(),
            stretching: "gastrocnemius-soleus and plantar fascia-specific stretching 3x daily"
                .into(),
            icing: "ice massage 15-20 minutes after activity".into(),
            recovery_sandal: "OOFOS".into(),
            arch_support: "Powerstep".into(),
        }
    }
}

/// Named follow-up intervals, one per clinical scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowUpIntervals {
    pub post_injection: String,
    pub routine: String,
    pub chronic: String,
    pub post_epat: String,
    pub wound_routine: String,
    pub wound_infected: String,
    pub diabetic_low_risk: String,
    pub diabetic_moderate_risk: String,
    pub diabetic_high_risk: String,
}

impl Default for FollowUpIntervals {
    fn default() -> Self {
        Self {
            post_injection: "3-4 weeks".into(),
            routine: "4-6 weeks".into(),
            chronic: "2-3 weeks".into(),
            post_epat: "1 week".into(),
            wound_routine: "1 week".into(),
            wound_infected: "2-3 days".into(),
            diabetic_low_risk: "12 months".into(),
            diabetic_moderate_risk: "6 months".into(),
            diabetic_high_risk: "2-3 months".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationPreferences {
    /// Spell out risks and alternatives in consent text rather than a one-line attestation.
    pub detailed_consent: bool,
    pub include_billing_codes: bool,
    /// Adds patient-education sections to evaluation notes.
    pub verbose: bool,
}

impl Default for DocumentationPreferences {
    fn default() -> Self {
        Self {
            detailed_consent: true,
            include_billing_codes: true,
            verbose: false,
        }
    }
}
