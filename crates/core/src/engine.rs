//! The drafting engine.
//!
//! [`NoteEngine`] ties the extractor, detector, command parser and generators together behind
//! two surfaces:
//! - [`NoteEngine::free_text`] and [`NoteEngine::command`] never fail. Anything the engine cannot
//!   resolve comes back as an empty document, which callers display as "nothing yet".
//! - [`NoteEngine::draft`] is the strict variant used by the CLI and the REST API. It reports why
//!   nothing was produced through [`EngineError`].

use std::sync::Arc;

use mdm_types::{Laterality, NonEmptyText};
use serde::{Deserialize, Serialize};

use crate::command::{command_token, parse_command};
use crate::config::Configuration;
use crate::constants::MIN_FREE_TEXT_CHARS;
use crate::detector::detect;
use crate::error::{EngineError, EngineResult, Suggestion};
use crate::facts::{extract, ParsedFacts};
use crate::registry::{self, ConditionDefinition, ConditionId};

/// How a draft request should be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Prose, classified by the detector.
    #[default]
    FreeText,
    /// A `.alias [modifier]*` line.
    Command,
}

/// Display name and billing code of the condition a document was drafted for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectedCondition {
    pub id: ConditionId,
    pub name: String,
    pub billing_code: String,
}

impl From<&ConditionDefinition> for DetectedCondition {
    fn from(condition: &ConditionDefinition) -> Self {
        Self {
            id: condition.id,
            name: condition.name.to_string(),
            billing_code: condition.billing_code.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FreeTextOutput {
    pub detected: Option<DetectedCondition>,
    pub document: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub detected: Option<DetectedCondition>,
    pub document: String,
    /// Aliases matching the typed prefix. Only populated while the command is unresolved.
    pub suggestions: Vec<Suggestion>,
}

/// A successfully drafted document with the facts it was generated from.
#[derive(Clone, Debug, Serialize)]
pub struct Draft {
    pub condition: DetectedCondition,
    pub laterality: Option<Laterality>,
    pub document: NonEmptyText,
    pub facts: ParsedFacts,
}

/// Stateless drafting service holding the clinician configuration.
#[derive(Clone, Debug)]
pub struct NoteEngine {
    config: Arc<Configuration>,
}

impl Default for NoteEngine {
    fn default() -> Self {
        Self::new(Arc::new(Configuration::default()))
    }
}

impl NoteEngine {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Drafts a document from prose.
    ///
    /// Inputs shorter than the minimum length, or in which no condition is detected, produce an
    /// empty output rather than an error.
    pub fn free_text(&self, text: &str) -> FreeTextOutput {
        if text.trim().chars().count() < MIN_FREE_TEXT_CHARS {
            return FreeTextOutput::default();
        }
        match self.draft_free_text(text) {
            Ok(draft) => FreeTextOutput {
                detected: Some(draft.condition),
                document: draft.document.into_inner(),
            },
            Err(_) => FreeTextOutput::default(),
        }
    }

    /// Drafts a document from a command line.
    ///
    /// An unresolved alias yields an empty document together with the aliases that start with
    /// the typed token, so a partially typed command can be completed.
    pub fn command(&self, line: &str) -> CommandOutput {
        match self.draft_command(line) {
            Ok(draft) => CommandOutput {
                detected: Some(draft.condition),
                document: draft.document.into_inner(),
                suggestions: Vec::new(),
            },
            Err(EngineError::UnknownCommand { suggestions, .. }) => CommandOutput {
                suggestions,
                ..CommandOutput::default()
            },
            Err(_) => CommandOutput::default(),
        }
    }

    /// Drafts a document, reporting why nothing could be drafted.
    ///
    /// # Arguments
    /// * `input` - Free text or a command line, per `mode`.
    /// * `mode` - How to interpret `input`.
    ///
    /// # Returns
    /// The drafted document with its condition and facts.
    ///
    /// # Errors
    /// - `NoConditionDetected` when free text matches no condition.
    /// - `UnknownCommand` when a command alias is not registered, with suggestions for the token.
    pub fn draft(&self, input: &str, mode: InputMode) -> EngineResult<Draft> {
        match mode {
            InputMode::FreeText => self.draft_free_text(input),
            InputMode::Command => self.draft_command(input),
        }
    }

    fn draft_free_text(&self, text: &str) -> EngineResult<Draft> {
        let detection = detect(text).ok_or(EngineError::NoConditionDetected)?;
        let facts = extract(text);
        self.render(detection.condition, facts.laterality, facts)
    }

    fn draft_command(&self, line: &str) -> EngineResult<Draft> {
        match parse_command(line) {
            Some(parsed) => self.render(parsed.condition, parsed.laterality, parsed.facts),
            None => {
                let token = command_token(line).unwrap_or_default().to_string();
                let suggestions = registry::suggest(&token)
                    .into_iter()
                    .map(ConditionDefinition::suggestion)
                    .collect();
                tracing::debug!(token = %token, "unknown command");
                Err(EngineError::UnknownCommand { token, suggestions })
            }
        }
    }

    fn render(
        &self,
        condition: &'static ConditionDefinition,
        laterality: Option<Laterality>,
        facts: ParsedFacts,
    ) -> EngineResult<Draft> {
        let text = condition.generate(&facts, laterality, &self.config);
        let document = NonEmptyText::new(text)
            .map_err(|_| EngineError::EmptyDocument(condition.id.as_str()))?;
        Ok(Draft {
            condition: condition.into(),
            laterality,
            document,
            facts,
        })
    }
}

/// Looks up a condition by id, for callers holding only the serialized id.
pub fn condition(id: ConditionId) -> Option<DetectedCondition> {
    registry::by_id(id).map(DetectedCondition::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> NoteEngine {
        NoteEngine::default()
    }

    #[test]
    fn test_scenario_a_procedure_note() {
        let out = engine().free_text(
            "52 yo female, 4 months left heel pain, first step pain, failed stretching and OTC \
             inserts, gave injection #2 today",
        );

        let detected = out.detected.unwrap();
        assert_eq!(detected.id, ConditionId::PlantarFasciitis);
        assert!(out.document.contains("PROCEDURE:"));
        assert!(out.document.contains("This is injection #2 at this site"));
        assert!(out.document.contains("Prior corticosteroid injection x1"));
        assert!(out.document.contains("x 4 months"));
        assert!(!out.document.contains("MEDICAL DECISION MAKING"));
    }

    #[test]
    fn test_scenario_b_never_injects_achilles() {
        let out = engine()
            .free_text("Achilles tendinopathy, chronic, patient asking about cortisone shot");

        assert_eq!(out.detected.unwrap().id, ConditionId::Achilles);
        assert!(out.document.contains("contraindicated for Achilles tendon pathology"));
        assert!(!out.document.contains("PROCEDURE:"));
    }

    #[test]
    fn test_scenario_c_command() {
        let draft = engine()
            .draft(".pf left chronic +escalate", InputMode::Command)
            .unwrap();

        assert_eq!(draft.condition.id, ConditionId::PlantarFasciitis);
        assert_eq!(draft.laterality, Some(Laterality::Left));
        assert!(draft.facts.findings.chronic);
        assert!(draft.facts.cues.escalate);
    }

    #[test]
    fn test_scenario_d_modifier_25() {
        let out = engine().free_text(
            "diabetic foot exam today, also injected left heel for separate plantar fasciitis",
        );

        assert_eq!(out.detected.unwrap().id, ConditionId::DiabeticFoot);
        assert!(out.document.contains("MODIFIER 25:"));
    }

    #[test]
    fn test_scenario_e_nothing_detected() {
        let out = engine().free_text("patient doing fine, see you next year");
        assert_eq!(out, FreeTextOutput::default());

        let err = engine()
            .draft("patient doing fine, see you next year", InputMode::FreeText)
            .unwrap_err();
        assert_eq!(err, EngineError::NoConditionDetected);
    }

    #[test]
    fn test_short_free_text_is_ignored() {
        assert_eq!(engine().free_text("heel pain"), FreeTextOutput::default());
    }

    #[test]
    fn test_unresolved_command_offers_suggestions() {
        let out = engine().command(".h");
        assert!(out.document.is_empty());
        let aliases: Vec<&str> = out.suggestions.iter().map(|s| s.alias.as_str()).collect();
        assert_eq!(aliases, vec![".hr", ".hv", ".ht"]);

        let out = engine().command(".hv r");
        assert!(out.suggestions.is_empty());
        assert!(!out.document.is_empty());
    }

    #[test]
    fn test_strict_unknown_command() {
        let err = engine().draft(".zz left", InputMode::Command).unwrap_err();
        match err {
            EngineError::UnknownCommand { token, suggestions } => {
                assert_eq!(token, ".zz");
                assert!(suggestions.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_configuration_flows_into_documents() {
        let config = Configuration {
            clinician_name: "Dr Rivera".into(),
            ..Configuration::default()
        };
        let engine = NoteEngine::new(Arc::new(config));
        let out = engine.command(".pf left");
        assert!(out.document.contains("Dr Rivera - draft for clinician review"));
    }

    #[test]
    fn test_condition_lookup() {
        let found = condition(ConditionId::Hammertoe).unwrap();
        assert_eq!(found.billing_code, "M20.40");
    }

    #[test]
    fn test_input_mode_serde() {
        let mode: InputMode = serde_json::from_str("\"command\"").unwrap();
        assert_eq!(mode, InputMode::Command);
        assert_eq!(InputMode::default(), InputMode::FreeText);
    }
}
