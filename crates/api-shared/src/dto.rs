//! Request and response bodies.
//!
//! Engine types that carry no OpenAPI schema (facts, configuration) are exposed as opaque JSON
//! objects.

use chrono::{DateTime, Utc};
use mdm_core::{registry, ConditionDefinition, Draft, InputMode, Suggestion};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Number of registered conditions.
    pub conditions: usize,
    pub checked_at: DateTime<Utc>,
}

/// One row of the condition catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConditionRes {
    pub id: String,
    pub alias: String,
    pub name: String,
    pub billing_code: String,
}

impl From<&ConditionDefinition> for ConditionRes {
    fn from(condition: &ConditionDefinition) -> Self {
        Self {
            id: condition.id.to_string(),
            alias: condition.alias.to_string(),
            name: condition.name.to_string(),
            billing_code: condition.billing_code.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListConditionsRes {
    pub conditions: Vec<ConditionRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuggestionRes {
    pub alias: String,
    pub name: String,
    pub billing_code: String,
}

impl From<Suggestion> for SuggestionRes {
    fn from(s: Suggestion) -> Self {
        Self {
            alias: s.alias,
            name: s.name,
            billing_code: s.billing_code,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionsRes {
    pub suggestions: Vec<SuggestionRes>,
}

/// How the draft input should be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DraftMode {
    #[default]
    FreeText,
    Command,
}

impl From<DraftMode> for InputMode {
    fn from(mode: DraftMode) -> Self {
        match mode {
            DraftMode::FreeText => InputMode::FreeText,
            DraftMode::Command => InputMode::Command,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftReq {
    /// Free text or a `.alias [modifier]*` command line.
    pub text: String,
    #[serde(default)]
    pub mode: DraftMode,
    /// Partial preferences merged over the server's configuration for this request only.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub preferences: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftRes {
    pub condition: ConditionRes,
    pub laterality: Option<String>,
    pub document: String,
    /// Structured facts the document was generated from.
    #[schema(value_type = Object)]
    pub facts: Value,
    pub generated_at: DateTime<Utc>,
}

impl DraftRes {
    /// Builds the response body for a successful draft.
    pub fn from_draft(draft: Draft) -> Self {
        let alias = registry::by_id(draft.condition.id).map_or("", |c| c.alias);
        Self {
            condition: ConditionRes {
                id: draft.condition.id.to_string(),
                alias: alias.to_string(),
                name: draft.condition.name,
                billing_code: draft.condition.billing_code,
            },
            laterality: draft.laterality.map(|l| l.to_string()),
            document: draft.document.into_inner(),
            facts: serde_json::to_value(&draft.facts).unwrap_or(Value::Null),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FactsReq {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FactsRes {
    #[schema(value_type = Object)]
    pub facts: Value,
}

/// Error body. `suggestions` is populated for unknown commands.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<SuggestionRes>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            suggestions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdm_core::NoteEngine;

    #[test]
    fn test_draft_req_defaults_to_free_text() {
        let req: DraftReq = serde_json::from_str(r#"{"text":"left heel pain"}"#).unwrap();
        assert_eq!(req.mode, DraftMode::FreeText);
        assert!(req.preferences.is_none());
        assert_eq!(InputMode::from(req.mode), InputMode::FreeText);
    }

    #[test]
    fn test_draft_res_carries_condition_and_facts() {
        let draft = NoteEngine::default()
            .draft(".hv r hva32", InputMode::Command)
            .unwrap();
        let res = DraftRes::from_draft(draft);

        assert_eq!(res.condition.id, "hallux-valgus");
        assert_eq!(res.condition.alias, ".hv");
        assert_eq!(res.laterality.as_deref(), Some("right"));
        assert_eq!(res.facts["values"]["hva"], "32");
    }

    #[test]
    fn test_error_res_omits_empty_suggestions() {
        let json = serde_json::to_string(&ErrorRes::new("no condition detected")).unwrap();
        assert_eq!(json, r#"{"error":"no condition detected"}"#);
    }
}
