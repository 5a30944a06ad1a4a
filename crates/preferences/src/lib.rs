//! Clinician preference documents.
//!
//! This crate is the boundary between persisted preferences and the engine's
//! [`Configuration`]:
//! - YAML (or JSON, which YAML accepts) preference files, parsed with field-path errors
//! - rendering the effective configuration back to YAML
//! - request-level JSON overrides merged over a base configuration
//!
//! Documents are overlaid on the defaults one field at a time, so a preferences file only needs
//! the values a clinician has changed. In a file, an unknown key or a wrongly typed value is
//! logged and skipped while the remaining fields still apply; request overrides reject them.

use std::fs;
use std::path::Path;

use mdm_core::Configuration;
use serde_json::{Map, Value};

/// Errors returned by the `preferences` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`PreferencesError`].
pub type PreferencesResult<T> = Result<T, PreferencesError>;

fn field_path(path: String) -> String {
    if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    }
}

/// Preference document operations.
///
/// Zero-sized namespace; all methods are associated functions.
pub struct Preferences;

impl Preferences {
    /// Parse a preferences document.
    ///
    /// Each field is checked on its own with `serde_path_to_error`. A field that is unknown or
    /// does not fit the schema is logged at `warn` with its path, for example
    /// `injection.max_per_site`, and the default is kept.
    ///
    /// # Arguments
    ///
    /// * `text` - YAML or JSON mapping shaped like [`Configuration`].
    ///
    /// # Returns
    ///
    /// The configuration with unspecified or rejected fields taken from the defaults. An empty
    /// document yields [`Configuration::default`].
    ///
    /// # Errors
    ///
    /// - [`PreferencesError::InvalidYaml`] if the text is not well-formed YAML.
    /// - [`PreferencesError::InvalidInput`] if the document is not a mapping.
    pub fn parse(text: &str) -> PreferencesResult<Configuration> {
        if text.trim().is_empty() {
            return Ok(Configuration::default());
        }
        let document: serde_yaml::Value = serde_yaml::from_str(text)?;
        if document.is_null() {
            return Ok(Configuration::default());
        }
        let document = serde_json::to_value(document)?;
        let Value::Object(fields) = document else {
            return Err(PreferencesError::InvalidInput(
                "preferences document must be a mapping".into(),
            ));
        };
        overlay(&Configuration::default(), &fields, Fields::Lenient)
    }

    /// Render a configuration as a complete YAML document.
    pub fn render(config: &Configuration) -> PreferencesResult<String> {
        serde_yaml::to_string(config).map_err(|e| {
            PreferencesError::Translation(format!("Failed to serialize preferences: {e}"))
        })
    }

    /// Read and parse a preferences file.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::Io`] if the file cannot be read, otherwise as [`Self::parse`].
    pub fn load(path: &Path) -> PreferencesResult<Configuration> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Write the configuration to `path` as YAML.
    pub fn save(path: &Path, config: &Configuration) -> PreferencesResult<()> {
        let yaml = Self::render(config)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Load `path` if given, falling back to the defaults when it is absent or unreadable.
    ///
    /// A file that fails to load is logged and ignored; drafting should not stop because of a
    /// broken preferences file.
    pub fn load_or_default(path: Option<&Path>) -> Configuration {
        let Some(path) = path else {
            return Configuration::default();
        };
        match Self::load(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded preferences");
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "using default preferences");
                Configuration::default()
            }
        }
    }

    /// Merge a partial JSON object over `base`.
    ///
    /// Nested objects merge key by key; any other value replaces the base value outright.
    ///
    /// # Arguments
    ///
    /// * `base` - The configuration to start from. Not modified.
    /// * `overrides` - A JSON object shaped like a subset of [`Configuration`].
    ///
    /// # Errors
    ///
    /// - [`PreferencesError::InvalidInput`] if `overrides` is not an object.
    /// - [`PreferencesError::Translation`] naming the first field that is unknown or does not
    ///   fit the schema.
    pub fn merge_overrides(
        base: &Configuration,
        overrides: &Value,
    ) -> PreferencesResult<Configuration> {
        let Value::Object(fields) = overrides else {
            return Err(PreferencesError::InvalidInput(
                "preference overrides must be a JSON object".into(),
            ));
        };
        overlay(base, fields, Fields::Strict)
    }
}

/// What to do with a field that is unknown or does not fit the schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fields {
    /// Log it and keep the base value.
    Lenient,
    /// Fail the whole merge.
    Strict,
}

fn overlay(
    base: &Configuration,
    fields: &Map<String, Value>,
    mode: Fields,
) -> PreferencesResult<Configuration> {
    let mut merged = serde_json::to_value(base)?;
    overlay_fields(&mut merged, fields, &mut Vec::new(), mode)?;

    serde_path_to_error::deserialize::<_, Configuration>(merged).map_err(|err| {
        let path = field_path(err.path().to_string());
        let source = err.into_inner();
        PreferencesError::Translation(format!("Preferences schema mismatch at {path}: {source}"))
    })
}

/// Applies `fields` to `root` one leaf at a time, keeping a leaf only if the whole tree still
/// deserializes.
fn overlay_fields(
    root: &mut Value,
    fields: &Map<String, Value>,
    path: &mut Vec<String>,
    mode: Fields,
) -> PreferencesResult<()> {
    for (key, value) in fields {
        path.push(key.clone());
        let pointer = json_pointer(path);

        match (root.pointer(&pointer).map(Value::is_object), value) {
            (None, _) => reject(mode, path, "unknown field")?,
            (Some(true), Value::Object(nested)) => overlay_fields(root, nested, path, mode)?,
            (Some(_), _) => {
                let mut candidate = root.clone();
                if let Some(slot) = candidate.pointer_mut(&pointer) {
                    *slot = value.clone();
                }
                match serde_path_to_error::deserialize::<_, Configuration>(&candidate) {
                    Ok(_) => *root = candidate,
                    Err(err) => reject(mode, path, &err.into_inner().to_string())?,
                }
            }
        }

        path.pop();
    }
    Ok(())
}

fn reject(mode: Fields, path: &[String], reason: &str) -> PreferencesResult<()> {
    let field = path.join(".");
    match mode {
        Fields::Lenient => {
            tracing::warn!(field = %field, reason = %reason, "ignoring preference");
            Ok(())
        }
        Fields::Strict => Err(PreferencesError::Translation(format!(
            "Preference override mismatch at {field}: {reason}"
        ))),
    }
}

fn json_pointer(path: &[String]) -> String {
    path.iter()
        .map(|key| format!("/{}", key.replace('~', "~0").replace('/', "~1")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
clinician_name: Dr Rivera
follow_up:
  routine: 6 weeks
documentation:
  verbose: true
"#;
        let config = Preferences::parse(yaml).expect("parse should succeed");

        assert_eq!(config.clinician_name, "Dr Rivera");
        assert_eq!(config.follow_up.routine, "6 weeks");
        assert_eq!(config.follow_up.chronic, Configuration::default().follow_up.chronic);
        assert!(config.documentation.verbose);
    }

    #[test]
    fn test_parse_accepts_json() {
        let config = Preferences::parse(r#"{"injection": {"max_per_site": 2}}"#).unwrap();
        assert_eq!(config.injection.max_per_site, 2);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Preferences::parse("   \n").unwrap(), Configuration::default());
    }

    #[test]
    fn test_unknown_field_keeps_the_rest_of_the_file() {
        let yaml = r#"
clinician_name: Dr Rivera
theme: dark
conservative_care:
  nsaid: meloxicam 15 mg daily
follow_up:
  weekly: 1 week
  routine: 6 weeks
"#;
        let config = Preferences::parse(yaml).unwrap();

        assert_eq!(config.clinician_name, "Dr Rivera");
        assert_eq!(config.conservative_care.nsaid, "meloxicam 15 mg daily");
        assert_eq!(config.follow_up.routine, "6 weeks");
    }

    #[test]
    fn test_wrong_type_skips_only_that_field() {
        let yaml = r#"
clinician_name: Dr Rivera
injection:
  max_per_site: three
  needle: 27-gauge
"#;
        let config = Preferences::parse(yaml).unwrap();

        assert_eq!(config.clinician_name, "Dr Rivera");
        assert_eq!(
            config.injection.max_per_site,
            Configuration::default().injection.max_per_site
        );
        assert_eq!(config.injection.needle, "27-gauge");
    }

    #[test]
    fn test_malformed_yaml_is_a_syntax_error() {
        assert!(matches!(
            Preferences::parse("clinician_name: [unterminated"),
            Err(PreferencesError::InvalidYaml(_))
        ));
        assert!(matches!(
            Preferences::parse("- just\n- a list\n"),
            Err(PreferencesError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_then_load_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.yaml");

        let mut config = Configuration::default();
        config.conservative_care.arch_support = "Superfeet".into();
        Preferences::save(&path, &config).unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_tolerates_broken_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.yaml");
        fs::write(&path, "clinician_name: [unterminated").unwrap();

        assert_eq!(Preferences::load_or_default(Some(&path)), Configuration::default());
        assert_eq!(
            Preferences::load_or_default(Some(&temp.path().join("missing.yaml"))),
            Configuration::default()
        );
        assert_eq!(Preferences::load_or_default(None), Configuration::default());
    }

    #[test]
    fn test_merge_overrides_is_deep() {
        let base = Configuration {
            clinician_name: "Dr Rivera".into(),
            ..Configuration::default()
        };
        let merged = Preferences::merge_overrides(
            &base,
            &json!({"documentation": {"include_billing_codes": false}}),
        )
        .unwrap();

        assert_eq!(merged.clinician_name, "Dr Rivera");
        assert!(!merged.documentation.include_billing_codes);
        assert!(merged.documentation.detailed_consent);
    }

    #[test]
    fn test_merge_overrides_rejects_non_objects_and_bad_fields() {
        let base = Configuration::default();
        assert!(matches!(
            Preferences::merge_overrides(&base, &json!([1, 2])),
            Err(PreferencesError::InvalidInput(_))
        ));
        assert!(matches!(
            Preferences::merge_overrides(&base, &json!({"injection": {"needle": 25}})),
            Err(PreferencesError::Translation(_))
        ));

        let overrides = json!({"injection": {"max_per_site": "lots"}});
        let err = Preferences::merge_overrides(&base, &overrides).unwrap_err();
        assert!(err.to_string().contains("injection.max_per_site"), "{err}");

        let err = Preferences::merge_overrides(&base, &json!({"theme": "dark"})).unwrap_err();
        assert!(err.to_string().contains("theme"), "{err}");
    }
}
