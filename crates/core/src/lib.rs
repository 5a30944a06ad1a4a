//! # MDM Core
//!
//! Clinical note drafting engine for podiatric assessment and plan documentation.
//!
//! The crate turns free text or a short command into a draft note:
//! - [`facts::extract`] derives structured facts (laterality, procedure status, contraindications,
//!   measurements) from prose
//! - [`detector::detect`] scores the text against the [`registry`] and selects a condition
//! - [`command::parse_command`] resolves `.alias [modifier]*` lines without any inference
//! - [`generators`] render the document for the selected condition
//!
//! [`engine::NoteEngine`] wires these together. Everything here is synchronous and pure: the
//! same input and [`config::Configuration`] always produce the same document.
//!
//! **No I/O concerns**: preference files, HTTP servers and the CLI belong in `preferences`,
//! `api-rest` and `cli`.

pub mod command;
pub mod config;
pub mod constants;
pub mod detector;
pub mod engine;
pub mod error;
pub mod facts;
pub mod generators;
pub mod registry;

pub use config::Configuration;
pub use engine::{CommandOutput, DetectedCondition, Draft, FreeTextOutput, InputMode, NoteEngine};
pub use error::{EngineError, EngineResult, Suggestion};
pub use facts::{extract, ParsedFacts};
pub use registry::{ConditionDefinition, ConditionId};
