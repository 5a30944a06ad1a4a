use serde::Serialize;

/// An alias offered to the caller when a command could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub alias: String,
    pub name: String,
    pub billing_code: String,
}

/// Soft outcomes of the drafting engine.
///
/// None of these are fatal: the caller recovers by supplying more detail or a different command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no condition detected in input text")]
    NoConditionDetected,
    #[error("unknown command: {token}")]
    UnknownCommand {
        token: String,
        suggestions: Vec<Suggestion>,
    },
    #[error("generator for {0} produced an empty document")]
    EmptyDocument(&'static str),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
