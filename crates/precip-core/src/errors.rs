//! Structured error types shared across the precipitation crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PrecipError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (phase names, species, step widths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the simulator.
///
/// Setup failures are fatal. No variant is ever downgraded to a default
/// value: a run either starts from genuine equilibrium data or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PrecipError {
    /// The thermodynamic backend could not produce a result.
    #[error("oracle error: {0}")]
    Oracle(ErrorInfo),
    /// A required phase is absent or not stable at the requested conditions.
    #[error("phase instability: {0}")]
    PhaseInstability(ErrorInfo),
    /// A finite-difference step for a chemical potential slope collapsed.
    #[error("degenerate step: {0}")]
    DegenerateStep(ErrorInfo),
    /// Configuration values are malformed or inconsistent.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and artefact IO errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PrecipError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PrecipError::Oracle(info)
            | PrecipError::PhaseInstability(info)
            | PrecipError::DegenerateStep(info)
            | PrecipError::Config(info)
            | PrecipError::Serde(info) => info,
        }
    }

    /// Shorthand for a configuration error.
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        PrecipError::Config(ErrorInfo::new(code, message))
    }

    /// Wraps an IO or encoding failure as a serde error tagged with a path.
    pub fn serde_at(code: &str, err: impl ToString, path: &std::path::Path) -> Self {
        PrecipError::Serde(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
