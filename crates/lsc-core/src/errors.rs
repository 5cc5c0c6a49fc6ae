//! Structured error types shared across the compiler crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LscError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (positions, pipe ids, radii, etc.).
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

/// Exhaustive validation outcome: a summary plus every violated invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Summary payload (`code = "structural"`, violation count in context).
    pub summary: ErrorInfo,
    /// Every violation found, in deterministic order.
    pub violations: Vec<ErrorInfo>,
}

impl StructuralReport {
    /// Builds a report from the collected violations.
    pub fn new(violations: Vec<ErrorInfo>) -> Self {
        let summary = ErrorInfo::new("structural", "spacetime graph violates structural invariants")
            .with_context("violations", violations.len().to_string());
        Self {
            summary,
            violations,
        }
    }

    /// Returns true when at least one violation carries the provided code.
    pub fn contains_code(&self, code: &str) -> bool {
        self.violations.iter().any(|info| info.code == code)
    }

    /// Returns the violations carrying the provided code.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ErrorInfo> + 'a {
        self.violations.iter().filter(move |info| info.code == code)
    }
}

impl Display for StructuralReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the compiler pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LscError {
    /// A cube was placed on an occupied lattice position.
    #[error("conflict error: {0}")]
    Conflict(ErrorInfo),
    /// A pipe joins non-adjacent, incompatible, unknown or already joined cubes.
    #[error("adjacency error: {0}")]
    Adjacency(ErrorInfo),
    /// Whole-graph validation failed; carries every violation.
    #[error("structural error: {0}")]
    Structural(StructuralReport),
    /// Degenerate flow system or failed parity validation.
    #[error("algebraic error: {0}")]
    Algebraic(ErrorInfo),
    /// Invalid template generator parameters.
    #[error("template error: {0}")]
    Template(ErrorInfo),
    /// Two adjacent templates disagree on the boundary basis of a pipe.
    #[error("template mismatch error: {0}")]
    TemplateMismatch(ErrorInfo),
    /// Stitching found a gap, an overlap or a moment conflict.
    #[error("stitch error: {0}")]
    Stitch(ErrorInfo),
    /// The detector search radius leaves part of the circuit unchecked.
    #[error("incomplete detector coverage error: {0}")]
    IncompleteDetectorCoverage(ErrorInfo),
    /// Invalid compilation or pipeline parameters.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl LscError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LscError::Structural(report) => &report.summary,
            LscError::Conflict(info)
            | LscError::Adjacency(info)
            | LscError::Algebraic(info)
            | LscError::Template(info)
            | LscError::TemplateMismatch(info)
            | LscError::Stitch(info)
            | LscError::IncompleteDetectorCoverage(info)
            | LscError::Config(info)
            | LscError::Serde(info) => info,
        }
    }

    /// Returns the stable code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

/// Extension used to attach context to an error while propagating it.
pub trait ContextExt {
    /// Adds a context entry to the error payload.
    fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self;
}

impl ContextExt for LscError {
    fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let info = match &mut self {
            LscError::Structural(report) => &mut report.summary,
            LscError::Conflict(info)
            | LscError::Adjacency(info)
            | LscError::Algebraic(info)
            | LscError::Template(info)
            | LscError::TemplateMismatch(info)
            | LscError::Stitch(info)
            | LscError::IncompleteDetectorCoverage(info)
            | LscError::Config(info)
            | LscError::Serde(info) => info,
        };
        info.context.insert(key.into(), value.to_string());
        self
    }
}
