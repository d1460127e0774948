//! Error types for `handcricket`
//!
//! The engine distinguishes rejections (bad input, wrong phase, ineligible
//! selection — the match continues unchanged) from invariant violations
//! (internal inconsistencies that abort a single match). Nothing in the
//! engine is globally fatal.

use thiserror::Error;

use crate::engine::types::{GroupId, PlayerId, Role};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `handcricket` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Engine error (invariant violation surfaced to the CLI)
    pub const ENGINE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `handcricket` operations.
///
/// Aggregates all domain-specific errors and provides a unified
/// interface for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum HandCricketError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Match engine error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HandCricketError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Engine(_) => ExitCode::ENGINE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: std::path::PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: std::path::PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Duration string could not be parsed
    #[error("invalid duration for '{field}': {message}")]
    InvalidDuration {
        /// Name of the duration field
        field: String,
        /// Error message from the duration parser
        message: String,
    },
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Match engine errors.
///
/// The first three variants are rejections: the offending input is refused
/// and the match state is left untouched. `InvariantViolation` is internal
/// and aborts only the affected match, never the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Out-of-range digit, wrong sender, or input while not awaiting that role
    #[error("invalid input from {sender}: {reason}")]
    InvalidInput {
        /// Who sent the offending input
        sender: PlayerId,
        /// Why it was refused
        reason: String,
    },

    /// Command valid in form but issued in the wrong phase
    #[error("command not valid in phase {phase}: {command}")]
    PhaseViolation {
        /// Name of the current phase
        phase: &'static str,
        /// The command that was refused
        command: &'static str,
    },

    /// Batter already used, or bowler last-over / suspended
    #[error("selection of {player} rejected: {reason}")]
    SelectionViolation {
        /// The ineligible player
        player: PlayerId,
        /// Why the selection was refused
        reason: String,
    },

    /// No match is registered for the addressed group
    #[error("no active match for this group")]
    NoActiveMatch,

    /// A second match was requested for a group that already has one
    #[error("a match is already active for group {group}")]
    MatchAlreadyActive {
        /// The busy group
        group: GroupId,
    },

    /// Internal inconsistency — aborts the affected match only
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    /// Returns `true` when the error is a plain rejection the awaited role
    /// can recover from by resubmitting.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::PhaseViolation { .. }
                | Self::SelectionViolation { .. }
        )
    }

    /// Builds an `InvalidInput` for a digit outside the role's domain.
    #[must_use]
    pub fn out_of_range(sender: PlayerId, role: Role, digit: u8) -> Self {
        let domain = match role {
            Role::Batter => "0-6",
            Role::Bowler => "1-6",
        };
        Self::InvalidInput {
            sender,
            reason: format!("{digit} outside {domain}"),
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `handcricket` operations.
pub type Result<T> = std::result::Result<T, HandCricketError>;

// ============================================================================
// Tests
// ============================================================================
