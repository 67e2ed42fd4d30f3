// crates/colloquy-core/src/interfaces/mod.rs
// ============================================================================
// Module: Colloquy Interfaces
// Description: Collaborator-agnostic interfaces for candidates, validation,
//              prompts, persistence, and turn ingestion.
// Purpose: Define the contract surfaces used by the Colloquy runtime.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Colloquy integrates with the surrounding
//! NLU/interaction layer without embedding its details. Implementations are
//! invoked synchronously once per call with no caching contract: callers must
//! treat every invocation as potentially returning different results from
//! turn to turn. Collaborator failures propagate as-is; the core performs no
//! implicit retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::CandidateId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TurnId;
use crate::core::input::Feedback;
use crate::core::input::SlotValue;
use crate::core::input::TurnRequest;
use crate::core::state::SessionState;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Query Context
// ============================================================================

/// Context provided to candidate sources and validators.
///
/// # Invariants
/// - Identifiers refer to the same session and turn scope.
/// - Values are snapshots; collaborators must not rely on mutating them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Session identifier.
    pub session_id: SessionId,
    /// Control identifier issuing the query.
    pub control_id: ControlId,
    /// Turn identifier.
    pub turn_id: TurnId,
    /// Turn timestamp.
    pub time: Timestamp,
}

// ============================================================================
// SECTION: Candidate Source
// ============================================================================

/// Candidate source errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CandidateError {
    /// Candidate source reported an error.
    #[error("candidate source error: {0}")]
    Source(String),
}

/// Supplies the ordered candidate set for a control.
///
/// The candidate set is a function of current context and is recomputed every
/// turn to honor business-logic-driven changes; controls never cache it.
pub trait CandidateSource {
    /// Computes the ordered candidate list for this turn.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError`] when candidates cannot be computed.
    fn candidates(&self, ctx: &QueryContext) -> Result<Vec<CandidateId>, CandidateError>;
}

// ============================================================================
// SECTION: Value Validators
// ============================================================================

/// Validator verdict for one supplied value.
///
/// # Invariants
/// - `Fail` carries a stable reason code plus a rendered, user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// The value is acceptable.
    Pass,
    /// The value is rejected.
    Fail {
        /// Stable validator reason code.
        reason_code: String,
        /// Human-readable rendered reason.
        rendered_reason: String,
    },
}

/// Validator errors, distinct from rejection verdicts.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Validator reported an error.
    #[error("validator error: {0}")]
    Validator(String),
}

/// Validates a supplied value against externally owned business rules.
pub trait ValueValidator {
    /// Validates one value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when the validator itself fails; rejection
    /// is expressed through [`ValidationVerdict::Fail`], not an error.
    fn validate(
        &self,
        value: &SlotValue,
        ctx: &QueryContext,
    ) -> Result<ValidationVerdict, ValidatorError>;
}

// ============================================================================
// SECTION: Intent Value Mapper
// ============================================================================

/// Maps bare feedback that collides with the managed value space.
///
/// A control accepts the mapped value only while its most recent initiative
/// was a value request; outside that window bare feedback is left unmatched.
pub trait IntentValueMapper {
    /// Maps a bare feedback utterance to a candidate value, when the managed
    /// value space contains a colliding literal.
    fn map_feedback(&self, feedback: Feedback) -> Option<CandidateId>;
}

// ============================================================================
// SECTION: Prompt Source
// ============================================================================

/// Named prompt slots keyed by act kind.
///
/// # Invariants
/// - Variants are stable; they are the keys of the locale resource map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSlot {
    /// Prompt for a stored value.
    ValueSet,
    /// Prompt for a replaced value.
    ValueChanged,
    /// Prompt for appended values.
    ValueAdded,
    /// Prompt for removed values.
    ValueRemoved,
    /// Prompt for a cleared control.
    ValueCleared,
    /// Prompt for a rejected value.
    InvalidValue,
    /// Prompt for a rejected removal target.
    InvalidRemoveValue,
    /// Prompt for an unusable input.
    UnusableInputValue,
    /// Prompt for a confirmed value.
    ValueConfirmed,
    /// Prompt for a disconfirmed value.
    ValueDisconfirmed,
    /// Prompt requesting a value, offering the spoken choices.
    RequestValue,
    /// Prompt requesting a replacement value.
    RequestChangedValue,
    /// Prompt requesting a removal target.
    RequestRemovedValue,
    /// Prompt requesting confirmation of offered values.
    ConfirmValue,
}

/// Prompt resolution request built from one act.
///
/// # Invariants
/// - `values` preserves the act's value/choice order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Prompt slot to resolve.
    pub slot: PromptSlot,
    /// Control that emitted the act.
    pub control_id: ControlId,
    /// Rendered values or choices carried by the act.
    pub values: Vec<String>,
    /// Optional rendered rejection reason.
    pub reason: Option<String>,
}

impl PromptRequest {
    /// Creates a request with no values.
    #[must_use]
    pub const fn new(slot: PromptSlot, control_id: ControlId) -> Self {
        Self {
            slot,
            control_id,
            values: Vec::new(),
            reason: None,
        }
    }

    /// Creates a request carrying values.
    #[must_use]
    pub const fn with_values(slot: PromptSlot, control_id: ControlId, values: Vec<String>) -> Self {
        Self {
            slot,
            control_id,
            values,
            reason: None,
        }
    }

    /// Creates a request carrying values and a rendered reason.
    #[must_use]
    pub const fn with_reason(
        slot: PromptSlot,
        control_id: ControlId,
        values: Vec<String>,
        reason: String,
    ) -> Self {
        Self {
            slot,
            control_id,
            values,
            reason: Some(reason),
        }
    }
}

/// Prompt resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PromptError {
    /// No resource is registered for the requested slot.
    #[error("missing prompt resource: {0}")]
    MissingResource(String),
    /// Prompt source reported an error.
    #[error("prompt source error: {0}")]
    Source(String),
}

/// Resolves prompt requests against a locale-specific resource map.
pub trait PromptSource {
    /// Resolves one prompt request into rendered speech.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] when the slot cannot be resolved.
    fn resolve(&self, request: &PromptRequest) -> Result<String, PromptError>;
}

// ============================================================================
// SECTION: Session Store
// ============================================================================

/// Session store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("session store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("session store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("session store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("session store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("session store error: {0}")]
    Store(String),
}

/// Session state store for persistence between turns.
pub trait SessionStore {
    /// Loads session state by session identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError>;

    /// Saves session state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, session_id: &SessionId, state: &SessionState) -> Result<(), StoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Turn Sources
// ============================================================================

/// Turn source for push-mode ingestion.
pub trait TurnSource {
    /// Returns the next available turn request, if any.
    fn next_turn(&mut self) -> Option<TurnRequest>;
}
