// crates/colloquy-core/src/core/input.rs
// ============================================================================
// Module: Colloquy Resolved Input
// Description: The per-turn resolved input union consumed by controls.
// Purpose: Define the canonical, NLU-resolved turn event shapes.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Controls never parse raw utterances. The external NLU layer resolves each
//! user turn into one [`ResolvedInput`] shape, and handler predicates match on
//! that union alone. The three shapes cover five recognized inputs: a typed
//! value with optional feedback/action/target, a bare value, a bare yes/no,
//! a spoken ordinal, and a touch/ordinal screen event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionId;
use crate::core::identifiers::CandidateId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::TargetId;
use crate::core::identifiers::TurnId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Slot Values
// ============================================================================

/// A user-supplied value with its entity-resolution outcome.
///
/// # Invariants
/// - `er_match` is true when the value matched a known catalog id, false when
///   it was accepted as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValue {
    /// The resolved value identifier.
    pub value: CandidateId,
    /// Entity-resolution match indicator.
    pub er_match: bool,
}

impl SlotValue {
    /// Creates a slot value that matched a catalog id.
    #[must_use]
    pub fn matched(value: impl Into<CandidateId>) -> Self {
        Self {
            value: value.into(),
            er_match: true,
        }
    }

    /// Creates a free-text slot value with no catalog match.
    #[must_use]
    pub fn free_text(value: impl Into<CandidateId>) -> Self {
        Self {
            value: value.into(),
            er_match: false,
        }
    }
}

// ============================================================================
// SECTION: Feedback
// ============================================================================

/// Bare yes/no feedback resolved by the NLU layer.
///
/// # Invariants
/// - Variants are stable for serialization and transcript matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// The user affirmed ("yes").
    Affirm,
    /// The user disaffirmed ("no").
    Disaffirm,
}

// ============================================================================
// SECTION: Input Shapes
// ============================================================================

/// An utterance-shaped input with optional feedback, action, target, value.
///
/// # Invariants
/// - All fields are optional; handler predicates define which combinations
///   are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceInput {
    /// Optional bare yes/no feedback.
    pub feedback: Option<Feedback>,
    /// Optional action slot id ("set", "change", "add", ...).
    pub action: Option<ActionId>,
    /// Optional target slot id naming the control addressed.
    pub target: Option<TargetId>,
    /// Optional typed or bare value.
    pub value: Option<SlotValue>,
}

impl UtteranceInput {
    /// Returns true when the utterance carries only a value.
    #[must_use]
    pub const fn is_bare_value(&self) -> bool {
        self.value.is_some() && self.feedback.is_none() && self.action.is_none()
    }

    /// Returns true when the utterance carries only feedback.
    #[must_use]
    pub const fn is_bare_feedback(&self) -> bool {
        self.feedback.is_some() && self.value.is_none() && self.action.is_none()
    }
}

/// Canonical resolved input union for one turn.
///
/// # Invariants
/// - Variants are stable for serialization and transcript matching.
/// - Ordinal and selection positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedInput {
    /// An utterance resolved into feedback/action/target/value slots.
    Utterance(UtteranceInput),
    /// A spoken ordinal reference ("the first one").
    Ordinal {
        /// 1-based position within the currently spoken page.
        position: u64,
    },
    /// A touch or ordinal screen event referencing a control.
    Selection {
        /// Control the rendered surface attributed the event to.
        control_id: ControlId,
        /// 1-based position within the full rendered candidate list.
        position: u64,
    },
}

// ============================================================================
// SECTION: Turn Requests
// ============================================================================

/// Canonical turn request consumed by the engine.
///
/// # Invariants
/// - `turn_id` is unique per session; transcript records key on it.
/// - `time` is caller-supplied; the core never reads wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Session identifier.
    pub session_id: SessionId,
    /// Turn identifier for transcript records.
    pub turn_id: TurnId,
    /// Turn timestamp.
    pub time: Timestamp,
    /// Resolved input for this turn.
    pub input: ResolvedInput,
}
