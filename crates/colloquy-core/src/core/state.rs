// crates/colloquy-core/src/core/state.rs
// ============================================================================
// Module: Colloquy Control State
// Description: Per-control persisted state and session transcript records.
// Purpose: Capture deterministic dialogue state for persistence and replay.
// Dependencies: crate::core::{acts, identifiers, input, time}, serde
// ============================================================================

//! ## Overview
//! Control state is the unit of persistence between turns: it is created
//! empty on first use, mutated only inside `handle`/`take_initiative`, and
//! reset only by an explicit clear. The session holds one state per control
//! plus an append-only turn transcript.
//!
//! `last_initiative` exists so a bare "yes"/"no" or a mapped bare value on
//! the next turn can be interpreted against the question that was actually
//! asked; stale values would misread unrelated replies as confirmations, so
//! it is cleared or replaced whenever the turn it refers to is resolved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::acts::Act;
use crate::core::identifiers::CandidateId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::TurnId;
use crate::core::input::SlotValue;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Elicitation Actions
// ============================================================================

/// The intent of the most recent elicitation.
///
/// # Invariants
/// - Variants are stable for serialization and transcript matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElicitationAction {
    /// The control asked for a value to set.
    #[default]
    Set,
    /// The control asked for a replacement value.
    Change,
    /// The control asked for a value to add.
    Add,
    /// The control asked for a value to remove.
    Remove,
}

// ============================================================================
// SECTION: Last Initiative
// ============================================================================

/// Name and payload of the most recently issued initiative act.
///
/// # Invariants
/// - Cleared or replaced whenever the turn it refers to is resolved by
///   affirmation, disaffirmation, or a superseding initiative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastInitiative {
    /// A `RequestValue` question is pending.
    RequestValue,
    /// A `RequestChangedValue` question is pending.
    RequestChangedValue,
    /// A `RequestRemovedValue` question is pending.
    RequestRemovedValue,
    /// A `ConfirmValue` question is pending for these values.
    ConfirmValue {
        /// Values offered for confirmation.
        values: Vec<CandidateId>,
    },
}

// ============================================================================
// SECTION: Single-Value State
// ============================================================================

/// Persisted state for the single-value acquisition control.
///
/// # Invariants
/// - `previous_value` records the value replaced by the most recent set.
/// - `confirmed` is reset to false whenever the value changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueControlState {
    /// Currently held value, if any.
    pub value: Option<SlotValue>,
    /// Value held before the most recent set.
    pub previous_value: Option<SlotValue>,
    /// Whether the held value has been confirmed.
    pub confirmed: bool,
    /// Intent of the most recent elicitation.
    pub elicitation: Option<ElicitationAction>,
    /// Pagination cursor over the spoken candidate pages.
    pub spoken_page_index: u64,
    /// Most recently issued initiative, pending a reply.
    pub last_initiative: Option<LastInitiative>,
}

impl ValueControlState {
    /// Stores a value, recording the replaced value and resetting confirmation.
    pub fn set_value(&mut self, value: SlotValue) {
        self.previous_value = self.value.take();
        self.value = Some(value);
        self.confirmed = false;
    }

    /// Resets the state to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// SECTION: Multi-Value State
// ============================================================================

/// One held entry of a multi-value control.
///
/// # Invariants
/// - Duplicate ids are permitted; aggregation is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueEntry {
    /// Candidate identifier.
    pub id: CandidateId,
    /// Whether this entry has been confirmed.
    pub confirmed: bool,
    /// Entity-resolution match indicator recorded at acceptance.
    pub er_match: bool,
}

impl ValueEntry {
    /// Creates an unconfirmed entry from an accepted slot value.
    #[must_use]
    pub fn unconfirmed(value: SlotValue) -> Self {
        Self {
            id: value.value,
            confirmed: false,
            er_match: value.er_match,
        }
    }
}

/// Persisted state for the multi-value acquisition control.
///
/// # Invariants
/// - Entry order is acceptance order and is stable across turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListControlState {
    /// Held entries in acceptance order.
    pub values: Vec<ValueEntry>,
    /// Intent of the most recent elicitation.
    pub elicitation: Option<ElicitationAction>,
    /// Pagination cursor over the spoken candidate pages.
    pub spoken_page_index: u64,
    /// Most recently issued initiative, pending a reply.
    pub last_initiative: Option<LastInitiative>,
}

impl ListControlState {
    /// Returns the ids of entries not yet confirmed, in acceptance order.
    #[must_use]
    pub fn unconfirmed_ids(&self) -> Vec<CandidateId> {
        self.values
            .iter()
            .filter(|entry| !entry.confirmed)
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Returns the ids of all held entries, in acceptance order.
    #[must_use]
    pub fn held_ids(&self) -> Vec<CandidateId> {
        self.values.iter().map(|entry| entry.id.clone()).collect()
    }

    /// Resets the state to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// SECTION: Control State Union
// ============================================================================

/// Persisted state union over the built-in control shapes.
///
/// # Invariants
/// - Variants are stable for serialization; a control restored from the wrong
///   variant is a state-consistency defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlState {
    /// Single-value control state.
    Value(ValueControlState),
    /// Multi-value control state.
    List(ListControlState),
}

// ============================================================================
// SECTION: Turn Records
// ============================================================================

/// Transcript record for one completed turn.
///
/// # Invariants
/// - `seq` is monotonic within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Monotonic sequence number assigned by the engine.
    pub seq: u64,
    /// Turn identifier from the request.
    pub turn_id: TurnId,
    /// Turn timestamp from the request.
    pub time: Timestamp,
    /// Acts emitted during the turn, in emission order.
    pub acts: Vec<Act>,
}

/// Returns the next monotonic sequence value for a record log.
#[must_use]
pub fn next_seq(records: &[TurnRecord]) -> u64 {
    records.last().map_or(0, |record| record.seq + 1)
}

// ============================================================================
// SECTION: Session State
// ============================================================================

/// Persisted dialogue session: per-control state plus the turn transcript.
///
/// # Invariants
/// - `controls` is keyed by control id; entries are created on first use.
/// - `turns` is append-only and ordered by `seq`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Per-control persisted state.
    pub controls: BTreeMap<ControlId, ControlState>,
    /// Append-only turn transcript.
    pub turns: Vec<TurnRecord>,
}
