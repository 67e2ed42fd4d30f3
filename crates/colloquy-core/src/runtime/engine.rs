// crates/colloquy-core/src/runtime/engine.rs
// ============================================================================
// Module: Colloquy Turn Engine
// Description: Deterministic turn dispatch, transcript logging, persistence.
// Purpose: Execute one canonical dispatch cycle per turn over a control tree.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The turn engine is the single canonical execution path for Colloquy. Each
//! turn it loads session state, restores every control's snapshot, routes the
//! resolved input to the first control whose probe matches, and, when no
//! initiative act was emitted, offers the initiative to controls in tree
//! order. Execution is strictly single-threaded and turn-synchronous: every
//! collaborator call completes before the next step, no two controls run
//! concurrently within a turn, and there is no cancellation.
//!
//! A turn id that already appears in the transcript is replayed from the
//! recorded acts without re-dispatch, keeping retried deliveries idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::acts::Act;
use crate::core::config::InteractionClaims;
use crate::core::identifiers::ControlId;
use crate::core::input::TurnRequest;
use crate::core::state::TurnRecord;
use crate::core::state::next_seq;
use crate::interfaces::SessionStore;
use crate::interfaces::StoreError;
use crate::runtime::dispatch::Control;
use crate::runtime::dispatch::ControlError;
use crate::runtime::dispatch::HandlerMatch;
use crate::runtime::dispatch::ResponseBuilder;
use crate::runtime::dispatch::StateConsistencyError;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Errors surfaced by the turn engine.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No controls were configured.
    #[error("turn engine requires at least one control")]
    NoControls,
    /// Two controls share the same identifier.
    #[error("duplicate control id: {0}")]
    DuplicateControlId(ControlId),
    /// Control dispatch failed.
    #[error(transparent)]
    Control(#[from] ControlError),
    /// Persisted state disagreed with the control tree.
    #[error(transparent)]
    StateConsistency(#[from] StateConsistencyError),
    /// Session store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Turn Results
// ============================================================================

/// Result of one dispatched turn.
///
/// # Invariants
/// - `acts` contains at most one initiative act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    /// Acts emitted during the turn, in emission order.
    pub acts: Vec<Act>,
    /// Control that handled the input, when any matched.
    pub handled_by: Option<ControlId>,
    /// Control that took the initiative, when any was willing.
    pub initiative_by: Option<ControlId>,
}

// ============================================================================
// SECTION: Turn Engine
// ============================================================================

/// Turn engine owning the control tree and the session store.
pub struct TurnEngine<S> {
    /// Controls in tree order; order is the deterministic arbitration rule.
    controls: Vec<Box<dyn Control>>,
    /// Session store implementation.
    store: S,
}

impl<S> TurnEngine<S>
where
    S: SessionStore,
{
    /// Creates a turn engine over an ordered control tree.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the tree is empty or control ids collide.
    pub fn new(controls: Vec<Box<dyn Control>>, store: S) -> Result<Self, EngineError> {
        if controls.is_empty() {
            return Err(EngineError::NoControls);
        }
        for (index, control) in controls.iter().enumerate() {
            let duplicate = controls
                .iter()
                .skip(index + 1)
                .any(|other| other.control_id() == control.control_id());
            if duplicate {
                return Err(EngineError::DuplicateControlId(control.control_id().clone()));
            }
        }
        Ok(Self {
            controls,
            store,
        })
    }

    /// Dispatches one turn and persists the updated session.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when dispatch, restoration, or persistence
    /// fails; contract violations abort the turn without saving.
    pub fn handle_turn(&mut self, request: &TurnRequest) -> Result<TurnResult, EngineError> {
        let mut session = self.store.load(&request.session_id)?.unwrap_or_default();

        if let Some(record) =
            session.turns.iter().find(|record| record.turn_id == request.turn_id)
        {
            return Ok(replayed_result(record));
        }

        for control in &mut self.controls {
            let snapshot = session.controls.get(control.control_id());
            control.restore_state(snapshot)?;
        }

        let mut builder = ResponseBuilder::new();

        let mut handled_by = None;
        let mut handled_index = None;
        let mut selected: Option<(usize, HandlerMatch)> = None;
        for (index, control) in self.controls.iter().enumerate() {
            if let Some(matched) = control.probe(request)? {
                selected = Some((index, matched));
                break;
            }
        }
        if let Some((index, matched)) = selected {
            self.controls[index].handle(&matched, request, &mut builder)?;
            handled_by = Some(self.controls[index].control_id().clone());
            handled_index = Some(index);
        }

        // The handling control is offered the initiative first; the rest of
        // the tree follows in order.
        let mut initiative_by = None;
        if !builder.has_initiative() {
            let order = initiative_order(self.controls.len(), handled_index);
            let mut willing: Option<(usize, HandlerMatch)> = None;
            for index in order {
                if let Some(matched) = self.controls[index].probe_initiative(request)? {
                    willing = Some((index, matched));
                    break;
                }
            }
            if let Some((index, matched)) = willing {
                self.controls[index].take_initiative(&matched, request, &mut builder)?;
                initiative_by = Some(self.controls[index].control_id().clone());
            }
        }

        let acts = builder.into_acts();

        for control in &self.controls {
            session
                .controls
                .insert(control.control_id().clone(), control.snapshot_state());
        }
        session.turns.push(TurnRecord {
            seq: next_seq(&session.turns),
            turn_id: request.turn_id.clone(),
            time: request.time,
            acts: acts.clone(),
        });
        self.store.save(&request.session_id, &session)?;

        Ok(TurnResult {
            acts,
            handled_by,
            initiative_by,
        })
    }

    /// Exports every control's interaction claims for NLU-schema generation.
    #[must_use]
    pub fn interaction_claims(&self) -> Vec<InteractionClaims> {
        self.controls.iter().map(|control| control.interaction_claims()).collect()
    }

    /// Renders one state-summary line per control for dialogue diagrams.
    #[must_use]
    pub fn stringify_state_for_diagram(&self) -> String {
        self.controls
            .iter()
            .map(|control| control.stringify_state_for_diagram())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the session store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// Returns the initiative probing order: the handling control first, then
/// tree order.
fn initiative_order(count: usize, handled_index: Option<usize>) -> Vec<usize> {
    let mut order = Vec::with_capacity(count);
    if let Some(first) = handled_index {
        order.push(first);
    }
    order.extend((0 .. count).filter(|index| Some(*index) != handled_index));
    order
}

/// Rebuilds a turn result from a recorded transcript entry.
///
/// The handling control is not recorded, so `handled_by` is `None`; the
/// initiative owner is recovered from the recorded acts.
fn replayed_result(record: &TurnRecord) -> TurnResult {
    let initiative_by = record
        .acts
        .iter()
        .find(|act| act.is_initiative())
        .map(|act| act.control_id().clone());
    TurnResult {
        acts: record.acts.clone(),
        handled_by: None,
        initiative_by,
    }
}
