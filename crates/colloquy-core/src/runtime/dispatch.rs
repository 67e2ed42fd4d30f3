// crates/colloquy-core/src/runtime/dispatch.rs
// ============================================================================
// Module: Colloquy Dispatch Protocol
// Description: Two-phase control dispatch, handler tables, and response building.
// Purpose: Enforce the probe/handle contract and the one-initiative invariant.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! Each control runs one dispatch cycle per turn: `probe` selects at most one
//! input handler, `handle` applies it, and when no initiative act was emitted,
//! `probe_initiative`/`take_initiative` run the same paired discipline over
//! the initiative handlers.
//!
//! `probe` is pure with respect to persisted state and returns an explicit
//! [`HandlerMatch`] token instead of recording a hidden selected-handler
//! reference; `handle` re-resolves the token and re-checks its predicate, so
//! a stale or foreign token is a contract violation. Two simultaneously
//! matching input handlers are a logic defect and are surfaced as an error,
//! never resolved silently by first-match. Initiative handlers are different:
//! their conditions are not mutually exclusive, so they are checked
//! sequentially in declaration order and the first willing handler wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::acts::Act;
use crate::core::acts::ContentAct;
use crate::core::acts::InitiativeAct;
use crate::core::config::InteractionClaims;
use crate::core::identifiers::ControlId;
use crate::core::input::TurnRequest;
use crate::core::state::ControlState;
use crate::interfaces::CandidateError;
use crate::interfaces::ValidatorError;

// ============================================================================
// SECTION: Dispatch Phases
// ============================================================================

/// Dispatch phase a handler match belongs to.
///
/// # Invariants
/// - Variants are stable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    /// Input-handling phase.
    Handle,
    /// Initiative phase.
    Initiative,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handle => f.write_str("handle"),
            Self::Initiative => f.write_str("initiative"),
        }
    }
}

// ============================================================================
// SECTION: Handler Matches
// ============================================================================

/// Explicit matched-case token returned by `probe` and consumed by `handle`.
///
/// # Invariants
/// - Tokens are only valid for the control and phase that produced them, on
///   the same turn; `handle`/`take_initiative` verify both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMatch {
    /// Control the token was issued by.
    pub control_id: ControlId,
    /// Phase the token was issued for.
    pub phase: DispatchPhase,
    /// Name of the matched handler.
    pub handler: &'static str,
}

// ============================================================================
// SECTION: Contract Violations
// ============================================================================

/// Programming/contract violations in the control tree.
///
/// These indicate a misconfigured control tree and must abort the turn; they
/// are never retried.
#[derive(Debug, Error)]
pub enum ContractViolation {
    /// `handle` was invoked with a token whose predicate no longer matches.
    #[error("handle invoked without a matching probe: {control_id}/{handler}")]
    HandleWithoutMatch {
        /// Control that rejected the token.
        control_id: ControlId,
        /// Handler named by the token.
        handler: &'static str,
    },
    /// A token named a handler the control does not define.
    #[error("unknown handler {handler} for control {control_id}")]
    UnknownHandler {
        /// Control that rejected the token.
        control_id: ControlId,
        /// Handler named by the token.
        handler: &'static str,
    },
    /// A token was issued by a different control.
    #[error("handler token for {actual} passed to control {expected}")]
    ForeignMatch {
        /// Control the token was passed to.
        expected: ControlId,
        /// Control the token was issued by.
        actual: ControlId,
    },
    /// A token was issued for the other dispatch phase.
    #[error("handler token for phase {actual} used in phase {expected}: {control_id}")]
    PhaseMismatch {
        /// Control that rejected the token.
        control_id: ControlId,
        /// Phase the token was used in.
        expected: DispatchPhase,
        /// Phase the token was issued for.
        actual: DispatchPhase,
    },
    /// More than one input handler matched the same input.
    #[error("ambiguous input handlers {first} and {second} for control {control_id}")]
    AmbiguousMatch {
        /// Control with the ambiguous handler table.
        control_id: ControlId,
        /// First matching handler.
        first: &'static str,
        /// Second matching handler.
        second: &'static str,
    },
    /// A change flow ran with no value to change from.
    #[error("change requested with no previous value: {control_id}")]
    MissingPreviousValue {
        /// Control with the defective flow.
        control_id: ControlId,
    },
    /// A confirmation was requested with no held value.
    #[error("confirmation requested with no held value: {control_id}")]
    MissingHeldValue {
        /// Control with the defective flow.
        control_id: ControlId,
    },
    /// A second initiative act was appended within one turn.
    #[error("initiative act already taken this turn: {control_id}")]
    DuplicateInitiative {
        /// Control that attempted the second initiative.
        control_id: ControlId,
    },
}

// ============================================================================
// SECTION: State Consistency Errors
// ============================================================================

/// Fatal disagreements between persisted or rendered state and the engine.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StateConsistencyError {
    /// A screen selection referenced a position outside the full candidate list.
    #[error(
        "screen selection position {position} outside candidate list of {available}: {control_id}"
    )]
    SelectionOutOfRange {
        /// Control the stale surface referenced.
        control_id: ControlId,
        /// 1-based position from the screen event.
        position: u64,
        /// Number of candidates available this turn.
        available: u64,
    },
    /// A persisted snapshot held the wrong state kind for the control.
    #[error("persisted state kind does not match control: {control_id}")]
    StateKindMismatch {
        /// Control that rejected the snapshot.
        control_id: ControlId,
    },
}

// ============================================================================
// SECTION: Control Errors
// ============================================================================

/// Errors surfaced by control dispatch.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Programming/contract violation; fatal and non-retryable.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// Rendered or persisted state disagrees with the engine; fatal.
    #[error(transparent)]
    StateConsistency(#[from] StateConsistencyError),
    /// Candidate source failure, propagated as-is.
    #[error(transparent)]
    Candidate(#[from] CandidateError),
    /// Validator failure, propagated as-is.
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

// ============================================================================
// SECTION: Response Builder
// ============================================================================

/// Accumulates the acts emitted during one turn.
///
/// # Invariants
/// - At most one initiative act per turn; a second insertion is a contract
///   violation surfaced to the caller.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    /// Acts in emission order.
    acts: Vec<Act>,
    /// Whether an initiative act has been appended.
    initiative_taken: bool,
}

impl ResponseBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            acts: Vec::new(),
            initiative_taken: false,
        }
    }

    /// Appends a content act.
    pub fn add_content(&mut self, act: ContentAct) {
        self.acts.push(Act::Content(act));
    }

    /// Appends the turn's single initiative act.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::DuplicateInitiative`] when an initiative
    /// act was already appended this turn.
    pub fn add_initiative(&mut self, act: InitiativeAct) -> Result<(), ContractViolation> {
        if self.initiative_taken {
            return Err(ContractViolation::DuplicateInitiative {
                control_id: act.control_id().clone(),
            });
        }
        self.initiative_taken = true;
        self.acts.push(Act::Initiative(act));
        Ok(())
    }

    /// Returns true when an initiative act has been appended.
    #[must_use]
    pub const fn has_initiative(&self) -> bool {
        self.initiative_taken
    }

    /// Returns the acts appended so far, in emission order.
    #[must_use]
    pub fn acts(&self) -> &[Act] {
        &self.acts
    }

    /// Consumes the builder and returns the acts in emission order.
    #[must_use]
    pub fn into_acts(self) -> Vec<Act> {
        self.acts
    }
}

// ============================================================================
// SECTION: Handler Tables
// ============================================================================

/// One input-handler entry: a named predicate/apply pair.
///
/// Tables are static ordered arrays per control type plus an injected
/// extension array evaluated after the built-ins.
pub struct InputHandler<C> {
    /// Stable handler name carried on match tokens.
    pub name: &'static str,
    /// Pure shape/state predicate.
    pub matches: fn(&C, &TurnRequest) -> bool,
    /// State-mutating application.
    pub apply: fn(&mut C, &TurnRequest, &mut ResponseBuilder) -> Result<(), ControlError>,
}

/// One initiative-handler entry: a named wants/take pair.
///
/// Entries are checked sequentially in declaration order; the first willing
/// entry wins and lower-priority conditions are not evaluated.
pub struct InitiativeHandler<C> {
    /// Stable handler name carried on match tokens.
    pub name: &'static str,
    /// Willingness predicate; may invoke external validators.
    pub wants: fn(&C, &TurnRequest) -> Result<bool, ControlError>,
    /// State-mutating initiative emission.
    pub take: fn(&mut C, &TurnRequest, &mut ResponseBuilder) -> Result<(), ControlError>,
}

/// Selects the single matching input handler, if any.
///
/// # Errors
///
/// Returns [`ContractViolation::AmbiguousMatch`] when two handlers match.
pub fn select_input_handler<C>(
    control_id: &ControlId,
    builtins: &[InputHandler<C>],
    extensions: &[InputHandler<C>],
    control: &C,
    request: &TurnRequest,
) -> Result<Option<HandlerMatch>, ContractViolation> {
    let mut selected: Option<&'static str> = None;
    for handler in builtins.iter().chain(extensions) {
        if !(handler.matches)(control, request) {
            continue;
        }
        if let Some(first) = selected {
            return Err(ContractViolation::AmbiguousMatch {
                control_id: control_id.clone(),
                first,
                second: handler.name,
            });
        }
        selected = Some(handler.name);
    }
    Ok(selected.map(|handler| HandlerMatch {
        control_id: control_id.clone(),
        phase: DispatchPhase::Handle,
        handler,
    }))
}

/// Selects the first willing initiative handler, if any.
///
/// # Errors
///
/// Propagates collaborator failures raised by willingness predicates.
pub fn select_initiative_handler<C>(
    control_id: &ControlId,
    handlers: &[InitiativeHandler<C>],
    control: &C,
    request: &TurnRequest,
) -> Result<Option<HandlerMatch>, ControlError> {
    for handler in handlers {
        if (handler.wants)(control, request)? {
            return Ok(Some(HandlerMatch {
                control_id: control_id.clone(),
                phase: DispatchPhase::Initiative,
                handler: handler.name,
            }));
        }
    }
    Ok(None)
}

/// Verifies a token's control and phase before resolution.
fn verify_token(
    control_id: &ControlId,
    phase: DispatchPhase,
    matched: &HandlerMatch,
) -> Result<(), ContractViolation> {
    if matched.control_id != *control_id {
        return Err(ContractViolation::ForeignMatch {
            expected: control_id.clone(),
            actual: matched.control_id.clone(),
        });
    }
    if matched.phase != phase {
        return Err(ContractViolation::PhaseMismatch {
            control_id: control_id.clone(),
            expected: phase,
            actual: matched.phase,
        });
    }
    Ok(())
}

/// Resolves and re-checks an input-handler token, then applies it.
///
/// # Errors
///
/// Returns a [`ContractViolation`] for stale, foreign, or unknown tokens and
/// propagates handler failures.
pub fn apply_input_handler<C>(
    control_id: &ControlId,
    builtins: &[InputHandler<C>],
    extensions: &[InputHandler<C>],
    control: &mut C,
    matched: &HandlerMatch,
    request: &TurnRequest,
    builder: &mut ResponseBuilder,
) -> Result<(), ControlError> {
    verify_token(control_id, DispatchPhase::Handle, matched)?;
    let handler = builtins
        .iter()
        .chain(extensions)
        .find(|handler| handler.name == matched.handler)
        .ok_or_else(|| ContractViolation::UnknownHandler {
            control_id: control_id.clone(),
            handler: matched.handler,
        })?;
    if !(handler.matches)(control, request) {
        return Err(ControlError::Contract(ContractViolation::HandleWithoutMatch {
            control_id: control_id.clone(),
            handler: matched.handler,
        }));
    }
    (handler.apply)(control, request, builder)
}

/// Resolves and re-checks an initiative-handler token, then takes it.
///
/// # Errors
///
/// Returns a [`ContractViolation`] for stale, foreign, or unknown tokens and
/// propagates handler failures.
pub fn apply_initiative_handler<C>(
    control_id: &ControlId,
    handlers: &[InitiativeHandler<C>],
    control: &mut C,
    matched: &HandlerMatch,
    request: &TurnRequest,
    builder: &mut ResponseBuilder,
) -> Result<(), ControlError> {
    verify_token(control_id, DispatchPhase::Initiative, matched)?;
    let handler = handlers
        .iter()
        .find(|handler| handler.name == matched.handler)
        .ok_or_else(|| ContractViolation::UnknownHandler {
            control_id: control_id.clone(),
            handler: matched.handler,
        })?;
    if !(handler.wants)(control, request)? {
        return Err(ControlError::Contract(ContractViolation::HandleWithoutMatch {
            control_id: control_id.clone(),
            handler: matched.handler,
        }));
    }
    (handler.take)(control, request, builder)
}

// ============================================================================
// SECTION: Control Trait
// ============================================================================

/// A named, stateful dialogue unit participating in turn dispatch.
///
/// Controls are rebuilt from persisted snapshots at the start of each turn
/// and snapshotted back after dispatch. All methods are turn-synchronous.
pub trait Control {
    /// Returns the control identifier.
    fn control_id(&self) -> &ControlId;

    /// Restores persisted state; `None` restores the empty state.
    ///
    /// # Errors
    ///
    /// Returns [`StateConsistencyError::StateKindMismatch`] when the snapshot
    /// holds the wrong state kind.
    fn restore_state(&mut self, snapshot: Option<&ControlState>)
    -> Result<(), StateConsistencyError>;

    /// Snapshots the control state for persistence.
    fn snapshot_state(&self) -> ControlState;

    /// Probes the input handlers; pure with respect to persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::AmbiguousMatch`] when two handlers match.
    fn probe(&self, request: &TurnRequest) -> Result<Option<HandlerMatch>, ControlError>;

    /// Applies the matched input handler.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] for stale tokens and propagates
    /// handler failures.
    fn handle(
        &mut self,
        matched: &HandlerMatch,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError>;

    /// Probes the initiative handlers in strict priority order.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures raised by willingness predicates.
    fn probe_initiative(&self, request: &TurnRequest)
    -> Result<Option<HandlerMatch>, ControlError>;

    /// Takes the matched initiative.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] for stale tokens and propagates
    /// handler failures.
    fn take_initiative(
        &mut self,
        matched: &HandlerMatch,
        request: &TurnRequest,
        builder: &mut ResponseBuilder,
    ) -> Result<(), ControlError>;

    /// Exports the control's interaction claims for NLU-schema generation.
    fn interaction_claims(&self) -> InteractionClaims;

    /// Renders a one-line state summary for dialogue diagrams.
    fn stringify_state_for_diagram(&self) -> String;
}
