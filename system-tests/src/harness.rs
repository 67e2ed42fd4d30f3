// system-tests/src/harness.rs
// ============================================================================
// Module: Dialogue Harness
// Description: Multi-turn scenario driver over the public engine API.
// Purpose: Script conversations the way an external router would.
// Dependencies: colloquy-core
// ============================================================================

//! ## Overview
//! The harness owns a turn engine over the in-memory store and feeds it one
//! resolved input per turn, numbering turn ids and logical time
//! automatically. Scenario tests assert on the acts each turn emits and on
//! the persisted transcript.

// ============================================================================
// SECTION: Imports
// ============================================================================

use colloquy_core::CandidateError;
use colloquy_core::CandidateId;
use colloquy_core::CandidateSource;
use colloquy_core::Control;
use colloquy_core::ControlId;
use colloquy_core::EngineError;
use colloquy_core::Feedback;
use colloquy_core::InMemorySessionStore;
use colloquy_core::QueryContext;
use colloquy_core::ResolvedInput;
use colloquy_core::SessionId;
use colloquy_core::SessionState;
use colloquy_core::SessionStore;
use colloquy_core::SlotValue;
use colloquy_core::Timestamp;
use colloquy_core::TurnEngine;
use colloquy_core::TurnId;
use colloquy_core::TurnRequest;
use colloquy_core::TurnResult;
use colloquy_core::UtteranceInput;

// ============================================================================
// SECTION: Candidate Fixtures
// ============================================================================

/// Candidate source returning a fixed list.
pub struct FixedCandidates(pub Vec<CandidateId>);

impl CandidateSource for FixedCandidates {
    fn candidates(&self, _ctx: &QueryContext) -> Result<Vec<CandidateId>, CandidateError> {
        Ok(self.0.clone())
    }
}

/// Builds a boxed fixed candidate source from string ids.
#[must_use]
pub fn candidates(ids: &[&str]) -> Box<dyn CandidateSource> {
    Box::new(FixedCandidates(ids.iter().map(|id| CandidateId::new(*id)).collect()))
}

// ============================================================================
// SECTION: Input Builders
// ============================================================================

/// Builds an utterance with an action and a catalog-matched value.
#[must_use]
pub fn action_value(action: &str, value: &str) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: None,
        action: Some(action.into()),
        target: None,
        value: Some(SlotValue::matched(value)),
    })
}

/// Builds an utterance with an action and no value.
#[must_use]
pub fn action_only(action: &str) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: None,
        action: Some(action.into()),
        target: None,
        value: None,
    })
}

/// Builds a bare-value utterance.
#[must_use]
pub fn bare_value(value: &str) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: None,
        action: None,
        target: None,
        value: Some(SlotValue::matched(value)),
    })
}

/// Builds a bare-feedback utterance.
#[must_use]
pub fn bare_feedback(feedback: Feedback) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: Some(feedback),
        action: None,
        target: None,
        value: None,
    })
}

/// Builds a spoken ordinal.
#[must_use]
pub const fn ordinal(position: u64) -> ResolvedInput {
    ResolvedInput::Ordinal {
        position,
    }
}

/// Builds a screen selection for a control.
#[must_use]
pub fn selection(control_id: &str, position: u64) -> ResolvedInput {
    ResolvedInput::Selection {
        control_id: ControlId::new(control_id),
        position,
    }
}

// ============================================================================
// SECTION: Dialogue Harness
// ============================================================================

/// Multi-turn scenario driver over the public engine API.
pub struct DialogueHarness {
    /// Engine under test.
    engine: TurnEngine<InMemorySessionStore>,
    /// Session every turn is scoped to.
    session_id: SessionId,
    /// Monotonic turn counter for ids and logical time.
    next_turn: u64,
}

impl DialogueHarness {
    /// Creates a harness over an ordered control tree.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the control tree is rejected.
    pub fn new(controls: Vec<Box<dyn Control>>) -> Result<Self, EngineError> {
        Ok(Self {
            engine: TurnEngine::new(controls, InMemorySessionStore::new())?,
            session_id: SessionId::new("system-test-session"),
            next_turn: 0,
        })
    }

    /// Dispatches one turn with an auto-numbered id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when dispatch fails.
    pub fn turn(&mut self, input: ResolvedInput) -> Result<TurnResult, EngineError> {
        self.next_turn += 1;
        let request = TurnRequest {
            session_id: self.session_id.clone(),
            turn_id: TurnId::new(format!("turn-{}", self.next_turn)),
            time: Timestamp::Logical(self.next_turn),
            input,
        };
        self.engine.handle_turn(&request)
    }

    /// Loads the persisted session snapshot.
    ///
    /// # Panics
    ///
    /// Panics when no turn has been dispatched yet.
    #[must_use]
    #[allow(clippy::unwrap_used, reason = "Harness precondition: at least one turn dispatched.")]
    pub fn session(&self) -> SessionState {
        self.engine.store().load(&self.session_id).unwrap().unwrap()
    }

    /// Returns the engine under test.
    #[must_use]
    pub const fn engine(&self) -> &TurnEngine<InMemorySessionStore> {
        &self.engine
    }
}
