// crates/colloquy-broker/tests/common/mod.rs
// ============================================================================
// Module: Broker Test Fixtures
// Description: Shared prompts, engines, and request builders.
// ============================================================================
//! ## Overview
//! Deterministic fixtures shared by the broker test files.

#![allow(
    dead_code,
    reason = "Each test binary uses a subset of the shared fixtures."
)]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use colloquy_broker::OutboundTurn;
use colloquy_core::Act;
use colloquy_core::CandidateError;
use colloquy_core::CandidateId;
use colloquy_core::CandidateSource;
use colloquy_core::ContentAct;
use colloquy_core::Control;
use colloquy_core::ControlId;
use colloquy_core::InMemorySessionStore;
use colloquy_core::PromptError;
use colloquy_core::PromptRequest;
use colloquy_core::PromptSource;
use colloquy_core::QueryContext;
use colloquy_core::ResolvedInput;
use colloquy_core::SessionId;
use colloquy_core::SlotValue;
use colloquy_core::Timestamp;
use colloquy_core::TurnEngine;
use colloquy_core::TurnId;
use colloquy_core::TurnRequest;
use colloquy_core::UtteranceInput;
use colloquy_core::ValueControl;
use colloquy_core::ValueControlConfig;

/// Candidate source returning a fixed list.
pub struct FixedCandidates(pub Vec<CandidateId>);

impl CandidateSource for FixedCandidates {
    fn candidates(&self, _ctx: &QueryContext) -> Result<Vec<CandidateId>, CandidateError> {
        Ok(self.0.clone())
    }
}

/// Prompt source rendering every slot from a fixed template.
pub struct TemplatePrompts;

impl PromptSource for TemplatePrompts {
    fn resolve(&self, request: &PromptRequest) -> Result<String, PromptError> {
        Ok(format!("[{}] {}", request.control_id, request.values.join(", ")))
    }
}

/// Builds the standard color engine over an in-memory store.
pub fn color_engine() -> TurnEngine<InMemorySessionStore> {
    let config = ValueControlConfig::new("color", "color_type");
    let candidates = vec![
        CandidateId::new("red"),
        CandidateId::new("green"),
        CandidateId::new("blue"),
        CandidateId::new("yellow"),
    ];
    let control =
        ValueControl::new(config, Box::new(FixedCandidates(candidates))).expect("valid config");
    let controls: Vec<Box<dyn Control>> = vec![Box::new(control)];
    TurnEngine::new(controls, InMemorySessionStore::new()).expect("valid control tree")
}

/// Builds a set-value turn request with a numbered turn id.
pub fn set_turn(n: u64, value: &str) -> TurnRequest {
    TurnRequest {
        session_id: SessionId::new("session-1"),
        turn_id: TurnId::new(format!("turn-{n}")),
        time: Timestamp::Logical(n),
        input: ResolvedInput::Utterance(UtteranceInput {
            feedback: None,
            action: Some("set".into()),
            target: None,
            value: Some(SlotValue::matched(value)),
        }),
    }
}

/// Builds a deterministic outbound turn for sink tests.
pub fn outbound_turn() -> OutboundTurn {
    OutboundTurn {
        session_id: SessionId::new("session-1"),
        turn_id: TurnId::new("turn-1"),
        acts: vec![Act::Content(ContentAct::ValueSet {
            control_id: ControlId::new("color"),
            values: vec![SlotValue::matched("red")],
        })],
        speech: vec!["[color] red".to_string()],
    }
}
