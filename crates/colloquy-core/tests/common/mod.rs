// crates/colloquy-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Shared candidate sources, validators, and request builders.
// ============================================================================
//! ## Overview
//! Deterministic fixtures shared by the core test files.

#![allow(
    dead_code,
    reason = "Each test binary uses a subset of the shared fixtures."
)]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use colloquy_core::Act;
use colloquy_core::CandidateError;
use colloquy_core::CandidateId;
use colloquy_core::Control;
use colloquy_core::ControlError;
use colloquy_core::ResponseBuilder;
use colloquy_core::CandidateSource;
use colloquy_core::ControlId;
use colloquy_core::Feedback;
use colloquy_core::IntentValueMapper;
use colloquy_core::ListControl;
use colloquy_core::ListControlConfig;
use colloquy_core::QueryContext;
use colloquy_core::ResolvedInput;
use colloquy_core::SessionId;
use colloquy_core::SlotValue;
use colloquy_core::Timestamp;
use colloquy_core::TurnId;
use colloquy_core::TurnRequest;
use colloquy_core::UtteranceInput;
use colloquy_core::ValidationVerdict;
use colloquy_core::ValidatorError;
use colloquy_core::ValueControl;
use colloquy_core::ValueControlConfig;
use colloquy_core::ValueValidator;

/// Candidate source returning a fixed list.
pub struct FixedCandidates(pub Vec<CandidateId>);

impl CandidateSource for FixedCandidates {
    fn candidates(&self, _ctx: &QueryContext) -> Result<Vec<CandidateId>, CandidateError> {
        Ok(self.0.clone())
    }
}

/// Builds a boxed fixed candidate source.
pub fn candidates(ids: &[&str]) -> Box<dyn CandidateSource> {
    Box::new(FixedCandidates(ids.iter().map(|id| CandidateId::new(*id)).collect()))
}

/// Validator rejecting one specific value id.
pub struct RejectValue {
    /// Rejected value id.
    pub id: &'static str,
    /// Reason code reported on rejection.
    pub reason_code: &'static str,
}

impl ValueValidator for RejectValue {
    fn validate(
        &self,
        value: &SlotValue,
        _ctx: &QueryContext,
    ) -> Result<ValidationVerdict, ValidatorError> {
        if value.value.as_str() == self.id {
            Ok(ValidationVerdict::Fail {
                reason_code: self.reason_code.to_string(),
                rendered_reason: format!("{} is not available", self.id),
            })
        } else {
            Ok(ValidationVerdict::Pass)
        }
    }
}

/// Validator that always fails with a collaborator error.
pub struct BrokenValidator;

impl ValueValidator for BrokenValidator {
    fn validate(
        &self,
        _value: &SlotValue,
        _ctx: &QueryContext,
    ) -> Result<ValidationVerdict, ValidatorError> {
        Err(ValidatorError::Validator("backend unavailable".to_string()))
    }
}

/// Mapper translating bare feedback into the colliding literals.
pub struct YesNoMapper;

impl IntentValueMapper for YesNoMapper {
    fn map_feedback(&self, feedback: Feedback) -> Option<CandidateId> {
        match feedback {
            Feedback::Affirm => Some(CandidateId::new("yes")),
            Feedback::Disaffirm => Some(CandidateId::new("no")),
        }
    }
}

/// Builds a turn request with logical time and a numbered turn id.
pub fn turn_n(n: u64, input: ResolvedInput) -> TurnRequest {
    TurnRequest {
        session_id: SessionId::new("session-1"),
        turn_id: TurnId::new(format!("turn-{n}")),
        time: Timestamp::Logical(n),
        input,
    }
}

/// Builds a turn request for the first turn.
pub fn turn(input: ResolvedInput) -> TurnRequest {
    turn_n(1, input)
}

/// Builds an utterance with an action and a catalog-matched value.
pub fn action_value(action: &str, value: &str) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: None,
        action: Some(action.into()),
        target: None,
        value: Some(SlotValue::matched(value)),
    })
}

/// Builds an utterance with an action and no value.
pub fn action_only(action: &str) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: None,
        action: Some(action.into()),
        target: None,
        value: None,
    })
}

/// Builds a bare-value utterance.
pub fn bare_value(value: &str) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: None,
        action: None,
        target: None,
        value: Some(SlotValue::matched(value)),
    })
}

/// Builds a bare-feedback utterance.
pub fn feedback(feedback: Feedback) -> ResolvedInput {
    ResolvedInput::Utterance(UtteranceInput {
        feedback: Some(feedback),
        action: None,
        target: None,
        value: None,
    })
}

/// Builds a spoken ordinal.
pub fn ordinal(position: u64) -> ResolvedInput {
    ResolvedInput::Ordinal {
        position,
    }
}

/// Builds a screen selection for a control.
pub fn selection(control_id: &str, position: u64) -> ResolvedInput {
    ResolvedInput::Selection {
        control_id: ControlId::new(control_id),
        position,
    }
}

/// Runs one full dispatch cycle on a single control, panicking on errors.
pub fn run_turn(control: &mut dyn Control, request: &TurnRequest) -> Vec<Act> {
    let mut builder = ResponseBuilder::new();
    if let Some(matched) = control.probe(request).expect("probe") {
        control.handle(&matched, request, &mut builder).expect("handle");
    }
    if !builder.has_initiative() {
        if let Some(matched) = control.probe_initiative(request).expect("probe initiative") {
            control
                .take_initiative(&matched, request, &mut builder)
                .expect("take initiative");
        }
    }
    builder.into_acts()
}

/// Runs only the handle phase, returning the dispatch outcome.
pub fn handle_only(
    control: &mut dyn Control,
    request: &TurnRequest,
) -> Result<Vec<Act>, ControlError> {
    let mut builder = ResponseBuilder::new();
    let matched = control.probe(request)?.expect("input handler should match");
    control.handle(&matched, request, &mut builder)?;
    Ok(builder.into_acts())
}

/// Builds the standard color control over four candidates, page size three.
pub fn color_control() -> ValueControl {
    let config = ValueControlConfig::new("color", "color_type");
    ValueControl::new(config, candidates(&["red", "green", "blue", "yellow"]))
        .expect("valid configuration")
}

/// Builds the color control with confirmation required.
pub fn confirming_color_control() -> ValueControl {
    let mut config = ValueControlConfig::new("color", "color_type");
    config.confirmation_required = true;
    ValueControl::new(config, candidates(&["red", "green", "blue", "yellow"]))
        .expect("valid configuration")
}

/// Builds the standard toppings list control.
pub fn toppings_control() -> ListControl {
    let config = ListControlConfig::new("toppings", "topping_type");
    ListControl::new(config, candidates(&["olives", "onions", "peppers", "mushrooms"]))
        .expect("valid configuration")
}

/// Builds the toppings control with confirmation required.
pub fn confirming_toppings_control() -> ListControl {
    let mut config = ListControlConfig::new("toppings", "topping_type");
    config.confirmation_required = true;
    ListControl::new(config, candidates(&["olives", "onions", "peppers", "mushrooms"]))
        .expect("valid configuration")
}
