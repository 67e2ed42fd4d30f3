// system-tests/tests/dialogue_flows.rs
// ============================================================================
// Module: Dialogue Flow Scenarios
// Description: Repair, confirmation-revocation, and removal journeys.
// ============================================================================
//! ## Overview
//! Multi-turn journeys asserting that every user-recoverable failure leaves
//! the dialogue interpretable on the very next turn.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use colloquy_core::Act;
use colloquy_core::CandidateId;
use colloquy_core::ContentAct;
use colloquy_core::Control;
use colloquy_core::Feedback;
use colloquy_core::InitiativeAct;
use colloquy_core::ListControl;
use colloquy_core::ListControlConfig;
use colloquy_core::QueryContext;
use colloquy_core::SlotValue;
use colloquy_core::UnusableInputReason;
use colloquy_core::ValidationVerdict;
use colloquy_core::ValidatorError;
use colloquy_core::ValueControl;
use colloquy_core::ValueControlConfig;
use colloquy_core::ValueValidator;
use system_tests::harness;
use system_tests::harness::DialogueHarness;

/// Validator rejecting one value id.
struct Reject(&'static str);

impl ValueValidator for Reject {
    fn validate(
        &self,
        value: &SlotValue,
        _ctx: &QueryContext,
    ) -> Result<ValidationVerdict, ValidatorError> {
        if value.value == CandidateId::new(self.0) {
            Ok(ValidationVerdict::Fail {
                reason_code: "Unavailable".to_string(),
                rendered_reason: format!("{} is unavailable", self.0),
            })
        } else {
            Ok(ValidationVerdict::Pass)
        }
    }
}

/// Builds a single-color-control tree with the given validator target.
fn color_tree(rejected: &'static str, confirmation: bool) -> Vec<Box<dyn Control>> {
    let mut config = ValueControlConfig::new("color", "color_type");
    config.confirmation_required = confirmation;
    let control = ValueControl::new(config, harness::candidates(&["red", "green", "blue"]))
        .expect("valid config")
        .with_validator(Box::new(Reject(rejected)));
    vec![Box::new(control)]
}

// ============================================================================
// SECTION: Invalid-Value Repair
// ============================================================================

#[test]
fn test_invalid_value_repairs_on_next_turn() {
    let mut harness = DialogueHarness::new(color_tree("red", false)).unwrap();

    let rejected = harness.turn(harness::action_value("set", "red")).unwrap();
    assert!(matches!(&rejected.acts[0], Act::Content(ContentAct::InvalidValue { .. })));
    assert!(matches!(&rejected.acts[1], Act::Initiative(InitiativeAct::RequestValue { .. })));

    // The re-elicitation recorded the elicitation; a bare value repairs it.
    let repaired = harness.turn(harness::bare_value("green")).unwrap();
    assert!(matches!(
        &repaired.acts[0],
        Act::Content(ContentAct::ValueSet { values, .. })
            if values[0].value.as_str() == "green"
    ));
    assert!(repaired.acts.iter().all(|act| !act.is_initiative()));
}

// ============================================================================
// SECTION: Confirmation Revocation
// ============================================================================

#[test]
fn test_disconfirmed_value_can_be_replaced_and_confirmed() {
    let mut harness = DialogueHarness::new(color_tree("none", true)).unwrap();

    let set = harness.turn(harness::action_value("set", "red")).unwrap();
    assert!(matches!(&set.acts[1], Act::Initiative(InitiativeAct::ConfirmValue { .. })));

    let revoked = harness.turn(harness::bare_feedback(Feedback::Disaffirm)).unwrap();
    assert!(matches!(&revoked.acts[0], Act::Content(ContentAct::ValueDisconfirmed { .. })));
    assert!(matches!(&revoked.acts[1], Act::Initiative(InitiativeAct::RequestValue { .. })));

    let replaced = harness.turn(harness::bare_value("blue")).unwrap();
    assert!(matches!(&replaced.acts[0], Act::Content(ContentAct::ValueSet { .. })));
    assert!(matches!(&replaced.acts[1], Act::Initiative(InitiativeAct::ConfirmValue { .. })));

    let confirmed = harness.turn(harness::bare_feedback(Feedback::Affirm)).unwrap();
    assert!(matches!(
        &confirmed.acts[0],
        Act::Content(ContentAct::ValueConfirmed { values, .. })
            if values[0].as_str() == "blue"
    ));
}

// ============================================================================
// SECTION: Ordinal Repair
// ============================================================================

#[test]
fn test_off_page_ordinal_repairs_on_next_turn() {
    let mut harness = DialogueHarness::new(color_tree("none", false)).unwrap();

    let unusable = harness.turn(harness::ordinal(7)).unwrap();
    assert!(matches!(
        &unusable.acts[0],
        Act::Content(ContentAct::UnusableInputValue { reason, .. })
            if *reason == UnusableInputReason::OrdinalOutOfRange
    ));
    assert!(matches!(&unusable.acts[1], Act::Initiative(InitiativeAct::RequestValue { .. })));

    let repaired = harness.turn(harness::ordinal(2)).unwrap();
    assert!(matches!(
        &repaired.acts[0],
        Act::Content(ContentAct::ValueSet { values, .. })
            if values[0].value.as_str() == "green"
    ));
}

// ============================================================================
// SECTION: Removal Journey
// ============================================================================

#[test]
fn test_missed_removal_is_answerable_with_a_bare_value() {
    let config = ListControlConfig::new("toppings", "topping_type");
    let control =
        ListControl::new(config, harness::candidates(&["olives", "onions", "peppers"]))
            .expect("valid config");
    let controls: Vec<Box<dyn Control>> = vec![Box::new(control)];
    let mut harness = DialogueHarness::new(controls).unwrap();

    harness.turn(harness::action_value("add", "olives")).unwrap();
    harness.turn(harness::action_value("add", "onions")).unwrap();

    let missed = harness.turn(harness::action_value("remove", "anchovies")).unwrap();
    assert!(matches!(
        &missed.acts[0],
        Act::Content(ContentAct::InvalidRemoveValue { values, .. })
            if values[0].as_str() == "anchovies"
    ));
    assert!(matches!(
        &missed.acts[1],
        Act::Initiative(InitiativeAct::RequestRemovedValue { choices, .. })
            if choices.len() == 2
    ));

    // The pending removal question interprets the bare reply as a target.
    let removed = harness.turn(harness::bare_value("olives")).unwrap();
    assert!(matches!(
        &removed.acts[0],
        Act::Content(ContentAct::ValueRemoved { values, .. })
            if values[0].as_str() == "olives"
    ));
}
