// crates/colloquy-core/tests/value_control.rs
// ============================================================================
// Module: Single-Value Control Tests
// Description: Set, change, bare-value, and validation flows.
// ============================================================================
//! ## Overview
//! Validates the single-value acquisition flows against the dispatch
//! protocol: set and change with and without values, bare values answering
//! the recorded elicitation, and first-failure-wins validation.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use colloquy_core::Act;
use colloquy_core::ContentAct;
use colloquy_core::ContractViolation;
use colloquy_core::ControlError;
use colloquy_core::ElicitationAction;
use colloquy_core::InitiativeAct;
use colloquy_core::LastInitiative;
use colloquy_core::SlotValue;

// ============================================================================
// SECTION: Set Flows
// ============================================================================

#[test]
fn test_set_with_value_stores_and_reports() {
    let mut control = common::color_control();
    let request = common::turn(common::action_value("set", "red"));

    let acts = common::run_turn(&mut control, &request);

    assert_eq!(acts.len(), 1);
    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueSet { values, .. }) if values[0].value.as_str() == "red"
    ));
    let state = control.state();
    assert_eq!(state.value.as_ref().unwrap().value.as_str(), "red");
    assert!(!state.confirmed);
    assert_eq!(state.elicitation, Some(ElicitationAction::Set));
    assert!(state.last_initiative.is_none());
}

#[test]
fn test_set_without_value_re_elicits() {
    let mut control = common::color_control();
    let request = common::turn(common::action_only("set"));

    let acts = common::run_turn(&mut control, &request);

    assert_eq!(acts.len(), 1);
    assert!(matches!(
        &acts[0],
        Act::Initiative(InitiativeAct::RequestValue { choices, .. }) if choices.len() == 3
    ));
    assert_eq!(control.state().last_initiative, Some(LastInitiative::RequestValue));
}

#[test]
fn test_set_value_records_previous_value() {
    let mut control = common::color_control();
    control.set_value(SlotValue::matched("a"));
    control.set_value(SlotValue::matched("b"));

    let state = control.state();
    assert_eq!(state.previous_value.as_ref().unwrap().value.as_str(), "a");
    assert_eq!(state.value.as_ref().unwrap().value.as_str(), "b");
}

// ============================================================================
// SECTION: Change Flows
// ============================================================================

#[test]
fn test_change_with_value_reports_old_and_new() {
    let mut control = common::color_control();
    common::run_turn(&mut control, &common::turn(common::action_value("set", "red")));

    let request = common::turn_n(2, common::action_value("change", "green"));
    let acts = common::run_turn(&mut control, &request);

    assert_eq!(acts.len(), 1);
    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueChanged { previous, values, .. })
            if previous[0].value.as_str() == "red" && values[0].value.as_str() == "green"
    ));
    assert_eq!(control.state().value.as_ref().unwrap().value.as_str(), "green");
}

#[test]
fn test_change_with_no_held_value_is_contract_violation() {
    let mut control = common::color_control();
    let request = common::turn(common::action_value("change", "green"));

    let result = common::handle_only(&mut control, &request);

    assert!(matches!(
        result,
        Err(ControlError::Contract(ContractViolation::MissingPreviousValue { .. }))
    ));
}

#[test]
fn test_change_without_value_asks_for_replacement() {
    let mut control = common::color_control();
    common::run_turn(&mut control, &common::turn(common::action_value("set", "red")));

    let request = common::turn_n(2, common::action_only("change"));
    let acts = common::run_turn(&mut control, &request);

    assert_eq!(acts.len(), 1);
    assert!(matches!(&acts[0], Act::Initiative(InitiativeAct::RequestChangedValue { .. })));
    assert_eq!(control.state().last_initiative, Some(LastInitiative::RequestChangedValue));
}

// ============================================================================
// SECTION: Bare Values
// ============================================================================

#[test]
fn test_bare_value_defaults_to_set() {
    let mut control = common::color_control();
    let request = common::turn(common::bare_value("blue"));

    let acts = common::run_turn(&mut control, &request);

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueSet { values, .. }) if values[0].value.as_str() == "blue"
    ));
}

#[test]
fn test_bare_value_answers_recorded_change_elicitation() {
    let mut control = common::color_control();
    common::run_turn(&mut control, &common::turn(common::action_value("set", "red")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_only("change")));

    let request = common::turn_n(3, common::bare_value("yellow"));
    let acts = common::run_turn(&mut control, &request);

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueChanged { previous, values, .. })
            if previous[0].value.as_str() == "red" && values[0].value.as_str() == "yellow"
    ));
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn test_invalid_value_reports_and_re_elicits() {
    let mut control = common::color_control().with_validator(Box::new(common::RejectValue {
        id: "red",
        reason_code: "OutOfStock",
    }));
    let request = common::turn(common::action_value("set", "red"));

    let acts = common::run_turn(&mut control, &request);

    assert_eq!(acts.len(), 2);
    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::InvalidValue { failure, .. })
            if failure.reason_code == "OutOfStock"
    ));
    assert!(matches!(
        &acts[1],
        Act::Initiative(InitiativeAct::RequestValue { elicitation, .. })
            if *elicitation == ElicitationAction::Set
    ));
    assert_eq!(control.state().last_initiative, Some(LastInitiative::RequestValue));
}

#[test]
fn test_invalid_change_re_elicits_change() {
    let mut control = common::color_control().with_validator(Box::new(common::RejectValue {
        id: "green",
        reason_code: "OutOfStock",
    }));
    common::run_turn(&mut control, &common::turn(common::action_value("set", "red")));

    let request = common::turn_n(2, common::action_value("change", "green"));
    let acts = common::run_turn(&mut control, &request);

    assert_eq!(acts.len(), 2);
    assert!(matches!(&acts[0], Act::Content(ContentAct::InvalidValue { .. })));
    assert!(matches!(&acts[1], Act::Initiative(InitiativeAct::RequestChangedValue { .. })));
}

#[test]
fn test_validator_error_propagates() {
    let mut control = common::color_control().with_validator(Box::new(common::BrokenValidator));
    let request = common::turn(common::action_value("set", "red"));

    let result = common::handle_only(&mut control, &request);

    assert!(matches!(result, Err(ControlError::Validator(_))));
}

#[test]
fn test_first_failing_validator_wins() {
    let mut control = common::color_control()
        .with_validator(Box::new(common::RejectValue {
            id: "red",
            reason_code: "First",
        }))
        .with_validator(Box::new(common::RejectValue {
            id: "red",
            reason_code: "Second",
        }));
    let request = common::turn(common::action_value("set", "red"));

    let acts = common::run_turn(&mut control, &request);

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::InvalidValue { failure, .. }) if failure.reason_code == "First"
    ));
}

// ============================================================================
// SECTION: Clear
// ============================================================================

#[test]
fn test_clear_resets_state() {
    let mut control = common::color_control();
    common::run_turn(&mut control, &common::turn(common::action_value("set", "red")));

    control.clear();

    let state = control.state();
    assert!(state.value.is_none());
    assert!(state.previous_value.is_none());
    assert!(!state.confirmed);
    assert!(state.last_initiative.is_none());
}
