// crates/colloquy-core/tests/list_control.rs
// ============================================================================
// Module: Multi-Value Control Tests
// Description: Add, change, remove, clear, and duplicate handling.
// ============================================================================
//! ## Overview
//! Validates the independent list capabilities: add appends unconfirmed
//! entries, change replaces the held list, remove targets held ids only and
//! reports misses, clear empties the list, and duplicate ids are preserved.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use colloquy_core::Act;
use colloquy_core::ContentAct;
use colloquy_core::ElicitationAction;
use colloquy_core::InitiativeAct;
use colloquy_core::LastInitiative;

// ============================================================================
// SECTION: Add Flows
// ============================================================================

#[test]
fn test_add_appends_unconfirmed_entry() {
    let mut control = common::toppings_control();

    let acts = common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueAdded { values, .. })
            if values[0].value.as_str() == "olives"
    ));
    let state = control.state();
    assert_eq!(state.values.len(), 1);
    assert!(!state.values[0].confirmed);
}

#[test]
fn test_add_permits_duplicate_ids() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_value("add", "olives")));

    let state = control.state();
    assert_eq!(state.values.len(), 2);
    assert_eq!(state.values[0].id, state.values[1].id);
}

#[test]
fn test_add_without_value_asks_with_spoken_page() {
    let mut control = common::toppings_control();

    let acts = common::run_turn(&mut control, &common::turn(common::action_only("add")));

    assert!(matches!(
        &acts[0],
        Act::Initiative(InitiativeAct::RequestValue { elicitation, choices, .. })
            if *elicitation == ElicitationAction::Add && choices.len() == 3
    ));
}

#[test]
fn test_invalid_add_reports_and_re_elicits() {
    let mut control = common::toppings_control().with_validator(Box::new(common::RejectValue {
        id: "onions",
        reason_code: "OutOfStock",
    }));

    let acts = common::run_turn(&mut control, &common::turn(common::action_value("add", "onions")));

    assert_eq!(acts.len(), 2);
    assert!(matches!(&acts[0], Act::Content(ContentAct::InvalidValue { .. })));
    assert!(matches!(&acts[1], Act::Initiative(InitiativeAct::RequestValue { .. })));
    assert!(control.state().values.is_empty());
}

// ============================================================================
// SECTION: Change Flows
// ============================================================================

#[test]
fn test_change_replaces_entire_list() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_value("add", "onions")));

    let acts =
        common::run_turn(&mut control, &common::turn_n(3, common::action_value("change", "peppers")));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueChanged { previous, values, .. })
            if previous.len() == 2 && values[0].value.as_str() == "peppers"
    ));
    let state = control.state();
    assert_eq!(state.values.len(), 1);
    assert_eq!(state.values[0].id.as_str(), "peppers");
}

// ============================================================================
// SECTION: Remove Flows
// ============================================================================

#[test]
fn test_remove_held_value() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_value("add", "onions")));

    let acts = common::run_turn(
        &mut control,
        &common::turn_n(3, common::action_value("remove", "olives")),
    );

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueRemoved { values, .. })
            if values[0].as_str() == "olives"
    ));
    let state = control.state();
    assert_eq!(state.values.len(), 1);
    assert_eq!(state.values[0].id.as_str(), "onions");
}

#[test]
fn test_remove_missing_value_reports_and_re_asks() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));

    let acts = common::run_turn(
        &mut control,
        &common::turn_n(2, common::action_value("remove", "anchovies")),
    );

    assert_eq!(acts.len(), 2);
    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::InvalidRemoveValue { values, .. })
            if values[0].as_str() == "anchovies"
    ));
    assert!(matches!(
        &acts[1],
        Act::Initiative(InitiativeAct::RequestRemovedValue { choices, .. })
            if choices.len() == 1 && choices[0].as_str() == "olives"
    ));
    assert_eq!(control.state().values.len(), 1);
    assert_eq!(control.state().last_initiative, Some(LastInitiative::RequestRemovedValue));
}

#[test]
fn test_remove_duplicate_removes_one_occurrence() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_value("add", "olives")));

    common::run_turn(&mut control, &common::turn_n(3, common::action_value("remove", "olives")));

    assert_eq!(control.state().values.len(), 1);
}

#[test]
fn test_bare_value_answers_pending_remove_question() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_only("remove")));

    let acts = common::run_turn(&mut control, &common::turn_n(3, common::bare_value("olives")));

    assert!(matches!(&acts[0], Act::Content(ContentAct::ValueRemoved { .. })));
    assert!(control.state().values.is_empty());
}

// ============================================================================
// SECTION: Clear
// ============================================================================

#[test]
fn test_clear_empties_and_reports_previous() {
    let mut control = common::toppings_control();
    common::run_turn(&mut control, &common::turn(common::action_value("add", "olives")));
    common::run_turn(&mut control, &common::turn_n(2, common::action_value("add", "onions")));

    let acts = common::run_turn(&mut control, &common::turn_n(3, common::action_only("clear")));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueCleared { previous, .. }) if previous.len() == 2
    ));
    assert!(control.state().values.is_empty());
}

// ============================================================================
// SECTION: Modalities
// ============================================================================

#[test]
fn test_ordinal_adds_from_spoken_page() {
    let mut control = common::toppings_control();

    let acts = common::run_turn(&mut control, &common::turn(common::ordinal(3)));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueAdded { values, .. })
            if values[0].value.as_str() == "peppers"
    ));
}

#[test]
fn test_selection_adds_from_full_list() {
    let mut control = common::toppings_control();

    let acts = common::run_turn(&mut control, &common::turn(common::selection("toppings", 4)));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueAdded { values, .. })
            if values[0].value.as_str() == "mushrooms"
    ));
}
