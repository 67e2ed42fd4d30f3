// crates/colloquy-core/tests/list_confirmation.rs
// ============================================================================
// Module: Multi-Value Confirmation Tests
// Description: Subset confirmation, partial disaffirm, and blast radius.
// ============================================================================
//! ## Overview
//! Confirmation offers exactly the unconfirmed subset. Affirming marks that
//! subset confirmed; disaffirming removes exactly the offered subset, leaving
//! previously confirmed entries untouched.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use colloquy_core::Control;
use colloquy_core::Act;
use colloquy_core::CandidateId;
use colloquy_core::ContentAct;
use colloquy_core::ControlState;
use colloquy_core::Feedback;
use colloquy_core::InitiativeAct;
use colloquy_core::ListControlState;
use colloquy_core::ResponseBuilder;
use colloquy_core::ValueEntry;

/// Builds a list state from `(id, confirmed)` pairs.
fn list_state(entries: &[(&str, bool)]) -> ControlState {
    ControlState::List(ListControlState {
        values: entries
            .iter()
            .map(|(id, confirmed)| ValueEntry {
                id: CandidateId::new(*id),
                confirmed: *confirmed,
                er_match: true,
            })
            .collect(),
        ..ListControlState::default()
    })
}

// ============================================================================
// SECTION: Offered Subset
// ============================================================================

#[test]
fn test_confirmation_offers_unconfirmed_subset_only() {
    let mut control = common::confirming_toppings_control();
    control.restore_state(Some(&list_state(&[("olives", true), ("onions", false)]))).unwrap();

    let request = common::turn(common::action_only("unknown-action"));
    let matched = control.probe_initiative(&request).unwrap().expect("initiative");
    let mut builder = ResponseBuilder::new();
    control.take_initiative(&matched, &request, &mut builder).unwrap();
    let acts = builder.into_acts();

    assert!(matches!(
        &acts[0],
        Act::Initiative(InitiativeAct::ConfirmValue { values, .. })
            if values.len() == 1 && values[0].as_str() == "onions"
    ));
}

#[test]
fn test_fully_confirmed_list_wants_no_confirmation() {
    let mut control = common::confirming_toppings_control();
    control.restore_state(Some(&list_state(&[("olives", true)]))).unwrap();

    let request = common::turn(common::action_only("unknown-action"));

    assert!(control.probe_initiative(&request).unwrap().is_none());
}

// ============================================================================
// SECTION: Affirm
// ============================================================================

#[test]
fn test_affirm_marks_offered_subset_confirmed() {
    let mut control = common::confirming_toppings_control();
    control.restore_state(Some(&list_state(&[("olives", false), ("onions", false)]))).unwrap();
    let mut builder = ResponseBuilder::new();
    control.confirm_values(&mut builder).unwrap();

    let acts = common::run_turn(&mut control, &common::turn(common::feedback(Feedback::Affirm)));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueConfirmed { values, .. }) if values.len() == 2
    ));
    assert!(control.state().values.iter().all(|entry| entry.confirmed));
    assert!(control.state().last_initiative.is_none());
}

// ============================================================================
// SECTION: Disaffirm
// ============================================================================

#[test]
fn test_disaffirm_removes_entire_offered_subset() {
    let mut control = common::confirming_toppings_control();
    control.restore_state(Some(&list_state(&[("olives", false), ("onions", false)]))).unwrap();
    let mut builder = ResponseBuilder::new();
    control.confirm_values(&mut builder).unwrap();

    let acts =
        common::run_turn(&mut control, &common::turn(common::feedback(Feedback::Disaffirm)));

    assert!(matches!(
        &acts[0],
        Act::Content(ContentAct::ValueDisconfirmed { values, .. }) if values.len() == 2
    ));
    assert!(matches!(&acts[1], Act::Initiative(InitiativeAct::RequestValue { .. })));
    assert!(control.state().values.is_empty());
}

#[test]
fn test_disaffirm_leaves_previously_confirmed_entries() {
    let mut control = common::confirming_toppings_control();
    control.restore_state(Some(&list_state(&[("olives", true), ("onions", false)]))).unwrap();
    let mut builder = ResponseBuilder::new();
    control.confirm_values(&mut builder).unwrap();

    common::run_turn(&mut control, &common::turn(common::feedback(Feedback::Disaffirm)));

    let state = control.state();
    assert_eq!(state.values.len(), 1);
    assert_eq!(state.values[0].id.as_str(), "olives");
    assert!(state.values[0].confirmed);
}

#[test]
fn test_disaffirm_with_duplicate_ids_removes_offered_occurrences() {
    let mut control = common::confirming_toppings_control();
    control.restore_state(Some(&list_state(&[("olives", true), ("olives", false)]))).unwrap();
    let mut builder = ResponseBuilder::new();
    control.confirm_values(&mut builder).unwrap();

    common::run_turn(&mut control, &common::turn(common::feedback(Feedback::Disaffirm)));

    let state = control.state();
    assert_eq!(state.values.len(), 1);
    assert!(state.values[0].confirmed);
}
