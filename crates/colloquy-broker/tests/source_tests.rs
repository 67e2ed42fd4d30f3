// crates/colloquy-broker/tests/source_tests.rs
// ============================================================================
// Module: Source Tests
// Description: Inline turn-source ordering semantics.
// ============================================================================
//! ## Overview
//! The inline source drains requests in arrival order and reports emptiness
//! by returning `None`.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use colloquy_broker::InlineSource;
use colloquy_core::TurnSource;

// ============================================================================
// SECTION: Ordering
// ============================================================================

#[test]
fn test_inline_source_preserves_arrival_order() {
    let mut source =
        InlineSource::with_requests([common::set_turn(1, "red"), common::set_turn(2, "green")]);

    assert_eq!(source.next_turn().unwrap().turn_id.as_str(), "turn-1");
    assert_eq!(source.next_turn().unwrap().turn_id.as_str(), "turn-2");
    assert!(source.next_turn().is_none());
}

#[test]
fn test_empty_source_reports_none() {
    let mut source = InlineSource::new();

    assert!(source.next_turn().is_none());
    assert_eq!(source.pending(), 0);
}

#[test]
fn test_pushed_requests_append_to_queue() {
    let mut source = InlineSource::with_requests([common::set_turn(1, "red")]);
    source.push(common::set_turn(2, "green"));

    assert_eq!(source.pending(), 2);
    assert_eq!(source.next_turn().unwrap().turn_id.as_str(), "turn-1");
}
