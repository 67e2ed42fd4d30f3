// crates/colloquy-broker/tests/broker.rs
// ============================================================================
// Module: Composite Broker Tests
// Description: Source-to-sink delivery loop behavior.
// ============================================================================
//! ## Overview
//! Validates the full broker cycle: drain requests, dispatch through the
//! engine, render via the prompt source, and deliver to every sink with
//! receipts in sink order.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use colloquy_broker::BrokerError;
use colloquy_broker::ChannelSink;
use colloquy_broker::CompositeBroker;
use colloquy_broker::InlineSource;
use colloquy_broker::LogSink;
use colloquy_core::Act;
use colloquy_core::ContentAct;

// ============================================================================
// SECTION: Construction
// ============================================================================

#[test]
fn test_builder_requires_source_prompts_and_sink() {
    let result = CompositeBroker::builder(common::color_engine()).build();

    assert!(matches!(result, Err(BrokerError::MissingComponent("source"))));
}

#[test]
fn test_builder_requires_at_least_one_sink() {
    let result = CompositeBroker::builder(common::color_engine())
        .source(Box::new(InlineSource::new()))
        .prompts(Box::new(common::TemplatePrompts))
        .build();

    assert!(matches!(result, Err(BrokerError::MissingComponent("sink"))));
}

// ============================================================================
// SECTION: Delivery Loop
// ============================================================================

#[test]
fn test_run_once_on_empty_source_is_none() {
    let mut broker = CompositeBroker::builder(common::color_engine())
        .source(Box::new(InlineSource::new()))
        .prompts(Box::new(common::TemplatePrompts))
        .sink(Box::new(LogSink::new(Vec::new())))
        .build()
        .unwrap();

    assert!(broker.run_once().unwrap().is_none());
}

#[test]
fn test_drain_delivers_every_queued_turn() {
    let source =
        InlineSource::with_requests([common::set_turn(1, "red"), common::set_turn(2, "green")]);
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut broker = CompositeBroker::builder(common::color_engine())
        .source(Box::new(source))
        .prompts(Box::new(common::TemplatePrompts))
        .sink(Box::new(ChannelSink::new(sender)))
        .build()
        .unwrap();

    let delivered = broker.drain().unwrap();

    assert_eq!(delivered.len(), 2);
    assert_eq!(receiver.try_recv().unwrap().turn.turn_id.as_str(), "turn-1");
    assert_eq!(receiver.try_recv().unwrap().turn.turn_id.as_str(), "turn-2");
}

#[test]
fn test_delivered_turn_carries_rendered_speech() {
    let source = InlineSource::with_requests([common::set_turn(1, "red")]);
    let mut broker = CompositeBroker::builder(common::color_engine())
        .source(Box::new(source))
        .prompts(Box::new(common::TemplatePrompts))
        .sink(Box::new(LogSink::new(Vec::new())))
        .build()
        .unwrap();

    let delivered = broker.run_once().unwrap().expect("one queued turn");

    assert!(matches!(
        &delivered.turn.acts[0],
        Act::Content(ContentAct::ValueSet { values, .. }) if values[0].value.as_str() == "red"
    ));
    assert_eq!(delivered.turn.speech, ["[color] red"]);
}

#[test]
fn test_turns_update_engine_state_across_cycles() {
    let source =
        InlineSource::with_requests([common::set_turn(1, "red"), common::set_turn(2, "green")]);
    let mut broker = CompositeBroker::builder(common::color_engine())
        .source(Box::new(source))
        .prompts(Box::new(common::TemplatePrompts))
        .sink(Box::new(LogSink::new(Vec::new())))
        .build()
        .unwrap();

    broker.drain().unwrap();

    let diagram = broker.engine().stringify_state_for_diagram();
    assert!(diagram.contains("value=green"));
}

#[test]
fn test_receipts_follow_sink_order() {
    let source = InlineSource::with_requests([common::set_turn(1, "red")]);
    let (sender, _receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut broker = CompositeBroker::builder(common::color_engine())
        .source(Box::new(source))
        .prompts(Box::new(common::TemplatePrompts))
        .sink(Box::new(LogSink::new(Vec::new())))
        .sink(Box::new(ChannelSink::new(sender)))
        .build()
        .unwrap();

    let delivered = broker.run_once().unwrap().expect("one queued turn");

    assert_eq!(delivered.receipts.len(), 2);
    assert_eq!(delivered.receipts[0].dispatcher, "log");
    assert_eq!(delivered.receipts[1].dispatcher, "channel");
}
