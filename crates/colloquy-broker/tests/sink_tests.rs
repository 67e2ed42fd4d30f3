// crates/colloquy-broker/tests/sink_tests.rs
// ============================================================================
// Module: Sink Tests
// Description: Log, channel, and callback sink delivery semantics.
// ============================================================================
//! ## Overview
//! Validates delivery records, deterministic receipts, and fail-closed
//! behavior for the reference sinks.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use std::sync::Arc;
use std::sync::Mutex;

use colloquy_broker::CallbackSink;
use colloquy_broker::ChannelSink;
use colloquy_broker::LogSink;
use colloquy_broker::Sink;
use colloquy_broker::SinkError;
use serde_json::Value;

// ============================================================================
// SECTION: Log Sink
// ============================================================================

#[test]
fn test_log_sink_writes_one_json_record_per_delivery() {
    let mut sink = LogSink::new(Vec::new());
    let turn = common::outbound_turn();

    sink.deliver(&turn).unwrap();
    sink.deliver(&turn).unwrap();

    let written = String::from_utf8(sink.into_writer()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);

    let record: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["record"], "turn_delivery");
    assert_eq!(record["session_id"], "session-1");
    assert_eq!(record["turn_id"], "turn-1");
    assert_eq!(record["acts"][0], "value_set");
    assert_eq!(record["speech"][0], "[color] red");
}

#[test]
fn test_log_sink_receipts_are_deterministic() {
    let mut sink = LogSink::new(Vec::new());
    let turn = common::outbound_turn();

    let first = sink.deliver(&turn).unwrap();
    let second = sink.deliver(&turn).unwrap();

    assert_eq!(first.dispatch_id, "log-1");
    assert_eq!(second.dispatch_id, "log-2");
}

#[test]
fn test_log_sink_custom_dispatcher_names_receipts() {
    let mut sink = LogSink::with_dispatcher(Vec::new(), "audit");
    let turn = common::outbound_turn();

    let receipt = sink.deliver(&turn).unwrap();

    assert_eq!(receipt.dispatcher, "audit");
    assert_eq!(receipt.dispatch_id, "audit-1");
}

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

#[test]
fn test_channel_sink_forwards_turns() {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = ChannelSink::new(sender);
    let turn = common::outbound_turn();

    sink.deliver(&turn).unwrap();

    let message = receiver.try_recv().unwrap();
    assert_eq!(message.dispatch_id, "channel-1");
    assert_eq!(message.turn, turn);
}

#[test]
fn test_channel_sink_fails_closed_when_receiver_dropped() {
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    drop(receiver);
    let mut sink = ChannelSink::new(sender);
    let turn = common::outbound_turn();

    let result = sink.deliver(&turn);

    assert!(matches!(result, Err(SinkError::Closed(_))));
}

// ============================================================================
// SECTION: Callback Sink
// ============================================================================

#[test]
fn test_callback_sink_invokes_host_closure() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let mut sink = CallbackSink::new(Box::new(move |turn| {
        sink_seen.lock().map_err(|err| err.to_string())?.push(turn.turn_id.clone());
        Ok(())
    }));
    let turn = common::outbound_turn();

    let receipt = sink.deliver(&turn).unwrap();

    assert_eq!(receipt.dispatch_id, "callback-1");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_callback_failure_fails_delivery() {
    let mut sink = CallbackSink::new(Box::new(|_turn| Err("downstream refused".to_string())));
    let turn = common::outbound_turn();

    let result = sink.deliver(&turn);

    assert!(matches!(result, Err(SinkError::Delivery(message)) if message == "downstream refused"));
}
