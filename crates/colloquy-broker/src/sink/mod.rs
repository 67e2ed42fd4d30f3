// crates/colloquy-broker/src/sink/mod.rs
// ============================================================================
// Module: Colloquy Broker Sinks
// Description: Sink trait, delivery receipts, and reference implementations.
// Purpose: Deliver outbound turns to hosts with audit-grade receipts.
// Dependencies: crate::payload, thiserror
// ============================================================================

//! ## Overview
//! Sinks deliver outbound turns to their destinations and return a receipt
//! per delivery. Receipt identifiers are deterministic per sink so delivery
//! logs replay identically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::payload::OutboundTurn;

// ============================================================================
// SECTION: Delivery Receipts
// ============================================================================

/// Receipt returned for one delivered turn.
///
/// # Invariants
/// - `dispatch_id` is unique and deterministic within a sink instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    /// Name of the dispatching sink.
    pub dispatcher: String,
    /// Deterministic dispatch identifier.
    pub dispatch_id: String,
}

/// Factory producing deterministic dispatch identifiers.
#[derive(Debug)]
pub struct ReceiptFactory {
    /// Dispatcher name stamped on receipts.
    dispatcher: String,
    /// Monotonic delivery counter.
    counter: u64,
}

impl ReceiptFactory {
    /// Creates a factory for the named dispatcher.
    #[must_use]
    pub fn new(dispatcher: impl Into<String>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
            counter: 0,
        }
    }

    /// Issues the next receipt.
    pub fn next_receipt(&mut self) -> DeliveryReceipt {
        self.counter += 1;
        DeliveryReceipt {
            dispatcher: self.dispatcher.clone(),
            dispatch_id: format!("{}-{}", self.dispatcher, self.counter),
        }
    }
}

// ============================================================================
// SECTION: Sink Errors
// ============================================================================

/// Errors emitted by broker sinks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Delivery failed at the destination.
    #[error("delivery failure: {0}")]
    Delivery(String),
    /// Delivery record could not be serialized.
    #[error("serialize failure: {0}")]
    Serialize(String),
    /// The destination is closed.
    #[error("sink closed: {0}")]
    Closed(String),
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Delivers outbound turns to a destination.
pub trait Sink: Send {
    /// Delivers one outbound turn.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when delivery fails.
    fn deliver(&mut self, turn: &OutboundTurn) -> Result<DeliveryReceipt, SinkError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod callback;
pub mod channel;
pub mod log;

pub use callback::CallbackSink;
pub use channel::ChannelSink;
pub use channel::DispatchMessage;
pub use log::LogSink;
