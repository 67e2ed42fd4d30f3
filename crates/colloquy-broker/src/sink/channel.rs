// crates/colloquy-broker/src/sink/channel.rs
// ============================================================================
// Module: Colloquy Channel Sink
// Description: Channel-backed sink for in-process consumers.
// Purpose: Forward delivered turns to an async consumer without blocking.
// Dependencies: crate::{payload, sink}, tokio
// ============================================================================

//! ## Overview
//! `ChannelSink` forwards each delivered turn over an unbounded tokio
//! channel. Delivery fails closed when the consumer has dropped the
//! receiving half.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::mpsc::UnboundedSender;

use crate::payload::OutboundTurn;
use crate::sink::DeliveryReceipt;
use crate::sink::ReceiptFactory;
use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Dispatch Messages
// ============================================================================

/// Message forwarded to the channel consumer per delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchMessage {
    /// Deterministic dispatch identifier.
    pub dispatch_id: String,
    /// Delivered turn payload.
    pub turn: OutboundTurn,
}

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

/// Channel-backed turn sink.
pub struct ChannelSink {
    /// Sending half of the consumer channel.
    sender: UnboundedSender<DispatchMessage>,
    /// Receipt factory for deterministic dispatch identifiers.
    receipts: ReceiptFactory,
}

impl ChannelSink {
    /// Creates a channel sink with the default dispatcher name.
    #[must_use]
    pub fn new(sender: UnboundedSender<DispatchMessage>) -> Self {
        Self {
            sender,
            receipts: ReceiptFactory::new("channel"),
        }
    }

    /// Creates a channel sink with a custom dispatcher name.
    #[must_use]
    pub fn with_dispatcher(
        sender: UnboundedSender<DispatchMessage>,
        dispatcher: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            receipts: ReceiptFactory::new(dispatcher),
        }
    }
}

impl Sink for ChannelSink {
    fn deliver(&mut self, turn: &OutboundTurn) -> Result<DeliveryReceipt, SinkError> {
        let receipt = self.receipts.next_receipt();
        let message = DispatchMessage {
            dispatch_id: receipt.dispatch_id.clone(),
            turn: turn.clone(),
        };
        self.sender
            .send(message)
            .map_err(|err| SinkError::Closed(err.to_string()))?;
        Ok(receipt)
    }
}
