// crates/colloquy-broker/src/sink/callback.rs
// ============================================================================
// Module: Colloquy Callback Sink
// Description: Callback-backed sink for embedded hosts.
// Purpose: Hand each delivered turn to a host-supplied closure.
// Dependencies: crate::{payload, sink}
// ============================================================================

//! ## Overview
//! `CallbackSink` invokes a host-supplied closure per delivered turn. The
//! closure reports failures by returning an error string, which fails the
//! delivery closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::payload::OutboundTurn;
use crate::sink::DeliveryReceipt;
use crate::sink::ReceiptFactory;
use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Callback Sink
// ============================================================================

/// Host callback invoked per delivered turn.
pub type DeliveryCallback = Box<dyn FnMut(&OutboundTurn) -> Result<(), String> + Send>;

/// Callback-backed turn sink.
pub struct CallbackSink {
    /// Host-supplied delivery callback.
    callback: DeliveryCallback,
    /// Receipt factory for deterministic dispatch identifiers.
    receipts: ReceiptFactory,
}

impl CallbackSink {
    /// Creates a callback sink with the default dispatcher name.
    #[must_use]
    pub fn new(callback: DeliveryCallback) -> Self {
        Self {
            callback,
            receipts: ReceiptFactory::new("callback"),
        }
    }
}

impl Sink for CallbackSink {
    fn deliver(&mut self, turn: &OutboundTurn) -> Result<DeliveryReceipt, SinkError> {
        (self.callback)(turn).map_err(SinkError::Delivery)?;
        Ok(self.receipts.next_receipt())
    }
}
