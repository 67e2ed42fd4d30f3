// crates/colloquy-broker/src/sink/log.rs
// ============================================================================
// Module: Colloquy Log Sink
// Description: Log-only sink for audit-grade delivery records.
// Purpose: Persist one structured JSON record per delivered turn.
// Dependencies: crate::{payload, sink}, serde_json, std
// ============================================================================

//! ## Overview
//! `LogSink` writes one structured JSON record per delivery and returns the
//! receipt. It does not forward payloads to external systems; it is the
//! reference observability surface for hosts that tail delivery logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use serde_json::json;

use crate::payload::OutboundTurn;
use crate::sink::DeliveryReceipt;
use crate::sink::ReceiptFactory;
use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Log-only turn sink.
pub struct LogSink<W: Write + Send> {
    /// Output writer for log records.
    writer: W,
    /// Receipt factory for deterministic dispatch identifiers.
    receipts: ReceiptFactory,
}

impl<W: Write + Send> LogSink<W> {
    /// Creates a log sink with the default dispatcher name.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            receipts: ReceiptFactory::new("log"),
        }
    }

    /// Creates a log sink with a custom dispatcher name.
    pub fn with_dispatcher(writer: W, dispatcher: impl Into<String>) -> Self {
        Self {
            writer,
            receipts: ReceiptFactory::new(dispatcher),
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for LogSink<W> {
    fn deliver(&mut self, turn: &OutboundTurn) -> Result<DeliveryReceipt, SinkError> {
        let receipt = self.receipts.next_receipt();
        let record = json!({
            "record": "turn_delivery",
            "dispatch_id": receipt.dispatch_id,
            "session_id": turn.session_id,
            "turn_id": turn.turn_id,
            "acts": turn.act_names(),
            "speech": turn.speech,
        });
        let line =
            serde_json::to_string(&record).map_err(|err| SinkError::Serialize(err.to_string()))?;
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .map_err(|err| SinkError::Delivery(err.to_string()))?;
        Ok(receipt)
    }
}
