// crates/colloquy-broker/src/payload.rs
// ============================================================================
// Module: Colloquy Broker Payloads
// Description: Outbound turn payloads delivered to sinks.
// Purpose: Bundle acts and rendered speech for delivery records.
// Dependencies: colloquy-core, serde
// ============================================================================

//! ## Overview
//! An outbound turn is the delivery unit produced by the broker: the acts a
//! turn emitted plus the speech fragments rendered from them. Sinks receive
//! the full payload and decide what to persist or forward.

// ============================================================================
// SECTION: Imports
// ============================================================================

use colloquy_core::Act;
use colloquy_core::SessionId;
use colloquy_core::TurnId;
use serde::Serialize;

// ============================================================================
// SECTION: Outbound Turns
// ============================================================================

/// Delivery payload for one dispatched turn.
///
/// # Invariants
/// - `speech` fragments correspond to `acts` in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundTurn {
    /// Session the turn belongs to.
    pub session_id: SessionId,
    /// Turn identifier.
    pub turn_id: TurnId,
    /// Acts emitted during the turn, in emission order.
    pub acts: Vec<Act>,
    /// Rendered speech fragments, in act order.
    pub speech: Vec<String>,
}

impl OutboundTurn {
    /// Returns the stable act names in emission order.
    #[must_use]
    pub fn act_names(&self) -> Vec<&'static str> {
        self.acts.iter().map(Act::name).collect()
    }
}
