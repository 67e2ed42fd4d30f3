// crates/colloquy-broker/src/source/inline.rs
// ============================================================================
// Module: Colloquy Inline Source
// Description: FIFO turn source over pre-resolved requests.
// Purpose: Feed scripted or queued turns into the broker loop.
// Dependencies: colloquy-core, std
// ============================================================================

//! ## Overview
//! `InlineSource` holds pre-resolved turn requests in arrival order. Hosts
//! push requests as the NLU layer resolves them; the broker drains them one
//! per cycle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use colloquy_core::TurnRequest;
use colloquy_core::TurnSource;

// ============================================================================
// SECTION: Inline Source
// ============================================================================

/// FIFO turn source.
#[derive(Debug, Default)]
pub struct InlineSource {
    /// Pending requests in arrival order.
    queue: VecDeque<TurnRequest>,
}

impl InlineSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source pre-loaded with requests in order.
    #[must_use]
    pub fn with_requests(requests: impl IntoIterator<Item = TurnRequest>) -> Self {
        Self {
            queue: requests.into_iter().collect(),
        }
    }

    /// Enqueues one request.
    pub fn push(&mut self, request: TurnRequest) {
        self.queue.push_back(request);
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl TurnSource for InlineSource {
    fn next_turn(&mut self) -> Option<TurnRequest> {
        self.queue.pop_front()
    }
}
