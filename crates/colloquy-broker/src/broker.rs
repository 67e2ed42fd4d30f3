// crates/colloquy-broker/src/broker.rs
// ============================================================================
// Module: Colloquy Composite Broker
// Description: Source-to-sink delivery loop around the turn engine.
// Purpose: Drain turn requests, dispatch, render, and deliver with receipts.
// Dependencies: colloquy-core, crate::{payload, sink}, thiserror
// ============================================================================

//! ## Overview
//! The composite broker wires a turn source through the engine and fans the
//! rendered result out to every configured sink. One cycle handles exactly
//! one turn; `drain` runs cycles until the source is empty. Failures abort
//! the cycle closed: a turn is either fully delivered to all sinks or the
//! error is surfaced to the host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use colloquy_core::EngineError;
use colloquy_core::PromptError;
use colloquy_core::PromptSource;
use colloquy_core::RenderedTurn;
use colloquy_core::SessionStore;
use colloquy_core::TurnEngine;
use colloquy_core::TurnSource;
use thiserror::Error;

use crate::payload::OutboundTurn;
use crate::sink::DeliveryReceipt;
use crate::sink::Sink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Broker Errors
// ============================================================================

/// Errors surfaced by the composite broker.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// A required component was not configured.
    #[error("missing broker component: {0}")]
    MissingComponent(&'static str),
    /// Turn dispatch failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Act rendering failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),
    /// Sink delivery failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

// ============================================================================
// SECTION: Delivered Turns
// ============================================================================

/// Outcome of one broker cycle.
#[derive(Debug)]
pub struct DeliveredTurn {
    /// Delivered payload.
    pub turn: OutboundTurn,
    /// One receipt per configured sink, in sink order.
    pub receipts: Vec<DeliveryReceipt>,
}

// ============================================================================
// SECTION: Composite Broker
// ============================================================================

/// Composite broker owning the source, engine, renderer, and sinks.
pub struct CompositeBroker<S> {
    /// Turn source drained one request per cycle.
    source: Box<dyn TurnSource>,
    /// Turn engine executing the dispatch cycle.
    engine: TurnEngine<S>,
    /// Locale prompt source used to render acts.
    prompts: Box<dyn PromptSource>,
    /// Sinks receiving every delivered turn, in order.
    sinks: Vec<Box<dyn Sink>>,
}

impl<S> CompositeBroker<S>
where
    S: SessionStore,
{
    /// Starts a builder for a composite broker.
    #[must_use]
    pub fn builder(engine: TurnEngine<S>) -> CompositeBrokerBuilder<S> {
        CompositeBrokerBuilder {
            source: None,
            engine,
            prompts: None,
            sinks: Vec::new(),
        }
    }

    /// Runs one cycle: drains one request, dispatches, renders, delivers.
    ///
    /// Returns `None` when the source has no pending request.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] when dispatch, rendering, or delivery fails.
    pub fn run_once(&mut self) -> Result<Option<DeliveredTurn>, BrokerError> {
        let Some(request) = self.source.next_turn() else {
            return Ok(None);
        };
        let result = self.engine.handle_turn(&request)?;

        let mut rendered = RenderedTurn::new();
        for act in &result.acts {
            act.render(self.prompts.as_ref(), &mut rendered)?;
        }

        let turn = OutboundTurn {
            session_id: request.session_id,
            turn_id: request.turn_id,
            acts: result.acts,
            speech: rendered.fragments().to_vec(),
        };

        let mut receipts = Vec::with_capacity(self.sinks.len());
        for sink in &mut self.sinks {
            receipts.push(sink.deliver(&turn)?);
        }

        Ok(Some(DeliveredTurn {
            turn,
            receipts,
        }))
    }

    /// Runs cycles until the source is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] on the first failing cycle.
    pub fn drain(&mut self) -> Result<Vec<DeliveredTurn>, BrokerError> {
        let mut delivered = Vec::new();
        while let Some(turn) = self.run_once()? {
            delivered.push(turn);
        }
        Ok(delivered)
    }

    /// Returns the engine for state inspection.
    #[must_use]
    pub const fn engine(&self) -> &TurnEngine<S> {
        &self.engine
    }
}

// ============================================================================
// SECTION: Broker Builder
// ============================================================================

/// Builder assembling a composite broker.
pub struct CompositeBrokerBuilder<S> {
    /// Configured turn source.
    source: Option<Box<dyn TurnSource>>,
    /// Turn engine executing the dispatch cycle.
    engine: TurnEngine<S>,
    /// Configured prompt source.
    prompts: Option<Box<dyn PromptSource>>,
    /// Configured sinks, in delivery order.
    sinks: Vec<Box<dyn Sink>>,
}

impl<S> CompositeBrokerBuilder<S>
where
    S: SessionStore,
{
    /// Sets the turn source.
    #[must_use]
    pub fn source(mut self, source: Box<dyn TurnSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the prompt source used to render acts.
    #[must_use]
    pub fn prompts(mut self, prompts: Box<dyn PromptSource>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Appends a sink; sinks receive deliveries in insertion order.
    #[must_use]
    pub fn sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Builds the broker.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::MissingComponent`] when the source, prompts, or
    /// every sink is missing.
    pub fn build(self) -> Result<CompositeBroker<S>, BrokerError> {
        let source = self.source.ok_or(BrokerError::MissingComponent("source"))?;
        let prompts = self.prompts.ok_or(BrokerError::MissingComponent("prompts"))?;
        if self.sinks.is_empty() {
            return Err(BrokerError::MissingComponent("sink"));
        }
        Ok(CompositeBroker {
            source,
            engine: self.engine,
            prompts,
            sinks: self.sinks,
        })
    }
}
