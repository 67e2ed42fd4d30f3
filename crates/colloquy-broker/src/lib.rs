// crates/colloquy-broker/src/lib.rs
// ============================================================================
// Module: Colloquy Broker Library
// Description: Reference sources/sinks and composite broker for Colloquy.
// Purpose: Feed resolved turns through the engine and deliver rendered acts.
// Dependencies: colloquy-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Colloquy Broker provides ready-made turn-source and sink implementations
//! plus a composite broker that wires them around the turn engine.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod broker;
pub mod payload;
pub mod sink;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use broker::BrokerError;
pub use broker::CompositeBroker;
pub use broker::CompositeBrokerBuilder;
pub use broker::DeliveredTurn;
pub use payload::OutboundTurn;
pub use sink::CallbackSink;
pub use sink::ChannelSink;
pub use sink::DeliveryReceipt;
pub use sink::DispatchMessage;
pub use sink::LogSink;
pub use sink::ReceiptFactory;
pub use sink::Sink;
pub use sink::SinkError;
pub use source::InlineSource;
