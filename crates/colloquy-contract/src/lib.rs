// crates/colloquy-contract/src/lib.rs
// ============================================================================
// Module: Colloquy Contract Library
// Description: Interaction-model export for Colloquy control trees.
// Purpose: Expose model types and the claims-driven model builder.
// Dependencies: colloquy-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Colloquy Contract turns the interaction claims registered by a control
//! tree into a validated, deterministic interaction-model document for the
//! external NLU-schema generator. This is configuration export, not runtime
//! behavior.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod contract;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use contract::InteractionModelBuilder;
pub use contract::MODEL_VERSION;
pub use contract::ModelError;
pub use types::ControlRegistration;
pub use types::IntentDef;
pub use types::InteractionModel;
pub use types::SlotDef;
pub use types::SlotTypeDef;
pub use types::SlotTypeValue;
