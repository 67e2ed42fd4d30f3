// crates/colloquy-contract/src/contract.rs
// ============================================================================
// Module: Interaction Model Builder
// Description: Generator for interaction-model documents from control claims.
// Purpose: Assemble deterministic, validated NLU-schema exports.
// Dependencies: colloquy-core, crate::types, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The model builder collects the interaction claims each control instance
//! registers and assembles them into one validated interaction-model
//! document. Output ordering is deterministic: controls in registration
//! order, one intent per claimed capability, slot types deduplicated by
//! name. Colliding control ids or intent names are build errors, never
//! silently merged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use colloquy_core::InteractionClaims;
use thiserror::Error;

use crate::types::ControlRegistration;
use crate::types::IntentDef;
use crate::types::InteractionModel;
use crate::types::SlotDef;
use crate::types::SlotTypeDef;

// ============================================================================
// SECTION: Builder Errors
// ============================================================================

/// Interaction-model build errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No claims were registered.
    #[error("interaction model requires at least one control claim")]
    NoClaims,
    /// Two controls registered the same identifier.
    #[error("duplicate control id in claims: {0}")]
    DuplicateControlId(String),
    /// Two claims produced the same intent name.
    #[error("colliding intent name: {0}")]
    CollidingIntentName(String),
    /// A claim carried a capability with no bound actions.
    #[error("claim for {control_id} has no actions for {capability}")]
    EmptyCapability {
        /// Control with the defective claim.
        control_id: String,
        /// Capability with no bound actions.
        capability: String,
    },
    /// Serialization of the finished model failed.
    #[error("model serialization failure: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Model Builder
// ============================================================================

/// Model format version emitted by this builder.
pub const MODEL_VERSION: &str = "1";

/// Builder assembling an interaction model from control claims.
#[derive(Debug, Default)]
pub struct InteractionModelBuilder {
    /// Registered claims in control-tree order.
    claims: Vec<InteractionClaims>,
}

impl InteractionModelBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one control's claims; this is the update hook a control
    /// tree calls once per control.
    pub fn update_interaction_model(&mut self, claims: InteractionClaims) {
        self.claims.push(claims);
    }

    /// Registers every claim from an iterator, in order.
    pub fn extend_claims(&mut self, claims: impl IntoIterator<Item = InteractionClaims>) {
        self.claims.extend(claims);
    }

    /// Builds the validated interaction model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when claims are missing, collide, or are
    /// malformed.
    pub fn build(&self) -> Result<InteractionModel, ModelError> {
        if self.claims.is_empty() {
            return Err(ModelError::NoClaims);
        }

        let mut seen_controls = BTreeSet::new();
        let mut seen_intents = BTreeSet::new();
        let mut intents = Vec::new();
        let mut slot_types: Vec<SlotTypeDef> = Vec::new();
        let mut controls = Vec::new();

        for claims in &self.claims {
            if !seen_controls.insert(claims.control_id.clone()) {
                return Err(ModelError::DuplicateControlId(claims.control_id.to_string()));
            }

            let mut intent_names = Vec::new();
            for capability in &claims.capabilities {
                if capability.actions.is_empty() {
                    return Err(ModelError::EmptyCapability {
                        control_id: claims.control_id.to_string(),
                        capability: capability.capability.as_str().to_string(),
                    });
                }
                let name =
                    format!("{}_{}", claims.control_id, capability.capability.as_str());
                if !seen_intents.insert(name.clone()) {
                    return Err(ModelError::CollidingIntentName(name));
                }
                intents.push(IntentDef {
                    name: name.clone(),
                    capability: capability.capability,
                    actions: capability.actions.clone(),
                    slots: vec![SlotDef {
                        name: "value".to_string(),
                        slot_type: claims.slot_type.clone(),
                    }],
                });
                intent_names.push(name);
            }

            if !slot_types.iter().any(|slot_type| slot_type.name == claims.slot_type) {
                slot_types.push(SlotTypeDef {
                    name: claims.slot_type.clone(),
                    values: Vec::new(),
                });
            }

            controls.push(ControlRegistration {
                control_id: claims.control_id.clone(),
                slot_type: claims.slot_type.clone(),
                targets: claims.targets.clone(),
                intents: intent_names,
            });
        }

        Ok(InteractionModel {
            model_version: MODEL_VERSION.to_string(),
            intents,
            slot_types,
            controls,
        })
    }

    /// Builds the model and serializes it as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when building or serialization fails.
    pub fn build_json(&self) -> Result<String, ModelError> {
        let model = self.build()?;
        serde_json::to_string_pretty(&model).map_err(|err| ModelError::Serialize(err.to_string()))
    }
}
