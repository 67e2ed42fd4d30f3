// crates/colloquy-contract/src/types.rs
// ============================================================================
// Module: Interaction Model Types
// Description: Shared data models for exported interaction-model artifacts.
// Purpose: Provide canonical shapes for NLU-schema generation tooling.
// Dependencies: colloquy-core, serde
// ============================================================================

//! ## Overview
//! This module defines the typed interaction-model shapes serialized for the
//! external NLU-schema generator. These structures are the canonical source
//! for intents, slot types, and per-control claims derived from a control
//! tree; they describe configuration, never runtime behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use colloquy_core::ActionId;
use colloquy_core::Capability;
use colloquy_core::ControlId;
use colloquy_core::SlotTypeId;
use colloquy_core::TargetId;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Slot Types
// ============================================================================

/// One value of an exported slot type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTypeValue {
    /// Canonical value identifier.
    pub id: String,
    /// Spoken synonyms resolving to the identifier.
    pub synonyms: Vec<String>,
}

/// Exported slot type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTypeDef {
    /// Slot type name.
    pub name: SlotTypeId,
    /// Seed values; the NLU layer may extend them at deployment time.
    pub values: Vec<SlotTypeValue>,
}

// ============================================================================
// SECTION: Intents
// ============================================================================

/// One slot consumed by an exported intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDef {
    /// Slot name within the intent.
    pub name: String,
    /// Slot type the slot resolves against.
    pub slot_type: SlotTypeId,
}

/// Exported intent definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDef {
    /// Intent name, unique within the model.
    pub name: String,
    /// Capability the intent exercises.
    pub capability: Capability,
    /// Action ids that surface the intent.
    pub actions: Vec<ActionId>,
    /// Slots consumed by the intent.
    pub slots: Vec<SlotDef>,
}

// ============================================================================
// SECTION: Control Registrations
// ============================================================================

/// Per-control registration recorded in the exported model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRegistration {
    /// Control identifier.
    pub control_id: ControlId,
    /// Slot type the control manages.
    pub slot_type: SlotTypeId,
    /// Target ids the control answers to.
    pub targets: Vec<TargetId>,
    /// Intent names the control claims.
    pub intents: Vec<String>,
}

// ============================================================================
// SECTION: Interaction Model
// ============================================================================

/// Exported interaction-model document.
///
/// # Invariants
/// - `intents` are unique by name; `slot_types` are unique by name.
/// - Ordering is deterministic: controls in tree order, intents in claim
///   order within each control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionModel {
    /// Model format version.
    pub model_version: String,
    /// Exported intents.
    pub intents: Vec<IntentDef>,
    /// Exported slot types.
    pub slot_types: Vec<SlotTypeDef>,
    /// Per-control registrations.
    pub controls: Vec<ControlRegistration>,
}
