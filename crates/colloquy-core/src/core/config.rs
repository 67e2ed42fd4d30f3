// crates/colloquy-core/src/core/config.rs
// ============================================================================
// Module: Colloquy Control Configuration
// Description: Validated per-control configuration and interaction claims.
// Purpose: Fix every optional setting once at control creation time.
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! Control configuration is an explicit, validated struct constructed once
//! when the control tree is built; there is no runtime defaults merging.
//! Validation rejects overlapping action bindings so that at most one input
//! handler can match by construction, and the dispatch layer still asserts
//! the invariant at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ActionId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::SlotTypeId;
use crate::core::identifiers::TargetId;

// ============================================================================
// SECTION: Built-in Action Identifiers
// ============================================================================

/// Built-in action slot ids recognized by default bindings.
pub mod builtin_actions {
    /// Set a value.
    pub const SET: &str = "set";
    /// Select a value (synonym of set in default bindings).
    pub const SELECT: &str = "select";
    /// Change a held value.
    pub const CHANGE: &str = "change";
    /// Add a value to a multi-value control.
    pub const ADD: &str = "add";
    /// Remove a held value.
    pub const REMOVE: &str = "remove";
    /// Remove a held value (synonym of remove in default bindings).
    pub const DELETE: &str = "delete";
    /// Clear every held value.
    pub const CLEAR: &str = "clear";
}

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// Acquisition capabilities a control can bind action ids to.
///
/// # Invariants
/// - Variants are stable for serialization and contract export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Set a value.
    Set,
    /// Change a held value.
    Change,
    /// Add a value.
    Add,
    /// Remove a held value.
    Remove,
    /// Clear every held value.
    Clear,
}

impl Capability {
    /// Returns the stable capability name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Change => "change",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Clear => "clear",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Action Bindings
// ============================================================================

/// Action bindings for the single-value control.
///
/// # Invariants
/// - Capability sets are non-empty and pairwise disjoint after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueActionBindings {
    /// Action ids bound to the set capability.
    pub set: Vec<ActionId>,
    /// Action ids bound to the change capability.
    pub change: Vec<ActionId>,
}

impl Default for ValueActionBindings {
    fn default() -> Self {
        Self {
            set: vec![
                ActionId::new(builtin_actions::SET),
                ActionId::new(builtin_actions::SELECT),
            ],
            change: vec![ActionId::new(builtin_actions::CHANGE)],
        }
    }
}

/// Action bindings for the multi-value control.
///
/// # Invariants
/// - Capability sets are non-empty and pairwise disjoint after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListActionBindings {
    /// Action ids bound to the add capability.
    pub add: Vec<ActionId>,
    /// Action ids bound to the change capability.
    pub change: Vec<ActionId>,
    /// Action ids bound to the remove capability.
    pub remove: Vec<ActionId>,
    /// Action ids bound to the clear capability.
    pub clear: Vec<ActionId>,
}

impl Default for ListActionBindings {
    fn default() -> Self {
        Self {
            add: vec![
                ActionId::new(builtin_actions::ADD),
                ActionId::new(builtin_actions::SELECT),
            ],
            change: vec![ActionId::new(builtin_actions::CHANGE)],
            remove: vec![
                ActionId::new(builtin_actions::REMOVE),
                ActionId::new(builtin_actions::DELETE),
            ],
            clear: vec![ActionId::new(builtin_actions::CLEAR)],
        }
    }
}

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Control configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Control identifier is empty.
    #[error("control id must not be empty")]
    EmptyControlId,
    /// Slot type identifier is empty.
    #[error("slot type must not be empty: {0}")]
    EmptySlotType(ControlId),
    /// Page size is zero.
    #[error("page size must be at least 1: {0}")]
    ZeroPageSize(ControlId),
    /// A capability has no bound action ids.
    #[error("capability {capability} has no bound actions: {control_id}")]
    EmptyActionSet {
        /// Control with the defective binding.
        control_id: ControlId,
        /// Capability with no bound actions.
        capability: Capability,
    },
    /// An action id is bound to more than one capability.
    #[error("action {action} is bound to both {first} and {second}: {control_id}")]
    OverlappingActionSets {
        /// Control with the defective binding.
        control_id: ControlId,
        /// Doubly bound action id.
        action: ActionId,
        /// First capability binding the action.
        first: Capability,
        /// Second capability binding the action.
        second: Capability,
    },
}

// ============================================================================
// SECTION: Single-Value Configuration
// ============================================================================

/// Configuration for the single-value acquisition control.
///
/// # Invariants
/// - Validated once at control creation; never merged or mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueControlConfig {
    /// Control identifier.
    pub control_id: ControlId,
    /// Slot type naming the managed value space.
    pub slot_type: SlotTypeId,
    /// Target slot ids this control answers to.
    pub targets: Vec<TargetId>,
    /// Whether a value must eventually be acquired.
    pub required: bool,
    /// Whether an acquired value must be confirmed.
    pub confirmation_required: bool,
    /// Number of candidates spoken per page.
    pub page_size: u64,
    /// Action bindings for set and change.
    pub actions: ValueActionBindings,
}

impl ValueControlConfig {
    /// Creates a configuration with default bindings and paging.
    #[must_use]
    pub fn new(control_id: impl Into<ControlId>, slot_type: impl Into<SlotTypeId>) -> Self {
        Self {
            control_id: control_id.into(),
            slot_type: slot_type.into(),
            targets: Vec::new(),
            required: true,
            confirmation_required: false,
            page_size: DEFAULT_PAGE_SIZE,
            actions: ValueActionBindings::default(),
        }
    }

    /// Validates the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_identifiers(&self.control_id, &self.slot_type)?;
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize(self.control_id.clone()));
        }
        ensure_bindings(
            &self.control_id,
            &[
                (Capability::Set, &self.actions.set),
                (Capability::Change, &self.actions.change),
            ],
        )
    }

    /// Exports the interaction claims for this configuration.
    #[must_use]
    pub fn interaction_claims(&self) -> InteractionClaims {
        InteractionClaims {
            control_id: self.control_id.clone(),
            slot_type: self.slot_type.clone(),
            targets: self.targets.clone(),
            capabilities: vec![
                CapabilityClaim {
                    capability: Capability::Set,
                    actions: self.actions.set.clone(),
                },
                CapabilityClaim {
                    capability: Capability::Change,
                    actions: self.actions.change.clone(),
                },
            ],
        }
    }
}

// ============================================================================
// SECTION: Multi-Value Configuration
// ============================================================================

/// Configuration for the multi-value acquisition control.
///
/// # Invariants
/// - Validated once at control creation; never merged or mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListControlConfig {
    /// Control identifier.
    pub control_id: ControlId,
    /// Slot type naming the managed value space.
    pub slot_type: SlotTypeId,
    /// Target slot ids this control answers to.
    pub targets: Vec<TargetId>,
    /// Whether at least one value must eventually be acquired.
    pub required: bool,
    /// Whether acquired values must be confirmed.
    pub confirmation_required: bool,
    /// Number of candidates spoken per page.
    pub page_size: u64,
    /// Action bindings for add, change, remove, and clear.
    pub actions: ListActionBindings,
}

impl ListControlConfig {
    /// Creates a configuration with default bindings and paging.
    #[must_use]
    pub fn new(control_id: impl Into<ControlId>, slot_type: impl Into<SlotTypeId>) -> Self {
        Self {
            control_id: control_id.into(),
            slot_type: slot_type.into(),
            targets: Vec::new(),
            required: true,
            confirmation_required: false,
            page_size: DEFAULT_PAGE_SIZE,
            actions: ListActionBindings::default(),
        }
    }

    /// Validates the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_identifiers(&self.control_id, &self.slot_type)?;
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize(self.control_id.clone()));
        }
        ensure_bindings(
            &self.control_id,
            &[
                (Capability::Add, &self.actions.add),
                (Capability::Change, &self.actions.change),
                (Capability::Remove, &self.actions.remove),
                (Capability::Clear, &self.actions.clear),
            ],
        )
    }

    /// Exports the interaction claims for this configuration.
    #[must_use]
    pub fn interaction_claims(&self) -> InteractionClaims {
        InteractionClaims {
            control_id: self.control_id.clone(),
            slot_type: self.slot_type.clone(),
            targets: self.targets.clone(),
            capabilities: vec![
                CapabilityClaim {
                    capability: Capability::Add,
                    actions: self.actions.add.clone(),
                },
                CapabilityClaim {
                    capability: Capability::Change,
                    actions: self.actions.change.clone(),
                },
                CapabilityClaim {
                    capability: Capability::Remove,
                    actions: self.actions.remove.clone(),
                },
                CapabilityClaim {
                    capability: Capability::Clear,
                    actions: self.actions.clear.clone(),
                },
            ],
        }
    }
}

/// Default spoken page size.
pub const DEFAULT_PAGE_SIZE: u64 = 3;

// ============================================================================
// SECTION: Interaction Claims
// ============================================================================

/// Per-capability action claim exported to the interaction-model builder.
///
/// # Invariants
/// - `actions` preserves binding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityClaim {
    /// Claimed capability.
    pub capability: Capability,
    /// Action ids bound to the capability.
    pub actions: Vec<ActionId>,
}

/// Intent and slot-value claims a control instance registers.
///
/// This is configuration export for the external NLU-schema generator, not
/// runtime behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionClaims {
    /// Control identifier.
    pub control_id: ControlId,
    /// Slot type naming the managed value space.
    pub slot_type: SlotTypeId,
    /// Target slot ids the control answers to.
    pub targets: Vec<TargetId>,
    /// Per-capability action claims.
    pub capabilities: Vec<CapabilityClaim>,
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Rejects empty control or slot-type identifiers.
fn ensure_identifiers(control_id: &ControlId, slot_type: &SlotTypeId) -> Result<(), ConfigError> {
    if control_id.as_str().is_empty() {
        return Err(ConfigError::EmptyControlId);
    }
    if slot_type.as_str().is_empty() {
        return Err(ConfigError::EmptySlotType(control_id.clone()));
    }
    Ok(())
}

/// Rejects empty or overlapping capability bindings.
fn ensure_bindings(
    control_id: &ControlId,
    bindings: &[(Capability, &Vec<ActionId>)],
) -> Result<(), ConfigError> {
    for (capability, actions) in bindings {
        if actions.is_empty() {
            return Err(ConfigError::EmptyActionSet {
                control_id: control_id.clone(),
                capability: *capability,
            });
        }
    }
    for (index, (first, actions)) in bindings.iter().enumerate() {
        for (second, other) in bindings.iter().skip(index + 1) {
            if let Some(action) = actions.iter().find(|action| other.contains(action)) {
                return Err(ConfigError::OverlappingActionSets {
                    control_id: control_id.clone(),
                    action: action.clone(),
                    first: *first,
                    second: *second,
                });
            }
        }
    }
    Ok(())
}
