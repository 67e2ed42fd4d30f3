// crates/colloquy-core/src/core/acts.rs
// ============================================================================
// Module: Colloquy Act Model
// Description: Immutable records of what the system communicated each turn.
// Purpose: Provide closed content/initiative act unions with render support.
// Dependencies: crate::core::{identifiers, input, state}, crate::interfaces, serde
// ============================================================================

//! ## Overview
//! Acts are immutable value objects describing what a control communicated.
//! Content acts are informational and never end the turn; initiative acts are
//! proactive and end the turn awaiting a reply. Construction never fails, and
//! no act mutates control state; state changes happen before an act is built.
//!
//! Acts carry singleton vectors where the single-value control emits them so
//! both controls share one act vocabulary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CandidateId;
use crate::core::identifiers::ControlId;
use crate::core::input::SlotValue;
use crate::core::state::ElicitationAction;
use crate::interfaces::PromptError;
use crate::interfaces::PromptRequest;
use crate::interfaces::PromptSlot;
use crate::interfaces::PromptSource;

// ============================================================================
// SECTION: Validation Failure Payload
// ============================================================================

/// Validator verdict payload carried on invalid-value acts.
///
/// # Invariants
/// - `reason_code` is a stable identifier owned by the failing validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Stable validator reason code.
    pub reason_code: String,
    /// Human-readable rendered reason.
    pub rendered_reason: String,
}

// ============================================================================
// SECTION: Unusable Input Reasons
// ============================================================================

/// Reasons a syntactically valid input could not be used.
///
/// # Invariants
/// - Variants are stable for serialization and transcript matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusableInputReason {
    /// A spoken ordinal fell outside the currently spoken page.
    OrdinalOutOfRange,
}

// ============================================================================
// SECTION: Content Acts
// ============================================================================

/// Informational acts that do not end the turn.
///
/// # Invariants
/// - Variants are stable for serialization and transcript matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentAct {
    /// A value was accepted and stored.
    ValueSet {
        /// Control that accepted the value.
        control_id: ControlId,
        /// Accepted values.
        values: Vec<SlotValue>,
    },
    /// A stored value was replaced.
    ValueChanged {
        /// Control that changed the value.
        control_id: ControlId,
        /// Values held before the change.
        previous: Vec<SlotValue>,
        /// Values held after the change.
        values: Vec<SlotValue>,
    },
    /// Values were appended to a multi-value control.
    ValueAdded {
        /// Control that accepted the values.
        control_id: ControlId,
        /// Appended values.
        values: Vec<SlotValue>,
    },
    /// Values were removed from a multi-value control.
    ValueRemoved {
        /// Control that removed the values.
        control_id: ControlId,
        /// Removed values.
        values: Vec<CandidateId>,
    },
    /// All values were cleared.
    ValueCleared {
        /// Control that was cleared.
        control_id: ControlId,
        /// Values held before the clear.
        previous: Vec<CandidateId>,
    },
    /// A supplied value failed validation.
    InvalidValue {
        /// Control that rejected the value.
        control_id: ControlId,
        /// The rejected value.
        value: SlotValue,
        /// First failing validator verdict.
        failure: ValidationFailure,
    },
    /// A removal target was not present in state.
    InvalidRemoveValue {
        /// Control that rejected the removal.
        control_id: ControlId,
        /// Removal targets not held in state.
        values: Vec<CandidateId>,
    },
    /// A syntactically valid input could not be used.
    UnusableInputValue {
        /// Control that rejected the input.
        control_id: ControlId,
        /// Why the input was unusable.
        reason: UnusableInputReason,
    },
    /// The user affirmed a confirmation question.
    ValueConfirmed {
        /// Control whose values were confirmed.
        control_id: ControlId,
        /// Confirmed values.
        values: Vec<CandidateId>,
    },
    /// The user disaffirmed a confirmation question.
    ValueDisconfirmed {
        /// Control whose values were disconfirmed.
        control_id: ControlId,
        /// Disconfirmed values.
        values: Vec<CandidateId>,
    },
}

// ============================================================================
// SECTION: Initiative Acts
// ============================================================================

/// Proactive acts that end the turn awaiting a reply.
///
/// # Invariants
/// - At most one initiative act is emitted per turn; [`ResponseBuilder`]
///   enforces the invariant at insertion time.
/// - `choices` always holds the currently spoken page, never the full list.
///
/// [`ResponseBuilder`]: crate::runtime::ResponseBuilder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitiativeAct {
    /// Ask the user to supply a value.
    RequestValue {
        /// Control asking the question.
        control_id: ControlId,
        /// Elicitation intent the reply will be interpreted under.
        elicitation: ElicitationAction,
        /// Spoken page of candidate choices.
        choices: Vec<CandidateId>,
    },
    /// Ask the user to supply a replacement value.
    RequestChangedValue {
        /// Control asking the question.
        control_id: ControlId,
        /// Spoken page of candidate choices.
        choices: Vec<CandidateId>,
    },
    /// Ask the user which held value to remove.
    RequestRemovedValue {
        /// Control asking the question.
        control_id: ControlId,
        /// Values currently held and eligible for removal.
        choices: Vec<CandidateId>,
    },
    /// Ask the user to confirm the offered values.
    ConfirmValue {
        /// Control asking the question.
        control_id: ControlId,
        /// Values offered for confirmation.
        values: Vec<CandidateId>,
    },
}

// ============================================================================
// SECTION: Act Union
// ============================================================================

/// One system act, content or initiative.
///
/// # Invariants
/// - Variants are stable for serialization and transcript matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Act {
    /// Informational act.
    Content(ContentAct),
    /// Turn-terminating proactive act.
    Initiative(InitiativeAct),
}

impl Act {
    /// Returns true for initiative acts.
    #[must_use]
    pub const fn is_initiative(&self) -> bool {
        matches!(self, Self::Initiative(_))
    }

    /// Returns the control that emitted this act.
    #[must_use]
    pub const fn control_id(&self) -> &ControlId {
        match self {
            Self::Content(act) => act.control_id(),
            Self::Initiative(act) => act.control_id(),
        }
    }

    /// Returns the stable act name used in transcripts and log records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Content(act) => act.name(),
            Self::Initiative(act) => act.name(),
        }
    }

    /// Renders this act into speech fragments via the prompt source.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError`] when the prompt source cannot resolve the slot.
    pub fn render(
        &self,
        prompts: &dyn PromptSource,
        out: &mut RenderedTurn,
    ) -> Result<(), PromptError> {
        let request = self.prompt_request();
        let speech = prompts.resolve(&request)?;
        out.push(speech);
        Ok(())
    }

    /// Builds the prompt request describing this act.
    #[must_use]
    pub fn prompt_request(&self) -> PromptRequest {
        match self {
            Self::Content(act) => act.prompt_request(),
            Self::Initiative(act) => act.prompt_request(),
        }
    }
}

impl From<ContentAct> for Act {
    fn from(act: ContentAct) -> Self {
        Self::Content(act)
    }
}

impl From<InitiativeAct> for Act {
    fn from(act: InitiativeAct) -> Self {
        Self::Initiative(act)
    }
}

impl ContentAct {
    /// Returns the control that emitted this act.
    #[must_use]
    pub const fn control_id(&self) -> &ControlId {
        match self {
            Self::ValueSet { control_id, .. }
            | Self::ValueChanged { control_id, .. }
            | Self::ValueAdded { control_id, .. }
            | Self::ValueRemoved { control_id, .. }
            | Self::ValueCleared { control_id, .. }
            | Self::InvalidValue { control_id, .. }
            | Self::InvalidRemoveValue { control_id, .. }
            | Self::UnusableInputValue { control_id, .. }
            | Self::ValueConfirmed { control_id, .. }
            | Self::ValueDisconfirmed { control_id, .. } => control_id,
        }
    }

    /// Returns the stable act name used in transcripts and log records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ValueSet { .. } => "value_set",
            Self::ValueChanged { .. } => "value_changed",
            Self::ValueAdded { .. } => "value_added",
            Self::ValueRemoved { .. } => "value_removed",
            Self::ValueCleared { .. } => "value_cleared",
            Self::InvalidValue { .. } => "invalid_value",
            Self::InvalidRemoveValue { .. } => "invalid_remove_value",
            Self::UnusableInputValue { .. } => "unusable_input_value",
            Self::ValueConfirmed { .. } => "value_confirmed",
            Self::ValueDisconfirmed { .. } => "value_disconfirmed",
        }
    }

    /// Builds the prompt request describing this act.
    #[must_use]
    pub fn prompt_request(&self) -> PromptRequest {
        match self {
            Self::ValueSet { control_id, values } => PromptRequest::with_values(
                PromptSlot::ValueSet,
                control_id.clone(),
                values.iter().map(|value| value.value.to_string()).collect(),
            ),
            Self::ValueChanged { control_id, values, .. } => PromptRequest::with_values(
                PromptSlot::ValueChanged,
                control_id.clone(),
                values.iter().map(|value| value.value.to_string()).collect(),
            ),
            Self::ValueAdded { control_id, values } => PromptRequest::with_values(
                PromptSlot::ValueAdded,
                control_id.clone(),
                values.iter().map(|value| value.value.to_string()).collect(),
            ),
            Self::ValueRemoved { control_id, values } => PromptRequest::with_values(
                PromptSlot::ValueRemoved,
                control_id.clone(),
                values.iter().map(ToString::to_string).collect(),
            ),
            Self::ValueCleared { control_id, .. } => {
                PromptRequest::new(PromptSlot::ValueCleared, control_id.clone())
            }
            Self::InvalidValue { control_id, value, failure } => PromptRequest::with_reason(
                PromptSlot::InvalidValue,
                control_id.clone(),
                vec![value.value.to_string()],
                failure.rendered_reason.clone(),
            ),
            Self::InvalidRemoveValue { control_id, values } => PromptRequest::with_values(
                PromptSlot::InvalidRemoveValue,
                control_id.clone(),
                values.iter().map(ToString::to_string).collect(),
            ),
            Self::UnusableInputValue { control_id, .. } => {
                PromptRequest::new(PromptSlot::UnusableInputValue, control_id.clone())
            }
            Self::ValueConfirmed { control_id, values } => PromptRequest::with_values(
                PromptSlot::ValueConfirmed,
                control_id.clone(),
                values.iter().map(ToString::to_string).collect(),
            ),
            Self::ValueDisconfirmed { control_id, values } => PromptRequest::with_values(
                PromptSlot::ValueDisconfirmed,
                control_id.clone(),
                values.iter().map(ToString::to_string).collect(),
            ),
        }
    }
}

impl InitiativeAct {
    /// Returns the control that emitted this act.
    #[must_use]
    pub const fn control_id(&self) -> &ControlId {
        match self {
            Self::RequestValue { control_id, .. }
            | Self::RequestChangedValue { control_id, .. }
            | Self::RequestRemovedValue { control_id, .. }
            | Self::ConfirmValue { control_id, .. } => control_id,
        }
    }

    /// Returns the stable act name used in transcripts and log records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RequestValue { .. } => "request_value",
            Self::RequestChangedValue { .. } => "request_changed_value",
            Self::RequestRemovedValue { .. } => "request_removed_value",
            Self::ConfirmValue { .. } => "confirm_value",
        }
    }

    /// Builds the prompt request describing this act.
    #[must_use]
    pub fn prompt_request(&self) -> PromptRequest {
        match self {
            Self::RequestValue { control_id, choices, .. } => PromptRequest::with_values(
                PromptSlot::RequestValue,
                control_id.clone(),
                choices.iter().map(ToString::to_string).collect(),
            ),
            Self::RequestChangedValue { control_id, choices } => PromptRequest::with_values(
                PromptSlot::RequestChangedValue,
                control_id.clone(),
                choices.iter().map(ToString::to_string).collect(),
            ),
            Self::RequestRemovedValue { control_id, choices } => PromptRequest::with_values(
                PromptSlot::RequestRemovedValue,
                control_id.clone(),
                choices.iter().map(ToString::to_string).collect(),
            ),
            Self::ConfirmValue { control_id, values } => PromptRequest::with_values(
                PromptSlot::ConfirmValue,
                control_id.clone(),
                values.iter().map(ToString::to_string).collect(),
            ),
        }
    }
}

// ============================================================================
// SECTION: Rendered Turns
// ============================================================================

/// Ordered speech fragments produced by rendering a turn's acts.
///
/// # Invariants
/// - Fragments preserve act emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTurn {
    /// Speech fragments in act order.
    fragments: Vec<String>,
}

impl RenderedTurn {
    /// Creates an empty rendered turn.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fragments: Vec::new(),
        }
    }

    /// Appends one speech fragment.
    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// Returns the fragments in act order.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Joins the fragments into one utterance.
    #[must_use]
    pub fn joined(&self) -> String {
        self.fragments.join(" ")
    }
}
